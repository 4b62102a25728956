//! # Mock Payment Session
//!
//! Counts down a [`PaymentRequest`] while waiting for the buyer to confirm
//! or cancel. Nothing is charged; the buyer's word is the payment.
//!
//! ## Session Race
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   t=0 ──────── 1s ──────── 2s ─── ... ─── 59s ──────── 60s              │
//! │    │            │           │              │            │               │
//! │    │         on_tick(59) on_tick(58)    on_tick(1)      ▼               │
//! │    │                                                 Expired            │
//! │    │                                                                    │
//! │    └── decision ─┬─ Some(Confirm) ─► Completed                          │
//! │                  ├─ Some(Cancel) ──► Cancelled                          │
//! │                  └─ None (input closed) ─► Cancelled                    │
//! │                                                                         │
//! │  Whichever settles first wins. A decision arriving at the same instant  │
//! │  as the deadline wins over it.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{interval_at, sleep_until, Instant};
use tracing::{debug, info};

use marquee_core::{PaymentOutcome, PaymentRequest};

/// What the buyer chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentDecision {
    /// "Payment complete" was pressed.
    Confirm,
    /// "Cancel" was pressed.
    Cancel,
}

/// One countdown over one payment request.
#[derive(Debug, Clone)]
pub struct PaymentSession {
    request: PaymentRequest,
    timeout: Duration,
}

impl PaymentSession {
    pub fn new(request: PaymentRequest, timeout: Duration) -> Self {
        PaymentSession { request, timeout }
    }

    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs the countdown until a decision arrives or time runs out.
    ///
    /// `on_tick` is called once per elapsed second with the whole seconds
    /// remaining (`timeout - 1` down to `1`).
    pub async fn run<D, T>(self, decision: D, mut on_tick: T) -> PaymentOutcome
    where
        D: Future<Output = Option<PaymentDecision>>,
        T: FnMut(u64),
    {
        let start = Instant::now();
        let deadline = start + self.timeout;
        let total_secs = self.timeout.as_secs();

        info!(
            amount = %self.request.amount,
            timeout_secs = total_secs,
            "Payment session started"
        );

        let second = Duration::from_secs(1);
        let mut ticks = interval_at(start + second, second);
        let expiry = sleep_until(deadline);
        tokio::pin!(decision);
        tokio::pin!(expiry);

        let outcome = loop {
            tokio::select! {
                biased;

                choice = &mut decision => {
                    break match choice {
                        Some(PaymentDecision::Confirm) => PaymentOutcome::Completed,
                        Some(PaymentDecision::Cancel) | None => PaymentOutcome::Cancelled,
                    };
                }
                _ = &mut expiry => break PaymentOutcome::Expired,
                tick = ticks.tick() => {
                    let elapsed = tick.duration_since(start).as_secs();
                    let remaining = total_secs.saturating_sub(elapsed);
                    if remaining > 0 {
                        debug!(remaining, "Payment countdown");
                        on_tick(remaining);
                    }
                }
            }
        };

        info!(?outcome, elapsed_ms = start.elapsed().as_millis() as u64, "Payment session ended");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use marquee_core::{BankTransferInfo, CartLineItem, CartPricingEngine, Money};

    fn session(secs: u64) -> PaymentSession {
        let items: Vec<CartLineItem> = (0..4)
            .map(|i| CartLineItem::new(i.to_string(), Some(Money::from_dollars(10))))
            .collect();
        let pricing = CartPricingEngine::compute(&items);
        let request =
            PaymentRequest::for_pricing(&pricing, BankTransferInfo::default(), secs, Utc::now())
                .unwrap();
        PaymentSession::new(request, Duration::from_secs(secs))
    }

    async fn decide_after(secs: u64, decision: Option<PaymentDecision>) -> Option<PaymentDecision> {
        tokio::time::sleep(Duration::from_secs(secs)).await;
        decision
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirm_completes() {
        let outcome = session(60)
            .run(decide_after(30, Some(PaymentDecision::Confirm)), |_| {})
            .await;
        assert_eq!(outcome, PaymentOutcome::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_closed_input_cancel() {
        let outcome = session(60)
            .run(decide_after(5, Some(PaymentDecision::Cancel)), |_| {})
            .await;
        assert_eq!(outcome, PaymentOutcome::Cancelled);

        let outcome = session(60).run(decide_after(5, None), |_| {}).await;
        assert_eq!(outcome, PaymentOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_decision_expires_at_deadline() {
        let start = Instant::now();
        let mut ticks = Vec::new();

        let outcome = session(60)
            .run(std::future::pending::<Option<PaymentDecision>>(), |remaining| {
                ticks.push(remaining)
            })
            .await;

        assert_eq!(outcome, PaymentOutcome::Expired);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(60) && elapsed < Duration::from_secs(61));
        assert_eq!(ticks.first(), Some(&59));
        assert_eq!(ticks.last(), Some(&1));
        assert!(ticks.windows(2).all(|w| w[0] > w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_confirmation_is_too_late() {
        let outcome = session(10)
            .run(decide_after(11, Some(PaymentDecision::Confirm)), |_| {})
            .await;
        assert_eq!(outcome, PaymentOutcome::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_decision_skips_countdown() {
        let mut ticked = false;
        let outcome = session(60)
            .run(async { Some(PaymentDecision::Confirm) }, |_| ticked = true)
            .await;

        assert_eq!(outcome, PaymentOutcome::Completed);
        assert!(!ticked);
    }
}
