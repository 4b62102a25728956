//! # Payment Module
//!
//! The mock checkout model: what the shopper is asked to pay, how they can
//! pay it, and what came of it. Nothing here talks to a bank; the countdown
//! itself lives in the storefront app.
//!
//! ## Checkout Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PricingResult.final_total                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  PaymentRequest { amount, qr_payload, expires_at, bank }                │
//! │         │                                                               │
//! │         ├── shopper confirms before deadline ──► Completed ──► Receipt  │
//! │         ├── shopper cancels ───────────────────► Cancelled              │
//! │         └── deadline passes ───────────────────► Expired                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::PricingResult;
use crate::validation::validate_payment_amount;

/// Prefix of the QR payload; the amount follows as a plain decimal.
pub const QR_PAYLOAD_PREFIX: &str = "payment:";

// =============================================================================
// Bank Transfer Info
// =============================================================================

/// Details shown for paying by bank transfer instead of scanning the QR code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BankTransferInfo {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub swift_code: String,
}

impl Default for BankTransferInfo {
    fn default() -> Self {
        BankTransferInfo {
            bank_name: "Blockbuster Bank".to_string(),
            account_number: "123-456-7890".to_string(),
            account_name: "Blockbuster Movies Co., Ltd.".to_string(),
            swift_code: "BBMOVTH123".to_string(),
        }
    }
}

// =============================================================================
// Payment Request
// =============================================================================

/// A request to pay for the current cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentRequest {
    /// Amount due, the cart's `final_total`.
    pub amount: Money,

    /// Number of items being paid for.
    pub item_count: usize,

    /// Text encoded in the QR code, e.g. `payment:36.00`.
    pub qr_payload: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,

    pub bank: BankTransferInfo,
}

impl PaymentRequest {
    /// Builds a request for a priced cart.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyCart`] when nothing is being bought
    /// - [`CoreError::InvalidPaymentAmount`] for a negative total or a
    ///   zero expiry
    pub fn for_pricing(
        pricing: &PricingResult,
        bank: BankTransferInfo,
        expires_in_secs: u64,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        if pricing.item_count == 0 {
            return Err(CoreError::EmptyCart);
        }

        let amount = validate_payment_amount(pricing.final_total).map_err(|e| {
            CoreError::InvalidPaymentAmount {
                reason: e.to_string(),
            }
        })?;

        if expires_in_secs == 0 {
            return Err(CoreError::InvalidPaymentAmount {
                reason: "payment window must be at least one second".to_string(),
            });
        }

        let window = expires_in_secs.min(u64::from(u32::MAX)) as i64;

        Ok(PaymentRequest {
            amount,
            item_count: pricing.item_count,
            qr_payload: qr_payload(amount),
            created_at: now,
            expires_at: now + Duration::seconds(window),
            bank,
        })
    }

    /// Seconds left before the request expires, never negative.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(0) as u64
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Builds the QR payload for an amount: `payment:36.00`.
///
/// The amount always carries two decimals, so a whole amount is
/// `payment:36.00` rather than the shortest form `payment:36`. Every
/// payload then has the same shape regardless of the cents.
pub fn qr_payload(amount: Money) -> String {
    format!("{}{}", QR_PAYLOAD_PREFIX, amount.to_decimal_string())
}

// =============================================================================
// Outcome & Receipt
// =============================================================================

/// How a payment session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentOutcome {
    Completed,
    Cancelled,
    Expired,
}

impl PaymentOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PaymentOutcome::Completed)
    }
}

/// Proof of a completed mock purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    /// Unique purchase reference.
    pub reference: String,
    pub amount: Money,
    pub item_count: usize,
    #[ts(as = "String")]
    pub paid_at: DateTime<Utc>,
}

impl Receipt {
    pub fn for_request(reference: impl Into<String>, request: &PaymentRequest, paid_at: DateTime<Utc>) -> Self {
        Receipt {
            reference: reference.into(),
            amount: request.amount,
            item_count: request.item_count,
            paid_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::CartPricingEngine;
    use crate::types::CartLineItem;

    fn priced(prices: &[i64]) -> PricingResult {
        let items: Vec<CartLineItem> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| CartLineItem::new(i.to_string(), Some(Money::from_dollars(*p))))
            .collect();
        CartPricingEngine::compute(&items)
    }

    #[test]
    fn test_request_for_discounted_cart() {
        let now = Utc::now();
        let request =
            PaymentRequest::for_pricing(&priced(&[10, 10, 10, 10]), BankTransferInfo::default(), 60, now)
                .unwrap();

        assert_eq!(request.amount, Money::from_dollars(36));
        assert_eq!(request.item_count, 4);
        assert_eq!(request.qr_payload, "payment:36.00");
        assert_eq!(request.expires_at - request.created_at, Duration::seconds(60));
        assert_eq!(request.bank.bank_name, "Blockbuster Bank");
    }

    #[test]
    fn test_qr_payload_keeps_two_decimals() {
        assert_eq!(qr_payload(Money::from_dollars(36)), "payment:36.00");
        assert_eq!(qr_payload(Money::from_cents(4050)), "payment:40.50");
        assert_eq!(qr_payload(Money::from_cents(3599)), "payment:35.99");
        assert_eq!(qr_payload(Money::zero()), "payment:0.00");
    }

    #[test]
    fn test_empty_cart_is_refused() {
        let result = PaymentRequest::for_pricing(&priced(&[]), BankTransferInfo::default(), 60, Utc::now());
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_zero_window_is_refused() {
        let result = PaymentRequest::for_pricing(&priced(&[5]), BankTransferInfo::default(), 0, Utc::now());
        assert!(matches!(result, Err(CoreError::InvalidPaymentAmount { .. })));
    }

    #[test]
    fn test_seconds_remaining() {
        let now = Utc::now();
        let request = PaymentRequest::for_pricing(&priced(&[5]), BankTransferInfo::default(), 60, now).unwrap();

        assert_eq!(request.seconds_remaining(now), 60);
        assert_eq!(request.seconds_remaining(now + Duration::seconds(45)), 15);
        assert_eq!(request.seconds_remaining(now + Duration::seconds(90)), 0);
        assert!(!request.is_expired(now));
        assert!(request.is_expired(now + Duration::seconds(60)));
    }

    #[test]
    fn test_receipt_copies_request() {
        let now = Utc::now();
        let request = PaymentRequest::for_pricing(&priced(&[20, 15]), BankTransferInfo::default(), 60, now).unwrap();
        let receipt = Receipt::for_request("ref-1", &request, now);

        assert_eq!(receipt.amount, Money::from_dollars(35));
        assert_eq!(receipt.item_count, 2);
        assert!(PaymentOutcome::Completed.is_completed());
        assert!(!PaymentOutcome::Expired.is_completed());
    }
}
