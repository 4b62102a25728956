//! # Purchase Commands
//!
//! The mock checkout: build a payment request for the re-priced cart, let a
//! [`PaymentSession`](crate::payment::PaymentSession) race the buyer against
//! the clock, then settle.
//!
//! ## Purchase Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  start_purchase ──► empty cart? ──yes──► EMPTY_CART                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  price_cart ──► PaymentRequest { amount, "payment:36.00", bank, .. }    │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  PaymentSession::run ──► Completed │ Cancelled │ Expired                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  complete_purchase                                                      │
//! │     Completed ──► carts.delete + cart.clear ──► Receipt (uuid ref)      │
//! │     Cancelled ──► PAYMENT_CANCELLED, cart kept                          │
//! │     Expired ────► PAYMENT_EXPIRED, cart kept                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use marquee_catalog::price_cart;
use marquee_core::{Cart, PaymentOutcome, PaymentRequest, Receipt};

use crate::config::StorefrontConfig;
use crate::error::ApiError;
use crate::state::{CartState, CatalogState, DbState};

/// Builds the payment request for the current cart.
///
/// The amount is the cart's `final_total` after re-pricing against the
/// catalog, so a price change since the items were added is honoured.
pub async fn start_purchase(
    catalog: &CatalogState,
    cart: &CartState,
    config: &StorefrontConfig,
) -> Result<PaymentRequest, ApiError> {
    debug!("start_purchase command");

    let snapshot = cart.snapshot();
    if snapshot.is_empty() {
        return Err(ApiError::empty_cart());
    }

    let (_, pricing) = price_cart(catalog.catalog(), &snapshot, catalog.policy()).await?;
    let request = PaymentRequest::for_pricing(
        &pricing,
        config.bank_info(),
        config.payment.timeout_secs,
        Utc::now(),
    )?;

    info!(
        amount = %request.amount,
        items = request.item_count,
        expires_at = %request.expires_at,
        "Payment requested"
    );
    Ok(request)
}

/// Settles a payment session.
///
/// Only [`PaymentOutcome::Completed`] empties the cart (in memory and in
/// storage). The other outcomes leave it untouched and fail with
/// `PAYMENT_CANCELLED` or `PAYMENT_EXPIRED`.
pub async fn complete_purchase(
    db: &DbState,
    cart: &CartState,
    request: &PaymentRequest,
    outcome: PaymentOutcome,
) -> Result<Receipt, ApiError> {
    debug!(?outcome, "complete_purchase command");

    if let Some(err) = ApiError::for_outcome(outcome) {
        info!(?outcome, amount = %request.amount, "Purchase not completed");
        return Err(err);
    }

    db.inner().carts().delete(cart.cart_id()).await?;
    cart.with_cart_mut(Cart::clear);

    let receipt = Receipt::for_request(Uuid::new_v4().to_string(), request, Utc::now());
    info!(
        reference = %receipt.reference,
        amount = %receipt.amount,
        items = receipt.item_count,
        "Purchase completed"
    );
    Ok(receipt)
}
