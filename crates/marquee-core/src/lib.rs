//! # marquee-core: Pure Business Logic for the Marquee Storefront
//!
//! This crate holds the cart pricing engine and everything it needs, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Marquee Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront (CLI + commands)                     │   │
//! │  │    movies ──► add ──► cart ──► purchase                         │   │
//! │  └─────────────┬───────────────────────────────┬───────────────────┘   │
//! │                │                               │                        │
//! │  ┌─────────────▼───────────────┐   ┌───────────▼───────────────────┐   │
//! │  │   marquee-catalog           │   │   marquee-db                  │   │
//! │  │   TMDB / local movie cache  │   │   carts + movie cache         │   │
//! │  └─────────────┬───────────────┘   └───────────┬───────────────────┘   │
//! │                │                               │                        │
//! │  ┌─────────────▼───────────────────────────────▼───────────────────┐   │
//! │  │             ★ marquee-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │  money  │  │ pricing │  │  cart   │  │ payment │           │   │
//! │  │   │  Money  │  │ Engine  │  │  Cart   │  │ Request │           │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO TIMERS                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer cents
//! - [`types`] - Movie, line item, discount rate
//! - [`pricing`] - `CartPricingEngine` and list-price tiers
//! - [`cart`] - Cart mutations
//! - [`payment`] - Mock checkout model
//! - [`validation`] - Boundary checks on ids and prices
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use marquee_core::{Cart, CartLineItem, Money};
//!
//! let mut cart = Cart::new();
//! for (id, price) in [("550", 10), ("603", 15), ("680", 20)] {
//!     cart.add(CartLineItem::new(id, Some(Money::from_dollars(price)))).unwrap();
//! }
//!
//! let pricing = cart.pricing();
//! assert_eq!(pricing.final_total, Money::from_dollars(45));
//! assert_eq!(
//!     pricing.upsell_message.as_deref(),
//!     Some("Add 1 more item(s) to get a 10% discount.")
//! );
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, RejectedItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::{BankTransferInfo, PaymentOutcome, PaymentRequest, Receipt};
pub use pricing::{list_price, CartPricingEngine, PricingResult};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Cart id used when a single shopper runs the storefront locally.
pub const DEFAULT_CART_ID: &str = "default";

/// How long a payment request stays open, in seconds.
pub const DEFAULT_PAYMENT_TIMEOUT_SECS: u64 = 60;

/// Longest catalog id accepted.
pub const MAX_ITEM_ID_LENGTH: usize = 64;

/// Longest search query accepted.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 100;

/// Highest unit price accepted into a cart, in cents ($1,000,000.00).
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;
