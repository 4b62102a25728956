//! # Validation Module
//!
//! Input validation for everything that enters the storefront from outside:
//! catalog ids, prices, search text and payment amounts.
//!
//! ## Where Validation Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CLI / command input ──► THIS MODULE ──► Cart::add ──► PricingEngine    │
//! │                              │                                          │
//! │  catalog JSON (f64) ─────────┘                                          │
//! │                                                                         │
//! │  The pricing engine trusts its input. Bad prices are stopped here so    │
//! │  `compute` never sees a negative or non-finite amount.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use marquee_core::validation::{validate_item_id, validate_decimal_price};
//!
//! assert_eq!(validate_item_id(" 550 ").unwrap(), "550");
//! assert!(validate_decimal_price(f64::NAN).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::CartLineItem;
use crate::{MAX_ITEM_ID_LENGTH, MAX_SEARCH_QUERY_LENGTH, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog item id.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_ITEM_ID_LENGTH`] characters
///
/// ## Returns
/// The trimmed id.
pub fn validate_item_id(item_id: &str) -> ValidationResult<String> {
    let item_id = item_id.trim();

    if item_id.is_empty() {
        return Err(ValidationError::Required {
            field: "item_id".to_string(),
        });
    }

    if item_id.len() > MAX_ITEM_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: "item_id".to_string(),
            max: MAX_ITEM_ID_LENGTH,
        });
    }

    Ok(item_id.to_string())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (the caller falls back to discover)
/// - Maximum [`MAX_SEARCH_QUERY_LENGTH`] characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > MAX_SEARCH_QUERY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LENGTH,
        });
    }

    Ok(query.to_string())
}

/// Validates a catalog page number (1-based, at most 500 like the TMDB API).
pub fn validate_page(page: u32) -> ValidationResult<u32> {
    if !(1..=500).contains(&page) {
        return Err(ValidationError::OutOfRange {
            field: "page".to_string(),
            min: 1,
            max: 500,
        });
    }

    Ok(page)
}

// =============================================================================
// Price Validators
// =============================================================================

/// Validates a unit price already in cents.
///
/// ## Rules
/// - Must not be negative
/// - At most [`MAX_UNIT_PRICE_CENTS`]
pub fn validate_unit_price(price: Money) -> ValidationResult<Money> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "unit_price".to_string(),
        });
    }

    if price.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(price)
}

/// Converts and validates a decimal price, e.g. one read from JSON.
///
/// ```rust
/// use marquee_core::money::Money;
/// use marquee_core::validation::validate_decimal_price;
///
/// assert_eq!(validate_decimal_price(15.0).unwrap(), Money::from_dollars(15));
/// assert!(validate_decimal_price(-1.0).is_err());
/// assert!(validate_decimal_price(f64::INFINITY).is_err());
/// ```
pub fn validate_decimal_price(amount: f64) -> ValidationResult<Money> {
    let price = Money::from_decimal(amount).ok_or_else(|| ValidationError::NotFinite {
        field: "unit_price".to_string(),
    })?;

    validate_unit_price(price)
}

/// Validates a line item before it enters a cart.
pub fn validate_line_item(item: &CartLineItem) -> ValidationResult<()> {
    validate_item_id(&item.item_id)?;
    validate_unit_price(item.unit_price)?;
    Ok(())
}

/// Validates the amount of a payment request.
///
/// A zero amount is allowed: a cart of free items can still be checked out.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<Money> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "amount".to_string(),
        });
    }

    Ok(amount)
}

// =============================================================================
// Unit Tests
// =============================================================================
