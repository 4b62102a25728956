//! # Error Types
//!
//! Domain-specific error types for marquee-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  marquee-core errors (this file)                                        │
//! │  ├── CoreError        - Storefront rule violations                      │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  marquee-db errors       └── DbError       - storage failures           │
//! │  marquee-catalog errors  └── CatalogError  - catalog lookup failures    │
//! │                                                                         │
//! │  storefront app          └── ApiError      - what the caller sees       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ─┐                                   │
//! │        DbError ─────────────────────┼──► ApiError                       │
//! │        CatalogError ────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing itself never fails. Everything here is raised either while an
//! item enters the cart or while a payment is being requested.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Storefront rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The catalog has no movie with this id.
    #[error("Movie not found: {0}")]
    MovieNotFound(String),

    /// A purchase was attempted on a cart with no items.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout ──► cart.is_empty()? ──yes──► EmptyCart
    ///                    │                      │
    ///                    no                     ▼
    ///                    │            "Your cart is empty"
    ///                    ▼
    ///             PaymentRequest
    /// ```
    #[error("Cart is empty")]
    EmptyCart,

    /// Payment amount is invalid.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value must be greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A decimal input was NaN, infinite or too large to hold in cents.
    #[error("{field} must be a finite amount")]
    NotFinite { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a non-numeric catalog id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
