//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  CLI / front end             Command Layer                              │
//! │  ───────────────             ─────────────                              │
//! │                                                                         │
//! │  storefront add 550                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Catalog Error? ─── CatalogError::NotFound("550") ──┐           │  │
//! │  │         │                                           │           │  │
//! │  │         ▼                                           ▼           │  │
//! │  │  Database Error? ─── DbError::QueryFailed ──────► ApiError ────►│  │
//! │  │         │                                           ▲           │  │
//! │  │         ▼                                           │           │  │
//! │  │  Rule Error? ─── CoreError::EmptyCart ──────────────┘           │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "EMPTY_CART", "message": "Your cart is empty" }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal details (SQL errors, HTTP bodies) are logged, never returned.

use serde::Serialize;

use marquee_catalog::CatalogError;
use marquee_core::{CoreError, PaymentOutcome, ValidationError};
use marquee_db::DbError;

use crate::config::ConfigError;

/// API error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Movie not found: 550"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,

    /// The movie catalog could not be reached or answered badly (502)
    CatalogUnavailable,

    /// Purchase attempted with nothing in the cart
    EmptyCart,

    /// Payment request could not be built
    PaymentError,

    /// The buyer backed out of the payment
    PaymentCancelled,

    /// The payment window ran out
    PaymentExpired,

    /// Bad or incomplete configuration
    ConfigError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn empty_cart() -> Self {
        ApiError::new(ErrorCode::EmptyCart, "Your cart is empty")
    }

    /// The failed-purchase error for a session that did not complete.
    ///
    /// Returns `None` for [`PaymentOutcome::Completed`].
    pub fn for_outcome(outcome: PaymentOutcome) -> Option<Self> {
        match outcome {
            PaymentOutcome::Completed => None,
            PaymentOutcome::Cancelled => Some(ApiError::new(
                ErrorCode::PaymentCancelled,
                "Payment was cancelled; your cart was kept",
            )),
            PaymentOutcome::Expired => Some(ApiError::new(
                ErrorCode::PaymentExpired,
                "Payment time ran out; your cart was kept",
            )),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored data unreadable: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Stored cart could not be read")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts catalog errors to API errors.
impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => ApiError::not_found("Movie", &id),
            CatalogError::Http(e) => {
                tracing::error!("Catalog request failed: {}", e);
                ApiError::new(ErrorCode::CatalogUnavailable, "Movie catalog is unreachable")
            }
            CatalogError::UnexpectedStatus { status, body } => {
                tracing::error!(status, body = %body, "Catalog returned an error status");
                ApiError::new(
                    ErrorCode::CatalogUnavailable,
                    format!("Movie catalog returned HTTP {}", status),
                )
            }
            CatalogError::InvalidResponse(e) => {
                tracing::error!("Catalog response unreadable: {}", e);
                ApiError::new(ErrorCode::CatalogUnavailable, "Movie catalog sent an unreadable response")
            }
            CatalogError::Storage(e) => ApiError::from(e),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MovieNotFound(id) => ApiError::not_found("Movie", &id),
            CoreError::EmptyCart => ApiError::empty_cart(),
            CoreError::InvalidPaymentAmount { reason } => ApiError::new(
                ErrorCode::PaymentError,
                format!("Invalid payment amount: {}", reason),
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::empty_cart()).unwrap();
        assert_eq!(json["code"], "EMPTY_CART");
        assert_eq!(json["message"], "Your cart is empty");
    }

    #[test]
    fn test_not_found_conversions() {
        let from_catalog = ApiError::from(CatalogError::NotFound("550".into()));
        assert_eq!(from_catalog.code, ErrorCode::NotFound);
        assert_eq!(from_catalog.message, "Movie not found: 550");

        let from_db = ApiError::from(DbError::not_found("Cart", "default"));
        assert_eq!(from_db.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = ApiError::from(DbError::QueryFailed("no such table: carts".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("carts"));

        let err = ApiError::from(CatalogError::UnexpectedStatus {
            status: 401,
            body: "Invalid API key".into(),
        });
        assert_eq!(err.code, ErrorCode::CatalogUnavailable);
        assert!(!err.message.contains("API key"));
    }

    #[test]
    fn test_storage_errors_inside_catalog_keep_their_code() {
        let err = ApiError::from(CatalogError::Storage(DbError::PoolExhausted));
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_outcome_errors() {
        assert!(ApiError::for_outcome(PaymentOutcome::Completed).is_none());
        assert_eq!(
            ApiError::for_outcome(PaymentOutcome::Cancelled).map(|e| e.code),
            Some(ErrorCode::PaymentCancelled)
        );
        assert_eq!(
            ApiError::for_outcome(PaymentOutcome::Expired).map(|e| e.code),
            Some(ErrorCode::PaymentExpired)
        );
    }

    #[test]
    fn test_core_errors() {
        assert_eq!(ApiError::from(CoreError::EmptyCart).code, ErrorCode::EmptyCart);

        let err = ApiError::from(ValidationError::Required {
            field: "movie_id".into(),
        });
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "movie_id is required");
    }
}
