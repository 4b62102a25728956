//! # Catalog Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  reqwest::Error ───────────► CatalogError::Http                         │
//! │  non-2xx response ─────────► CatalogError::UnexpectedStatus             │
//! │  404 on /movie/{id} ───────► CatalogError::NotFound                     │
//! │  DbError (LocalCatalog) ───► CatalogError::Storage                      │
//! │  undecodable body ─────────► CatalogError::InvalidResponse              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any of these during price resolution aborts the whole resolution under
//! the default policy; the pricing engine never sees partial data.

use marquee_db::DbError;
use thiserror::Error;

/// Errors from a catalog lookup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no movie with this id.
    #[error("movie not found in catalog: {0}")]
    NotFound(String),

    /// An HTTP transport or decoding error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-2xx status.
    #[error("catalog returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The offline catalog's storage failed.
    #[error("catalog storage error: {0}")]
    Storage(#[from] DbError),

    /// The catalog answered 2xx with a body we can't use.
    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CatalogError::NotFound("550".to_string()).to_string(),
            "movie not found in catalog: 550"
        );
        assert_eq!(
            CatalogError::UnexpectedStatus {
                status: 401,
                body: "Invalid API key".to_string()
            }
            .to_string(),
            "catalog returned status 401: Invalid API key"
        );
    }

    #[test]
    fn test_storage_not_found_is_not_catalog_not_found() {
        let err: CatalogError = DbError::not_found("Movie", "1").into();
        assert!(!err.is_not_found());
    }
}
