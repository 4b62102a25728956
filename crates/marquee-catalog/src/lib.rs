//! # marquee-catalog: Movie Catalog Collaborator
//!
//! Movie listings, search, and the current list price of every cart item.
//!
//! ## Module Organization
//!
//! - [`catalog`] - The `Catalog` trait (and `MockCatalog` for tests)
//! - [`tmdb`] - TMDB v3 HTTP implementation
//! - [`local`] - Implementation over the SQLite movie cache
//! - [`resolve`] - Concurrent price resolution for cart items
//! - [`error`] - Catalog error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use marquee_catalog::{price_cart, PricePolicy, TmdbCatalog, TmdbConfig};
//!
//! let catalog = TmdbCatalog::new(TmdbConfig::new(api_key))?;
//! let (items, pricing) = price_cart(&catalog, &cart, PricePolicy::FailFast).await?;
//! println!("Total: {}", pricing.final_total);
//! ```

pub mod catalog;
pub mod error;
pub mod local;
pub mod resolve;
pub mod tmdb;

pub use catalog::{Catalog, MockCatalog};
pub use error::{CatalogError, CatalogResult};
pub use local::LocalCatalog;
pub use resolve::{price_cart, resolve_line_items, PricePolicy};
pub use tmdb::{TmdbCatalog, TmdbConfig};
