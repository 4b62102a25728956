//! # Catalog Trait
//!
//! The storefront's view of a movie catalog.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                 ┌──────────────────────┐                                │
//! │                 │   dyn Catalog        │                                │
//! │                 │  discover / search   │                                │
//! │                 │  movie_by_id/genres  │                                │
//! │                 └──────────┬───────────┘                                │
//! │            ┌───────────────┼────────────────┐                           │
//! │            ▼               ▼                ▼                           │
//! │     TmdbCatalog      LocalCatalog      MockCatalog (tests)              │
//! │     (HTTP, online)   (movie cache)                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use mockall::automock;

use marquee_core::{Genre, Movie, MoviePage};

use crate::error::CatalogResult;

#[automock]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Lists popular movies, one page at a time (1-based).
    async fn discover(&self, page: u32) -> CatalogResult<MoviePage>;

    /// Searches by title. An empty query behaves as [`Catalog::discover`].
    async fn search(&self, query: &str, page: u32) -> CatalogResult<MoviePage>;

    /// Fetches one movie with its current list price.
    ///
    /// Returns `CatalogError::NotFound` when the catalog has no such id.
    async fn movie_by_id(&self, id: &str) -> CatalogResult<Movie>;

    /// Lists all movie genres.
    async fn genres(&self) -> CatalogResult<Vec<Genre>>;
}
