//! # Movie Commands
//!
//! Browsing the catalog. Every movie fetched here is also written to the
//! local movie cache, which is what `--offline` reads from later.

use serde::Serialize;
use tracing::{debug, warn};

use marquee_core::validation::{validate_item_id, validate_page, validate_search_query};
use marquee_core::{Genre, Money, Movie, MoviePage};

use crate::config::StorefrontConfig;
use crate::error::ApiError;
use crate::state::{CartState, CatalogState, DbState};

/// A movie as shown to the buyer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub id: String,
    pub title: String,
    pub overview: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genre_ids: Vec<u32>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub price: Money,
    pub in_cart: bool,
}

impl MovieView {
    pub fn new(movie: Movie, config: &StorefrontConfig, cart: &CartState) -> Self {
        let in_cart = cart.with_cart(|c| c.contains(&movie.id));
        MovieView {
            poster_url: movie.poster_path.as_deref().map(|p| config.image_url(p)),
            backdrop_url: movie.backdrop_path.as_deref().map(|p| config.image_url(p)),
            id: movie.id,
            title: movie.title,
            overview: movie.overview,
            genre_ids: movie.genre_ids,
            release_date: movie.release_date,
            vote_average: movie.vote_average,
            price: movie.price,
            in_cart,
        }
    }
}

/// One page of movies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePageView {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub movies: Vec<MovieView>,
}

impl MoviePageView {
    fn new(page: MoviePage, config: &StorefrontConfig, cart: &CartState) -> Self {
        MoviePageView {
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
            movies: page
                .movies
                .into_iter()
                .map(|m| MovieView::new(m, config, cart))
                .collect(),
        }
    }
}

/// Writes fetched movies to the cache. A failed write is logged, never
/// returned: browsing works without the cache.
pub(crate) async fn cache_movies(db: &DbState, movies: &[Movie]) {
    if movies.is_empty() {
        return;
    }

    match db.inner().movies().upsert_many(movies).await {
        Ok(count) => debug!(count, "Cached movies"),
        Err(e) => warn!(error = %e, "Failed to cache movies"),
    }
}

/// Lists popular movies.
///
/// ## Arguments
/// * `page` - 1-based page number (default: 1)
pub async fn list_movies(
    catalog: &CatalogState,
    db: &DbState,
    cart: &CartState,
    config: &StorefrontConfig,
    page: Option<u32>,
) -> Result<MoviePageView, ApiError> {
    let page = validate_page(page.unwrap_or(1))?;
    debug!(page, "list_movies command");

    let result = catalog.catalog().discover(page).await?;
    cache_movies(db, &result.movies).await;

    Ok(MoviePageView::new(result, config, cart))
}

/// Searches movies by title. A blank query lists popular movies instead.
pub async fn search_movies(
    catalog: &CatalogState,
    db: &DbState,
    cart: &CartState,
    config: &StorefrontConfig,
    query: String,
    page: Option<u32>,
) -> Result<MoviePageView, ApiError> {
    let query = validate_search_query(&query)?;
    let page = validate_page(page.unwrap_or(1))?;
    debug!(query = %query, page, "search_movies command");

    let result = catalog.catalog().search(&query, page).await?;
    cache_movies(db, &result.movies).await;

    Ok(MoviePageView::new(result, config, cart))
}

/// Gets one movie with its current list price.
pub async fn get_movie(
    catalog: &CatalogState,
    db: &DbState,
    cart: &CartState,
    config: &StorefrontConfig,
    movie_id: String,
) -> Result<MovieView, ApiError> {
    let movie_id = validate_item_id(&movie_id)?;
    debug!(movie_id = %movie_id, "get_movie command");

    let movie = catalog.catalog().movie_by_id(&movie_id).await?;
    cache_movies(db, std::slice::from_ref(&movie)).await;

    Ok(MovieView::new(movie, config, cart))
}

/// Lists all genres.
pub async fn list_genres(catalog: &CatalogState) -> Result<Vec<Genre>, ApiError> {
    debug!("list_genres command");
    Ok(catalog.catalog().genres().await?)
}
