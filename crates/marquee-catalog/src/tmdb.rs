//! # TMDB Catalog
//!
//! HTTP client for The Movie Database v3 API.
//!
//! ## Endpoints
//! ```text
//! ┌──────────────────────────┬─────────────────────────┬──────────────────┐
//! │ Catalog method           │ GET                     │ Params           │
//! ├──────────────────────────┼─────────────────────────┼──────────────────┤
//! │ discover(page)           │ /discover/movie         │ api_key, page    │
//! │ search(query, page)      │ /search/movie           │ + query          │
//! │ movie_by_id(id)          │ /movie/{id}             │ api_key          │
//! │ genres()                 │ /genre/movie/list       │ api_key          │
//! └──────────────────────────┴─────────────────────────┴──────────────────┘
//! ```
//!
//! TMDB sends no prices. Every movie leaves this module with a list price
//! derived from its `vote_average` (see [`marquee_core::list_price`]).
//! The TMDB id becomes the movie id as-is.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use marquee_core::{list_price, Genre, Movie, MoviePage};

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};

/// Public TMDB v3 API root.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Configuration for the TMDB client.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// API root, e.g. `"https://api.themoviedb.org/3"`.
    pub base_url: String,

    /// v3 API key.
    pub api_key: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        TmdbConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// [`Catalog`] backed by the TMDB HTTP API.
#[derive(Debug, Clone)]
pub struct TmdbCatalog {
    config: TmdbConfig,
    http: Client,
}

impl TmdbCatalog {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend can't be initialised.
    pub fn new(config: TmdbConfig) -> CatalogResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(TmdbCatalog { config, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> CatalogResult<Result<T, StatusCode>> {
        let url = self.endpoint(path);
        debug!(url = %url, "Catalog request");

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Err(status));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), url = %url, "Catalog request failed");
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed = serde_json::from_slice(&bytes)
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        Ok(Ok(parsed))
    }

    async fn get_page(&self, path: &str, params: &[(&str, String)]) -> CatalogResult<MoviePage> {
        match self.get_json::<TmdbPage>(path, params).await? {
            Ok(page) => Ok(page.into_movie_page()),
            Err(status) => Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                body: String::new(),
            }),
        }
    }
}

#[async_trait]
impl Catalog for TmdbCatalog {
    async fn discover(&self, page: u32) -> CatalogResult<MoviePage> {
        self.get_page("/discover/movie", &[("page", page.to_string())]).await
    }

    async fn search(&self, query: &str, page: u32) -> CatalogResult<MoviePage> {
        let query = query.trim();
        if query.is_empty() {
            return self.discover(page).await;
        }

        self.get_page(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn movie_by_id(&self, id: &str) -> CatalogResult<Movie> {
        // Only numeric ids exist upstream; anything else would hit another route
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        match self.get_json::<TmdbMovie>(&format!("/movie/{}", id), &[]).await? {
            Ok(movie) => Ok(movie.into_movie()),
            Err(_) => Err(CatalogError::NotFound(id.to_string())),
        }
    }

    async fn genres(&self) -> CatalogResult<Vec<Genre>> {
        match self.get_json::<TmdbGenres>("/genre/movie/list", &[]).await? {
            Ok(list) => Ok(list.genres),
            Err(status) => Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                body: String::new(),
            }),
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct TmdbPage {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    results: Vec<TmdbMovie>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl TmdbPage {
    fn into_movie_page(self) -> MoviePage {
        MoviePage {
            page: self.page,
            total_pages: self.total_pages,
            total_results: self.total_results,
            movies: self.results.into_iter().map(TmdbMovie::into_movie).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    /// List endpoints send ids only.
    #[serde(default)]
    genre_ids: Vec<u32>,
    /// `/movie/{id}` sends full genre objects instead.
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    adult: bool,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

impl TmdbMovie {
    fn into_movie(self) -> Movie {
        let genre_ids = if self.genre_ids.is_empty() {
            self.genres.iter().map(|g| g.id).collect()
        } else {
            self.genre_ids
        };
        let vote_average = self.vote_average.unwrap_or_default();

        Movie {
            id: self.id.to_string(),
            title: self.title,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            genre_ids,
            adult: self.adult,
            // Unreleased titles come through as ""
            release_date: self.release_date.filter(|d| !d.is_empty()),
            vote_average,
            price: list_price(vote_average),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmdbGenres {
    genres: Vec<Genre>,
}

// =============================================================================
// Unit Tests
// =============================================================================
