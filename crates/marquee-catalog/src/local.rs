//! # Local Catalog
//!
//! A [`Catalog`] over the SQLite movie cache, for running without network
//! access (`storefront --offline`) and for tests.

use async_trait::async_trait;

use marquee_core::{Genre, Movie, MoviePage};
use marquee_db::{Database, DbError};

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};

/// Movies per page, matching TMDB's page size.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// TMDB's movie genre list. The cache stores genre ids only.
const MOVIE_GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// [`Catalog`] backed by the local movie cache.
#[derive(Debug, Clone)]
pub struct LocalCatalog {
    db: Database,
    page_size: u32,
}

impl LocalCatalog {
    pub fn new(db: Database) -> Self {
        LocalCatalog {
            db,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn page_of(&self, page: u32, movies: Vec<Movie>, total: u64) -> MoviePage {
        let total_results = u32::try_from(total).unwrap_or(u32::MAX);
        MoviePage {
            page,
            total_pages: total_results.div_ceil(self.page_size),
            total_results,
            movies,
        }
    }
}

#[async_trait]
impl Catalog for LocalCatalog {
    async fn discover(&self, page: u32) -> CatalogResult<MoviePage> {
        let page = page.max(1);
        let offset = (page - 1).saturating_mul(self.page_size);

        let repo = self.db.movies();
        let movies = repo.list(offset, self.page_size).await?;
        let total = repo.count().await?;

        Ok(self.page_of(page, movies, total))
    }

    async fn search(&self, query: &str, page: u32) -> CatalogResult<MoviePage> {
        if query.trim().is_empty() {
            return self.discover(page).await;
        }

        // The cache answers a search with one page of best matches
        if page > 1 {
            return Ok(MoviePage {
                page,
                total_pages: 1,
                total_results: 0,
                movies: Vec::new(),
            });
        }

        let movies = self.db.movies().search(query, self.page_size).await?;
        Ok(MoviePage::single(movies))
    }

    async fn movie_by_id(&self, id: &str) -> CatalogResult<Movie> {
        match self.db.movies().get(id).await {
            Ok(movie) => Ok(movie),
            Err(DbError::NotFound { .. }) => Err(CatalogError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn genres(&self) -> CatalogResult<Vec<Genre>> {
        Ok(MOVIE_GENRES
            .iter()
            .map(|(id, name)| Genre {
                id: *id,
                name: name.to_string(),
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::{list_price, Money};
    use marquee_db::DbConfig;

    fn movie(id: &str, title: &str, vote_average: f64) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            genre_ids: vec![18],
            adult: false,
            release_date: None,
            vote_average,
            price: list_price(vote_average),
        }
    }

    async fn catalog() -> LocalCatalog {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        db.movies()
            .upsert_many(&[
                movie("1", "Alpha", 9.0),
                movie("2", "Bravo", 7.0),
                movie("3", "Charlie", 5.0),
                movie("4", "Delta", 1.0),
                movie("5", "Alpha Returns", 6.5),
            ])
            .await
            .unwrap();
        LocalCatalog::new(db).with_page_size(2)
    }

    #[tokio::test]
    async fn test_discover_pages() {
        let catalog = catalog().await;

        let first = catalog.discover(1).await.unwrap();
        assert_eq!(first.total_results, 5);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.movies[0].id, "1");

        let last = catalog.discover(3).await.unwrap();
        assert_eq!(last.movies.len(), 1);
        assert_eq!(last.movies[0].id, "4");
    }

    #[tokio::test]
    async fn test_search() {
        let catalog = catalog().await;

        let page = catalog.search("alpha", 1).await.unwrap();
        assert_eq!(page.movies.len(), 2);
        assert!(catalog.search("alpha", 2).await.unwrap().movies.is_empty());

        let all = catalog.search("  ", 1).await.unwrap();
        assert_eq!(all.total_results, 5);
    }

    #[tokio::test]
    async fn test_movie_by_id() {
        let catalog = catalog().await;

        assert_eq!(catalog.movie_by_id("2").await.unwrap().price, Money::from_dollars(15));
        assert!(catalog.movie_by_id("42").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_genres() {
        let genres = catalog().await.genres().await.unwrap();
        assert!(genres.iter().any(|g| g.id == 878 && g.name == "Science Fiction"));
    }
}
