//! # Movie Repository
//!
//! Local cache of catalog movies.
//!
//! ## Why a Cache?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TMDB ──► storefront command ──► upsert_many() ──► movies table         │
//! │                                                        │                │
//! │  seed binary ──────────────────► upsert_many() ────────┘                │
//! │                                                        │                │
//! │                                     LocalCatalog ◄─────┘ (--offline)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are stored with the row, so the offline catalog returns the same
//! list price the online one did when the movie was cached.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use marquee_core::{Money, Movie};

const MOVIE_COLUMNS: &str = "id, title, overview, poster_path, backdrop_path, genre_ids, \
                             adult, release_date, vote_average, price_cents";

#[derive(Debug, FromRow)]
struct MovieRow {
    id: String,
    title: String,
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    genre_ids: String,
    adult: bool,
    release_date: Option<String>,
    vote_average: f64,
    price_cents: i64,
}

impl MovieRow {
    fn into_movie(self) -> DbResult<Movie> {
        Ok(Movie {
            id: self.id,
            title: self.title,
            overview: self.overview,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            genre_ids: serde_json::from_str(&self.genre_ids)?,
            adult: self.adult,
            release_date: self.release_date,
            vote_average: self.vote_average,
            price: Money::from_cents(self.price_cents),
        })
    }
}

fn into_movies(rows: Vec<MovieRow>) -> DbResult<Vec<Movie>> {
    rows.into_iter().map(MovieRow::into_movie).collect()
}

/// Escapes LIKE wildcards so user text matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Repository for the movie cache.
#[derive(Debug, Clone)]
pub struct MovieRepository {
    pool: SqlitePool,
}

impl MovieRepository {
    /// Creates a new MovieRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovieRepository { pool }
    }

    /// Inserts or replaces one movie.
    pub async fn upsert(&self, movie: &Movie) -> DbResult<()> {
        let genre_ids = serde_json::to_string(&movie.genre_ids)?;

        sqlx::query(
            r#"
            INSERT INTO movies (
                id, title, overview, poster_path, backdrop_path, genre_ids,
                adult, release_date, vote_average, price_cents, cached_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                overview = excluded.overview,
                poster_path = excluded.poster_path,
                backdrop_path = excluded.backdrop_path,
                genre_ids = excluded.genre_ids,
                adult = excluded.adult,
                release_date = excluded.release_date,
                vote_average = excluded.vote_average,
                price_cents = excluded.price_cents,
                cached_at = excluded.cached_at
            "#,
        )
        .bind(&movie.id)
        .bind(&movie.title)
        .bind(&movie.overview)
        .bind(&movie.poster_path)
        .bind(&movie.backdrop_path)
        .bind(&genre_ids)
        .bind(movie.adult)
        .bind(&movie.release_date)
        .bind(movie.vote_average)
        .bind(movie.price.cents())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts or replaces a batch of movies in one transaction.
    ///
    /// ## Returns
    /// Number of movies written.
    pub async fn upsert_many(&self, movies: &[Movie]) -> DbResult<usize> {
        if movies.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        for movie in movies {
            let genre_ids = serde_json::to_string(&movie.genre_ids)?;

            sqlx::query(
                r#"
                INSERT OR REPLACE INTO movies (
                    id, title, overview, poster_path, backdrop_path, genre_ids,
                    adult, release_date, vote_average, price_cents, cached_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(&movie.id)
            .bind(&movie.title)
            .bind(&movie.overview)
            .bind(&movie.poster_path)
            .bind(&movie.backdrop_path)
            .bind(&genre_ids)
            .bind(movie.adult)
            .bind(&movie.release_date)
            .bind(movie.vote_average)
            .bind(movie.price.cents())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(count = movies.len(), "Cached movies");
        Ok(movies.len())
    }

    /// Gets a cached movie by its catalog id.
    ///
    /// ## Returns
    /// * `Ok(Movie)` - Movie cached
    /// * `Err(DbError::NotFound)` - Not in the cache
    pub async fn get(&self, id: &str) -> DbResult<Movie> {
        let sql = format!("SELECT {} FROM movies WHERE id = ?1", MOVIE_COLUMNS);

        let row: Option<MovieRow> = sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?;

        row.ok_or_else(|| DbError::not_found("Movie", id))?.into_movie()
    }

    /// Searches cached movies by title (case-insensitive substring).
    ///
    /// An empty query lists the best-rated movies instead.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Movie>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching movie cache");

        if query.is_empty() {
            return self.list(0, limit).await;
        }

        let sql = format!(
            "SELECT {} FROM movies WHERE title LIKE ?1 ESCAPE '\\' \
             ORDER BY vote_average DESC, title LIMIT ?2",
            MOVIE_COLUMNS
        );

        let rows: Vec<MovieRow> = sqlx::query_as(&sql)
            .bind(like_pattern(query))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        into_movies(rows)
    }

    /// Lists cached movies, best-rated first.
    pub async fn list(&self, offset: u32, limit: u32) -> DbResult<Vec<Movie>> {
        let sql = format!(
            "SELECT {} FROM movies ORDER BY vote_average DESC, title LIMIT ?1 OFFSET ?2",
            MOVIE_COLUMNS
        );

        let rows: Vec<MovieRow> = sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        into_movies(rows)
    }

    /// Lists cached movies tagged with a genre, best-rated first.
    pub async fn list_by_genre(&self, genre_id: u32, limit: u32) -> DbResult<Vec<Movie>> {
        let sql = format!(
            "SELECT {} FROM movies \
             WHERE EXISTS (SELECT 1 FROM json_each(movies.genre_ids) WHERE json_each.value = ?1) \
             ORDER BY vote_average DESC, title LIMIT ?2",
            MOVIE_COLUMNS
        );

        let rows: Vec<MovieRow> = sqlx::query_as(&sql)
            .bind(genre_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        into_movies(rows)
    }

    /// Number of cached movies.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use marquee_core::list_price;

    fn movie(id: &str, title: &str, vote_average: f64, genre_ids: Vec<u32>) -> Movie {
        Movie {
            id: id.to_string(),
            title: title.to_string(),
            overview: String::new(),
            poster_path: Some(format!("/{}.jpg", id)),
            backdrop_path: None,
            genre_ids,
            adult: false,
            release_date: Some("1999-10-15".to_string()),
            vote_average,
            price: list_price(vote_average),
        }
    }

    async fn seeded() -> MovieRepository {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let repo = db.movies();
        repo.upsert_many(&[
            movie("550", "Fight Club", 8.4, vec![18]),
            movie("603", "The Matrix", 8.2, vec![28, 878]),
            movie("604", "The Matrix Reloaded", 7.0, vec![28, 878]),
            movie("9999", "100% Bad_Movie", 2.1, vec![35]),
        ])
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let repo = seeded().await;

        let fight_club = repo.get("550").await.unwrap();
        assert_eq!(fight_club.title, "Fight Club");
        assert_eq!(fight_club.price, Money::from_dollars(20));
        assert_eq!(fight_club.genre_ids, vec![18]);

        assert!(matches!(repo.get("1").await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_upsert_replaces() {
        let repo = seeded().await;

        repo.upsert(&movie("550", "Fight Club (1999)", 5.0, vec![18])).await.unwrap();

        let updated = repo.get("550").await.unwrap();
        assert_eq!(updated.title, "Fight Club (1999)");
        assert_eq!(updated.price, Money::from_dollars(10));
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let repo = seeded().await;

        let results = repo.search("matrix", 10).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["603", "604"]);
    }

    #[tokio::test]
    async fn test_search_escapes_wildcards() {
        let repo = seeded().await;

        let results = repo.search("100%", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "9999");

        assert_eq!(repo.search("%", 10).await.unwrap().len(), 1);
        assert!(repo.search("fight_club", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_pages_by_rating() {
        let repo = seeded().await;

        let first = repo.list(0, 2).await.unwrap();
        assert_eq!(first[0].id, "550");
        assert_eq!(first[1].id, "603");

        let rest = repo.list(2, 10).await.unwrap();
        assert_eq!(rest.len(), 2);

        assert_eq!(repo.search("", 10).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_list_by_genre() {
        let repo = seeded().await;

        let action = repo.list_by_genre(28, 10).await.unwrap();
        assert_eq!(action.len(), 2);
        assert!(repo.list_by_genre(99, 10).await.unwrap().is_empty());
    }
}
