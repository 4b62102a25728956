//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Movie       │   │  CartLineItem   │   │  DiscountRate   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (upstream)  │──►│  item_id        │   │  bps (u32)      │       │
//! │  │  title          │   │  title          │   │  0 / 1000 / 2000│       │
//! │  │  vote_average   │   │  unit_price     │   └─────────────────┘       │
//! │  │  price          │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │     Genre       │   │   MoviePage     │                             │
//! │  │  id, name       │   │  page, movies   │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Movie ids are the catalog's own ids. Nothing in the storefront generates
//! item ids locally, so the same movie always maps to the same cart line.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Discount Rate
// =============================================================================

/// Cart discount rate in basis points (1000 bps = 10%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// No discount.
    pub const NONE: DiscountRate = DiscountRate(0);

    /// 10% off.
    pub const TEN_PERCENT: DiscountRate = DiscountRate(1000);

    /// 20% off.
    pub const TWENTY_PERCENT: DiscountRate = DiscountRate(2000);

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (`0.10` for 10%), for display only.
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Returns the rate as a whole percentage (`10` for 10%).
    #[inline]
    pub const fn percent(&self) -> u32 {
        self.0 / 100
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One entry in a cart.
///
/// ## Persisted Shape
/// Carts are stored as a JSON list of these:
/// ```json
/// [{ "item_id": "550", "title": "Fight Club", "unit_price": 2000 }]
/// ```
/// `movie_id` is accepted as an alias for `item_id`, and a missing
/// `unit_price` reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLineItem {
    /// Upstream catalog id.
    #[serde(alias = "movie_id")]
    pub item_id: String,

    /// Title snapshot taken when the item was added.
    #[serde(default)]
    pub title: Option<String>,

    /// Unit price in cents.
    #[serde(default)]
    pub unit_price: Money,
}

impl CartLineItem {
    /// Creates a line item; a missing price is treated as zero.
    pub fn new(item_id: impl Into<String>, unit_price: Option<Money>) -> Self {
        CartLineItem {
            item_id: item_id.into(),
            title: None,
            unit_price: unit_price.unwrap_or_default(),
        }
    }

    /// Sets the title snapshot.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Creates a line item from a catalog movie, snapshotting title and price.
    pub fn from_movie(movie: &Movie) -> Self {
        CartLineItem {
            item_id: movie.id.clone(),
            title: Some(movie.title.clone()),
            unit_price: movie.price,
        }
    }
}

// =============================================================================
// Movie
// =============================================================================

/// A movie as listed by the catalog, with its storefront list price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Movie {
    /// Upstream catalog id.
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub overview: String,

    /// Poster image path relative to the catalog's image host.
    #[serde(default)]
    pub poster_path: Option<String>,

    #[serde(default)]
    pub backdrop_path: Option<String>,

    #[serde(default)]
    pub genre_ids: Vec<u32>,

    #[serde(default)]
    pub adult: bool,

    /// Release date as sent by the catalog (`YYYY-MM-DD`), if any.
    #[serde(default)]
    pub release_date: Option<String>,

    /// Average user rating, 0-10.
    #[serde(default)]
    pub vote_average: f64,

    /// List price derived from `vote_average`.
    pub price: Money,
}

// =============================================================================
// Genre
// =============================================================================

/// A catalog genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

// =============================================================================
// Movie Page
// =============================================================================

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MoviePage {
    /// 1-based page number.
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub movies: Vec<Movie>,
}

impl MoviePage {
    /// A single page holding `movies`.
    pub fn single(movies: Vec<Movie>) -> Self {
        let total_results = movies.len() as u32;
        MoviePage {
            page: 1,
            total_pages: 1,
            total_results,
            movies,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_rate_views() {
        assert_eq!(DiscountRate::TEN_PERCENT.bps(), 1000);
        assert_eq!(DiscountRate::TEN_PERCENT.percent(), 10);
        assert!((DiscountRate::TWENTY_PERCENT.fraction() - 0.20).abs() < f64::EPSILON);
        assert!(DiscountRate::NONE.is_zero());
        assert_eq!(DiscountRate::TWENTY_PERCENT.to_string(), "20%");
    }

    #[test]
    fn test_line_item_missing_price_is_zero() {
        let item = CartLineItem::new("550", None);
        assert_eq!(item.unit_price, Money::zero());
        assert_eq!(item.title, None);
    }

    #[test]
    fn test_line_item_deserialize_defaults() {
        let item: CartLineItem = serde_json::from_str(r#"{ "movie_id": "603" }"#).unwrap();
        assert_eq!(item.item_id, "603");
        assert_eq!(item.unit_price, Money::zero());

        let item: CartLineItem =
            serde_json::from_str(r#"{ "item_id": "13", "title": "Forrest Gump", "unit_price": 2000 }"#)
                .unwrap();
        assert_eq!(item.title.as_deref(), Some("Forrest Gump"));
        assert_eq!(item.unit_price, Money::from_dollars(20));
    }

    #[test]
    fn test_line_item_from_movie() {
        let movie = Movie {
            id: "680".to_string(),
            title: "Pulp Fiction".to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            genre_ids: vec![53, 80],
            adult: false,
            release_date: Some("1994-09-10".to_string()),
            vote_average: 8.5,
            price: Money::from_dollars(20),
        };

        let item = CartLineItem::from_movie(&movie);
        assert_eq!(item.item_id, "680");
        assert_eq!(item.title.as_deref(), Some("Pulp Fiction"));
        assert_eq!(item.unit_price, Money::from_dollars(20));
    }

    #[test]
    fn test_movie_page_single() {
        let page = MoviePage::single(Vec::new());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_results, 0);
    }
}
