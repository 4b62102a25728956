//! # Cart Repository
//!
//! Persistent cart storage: a key-value table from cart id to the cart's
//! line items, stored as one JSON array.
//!
//! ## Row Shape
//! ```text
//! ┌────────────┬──────────────────────────────────────────────┬────────────┐
//! │ cart_id    │ items                                        │ updated_at │
//! ├────────────┼──────────────────────────────────────────────┼────────────┤
//! │ "default"  │ [{"item_id":"550","title":"Fight Club",      │ 2026-...   │
//! │            │   "unit_price":2000}, ...]                   │            │
//! └────────────┴──────────────────────────────────────────────┴────────────┘
//! ```
//!
//! The whole list is rewritten on every `put`; there is no per-item row.
//! Rows read back are validated like fresh adds: an item with an empty id
//! or an out-of-range price is dropped with a warning.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use marquee_core::{Cart, CartLineItem};

#[derive(Debug, FromRow)]
struct CartRow {
    items: String,
}

/// Metadata about a stored cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCart {
    pub cart_id: String,
    pub cart: Cart,
    pub updated_at: DateTime<Utc>,
}

/// Repository for cart storage.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.carts();
///
/// let mut cart = repo.get_or_empty("default").await?;
/// cart.add(item)?;
/// repo.put("default", &cart).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Loads a cart.
    ///
    /// ## Returns
    /// * `Ok(Cart)` - Cart found
    /// * `Err(DbError::NotFound)` - No cart stored under this id
    pub async fn get(&self, cart_id: &str) -> DbResult<Cart> {
        let row: Option<CartRow> = sqlx::query_as("SELECT items FROM carts WHERE cart_id = ?1")
            .bind(cart_id)
            .fetch_optional(&self.pool)
            .await?;

        let row = row.ok_or_else(|| DbError::not_found("Cart", cart_id))?;
        let items: Vec<CartLineItem> = serde_json::from_str(&row.items)?;
        let cart = admit_items(cart_id, items);

        debug!(cart_id = %cart_id, count = cart.len(), "Loaded cart");
        Ok(cart)
    }

    /// Loads a cart, treating a missing one as empty.
    pub async fn get_or_empty(&self, cart_id: &str) -> DbResult<Cart> {
        match self.get(cart_id).await {
            Ok(cart) => Ok(cart),
            Err(DbError::NotFound { .. }) => Ok(Cart::new()),
            Err(e) => Err(e),
        }
    }

    /// Loads a cart with its last-write timestamp.
    pub async fn get_stored(&self, cart_id: &str) -> DbResult<StoredCart> {
        let row: Option<(String, String, DateTime<Utc>)> =
            sqlx::query_as("SELECT cart_id, items, updated_at FROM carts WHERE cart_id = ?1")
                .bind(cart_id)
                .fetch_optional(&self.pool)
                .await?;

        let (cart_id, items, updated_at) = row.ok_or_else(|| DbError::not_found("Cart", cart_id))?;
        let items: Vec<CartLineItem> = serde_json::from_str(&items)?;
        let cart = admit_items(&cart_id, items);

        Ok(StoredCart {
            cart_id,
            cart,
            updated_at,
        })
    }

    /// Stores a cart, replacing whatever was stored under this id.
    pub async fn put(&self, cart_id: &str, cart: &Cart) -> DbResult<()> {
        let items = serde_json::to_string(cart)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO carts (cart_id, items, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(cart_id) DO UPDATE SET
                items = excluded.items,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(cart_id)
        .bind(&items)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(cart_id = %cart_id, count = cart.len(), "Stored cart");
        Ok(())
    }

    /// Deletes a cart. Deleting a missing cart is not an error.
    ///
    /// ## Returns
    /// Whether a row was removed.
    pub async fn delete(&self, cart_id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM carts WHERE cart_id = ?1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;

        debug!(cart_id = %cart_id, removed = result.rows_affected(), "Deleted cart");
        Ok(result.rows_affected() > 0)
    }

    /// Lists stored cart ids in ascending order.
    pub async fn list_ids(&self) -> DbResult<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT cart_id FROM carts ORDER BY cart_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }
}

fn admit_items(cart_id: &str, items: Vec<CartLineItem>) -> Cart {
    let (cart, rejected) = Cart::from_stored(items);
    for row in rejected {
        warn!(
            cart_id = %cart_id,
            item_id = %row.item.item_id,
            error = %row.error,
            "Dropping invalid stored cart item"
        );
    }
    cart
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use marquee_core::Money;

    async fn db() -> Database {
        Database::open(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(CartLineItem::new("550", Some(Money::from_dollars(20))).with_title("Fight Club"))
            .unwrap();
        cart.add(CartLineItem::new("603", Some(Money::from_dollars(15)))).unwrap();
        cart
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = db().await.carts();

        assert!(matches!(repo.get("default").await, Err(DbError::NotFound { .. })));
        assert!(repo.get_or_empty("default").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_put_then_get_preserves_order() {
        let repo = db().await.carts();
        let cart = sample_cart();

        repo.put("default", &cart).await.unwrap();
        let loaded = repo.get("default").await.unwrap();

        assert_eq!(loaded, cart);
        assert_eq!(loaded.item_ids(), vec!["550".to_string(), "603".to_string()]);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let repo = db().await.carts();
        let mut cart = sample_cart();
        repo.put("default", &cart).await.unwrap();

        cart.remove("550");
        repo.put("default", &cart).await.unwrap();

        let stored = repo.get_stored("default").await.unwrap();
        assert_eq!(stored.cart.len(), 1);
        assert_eq!(stored.cart_id, "default");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = db().await.carts();
        repo.put("default", &sample_cart()).await.unwrap();

        assert!(repo.delete("default").await.unwrap());
        assert!(!repo.delete("default").await.unwrap());
        assert!(repo.get("default").await.is_err());
    }

    #[tokio::test]
    async fn test_list_ids() {
        let repo = db().await.carts();
        repo.put("b", &Cart::new()).await.unwrap();
        repo.put("a", &sample_cart()).await.unwrap();

        assert_eq!(repo.list_ids().await.unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_reads_hand_written_rows() {
        let db = db().await;
        sqlx::query("INSERT INTO carts (cart_id, items, updated_at) VALUES ('legacy', ?1, ?2)")
            .bind(r#"[{"movie_id":"13"},{"item_id":"680","unit_price":1500},{"item_id":"13"}]"#)
            .bind(Utc::now())
            .execute(db.pool())
            .await
            .unwrap();

        let cart = db.carts().get("legacy").await.unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.pricing().subtotal, Money::from_dollars(15));
    }

    #[tokio::test]
    async fn test_invalid_stored_items_are_dropped() {
        let db = db().await;
        sqlx::query("INSERT INTO carts (cart_id, items, updated_at) VALUES ('tampered', ?1, ?2)")
            .bind(r#"[{"item_id":"1","unit_price":-5000},{"item_id":"  ","unit_price":700},{"item_id":"2","unit_price":1000}]"#)
            .bind(Utc::now())
            .execute(db.pool())
            .await
            .unwrap();

        let cart = db.carts().get("tampered").await.unwrap();
        assert_eq!(cart.item_ids(), vec!["2".to_string()]);

        let pricing = cart.pricing();
        assert_eq!(pricing.final_total, Money::from_dollars(10));
        assert!(!pricing.final_total.is_negative());

        let stored = db.carts().get_stored("tampered").await.unwrap();
        assert_eq!(stored.cart, cart);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_serialization_error() {
        let db = db().await;
        sqlx::query("INSERT INTO carts (cart_id, items, updated_at) VALUES ('bad', '{oops', ?1)")
            .bind(Utc::now())
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(db.carts().get("bad").await, Err(DbError::Serialization(_))));
    }
}
