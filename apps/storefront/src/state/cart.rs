//! # Cart State
//!
//! The in-process copy of the persisted cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Command                  Cart State Change        Persisted            │
//! │  ───────                  ─────────────────        ─────────            │
//! │                                                                         │
//! │  add_to_cart() ─────────► cart.add(item) ────────► carts.put()          │
//! │                                                                         │
//! │  remove_from_cart() ────► cart.remove(id) ───────► carts.put()          │
//! │                                                                         │
//! │  clear_cart() ──────────► cart.clear() ──────────► carts.put()          │
//! │                                                                         │
//! │  complete_purchase() ───► cart.clear() ──────────► carts.delete()       │
//! │                                                                         │
//! │  get_cart() ────────────► snapshot() (read only)                        │
//! │                                                                         │
//! │  NOTE: The lock is held only for the mutation and the snapshot clone.   │
//! │        Persisting and pricing work on the snapshot, after unlocking.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use marquee_core::Cart;
use marquee_db::{Database, DbResult};

#[derive(Debug, Clone)]
pub struct CartState {
    cart_id: String,
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates an empty, not yet persisted cart.
    pub fn new(cart_id: impl Into<String>) -> Self {
        Self::with_cart_contents(cart_id, Cart::new())
    }

    fn with_cart_contents(cart_id: impl Into<String>, cart: Cart) -> Self {
        CartState {
            cart_id: cart_id.into(),
            cart: Arc::new(Mutex::new(cart)),
        }
    }

    /// Loads the persisted cart, or starts empty if none is stored.
    pub async fn load(db: &Database, cart_id: &str) -> DbResult<Self> {
        let cart = db.carts().get_or_empty(cart_id).await?;
        debug!(cart_id = %cart_id, count = cart.len(), "Cart state loaded");
        Ok(Self::with_cart_contents(cart_id, cart))
    }

    pub fn cart_id(&self) -> &str {
        &self.cart_id
    }

    // A panic while holding the lock leaves a still-valid Vec behind
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let removed = cart_state.with_cart_mut(|cart| cart.remove("550"));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.lock();
        f(&mut cart)
    }

    /// Clones the current contents.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    /// Writes `cart` (a snapshot taken after a mutation) under this cart id.
    pub async fn persist(&self, db: &Database, cart: &Cart) -> DbResult<()> {
        db.carts().put(&self.cart_id, cart).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::{CartLineItem, Money};
    use marquee_db::DbConfig;

    fn item(id: &str) -> CartLineItem {
        CartLineItem::new(id, Some(Money::from_dollars(10)))
    }

    #[test]
    fn test_mutations_through_state() {
        let state = CartState::new("default");

        state.with_cart_mut(|c| c.add(item("550"))).unwrap();
        state.with_cart_mut(|c| c.add(item("603"))).unwrap();
        assert_eq!(state.with_cart(Cart::len), 2);

        let snapshot = state.snapshot();
        state.with_cart_mut(|c| c.clear());

        assert_eq!(snapshot.len(), 2);
        assert!(state.with_cart(Cart::is_empty));
    }

    #[tokio::test]
    async fn test_load_round_trip() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();

        let state = CartState::load(&db, "kiosk").await.unwrap();
        assert!(state.snapshot().is_empty());

        state.with_cart_mut(|c| c.add(item("550"))).unwrap();
        state.persist(&db, &state.snapshot()).await.unwrap();

        let reloaded = CartState::load(&db, "kiosk").await.unwrap();
        assert_eq!(reloaded.cart_id(), "kiosk");
        assert_eq!(reloaded.snapshot().item_ids(), vec!["550".to_string()]);
    }

    #[test]
    fn test_clones_share_the_cart() {
        let state = CartState::new("default");
        let other = state.clone();

        other.with_cart_mut(|c| c.add(item("550"))).unwrap();
        assert!(state.with_cart(|c| c.contains("550")));
    }
}
