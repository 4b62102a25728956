//! # Cart Module
//!
//! The ordered list of line items a shopper intends to buy, and the
//! mutations allowed on it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Operation          Effect on items               Returned              │
//! │  ─────────          ───────────────               ────────              │
//! │  add(item)     ───► push, unless id present  ───► Added / AlreadyInCart │
//! │  remove(id)    ───► drop first match         ───► true / false          │
//! │  clear()       ───► items.clear()            ───► ()                    │
//! │                                                                         │
//! │  After every mutation the caller re-prices with `cart.pricing()`,       │
//! │  which runs CartPricingEngine over the whole list.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `item_id`
//! - Insertion order is preserved
//! - Every item passed [`validate_line_item`] on the way in, including
//!   items read back from storage
//!
//! ## Persisted Shape
//! `Cart` serializes as a bare JSON array of [`CartLineItem`]. Deserializing
//! goes through [`Cart::from_items`], so invalid rows never come back.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::pricing::{CartPricingEngine, PricingResult};
use crate::types::CartLineItem;
use crate::validation::validate_line_item;

/// What happened when an item was offered to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    /// The item was appended.
    Added,
    /// An item with the same id was already present; nothing changed.
    AlreadyInCart,
}

/// A shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

/// A stored line item that failed validation while rebuilding a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedItem {
    pub item: CartLineItem,
    pub error: ValidationError,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Builds a cart from stored items, dropping invalid rows and later
    /// duplicates of an id.
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        Cart::from_stored(items).0
    }

    /// Like [`Cart::from_items`], but also hands back the rows that failed
    /// validation so the caller can report them.
    pub fn from_stored(items: impl IntoIterator<Item = CartLineItem>) -> (Self, Vec<RejectedItem>) {
        let mut cart = Cart::new();
        let mut rejected = Vec::new();

        for item in items {
            if let Err(error) = cart.add(item.clone()) {
                rejected.push(RejectedItem { item, error });
            }
        }

        (cart, rejected)
    }

    /// Adds an item unless one with the same id is already present.
    ///
    /// ## Returns
    /// - `Ok(AddOutcome::Added)` when the item was appended
    /// - `Ok(AddOutcome::AlreadyInCart)` for a duplicate (cart unchanged)
    /// - `Err(ValidationError)` for an empty id or negative price
    pub fn add(&mut self, mut item: CartLineItem) -> Result<AddOutcome, ValidationError> {
        validate_line_item(&item)?;
        item.item_id = item.item_id.trim().to_string();

        if self.contains(&item.item_id) {
            return Ok(AddOutcome::AlreadyInCart);
        }

        self.items.push(item);
        Ok(AddOutcome::Added)
    }

    /// Removes the item with this id. Returns `false` if it was not present.
    pub fn remove(&mut self, item_id: &str) -> bool {
        match self.items.iter().position(|i| i.item_id == item_id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|i| i.item_id == item_id)
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Item ids in cart order.
    pub fn item_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.item_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Prices the cart using its stored unit prices.
    pub fn pricing(&self) -> PricingResult {
        CartPricingEngine::compute(&self.items)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CartLineItem>::deserialize(deserializer).map(Cart::from_items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
