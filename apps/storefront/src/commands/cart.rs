//! # Cart Commands
//!
//! Cart manipulation. Every command answers with the whole cart, re-priced
//! against the catalog.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Payment  │────►│ Purchased│       │
//! │  │  Cart    │     │          │     │ Session  │     │ (deleted)│       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart       complete_purchase                  │
//! │                   remove_from_cart  (purchase.rs)                      │
//! │                        │                 │                              │
//! │                        ▼                 ▼ cancelled / expired          │
//! │                   clear_cart        back to In Cart                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::{debug, info};

use marquee_catalog::price_cart;
use marquee_core::validation::validate_item_id;
use marquee_core::{AddOutcome, Cart, CartLineItem, PricingResult};

use crate::commands::movie::cache_movies;
use crate::error::ApiError;
use crate::state::{CartState, CatalogState, DbState};

/// Cart contents with freshly computed pricing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub cart_id: String,
    /// Items with catalog-resolved titles and prices, in cart order.
    pub items: Vec<CartLineItem>,
    pub pricing: PricingResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartResponse {
    /// `already_in_cart` lets the front end say so instead of "added".
    pub outcome: AddOutcome,
    pub cart: CartView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartResponse {
    pub removed: bool,
    pub cart: CartView,
}

/// Re-prices a cart snapshot against the catalog.
async fn view_of(catalog: &CatalogState, cart_id: &str, cart: &Cart) -> Result<CartView, ApiError> {
    let (items, pricing) = price_cart(catalog.catalog(), cart, catalog.policy()).await?;
    Ok(CartView {
        cart_id: cart_id.to_string(),
        items,
        pricing,
    })
}

/// Gets the current cart with pricing.
pub async fn get_cart(catalog: &CatalogState, cart: &CartState) -> Result<CartView, ApiError> {
    debug!("get_cart command");
    let snapshot = cart.snapshot();
    view_of(catalog, cart.cart_id(), &snapshot).await
}

/// Adds a movie to the cart.
///
/// ## Behavior
/// - Movie already in cart: nothing changes, outcome `already_in_cart`
/// - Otherwise the movie is looked up, and its title and current price are
///   stored with the item
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  storefront add 550                                                     │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  1. Already in cart? ── yes ──► AlreadyInCart (no lookup)      │    │
/// │  │  2. catalog.movie_by_id("550")                                 │    │
/// │  │  3. cart.add(title + price snapshot)                           │    │
/// │  │  4. carts.put(cart_id, cart)                                   │    │
/// │  │  5. Re-price and return the cart                               │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn add_to_cart(
    catalog: &CatalogState,
    db: &DbState,
    cart: &CartState,
    movie_id: String,
) -> Result<AddToCartResponse, ApiError> {
    let movie_id = validate_item_id(&movie_id)?;
    debug!(movie_id = %movie_id, "add_to_cart command");

    let (outcome, snapshot) = if cart.with_cart(|c| c.contains(&movie_id)) {
        (AddOutcome::AlreadyInCart, cart.snapshot())
    } else {
        let movie = catalog.catalog().movie_by_id(&movie_id).await?;
        cache_movies(db, std::slice::from_ref(&movie)).await;

        let item = CartLineItem::from_movie(&movie);
        let (outcome, snapshot) = cart.with_cart_mut(|c| {
            c.add(item).map(|outcome| (outcome, c.clone()))
        })?;

        if outcome == AddOutcome::Added {
            cart.persist(db.inner(), &snapshot).await?;
            info!(movie_id = %movie_id, title = %movie.title, price = %movie.price, "Added to cart");
        }
        (outcome, snapshot)
    };

    if outcome == AddOutcome::AlreadyInCart {
        info!(movie_id = %movie_id, "Movie already in cart");
    }

    Ok(AddToCartResponse {
        outcome,
        cart: view_of(catalog, cart.cart_id(), &snapshot).await?,
    })
}

/// Removes a movie from the cart. Removing a movie that isn't there is not
/// an error; `removed` is false.
pub async fn remove_from_cart(
    catalog: &CatalogState,
    db: &DbState,
    cart: &CartState,
    movie_id: String,
) -> Result<RemoveFromCartResponse, ApiError> {
    let movie_id = movie_id.trim().to_string();
    debug!(movie_id = %movie_id, "remove_from_cart command");

    let (removed, snapshot) = cart.with_cart_mut(|c| (c.remove(&movie_id), c.clone()));

    if removed {
        cart.persist(db.inner(), &snapshot).await?;
        info!(movie_id = %movie_id, "Removed from cart");
    }

    Ok(RemoveFromCartResponse {
        removed,
        cart: view_of(catalog, cart.cart_id(), &snapshot).await?,
    })
}

/// Clears all items from the cart.
pub async fn clear_cart(
    catalog: &CatalogState,
    db: &DbState,
    cart: &CartState,
) -> Result<CartView, ApiError> {
    debug!("clear_cart command");

    let snapshot = cart.with_cart_mut(|c| {
        c.clear();
        c.clone()
    });
    cart.persist(db.inner(), &snapshot).await?;
    info!(cart_id = %cart.cart_id(), "Cart cleared");

    view_of(catalog, cart.cart_id(), &snapshot).await
}

// =============================================================================
// Unit Tests
// =============================================================================
