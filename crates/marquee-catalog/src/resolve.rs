//! # Price Resolution
//!
//! Refreshes cart line items against the catalog before pricing.
//!
//! ## Fan-out
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  cart: [550, 603, 680]                                                  │
//! │          │    │    │                                                    │
//! │          ▼    ▼    ▼        all lookups in flight at once (join_all)    │
//! │   movie_by_id(550) movie_by_id(603) movie_by_id(680)                    │
//! │          │    │    │                                                    │
//! │          └────┴────┘        wait for every one to settle                │
//! │               │                                                         │
//! │               ├── all Ok ───────────► items in cart order ──► compute   │
//! │               └── any Err ──┬─ FailFast ──────► CatalogError            │
//! │                             └─ UseStoredPrice ► stored snapshot price   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use marquee_core::{Cart, CartLineItem, CartPricingEngine, PricingResult};

use crate::catalog::Catalog;
use crate::error::CatalogResult;

/// What to do when a catalog lookup fails during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    /// Any failed lookup fails the whole resolution.
    #[default]
    FailFast,
    /// A failed lookup keeps the price stored when the item was added.
    UseStoredPrice,
}

impl PricePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricePolicy::FailFast => "fail_fast",
            PricePolicy::UseStoredPrice => "use_stored_price",
        }
    }
}

impl fmt::Display for PricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fail_fast" => Ok(PricePolicy::FailFast),
            "use_stored_price" => Ok(PricePolicy::UseStoredPrice),
            other => Err(format!(
                "unknown price policy '{}', expected fail_fast or use_stored_price",
                other
            )),
        }
    }
}

/// Looks up every item's current price concurrently.
///
/// Returns the items in their original order with title and unit price
/// taken from the catalog. Under [`PricePolicy::FailFast`] the first failure
/// (in cart order) is returned once every lookup has settled.
pub async fn resolve_line_items(
    catalog: &dyn Catalog,
    items: &[CartLineItem],
    policy: PricePolicy,
) -> CatalogResult<Vec<CartLineItem>> {
    let lookups = items.iter().map(|item| catalog.movie_by_id(&item.item_id));
    let results = join_all(lookups).await;

    let mut resolved = Vec::with_capacity(items.len());
    for (item, result) in items.iter().zip(results) {
        match result {
            Ok(movie) => resolved.push(CartLineItem {
                item_id: item.item_id.clone(),
                title: Some(movie.title),
                unit_price: movie.price,
            }),
            Err(e) => match policy {
                PricePolicy::FailFast => {
                    warn!(item_id = %item.item_id, error = %e, "Price lookup failed");
                    return Err(e);
                }
                PricePolicy::UseStoredPrice => {
                    warn!(
                        item_id = %item.item_id,
                        error = %e,
                        "Price lookup failed, using stored price"
                    );
                    resolved.push(item.clone());
                }
            },
        }
    }

    debug!(count = resolved.len(), policy = %policy, "Resolved cart prices");
    Ok(resolved)
}

/// Resolves a cart's prices and runs the pricing engine over the result.
pub async fn price_cart(
    catalog: &dyn Catalog,
    cart: &Cart,
    policy: PricePolicy,
) -> CatalogResult<(Vec<CartLineItem>, PricingResult)> {
    let items = resolve_line_items(catalog, cart.items(), policy).await?;
    let pricing = CartPricingEngine::compute(&items);
    Ok((items, pricing))
}

// =============================================================================
// Unit Tests
// =============================================================================
