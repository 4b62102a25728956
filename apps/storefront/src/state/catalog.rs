//! # Catalog State
//!
//! The catalog every command talks to, chosen once at startup, plus the
//! price policy used when a cart is re-priced.

use std::fmt;
use std::sync::Arc;

use marquee_catalog::{Catalog, PricePolicy};

#[derive(Clone)]
pub struct CatalogState {
    catalog: Arc<dyn Catalog>,
    policy: PricePolicy,
}

impl CatalogState {
    pub fn new(catalog: impl Catalog + 'static, policy: PricePolicy) -> Self {
        CatalogState {
            catalog: Arc::new(catalog),
            policy,
        }
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    pub fn policy(&self) -> PricePolicy {
        self.policy
    }
}

impl fmt::Debug for CatalogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogState")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
