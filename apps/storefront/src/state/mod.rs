//! # State Module
//!
//! Application state for the storefront commands.
//!
//! Each command takes only the state it needs, so tests can build just
//! those pieces (an in-memory database, a `MockCatalog`, an empty cart).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      storefront (main.rs)                       │   │
//! │  │  config  = StorefrontConfig::load(..)                           │   │
//! │  │  db      = DbState::new(Database::open(..))                     │   │
//! │  │  catalog = CatalogState::new(TmdbCatalog | LocalCatalog, ..)    │   │
//! │  │  cart    = CartState::load(&db, cart_id)                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │   DbState    │  │  CartState   │  │   CatalogState   │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Database    │  │  Arc<Mutex<  │  │  Arc<dyn         │              │
//! │  │  (SQLite     │  │    Cart      │  │    Catalog>      │              │
//! │  │   pool)      │  │  >>          │  │  PricePolicy     │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • CartState: Protected by Arc<Mutex<T>>; never locked across .await   │
//! │  • CatalogState: Catalog is Send + Sync, read-only                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;
mod db;

pub use cart::CartState;
pub use catalog::CatalogState;
pub use db::DbState;
