//! # Repository Module
//!
//! Repository implementations for the storefront database.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  storefront command                                                     │
//! │       │                                                                 │
//! │       │  db.carts().get_or_empty("default")                             │
//! │       ▼                                                                 │
//! │  CartRepository                        MovieRepository                  │
//! │  ├── get / get_or_empty                ├── upsert / upsert_many         │
//! │  ├── put (upsert)                      ├── get                          │
//! │  ├── delete (idempotent)               ├── search / list                │
//! │  └── list_ids                          └── count                        │
//! │       │                                      │                          │
//! │       ▼  SQL                                 ▼  SQL                     │
//! │  carts (cart_id → JSON list)           movies (catalog cache)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is async and returns a `DbResult`; a missing row is
//! `DbError::NotFound`, never a silent default.

pub mod cart;
pub mod movie;
