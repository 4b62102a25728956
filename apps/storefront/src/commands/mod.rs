//! # Storefront Commands
//!
//! Everything a front end can ask the storefront to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── movie.rs     ◄─── Listing, search, detail, genres
//! ├── cart.rs      ◄─── Cart manipulation + fresh pricing
//! └── purchase.rs  ◄─── Payment request and completion
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  storefront add 550                                                     │
//! │         │                                                               │
//! │         │ (clap parses into Command::Add)                               │
//! │         ▼                                                               │
//! │  commands::cart::add_to_cart(                                           │
//! │      &catalog,       ◄── CatalogState                                   │
//! │      &db,            ◄── DbState                                        │
//! │      &cart,          ◄── CartState                                      │
//! │      movie_id,       ◄── From the command line                          │
//! │  ) -> Result<AddToCartResponse, ApiError>                               │
//! │         │                                                               │
//! │         │ (printed as text, or as JSON with --json)                     │
//! │         ▼                                                               │
//! │  "Added Fight Club. 1 item(s), total $20.00"                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command declares only the state it needs.

pub mod cart;
pub mod movie;
pub mod purchase;

pub use cart::{AddToCartResponse, CartView, RemoveFromCartResponse};
pub use movie::{MoviePageView, MovieView};
