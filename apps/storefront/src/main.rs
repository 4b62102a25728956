//! # Marquee Storefront Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Marquee Storefront                               │
//! │                                                                         │
//! │  storefront movies | search | movie | genres                            │
//! │  storefront cart | add | remove | clear                                 │
//! │  storefront purchase [--yes]                                            │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    marquee_storefront (lib)                      │  │
//! │  │  cli.rs ─────► parses, dispatches, prints                       │  │
//! │  │  commands/ ──► list_movies, add_to_cart, start_purchase         │  │
//! │  │  state/ ─────► DbState, CartState, CatalogState                 │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │              │                                   │                      │
//! │              ▼                                   ▼                      │
//! │  ┌──────────────────────┐          ┌──────────────────────────────┐    │
//! │  │   SQLite database    │          │   TMDB API (or the cache)    │    │
//! │  │   carts, movie cache │          │                              │    │
//! │  └──────────────────────┘          └──────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    marquee_storefront::run()
}
