//! # Marquee Storefront Library
//!
//! Command layer and CLI for the Marquee movie storefront.
//!
//! ## Module Organization
//! ```text
//! marquee_storefront/
//! ├── lib.rs          ◄─── You are here (runtime & logging setup)
//! ├── cli.rs          ◄─── clap definitions, output formatting
//! ├── config.rs       ◄─── StorefrontConfig (defaults → TOML → env)
//! ├── payment.rs      ◄─── PaymentSession countdown
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── cart.rs     ◄─── Cart state (Arc<Mutex<Cart>>)
//! │   └── catalog.rs  ◄─── Catalog + price policy
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── movie.rs    ◄─── Listing, search, detail, genres
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   └── purchase.rs ◄─── Payment request / completion
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod payment;
pub mod state;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::Cli;

/// Runs the storefront CLI.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Command Startup                                   │
/// │                                                                         │
/// │  1. Parse Arguments ──────────────────────────────────────────────────► │
/// │     • clap derive, global --config / --offline / --json                 │
/// │                                                                         │
/// │  2. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,marquee=debug,sqlx=warn; override with RUST_LOG     │
/// │                                                                         │
/// │  3. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → storefront.toml → MARQUEE_* → validate                 │
/// │                                                                         │
/// │  4. Open Database (scoped) ───────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │     • Closed again when the command finishes, on every path             │
/// │                                                                         │
/// │  5. Run Command ──────────────────────────────────────────────────────► │
/// │     • Catalog: TMDB, or the movie cache with --offline                  │
/// │     • Failure: message on stderr, exit code 1                           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(cli.run());

    // A stdin read left pending by an expired payment must not block exit
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = ?e.code, "Command failed: {}", e.message);
            eprintln!("Error: {}", e.message);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=marquee_catalog=trace` - Trace one crate only
/// - Default: INFO, DEBUG for marquee crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,marquee=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
