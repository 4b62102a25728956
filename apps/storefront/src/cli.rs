//! # Command Line Interface
//!
//! Maps `storefront <command>` onto the command layer and prints the
//! answer, as text or (with `--json`) as the serialized response.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use marquee_catalog::{LocalCatalog, TmdbCatalog};
use marquee_core::{AddOutcome, Genre, PaymentRequest, Receipt};
use marquee_db::Database;

use crate::commands::{self, AddToCartResponse, CartView, MoviePageView, MovieView, RemoveFromCartResponse};
use crate::config::StorefrontConfig;
use crate::error::ApiError;
use crate::payment::{PaymentDecision, PaymentSession};
use crate::state::{CartState, CatalogState, DbState};

#[derive(Debug, Parser)]
#[command(name = "storefront", version, about = "Browse movies, fill a cart and check out", long_about = None)]
pub struct Cli {
    /// Config file (default: storefront.toml in the platform config directory)
    #[arg(long, global = true, env = "MARQUEE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Browse the local movie cache instead of the online catalog
    #[arg(long, global = true)]
    pub offline: bool,

    /// Print responses as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List popular movies
    Movies {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Search movies by title
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show one movie
    Movie { id: String },

    /// List genres
    Genres,

    /// Show the cart with its discount
    Cart,

    /// Add a movie to the cart
    Add { id: String },

    /// Remove a movie from the cart
    Remove { id: String },

    /// Empty the cart
    Clear,

    /// Check out with the mock QR payment
    Purchase {
        /// Confirm the payment without prompting
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Loads configuration, opens the database for the duration of the
    /// command, and runs it.
    pub async fn run(self) -> Result<(), ApiError> {
        let config = StorefrontConfig::load(self.config.clone())?;
        let db_config = config.db_config();

        if !db_config.is_in_memory() {
            ensure_parent_dir(&db_config.database_path)?;
        }

        Database::scoped(db_config, |db| self.dispatch(config, db)).await
    }

    async fn dispatch(self, config: StorefrontConfig, db: Database) -> Result<(), ApiError> {
        let catalog = if self.offline {
            info!("Using the local movie cache");
            CatalogState::new(LocalCatalog::new(db.clone()), config.price_policy())
        } else {
            CatalogState::new(TmdbCatalog::new(config.tmdb_config()?)?, config.price_policy())
        };
        let cart = CartState::load(&db, config.cart_id()).await?;
        let db = DbState::new(db);
        let out = Printer::new(self.json);

        match self.command {
            Command::Movies { page } => {
                let page = commands::movie::list_movies(&catalog, &db, &cart, &config, Some(page)).await?;
                out.emit(&page, print_movie_page)
            }
            Command::Search { query, page } => {
                let page = commands::movie::search_movies(
                    &catalog,
                    &db,
                    &cart,
                    &config,
                    query.join(" "),
                    Some(page),
                )
                .await?;
                out.emit(&page, print_movie_page)
            }
            Command::Movie { id } => {
                let movie = commands::movie::get_movie(&catalog, &db, &cart, &config, id).await?;
                out.emit(&movie, print_movie_detail)
            }
            Command::Genres => {
                let genres = commands::movie::list_genres(&catalog).await?;
                out.emit(&genres, |genres: &Vec<Genre>| {
                    for genre in genres {
                        println!("{:>6}  {}", genre.id, genre.name);
                    }
                })
            }
            Command::Cart => {
                let view = commands::cart::get_cart(&catalog, &cart).await?;
                out.emit(&view, print_cart)
            }
            Command::Add { id } => {
                let response = commands::cart::add_to_cart(&catalog, &db, &cart, id).await?;
                out.emit(&response, |r: &AddToCartResponse| {
                    match r.outcome {
                        AddOutcome::Added => println!("Added to cart."),
                        AddOutcome::AlreadyInCart => println!("Already in your cart."),
                    }
                    print_cart(&r.cart);
                })
            }
            Command::Remove { id } => {
                let response = commands::cart::remove_from_cart(&catalog, &db, &cart, id).await?;
                out.emit(&response, |r: &RemoveFromCartResponse| {
                    if !r.removed {
                        println!("That movie was not in your cart.");
                    }
                    print_cart(&r.cart);
                })
            }
            Command::Clear => {
                let view = commands::cart::clear_cart(&catalog, &db, &cart).await?;
                out.emit(&view, print_cart)
            }
            Command::Purchase { yes } => {
                let receipt = if yes {
                    let confirm = async { Some(PaymentDecision::Confirm) };
                    checkout(&out, &catalog, &db, &cart, &config, true, confirm, |_| {}).await?
                } else {
                    checkout(&out, &catalog, &db, &cart, &config, false, read_decision(), print_countdown)
                        .await?
                };
                out.emit(&receipt, print_receipt)
            }
        }
    }
}

/// Shows the payment request, then runs the session against `decision`.
///
/// The request is emitted (as text or JSON) before `decision` is first
/// polled, so the buyer always sees the amount before being asked.
#[allow(clippy::too_many_arguments)]
async fn checkout<D, T>(
    out: &Printer,
    catalog: &CatalogState,
    db: &DbState,
    cart: &CartState,
    config: &StorefrontConfig,
    auto_confirm: bool,
    decision: D,
    on_tick: T,
) -> Result<Receipt, ApiError>
where
    D: Future<Output = Option<PaymentDecision>>,
    T: FnMut(u64),
{
    let request = commands::purchase::start_purchase(catalog, cart, config).await?;
    out.emit(&request, |r| {
        print_payment_request(r, config.payment.timeout_secs, auto_confirm)
    })?;

    let outcome = PaymentSession::new(request.clone(), config.payment_timeout())
        .run(decision, on_tick)
        .await;

    commands::purchase::complete_purchase(db, cart, &request, outcome).await
}

fn ensure_parent_dir(path: &Path) -> Result<(), ApiError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| ApiError::internal(format!("Cannot create {}: {}", parent.display(), e))),
        _ => Ok(()),
    }
}

// =============================================================================
// Prompting
// =============================================================================

/// Waits for the buyer to answer on stdin. `None` when input closes.
async fn read_decision() -> Option<PaymentDecision> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" | "paid" => return Some(PaymentDecision::Confirm),
                "n" | "no" | "cancel" => return Some(PaymentDecision::Cancel),
                _ => eprintln!("Type 'y' once you have paid, or 'n' to cancel."),
            },
            Ok(None) | Err(_) => return None,
        }
    }
}

fn print_countdown(remaining: u64) {
    if remaining % 10 == 0 || remaining <= 5 {
        eprintln!("  {}s remaining", remaining);
    }
}

// =============================================================================
// Output
// =============================================================================

/// Writes command responses. JSON documents go to stdout, or into
/// `captured` when set.
struct Printer {
    json: bool,
    captured: Option<Mutex<Vec<String>>>,
}

impl Printer {
    fn new(json: bool) -> Self {
        Printer { json, captured: None }
    }

    fn emit<T, F>(&self, value: &T, text: F) -> Result<(), ApiError>
    where
        T: Serialize,
        F: FnOnce(&T),
    {
        if self.json {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| ApiError::internal(format!("Failed to encode response: {}", e)))?;
            match &self.captured {
                Some(lines) => lines.lock().unwrap_or_else(PoisonError::into_inner).push(json),
                None => println!("{}", json),
            }
        } else {
            text(value);
        }
        Ok(())
    }
}

fn year(release_date: Option<&str>) -> String {
    release_date
        .and_then(|d| d.get(..4))
        .map(|y| format!(" ({})", y))
        .unwrap_or_default()
}

fn print_movie_page(page: &MoviePageView) {
    println!(
        "Page {} of {} ({} movies)",
        page.page, page.total_pages, page.total_results
    );
    for movie in &page.movies {
        println!(
            "{:>8}  {}{}  {:.1}  {}{}",
            movie.id,
            movie.title,
            year(movie.release_date.as_deref()),
            movie.vote_average,
            movie.price,
            if movie.in_cart { "  [in cart]" } else { "" }
        );
    }
}

fn print_movie_detail(movie: &MovieView) {
    println!("{}{}", movie.title, year(movie.release_date.as_deref()));
    println!("Rating {:.1}   Price {}", movie.vote_average, movie.price);
    if !movie.overview.is_empty() {
        println!();
        println!("{}", movie.overview);
    }
    if let Some(poster) = &movie.poster_url {
        println!();
        println!("Poster: {}", poster);
    }
    if movie.in_cart {
        println!("In your cart.");
    }
}

fn print_cart(view: &CartView) {
    if view.items.is_empty() {
        println!("Your cart is empty.");
    }
    for item in &view.items {
        println!(
            "{:>8}  {:<40}  {:>8}",
            item.item_id,
            item.title.as_deref().unwrap_or("(untitled)"),
            item.unit_price.to_string()
        );
    }

    let pricing = &view.pricing;
    println!("{:>52}  {:>8}", "Subtotal", pricing.subtotal.to_string());
    if !pricing.discount_rate.is_zero() {
        println!(
            "{:>52}  {:>8}",
            format!("Discount ({})", pricing.discount_rate),
            format!("-{}", pricing.discount_amount)
        );
    }
    println!("{:>52}  {:>8}", "Total", pricing.final_total.to_string());
    if let Some(message) = &pricing.upsell_message {
        println!();
        println!("{}", message);
    }
}

fn print_payment_request(request: &PaymentRequest, timeout_secs: u64, auto_confirm: bool) {
    println!("Amount to pay: {}", request.amount);
    println!("QR payload:    {}", request.qr_payload);
    println!();
    println!("Or transfer to:");
    println!("  Bank name:      {}", request.bank.bank_name);
    println!("  Account number: {}", request.bank.account_number);
    println!("  Account name:   {}", request.bank.account_name);
    println!("  SWIFT code:     {}", request.bank.swift_code);
    println!();
    if !auto_confirm {
        println!(
            "You have {} seconds. Type 'y' once paid, or 'n' to cancel.",
            timeout_secs
        );
    }
}

fn print_receipt(receipt: &Receipt) {
    println!("Payment complete. Thank you!");
    println!("  Reference: {}", receipt.reference);
    println!("  Amount:    {}", receipt.amount);
    println!("  Movies:    {}", receipt.item_count);
    println!("  Paid at:   {}", receipt.paid_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    use marquee_catalog::{MockCatalog, PricePolicy};
    use marquee_core::{list_price, CartLineItem, Money, Movie};
    use marquee_db::DbConfig;

    impl Printer {
        fn capturing() -> Self {
            Printer {
                json: true,
                captured: Some(Mutex::new(Vec::new())),
            }
        }

        fn documents(&self) -> Vec<serde_json::Value> {
            self.captured
                .as_ref()
                .map(|lines| {
                    lines
                        .lock()
                        .unwrap()
                        .iter()
                        .map(|l| serde_json::from_str(l).unwrap())
                        .collect()
                })
                .unwrap_or_default()
        }
    }

    fn ten_dollar_catalog() -> CatalogState {
        let mut mock = MockCatalog::new();
        mock.expect_movie_by_id().returning(|id| {
            Ok(Movie {
                id: id.to_string(),
                title: format!("Movie {}", id),
                overview: String::new(),
                poster_path: None,
                backdrop_path: None,
                genre_ids: Vec::new(),
                adult: false,
                release_date: None,
                vote_average: 3.5,
                price: list_price(3.5),
            })
        });
        CatalogState::new(mock, PricePolicy::FailFast)
    }

    async fn four_item_cart() -> (DbState, CartState) {
        let db = DbState::new(Database::open(DbConfig::in_memory()).await.unwrap());
        let cart = CartState::new("default");
        for id in ["1", "2", "3", "4"] {
            cart.with_cart_mut(|c| c.add(CartLineItem::new(id, Some(Money::from_dollars(10)))))
                .unwrap();
        }
        (db, cart)
    }

    #[tokio::test]
    async fn test_json_checkout_emits_request_before_asking() {
        let (db, cart) = four_item_cart().await;
        let config = StorefrontConfig::default();
        let out = Printer::capturing();

        let decision = async {
            let shown = out.documents();
            assert_eq!(shown.len(), 1);
            assert_eq!(shown[0]["qr_payload"], "payment:36.00");
            assert_eq!(shown[0]["amount"], 3600);
            Some(PaymentDecision::Confirm)
        };

        let receipt = checkout(&out, &ten_dollar_catalog(), &db, &cart, &config, false, decision, |_| {})
            .await
            .unwrap();

        assert_eq!(receipt.amount, Money::from_dollars(36));
        assert_eq!(out.documents().len(), 1);
        assert!(cart.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_declined_checkout_still_showed_request() {
        let (db, cart) = four_item_cart().await;
        let config = StorefrontConfig::default();
        let out = Printer::capturing();

        let err = checkout(
            &out,
            &ten_dollar_catalog(),
            &db,
            &cart,
            &config,
            false,
            async { Some(PaymentDecision::Cancel) },
            |_| {},
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, crate::error::ErrorCode::PaymentCancelled);
        assert_eq!(out.documents()[0]["item_count"], 4);
        assert_eq!(cart.snapshot().len(), 4);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["storefront", "search", "the", "matrix", "--offline", "--json"])
            .unwrap();

        assert!(cli.offline);
        assert!(cli.json);
        match cli.command {
            Command::Search { query, page } => {
                assert_eq!(query.join(" "), "the matrix");
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_purchase_and_page() {
        let cli = Cli::try_parse_from(["storefront", "purchase", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Purchase { yes: true }));

        let cli = Cli::try_parse_from(["storefront", "movies", "--page", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Movies { page: 3 }));
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["storefront", "search"]).is_err());
    }

    #[test]
    fn test_year() {
        assert_eq!(year(Some("1999-10-15")), " (1999)");
        assert_eq!(year(None), "");
        assert_eq!(year(Some("")), "");
    }
}
