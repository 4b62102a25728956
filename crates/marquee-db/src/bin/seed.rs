//! # Movie Cache Seeder
//!
//! Fills the local movie cache so the storefront can run with `--offline`.
//!
//! ## Usage
//! ```bash
//! # Seed ./marquee_dev.db
//! cargo run -p marquee-db --bin seed
//!
//! # Specify database path, replacing anything already cached
//! cargo run -p marquee-db --bin seed -- --db ./data/marquee.db --force
//! ```
//!
//! Movies carry their real catalog ids, so a cart filled offline still
//! resolves against the live catalog later. Each list price comes from the
//! same rating tiers the online catalog uses.

use std::env;

use marquee_core::{list_price, Movie};
use marquee_db::{Database, DbConfig, DbError};

/// (id, title, release date, vote average, genre ids)
const MOVIES: &[(&str, &str, &str, f64, &[u32])] = &[
    ("278", "The Shawshank Redemption", "1994-09-23", 8.7, &[18, 80]),
    ("238", "The Godfather", "1972-03-14", 8.7, &[18, 80]),
    ("550", "Fight Club", "1999-10-15", 8.4, &[18]),
    ("680", "Pulp Fiction", "1994-09-10", 8.5, &[53, 80]),
    ("13", "Forrest Gump", "1994-06-23", 8.5, &[35, 18, 10749]),
    ("603", "The Matrix", "1999-03-31", 8.2, &[28, 878]),
    ("155", "The Dark Knight", "2008-07-16", 8.5, &[18, 28, 80, 53]),
    ("27205", "Inception", "2010-07-15", 8.4, &[28, 878, 12]),
    ("157336", "Interstellar", "2014-11-05", 8.4, &[12, 18, 878]),
    ("120", "The Lord of the Rings: The Fellowship of the Ring", "2001-12-18", 8.4, &[12, 14, 28]),
    ("862", "Toy Story", "1995-10-30", 8.0, &[16, 12, 10751, 35]),
    ("105", "Back to the Future", "1985-07-03", 8.3, &[12, 35, 878]),
    ("85", "Raiders of the Lost Ark", "1981-06-12", 7.9, &[12, 28]),
    ("329", "Jurassic Park", "1993-06-11", 7.9, &[12, 878]),
    ("11", "Star Wars", "1977-05-25", 8.2, &[12, 28, 878]),
    ("604", "The Matrix Reloaded", "2003-05-15", 7.1, &[12, 28, 53, 878]),
    ("1891", "The Empire Strikes Back", "1980-05-20", 8.4, &[12, 28, 878]),
    ("8587", "The Lion King", "1994-06-24", 8.3, &[10751, 16, 18]),
    ("597", "Titanic", "1997-11-18", 7.9, &[18, 10749]),
    ("1726", "Iron Man", "2008-04-30", 7.6, &[28, 878, 12]),
    ("49026", "The Dark Knight Rises", "2012-07-17", 7.8, &[28, 80, 18, 53]),
    ("10138", "Iron Man 2", "2010-04-28", 6.8, &[12, 28, 878]),
    ("1724", "The Incredible Hulk", "2008-06-12", 6.2, &[878, 12, 28]),
    ("8844", "Jumanji", "1995-12-15", 7.2, &[12, 14, 10751]),
    ("9340", "The Goonies", "1985-06-07", 7.5, &[12, 35, 10751]),
    ("2454", "The Chronicles of Narnia: Prince Caspian", "2008-05-15", 6.6, &[12, 10751, 14]),
    ("14161", "2012", "2009-10-10", 5.8, &[28, 12, 878]),
    ("9737", "Bad Boys", "1995-04-07", 6.8, &[28, 35, 80, 53]),
    ("10191", "How to Train Your Dragon", "2010-03-18", 7.8, &[14, 12, 16, 10751]),
    ("1593", "Night at the Museum", "2006-10-20", 6.6, &[12, 35, 10751, 14]),
    ("10196", "The Last Airbender", "2010-06-30", 4.8, &[28, 12, 14]),
    ("8859", "Catwoman", "2004-07-22", 4.6, &[28, 80]),
    ("9823", "Mortal Kombat: Annihilation", "1997-11-21", 3.9, &[28, 14, 878]),
    ("11059", "Disaster Movie", "2008-08-29", 3.1, &[35]),
    ("40016", "Birdemic: Shock and Terror", "2010-02-27", 2.2, &[53, 27, 10749]),
];

fn sample_movies() -> Vec<Movie> {
    MOVIES
        .iter()
        .map(|(id, title, release_date, vote_average, genre_ids)| Movie {
            id: id.to_string(),
            title: title.to_string(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            genre_ids: genre_ids.to_vec(),
            adult: false,
            release_date: Some(release_date.to_string()),
            vote_average: *vote_average,
            price: list_price(*vote_average),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./marquee_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Marquee Movie Cache Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./marquee_dev.db)");
                println!("  -f, --force        Re-seed even if movies are already cached");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🎬 Marquee Movie Cache Seeder");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let written = Database::scoped(DbConfig::new(&db_path), |db| async move {
        let existing = db.movies().count().await?;
        if existing > 0 && !force {
            println!("⚠ Cache already holds {} movies", existing);
            println!("  Pass --force to overwrite them.");
            return Ok::<usize, DbError>(0);
        }

        let written = db.movies().upsert_many(&sample_movies()).await?;

        let matrix = db.movies().search("matrix", 10).await?;
        println!("  Search 'matrix': {} results", matrix.len());

        Ok(written)
    })
    .await?;

    println!();
    println!("✓ Cached {} movies", written);

    Ok(())
}
