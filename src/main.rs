mod analyze;
mod db;
mod error;
mod extract;
mod fetch;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "book_scraper", about = "Book catalog scraper")]
struct Cli {
    /// SQLite store path
    #[arg(long, default_value = "books.sqlite", global = true)]
    db: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog page and ingest every listed book
    Scrape {
        /// Catalog URL; also the base for relative image paths
        #[arg(long, default_value = fetch::CATALOG_URL)]
        url: String,
    },
    /// Price, availability and rating statistics
    Stats,
    /// List stored books
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Emit rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape { url } => {
            let body = fetch::fetch_catalog(&url)?;
            let books = extract::extract_books(&body, &url)?;
            if books.is_empty() {
                println!("No catalog entries found at {}", url);
                return Ok(());
            }
            println!("Extracted {} books", books.len());

            // The store is opened only once fetch + extraction have
            // succeeded; a failed fetch leaves it untouched.
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let stored = db::upsert_books(&conn, &books)?;
            info!("Scraping complete. Data saved to {}", cli.db.display());
            println!(
                "Stored {} books; {} holds {} unique titles",
                stored,
                cli.db.display(),
                db::count_books(&conn)?
            );
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let books = db::fetch_books(&conn)?;
            if books.is_empty() {
                println!("No data available in {}. Run 'scrape' first.", cli.db.display());
                return Ok(());
            }

            match analyze::price_stats(&books) {
                Some(p) => {
                    println!("Prices ({} of {} books priced):", p.count, books.len());
                    println!("  min:  £{:.2}", p.min);
                    println!("  max:  £{:.2}", p.max);
                    println!("  mean: £{:.2}", p.mean);
                }
                None => println!("No parseable prices."),
            }

            println!("\nAvailability:");
            for (value, count) in analyze::availability_counts(&books) {
                println!("  {:<16} {}", value, count);
            }

            println!("\nRatings:");
            for (value, count) in analyze::rating_counts(&books) {
                println!("  {:<16} {}", value, count);
            }

            println!("\nTop 5 most expensive:");
            for (book, price) in analyze::top_expensive(&books, 5) {
                println!("  £{:>6.2}  {}", price, truncate(&book.title, 48));
            }
            Ok(())
        }
        Commands::List { limit, json } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let books = db::fetch_books(&conn)?;
            if books.is_empty() {
                println!("No books stored. Run 'scrape' first.");
                return Ok(());
            }
            let shown = &books[..books.len().min(limit)];

            if json {
                println!("{}", serde_json::to_string_pretty(shown)?);
                return Ok(());
            }

            println!(
                "{:>3} | {:<40} | {:>8} | {:<14} | {:<9}",
                "#", "Title", "Price", "Availability", "Rating"
            );
            println!("{}", "-".repeat(86));
            for (i, b) in shown.iter().enumerate() {
                println!(
                    "{:>3} | {:<40} | {:>8} | {:<14} | {:<9}",
                    i + 1,
                    truncate(&b.title, 40),
                    b.price,
                    truncate(&b.availability, 14),
                    b.rating
                );
            }
            println!("\n{} of {} books", shown.len(), books.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
