use std::path::Path;

use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use crate::error::ScrapeError;

/// One catalog entry, as extracted and as stored. `title` is the identity
/// key: re-ingesting a title replaces the whole row.
#[derive(Debug, Clone, Serialize)]
pub struct BookRow {
    pub title: String,
    pub price: String,
    pub availability: String,
    pub rating: String,
    pub description: String,
    pub image_url: String,
}

pub fn connect(path: &Path) -> Result<Connection, ScrapeError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

/// Create the books relation if it does not exist. Never drops or alters
/// existing data.
pub fn init_schema(conn: &Connection) -> Result<(), ScrapeError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS books (
            title        TEXT UNIQUE NOT NULL,
            price        TEXT,
            availability TEXT,
            rating       TEXT,
            description  TEXT,
            image_url    TEXT
        );",
    )?;
    Ok(())
}

/// Upsert a batch of books keyed on title. One transaction, committed once
/// at the end: a failure mid-batch leaves the store unchanged.
pub fn upsert_books(conn: &Connection, books: &[BookRow]) -> Result<usize, ScrapeError> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO books
             (title, price, availability, rating, description, image_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for b in books {
            stmt.execute(rusqlite::params![
                b.title,
                b.price,
                b.availability,
                b.rating,
                b.description,
                b.image_url,
            ])?;
            info!("Scraped: {} | Price: {} | Rating: {}", b.title, b.price, b.rating);
        }
    }
    tx.commit()?;
    Ok(books.len())
}

/// Full-table read in row order. Downstream consumers apply their own price
/// coercion; the stored price stays raw text.
pub fn fetch_books(conn: &Connection) -> Result<Vec<BookRow>, ScrapeError> {
    let mut stmt = conn.prepare(
        "SELECT title, price, availability, rating, description, image_url FROM books",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(BookRow {
                title: row.get(0)?,
                price: row.get(1)?,
                availability: row.get(2)?,
                rating: row.get(3)?,
                description: row.get(4)?,
                image_url: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_books(conn: &Connection) -> Result<usize, ScrapeError> {
    let n = conn.query_row("SELECT COUNT(*) FROM books", [], |r| r.get(0))?;
    Ok(n)
}

// ── Tests ──
