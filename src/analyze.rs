use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::db::BookRow;

static NON_NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\d.]").unwrap());

/// Read-side price coercion: strip everything but digits and dots from the
/// stored text and parse the remainder. "£51.77" -> 51.77.
pub fn parse_price(raw: &str) -> Option<f64> {
    NON_NUMERIC.replace_all(raw, "").parse().ok()
}

pub struct PriceStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Summary over the parseable prices; None when no price parses.
pub fn price_stats(books: &[BookRow]) -> Option<PriceStats> {
    let prices: Vec<f64> = books.iter().filter_map(|b| parse_price(&b.price)).collect();
    if prices.is_empty() {
        return None;
    }
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    Some(PriceStats {
        count: prices.len(),
        min,
        max,
        mean,
    })
}

/// Stock-status counts, matched case-insensitively and trimmed.
pub fn availability_counts(books: &[BookRow]) -> Vec<(String, usize)> {
    value_counts(books.iter().map(|b| b.availability.trim().to_lowercase()))
}

pub fn rating_counts(books: &[BookRow]) -> Vec<(String, usize)> {
    value_counts(books.iter().map(|b| b.rating.clone()))
}

fn value_counts(values: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let mut out: Vec<_> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// The n highest-priced books, descending. Books without a parseable price
/// are skipped.
pub fn top_expensive(books: &[BookRow], n: usize) -> Vec<(&BookRow, f64)> {
    let mut priced: Vec<(&BookRow, f64)> = books
        .iter()
        .filter_map(|b| parse_price(&b.price).map(|p| (b, p)))
        .collect();
    priced.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    priced.truncate(n);
    priced
}

// ── Tests ──
