use tracing::info;

use crate::error::ScrapeError;

/// Default catalog page. Relative image paths are resolved against it.
pub const CATALOG_URL: &str = "http://books.toscrape.com/";

/// Fetch the catalog page body with a single blocking GET. No retries;
/// a non-success status is an error.
pub fn fetch_catalog(url: &str) -> Result<String, ScrapeError> {
    info!("Fetching catalog: {}", url);
    let body = reqwest::blocking::Client::new()
        .get(url)
        .send()?
        .error_for_status()?
        .text()?;
    Ok(body)
}
