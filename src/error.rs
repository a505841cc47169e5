use thiserror::Error;

/// Pipeline failure kinds, one per surface: the network fetch, the
/// structure of a catalog entry, and the SQLite store.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("catalog fetch failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed catalog entry: missing {field}")]
    MalformedEntry { field: &'static str },

    #[error("store operation failed: {0}")]
    Store(#[from] rusqlite::Error),
}
