//! Error types for watchlist operations

use thiserror::Error;

/// Watchlist specific errors
#[derive(Debug, Error)]
pub enum WatchlistError {
    /// The upstream data source does not know the ticker
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Database error
    #[error("Storage error: {0}")]
    StorageError(#[from] sqlx::Error),

    /// Translation service error
    #[error("Translation error: {0}")]
    TranslationError(String),

    /// Command parsing error
    #[error("Command error: {0}")]
    CommandError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl WatchlistError {
    /// Whether the error means the ticker itself cannot be resolved
    ///
    /// Network hiccups and rate limits are not in this category; only
    /// these errors may lead to a ticker being purged.
    pub fn is_unresolvable(&self) -> bool {
        matches!(self, Self::InvalidSymbol(_))
    }
}

/// Result type alias for watchlist operations
pub type Result<T> = std::result::Result<T, WatchlistError>;

impl From<aktien_utils::EnvParseError> for WatchlistError {
    fn from(err: aktien_utils::EnvParseError) -> Self {
        WatchlistError::ConfigError(err.to_string())
    }
}
