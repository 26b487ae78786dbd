//! Configuration for the watchlist application

use crate::chart::MIN_WIDTH;
use crate::error::{Result, WatchlistError};
use crate::lookup::HistoryPeriod;
use crate::translate::Language;
use crate::watchlist::DEFAULT_CAPACITY;
use aktien_utils::parse_env_or;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Where the watchlist lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StorageMode {
    /// Session-only list, capped at `capacity`
    Memory,
    /// SQLite file at `database_path`
    #[default]
    Sqlite,
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageMode::Memory => f.write_str("memory"),
            StorageMode::Sqlite => f.write_str("sqlite"),
        }
    }
}

impl FromStr for StorageMode {
    type Err = WatchlistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "session" => Ok(StorageMode::Memory),
            "sqlite" | "db" | "database" => Ok(StorageMode::Sqlite),
            other => Err(WatchlistError::ConfigError(format!(
                "Unknown storage mode: {other}"
            ))),
        }
    }
}

/// Configuration for the watchlist application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    /// Persistence variant
    pub storage: StorageMode,

    /// Maximum entries of the session-only watchlist
    pub capacity: usize,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Language company descriptions are translated into
    pub target_language: Language,

    /// Price history window shown in the detail view
    pub history_period: HistoryPeriod,

    /// Drop tickers the quote source reports as unknown
    pub purge_invalid: bool,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Maximum Yahoo Finance requests per minute
    pub rate_limit_per_minute: u32,

    /// How long translated descriptions are reused
    pub translation_cache_ttl: Duration,

    /// Width of the price sparkline in characters
    pub chart_width: usize,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            storage: StorageMode::Sqlite,
            capacity: DEFAULT_CAPACITY,
            database_path: PathBuf::from("watchlist.db"),
            target_language: Language::German,
            history_period: HistoryPeriod::OneYear,
            purge_invalid: false,
            request_timeout: Duration::from_secs(30),
            rate_limit_per_minute: 120,
            translation_cache_ttl: Duration::from_secs(3600), // 1 hour
            chart_width: 60,
        }
    }
}

impl WatchlistConfig {
    /// Create a new configuration builder
    pub fn builder() -> WatchlistConfigBuilder {
        WatchlistConfigBuilder::default()
    }

    /// Load configuration from `AKTIEN_*` environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let config = Self::builder().with_env()?.build()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage == StorageMode::Memory && self.capacity == 0 {
            return Err(WatchlistError::ConfigError(
                "capacity must be greater than 0".to_string(),
            ));
        }

        if self.storage == StorageMode::Sqlite && self.database_path.as_os_str().is_empty() {
            return Err(WatchlistError::ConfigError(
                "database_path must not be empty".to_string(),
            ));
        }

        if self.target_language == Language::Auto {
            return Err(WatchlistError::ConfigError(
                "target_language must be a concrete language".to_string(),
            ));
        }

        if self.rate_limit_per_minute == 0 {
            return Err(WatchlistError::ConfigError(
                "rate_limit_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.chart_width < MIN_WIDTH {
            return Err(WatchlistError::ConfigError(format!(
                "chart_width must be at least {MIN_WIDTH}"
            )));
        }

        Ok(())
    }
}

/// Builder for WatchlistConfig
#[derive(Debug, Default)]
pub struct WatchlistConfigBuilder {
    storage: Option<StorageMode>,
    capacity: Option<usize>,
    database_path: Option<PathBuf>,
    target_language: Option<Language>,
    history_period: Option<HistoryPeriod>,
    purge_invalid: Option<bool>,
    request_timeout: Option<Duration>,
    rate_limit_per_minute: Option<u32>,
    translation_cache_ttl: Option<Duration>,
    chart_width: Option<usize>,
}

impl WatchlistConfigBuilder {
    /// Set the persistence variant
    pub fn storage(mut self, storage: StorageMode) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the session-only capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the SQLite file
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Set the translation target
    pub fn target_language(mut self, language: Language) -> Self {
        self.target_language = Some(language);
        self
    }

    /// Set the history window
    pub fn history_period(mut self, period: HistoryPeriod) -> Self {
        self.history_period = Some(period);
        self
    }

    /// Enable or disable purging of unknown tickers
    pub fn purge_invalid(mut self, purge: bool) -> Self {
        self.purge_invalid = Some(purge);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the Yahoo Finance request budget
    pub fn rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = Some(limit);
        self
    }

    /// Set the translation cache lifetime
    pub fn translation_cache_ttl(mut self, ttl: Duration) -> Self {
        self.translation_cache_ttl = Some(ttl);
        self
    }

    /// Set sparkline width
    pub fn chart_width(mut self, width: usize) -> Self {
        self.chart_width = Some(width);
        self
    }

    /// Fill unset fields from `AKTIEN_*` environment variables
    pub fn with_env(mut self) -> Result<Self> {
        if self.storage.is_none() {
            if let Ok(mode) = std::env::var("AKTIEN_STORAGE") {
                self.storage = Some(mode.parse()?);
            }
        }
        if self.database_path.is_none() {
            if let Ok(path) = std::env::var("AKTIEN_DB_PATH") {
                self.database_path = Some(PathBuf::from(path));
            }
        }
        if self.target_language.is_none() {
            if let Ok(lang) = std::env::var("AKTIEN_TARGET_LANG") {
                self.target_language = Some(Language::from_code(&lang));
            }
        }
        if self.history_period.is_none() {
            if let Ok(period) = std::env::var("AKTIEN_HISTORY_PERIOD") {
                self.history_period = Some(period.parse()?);
            }
        }

        let defaults = WatchlistConfig::default();
        if self.capacity.is_none() {
            self.capacity = Some(parse_env_or("AKTIEN_CAPACITY", defaults.capacity)?);
        }
        if self.purge_invalid.is_none() {
            self.purge_invalid =
                Some(parse_env_or("AKTIEN_PURGE_INVALID", defaults.purge_invalid)?);
        }
        if self.rate_limit_per_minute.is_none() {
            self.rate_limit_per_minute =
                Some(parse_env_or("AKTIEN_RATE_LIMIT", defaults.rate_limit_per_minute)?);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<WatchlistConfig> {
        let defaults = WatchlistConfig::default();

        let config = WatchlistConfig {
            storage: self.storage.unwrap_or(defaults.storage),
            capacity: self.capacity.unwrap_or(defaults.capacity),
            database_path: self.database_path.unwrap_or(defaults.database_path),
            target_language: self.target_language.unwrap_or(defaults.target_language),
            history_period: self.history_period.unwrap_or(defaults.history_period),
            purge_invalid: self.purge_invalid.unwrap_or(defaults.purge_invalid),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            rate_limit_per_minute: self
                .rate_limit_per_minute
                .unwrap_or(defaults.rate_limit_per_minute),
            translation_cache_ttl: self
                .translation_cache_ttl
                .unwrap_or(defaults.translation_cache_ttl),
            chart_width: self.chart_width.unwrap_or(defaults.chart_width),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WatchlistConfig::default();
        assert_eq!(config.storage, StorageMode::Sqlite);
        assert_eq!(config.capacity, 10);
        assert_eq!(config.target_language, Language::German);
        assert_eq!(config.history_period, HistoryPeriod::OneYear);
        assert!(!config.purge_invalid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = WatchlistConfig::builder()
            .storage(StorageMode::Memory)
            .capacity(5)
            .target_language(Language::English)
            .purge_invalid(true)
            .request_timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        assert_eq!(config.storage, StorageMode::Memory);
        assert_eq!(config.capacity, 5);
        assert_eq!(config.target_language, Language::English);
        assert!(config.purge_invalid);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_validation_zero_capacity_memory() {
        let config = WatchlistConfig {
            storage: StorageMode::Memory,
            capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_auto_target_language() {
        let result = WatchlistConfig::builder()
            .target_language(Language::Auto)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_chart_width() {
        assert!(WatchlistConfig::builder().chart_width(3).build().is_err());
        assert!(WatchlistConfig::builder().rate_limit_per_minute(0).build().is_err());
    }

    #[test]
    fn test_storage_mode_parse() {
        assert_eq!("memory".parse::<StorageMode>().unwrap(), StorageMode::Memory);
        assert_eq!("SQLite".parse::<StorageMode>().unwrap(), StorageMode::Sqlite);
        assert!("redis".parse::<StorageMode>().is_err());
        assert_eq!(StorageMode::Memory.to_string(), "memory");
    }
}
