//! Stock ticker watchlist
//!
//! This crate keeps a small list of stock tickers and shows, for each one,
//! the company name and current price. A selected ticker opens a detail
//! view with a price chart and the company description translated into a
//! configurable language.
//!
//! - Watchlist storage: a bounded in-memory list or a SQLite file
//! - Quotes, profiles and price history from Yahoo Finance
//! - Description translation through Google Translate, cached with a TTL
//! - A command engine that turns `(state, command)` into `(state, view)`
//!
//! # Example
//!
//! ```rust,ignore
//! use aktien_watchlist::api::{GoogleTranslateClient, YahooFinanceClient};
//! use aktien_watchlist::engine::{handle, AppState, EngineSettings, Services};
//! use aktien_watchlist::interface::{CliFormatter, Command};
//! use aktien_watchlist::watchlist::MemoryStore;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let lookup = YahooFinanceClient::new(Duration::from_secs(30), 120)?;
//!     let translator = GoogleTranslateClient::new(Duration::from_secs(30))?;
//!     let settings = EngineSettings::default();
//!     let services = Services { lookup: &lookup, translator: &translator, settings: &settings };
//!
//!     let state = AppState::new(Box::new(MemoryStore::default()));
//!     let (_state, view) = handle(state, Command::parse("/add AAPL")?, &services).await;
//!     println!("{}", CliFormatter::new().format_view(&view));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod lookup;
pub mod ticker;
pub mod translate;
pub mod watchlist;

// Re-export main types for convenience
pub use config::{StorageMode, WatchlistConfig};
pub use error::{Result, WatchlistError};
pub use lookup::{HistoryPeriod, PriceHistory, QuoteLookup, QuoteSnapshot};
pub use ticker::Ticker;
pub use translate::{CachedTranslator, Language, Translator};
pub use watchlist::{MemoryStore, SqliteStore, Watchlist, WatchlistStore};
