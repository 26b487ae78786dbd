//! Watchlist management
//!
//! The [`Watchlist`] type is the in-memory core: an ordered, duplicate-free
//! collection of tickers with an optional capacity. The [`WatchlistStore`]
//! trait is the seam the rest of the application talks to, with two
//! implementations:
//!
//! - [`MemoryStore`]: session-only, bounded (10 entries by default)
//! - [`SqliteStore`]: persisted to a SQLite file, unbounded

pub mod memory;
pub mod sqlite;

use crate::error::Result;
use crate::ticker::Ticker;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use memory::{MemoryStore, Watchlist};
pub use sqlite::SqliteStore;

/// Default capacity of the session-only watchlist
pub const DEFAULT_CAPACITY: usize = 10;

/// Result of an add request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended at the end of the watchlist
    Added(Ticker),
    /// Already tracked; nothing changed
    Duplicate(Ticker),
    /// The watchlist is full; nothing changed
    CapacityExceeded { ticker: Ticker, capacity: usize },
    /// Blank input; nothing changed
    Ignored,
}

/// Result of a remove request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Ticker),
    /// Not tracked. Callers treat this as success.
    Absent(Ticker),
    /// Blank input
    Ignored,
}

impl RemoveOutcome {
    /// The ticker the request referred to, if the input was not blank
    pub fn ticker(&self) -> Option<&Ticker> {
        match self {
            RemoveOutcome::Removed(t) | RemoveOutcome::Absent(t) => Some(t),
            RemoveOutcome::Ignored => None,
        }
    }
}

/// Which persistence variant backs a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreKind {
    /// Session-only, lost when the process exits
    Memory,
    /// Persisted to a SQLite file
    Sqlite,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => f.write_str("memory"),
            StoreKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

/// Storage for the set of tracked tickers
///
/// Implementations must keep insertion order and reject duplicates
/// case-insensitively. Blank input is silently ignored; errors are reserved
/// for storage failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Add a ticker at the end of the watchlist
    async fn add(&mut self, input: &str) -> Result<AddOutcome>;

    /// Remove a ticker if present
    async fn remove(&mut self, input: &str) -> Result<RemoveOutcome>;

    /// Current tickers in insertion order
    async fn list(&self) -> Result<Vec<Ticker>>;

    /// Remove every entry
    async fn clear(&mut self) -> Result<()>;

    /// Remove a ticker the quote source reported as unresolvable
    async fn purge_invalid(&mut self, ticker: &Ticker) -> Result<RemoveOutcome> {
        self.remove(ticker.as_str()).await
    }

    /// Persistence variant of this store
    fn kind(&self) -> StoreKind;

    /// Maximum number of entries, `None` when unbounded
    fn capacity(&self) -> Option<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_outcome_ticker() {
        let t = Ticker::parse("TSLA").unwrap();
        assert_eq!(RemoveOutcome::Removed(t.clone()).ticker(), Some(&t));
        assert_eq!(RemoveOutcome::Absent(t.clone()).ticker(), Some(&t));
        assert_eq!(RemoveOutcome::Ignored.ticker(), None);
    }

    #[test]
    fn test_store_kind_display() {
        assert_eq!(StoreKind::Memory.to_string(), "memory");
        assert_eq!(StoreKind::Sqlite.to_string(), "sqlite");
    }
}
