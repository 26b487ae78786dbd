//! Session-only watchlist

use super::{AddOutcome, DEFAULT_CAPACITY, RemoveOutcome, StoreKind, WatchlistStore};
use crate::error::Result;
use crate::ticker::Ticker;
use async_trait::async_trait;

/// Ordered, duplicate-free list of tickers with an optional capacity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Watchlist {
    entries: Vec<Ticker>,
    capacity: Option<usize>,
}

impl Watchlist {
    /// An empty watchlist that rejects adds beyond `capacity` entries
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// An empty watchlist without a size limit
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn add(&mut self, input: &str) -> AddOutcome {
        let Some(ticker) = Ticker::parse(input) else {
            return AddOutcome::Ignored;
        };

        if self.contains(&ticker) {
            return AddOutcome::Duplicate(ticker);
        }

        if let Some(capacity) = self.capacity.filter(|&c| self.entries.len() >= c) {
            return AddOutcome::CapacityExceeded { ticker, capacity };
        }

        self.entries.push(ticker.clone());
        AddOutcome::Added(ticker)
    }

    pub fn remove(&mut self, input: &str) -> RemoveOutcome {
        let Some(ticker) = Ticker::parse(input) else {
            return RemoveOutcome::Ignored;
        };

        if let Some(pos) = self.entries.iter().position(|t| *t == ticker) {
            let removed = self.entries.remove(pos);
            RemoveOutcome::Removed(removed)
        } else {
            RemoveOutcome::Absent(ticker)
        }
    }

    /// Same as [`Watchlist::remove`]; used when the quote source rejected the ticker
    pub fn purge_invalid(&mut self, ticker: &Ticker) -> RemoveOutcome {
        self.remove(ticker.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order
    pub fn list(&self) -> &[Ticker] {
        &self.entries
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.entries.contains(ticker)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|c| self.entries.len() >= c)
    }
}

/// [`WatchlistStore`] backed by a bounded [`Watchlist`] that lives as long as the session
#[derive(Debug, Clone)]
pub struct MemoryStore {
    watchlist: Watchlist,
}

impl MemoryStore {
    /// Create a store holding at most `capacity` tickers
    pub fn new(capacity: usize) -> Self {
        Self {
            watchlist: Watchlist::bounded(capacity),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl WatchlistStore for MemoryStore {
    async fn add(&mut self, input: &str) -> Result<AddOutcome> {
        Ok(self.watchlist.add(input))
    }

    async fn remove(&mut self, input: &str) -> Result<RemoveOutcome> {
        Ok(self.watchlist.remove(input))
    }

    async fn list(&self) -> Result<Vec<Ticker>> {
        Ok(self.watchlist.list().to_vec())
    }

    async fn clear(&mut self) -> Result<()> {
        self.watchlist.clear();
        Ok(())
    }

    async fn purge_invalid(&mut self, ticker: &Ticker) -> Result<RemoveOutcome> {
        Ok(self.watchlist.purge_invalid(ticker))
    }

    fn kind(&self) -> StoreKind {
        StoreKind::Memory
    }

    fn capacity(&self) -> Option<usize> {
        self.watchlist.capacity()
    }
}
