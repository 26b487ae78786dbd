//! Session state threaded through the engine

use crate::config::WatchlistConfig;
use crate::lookup::{HistoryPeriod, QuoteLookup};
use crate::ticker::Ticker;
use crate::translate::{Language, Translator};
use crate::watchlist::WatchlistStore;

/// State owned by one user session
///
/// Passed into [`handle`](super::handle) by value and handed back with the
/// view, so there is no ambient session storage.
pub struct AppState {
    pub(crate) store: Box<dyn WatchlistStore>,
    pub(crate) selected: Option<Ticker>,
}

impl AppState {
    pub fn new(store: Box<dyn WatchlistStore>) -> Self {
        Self {
            store,
            selected: None,
        }
    }

    pub fn store(&self) -> &dyn WatchlistStore {
        self.store.as_ref()
    }

    /// Ticker shown in the detail view
    pub fn selected(&self) -> Option<&Ticker> {
        self.selected.as_ref()
    }
}

/// Settings the engine needs from the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub target_language: Language,
    pub history_period: HistoryPeriod,
    pub purge_invalid: bool,
    pub chart_width: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&WatchlistConfig::default())
    }
}

impl From<&WatchlistConfig> for EngineSettings {
    fn from(config: &WatchlistConfig) -> Self {
        Self {
            target_language: config.target_language.clone(),
            history_period: config.history_period,
            purge_invalid: config.purge_invalid,
            chart_width: config.chart_width,
        }
    }
}

/// External collaborators used while handling a command
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub lookup: &'a dyn QuoteLookup,
    pub translator: &'a dyn Translator,
    pub settings: &'a EngineSettings,
}
