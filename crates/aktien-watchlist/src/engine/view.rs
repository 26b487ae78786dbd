//! View model produced by the engine

use crate::chart::PriceChart;
use crate::lookup::{HistoryPeriod, QuoteSnapshot};
use crate::ticker::Ticker;
use crate::translate::Language;
use crate::watchlist::{AddOutcome, StoreKind};

/// Shown instead of a missing company name
pub const UNKNOWN_NAME: &str = "Unbekannt";
/// Shown instead of a missing price
pub const MISSING_PRICE: &str = "—";

/// How well a row could be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    /// Name and price known
    Complete,
    /// Some fields missing
    Partial,
    /// The quote source does not know the ticker
    Invalid,
    /// Lookup failed for another reason
    Failed(String),
}

/// One line of the watchlist table
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistRow {
    pub ticker: Ticker,
    pub company_name: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub status: RowStatus,
    pub selected: bool,
}

impl WatchlistRow {
    pub fn from_snapshot(ticker: Ticker, snapshot: &QuoteSnapshot) -> Self {
        let status = if snapshot.company_name.is_some() && snapshot.current_price.is_some() {
            RowStatus::Complete
        } else {
            RowStatus::Partial
        };
        Self {
            ticker,
            company_name: snapshot.company_name.clone(),
            price: snapshot.current_price,
            currency: snapshot.currency.clone(),
            status,
            selected: false,
        }
    }

    pub fn placeholder(ticker: Ticker, status: RowStatus) -> Self {
        Self {
            ticker,
            company_name: None,
            price: None,
            currency: None,
            status,
            selected: false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.company_name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    pub fn display_price(&self) -> String {
        match (self.price, self.currency.as_deref()) {
            (Some(price), Some(currency)) => format!("{price:.2} {currency}"),
            (Some(price), None) => format!("{price:.2}"),
            (None, _) => MISSING_PRICE.to_string(),
        }
    }

    /// Whether the detail view can be built from this row
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, RowStatus::Complete | RowStatus::Partial)
    }
}

/// Company description as shown in the detail view
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptionView {
    Translated { text: String, language: Language },
    /// The source has no description
    Missing,
    /// Translation failed; the rest of the detail view is unaffected
    Failed(String),
}

/// Detail panel for the selected ticker
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub row: WatchlistRow,
    pub period: HistoryPeriod,
    pub chart: Option<PriceChart>,
    pub history_error: Option<String>,
    pub description: DescriptionView,
}

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// Feedback about the command that produced the view
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Added(Ticker),
    Duplicate(Ticker),
    CapacityExceeded { ticker: Ticker, capacity: usize },
    Removed(Ticker),
    Cleared,
    Selected(Ticker),
    SelectionClosed,
    NotInWatchlist(Ticker),
    /// Removed automatically because the quote source does not know it
    Purged(Ticker),
    LookupFailed { ticker: Ticker, reason: String },
    StorageFailed(String),
    CommandFailed(String),
}

impl Notice {
    /// Notice for an add request; blank input produces none
    pub fn from_add(outcome: AddOutcome) -> Option<Self> {
        match outcome {
            AddOutcome::Added(t) => Some(Notice::Added(t)),
            AddOutcome::Duplicate(t) => Some(Notice::Duplicate(t)),
            AddOutcome::CapacityExceeded { ticker, capacity } => {
                Some(Notice::CapacityExceeded { ticker, capacity })
            }
            AddOutcome::Ignored => None,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Notice::Added(_) | Notice::Removed(_) | Notice::Cleared => Severity::Success,
            Notice::Selected(_) | Notice::SelectionClosed => Severity::Info,
            Notice::Duplicate(_)
            | Notice::CapacityExceeded { .. }
            | Notice::NotInWatchlist(_)
            | Notice::Purged(_)
            | Notice::LookupFailed { .. } => Severity::Warning,
            Notice::StorageFailed(_) | Notice::CommandFailed(_) => Severity::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::Added(t) => format!("'{t}' added to the watchlist"),
            Notice::Duplicate(t) => format!("'{t}' is already on the watchlist"),
            Notice::CapacityExceeded { ticker, capacity } => {
                format!("Watchlist is full ({capacity} entries); '{ticker}' was not added")
            }
            Notice::Removed(t) => format!("'{t}' removed from the watchlist"),
            Notice::Cleared => "Watchlist cleared".to_string(),
            Notice::Selected(t) => format!("Showing details for '{t}'"),
            Notice::SelectionClosed => "Detail view closed".to_string(),
            Notice::NotInWatchlist(t) => format!("'{t}' is not on the watchlist"),
            Notice::Purged(t) => format!("'{t}' is unknown to the quote source and was removed"),
            Notice::LookupFailed { ticker, reason } => format!("Error for {ticker}: {reason}"),
            Notice::StorageFailed(reason) => format!("Watchlist storage failed: {reason}"),
            Notice::CommandFailed(reason) => reason.clone(),
        }
    }
}

/// Everything the front end needs to draw one response
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub notices: Vec<Notice>,
    /// `None` when the command did not refresh the watchlist (help, exit)
    pub rows: Option<Vec<WatchlistRow>>,
    pub detail: Option<DetailView>,
    pub store_kind: StoreKind,
    pub capacity: Option<usize>,
    pub show_help: bool,
    pub exit: bool,
}

impl View {
    pub(crate) fn bare(store_kind: StoreKind, capacity: Option<usize>) -> Self {
        Self {
            notices: Vec::new(),
            rows: None,
            detail: None,
            store_kind,
            capacity,
            show_help: false,
            exit: false,
        }
    }

    /// Tickers in table order
    pub fn tickers(&self) -> Vec<&Ticker> {
        self.rows
            .iter()
            .flatten()
            .map(|row| &row.ticker)
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        self.notices.iter().any(|n| n.severity() == Severity::Error)
    }
}
