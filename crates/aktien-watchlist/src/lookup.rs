//! Quote lookup contract and the data it produces

use crate::error::{Result, WatchlistError};
use crate::ticker::Ticker;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Point-in-time company and price data for one ticker
///
/// Any field may be missing when the upstream source only knows part of
/// the picture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub company_name: Option<String>,
    pub current_price: Option<f64>,
    pub currency: Option<String>,
    pub description: Option<String>,
    /// Why the description could not be fetched, if the request failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_error: Option<String>,
}

/// Daily closing price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Summary numbers over a price history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryStats {
    pub first: f64,
    pub last: f64,
    pub min: f64,
    pub max: f64,
}

impl HistoryStats {
    /// Change from first to last close in percent
    pub fn change_percent(&self) -> f64 {
        if self.first == 0.0 {
            0.0
        } else {
            (self.last - self.first) / self.first * 100.0
        }
    }
}

/// Ordered sequence of daily closes, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Build a history, sorting by date and dropping duplicate days and non-finite closes
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite());
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points on or after `date`
    pub fn since(&self, date: NaiveDate) -> Self {
        Self {
            points: self.points.iter().filter(|p| p.date >= date).copied().collect(),
        }
    }

    /// Restrict to the window `period` covers, counted back from `today`
    pub fn within(&self, period: HistoryPeriod, today: NaiveDate) -> Self {
        match period.start_date(today) {
            Some(start) => self.since(start),
            None => self.clone(),
        }
    }

    pub fn stats(&self) -> Option<HistoryStats> {
        let first = self.points.first()?.close;
        let last = self.points.last()?.close;
        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.close), hi.max(p.close))
            });
        Some(HistoryStats {
            first,
            last,
            min,
            max,
        })
    }
}

/// Window of price history to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryPeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    YearToDate,
    Max,
}

impl HistoryPeriod {
    pub fn code(&self) -> &'static str {
        match self {
            HistoryPeriod::OneMonth => "1mo",
            HistoryPeriod::ThreeMonths => "3mo",
            HistoryPeriod::SixMonths => "6mo",
            HistoryPeriod::OneYear => "1y",
            HistoryPeriod::TwoYears => "2y",
            HistoryPeriod::FiveYears => "5y",
            HistoryPeriod::YearToDate => "ytd",
            HistoryPeriod::Max => "max",
        }
    }

    /// First day of the window, `None` for [`HistoryPeriod::Max`]
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let days = match self {
            HistoryPeriod::OneMonth => 30,
            HistoryPeriod::ThreeMonths => 90,
            HistoryPeriod::SixMonths => 180,
            HistoryPeriod::OneYear => 365,
            HistoryPeriod::TwoYears => 730,
            HistoryPeriod::FiveYears => 1825,
            HistoryPeriod::YearToDate => {
                return NaiveDate::from_ymd_opt(today.year(), 1, 1);
            }
            HistoryPeriod::Max => return None,
        };
        today.checked_sub_signed(Duration::days(days))
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for HistoryPeriod {
    type Err = WatchlistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1mo" => Ok(HistoryPeriod::OneMonth),
            "3mo" => Ok(HistoryPeriod::ThreeMonths),
            "6mo" => Ok(HistoryPeriod::SixMonths),
            "1y" => Ok(HistoryPeriod::OneYear),
            "2y" => Ok(HistoryPeriod::TwoYears),
            "5y" => Ok(HistoryPeriod::FiveYears),
            "ytd" => Ok(HistoryPeriod::YearToDate),
            "max" => Ok(HistoryPeriod::Max),
            other => Err(WatchlistError::ConfigError(format!(
                "Invalid history period: {other}"
            ))),
        }
    }
}

/// Source of quotes, company data and price history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteLookup: Send + Sync {
    /// Company name, current price and description
    ///
    /// Returns [`WatchlistError::InvalidSymbol`] when the source knows
    /// nothing about the ticker.
    async fn snapshot(&self, ticker: &Ticker) -> Result<QuoteSnapshot>;

    /// Daily closes over `period`
    async fn history(&self, ticker: &Ticker, period: HistoryPeriod) -> Result<PriceHistory>;
}
