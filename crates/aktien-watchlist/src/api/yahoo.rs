//! Yahoo Finance API client
//!
//! Prices and daily history come from `yahoo_finance_api`. Company names
//! are resolved through the public search endpoint and descriptions through
//! the quote summary `assetProfile` module; both are plain JSON requests.

use crate::error::{Result, WatchlistError};
use crate::lookup::{HistoryPeriod, PriceHistory, PricePoint, QuoteLookup, QuoteSnapshot};
use crate::ticker::Ticker;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) aktien-watchlist";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Latest trading data for a symbol
#[derive(Debug, Clone, PartialEq)]
pub struct LatestQuote {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Entry of the search endpoint's `quotes` array
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchQuote {
    pub symbol: String,
    #[serde(default)]
    pub shortname: Option<String>,
    #[serde(default)]
    pub longname: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default, rename = "quoteType")]
    pub quote_type: Option<String>,
}

impl SearchQuote {
    /// Prefer the long company name
    pub fn display_name(&self) -> Option<&str> {
        self.longname.as_deref().or(self.shortname.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

/// Company profile pieces of the quote summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyProfile {
    pub long_name: Option<String>,
    pub currency: Option<String>,
    pub market_price: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryEnvelope {
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<SummaryError>,
}

#[derive(Debug, Deserialize)]
struct SummaryError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    asset_profile: Option<AssetProfile>,
    #[serde(default)]
    price: Option<PriceModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    #[serde(default)]
    long_business_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    regular_market_price: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

/// Yahoo Finance API client
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    client: Client,
    rate_limiter: SharedRateLimiter,
}

impl YahooFinanceClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `timeout` - Timeout for the JSON endpoints
    /// * `rate_limit` - Maximum requests per minute across all endpoints
    pub fn new(timeout: Duration, rate_limit: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            client,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Get the latest quote for a symbol
    pub async fn get_quote(&self, symbol: &str) -> Result<LatestQuote> {
        self.rate_limiter.until_ready().await;

        let provider = yahoo::YahooConnector::new()
            .map_err(|e| WatchlistError::YahooFinanceError(e.to_string()))?;

        let response = provider
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| WatchlistError::YahooFinanceError(e.to_string()))?;

        let quote = response
            .last_quote()
            .map_err(|e| WatchlistError::YahooFinanceError(e.to_string()))?;

        Ok(LatestQuote {
            symbol: symbol.to_string(),
            timestamp: DateTime::from_timestamp(quote.timestamp as i64, 0)
                .unwrap_or_else(Utc::now),
            close: quote.close,
        })
    }

    /// Get daily closes between two instants
    pub async fn get_historical_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceHistory> {
        self.rate_limiter.until_ready().await;

        let provider = yahoo::YahooConnector::new()
            .map_err(|e| WatchlistError::YahooFinanceError(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp()).map_err(|e| {
            WatchlistError::YahooFinanceError(format!("Invalid start timestamp: {e}"))
        })?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp()).map_err(|e| {
            WatchlistError::YahooFinanceError(format!("Invalid end timestamp: {e}"))
        })?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| WatchlistError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| WatchlistError::YahooFinanceError(e.to_string()))?;

        Ok(PriceHistory::new(
            quotes
                .iter()
                .filter_map(|q| {
                    DateTime::from_timestamp(q.timestamp as i64, 0).map(|ts| PricePoint {
                        date: ts.date_naive(),
                        close: q.close,
                    })
                })
                .collect(),
        ))
    }

    /// Look the symbol up in Yahoo's search index
    ///
    /// Returns `Ok(None)` when the search succeeded but nothing matches the
    /// symbol exactly.
    pub async fn search_symbol(&self, symbol: &str) -> Result<Option<SearchQuote>> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", symbol), ("quotesCount", "5"), ("newsCount", "0")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WatchlistError::YahooFinanceError(format!(
                "Search HTTP error: {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        parse_search(body, symbol)
    }

    /// Fetch company name, currency, price and business summary
    ///
    /// Returns `Ok(None)` when Yahoo answers but has no profile for the symbol.
    pub async fn get_profile(&self, symbol: &str) -> Result<Option<CompanyProfile>> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(format!("{SUMMARY_URL}/{symbol}"))
            .query(&[("modules", "assetProfile,price")])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(WatchlistError::YahooFinanceError(format!(
                "Quote summary HTTP error: {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        parse_profile(body)
    }
}

/// Pick the search hit whose symbol equals `symbol` (case-insensitive)
fn parse_search(body: serde_json::Value, symbol: &str) -> Result<Option<SearchQuote>> {
    let response: SearchResponse = serde_json::from_value(body)?;
    Ok(response
        .quotes
        .into_iter()
        .find(|q| q.symbol.eq_ignore_ascii_case(symbol)))
}

fn parse_profile(body: serde_json::Value) -> Result<Option<CompanyProfile>> {
    let envelope: SummaryEnvelope = serde_json::from_value(body)?;

    if let Some(error) = envelope.quote_summary.error {
        debug!(code = ?error.code, description = ?error.description, "Quote summary error");
        return Ok(None);
    }

    let Some(result) = envelope
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Ok(None);
    };

    let price = result.price;
    Ok(Some(CompanyProfile {
        long_name: price
            .as_ref()
            .and_then(|p| p.long_name.clone().or_else(|| p.short_name.clone())),
        currency: price.as_ref().and_then(|p| p.currency.clone()),
        market_price: price
            .as_ref()
            .and_then(|p| p.regular_market_price.as_ref())
            .and_then(|v| v.raw),
        description: result
            .asset_profile
            .and_then(|a| a.long_business_summary)
            .filter(|s| !s.trim().is_empty()),
    }))
}

#[async_trait]
impl QuoteLookup for YahooFinanceClient {
    async fn snapshot(&self, ticker: &Ticker) -> Result<QuoteSnapshot> {
        let symbol = ticker.as_str();

        let quote = self.get_quote(symbol).await;
        let (profile, profile_error) = match self.get_profile(symbol).await {
            Ok(profile) => (profile, None),
            Err(e) => {
                warn!(%ticker, error = %e, "Company profile unavailable");
                (None, Some(e.to_string()))
            }
        };
        let search = self.search_symbol(symbol).await;

        // Only call a ticker invalid when Yahoo answered and knows nothing
        // about it; transport failures are reported as such.
        let matched = match (&quote, search) {
            (Err(_), Ok(None)) if profile.is_none() => {
                return Err(WatchlistError::InvalidSymbol(symbol.to_string()));
            }
            (Err(_), Err(e)) if profile.is_none() => return Err(e),
            (_, Ok(matched)) => matched,
            (_, Err(e)) => {
                warn!(%ticker, error = %e, "Symbol search failed");
                None
            }
        };

        let price = match quote {
            Ok(q) => Some(q.close),
            Err(e) => {
                debug!(%ticker, error = %e, "Latest quote unavailable");
                profile.as_ref().and_then(|p| p.market_price)
            }
        };

        let profile = profile.unwrap_or_default();
        Ok(QuoteSnapshot {
            company_name: profile
                .long_name
                .or_else(|| matched.as_ref().and_then(|m| m.display_name().map(String::from))),
            current_price: price,
            currency: profile.currency,
            description: profile.description,
            description_error: profile_error,
        })
    }

    async fn history(&self, ticker: &Ticker, period: HistoryPeriod) -> Result<PriceHistory> {
        let end = Utc::now();
        let start = period
            .start_date(end.date_naive())
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map_or_else(|| end - chrono::Duration::days(36500), |d| d.and_utc());

        let history = self.get_historical_closes(ticker.as_str(), start, end).await?;
        if history.is_empty() {
            return Err(WatchlistError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!("no price history for {period}"),
            });
        }
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_exact_match() {
        let body = json!({
            "count": 2,
            "quotes": [
                {"symbol": "TSLA.MX", "shortname": "TESLA INC", "quoteType": "EQUITY"},
                {"symbol": "TSLA", "shortname": "Tesla, Inc.", "longname": "Tesla, Inc.",
                 "exchange": "NMS", "quoteType": "EQUITY"}
            ],
            "news": []
        });

        let hit = parse_search(body, "tsla").unwrap().unwrap();
        assert_eq!(hit.symbol, "TSLA");
        assert_eq!(hit.display_name(), Some("Tesla, Inc."));
        assert_eq!(hit.quote_type.as_deref(), Some("EQUITY"));
    }

    #[test]
    fn test_parse_search_no_match() {
        let body = json!({"quotes": [{"symbol": "AAPL", "shortname": "Apple Inc."}]});
        assert!(parse_search(body, "XXXXX").unwrap().is_none());

        let body = json!({"count": 0});
        assert!(parse_search(body, "XXXXX").unwrap().is_none());
    }

    #[test]
    fn test_parse_profile() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "assetProfile": {"longBusinessSummary": "Apple Inc. designs smartphones."},
                    "price": {
                        "longName": "Apple Inc.",
                        "currency": "USD",
                        "regularMarketPrice": {"raw": 189.5, "fmt": "189.50"}
                    }
                }],
                "error": null
            }
        });

        let profile = parse_profile(body).unwrap().unwrap();
        assert_eq!(profile.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.currency.as_deref(), Some("USD"));
        assert_eq!(profile.market_price, Some(189.5));
        assert_eq!(profile.description.as_deref(), Some("Apple Inc. designs smartphones."));
    }

    #[test]
    fn test_parse_profile_error_means_none() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": {"code": "Not Found", "description": "Quote not found for symbol: XXXXX"}
            }
        });
        assert!(parse_profile(body).unwrap().is_none());
    }

    #[test]
    fn test_parse_profile_blank_summary_dropped() {
        let body = json!({
            "quoteSummary": {
                "result": [{"assetProfile": {"longBusinessSummary": "  "}}]
            }
        });
        let profile = parse_profile(body).unwrap().unwrap();
        assert!(profile.description.is_none());
        assert!(profile.long_name.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_snapshot_live() {
        let client = YahooFinanceClient::new(Duration::from_secs(30), 60).unwrap();
        let snapshot = client.snapshot(&Ticker::parse("AAPL").unwrap()).await.unwrap();
        assert!(snapshot.current_price.unwrap_or_default() > 0.0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_history_live() {
        let client = YahooFinanceClient::new(Duration::from_secs(30), 60).unwrap();
        let history = client
            .history(&Ticker::parse("AAPL").unwrap(), HistoryPeriod::OneYear)
            .await
            .unwrap();
        assert!(history.len() > 200);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_invalid_symbol_live() {
        let client = YahooFinanceClient::new(Duration::from_secs(30), 60).unwrap();
        let result = client.snapshot(&Ticker::parse("INVALID_SYMBOL_12345").unwrap()).await;
        assert!(matches!(result, Err(WatchlistError::InvalidSymbol(_))));
    }
}
