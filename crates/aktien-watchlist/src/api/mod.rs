//! Clients for the external quote and translation services

pub mod google;
pub mod yahoo;

pub use google::GoogleTranslateClient;
pub use yahoo::{CompanyProfile, LatestQuote, SearchQuote, YahooFinanceClient};
