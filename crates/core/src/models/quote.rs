use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ticker::normalize_ticker;
use super::trade::AssetClass;

/// What kind of instrument a quote request is for.
/// Determines which provider handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteKind {
    Stock,
    Crypto,
    Index,
    /// Currency pair written as `"BASE/QUOTE"`, e.g. `"USD/KRW"`
    Forex,
}

impl From<AssetClass> for QuoteKind {
    fn from(class: AssetClass) -> Self {
        match class {
            AssetClass::DomesticStock | AssetClass::UsStock => QuoteKind::Stock,
            AssetClass::Crypto => QuoteKind::Crypto,
        }
    }
}

impl QuoteKind {
    /// Yahoo-style quote type string reported alongside a price.
    pub fn quote_type(&self) -> &'static str {
        match self {
            QuoteKind::Stock => "EQUITY",
            QuoteKind::Crypto => "CRYPTOCURRENCY",
            QuoteKind::Index => "INDEX",
            QuoteKind::Forex => "CURRENCY",
        }
    }
}

impl std::fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteKind::Stock => write!(f, "Stock"),
            QuoteKind::Crypto => write!(f, "Crypto"),
            QuoteKind::Index => write!(f, "Index"),
            QuoteKind::Forex => write!(f, "Forex"),
        }
    }
}

/// Build a forex pair symbol, e.g. `fx_pair("usd", "krw") == "USD/KRW"`.
pub fn fx_pair(base: &str, quote: &str) -> String {
    format!("{}/{}", base.trim().to_uppercase(), quote.trim().to_uppercase())
}

/// Split a `"BASE/QUOTE"` pair symbol.
pub fn split_fx_pair(symbol: &str) -> Option<(String, String)> {
    let (base, quote) = symbol.split_once('/')?;
    let base = base.trim().to_uppercase();
    let quote = quote.trim().to_uppercase();
    if base.is_empty() || quote.is_empty() {
        return None;
    }
    Some((base, quote))
}

/// A current market quote for one ticker.
///
/// A quote with `error` set is a fetch-failure sentinel: it carries no
/// usable price and the aggregator falls back to cost basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub ticker: String,
    pub price: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub quote_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PriceQuote {
    pub fn new(
        ticker: impl Into<String>,
        price: f64,
        currency: impl Into<String>,
        quote_type: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            price,
            currency: currency.into(),
            quote_type: quote_type.into(),
            error: None,
        }
    }

    /// Sentinel for a ticker whose quote could not be fetched.
    pub fn failed(ticker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            price: 0.0,
            currency: String::new(),
            quote_type: String::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// A quote is usable when it is not an error and its price is finite
    /// and non-negative.
    pub fn usable_price(&self) -> Option<f64> {
        if self.is_error() || !self.price.is_finite() || self.price < 0.0 {
            None
        } else {
            Some(self.price)
        }
    }

    pub fn normalized_ticker(&self) -> String {
        normalize_ticker(&self.ticker)
    }
}

/// A single historical price data point (date → close).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}
