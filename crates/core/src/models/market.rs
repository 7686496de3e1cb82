use serde::{Deserialize, Serialize};

use super::quote::QuoteKind;

/// A macro indicator to track: symbol as understood by the quote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSymbol {
    pub symbol: String,
    pub name: String,
    pub kind: QuoteKind,
}

impl MacroSymbol {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, kind: QuoteKind) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            kind,
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("^GSPC", "S&P 500", QuoteKind::Index),
            Self::new("^IXIC", "NASDAQ Composite", QuoteKind::Index),
            Self::new("^KS11", "KOSPI", QuoteKind::Index),
            Self::new("^VIX", "CBOE Volatility Index", QuoteKind::Index),
            Self::new("^TNX", "US 10Y Treasury Yield", QuoteKind::Index),
            Self::new("USD/KRW", "USD/KRW", QuoteKind::Forex),
        ]
    }
}

/// A fetched macro indicator value. `value` is `None` when the fetch failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroIndicator {
    pub symbol: String,
    pub name: String,
    pub value: Option<f64>,
    pub currency: Option<String>,
}

/// One entry of the searchable stock catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockListing {
    pub ticker: String,
    pub name: String,
    /// Exchange or market label (e.g. "KOSPI", "KOSDAQ", "NASDAQ")
    #[serde(default)]
    pub market: String,
}
