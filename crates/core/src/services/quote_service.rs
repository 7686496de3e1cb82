use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::quote::{PriceQuote, PricePoint, QuoteKind};
use crate::models::ticker::regional_candidates;
use crate::providers::registry::QuoteProviderRegistry;

/// One ticker to quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub ticker: String,
    pub kind: QuoteKind,
}

impl QuoteRequest {
    pub fn new(ticker: impl Into<String>, kind: QuoteKind) -> Self {
        Self {
            ticker: ticker.into(),
            kind,
        }
    }
}

/// Fetches quotes and price history from registered providers.
///
/// Retry order for a request:
/// 1. **Symbols**: stock tickers without a regional suffix are tried bare,
///    then with `.KS`, then with `.KQ`.
/// 2. **Providers**: for each symbol, every provider serving the kind, in
///    registration order.
///
/// Returned prices must be finite and non-negative.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn has_provider_for(&self, kind: &QuoteKind) -> bool {
        self.registry.get_provider_for(kind).is_some()
    }

    pub fn get_provider_names(&self, kind: &QuoteKind) -> Vec<String> {
        self.registry
            .get_providers_for(kind)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Latest quote for one ticker. The returned quote carries the ticker
    /// as requested, whichever suffix variant actually answered.
    pub async fn get_quote(&self, ticker: &str, kind: &QuoteKind) -> Result<PriceQuote, CoreError> {
        let providers = self.registry.get_providers_for(kind);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(kind.to_string()));
        }

        let mut last_error = None;
        for symbol in Self::candidates(ticker, kind) {
            for provider in &providers {
                match provider.get_current_quote(&symbol, kind).await {
                    Ok(quote) if quote.price.is_finite() && quote.price >= 0.0 => {
                        debug!("{} answered {symbol} for {ticker}", provider.name());
                        return Ok(PriceQuote {
                            ticker: ticker.to_string(),
                            ..quote
                        });
                    }
                    Ok(quote) => {
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid price returned for {symbol}: {} (must be finite and non-negative)",
                                quote.price
                            ),
                        });
                    }
                    Err(e) => {
                        debug!("{} failed for {symbol}: {e}", provider.name());
                        last_error = Some(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::PriceNotAvailable {
            symbol: ticker.to_string(),
            context: "current".into(),
        }))
    }

    /// Quote many tickers concurrently.
    ///
    /// Results line up with `requests`. A failed ticker yields an
    /// error-flagged [`PriceQuote`] instead of failing the batch.
    pub async fn get_quotes(&self, requests: &[QuoteRequest]) -> Vec<PriceQuote> {
        let fetches = requests.iter().map(|req| async move {
            match self.get_quote(&req.ticker, &req.kind).await {
                Ok(quote) => quote,
                Err(e) => {
                    warn!("Quote unavailable for {}: {e}", req.ticker);
                    PriceQuote::failed(req.ticker.clone(), e.to_string())
                }
            }
        });
        join_all(fetches).await
    }

    /// Daily closes for a ticker over `[from, to]`, using the same
    /// symbol and provider fallback as [`get_quote`](Self::get_quote).
    /// An empty range from one candidate moves on to the next.
    pub async fn get_history(
        &self,
        ticker: &str,
        kind: &QuoteKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        if from > to {
            return Err(CoreError::ValidationError(format!(
                "'from' date ({from}) must not be after 'to' date ({to})"
            )));
        }

        let providers = self.registry.get_providers_for(kind);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(kind.to_string()));
        }

        let mut last_error = None;
        for symbol in Self::candidates(ticker, kind) {
            for provider in &providers {
                match provider.get_price_range(&symbol, kind, from, to).await {
                    Ok(points) if !points.is_empty() => return Ok(points),
                    Ok(_) => debug!("{} returned no history for {symbol}", provider.name()),
                    Err(e) => last_error = Some(e),
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::PriceNotAvailable {
            symbol: ticker.to_string(),
            context: format!("{from}..{to}"),
        }))
    }

    fn candidates(ticker: &str, kind: &QuoteKind) -> Vec<String> {
        match kind {
            QuoteKind::Stock => regional_candidates(ticker),
            _ => vec![ticker.trim().to_uppercase()],
        }
    }
}
