use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::{debug, warn};

use crate::cache::TtlCache;
use crate::models::market::{MacroIndicator, MacroSymbol};

use super::quote_service::QuoteService;

/// Fetches dashboard macro indicators (indices, yields, FX) behind a TTL cache.
///
/// The cache is owned by the service instance and keyed by symbol; time is
/// always supplied by the caller, so freshness is deterministic in tests.
pub struct MacroService {
    cache: TtlCache<String, MacroIndicator>,
}

impl MacroService {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            cache: TtlCache::with_ttl_hours(ttl_hours),
        }
    }

    pub fn with_cache(cache: TtlCache<String, MacroIndicator>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &TtlCache<String, MacroIndicator> {
        &self.cache
    }

    /// Current values for `symbols`, in the same order.
    ///
    /// Fresh cached entries are returned as-is; the rest are fetched
    /// concurrently. Failed fetches come back with `value: None` and are not
    /// cached, so the next call retries them.
    pub async fn get_indicators(
        &mut self,
        quote_service: &QuoteService,
        symbols: &[MacroSymbol],
        now: DateTime<Utc>,
    ) -> Vec<MacroIndicator> {
        let stale: Vec<&MacroSymbol> = symbols
            .iter()
            .filter(|s| self.cache.is_expired(&s.symbol, now))
            .collect();
        debug!(
            "Macro indicators: {} cached, {} to fetch",
            symbols.len() - stale.len(),
            stale.len()
        );

        let fetched = join_all(stale.iter().map(|s| async move {
            match quote_service.get_quote(&s.symbol, &s.kind).await {
                Ok(quote) => Some(MacroIndicator {
                    symbol: s.symbol.clone(),
                    name: s.name.clone(),
                    value: Some(quote.price),
                    currency: Some(quote.currency).filter(|c| !c.is_empty()),
                }),
                Err(e) => {
                    warn!("Macro indicator {} unavailable: {e}", s.symbol);
                    None
                }
            }
        }))
        .await;

        for indicator in fetched.into_iter().flatten() {
            self.cache.set(indicator.symbol.clone(), indicator, now);
        }

        symbols
            .iter()
            .map(|s| {
                self.cache.get(&s.symbol, now).unwrap_or_else(|| MacroIndicator {
                    symbol: s.symbol.clone(),
                    name: s.name.clone(),
                    value: None,
                    currency: None,
                })
            })
            .collect()
    }

    /// Forget all cached indicators.
    pub fn invalidate_all(&mut self) {
        self.cache.clear();
    }
}
