use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::quote::{PriceQuote, PricePoint, QuoteKind};

/// Abstraction over market-data sources.
///
/// Each source (Yahoo Finance, Frankfurter) implements this trait and is
/// registered in a [`QuoteProviderRegistry`](super::registry::QuoteProviderRegistry).
/// Symbols are passed exactly as the source expects them; regional-suffix
/// retries happen one layer up, in `QuoteService`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which quote kinds this provider can serve.
    fn supported_kinds(&self) -> Vec<QuoteKind>;

    /// Latest quote for a symbol. Forex symbols are `"BASE/QUOTE"`.
    async fn get_current_quote(
        &self,
        symbol: &str,
        kind: &QuoteKind,
    ) -> Result<PriceQuote, CoreError>;

    /// Daily closes for a date range, sorted by date.
    async fn get_price_range(
        &self,
        symbol: &str,
        kind: &QuoteKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;
}
