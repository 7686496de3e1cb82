use log::warn;

use crate::models::quote::{fx_pair, QuoteKind};
use crate::models::trade::AssetClass;

use super::quote_service::QuoteService;

/// Exchange-rate lookup and home-currency conversion.
///
/// US stocks and crypto are quoted in the foreign currency (USD); the
/// dashboard reports in the home currency (KRW). A single rate, foreign →
/// home, is applied per valuation.
pub struct CurrencyService;

impl CurrencyService {
    pub fn new() -> Self {
        Self
    }

    /// Home-currency units per one unit of `foreign`.
    ///
    /// Same currency → 1.0. If the rate cannot be fetched, or comes back
    /// non-positive, `fallback` is returned and a warning is logged.
    pub async fn get_exchange_rate(
        &self,
        quote_service: &QuoteService,
        foreign: &str,
        home: &str,
        fallback: f64,
    ) -> f64 {
        if foreign.eq_ignore_ascii_case(home) {
            return 1.0;
        }
        let pair = fx_pair(foreign, home);

        match quote_service.get_quote(&pair, &QuoteKind::Forex).await {
            Ok(quote) if quote.price > 0.0 => quote.price,
            Ok(quote) => {
                warn!("Rejected exchange rate {} for {pair}; using {fallback}", quote.price);
                fallback
            }
            Err(e) => {
                warn!("Exchange rate {pair} unavailable ({e}); using {fallback}");
                fallback
            }
        }
    }

    /// Express an amount in the home currency.
    pub fn to_home_currency(&self, amount: f64, asset_class: AssetClass, rate: f64) -> f64 {
        if asset_class.is_foreign_currency() {
            amount * rate
        } else {
            amount
        }
    }
}

impl Default for CurrencyService {
    fn default() -> Self {
        Self::new()
    }
}
