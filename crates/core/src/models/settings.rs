use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::market::MacroSymbol;

/// Longest macro cache TTL accepted (one year).
pub const MAX_MACRO_CACHE_TTL_HOURS: i64 = 24 * 365;

/// User-configurable settings, stored inside the ledger file.
///
/// Every field has a default, so older ledgers missing a field still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Currency all portfolio totals are reported in (e.g. "KRW").
    pub home_currency: String,

    /// Currency US stocks and crypto are quoted in (e.g. "USD").
    pub foreign_currency: String,

    /// Exchange rate used when the live rate cannot be fetched.
    pub fallback_exchange_rate: f64,

    /// How long fetched macro indicators stay fresh.
    pub macro_cache_ttl_hours: i64,

    /// Margin of safety (percent) at or above which a ticker is flagged undervalued.
    pub undervalued_threshold_pct: f64,

    /// Macro indicators shown on the dashboard.
    pub macro_indicators: Vec<MacroSymbol>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            home_currency: "KRW".to_string(),
            foreign_currency: "USD".to_string(),
            fallback_exchange_rate: 1.0,
            macro_cache_ttl_hours: 12,
            undervalued_threshold_pct: 30.0,
            macro_indicators: MacroSymbol::defaults(),
        }
    }
}

impl Settings {
    /// Check values that can arrive unchecked from a ledger file.
    pub fn validate(&self) -> Result<(), CoreError> {
        Self::validate_macro_cache_ttl_hours(self.macro_cache_ttl_hours)?;
        if !self.fallback_exchange_rate.is_finite() || self.fallback_exchange_rate <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Fallback exchange rate must be a finite positive number, got {}",
                self.fallback_exchange_rate
            )));
        }
        if !self.undervalued_threshold_pct.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Undervalued threshold must be finite, got {}",
                self.undervalued_threshold_pct
            )));
        }
        Ok(())
    }

    pub fn validate_macro_cache_ttl_hours(hours: i64) -> Result<(), CoreError> {
        if hours <= 0 || hours > MAX_MACRO_CACHE_TTL_HOURS {
            return Err(CoreError::ValidationError(format!(
                "Macro cache TTL must be between 1 and {MAX_MACRO_CACHE_TTL_HOURS} hours, got {hours}"
            )));
        }
        Ok(())
    }
}
