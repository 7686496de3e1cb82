use std::collections::HashMap;

use crate::models::quote::PriceQuote;
use crate::models::valuation::{ValuationAlert, ValuationStatus, ValuationTarget};

/// (intrinsic − price) / intrinsic × 100.
///
/// `None` when intrinsic value is not positive or either input is non-finite.
pub fn margin_of_safety(intrinsic_value: f64, price: f64) -> Option<f64> {
    if !intrinsic_value.is_finite() || !price.is_finite() || intrinsic_value <= 0.0 {
        return None;
    }
    Some((intrinsic_value - price) / intrinsic_value * 100.0)
}

/// Flags over- and under-valued tickers against user intrinsic values.
pub struct ValuationService {
    undervalued_threshold_pct: f64,
}

impl ValuationService {
    pub fn new(undervalued_threshold_pct: f64) -> Self {
        Self {
            undervalued_threshold_pct,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.undervalued_threshold_pct
    }

    pub fn classify(&self, margin_of_safety: f64) -> ValuationStatus {
        if margin_of_safety >= self.undervalued_threshold_pct {
            ValuationStatus::Undervalued
        } else if margin_of_safety < 0.0 {
            ValuationStatus::Overvalued
        } else {
            ValuationStatus::Fair
        }
    }

    /// One alert per target that has a usable quote, in target order.
    pub fn evaluate(&self, targets: &[ValuationTarget], quotes: &[PriceQuote]) -> Vec<ValuationAlert> {
        let prices: HashMap<String, f64> = quotes
            .iter()
            .filter_map(|q| Some((q.normalized_ticker(), q.usable_price()?)))
            .collect();

        targets
            .iter()
            .filter_map(|target| {
                let price = *prices.get(&target.ticker)?;
                let mos = margin_of_safety(target.intrinsic_value, price)?;
                Some(ValuationAlert {
                    ticker: target.ticker.clone(),
                    intrinsic_value: target.intrinsic_value,
                    current_price: price,
                    margin_of_safety: mos,
                    status: self.classify(mos),
                })
            })
            .collect()
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new(30.0)
    }
}
