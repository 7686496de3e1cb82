use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::trade::{Account, AssetClass};

/// Running weighted-average-cost state for one (ticker, account) pair,
/// in the instrument's own currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Normalized ticker
    pub ticker: String,
    pub account: Account,
    /// Asset class of the first trade seen for this key
    pub asset_class: AssetClass,
    /// First non-empty trade name seen for this key
    pub name: Option<String>,
    /// Running sum of signed trade quantities (may go negative)
    pub quantity: f64,
    /// Remaining cost basis
    pub total_cost: f64,
    /// total_cost / quantity, or 0 once depleted
    pub avg_price: f64,
}

/// A valued position as reported in [`PortfolioStats::assets`].
/// Monetary values are in the home currency unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub ticker: String,
    pub name: Option<String>,
    pub asset_class: AssetClass,
    pub account: Account,
    pub quantity: f64,

    /// Average cost per unit, instrument currency
    pub avg_price: f64,

    /// Cost basis, instrument currency
    pub total_cost: f64,

    /// Price used for valuation, instrument currency
    pub current_price: f64,

    /// False when no usable quote existed and avg_price was used instead
    pub priced_from_quote: bool,

    pub current_value: f64,
    pub invested_value: f64,
    pub profit: f64,

    /// Percentage return; `None` when invested value is zero
    pub roi: Option<f64>,

    /// Share of total portfolio value, in percent
    pub allocation_pct: f64,
}

/// Invested/value pair for a category breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub invested: f64,
    pub value: f64,
}

impl CategoryTotals {
    pub fn add(&mut self, invested: f64, value: f64) {
        self.invested += invested;
        self.value += value;
    }

    pub fn profit(&self) -> f64 {
        self.value - self.invested
    }

    pub fn roi(&self) -> Option<f64> {
        roi_pct(self.invested, self.value)
    }
}

/// Portfolio-level valuation summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStats {
    pub total_invested: f64,
    pub total_value: f64,
    pub net_profit: f64,
    pub roi: Option<f64>,
    pub assets: Vec<Position>,
    pub by_asset_class: BTreeMap<AssetClass, CategoryTotals>,
    pub by_account: BTreeMap<Account, CategoryTotals>,
}

/// (value − invested) / invested × 100, or `None` when undefined.
pub fn roi_pct(invested: f64, value: f64) -> Option<f64> {
    if invested == 0.0 {
        return None;
    }
    let roi = (value - invested) / invested * 100.0;
    roi.is_finite().then_some(roi)
}
