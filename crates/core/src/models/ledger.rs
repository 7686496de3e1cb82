use serde::{Deserialize, Serialize};

use super::settings::Settings;
use super::trade::Trade;
use super::valuation::ValuationTarget;

/// The persisted document. Everything in here is saved to the JSON
/// ledger file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    /// All recorded trades, kept in date order
    pub trades: Vec<Trade>,

    #[serde(default)]
    pub settings: Settings,

    /// Intrinsic value estimates used for valuation alerts
    #[serde(default)]
    pub valuation_targets: Vec<ValuationTarget>,
}

impl Ledger {
    /// Stable sort of trades by date. Same-day trades keep their order.
    pub fn sort_trades(&mut self) {
        self.trades.sort_by_key(|t| t.date);
    }
}
