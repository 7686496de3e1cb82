use serde::{Deserialize, Serialize};

use super::trade::AssetClass;

/// User-estimated intrinsic value for a ticker, in the ticker's own currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationTarget {
    /// Normalized ticker
    pub ticker: String,
    pub intrinsic_value: f64,
    /// Decides how the ticker is quoted when it has no trades
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<AssetClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationStatus {
    /// Margin of safety at or above the configured threshold
    Undervalued,
    /// Non-negative margin of safety below the threshold
    Fair,
    /// Price above intrinsic value
    Overvalued,
}

impl std::fmt::Display for ValuationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValuationStatus::Undervalued => write!(f, "Undervalued"),
            ValuationStatus::Fair => write!(f, "Fair"),
            ValuationStatus::Overvalued => write!(f, "Overvalued"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationAlert {
    pub ticker: String,
    pub intrinsic_value: f64,
    pub current_price: f64,
    /// (intrinsic − price) / intrinsic × 100
    pub margin_of_safety: f64,
    pub status: ValuationStatus,
}
