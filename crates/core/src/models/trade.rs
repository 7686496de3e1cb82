use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::ticker::normalize_ticker;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::Buy => write!(f, "Buy"),
            TradeType::Sell => write!(f, "Sell"),
        }
    }
}

/// Asset category of a trade.
/// Determines whether values are converted into the home currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetClass {
    /// Korean-listed equities, priced in the home currency
    #[serde(rename = "Domestic Stock", alias = "DomesticStock")]
    DomesticStock,
    /// US-listed equities, priced in USD
    #[serde(rename = "US Stock", alias = "USStock")]
    UsStock,
    /// Cryptocurrencies, priced in USD
    Crypto,
}

impl AssetClass {
    /// Whether prices for this class are quoted in the foreign currency
    /// and need the exchange rate applied.
    pub fn is_foreign_currency(&self) -> bool {
        matches!(self, AssetClass::UsStock | AssetClass::Crypto)
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::DomesticStock => write!(f, "Domestic Stock"),
            AssetClass::UsStock => write!(f, "US Stock"),
            AssetClass::Crypto => write!(f, "Crypto"),
        }
    }
}

/// Brokerage account type a trade was booked in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Account {
    #[default]
    General,
    Pension,
    #[serde(rename = "IRP")]
    Irp,
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Account::General => write!(f, "General"),
            Account::Pension => write!(f, "Pension"),
            Account::Irp => write!(f, "IRP"),
        }
    }
}

/// A single recorded buy or sell.
///
/// Trades are immutable once recorded, except for account reassignment.
/// Deserialization goes through [`TradeRecord`] so malformed records are
/// rejected at the boundary instead of deep inside aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "TradeRecord")]
pub struct Trade {
    pub id: Uuid,

    /// Ticker as entered (e.g. "AAPL", "005930.KS", "BTC-USD")
    pub ticker: String,

    #[serde(rename = "type")]
    pub trade_type: TradeType,

    pub asset_class: AssetClass,

    pub account: Account,

    /// Price per unit in the instrument's own currency
    pub price: f64,

    /// Units traded (always positive)
    pub quantity: f64,

    pub date: NaiveDate,

    /// Optional display name (e.g. "Samsung Electronics")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Trade {
    pub fn new(
        trade_type: TradeType,
        ticker: impl Into<String>,
        asset_class: AssetClass,
        account: Account,
        price: f64,
        quantity: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticker: ticker.into().trim().to_uppercase(),
            trade_type,
            asset_class,
            account,
            price,
            quantity,
            date,
            name: None,
        }
    }

    pub fn buy(
        ticker: impl Into<String>,
        asset_class: AssetClass,
        price: f64,
        quantity: f64,
        date: NaiveDate,
    ) -> Self {
        Self::new(TradeType::Buy, ticker, asset_class, Account::General, price, quantity, date)
    }

    pub fn sell(
        ticker: impl Into<String>,
        asset_class: AssetClass,
        price: f64,
        quantity: f64,
        date: NaiveDate,
    ) -> Self {
        Self::new(TradeType::Sell, ticker, asset_class, Account::General, price, quantity, date)
    }

    pub fn in_account(mut self, account: Account) -> Self {
        self.account = account;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Ticker used for grouping and quote matching.
    pub fn normalized_ticker(&self) -> String {
        normalize_ticker(&self.ticker)
    }

    /// Signed quantity: positive for buys, negative for sells.
    pub fn signed_quantity(&self) -> f64 {
        match self.trade_type {
            TradeType::Buy => self.quantity,
            TradeType::Sell => -self.quantity,
        }
    }

    /// Check the fields a trade must satisfy to be recorded.
    ///
    /// - ticker is not blank
    /// - price is finite and non-negative
    /// - quantity is finite and strictly positive
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.ticker.trim().is_empty() {
            return Err(CoreError::ValidationError("Ticker must not be empty".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Price for {} must be a finite non-negative number, got {}",
                self.ticker, self.price
            )));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Quantity for {} must be a finite positive number, got {}",
                self.ticker, self.quantity
            )));
        }
        Ok(())
    }
}

/// Wire shape of a trade as stored in JSON.
///
/// Optional `id` and `account` are filled in during conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub ticker: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub asset_class: AssetClass,
    #[serde(default)]
    pub account: Option<Account>,
    pub price: f64,
    pub quantity: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub name: Option<String>,
}

impl TryFrom<TradeRecord> for Trade {
    type Error = CoreError;

    fn try_from(record: TradeRecord) -> Result<Self, Self::Error> {
        let trade = Trade {
            id: record.id.unwrap_or_else(Uuid::new_v4),
            ticker: record.ticker.trim().to_uppercase(),
            trade_type: record.trade_type,
            asset_class: record.asset_class,
            account: record.account.unwrap_or_default(),
            price: record.price,
            quantity: record.quantity,
            date: record.date,
            name: record.name.filter(|n| !n.trim().is_empty()),
        };
        trade.validate()?;
        Ok(trade)
    }
}

/// Parse a JSON array of trade records, validating each one.
pub fn parse_trades(json: &str) -> Result<Vec<Trade>, CoreError> {
    let records: Vec<TradeRecord> = serde_json::from_str(json)?;
    records.into_iter().map(Trade::try_from).collect()
}
