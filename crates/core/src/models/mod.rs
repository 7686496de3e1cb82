pub mod analytics;
pub mod ledger;
pub mod market;
pub mod quote;
pub mod settings;
pub mod ticker;
pub mod trade;
pub mod valuation;
