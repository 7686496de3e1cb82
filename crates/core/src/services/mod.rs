pub mod analytics_service;
pub mod currency_service;
pub mod macro_service;
pub mod quote_service;
pub mod stock_search_service;
pub mod trade_service;
pub mod valuation_service;
