pub mod cache;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use uuid::Uuid;

use models::{
    analytics::{Holding, PortfolioStats},
    ledger::Ledger,
    market::{MacroIndicator, StockListing},
    quote::{PriceQuote, PricePoint, QuoteKind},
    settings::Settings,
    ticker::normalize_ticker,
    trade::{Account, AssetClass, Trade},
    valuation::{ValuationAlert, ValuationTarget},
};
use providers::registry::QuoteProviderRegistry;
use services::{
    analytics_service::{AnalyticsService, QUANTITY_EPSILON},
    currency_service::CurrencyService,
    macro_service::MacroService,
    quote_service::{QuoteRequest, QuoteService},
    stock_search_service::StockSearchService,
    trade_service::TradeService,
    valuation_service::ValuationService,
};
use storage::manager::StorageManager;

use errors::CoreError;

/// Main entry point for the portfolio dashboard core library.
/// Holds the ledger and all services needed to operate on it.
#[must_use]
pub struct PortfolioDashboard {
    ledger: Ledger,
    trade_service: TradeService,
    analytics_service: AnalyticsService,
    quote_service: QuoteService,
    currency_service: CurrencyService,
    macro_service: MacroService,
    stock_search: StockSearchService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for PortfolioDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioDashboard")
            .field("trades", &self.ledger.trades.len())
            .field("settings", &self.ledger.settings)
            .field("valuation_targets", &self.ledger.valuation_targets.len())
            .field("listings", &self.stock_search.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PortfolioDashboard {
    /// Create an empty ledger with default settings and providers.
    pub fn create_new() -> Self {
        Self::build(Ledger::default(), QuoteProviderRegistry::new_with_defaults())
    }

    /// Wrap an existing ledger with an explicit provider registry.
    pub fn with_providers(ledger: Ledger, registry: QuoteProviderRegistry) -> Self {
        Self::build(ledger, registry)
    }

    /// Attach a stock search catalog.
    pub fn with_stock_search(mut self, stock_search: StockSearchService) -> Self {
        self.stock_search = stock_search;
        self
    }

    /// Load a ledger document from a JSON string.
    pub fn load_from_str(data: &str) -> Result<Self, CoreError> {
        let ledger = StorageManager::load_from_str(data)?;
        Ok(Self::build(ledger, QuoteProviderRegistry::new_with_defaults()))
    }

    /// Serialize the ledger to a JSON document. Clears the unsaved-changes flag.
    pub fn save_to_string(&mut self) -> Result<String, CoreError> {
        let document = StorageManager::save_to_string(&self.ledger)?;
        self.dirty = false;
        Ok(document)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let ledger = StorageManager::load_from_file(path)?;
        Ok(Self::build(ledger, QuoteProviderRegistry::new_with_defaults()))
    }

    /// Save to disk (native only). Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.ledger, path)?;
        self.dirty = false;
        Ok(())
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ── Trades ──────────────────────────────────────────────────────

    /// Record a trade. Fills in the display name from the stock catalog
    /// when the trade has none.
    pub fn add_trade(&mut self, mut trade: Trade) -> Result<Uuid, CoreError> {
        if trade.name.is_none() {
            trade.name = self.stock_search.find(&trade.ticker).map(|l| l.name.clone());
        }
        let id = trade.id;
        self.trade_service.add_trade(&mut self.ledger, trade)?;
        self.dirty = true;
        Ok(id)
    }

    /// Record several trades. All are validated before any is recorded.
    pub fn add_trades(&mut self, trades: Vec<Trade>) -> Result<Vec<Uuid>, CoreError> {
        for trade in &trades {
            trade.validate()?;
        }
        trades.into_iter().map(|t| self.add_trade(t)).collect()
    }

    /// Import a JSON array of trade records. Returns how many were added.
    pub fn import_trades_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let trades = StorageManager::import_trades(json)?;
        let count = trades.len();
        self.add_trades(trades)?;
        Ok(count)
    }

    /// Export all trades as a JSON array.
    pub fn export_trades_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger.trades)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize trades: {e}")))
    }

    pub fn remove_trade(&mut self, trade_id: Uuid) -> Result<Trade, CoreError> {
        let removed = self.trade_service.remove_trade(&mut self.ledger, trade_id)?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn reassign_account(&mut self, trade_id: Uuid, account: Account) -> Result<(), CoreError> {
        self.trade_service
            .reassign_account(&mut self.ledger, trade_id, account)?;
        self.dirty = true;
        Ok(())
    }

    /// Move all of a ticker's trades from one account to another.
    pub fn reassign_ticker_account(&mut self, ticker: &str, from: Account, to: Account) -> usize {
        let changed = self
            .trade_service
            .reassign_ticker_account(&mut self.ledger, ticker, from, to);
        if changed > 0 {
            self.dirty = true;
        }
        changed
    }

    #[must_use]
    pub fn get_trade(&self, trade_id: Uuid) -> Option<&Trade> {
        self.ledger.trades.iter().find(|t| t.id == trade_id)
    }

    /// All trades, newest first.
    #[must_use]
    pub fn get_trades(&self) -> Vec<&Trade> {
        self.trade_service.get_trades(&self.ledger)
    }

    #[must_use]
    pub fn get_trades_for_ticker(&self, ticker: &str) -> Vec<&Trade> {
        self.trade_service.get_trades_for_ticker(&self.ledger, ticker)
    }

    #[must_use]
    pub fn get_trades_for_account(&self, account: Account) -> Vec<&Trade> {
        self.trade_service.get_trades_for_account(&self.ledger, account)
    }

    #[must_use]
    pub fn trade_count(&self) -> usize {
        self.ledger.trades.len()
    }

    // ── Holdings & Valuation ────────────────────────────────────────

    /// Currently held positions (quantity above the sold-out threshold).
    #[must_use]
    pub fn get_holdings(&self) -> Vec<Holding> {
        self.analytics_service
            .build_holdings(&self.ledger.trades)
            .into_iter()
            .filter(|h| h.quantity > QUANTITY_EPSILON)
            .collect()
    }

    /// Value the ledger against caller-supplied quotes and rate.
    #[must_use]
    pub fn calculate_stats(&self, prices: &[PriceQuote], exchange_rate: Option<f64>) -> PortfolioStats {
        self.analytics_service
            .calculate_portfolio_stats(&self.ledger.trades, prices, exchange_rate)
    }

    /// One quote request per distinct held ticker.
    #[must_use]
    pub fn quote_requests(&self) -> Vec<QuoteRequest> {
        let mut seen = HashSet::new();
        self.get_holdings()
            .into_iter()
            .filter(|h| seen.insert(h.ticker.clone()))
            .map(|h| QuoteRequest::new(h.ticker, QuoteKind::from(h.asset_class)))
            .collect()
    }

    /// Fetch quotes for every held ticker. Failures come back error-flagged.
    pub async fn refresh_quotes(&self) -> Vec<PriceQuote> {
        self.quote_service.get_quotes(&self.quote_requests()).await
    }

    /// Foreign → home exchange rate, or the configured fallback.
    pub async fn exchange_rate(&self) -> f64 {
        let settings = &self.ledger.settings;
        self.currency_service
            .get_exchange_rate(
                &self.quote_service,
                &settings.foreign_currency,
                &settings.home_currency,
                settings.fallback_exchange_rate,
            )
            .await
    }

    /// Fetch quotes and the exchange rate concurrently, then value the ledger.
    pub async fn refresh_stats(&self) -> PortfolioStats {
        let requests = self.quote_requests();
        let (quotes, rate) = futures::join!(
            self.quote_service.get_quotes(&requests),
            self.exchange_rate()
        );
        self.calculate_stats(&quotes, Some(rate))
    }

    /// Daily price history for a ticker.
    pub async fn get_ticker_history(
        &self,
        ticker: &str,
        asset_class: AssetClass,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        self.quote_service
            .get_history(ticker, &QuoteKind::from(asset_class), from, to)
            .await
    }

    // ── Macro & Search ──────────────────────────────────────────────

    /// Configured macro indicators, served from cache while fresh.
    pub async fn macro_indicators(&mut self, now: DateTime<Utc>) -> Vec<MacroIndicator> {
        self.macro_service
            .get_indicators(&self.quote_service, &self.ledger.settings.macro_indicators, now)
            .await
    }

    #[must_use]
    pub fn search_stocks(&self, query: &str, limit: usize) -> Vec<&StockListing> {
        self.stock_search.search(query, limit)
    }

    // ── Valuation Targets ───────────────────────────────────────────

    /// Set (or replace) the intrinsic value estimate for a ticker.
    ///
    /// `asset_class` is only needed for tickers that have no trades yet;
    /// without it such a ticker is quoted as a stock.
    pub fn set_valuation_target(
        &mut self,
        ticker: &str,
        asset_class: Option<AssetClass>,
        intrinsic_value: f64,
        note: Option<String>,
    ) -> Result<(), CoreError> {
        if !intrinsic_value.is_finite() || intrinsic_value <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Intrinsic value for {ticker} must be a finite positive number, got {intrinsic_value}"
            )));
        }
        let ticker = normalize_ticker(ticker);
        if ticker.is_empty() {
            return Err(CoreError::ValidationError("Ticker must not be empty".into()));
        }

        let target = ValuationTarget {
            ticker,
            intrinsic_value,
            asset_class,
            note,
        };
        let targets = &mut self.ledger.valuation_targets;
        match targets.iter_mut().find(|t| t.ticker == target.ticker) {
            Some(existing) => *existing = target,
            None => targets.push(target),
        }
        self.dirty = true;
        Ok(())
    }

    pub fn remove_valuation_target(&mut self, ticker: &str) -> bool {
        let ticker = normalize_ticker(ticker);
        let before = self.ledger.valuation_targets.len();
        self.ledger.valuation_targets.retain(|t| t.ticker != ticker);
        let removed = self.ledger.valuation_targets.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    #[must_use]
    pub fn valuation_targets(&self) -> &[ValuationTarget] {
        &self.ledger.valuation_targets
    }

    /// Evaluate targets against caller-supplied quotes.
    #[must_use]
    pub fn valuation_alerts(&self, quotes: &[PriceQuote]) -> Vec<ValuationAlert> {
        ValuationService::new(self.ledger.settings.undervalued_threshold_pct)
            .evaluate(&self.ledger.valuation_targets, quotes)
    }

    /// Fetch quotes for every valuation target and evaluate them.
    pub async fn refresh_valuation_alerts(&self) -> Vec<ValuationAlert> {
        let requests: Vec<QuoteRequest> = self
            .ledger
            .valuation_targets
            .iter()
            .map(|t| QuoteRequest::new(t.ticker.clone(), self.kind_for_target(t)))
            .collect();
        let quotes = self.quote_service.get_quotes(&requests).await;
        self.valuation_alerts(&quotes)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.ledger.settings
    }

    /// Set the home (reporting) currency. Must be 3 ASCII letters.
    pub fn set_home_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        self.ledger.settings.home_currency = Self::validate_currency(currency)?;
        self.dirty = true;
        Ok(())
    }

    /// Set the currency US stocks and crypto are quoted in.
    pub fn set_foreign_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        self.ledger.settings.foreign_currency = Self::validate_currency(currency)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_fallback_exchange_rate(&mut self, rate: f64) -> Result<(), CoreError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Fallback exchange rate must be a finite positive number, got {rate}"
            )));
        }
        self.ledger.settings.fallback_exchange_rate = rate;
        self.dirty = true;
        Ok(())
    }

    pub fn set_undervalued_threshold(&mut self, pct: f64) -> Result<(), CoreError> {
        if !pct.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Undervalued threshold must be finite, got {pct}"
            )));
        }
        self.ledger.settings.undervalued_threshold_pct = pct;
        self.dirty = true;
        Ok(())
    }

    /// Change the macro cache TTL (1 hour to 1 year). Drops anything already cached.
    pub fn set_macro_cache_ttl_hours(&mut self, hours: i64) -> Result<(), CoreError> {
        Settings::validate_macro_cache_ttl_hours(hours)?;
        self.ledger.settings.macro_cache_ttl_hours = hours;
        self.macro_service = MacroService::new(hours);
        self.dirty = true;
        Ok(())
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Provider Availability ───────────────────────────────────────

    #[must_use]
    pub fn is_provider_available(&self, kind: &QuoteKind) -> bool {
        self.quote_service.has_provider_for(kind)
    }

    #[must_use]
    pub fn get_provider_names(&self, kind: &QuoteKind) -> Vec<String> {
        self.quote_service.get_provider_names(kind)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn validate_currency(currency: &str) -> Result<String, CoreError> {
        let trimmed = currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., KRW, USD)"
            )));
        }
        Ok(trimmed)
    }

    /// Quote kind for a valuation target: its own asset class if set,
    /// else that of the ticker's first trade, else stock.
    fn kind_for_target(&self, target: &ValuationTarget) -> QuoteKind {
        let asset_class = target.asset_class.or_else(|| {
            self.ledger
                .trades
                .iter()
                .find(|t| t.normalized_ticker() == target.ticker)
                .map(|t| t.asset_class)
        });
        asset_class.map(QuoteKind::from).unwrap_or(QuoteKind::Stock)
    }

    /// Ledgers from `load_*` are already validated; one handed to
    /// `with_providers` is repaired here instead.
    fn build(mut ledger: Ledger, registry: QuoteProviderRegistry) -> Self {
        let ttl_hours = ledger.settings.macro_cache_ttl_hours;
        if Settings::validate_macro_cache_ttl_hours(ttl_hours).is_err() {
            let default_hours = Settings::default().macro_cache_ttl_hours;
            log::warn!("Macro cache TTL of {ttl_hours} hours is out of range; using {default_hours}");
            ledger.settings.macro_cache_ttl_hours = default_hours;
        }
        ledger.sort_trades();
        let macro_service = MacroService::new(ledger.settings.macro_cache_ttl_hours);
        Self {
            ledger,
            trade_service: TradeService::new(),
            analytics_service: AnalyticsService::new(),
            quote_service: QuoteService::new(registry),
            currency_service: CurrencyService::new(),
            macro_service,
            stock_search: StockSearchService::empty(),
            dirty: false,
        }
    }
}
