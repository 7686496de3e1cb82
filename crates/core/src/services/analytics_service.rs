use log::debug;
use std::collections::HashMap;

use crate::models::analytics::{roi_pct, Holding, PortfolioStats, Position};
use crate::models::quote::PriceQuote;
use crate::models::trade::{Account, Trade, TradeType};

/// Positions at or below this quantity count as sold out.
pub const QUANTITY_EPSILON: f64 = 1e-6;

/// Exchange rate applied when the caller supplies none.
pub const DEFAULT_EXCHANGE_RATE: f64 = 1.0;

/// Turns trade history and current quotes into valued positions and
/// portfolio totals.
///
/// Cost basis is weighted-average: every buy blends into a single average
/// price, and sells remove cost at that average without changing it.
/// Everything here is a pure function of its inputs.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Replay trades in input order into one [`Holding`] per
    /// (normalized ticker, account), including depleted and negative ones.
    ///
    /// Holdings come back in order of first appearance.
    pub fn build_holdings(&self, trades: &[Trade]) -> Vec<Holding> {
        let mut holdings: Vec<Holding> = Vec::new();
        let mut index: HashMap<(String, Account), usize> = HashMap::new();

        for trade in trades {
            let ticker = trade.normalized_ticker();
            let key = (ticker.clone(), trade.account);
            let idx = *index.entry(key).or_insert_with(|| {
                holdings.push(Holding {
                    ticker,
                    account: trade.account,
                    asset_class: trade.asset_class,
                    name: None,
                    quantity: 0.0,
                    total_cost: 0.0,
                    avg_price: 0.0,
                });
                holdings.len() - 1
            });

            let holding = &mut holdings[idx];
            if holding.name.is_none() {
                holding.name = trade.name.clone();
            }
            Self::apply_trade(holding, trade);
        }

        holdings
    }

    /// Value every live position and roll up portfolio totals.
    ///
    /// - `current_prices` are matched by normalized ticker; missing or
    ///   error-flagged quotes fall back to the position's average price.
    /// - `exchange_rate` is home-currency units per foreign unit and applies
    ///   to both value and cost basis of US stock and crypto positions.
    ///   Defaults to 1.
    ///
    /// Never fails. ROI is `None` wherever invested value is zero.
    pub fn calculate_portfolio_stats(
        &self,
        trades: &[Trade],
        current_prices: &[PriceQuote],
        exchange_rate: Option<f64>,
    ) -> PortfolioStats {
        let rate = exchange_rate.unwrap_or(DEFAULT_EXCHANGE_RATE);
        let quotes = Self::index_quotes(current_prices);

        let mut stats = PortfolioStats::default();

        for holding in self.build_holdings(trades) {
            if holding.quantity <= QUANTITY_EPSILON {
                debug!(
                    "Skipping depleted position {} ({}): quantity {}",
                    holding.ticker, holding.account, holding.quantity
                );
                continue;
            }

            let quoted = quotes.get(holding.ticker.as_str()).copied();
            let current_price = quoted.unwrap_or(holding.avg_price);

            let mut current_value = holding.quantity * current_price;
            let mut invested_value = holding.total_cost;
            if holding.asset_class.is_foreign_currency() {
                current_value *= rate;
                invested_value *= rate;
            }

            stats.total_invested += invested_value;
            stats.total_value += current_value;
            stats
                .by_asset_class
                .entry(holding.asset_class)
                .or_default()
                .add(invested_value, current_value);
            stats
                .by_account
                .entry(holding.account)
                .or_default()
                .add(invested_value, current_value);

            stats.assets.push(Position {
                ticker: holding.ticker,
                name: holding.name,
                asset_class: holding.asset_class,
                account: holding.account,
                quantity: holding.quantity,
                avg_price: holding.avg_price,
                total_cost: holding.total_cost,
                current_price,
                priced_from_quote: quoted.is_some(),
                current_value,
                invested_value,
                profit: current_value - invested_value,
                roi: roi_pct(invested_value, current_value),
                allocation_pct: 0.0,
            });
        }

        if stats.total_value > 0.0 {
            for position in &mut stats.assets {
                position.allocation_pct = position.current_value / stats.total_value * 100.0;
            }
        }

        stats.net_profit = stats.total_value - stats.total_invested;
        stats.roi = roi_pct(stats.total_invested, stats.total_value);
        stats
    }

    fn apply_trade(holding: &mut Holding, trade: &Trade) {
        match trade.trade_type {
            TradeType::Buy => {
                holding.quantity += trade.quantity;
                holding.total_cost += trade.price * trade.quantity;
            }
            TradeType::Sell => {
                holding.total_cost -= trade.quantity * holding.avg_price;
                holding.quantity -= trade.quantity;
            }
        }

        if holding.quantity > 0.0 {
            holding.avg_price = holding.total_cost / holding.quantity;
        } else {
            holding.total_cost = 0.0;
            holding.avg_price = 0.0;
        }
    }

    /// Usable price per normalized ticker. The first usable quote wins.
    fn index_quotes(quotes: &[PriceQuote]) -> HashMap<String, f64> {
        let mut index = HashMap::with_capacity(quotes.len());
        for quote in quotes {
            if let Some(price) = quote.usable_price() {
                index.entry(quote.normalized_ticker()).or_insert(price);
            }
        }
        index
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
