use log::{debug, warn};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::ledger::Ledger;
use crate::models::ticker::normalize_ticker;
use crate::models::trade::{Account, Trade, TradeType};

/// Records trades in a ledger and applies administrative corrections.
///
/// Pure business logic — no I/O, no API calls.
pub struct TradeService;

impl TradeService {
    pub fn new() -> Self {
        Self
    }

    /// Validate and record a trade, keeping the ledger in date order.
    /// Trades on the same date keep their insertion order.
    ///
    /// Selling more than is held is allowed (the ledger may start mid-history)
    /// but logged; the aggregator drops positions that end up depleted.
    pub fn add_trade(&self, ledger: &mut Ledger, trade: Trade) -> Result<(), CoreError> {
        trade.validate()?;

        if trade.trade_type == TradeType::Sell {
            let held = self.quantity_held(ledger, &trade.ticker, trade.account);
            if held + 1e-9 < trade.quantity {
                warn!(
                    "Recording sell of {} {} in {} with only {held} held",
                    trade.quantity, trade.ticker, trade.account
                );
            }
        }

        debug!("Recording {} {} x{}", trade.trade_type, trade.ticker, trade.quantity);
        Self::ordered_insert(&mut ledger.trades, trade);
        Ok(())
    }

    /// Remove a trade by id, returning it.
    pub fn remove_trade(&self, ledger: &mut Ledger, trade_id: Uuid) -> Result<Trade, CoreError> {
        let idx = Self::index_of(ledger, trade_id)?;
        Ok(ledger.trades.remove(idx))
    }

    /// Move a trade to another account. The only permitted edit.
    pub fn reassign_account(
        &self,
        ledger: &mut Ledger,
        trade_id: Uuid,
        account: Account,
    ) -> Result<(), CoreError> {
        let idx = Self::index_of(ledger, trade_id)?;
        ledger.trades[idx].account = account;
        Ok(())
    }

    /// Move every trade of `ticker` booked in `from` to `to`.
    /// Returns the number of trades changed.
    pub fn reassign_ticker_account(
        &self,
        ledger: &mut Ledger,
        ticker: &str,
        from: Account,
        to: Account,
    ) -> usize {
        let wanted = normalize_ticker(ticker);
        let mut changed = 0;
        for trade in ledger
            .trades
            .iter_mut()
            .filter(|t| t.account == from && t.normalized_ticker() == wanted)
        {
            trade.account = to;
            changed += 1;
        }
        changed
    }

    /// All trades, newest first.
    pub fn get_trades<'a>(&self, ledger: &'a Ledger) -> Vec<&'a Trade> {
        ledger.trades.iter().rev().collect()
    }

    /// Trades for a ticker (any suffix variant), newest first.
    pub fn get_trades_for_ticker<'a>(&self, ledger: &'a Ledger, ticker: &str) -> Vec<&'a Trade> {
        let wanted = normalize_ticker(ticker);
        ledger
            .trades
            .iter()
            .rev()
            .filter(|t| t.normalized_ticker() == wanted)
            .collect()
    }

    /// Trades booked in an account, newest first.
    pub fn get_trades_for_account<'a>(&self, ledger: &'a Ledger, account: Account) -> Vec<&'a Trade> {
        ledger
            .trades
            .iter()
            .rev()
            .filter(|t| t.account == account)
            .collect()
    }

    /// Net quantity of a ticker currently held in an account.
    pub fn quantity_held(&self, ledger: &Ledger, ticker: &str, account: Account) -> f64 {
        let wanted = normalize_ticker(ticker);
        ledger
            .trades
            .iter()
            .filter(|t| t.account == account && t.normalized_ticker() == wanted)
            .map(Trade::signed_quantity)
            .sum()
    }

    fn index_of(ledger: &Ledger, trade_id: Uuid) -> Result<usize, CoreError> {
        ledger
            .trades
            .iter()
            .position(|t| t.id == trade_id)
            .ok_or_else(|| CoreError::TradeNotFound(trade_id.to_string()))
    }

    /// Insert after every trade dated on or before `trade.date`.
    fn ordered_insert(trades: &mut Vec<Trade>, trade: Trade) {
        let pos = trades.partition_point(|t| t.date <= trade.date);
        trades.insert(pos, trade);
    }
}

impl Default for TradeService {
    fn default() -> Self {
        Self::new()
    }
}
