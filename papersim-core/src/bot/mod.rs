//! Live paper-trading bot — a rolling price stream, the shared strategy
//! evaluator, and a fixed-quantity trading account.
//!
//! [`PaperBot`] is the pure state machine: every mutation happens inside an
//! explicit tick method, never behind a timer. [`BotLoop`] adds the
//! cooperative scheduler (start/stop/reset plus two decoupled tick
//! cadences) on top.

pub mod fifo;
pub mod scheduler;

pub use fifo::{match_lots, realized_pnl, Lot};
pub use scheduler::{BotEvent, BotLoop};

use crate::data;
use crate::domain::{OrderSide, PortfolioState, Trade};
use crate::rng::SeedTree;
use crate::strategy::{Signal, SignalContext, Strategy};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use tracing::debug;

/// Configuration of a live bot instance.
#[derive(Debug, Clone, Copy)]
pub struct BotParams {
    pub strategy: Strategy,
    /// Shares per trade (fixed sizing, not cash-maximizing).
    pub trade_quantity: u64,
    /// Transaction fee in percent.
    pub fee_pct: f64,
    pub volatility_pct: f64,
    pub trend_pct: f64,
    pub initial_cash: f64,
    pub initial_price: f64,
    /// Rolling history length; the oldest point is evicted past this.
    pub history_cap: usize,
    pub seed: u64,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            strategy: Strategy::BuyLowSellHigh,
            trade_quantity: 5,
            fee_pct: 0.0,
            volatility_pct: 5.0,
            trend_pct: 0.0,
            initial_cash: 10_000.0,
            initial_price: 100.0,
            history_cap: 100,
            seed: 0,
        }
    }
}

/// The live paper-trading state machine.
///
/// Owns one rolling price history, one trade log, and one
/// [`PortfolioState`] for its lifetime. Realized P&L is recomputed from the
/// trade log by FIFO lot matching after every executed trade.
#[derive(Debug)]
pub struct PaperBot {
    params: BotParams,
    history: Vec<f64>,
    trades: Vec<Trade>,
    portfolio: PortfolioState,
    /// Count of price ticks since start/reset; live trades are stamped
    /// with it.
    tick_count: usize,
    rng: StdRng,
}

/// Minimum history before the evaluator is consulted.
const MIN_DECISION_HISTORY: usize = 5;

impl PaperBot {
    pub fn new(params: BotParams) -> Self {
        Self {
            history: vec![params.initial_price],
            trades: Vec::new(),
            portfolio: PortfolioState::new(params.initial_cash),
            tick_count: 0,
            rng: SeedTree::new(params.seed).rng_for("bot-prices", 0),
            params,
        }
    }

    pub fn params(&self) -> &BotParams {
        &self.params
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn portfolio(&self) -> &PortfolioState {
        &self.portfolio
    }

    /// Mutable portfolio access for the manual order book, which applies
    /// its fills against the same account.
    pub fn portfolio_mut(&mut self) -> &mut PortfolioState {
        &mut self.portfolio
    }

    pub fn last_price(&self) -> f64 {
        self.history.last().copied().unwrap_or(self.params.initial_price)
    }

    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    /// Append one generated price to the rolling history, evicting the
    /// oldest point past the cap.
    pub fn price_tick(&mut self) -> f64 {
        let next = data::step(
            self.last_price(),
            self.params.volatility_pct,
            self.params.trend_pct,
            &mut self.rng,
        );
        self.history.push(next);
        if self.history.len() > self.params.history_cap {
            let excess = self.history.len() - self.params.history_cap;
            self.history.drain(..excess);
        }
        self.tick_count += 1;
        next
    }

    /// Evaluate the strategy at the final index of the rolling history and
    /// execute at most one fixed-quantity trade.
    ///
    /// A buy the account cannot fund, or a sell without `trade_quantity`
    /// shares on hand, is a hold.
    pub fn decision_tick(&mut self, now: DateTime<Utc>) -> Option<Trade> {
        if self.history.len() < MIN_DECISION_HISTORY {
            return None;
        }
        let index = self.history.len() - 1;
        let price = self.history[index];
        let ctx = SignalContext {
            cash: self.portfolio.cash,
            holdings: self.portfolio.holdings,
            fee_pct: self.params.fee_pct,
        };

        let trade = match self.params.strategy.evaluate(&self.history, index, &ctx) {
            Signal::Buy => self.execute_buy(price, now),
            Signal::Sell => self.execute_sell(price, now),
            Signal::Hold => None,
        };

        if trade.is_some() {
            self.portfolio.realized_pnl = fifo::realized_pnl(&self.trades);
        }
        trade
    }

    /// Record a manual-order fill executed against this bot's portfolio.
    ///
    /// The order book has already applied the cash/holdings mutation; this
    /// appends the trade-log entry and refreshes realized P&L.
    pub fn record_fill(
        &mut self,
        side: OrderSide,
        price: f64,
        quantity: u64,
        now: DateTime<Utc>,
    ) -> &Trade {
        self.trades.push(Trade {
            tick: self.tick_count,
            side,
            price,
            quantity,
            cash_after: self.portfolio.cash,
            pnl: None,
            cumulative_pnl: None,
            time: Some(now),
        });
        self.portfolio.realized_pnl = fifo::realized_pnl(&self.trades);
        // Just pushed, so the log is non-empty
        &self.trades[self.trades.len() - 1]
    }

    /// Total portfolio value at the current price.
    pub fn total_value(&self) -> f64 {
        self.portfolio.total_value(self.last_price())
    }

    /// Realized P&L under FIFO lot matching across the trade log.
    pub fn realized_pnl(&self) -> f64 {
        fifo::realized_pnl(&self.trades)
    }

    /// Restore configured initial values: price history, trade log,
    /// portfolio, tick counter, and the price stream's rng seed.
    pub fn reset(&mut self) {
        self.history = vec![self.params.initial_price];
        self.trades.clear();
        self.portfolio = PortfolioState::new(self.params.initial_cash);
        self.tick_count = 0;
        self.rng = SeedTree::new(self.params.seed).rng_for("bot-prices", 0);
    }

    fn execute_buy(&mut self, price: f64, now: DateTime<Utc>) -> Option<Trade> {
        let quantity = self.params.trade_quantity;
        let cost = quantity as f64 * price * (1.0 + self.params.fee_pct / 100.0);
        self.portfolio.apply_buy(quantity, cost).ok()?;
        debug!(tick = self.tick_count, price, quantity, "bot buy");
        let trade = Trade {
            tick: self.tick_count,
            side: OrderSide::Buy,
            price,
            quantity,
            cash_after: self.portfolio.cash,
            pnl: None,
            cumulative_pnl: None,
            time: Some(now),
        };
        self.trades.push(trade.clone());
        Some(trade)
    }

    fn execute_sell(&mut self, price: f64, now: DateTime<Utc>) -> Option<Trade> {
        let quantity = self.params.trade_quantity;
        if self.portfolio.holdings < quantity {
            return None;
        }
        let proceeds = quantity as f64 * price * (1.0 - self.params.fee_pct / 100.0);
        self.portfolio.apply_sell(quantity, proceeds).ok()?;
        debug!(tick = self.tick_count, price, quantity, "bot sell");
        let trade = Trade {
            tick: self.tick_count,
            side: OrderSide::Sell,
            price,
            quantity,
            cash_after: self.portfolio.cash,
            pnl: None,
            cumulative_pnl: None,
            time: Some(now),
        };
        self.trades.push(trade.clone());
        Some(trade)
    }
}
