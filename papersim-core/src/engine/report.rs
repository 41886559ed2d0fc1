//! PerformanceReport — the read-only result of a completed backtest.

use crate::domain::Trade;
use serde::{Deserialize, Serialize};

/// One sample of the per-tick equity curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EquityPoint {
    pub tick: usize,
    /// Cash plus marked holdings at this tick's price.
    pub portfolio_value: f64,
    pub price: f64,
    pub cash: f64,
    pub holdings: u64,
    /// Decline from the running portfolio peak, in percent.
    pub drawdown_pct: f64,
    /// Return versus the initial balance, in percent.
    pub cumulative_return_pct: f64,
}

/// One 30-tick return bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReturn {
    pub label: String,
    pub return_pct: f64,
    pub portfolio_value: f64,
}

/// Aggregate result of one backtest run. Produced once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub start_balance: f64,
    /// Final cash balance (holdings not marked in).
    pub end_balance: f64,
    /// Cash plus holdings at the final price.
    pub final_portfolio_value: f64,
    /// Buys and sells executed, combined.
    pub trades_executed: usize,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    /// Winning round trips over total round trips, in percent. 0 with no
    /// round trips.
    pub win_rate: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub volatility_pct: f64,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    pub avg_win_amount: f64,
    pub avg_loss_amount: f64,
    pub equity_curve: Vec<EquityPoint>,
    pub trades: Vec<Trade>,
    pub monthly_returns: Vec<MonthlyReturn>,
}

impl PerformanceReport {
    /// Round trips that closed at a profit.
    pub fn winning_trades(&self) -> usize {
        self.trades.iter().filter(|t| t.is_winner()).count()
    }

    /// Round trips that closed flat or at a loss.
    pub fn losing_trades(&self) -> usize {
        self.trades
            .iter()
            .filter(|t| t.pnl.is_some_and(|p| p <= 0.0))
            .count()
    }

    /// Every metric a renderer divides by is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.end_balance,
            self.final_portfolio_value,
            self.profit_loss,
            self.profit_loss_pct,
            self.win_rate,
            self.max_drawdown_pct,
            self.sharpe_ratio,
            self.volatility_pct,
            self.annualized_return_pct,
            self.avg_win_amount,
            self.avg_loss_amount,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}
