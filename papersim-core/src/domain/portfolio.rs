//! PortfolioState — cash and holdings of one simulation instance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rejected portfolio mutation. The state is unchanged whenever one of
/// these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    #[error("insufficient funds: need ${required:.2}, have ${available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("insufficient shares: need {required}, have {available}")]
    InsufficientShares { required: u64, available: u64 },
}

/// Cash and holdings of a single simulated account.
///
/// Mutated only through [`apply_buy`](Self::apply_buy) and
/// [`apply_sell`](Self::apply_sell), which reject rather than drive cash or
/// holdings negative. Each backtest run and each bot instance owns exactly
/// one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioState {
    pub cash: f64,
    pub holdings: u64,
    /// Cumulative gross cost of all buys (fees included).
    pub total_invested: f64,
    /// Realized profit/loss accumulated by the owner of this state.
    pub realized_pnl: f64,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            holdings: 0,
            total_invested: 0.0,
            realized_pnl: 0.0,
        }
    }

    /// Total value at the given market price: cash plus marked holdings.
    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.holdings as f64 * price
    }

    /// Debit `cost` and credit `quantity` shares. Rejects when cash would
    /// go negative.
    pub fn apply_buy(&mut self, quantity: u64, cost: f64) -> Result<(), PortfolioError> {
        if cost > self.cash {
            return Err(PortfolioError::InsufficientFunds {
                required: cost,
                available: self.cash,
            });
        }
        self.cash -= cost;
        self.holdings += quantity;
        self.total_invested += cost;
        Ok(())
    }

    /// Credit `proceeds` and debit `quantity` shares. Rejects when holdings
    /// would go negative.
    pub fn apply_sell(&mut self, quantity: u64, proceeds: f64) -> Result<(), PortfolioError> {
        if quantity > self.holdings {
            return Err(PortfolioError::InsufficientShares {
                required: quantity,
                available: self.holdings,
            });
        }
        self.cash += proceeds;
        self.holdings -= quantity;
        Ok(())
    }
}
