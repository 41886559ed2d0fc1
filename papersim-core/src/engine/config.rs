//! Backtest configuration and its validation bounds.

use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted starting balance.
pub const MIN_BALANCE: f64 = 100.0;
/// Largest accepted starting balance.
pub const MAX_BALANCE: f64 = 10_000_000.0;
/// Largest accepted transaction fee, in percent.
pub const MAX_FEE_PCT: f64 = 5.0;
/// Minimum number of price points for a meaningful run.
pub const MIN_HISTORY: usize = 30;

/// A configuration rejected before any simulation executes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("initial balance must be at least $100, got ${0:.2}")]
    BalanceTooLow(f64),

    #[error("initial balance cannot exceed $10,000,000, got ${0:.2}")]
    BalanceTooHigh(f64),

    #[error("transaction fee must be between 0% and 5%, got {0}%")]
    FeeOutOfRange(f64),

    #[error("need at least 30 price points for meaningful backtesting, got {0}")]
    InsufficientHistory(usize),
}

/// Parameters of one backtest run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub strategy: Strategy,
    pub initial_balance: f64,
    /// Transaction fee in percent, applied to buy cost and sell proceeds.
    pub fee_pct: f64,
}

impl BacktestConfig {
    pub fn new(strategy: Strategy, initial_balance: f64, fee_pct: f64) -> Self {
        Self {
            strategy,
            initial_balance,
            fee_pct,
        }
    }

    /// Check balance, fee, and history-length bounds.
    pub fn validate(&self, history_len: usize) -> Result<(), ValidationError> {
        if self.initial_balance < MIN_BALANCE {
            return Err(ValidationError::BalanceTooLow(self.initial_balance));
        }
        if self.initial_balance > MAX_BALANCE {
            return Err(ValidationError::BalanceTooHigh(self.initial_balance));
        }
        if !(0.0..=MAX_FEE_PCT).contains(&self.fee_pct) {
            return Err(ValidationError::FeeOutOfRange(self.fee_pct));
        }
        if history_len < MIN_HISTORY {
            return Err(ValidationError::InsufficientHistory(history_len));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(balance: f64, fee: f64) -> BacktestConfig {
        BacktestConfig::new(Strategy::BuyLowSellHigh, balance, fee)
    }

    #[test]
    fn accepts_in_range_configuration() {
        assert!(config(10_000.0, 0.1).validate(365).is_ok());
        assert!(config(MIN_BALANCE, 0.0).validate(MIN_HISTORY).is_ok());
        assert!(config(MAX_BALANCE, MAX_FEE_PCT).validate(365).is_ok());
    }

    #[test]
    fn rejects_balance_out_of_range() {
        assert_eq!(
            config(50.0, 0.1).validate(365),
            Err(ValidationError::BalanceTooLow(50.0))
        );
        assert_eq!(
            config(20_000_000.0, 0.1).validate(365),
            Err(ValidationError::BalanceTooHigh(20_000_000.0))
        );
    }

    #[test]
    fn rejects_fee_out_of_range() {
        assert_eq!(
            config(10_000.0, -0.1).validate(365),
            Err(ValidationError::FeeOutOfRange(-0.1))
        );
        assert_eq!(
            config(10_000.0, 5.5).validate(365),
            Err(ValidationError::FeeOutOfRange(5.5))
        );
    }

    #[test]
    fn rejects_short_history() {
        assert_eq!(
            config(10_000.0, 0.1).validate(29),
            Err(ValidationError::InsufficientHistory(29))
        );
    }
}
