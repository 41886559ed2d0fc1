//! Trade — one executed buy or sell, immutable once appended to the log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the market a trade or order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

/// A single executed trade.
///
/// Backtest trades carry only the tick index; live trades also carry the
/// wall-clock time the tick fired. `pnl` is present on sells only (a round
/// trip closes on the sell), `cumulative_pnl` on every trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub tick: usize,
    pub side: OrderSide,
    pub price: f64,
    pub quantity: u64,
    /// Cash balance after this trade settled.
    pub cash_after: f64,
    /// Realized profit/loss of the round trip this sell closed.
    pub pnl: Option<f64>,
    pub cumulative_pnl: Option<f64>,
    /// Wall-clock execution time (live mode only).
    pub time: Option<DateTime<Utc>>,
}

impl Trade {
    /// Gross notional of the trade (price × quantity, before fees).
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }

    pub fn is_winner(&self) -> bool {
        self.pnl.is_some_and(|p| p > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sell() -> Trade {
        Trade {
            tick: 17,
            side: OrderSide::Sell,
            price: 110.0,
            quantity: 40,
            cash_after: 10_400.0,
            pnl: Some(400.0),
            cumulative_pnl: Some(400.0),
            time: None,
        }
    }

    #[test]
    fn notional_is_price_times_quantity() {
        assert_eq!(sample_sell().notional(), 4_400.0);
    }

    #[test]
    fn winner_requires_positive_pnl() {
        assert!(sample_sell().is_winner());

        let mut losing = sample_sell();
        losing.pnl = Some(-10.0);
        assert!(!losing.is_winner());

        let mut buy = sample_sell();
        buy.side = OrderSide::Buy;
        buy.pnl = None;
        assert!(!buy.is_winner());
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_sell();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade.tick, deser.tick);
        assert_eq!(trade.side, deser.side);
        assert_eq!(trade.pnl, deser.pnl);
    }
}
