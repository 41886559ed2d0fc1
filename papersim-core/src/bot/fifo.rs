//! FIFO lot matching over a trade log.
//!
//! Each sell consumes the oldest outstanding buy lots first, partially
//! consuming a lot when the sell is smaller. Realized P&L is the sum over
//! consumed quantity of (sell price − lot price). Sell quantity beyond the
//! recorded buy lots is ignored (manual fills can sell shares the log never
//! saw bought).

use crate::domain::{OrderSide, Trade};
use std::collections::VecDeque;

/// An outstanding buy lot: shares bought at a price, not yet sold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lot {
    pub price: f64,
    pub quantity: u64,
}

/// Replay the trade log through FIFO matching.
///
/// Returns the realized P&L and the still-open lots, oldest first.
pub fn match_lots(trades: &[Trade]) -> (f64, VecDeque<Lot>) {
    let mut lots: VecDeque<Lot> = VecDeque::new();
    let mut realized = 0.0;

    for trade in trades {
        match trade.side {
            OrderSide::Buy => lots.push_back(Lot {
                price: trade.price,
                quantity: trade.quantity,
            }),
            OrderSide::Sell => {
                let mut remaining = trade.quantity;
                while remaining > 0 {
                    let Some(oldest) = lots.front_mut() else {
                        break;
                    };
                    let consumed = remaining.min(oldest.quantity);
                    realized += (trade.price - oldest.price) * consumed as f64;
                    oldest.quantity -= consumed;
                    remaining -= consumed;
                    if oldest.quantity == 0 {
                        lots.pop_front();
                    }
                }
            }
        }
    }

    (realized, lots)
}

/// Realized P&L of the log under FIFO matching.
pub fn realized_pnl(trades: &[Trade]) -> f64 {
    match_lots(trades).0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(side: OrderSide, price: f64, quantity: u64) -> Trade {
        Trade {
            tick: 0,
            side,
            price,
            quantity,
            cash_after: 0.0,
            pnl: None,
            cumulative_pnl: None,
            time: None,
        }
    }

    #[test]
    fn partial_lot_consumption() {
        // BUY 10@$10, BUY 10@$20, SELL 15@$30
        // → realized = 15*30 - (10*10 + 5*20) = 450 - 200 = 250
        // → remaining lot: 5 units at $20
        let trades = vec![
            trade(OrderSide::Buy, 10.0, 10),
            trade(OrderSide::Buy, 20.0, 10),
            trade(OrderSide::Sell, 30.0, 15),
        ];
        let (realized, lots) = match_lots(&trades);
        assert!((realized - 250.0).abs() < 1e-10);
        assert_eq!(lots.len(), 1);
        assert_eq!(
            lots[0],
            Lot {
                price: 20.0,
                quantity: 5
            }
        );
    }

    #[test]
    fn oldest_lot_consumed_first() {
        let trades = vec![
            trade(OrderSide::Buy, 10.0, 5),
            trade(OrderSide::Buy, 30.0, 5),
            trade(OrderSide::Sell, 20.0, 5),
        ];
        // The $10 lot goes first: 5 * (20 - 10) = +50
        assert!((realized_pnl(&trades) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn sell_beyond_open_lots_ignores_excess() {
        let trades = vec![
            trade(OrderSide::Buy, 10.0, 5),
            trade(OrderSide::Sell, 20.0, 8),
        ];
        // Only 5 shares match: 5 * 10 = 50; the other 3 have no cost basis
        assert!((realized_pnl(&trades) - 50.0).abs() < 1e-10);
        assert!(match_lots(&trades).1.is_empty());
    }

    #[test]
    fn losses_are_negative() {
        let trades = vec![
            trade(OrderSide::Buy, 50.0, 10),
            trade(OrderSide::Sell, 40.0, 10),
        ];
        assert!((realized_pnl(&trades) - (-100.0)).abs() < 1e-10);
    }

    #[test]
    fn empty_log_is_zero() {
        assert_eq!(realized_pnl(&[]), 0.0);
    }

    #[test]
    fn buys_alone_realize_nothing() {
        let trades = vec![
            trade(OrderSide::Buy, 10.0, 5),
            trade(OrderSide::Buy, 12.0, 5),
        ];
        let (realized, lots) = match_lots(&trades);
        assert_eq!(realized, 0.0);
        assert_eq!(lots.len(), 2);
    }
}
