//! Manual order types and lifecycle states.

use super::ids::OrderId;
use super::trade::OrderSide;
use serde::{Deserialize, Serialize};

/// Order lifecycle states.
///
/// Market orders and already-satisfied limit orders are created Filled;
/// resting limit orders are created Pending and transition to Filled when
/// the market crosses their limit, or to Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Filled,
    Cancelled,
}

/// A manual order against the live market price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: OrderSide,
    /// Resting price for limit orders; `None` for market orders.
    pub limit_price: Option<f64>,
    pub quantity: u64,
    pub status: OrderStatus,
    /// Book tick at which the order was placed.
    pub placed_at_tick: u64,
    /// Book tick at which the order filled, if it did.
    pub filled_at_tick: Option<u64>,
    /// Price the fill actually executed at. Immediate fills execute at the
    /// market price; resting limit fills execute at the limit price.
    pub fill_price: Option<f64>,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }

    /// Whether a pending limit order's condition is met at `market_price`.
    ///
    /// Buy limits fill when the market trades at or below the limit; sell
    /// limits when it trades at or above. Market orders (no limit price)
    /// never rest, so this is false for them.
    pub fn crossed(&self, market_price: f64) -> bool {
        match (self.side, self.limit_price) {
            (OrderSide::Buy, Some(limit)) => market_price <= limit,
            (OrderSide::Sell, Some(limit)) => market_price >= limit,
            (_, None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit_order(side: OrderSide, limit: f64) -> Order {
        Order {
            id: OrderId(1),
            side,
            limit_price: Some(limit),
            quantity: 10,
            status: OrderStatus::Pending,
            placed_at_tick: 0,
            filled_at_tick: None,
            fill_price: None,
        }
    }

    #[test]
    fn buy_limit_crosses_at_or_below() {
        let order = limit_order(OrderSide::Buy, 95.0);
        assert!(order.crossed(95.0));
        assert!(order.crossed(90.0));
        assert!(!order.crossed(96.0));
    }

    #[test]
    fn sell_limit_crosses_at_or_above() {
        let order = limit_order(OrderSide::Sell, 105.0);
        assert!(order.crossed(105.0));
        assert!(order.crossed(110.0));
        assert!(!order.crossed(104.99));
    }

    #[test]
    fn market_order_never_rests() {
        let mut order = limit_order(OrderSide::Buy, 95.0);
        order.limit_price = None;
        assert!(!order.crossed(1.0));
    }
}
