//! Manual order book — market and limit orders matched against the live
//! price.
//!
//! Market orders execute unconditionally at the current price when the
//! account can fund/cover them, else they are rejected with the portfolio
//! untouched. Limit orders already satisfied by the current price fill
//! immediately at the market price; otherwise they rest Pending and are
//! scanned each scheduler tick. Every order id fills at most once — a
//! processed-id set makes repeated scans idempotent. Filled orders are
//! retained a few scans for display, then purged from the active queue.

use crate::domain::{IdGen, Order, OrderId, OrderSide, OrderStatus, PortfolioError, PortfolioState};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Filled orders stay visible for this many scans before being purged.
pub const DEFAULT_RETENTION_TICKS: u64 = 3;

/// A rejected order-book operation. Simulation state is unchanged whenever
/// one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("limit price must be positive, got {0}")]
    InvalidLimitPrice(f64),

    #[error("insufficient funds: need ${required:.2}, have ${available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("insufficient shares: need {required}, have {available}")]
    InsufficientShares { required: u64, available: u64 },

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order {0} cannot be cancelled in state {1:?}")]
    InvalidState(OrderId, OrderStatus),
}

impl From<PortfolioError> for OrderError {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::InsufficientFunds {
                required,
                available,
            } => OrderError::InsufficientFunds {
                required,
                available,
            },
            PortfolioError::InsufficientShares {
                required,
                available,
            } => OrderError::InsufficientShares {
                required,
                available,
            },
        }
    }
}

/// The resident order book. Owns its id counter and processed-id set;
/// fills are applied to the portfolio the caller passes in.
#[derive(Debug)]
pub struct OrderBook {
    orders: Vec<Order>,
    ids: IdGen,
    processed: HashSet<u64>,
    tick: u64,
    retention_ticks: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            ids: IdGen::new(),
            processed: HashSet::new(),
            tick: 0,
            retention_ticks: DEFAULT_RETENTION_TICKS,
        }
    }

    /// Execute a market order at `market_price`.
    ///
    /// Rejected (portfolio untouched) when the quantity is zero, the cash
    /// cannot cover a buy, or the holdings cannot cover a sell.
    pub fn place_market(
        &mut self,
        side: OrderSide,
        quantity: u64,
        market_price: f64,
        portfolio: &mut PortfolioState,
    ) -> Result<Order, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }
        self.apply(side, quantity, market_price, portfolio)?;

        let order = Order {
            id: OrderId(self.ids.next()),
            side,
            limit_price: None,
            quantity,
            status: OrderStatus::Filled,
            placed_at_tick: self.tick,
            filled_at_tick: Some(self.tick),
            fill_price: Some(market_price),
        };
        debug!(id = %order.id, side = side.as_str(), quantity, market_price, "market order filled");
        self.processed.insert(order.id.0);
        self.orders.push(order.clone());
        Ok(order)
    }

    /// Place a limit order.
    ///
    /// Affordability is checked against the limit price. A limit already
    /// satisfied by the current market fills immediately at the market
    /// price (not the limit price); otherwise the order rests Pending.
    pub fn place_limit(
        &mut self,
        side: OrderSide,
        limit_price: f64,
        quantity: u64,
        market_price: f64,
        portfolio: &mut PortfolioState,
    ) -> Result<Order, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }
        if limit_price <= 0.0 {
            return Err(OrderError::InvalidLimitPrice(limit_price));
        }
        match side {
            OrderSide::Buy => {
                let required = limit_price * quantity as f64;
                if required > portfolio.cash {
                    return Err(OrderError::InsufficientFunds {
                        required,
                        available: portfolio.cash,
                    });
                }
            }
            OrderSide::Sell => {
                if quantity > portfolio.holdings {
                    return Err(OrderError::InsufficientShares {
                        required: quantity,
                        available: portfolio.holdings,
                    });
                }
            }
        }

        let already_satisfied = match side {
            OrderSide::Buy => market_price <= limit_price,
            OrderSide::Sell => market_price >= limit_price,
        };

        let id = OrderId(self.ids.next());
        if already_satisfied {
            self.apply(side, quantity, market_price, portfolio)?;
            let order = Order {
                id,
                side,
                limit_price: Some(limit_price),
                quantity,
                status: OrderStatus::Filled,
                placed_at_tick: self.tick,
                filled_at_tick: Some(self.tick),
                fill_price: Some(market_price),
            };
            debug!(id = %order.id, side = side.as_str(), quantity, market_price, "limit order filled at market");
            self.processed.insert(id.0);
            self.orders.push(order.clone());
            Ok(order)
        } else {
            let order = Order {
                id,
                side,
                limit_price: Some(limit_price),
                quantity,
                status: OrderStatus::Pending,
                placed_at_tick: self.tick,
                filled_at_tick: None,
                fill_price: None,
            };
            debug!(id = %order.id, side = side.as_str(), quantity, limit_price, "limit order resting");
            self.orders.push(order.clone());
            Ok(order)
        }
    }

    /// One scheduler tick: fill every resting order whose limit the market
    /// has crossed, then purge stale filled orders.
    ///
    /// Each id is processed at most once, so re-scanning the same market
    /// price cannot double-fill. A triggered order the portfolio can no
    /// longer fund/cover is Cancelled, not partially filled.
    pub fn scan(&mut self, market_price: f64, portfolio: &mut PortfolioState) -> Vec<Order> {
        self.tick += 1;
        let mut fills = Vec::new();

        for i in 0..self.orders.len() {
            let order = &self.orders[i];
            if !order.is_pending()
                || self.processed.contains(&order.id.0)
                || !order.crossed(market_price)
            {
                continue;
            }
            // Resting fills execute at the limit price
            let (id, side, quantity) = (order.id, order.side, order.quantity);
            let fill_price = order.limit_price.unwrap_or(market_price);

            self.processed.insert(id.0);
            match self.apply(side, quantity, fill_price, portfolio) {
                Ok(()) => {
                    let order = &mut self.orders[i];
                    order.status = OrderStatus::Filled;
                    order.filled_at_tick = Some(self.tick);
                    order.fill_price = Some(fill_price);
                    debug!(id = %id, side = side.as_str(), quantity, fill_price, "resting limit filled");
                    fills.push(order.clone());
                }
                Err(_) => {
                    // No longer fundable/coverable: cancel rather than
                    // partially fill or leave armed.
                    self.orders[i].status = OrderStatus::Cancelled;
                    debug!(id = %id, "resting limit cancelled on unfundable trigger");
                }
            }
        }

        let tick = self.tick;
        let retention = self.retention_ticks;
        self.orders.retain(|order| match order.status {
            OrderStatus::Pending => true,
            OrderStatus::Filled => order
                .filled_at_tick
                .is_some_and(|filled| tick.saturating_sub(filled) < retention),
            OrderStatus::Cancelled => false,
        });

        fills
    }

    /// Cancel a resting order. Only Pending orders can be cancelled.
    pub fn cancel(&mut self, id: OrderId) -> Result<(), OrderError> {
        let Some(index) = self.orders.iter().position(|o| o.id == id) else {
            return Err(OrderError::OrderNotFound(id));
        };
        if self.orders[index].status != OrderStatus::Pending {
            return Err(OrderError::InvalidState(id, self.orders[index].status));
        }
        self.orders.remove(index);
        Ok(())
    }

    pub fn pending(&self) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.is_pending()).collect()
    }

    /// Filled orders still inside their display-retention window.
    pub fn recently_filled(&self) -> Vec<&Order> {
        self.orders.iter().filter(|o| o.is_filled()).collect()
    }

    /// Clear all orders and counters back to a fresh book.
    pub fn reset(&mut self) {
        self.orders.clear();
        self.ids.reset();
        self.processed.clear();
        self.tick = 0;
    }

    fn apply(
        &self,
        side: OrderSide,
        quantity: u64,
        price: f64,
        portfolio: &mut PortfolioState,
    ) -> Result<(), OrderError> {
        let notional = price * quantity as f64;
        match side {
            OrderSide::Buy => portfolio.apply_buy(quantity, notional)?,
            OrderSide::Sell => portfolio.apply_sell(quantity, notional)?,
        }
        Ok(())
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
