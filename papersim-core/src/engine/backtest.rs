//! The tick-by-tick backtest loop.
//!
//! Each tick is one ordered transition: strategy evaluation, trade
//! application, equity sampling, monthly bucketing. Buys size to the full
//! affordable share count; sells always close the whole position. Fees
//! apply proportionally to buy cost and sell proceeds.

use crate::domain::{OrderSide, PortfolioState, Trade};
use crate::engine::config::{BacktestConfig, ValidationError};
use crate::engine::metrics::{
    annualized_return, mean, sharpe_ratio, std_dev, tick_returns, volatility_pct,
};
use crate::engine::report::{EquityPoint, MonthlyReturn, PerformanceReport};
use crate::strategy::{Signal, SignalContext};
use tracing::{debug, info};

/// Equity snapshots bucket into a "month" every this many ticks.
const TICKS_PER_MONTH: usize = 30;

/// Round-trip bookkeeping the loop threads through sells.
#[derive(Default)]
struct TradeStats {
    winning: usize,
    losing: usize,
    total: usize,
    total_win_amount: f64,
    total_loss_amount: f64,
    consecutive_wins: usize,
    consecutive_losses: usize,
    max_consecutive_wins: usize,
    max_consecutive_losses: usize,
}

impl TradeStats {
    fn record(&mut self, pnl: f64) {
        self.total += 1;
        if pnl > 0.0 {
            self.winning += 1;
            self.total_win_amount += pnl;
            self.consecutive_wins += 1;
            self.consecutive_losses = 0;
            self.max_consecutive_wins = self.max_consecutive_wins.max(self.consecutive_wins);
        } else {
            self.losing += 1;
            self.total_loss_amount += pnl.abs();
            self.consecutive_losses += 1;
            self.consecutive_wins = 0;
            self.max_consecutive_losses = self.max_consecutive_losses.max(self.consecutive_losses);
        }
    }

    fn win_rate_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.winning as f64 / self.total as f64 * 100.0
    }

    fn avg_win(&self) -> f64 {
        if self.winning == 0 {
            return 0.0;
        }
        self.total_win_amount / self.winning as f64
    }

    fn avg_loss(&self) -> f64 {
        if self.losing == 0 {
            return 0.0;
        }
        self.total_loss_amount / self.losing as f64
    }
}

/// Run a full backtest over `prices`.
///
/// Validation happens before any simulation; a rejected configuration
/// produces no partial report. The run itself is synchronous and
/// deterministic — identical inputs yield an identical report.
pub fn run(prices: &[f64], config: &BacktestConfig) -> Result<PerformanceReport, ValidationError> {
    config.validate(prices.len())?;

    let fee = config.fee_pct / 100.0;
    let mut portfolio = PortfolioState::new(config.initial_balance);
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(prices.len());
    let mut monthly_returns: Vec<MonthlyReturn> = Vec::new();
    let mut stats = TradeStats::default();

    let mut last_buy_price = 0.0;
    let mut cumulative_pnl = 0.0;
    let mut peak_value = config.initial_balance;
    let mut max_drawdown_pct = 0.0_f64;
    let mut trades_executed = 0;

    for (tick, &price) in prices.iter().enumerate() {
        let ctx = SignalContext {
            cash: portfolio.cash,
            holdings: portfolio.holdings,
            fee_pct: config.fee_pct,
        };

        match config.strategy.evaluate(prices, tick, &ctx) {
            Signal::Buy if price > 0.0 => {
                let unit_cost = price * (1.0 + fee);
                let shares = (portfolio.cash / unit_cost).floor() as u64;
                if shares > 0 {
                    // Cap at available cash: the floor guarantees the cost
                    // fits up to float rounding.
                    let cost = (shares as f64 * unit_cost).min(portfolio.cash);
                    if portfolio.apply_buy(shares, cost).is_ok() {
                        last_buy_price = price;
                        trades_executed += 1;
                        debug!(tick, price, shares, "buy");
                        trades.push(Trade {
                            tick,
                            side: OrderSide::Buy,
                            price,
                            quantity: shares,
                            cash_after: portfolio.cash,
                            pnl: None,
                            cumulative_pnl: Some(cumulative_pnl),
                            time: None,
                        });
                    }
                }
            }
            Signal::Sell => {
                let quantity = portfolio.holdings;
                let gross = quantity as f64 * price;
                let proceeds = gross * (1.0 - fee);
                if quantity > 0 && portfolio.apply_sell(quantity, proceeds).is_ok() {
                    let pnl = proceeds - quantity as f64 * last_buy_price;
                    cumulative_pnl += pnl;
                    portfolio.realized_pnl += pnl;
                    stats.record(pnl);
                    trades_executed += 1;
                    debug!(tick, price, quantity, pnl, "sell");
                    trades.push(Trade {
                        tick,
                        side: OrderSide::Sell,
                        price,
                        quantity,
                        cash_after: portfolio.cash,
                        pnl: Some(pnl),
                        cumulative_pnl: Some(cumulative_pnl),
                        time: None,
                    });
                }
            }
            // Hold, or a buy against a degenerate non-positive price
            _ => {}
        }

        // Equity sample for this tick
        let portfolio_value = portfolio.total_value(price);
        peak_value = peak_value.max(portfolio_value);
        let drawdown_pct = if peak_value > 0.0 {
            (peak_value - portfolio_value) / peak_value * 100.0
        } else {
            0.0
        };
        max_drawdown_pct = max_drawdown_pct.max(drawdown_pct);
        let cumulative_return_pct =
            (portfolio_value - config.initial_balance) / config.initial_balance * 100.0;

        equity_curve.push(EquityPoint {
            tick,
            portfolio_value,
            price,
            cash: portfolio.cash,
            holdings: portfolio.holdings,
            drawdown_pct,
            cumulative_return_pct,
        });

        // Monthly bucket every 30 ticks and on the final tick
        if tick % TICKS_PER_MONTH == 0 || tick == prices.len() - 1 {
            let month_index = tick / TICKS_PER_MONTH;
            let prev_value = if month_index > 0 {
                monthly_returns
                    .get(month_index - 1)
                    .map(|m| m.portfolio_value)
                    .unwrap_or(config.initial_balance)
            } else {
                config.initial_balance
            };
            let return_pct = if prev_value > 0.0 {
                (portfolio_value - prev_value) / prev_value * 100.0
            } else {
                0.0
            };
            monthly_returns.push(MonthlyReturn {
                label: format!("Month {}", month_index + 1),
                return_pct,
                portfolio_value,
            });
        }
    }

    // Final-stage metrics
    let final_price = prices[prices.len() - 1];
    let final_portfolio_value = portfolio.total_value(final_price);
    let profit_loss = final_portfolio_value - config.initial_balance;
    let profit_loss_pct = profit_loss / config.initial_balance * 100.0;

    let equity_values: Vec<f64> = equity_curve.iter().map(|p| p.portfolio_value).collect();
    let returns = tick_returns(&equity_values);
    let mean_return = mean(&returns);
    let std_return = std_dev(&returns);

    let report = PerformanceReport {
        start_balance: config.initial_balance,
        end_balance: portfolio.cash,
        final_portfolio_value,
        trades_executed,
        profit_loss,
        profit_loss_pct,
        win_rate: stats.win_rate_pct(),
        max_drawdown_pct,
        sharpe_ratio: sharpe_ratio(mean_return, std_return),
        volatility_pct: volatility_pct(std_return),
        total_return_pct: profit_loss_pct,
        annualized_return_pct: annualized_return(
            final_portfolio_value,
            config.initial_balance,
            prices.len(),
        ) * 100.0,
        max_consecutive_wins: stats.max_consecutive_wins,
        max_consecutive_losses: stats.max_consecutive_losses,
        avg_win_amount: stats.avg_win(),
        avg_loss_amount: stats.avg_loss(),
        equity_curve,
        trades,
        monthly_returns,
    };

    info!(
        strategy = %config.strategy,
        ticks = prices.len(),
        trades = report.trades_executed,
        final_value = report.final_portfolio_value,
        "backtest complete"
    );

    Ok(report)
}
