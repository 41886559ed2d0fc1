//! Strategy evaluator — five decision rules shared by the backtester and
//! the live bot.
//!
//! A strategy decision is a pure function of the price history, the current
//! index, and the caller's position context. The affordability guard (can
//! the account fund one share at the current price plus fee) and the
//! holdings guard (is there anything to sell) are part of the rule itself:
//! an unfundable buy or an uncovered sell evaluates to Hold.

use crate::indicators::{bollinger_bands, momentum, moving_average, rsi};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discount below the 20-tick average that triggers a value buy.
const VALUE_BUY_DISCOUNT: f64 = 0.95;
/// Premium above the 20-tick average that triggers a value sell.
const VALUE_SELL_PREMIUM: f64 = 1.05;
/// RSI thresholds for mean reversion.
const RSI_OVERSOLD: f64 = 25.0;
const RSI_OVERBOUGHT: f64 = 75.0;
/// Momentum entry thresholds: 3% over 5 ticks and 5% over 10 ticks.
const MOMENTUM_SHORT_ENTRY: f64 = 0.03;
const MOMENTUM_LONG_ENTRY: f64 = 0.05;
const MOMENTUM_SHORT_EXIT: f64 = -0.03;
/// Bollinger band width in standard deviations.
const BOLLINGER_MULTIPLIER: f64 = 2.0;

/// What the evaluator wants to do at this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

/// The caller's position context at evaluation time.
#[derive(Debug, Clone, Copy)]
pub struct SignalContext {
    pub cash: f64,
    pub holdings: u64,
    /// Transaction fee in percent (0.1 = 0.1%).
    pub fee_pct: f64,
}

impl SignalContext {
    /// Whether at least one share is fundable at `price` including the fee.
    fn can_afford(&self, price: f64) -> bool {
        self.cash >= price * (1.0 + self.fee_pct / 100.0)
    }

    fn is_holding(&self) -> bool {
        self.holdings > 0
    }
}

/// The five built-in trading strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    BuyLowSellHigh,
    TrendFollowing,
    MeanReversion,
    Momentum,
    BollingerBands,
}

impl Strategy {
    /// Every strategy, in display order. Used by the comparison sweep.
    pub const ALL: [Strategy; 5] = [
        Strategy::BuyLowSellHigh,
        Strategy::TrendFollowing,
        Strategy::MeanReversion,
        Strategy::Momentum,
        Strategy::BollingerBands,
    ];

    /// One-line description of the rule, as shown in the UI.
    pub fn description(&self) -> &'static str {
        match self {
            Strategy::BuyLowSellHigh => {
                "Buy when price is 5% below the 20-tick MA (with trend confirmation), sell when 5% above"
            }
            Strategy::TrendFollowing => {
                "Buy when 10-tick MA > 20-tick MA > 50-tick MA, sell when the trend reverses"
            }
            Strategy::MeanReversion => {
                "Buy when RSI < 25 and price is below the 20-tick MA, sell when RSI > 75"
            }
            Strategy::Momentum => {
                "Buy on strong momentum (3% in 5 ticks, 5% in 10 ticks), sell on reversal"
            }
            Strategy::BollingerBands => {
                "Buy when price touches the lower Bollinger band, sell when it touches the upper"
            }
        }
    }

    /// Evaluate the strategy at `index` of `prices`.
    ///
    /// Tie-break: when a rule's buy and sell conditions are both true on the
    /// same tick, Sell wins while a position is open and Buy wins only when
    /// flat. This is the one precedence rule used everywhere; it is covered
    /// by a dedicated test.
    pub fn evaluate(&self, prices: &[f64], index: usize, ctx: &SignalContext) -> Signal {
        if prices.is_empty() || index >= prices.len() {
            return Signal::Hold;
        }
        let price = prices[index];

        let (should_buy, should_sell) = match self {
            Strategy::BuyLowSellHigh => {
                let ma20 = moving_average(prices, 20, index);
                let ma50 = moving_average(prices, 50, index);
                (
                    price < ma20 * VALUE_BUY_DISCOUNT && ma20 > ma50 && ctx.can_afford(price),
                    price > ma20 * VALUE_SELL_PREMIUM && ctx.is_holding(),
                )
            }
            Strategy::TrendFollowing => {
                if index < 20 {
                    (false, false)
                } else {
                    let ma10 = moving_average(prices, 10, index);
                    let ma20 = moving_average(prices, 20, index);
                    let ma50 = moving_average(prices, 50, index);
                    (
                        ma10 > ma20 && ma20 > ma50 && ctx.can_afford(price),
                        ma10 < ma20 && ctx.is_holding(),
                    )
                }
            }
            Strategy::MeanReversion => {
                let rsi14 = rsi(prices, 14, index);
                let ma20 = moving_average(prices, 20, index);
                (
                    rsi14 < RSI_OVERSOLD && price < ma20 && ctx.can_afford(price),
                    rsi14 > RSI_OVERBOUGHT && ctx.is_holding(),
                )
            }
            Strategy::Momentum => {
                if index < 10 {
                    (false, false)
                } else {
                    let m = momentum(prices, index, 5, 10);
                    (
                        m.short_return > MOMENTUM_SHORT_ENTRY
                            && m.long_return > MOMENTUM_LONG_ENTRY
                            && ctx.can_afford(price),
                        m.short_return < MOMENTUM_SHORT_EXIT && ctx.is_holding(),
                    )
                }
            }
            Strategy::BollingerBands => {
                let bands = bollinger_bands(prices, 20, index, BOLLINGER_MULTIPLIER);
                (
                    price < bands.lower && ctx.can_afford(price),
                    price > bands.upper && ctx.is_holding(),
                )
            }
        };

        resolve_signal(should_buy, should_sell, ctx.is_holding())
    }
}

/// Collapse a (buy, sell) condition pair into one signal.
///
/// The thresholds of every built-in rule are mutually exclusive, but the
/// precedence when both sides fire must still be defined: Sell wins while a
/// position is open, Buy wins only when flat.
fn resolve_signal(should_buy: bool, should_sell: bool, holding: bool) -> Signal {
    match (should_buy, should_sell) {
        (true, true) => {
            if holding {
                Signal::Sell
            } else {
                Signal::Buy
            }
        }
        (true, false) => Signal::Buy,
        (false, true) => Signal::Sell,
        (false, false) => Signal::Hold,
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::BuyLowSellHigh => "buy-low-sell-high",
            Strategy::TrendFollowing => "trend-following",
            Strategy::MeanReversion => "mean-reversion",
            Strategy::Momentum => "momentum",
            Strategy::BollingerBands => "bollinger-bands",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "buy-low-sell-high" => Ok(Strategy::BuyLowSellHigh),
            "trend-following" => Ok(Strategy::TrendFollowing),
            "mean-reversion" => Ok(Strategy::MeanReversion),
            "momentum" => Ok(Strategy::Momentum),
            "bollinger-bands" => Ok(Strategy::BollingerBands),
            other => Err(format!(
                "unknown strategy '{other}' (expected one of: buy-low-sell-high, \
                 trend-following, mean-reversion, momentum, bollinger-bands)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flush_ctx() -> SignalContext {
        SignalContext {
            cash: 1_000_000.0,
            holdings: 0,
            fee_pct: 0.0,
        }
    }

    fn holding_ctx() -> SignalContext {
        SignalContext {
            cash: 1_000_000.0,
            holdings: 10,
            fee_pct: 0.0,
        }
    }

    // ── Flat series: nothing ever fires ──

    #[test]
    fn flat_series_holds_for_every_strategy() {
        let prices = vec![100.0; 60];
        for strategy in Strategy::ALL {
            for index in 1..prices.len() {
                assert_eq!(
                    strategy.evaluate(&prices, index, &flush_ctx()),
                    Signal::Hold,
                    "{strategy} fired on a flat series at {index}"
                );
                assert_eq!(
                    strategy.evaluate(&prices, index, &holding_ctx()),
                    Signal::Hold,
                    "{strategy} fired on a flat series at {index} while holding"
                );
            }
        }
    }

    // ── Affordability and holdings guards ──

    #[test]
    fn unfundable_buy_is_hold() {
        // Deep dip below the 20-tick average: a clear value buy
        let mut prices = vec![100.0; 30];
        prices.push(80.0);
        let index = prices.len() - 1;

        let broke = SignalContext {
            cash: 10.0,
            holdings: 0,
            fee_pct: 0.0,
        };
        assert_eq!(
            Strategy::BuyLowSellHigh.evaluate(&prices, index, &broke),
            Signal::Hold
        );
        assert_eq!(
            Strategy::BuyLowSellHigh.evaluate(&prices, index, &flush_ctx()),
            Signal::Buy
        );
    }

    #[test]
    fn fee_counts_against_affordability() {
        let mut prices = vec![100.0; 30];
        prices.push(80.0);
        let index = prices.len() - 1;

        // Exactly the share price, but not the fee on top
        let tight = SignalContext {
            cash: 80.0,
            holdings: 0,
            fee_pct: 1.0,
        };
        assert_eq!(
            Strategy::BuyLowSellHigh.evaluate(&prices, index, &tight),
            Signal::Hold
        );
    }

    #[test]
    fn uncovered_sell_is_hold() {
        // Spike above the 20-tick average: a clear value sell
        let mut prices = vec![100.0; 30];
        prices.push(120.0);
        let index = prices.len() - 1;

        assert_eq!(
            Strategy::BuyLowSellHigh.evaluate(&prices, index, &flush_ctx()),
            Signal::Hold
        );
        assert_eq!(
            Strategy::BuyLowSellHigh.evaluate(&prices, index, &holding_ctx()),
            Signal::Sell
        );
    }

    // ── Individual rules ──

    #[test]
    fn trend_following_gated_before_tick_20() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        assert_eq!(
            Strategy::TrendFollowing.evaluate(&prices, 19, &flush_ctx()),
            Signal::Hold
        );
        // A steady uptrend has MA10 > MA20 > MA50 once the gate opens
        assert_eq!(
            Strategy::TrendFollowing.evaluate(&prices, 59, &flush_ctx()),
            Signal::Buy
        );
    }

    #[test]
    fn trend_following_sells_on_reversal() {
        // Long uptrend, then a sharp collapse pulls MA10 under MA20
        let mut prices: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        prices.extend((0..10).map(|i| 148.0 - 8.0 * i as f64));
        let index = prices.len() - 1;
        assert_eq!(
            Strategy::TrendFollowing.evaluate(&prices, index, &holding_ctx()),
            Signal::Sell
        );
    }

    #[test]
    fn momentum_gated_before_tick_10() {
        let prices: Vec<f64> = (0..12).map(|i| 100.0 * 1.1f64.powi(i)).collect();
        assert_eq!(
            Strategy::Momentum.evaluate(&prices, 9, &flush_ctx()),
            Signal::Hold
        );
        assert_eq!(
            Strategy::Momentum.evaluate(&prices, 11, &flush_ctx()),
            Signal::Buy
        );
    }

    #[test]
    fn mean_reversion_buys_oversold_below_average() {
        // Steady decline: RSI 0, price below its trailing average
        let prices: Vec<f64> = (0..30).map(|i| 200.0 - 3.0 * i as f64).collect();
        let index = prices.len() - 1;
        assert_eq!(
            Strategy::MeanReversion.evaluate(&prices, index, &flush_ctx()),
            Signal::Buy
        );
    }

    #[test]
    fn bollinger_buys_below_lower_band() {
        let mut prices = vec![100.0, 101.0, 99.0, 100.0, 102.0, 98.0, 101.0, 99.0, 100.0, 101.0];
        prices.extend_from_slice(&[99.0, 100.0, 102.0, 98.0, 101.0, 99.0, 100.0, 101.0, 99.0, 100.0]);
        prices.push(80.0); // far below the band
        let index = prices.len() - 1;
        assert_eq!(
            Strategy::BollingerBands.evaluate(&prices, index, &flush_ctx()),
            Signal::Buy
        );
    }

    // ── Tie-break ──

    /// The rules' thresholds make a simultaneous buy+sell geometrically
    /// impossible, so the precedence is pinned down on the resolver itself.
    #[test]
    fn tie_break_prefers_sell_when_holding() {
        assert_eq!(resolve_signal(true, true, true), Signal::Sell);
        assert_eq!(resolve_signal(true, true, false), Signal::Buy);
    }

    #[test]
    fn resolver_single_conditions() {
        assert_eq!(resolve_signal(true, false, false), Signal::Buy);
        assert_eq!(resolve_signal(false, true, true), Signal::Sell);
        assert_eq!(resolve_signal(false, false, false), Signal::Hold);
    }

    // ── Parsing and display ──

    #[test]
    fn strategy_from_str_roundtrip() {
        for strategy in Strategy::ALL {
            let parsed: Strategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
        // Underscore form is accepted too
        assert_eq!(
            "BUY_LOW_SELL_HIGH".parse::<Strategy>().unwrap(),
            Strategy::BuyLowSellHigh
        );
        assert!("macd".parse::<Strategy>().is_err());
    }

    #[test]
    fn descriptions_are_nonempty() {
        for strategy in Strategy::ALL {
            assert!(!strategy.description().is_empty());
        }
    }
}
