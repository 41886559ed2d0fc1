//! Indicator library — stateless functions over a price series at an index.
//!
//! Every function here is pure, total, and deterministic. None of them
//! panic or return NaN: insufficient history falls back to a defined
//! neutral value (the current price, RSI 50, collapsed bands, zero
//! momentum), an out-of-range index clamps to the last element, and an
//! empty series yields the neutral fallback outright.

/// Epsilon substituted for a zero average loss so RSI saturates toward 100
/// instead of dividing by zero.
const RSI_LOSS_EPSILON: f64 = 0.01;

/// The three Bollinger bands at one index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Fractional returns over a short and a long lag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Momentum {
    pub short_return: f64,
    pub long_return: f64,
}

/// Simple moving average of the trailing `period` prices ending at `index`.
///
/// With fewer than `period` points of history the current price is
/// returned, not NaN, so early ticks behave like a degenerate 1-period
/// average.
pub fn moving_average(prices: &[f64], period: usize, index: usize) -> f64 {
    let Some(index) = clamp_index(prices, index) else {
        return 0.0;
    };
    if period == 0 || index < period - 1 {
        return prices[index];
    }
    let window = &prices[index + 1 - period..=index];
    window.iter().sum::<f64>() / period as f64
}

/// RSI over the trailing `period` price deltas ending at `index`.
///
/// Simple (non-smoothed) average gain/loss. Neutral 50 until `period`
/// deltas exist. Always in [0, 100].
pub fn rsi(prices: &[f64], period: usize, index: usize) -> f64 {
    let Some(index) = clamp_index(prices, index) else {
        return 50.0;
    };
    if period == 0 || index < period {
        return 50.0;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in index + 1 - period..=index {
        let change = prices[i] - prices[i - 1];
        if change > 0.0 {
            gains += change;
        } else {
            losses += change.abs();
        }
    }

    let avg_gain = gains / period as f64;
    let mut avg_loss = losses / period as f64;
    if avg_loss == 0.0 {
        avg_loss = RSI_LOSS_EPSILON;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Bollinger bands: moving average ± `multiplier` population standard
/// deviations of the trailing window.
///
/// Before a full window exists all three bands collapse to the
/// moving-average fallback (the current price).
pub fn bollinger_bands(prices: &[f64], period: usize, index: usize, multiplier: f64) -> Bands {
    let middle = moving_average(prices, period, index);
    let Some(index) = clamp_index(prices, index) else {
        return Bands {
            upper: middle,
            middle,
            lower: middle,
        };
    };
    if period == 0 || index < period - 1 {
        return Bands {
            upper: middle,
            middle,
            lower: middle,
        };
    }

    let window = &prices[index + 1 - period..=index];
    let variance = window
        .iter()
        .map(|value| {
            let diff = value - middle;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;
    let std_dev = variance.sqrt();

    Bands {
        upper: middle + multiplier * std_dev,
        middle,
        lower: middle - multiplier * std_dev,
    }
}

/// Percentage change over `short_lag` and `long_lag` ticks ending at `index`.
///
/// A component whose lag reaches past the start of the series is 0.0 (a
/// hold signal), as is a component whose base price is zero.
pub fn momentum(prices: &[f64], index: usize, short_lag: usize, long_lag: usize) -> Momentum {
    let Some(index) = clamp_index(prices, index) else {
        return Momentum {
            short_return: 0.0,
            long_return: 0.0,
        };
    };
    Momentum {
        short_return: lagged_return(prices, index, short_lag),
        long_return: lagged_return(prices, index, long_lag),
    }
}

fn lagged_return(prices: &[f64], index: usize, lag: usize) -> f64 {
    if lag == 0 || index < lag {
        return 0.0;
    }
    let base = prices[index - lag];
    if base == 0.0 {
        return 0.0;
    }
    (prices[index] - base) / base
}

/// Clamp an index into the series; `None` for an empty series.
fn clamp_index(prices: &[f64], index: usize) -> Option<usize> {
    if prices.is_empty() {
        None
    } else {
        Some(index.min(prices.len() - 1))
    }
}
