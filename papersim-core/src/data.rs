//! Synthetic market data — seeded random walks and candle streams.
//!
//! Both the backtester (historical mode) and the live bot (streaming mode)
//! draw prices from the same percentage random walk; the historical sample
//! adds sine-modulated volatility and periodic drift flips so a long series
//! cannot trend without bound. All generators take the random source as a
//! parameter, so a seeded rng reproduces a series exactly.

use crate::domain::{Candle, PRICE_FLOOR};
use rand::Rng;

/// Length of the historical sample series (one year of daily ticks).
pub const SAMPLE_LENGTH: usize = 365;

/// Drift sign flips every this many ticks in the historical sample.
const DRIFT_FLIP_INTERVAL: usize = 100;

/// One step of the percentage random walk used by the live price stream.
///
/// `volatility_pct` scales a uniform shock in (−0.5, 0.5); `trend_pct / 10`
/// is the per-tick drift. The result is floored at [`PRICE_FLOOR`].
pub fn step(prev: f64, volatility_pct: f64, trend_pct: f64, rng: &mut impl Rng) -> f64 {
    let shock = (rng.gen::<f64>() - 0.5) * volatility_pct;
    let drift = trend_pct / 10.0;
    (prev * (1.0 + (shock + drift) / 100.0)).max(PRICE_FLOOR)
}

/// Generate a full walk of `length` prices starting at `initial_price`.
///
/// Element 0 is the (floored) initial price itself; `length == 0` yields an
/// empty series.
pub fn generate(
    initial_price: f64,
    length: usize,
    volatility_pct: f64,
    trend_pct: f64,
    rng: &mut impl Rng,
) -> Vec<f64> {
    if length == 0 {
        return Vec::new();
    }
    let mut prices = Vec::with_capacity(length);
    prices.push(initial_price.max(PRICE_FLOOR));
    for _ in 1..length {
        let prev = *prices.last().unwrap_or(&initial_price);
        prices.push(step(prev, volatility_pct, trend_pct, rng));
    }
    prices
}

/// The backtester's sample series: `length` ticks starting at 100.0.
///
/// Per-tick volatility breathes with `0.02 + 0.01 * sin(i / 30)`; additive
/// noise is a uniform shock scaled by volatility and price, on top of a
/// drift that starts at 0.001 and is multiplied by −0.5 every
/// [`DRIFT_FLIP_INTERVAL`] ticks. Prices are floored, then rounded to cents.
pub fn historical_sample(length: usize, rng: &mut impl Rng) -> Vec<f64> {
    let mut prices = Vec::with_capacity(length);
    let mut price: f64 = 100.0;
    let mut drift = 0.001;

    for i in 0..length {
        let volatility = 0.02 + 0.01 * (i as f64 / 30.0).sin();
        let noise = (rng.gen::<f64>() - 0.5) * volatility * price;
        price = (price + noise + drift * price).max(PRICE_FLOOR);

        if i > 0 && i % DRIFT_FLIP_INTERVAL == 0 {
            drift *= -0.5;
        }

        prices.push((price * 100.0).round() / 100.0);
    }
    prices
}

/// Random OHLC candles around a slowly trending base price.
///
/// The base oscillates sinusoidally with the tick; open and close are
/// shocked around it, and the wicks extend beyond the body so the candle
/// invariants hold by construction.
pub fn candle_stream(
    length: usize,
    base_price: f64,
    volatility: f64,
    rng: &mut impl Rng,
) -> Vec<Candle> {
    (0..length)
        .map(|i| {
            let base = base_price + (i as f64 / 10.0).sin() * base_price * 0.1;
            let open = base + (rng.gen::<f64>() - 0.5) * volatility;
            let close = open + (rng.gen::<f64>() - 0.5) * volatility;
            let high = open.max(close) + rng.gen::<f64>() * volatility * 0.8;
            let low = (open.min(close) - rng.gen::<f64>() * volatility * 0.8).max(PRICE_FLOOR);
            let volume = rng.gen_range(5_000..15_000);
            Candle {
                open: round_cents(open.max(PRICE_FLOOR)),
                high: round_cents(high.max(PRICE_FLOOR)),
                low: round_cents(low),
                close: round_cents(close.max(PRICE_FLOOR)),
                volume,
            }
        })
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
