//! OHLC candles and single/two-candle pattern classification.
//!
//! Candles are derived aggregates over a tick window (or generated directly
//! by [`crate::data::candle_stream`]). The structural invariants hold by
//! construction: `high >= max(open, close)` and `low <= min(open, close)`.

use serde::{Deserialize, Serialize};

/// One OHLC candle with volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Classical candlestick patterns the classifier recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandlePattern {
    Doji,
    Hammer,
    InvertedHammer,
    ShootingStar,
    HangingMan,
    BullishEngulfing,
    BearishEngulfing,
    Star,
}

/// How pronounced a detected pattern is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternStrength {
    Weak,
    Moderate,
    Strong,
}

impl Candle {
    /// Aggregate a window of tick prices into one candle.
    ///
    /// Open is the first tick, close the last, high/low the extremes.
    /// Returns `None` for an empty window.
    pub fn from_ticks(ticks: &[f64], volume: u64) -> Option<Self> {
        let (&open, &close) = (ticks.first()?, ticks.last()?);
        let high = ticks.iter().copied().fold(f64::MIN, f64::max);
        let low = ticks.iter().copied().fold(f64::MAX, f64::min);
        Some(Self {
            open,
            high,
            low,
            close,
            volume,
        })
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Classify this candle, optionally against its predecessor (engulfing
    /// patterns need two candles).
    ///
    /// Single-candle rules compare wick lengths to the body; a zero-range
    /// candle (flat window) matches nothing.
    pub fn pattern(&self, prev: Option<&Candle>) -> Option<(CandlePattern, PatternStrength)> {
        let body = self.body();
        let range = self.range();
        if range <= 0.0 {
            return None;
        }
        let upper = self.upper_wick();
        let lower = self.lower_wick();
        let body_ratio = body / range;

        if body < range * 0.1 && upper > body * 1.5 && lower > body * 1.5 {
            let strength = if upper > body * 3.0 && lower > body * 3.0 {
                PatternStrength::Strong
            } else {
                PatternStrength::Moderate
            };
            return Some((CandlePattern::Doji, strength));
        }

        if body_ratio > 0.3 && lower > body * 2.0 && upper < body * 0.5 {
            let strength = if lower > body * 3.0 {
                PatternStrength::Strong
            } else {
                PatternStrength::Moderate
            };
            let pattern = if self.is_bullish() {
                CandlePattern::Hammer
            } else {
                CandlePattern::HangingMan
            };
            return Some((pattern, strength));
        }

        if body_ratio > 0.3 && upper > body * 2.0 && lower < body * 0.5 {
            let strength = if upper > body * 3.0 {
                PatternStrength::Strong
            } else {
                PatternStrength::Moderate
            };
            let pattern = if self.is_bullish() {
                CandlePattern::InvertedHammer
            } else {
                CandlePattern::ShootingStar
            };
            return Some((pattern, strength));
        }

        if let Some(prev) = prev {
            let prev_body = prev.body();

            // Engulfing: this body swallows the previous, opposite-color body
            if self.is_bullish()
                && !prev.is_bullish()
                && self.open < prev.close
                && self.close > prev.open
                && body > prev_body * 1.2
            {
                let strength = if body > prev_body * 1.5 {
                    PatternStrength::Strong
                } else {
                    PatternStrength::Moderate
                };
                return Some((CandlePattern::BullishEngulfing, strength));
            }

            if !self.is_bullish()
                && prev.is_bullish()
                && self.open > prev.close
                && self.close < prev.open
                && body > prev_body * 1.2
            {
                let strength = if body > prev_body * 1.5 {
                    PatternStrength::Strong
                } else {
                    PatternStrength::Moderate
                };
                return Some((CandlePattern::BearishEngulfing, strength));
            }
        }

        // Small symmetric body: indecision star
        if body < range * 0.2 && (upper - lower).abs() < range * 0.3 {
            return Some((CandlePattern::Star, PatternStrength::Weak));
        }

        None
    }
}
