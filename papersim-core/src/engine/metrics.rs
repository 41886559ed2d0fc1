//! Performance metrics — pure functions over the equity curve.
//!
//! Every division here checks its denominator; the fallbacks are 0.0, so
//! NaN can never leak into a report.

/// Ticks per year for annualization (calendar days, as the simulator treats
/// one tick as one day in historical mode).
pub const PERIODS_PER_YEAR: f64 = 365.0;

/// Annual risk-free rate used by the Sharpe ratio.
pub const RISK_FREE_ANNUAL: f64 = 0.02;

/// Per-tick fractional returns of an equity series, filtered to finite
/// values. A non-positive base value contributes 0.0.
pub fn tick_returns(equity: &[f64]) -> Vec<f64> {
    equity
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .filter(|r| r.is_finite())
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N). 0.0 below two samples.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Annualized return as a fraction: `(final/initial)^(365/ticks) - 1`.
///
/// 0.0 when either value is non-positive or there are no ticks.
pub fn annualized_return(final_value: f64, initial_value: f64, ticks: usize) -> f64 {
    if initial_value <= 0.0 || final_value <= 0.0 || ticks == 0 {
        return 0.0;
    }
    (final_value / initial_value).powf(PERIODS_PER_YEAR / ticks as f64) - 1.0
}

/// Annualized Sharpe ratio from per-tick return mean and deviation.
///
/// 0.0 when the deviation is zero (constant returns carry no risk signal).
pub fn sharpe_ratio(mean_return: f64, std_dev_return: f64) -> f64 {
    if std_dev_return <= 0.0 {
        return 0.0;
    }
    let risk_free_daily = RISK_FREE_ANNUAL / PERIODS_PER_YEAR;
    (mean_return - risk_free_daily) / std_dev_return * PERIODS_PER_YEAR.sqrt()
}

/// Annualized volatility in percent.
pub fn volatility_pct(std_dev_return: f64) -> f64 {
    std_dev_return * PERIODS_PER_YEAR.sqrt() * 100.0
}
