//! Single-run orchestration: resolve data, run the engine, stamp metadata.

use crate::config::RunConfig;
use crate::data::load_prices;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use papersim_core::engine::{self, PerformanceReport};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A completed run: the report plus the series it ran over and timing
/// metadata for exported artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub config: RunConfig,
    pub prices: Vec<f64>,
    pub report: PerformanceReport,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
}

/// Resolve the configured price series and run one backtest.
pub fn run_single_backtest(config: &RunConfig) -> Result<RunOutcome> {
    let started_at = Utc::now();
    let started = std::time::Instant::now();

    let prices = load_prices(&config.data).context("failed to load price data")?;
    info!(
        strategy = %config.strategy,
        ticks = prices.len(),
        "starting backtest"
    );

    let report = engine::run(&prices, &config.engine_config())
        .context("backtest configuration rejected")?;

    Ok(RunOutcome {
        config: config.clone(),
        prices,
        report,
        started_at,
        duration_secs: started.elapsed().as_secs_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataConfig, SyntheticConfig};
    use papersim_core::strategy::Strategy;

    #[test]
    fn runs_with_synthetic_data() {
        let config = RunConfig::new(Strategy::BuyLowSellHigh, 10_000.0, 0.1);
        let outcome = run_single_backtest(&config).unwrap();
        assert_eq!(outcome.prices.len(), papersim_core::data::SAMPLE_LENGTH);
        assert_eq!(outcome.report.start_balance, 10_000.0);
        assert!(outcome.report.is_finite());
    }

    #[test]
    fn same_seed_same_report() {
        let mut config = RunConfig::new(Strategy::Momentum, 10_000.0, 0.1);
        config.data = DataConfig::Synthetic(SyntheticConfig {
            length: 200,
            seed: 31,
        });
        let a = run_single_backtest(&config).unwrap();
        let b = run_single_backtest(&config).unwrap();
        assert_eq!(a.prices, b.prices);
        assert_eq!(
            a.report.final_portfolio_value,
            b.report.final_portfolio_value
        );
        assert_eq!(a.report.trades_executed, b.report.trades_executed);
    }

    #[test]
    fn invalid_config_surfaces_as_error() {
        let config = RunConfig::new(Strategy::Momentum, 1.0, 0.1);
        assert!(run_single_backtest(&config).is_err());
    }
}
