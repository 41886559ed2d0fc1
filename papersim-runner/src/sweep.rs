//! Strategy comparison sweep.
//!
//! Runs every built-in strategy over the same price series in parallel.
//! Each run owns its portfolio and trade log, so the fan-out shares
//! nothing; the input series is fixed before the fan-out, which keeps the
//! sweep deterministic regardless of scheduling.

use anyhow::{Context, Result};
use papersim_core::engine::{self, BacktestConfig, PerformanceReport};
use papersim_core::strategy::Strategy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One strategy's result within a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub strategy: Strategy,
    pub report: PerformanceReport,
}

/// Run all five strategies over `prices`, sorted best final value first.
pub fn compare_strategies(
    prices: &[f64],
    initial_balance: f64,
    fee_pct: f64,
) -> Result<Vec<StrategyComparison>> {
    let mut results: Vec<StrategyComparison> = Strategy::ALL
        .par_iter()
        .map(|&strategy| {
            let config = BacktestConfig::new(strategy, initial_balance, fee_pct);
            let report = engine::run(prices, &config)
                .with_context(|| format!("backtest failed for {strategy}"))?;
            Ok(StrategyComparison { strategy, report })
        })
        .collect::<Result<_>>()?;

    results.sort_by(|a, b| {
        b.report
            .final_portfolio_value
            .total_cmp(&a.report.final_portfolio_value)
    });

    info!(
        best = %results[0].strategy,
        best_final = results[0].report.final_portfolio_value,
        "strategy comparison complete"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyntheticConfig;
    use crate::data::generate_synthetic;

    fn sample_prices() -> Vec<f64> {
        generate_synthetic(&SyntheticConfig {
            length: 250,
            seed: 12,
        })
    }

    #[test]
    fn covers_every_strategy_once() {
        let results = compare_strategies(&sample_prices(), 10_000.0, 0.1).unwrap();
        assert_eq!(results.len(), Strategy::ALL.len());
        for strategy in Strategy::ALL {
            assert_eq!(
                results.iter().filter(|r| r.strategy == strategy).count(),
                1,
                "{strategy} missing or duplicated"
            );
        }
    }

    #[test]
    fn sorted_best_first() {
        let results = compare_strategies(&sample_prices(), 10_000.0, 0.1).unwrap();
        for pair in results.windows(2) {
            assert!(
                pair[0].report.final_portfolio_value >= pair[1].report.final_portfolio_value
            );
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let prices = sample_prices();
        let a = compare_strategies(&prices, 10_000.0, 0.1).unwrap();
        let b = compare_strategies(&prices, 10_000.0, 0.1).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.strategy, y.strategy);
            assert_eq!(
                x.report.final_portfolio_value,
                y.report.final_portfolio_value
            );
        }
    }

    #[test]
    fn propagates_validation_failure() {
        assert!(compare_strategies(&sample_prices(), 1.0, 0.1).is_err());
    }
}
