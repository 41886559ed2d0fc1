//! Full pipeline: TOML config → price loading → engine → artifacts.

use papersim_runner::config::{DataConfig, RunConfig};
use papersim_runner::export::save_artifacts;
use papersim_runner::runner::run_single_backtest;
use papersim_runner::sweep::compare_strategies;
use papersim_core::strategy::Strategy;
use std::io::Write;

#[test]
fn toml_config_drives_a_full_run() {
    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
        strategy = "BOLLINGER_BANDS"
        initial_balance = 25000.0
        fee_pct = 0.2

        [data.synthetic]
        length = 300
        seed = 99
        "#
    )
    .unwrap();
    config_file.flush().unwrap();

    let config = RunConfig::from_toml_file(config_file.path()).unwrap();
    assert_eq!(config.strategy, Strategy::BollingerBands);

    let outcome = run_single_backtest(&config).unwrap();
    assert_eq!(outcome.prices.len(), 300);
    assert_eq!(outcome.report.start_balance, 25_000.0);
    assert!(outcome.report.is_finite());
}

#[test]
fn csv_prices_feed_the_engine_verbatim() {
    let mut price_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(price_file, "price").unwrap();
    for i in 0..60 {
        writeln!(price_file, "{}", 100.0 + (i as f64) * 0.25).unwrap();
    }
    price_file.flush().unwrap();

    let mut config = RunConfig::new(Strategy::BuyLowSellHigh, 10_000.0, 0.0);
    config.data = DataConfig::Csv {
        path: price_file.path().to_path_buf(),
    };

    let outcome = run_single_backtest(&config).unwrap();
    assert_eq!(outcome.prices.len(), 60);
    assert_eq!(outcome.prices[0], 100.0);
    assert_eq!(outcome.report.equity_curve.len(), 60);
}

#[test]
fn artifacts_roundtrip_through_disk() {
    let config = RunConfig::new(Strategy::TrendFollowing, 10_000.0, 0.1);
    let outcome = run_single_backtest(&config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let paths = save_artifacts(&outcome, dir.path()).unwrap();
    assert_eq!(paths.len(), 3);

    let equity = std::fs::read_to_string(dir.path().join("equity.csv")).unwrap();
    assert_eq!(
        equity.lines().count(),
        outcome.report.equity_curve.len() + 1
    );
}

#[test]
fn sweep_runs_from_generated_series() {
    let config = RunConfig::new(Strategy::BuyLowSellHigh, 10_000.0, 0.1);
    let outcome = run_single_backtest(&config).unwrap();

    let results = compare_strategies(&outcome.prices, 10_000.0, 0.1).unwrap();
    assert_eq!(results.len(), 5);
    // The single run's strategy appears with an identical final value
    let same = results
        .iter()
        .find(|r| r.strategy == Strategy::BuyLowSellHigh)
        .unwrap();
    assert_eq!(
        same.report.final_portfolio_value,
        outcome.report.final_portfolio_value
    );
}
