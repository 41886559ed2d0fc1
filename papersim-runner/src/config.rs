//! Serializable run configuration.
//!
//! A `RunConfig` captures everything needed to reproduce a backtest: the
//! strategy, account parameters, and where the price series comes from
//! (a seeded synthetic walk or an external CSV file). Configs are read
//! from TOML:
//!
//! ```toml
//! strategy = "MEAN_REVERSION"
//! initial_balance = 10000.0
//! fee_pct = 0.1
//!
//! [data.synthetic]
//! length = 365
//! seed = 42
//! ```

use papersim_core::engine::BacktestConfig;
use papersim_core::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where the price series comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DataConfig {
    /// Generate the historical sample walk.
    Synthetic(SyntheticConfig),
    /// Load one price per record from a CSV file.
    Csv { path: PathBuf },
}

/// Parameters of the synthetic series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SyntheticConfig {
    #[serde(default = "default_length")]
    pub length: usize,
    #[serde(default)]
    pub seed: u64,
}

fn default_length() -> usize {
    papersim_core::data::SAMPLE_LENGTH
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            seed: 0,
        }
    }
}

/// One reproducible backtest run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub strategy: Strategy,
    pub initial_balance: f64,
    /// Transaction fee in percent.
    #[serde(default)]
    pub fee_pct: f64,
    #[serde(default = "default_data")]
    pub data: DataConfig,
}

fn default_data() -> DataConfig {
    DataConfig::Synthetic(SyntheticConfig::default())
}

impl RunConfig {
    pub fn new(strategy: Strategy, initial_balance: f64, fee_pct: f64) -> Self {
        Self {
            strategy,
            initial_balance,
            fee_pct,
            data: default_data(),
        }
    }

    /// Parse a TOML config file.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// The engine-facing slice of this config.
    pub fn engine_config(&self) -> BacktestConfig {
        BacktestConfig::new(self.strategy, self.initial_balance, self.fee_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_toml() {
        let config: RunConfig = toml::from_str(
            r#"
            strategy = "MEAN_REVERSION"
            initial_balance = 10000.0
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, Strategy::MeanReversion);
        assert_eq!(config.fee_pct, 0.0);
        assert_eq!(
            config.data,
            DataConfig::Synthetic(SyntheticConfig::default())
        );
    }

    #[test]
    fn parses_synthetic_data_section() {
        let config: RunConfig = toml::from_str(
            r#"
            strategy = "TREND_FOLLOWING"
            initial_balance = 50000.0
            fee_pct = 0.25

            [data.synthetic]
            length = 500
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(
            config.data,
            DataConfig::Synthetic(SyntheticConfig {
                length: 500,
                seed: 7
            })
        );
    }

    #[test]
    fn parses_csv_data_section() {
        let config: RunConfig = toml::from_str(
            r#"
            strategy = "BOLLINGER_BANDS"
            initial_balance = 10000.0

            [data.csv]
            path = "prices.csv"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.data,
            DataConfig::Csv {
                path: PathBuf::from("prices.csv")
            }
        );
    }

    #[test]
    fn toml_roundtrip() {
        let config = RunConfig::new(Strategy::Momentum, 25_000.0, 0.5);
        let text = toml::to_string(&config).unwrap();
        let parsed: RunConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
