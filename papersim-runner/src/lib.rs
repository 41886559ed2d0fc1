//! PaperSim Runner — orchestration around the core engine.
//!
//! - TOML run configuration (synthetic or CSV-supplied price data)
//! - Price loading: external CSV history with a synthetic fallback
//! - Single-run execution with timing metadata
//! - Parallel all-strategy comparison sweep
//! - JSON/CSV artifact export

pub mod config;
pub mod data;
pub mod export;
pub mod runner;
pub mod sweep;

pub use config::{DataConfig, RunConfig};
pub use data::load_prices;
pub use export::save_artifacts;
pub use runner::{run_single_backtest, RunOutcome};
pub use sweep::{compare_strategies, StrategyComparison};
