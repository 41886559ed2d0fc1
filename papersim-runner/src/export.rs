//! Artifact export — report JSON plus equity and trade CSVs.
//!
//! Layout under the output directory:
//! - `report.json` — the full `RunOutcome`, pretty-printed
//! - `equity.csv`  — one row per tick of the equity curve
//! - `trades.csv`  — one row per executed trade

use crate::runner::RunOutcome;
use anyhow::{Context, Result};
use papersim_core::domain::Trade;
use papersim_core::engine::EquityPoint;
use std::path::{Path, PathBuf};

/// Write all artifacts for a run. Returns the paths written.
pub fn save_artifacts(outcome: &RunOutcome, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let report_path = output_dir.join("report.json");
    let json = serde_json::to_string_pretty(outcome).context("failed to serialize outcome")?;
    std::fs::write(&report_path, json)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    let equity_path = output_dir.join("equity.csv");
    std::fs::write(&equity_path, equity_csv(&outcome.report.equity_curve)?)
        .with_context(|| format!("failed to write {}", equity_path.display()))?;

    let trades_path = output_dir.join("trades.csv");
    std::fs::write(&trades_path, trades_csv(&outcome.report.trades)?)
        .with_context(|| format!("failed to write {}", trades_path.display()))?;

    Ok(vec![report_path, equity_path, trades_path])
}

/// Render the equity curve as CSV.
pub fn equity_csv(curve: &[EquityPoint]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "tick",
        "portfolio_value",
        "price",
        "cash",
        "holdings",
        "drawdown_pct",
        "cumulative_return_pct",
    ])?;
    for point in curve {
        writer.write_record([
            point.tick.to_string(),
            format!("{:.4}", point.portfolio_value),
            format!("{:.4}", point.price),
            format!("{:.4}", point.cash),
            point.holdings.to_string(),
            format!("{:.4}", point.drawdown_pct),
            format!("{:.4}", point.cumulative_return_pct),
        ])?;
    }
    let bytes = writer.into_inner().context("failed to flush equity CSV")?;
    String::from_utf8(bytes).context("equity CSV was not UTF-8")
}

/// Render the trade log as CSV.
pub fn trades_csv(trades: &[Trade]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["tick", "side", "price", "quantity", "cash_after", "pnl", "cumulative_pnl"])?;
    for trade in trades {
        writer.write_record([
            trade.tick.to_string(),
            trade.side.as_str().to_string(),
            format!("{:.4}", trade.price),
            trade.quantity.to_string(),
            format!("{:.4}", trade.cash_after),
            trade.pnl.map(|p| format!("{p:.4}")).unwrap_or_default(),
            trade
                .cumulative_pnl
                .map(|p| format!("{p:.4}"))
                .unwrap_or_default(),
        ])?;
    }
    let bytes = writer.into_inner().context("failed to flush trades CSV")?;
    String::from_utf8(bytes).context("trades CSV was not UTF-8")
}
