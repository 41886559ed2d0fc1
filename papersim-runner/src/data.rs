//! Price loading — external CSV history with a synthetic fallback.
//!
//! The engine accepts any in-memory price slice; this module is the file
//! form of that contract. A CSV supplies one price per record (first
//! column; a non-numeric header row is skipped). When no file is
//! configured, the seeded historical sample is generated instead.

use crate::config::{DataConfig, SyntheticConfig};
use anyhow::{bail, Context, Result};
use papersim_core::data::historical_sample;
use papersim_core::rng::SeedTree;
use std::path::Path;

/// Resolve a data config into a price series.
pub fn load_prices(data: &DataConfig) -> Result<Vec<f64>> {
    match data {
        DataConfig::Synthetic(synthetic) => Ok(generate_synthetic(synthetic)),
        DataConfig::Csv { path } => load_prices_csv(path),
    }
}

/// Generate the seeded historical sample.
pub fn generate_synthetic(config: &SyntheticConfig) -> Vec<f64> {
    let mut rng = SeedTree::new(config.seed).rng_for("historical-sample", 0);
    historical_sample(config.length, &mut rng)
}

/// Load one price per record from a CSV file.
///
/// Only the first field of each record is read. A header row is tolerated
/// (skipped when its first field does not parse as a number); every other
/// non-numeric or non-positive price is an error.
pub fn load_prices_csv(path: &Path) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open price file {}", path.display()))?;

    let mut prices = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad CSV record at row {row}"))?;
        let Some(field) = record.get(0) else {
            continue;
        };
        match field.trim().parse::<f64>() {
            Ok(price) => {
                if !price.is_finite() || price <= 0.0 {
                    bail!("non-positive price {price} at row {row}");
                }
                prices.push(price);
            }
            Err(_) if row == 0 => continue, // header row
            Err(_) => bail!("non-numeric price '{field}' at row {row}"),
        }
    }

    if prices.is_empty() {
        bail!("price file {} contains no prices", path.display());
    }
    Ok(prices)
}
