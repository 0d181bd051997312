//! Blend command implementation
//!
//! Blends short and long Yang-Zhang volatility with implied volatility taken
//! from `--iv` or from the ATM call of an options chain. Without either, the
//! engine falls back to full-history close-to-close.

use std::path::Path;

use adapter_loader::{load_chain_json, load_price_series};
use tracing::info;
use vol_estimators::engine::VolatilityEngine;

use super::{results_table, to_json, OutputFormat};
use crate::{CliError, Result};

/// Run the blend command
///
/// `spot` selects the ATM strike and defaults to the last close.
pub fn run(
    engine: &VolatilityEngine,
    prices: &Path,
    chain: Option<&Path>,
    iv: Option<f64>,
    spot: Option<f64>,
    format: OutputFormat,
) -> Result<String> {
    let series = load_price_series(prices)?;

    let result = match iv {
        Some(iv) => {
            info!(implied_vol = iv, "blending with supplied implied volatility");
            engine.blend(&series, iv)?
        }
        None => {
            let chain = chain.map(load_chain_json).transpose()?;
            let spot = match spot {
                Some(s) if !(s.is_finite() && s > 0.0) => {
                    return Err(CliError::InvalidArgument(format!(
                        "--spot must be a positive price, got {}",
                        s
                    )));
                }
                Some(s) => s,
                None => series.closes().last().copied().unwrap_or_default(),
            };
            info!(
                spot,
                contracts = chain.as_ref().map_or(0, |c| c.len()),
                "blending with options chain"
            );
            engine.blend_or_fallback(&series, chain.as_ref(), spot)?
        }
    };

    match format {
        OutputFormat::Json => to_json(&result),
        OutputFormat::Table => Ok(results_table(std::slice::from_ref(&result), true)),
    }
}
