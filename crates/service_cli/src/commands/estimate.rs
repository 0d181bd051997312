//! Estimate command implementation
//!
//! Runs one realized-volatility estimator, or every estimator the price
//! history has columns for.

use std::path::Path;

use adapter_loader::load_price_series;
use tracing::info;
use vol_estimators::engine::VolatilityEngine;
use vol_estimators::result::Method;

use super::{results_table, to_json, OutputFormat};
use crate::{CliError, Result};

/// Run the estimate command
///
/// `method` is an estimator name or `all`. `window` defaults to the
/// configured short window.
pub fn run(
    engine: &VolatilityEngine,
    prices: &Path,
    method: &str,
    window: Option<usize>,
    daily: bool,
    format: OutputFormat,
) -> Result<String> {
    let series = load_price_series(prices)?;
    info!(
        prices = %prices.display(),
        bars = series.len(),
        ohlc = series.has_ohlc(),
        method,
        "estimating volatility"
    );

    let annualize = !daily;
    let results = if method.eq_ignore_ascii_case("all") {
        engine.estimate_all(&series, window, annualize)?
    } else {
        let method: Method = method.parse().map_err(CliError::InvalidArgument)?;
        vec![engine.estimate(method, &series, window, annualize)?]
    };

    match format {
        OutputFormat::Json => to_json(&results),
        OutputFormat::Table => Ok(results_table(&results, false)),
    }
}
