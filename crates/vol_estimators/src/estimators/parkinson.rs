//! Parkinson (1980) high-low range estimator.
//!
//! ```text
//! σ_d² = Σ ln(H_i / L_i)² / (4 · ln 2 · n)
//! ```
//!
//! Uses only the intraday range, so it ignores overnight gaps and is biased
//! low for assets that gap frequently.

use super::{
    check_series, check_window, ensure_observations, ensure_positive, scale, trailing_result,
    VolatilityEstimator,
};
use crate::result::{Method, VolatilityResult};
use std::f64::consts::LN_2;
use vol_core::params::EstimatorConfig;
use vol_core::series::{check_high_low, PriceSeries};
use vol_core::types::{SeriesError, VolatilityError};

/// Parkinson volatility of bare high/low arrays.
///
/// Every bar is validated (equal lengths, positive prices, `high >= low`),
/// then the trailing `window` bars are used.
///
/// # Errors
///
/// - `Configuration` if `window < 2`
/// - `MalformedSeries` for mismatched lengths, non-positive prices, or
///   `high < low` (the error names the index)
/// - `InsufficientData` if fewer than `window` bars are supplied
pub fn parkinson_volatility(
    highs: &[f64],
    lows: &[f64],
    window: usize,
    config: &EstimatorConfig,
    annualize: bool,
) -> Result<f64, VolatilityError> {
    check_window(window)?;
    if highs.len() != lows.len() {
        return Err(SeriesError::LengthMismatch {
            field: "lows",
            expected: highs.len(),
            got: lows.len(),
        }
        .into());
    }
    ensure_positive("highs", highs)?;
    ensure_positive("lows", lows)?;
    check_high_low(highs, lows)?;
    ensure_observations(highs.len(), window)?;

    let start = highs.len() - window;
    let sum_sq: f64 = highs[start..]
        .iter()
        .zip(&lows[start..])
        .map(|(h, l)| (h / l).ln().powi(2))
        .sum();
    let variance = sum_sq / (4.0 * LN_2 * window as f64);
    Ok(scale(variance.sqrt(), config, annualize))
}

/// Parkinson estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Parkinson {
    config: EstimatorConfig,
}

impl Parkinson {
    /// Create an estimator with the given configuration.
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }
}

impl VolatilityEstimator for Parkinson {
    fn method(&self) -> Method {
        Method::Parkinson
    }

    fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn required_observations(&self, window: usize) -> usize {
        window
    }

    fn estimate(
        &self,
        series: &PriceSeries,
        window: usize,
        annualize: bool,
    ) -> Result<VolatilityResult, VolatilityError> {
        let used = check_series(self, series, window)?;
        let highs = series.highs().ok_or(SeriesError::MissingColumn("highs"))?;
        let lows = series.lows().ok_or(SeriesError::MissingColumn("lows"))?;
        let vol = parkinson_volatility(highs, lows, window, &self.config, annualize)?;
        trailing_result(self.method(), series, window, used, annualize, vol)
    }
}
