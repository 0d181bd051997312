//! Garman-Klass (1980) OHLC estimator.
//!
//! ```text
//! term_i = 0.5 · ln(H_i / L_i)² − (2 ln 2 − 1) · ln(C_i / O_i)²
//! σ_d²   = max(0, mean(term_i))
//! ```

use super::{
    check_series, check_window, ensure_observations, ensure_positive, scale, trailing_result,
    VolatilityEstimator,
};
use crate::result::{Method, VolatilityResult};
use std::f64::consts::LN_2;
use vol_core::params::EstimatorConfig;
use vol_core::series::{check_high_low, Ohlc, PriceSeries};
use vol_core::types::VolatilityError;

/// Garman-Klass volatility of bare OHLC arrays.
///
/// # Errors
///
/// - `Configuration` if `window < 2`
/// - `MalformedSeries` for mismatched lengths, non-positive prices, or `high < low`
/// - `InsufficientData` if fewer than `window` bars are supplied
pub fn garman_klass_volatility(
    ohlc: &Ohlc<'_>,
    window: usize,
    config: &EstimatorConfig,
    annualize: bool,
) -> Result<f64, VolatilityError> {
    check_window(window)?;
    ohlc.check_lengths()?;
    ensure_observations(ohlc.len(), window)?;

    let bars = ohlc.tail(window);
    ensure_positive("opens", bars.opens)?;
    ensure_positive("highs", bars.highs)?;
    ensure_positive("lows", bars.lows)?;
    ensure_positive("closes", bars.closes)?;
    check_high_low(bars.highs, bars.lows)?;

    let c = 2.0 * LN_2 - 1.0;
    let total: f64 = (0..bars.len())
        .map(|i| {
            let hl = (bars.highs[i] / bars.lows[i]).ln();
            let co = (bars.closes[i] / bars.opens[i]).ln();
            0.5 * hl * hl - c * co * co
        })
        .sum();
    let variance = (total / window as f64).max(0.0);
    Ok(scale(variance.sqrt(), config, annualize))
}

/// Garman-Klass estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GarmanKlass {
    config: EstimatorConfig,
}

impl GarmanKlass {
    /// Create an estimator with the given configuration.
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }
}

impl VolatilityEstimator for GarmanKlass {
    fn method(&self) -> Method {
        Method::GarmanKlass
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
        let vol = garman_klass_volatility(&series.ohlc()?, window, &self.config, annualize)?;
        trailing_result(self.method(), series, window, used, annualize, vol)
    }
}
