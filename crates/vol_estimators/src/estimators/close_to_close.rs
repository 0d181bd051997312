//! Close-to-Close estimator.
//!
//! ```text
//! r_i   = ln(P_i / P_{i-1})          over the trailing `window` returns
//! σ_d   = sqrt( Σ (r_i - r̄)² / (n - 1) )
//! σ_ann = σ_d · sqrt(annualization_factor)
//! ```

use super::{
    check_series, check_window, ensure_observations, ensure_positive, scale, trailing_result,
    VolatilityEstimator,
};
use crate::result::{Method, VolatilityResult};
use vol_core::math::stats::{log_returns, sample_std_dev};
use vol_core::params::EstimatorConfig;
use vol_core::series::PriceSeries;
use vol_core::types::VolatilityError;

/// Close-to-Close volatility of a bare close array.
///
/// Reads the trailing `window + 1` closes.
///
/// # Errors
///
/// - `Configuration` if `window < 2`
/// - `InsufficientData` if fewer than `window + 1` closes are supplied
/// - `MalformedSeries` if a close in the window is not strictly positive
///
/// # Example
///
/// ```
/// use vol_core::params::EstimatorConfig;
/// use vol_estimators::estimators::close_to_close_volatility;
///
/// let closes: Vec<f64> = (0..30).map(|i| 100.0 * 1.001_f64.powi(i)).collect();
/// let vol = close_to_close_volatility(&closes, 20, &EstimatorConfig::default(), true).unwrap();
/// assert!(vol < 1e-9);
/// ```
pub fn close_to_close_volatility(
    closes: &[f64],
    window: usize,
    config: &EstimatorConfig,
    annualize: bool,
) -> Result<f64, VolatilityError> {
    check_window(window)?;
    ensure_observations(closes.len(), window + 1)?;
    let tail = &closes[closes.len() - window - 1..];
    ensure_positive("closes", tail)?;

    let returns = log_returns(tail);
    let daily = sample_std_dev(&returns)
        .ok_or_else(|| VolatilityError::insufficient(returns.len(), 2))?;
    Ok(scale(daily, config, annualize))
}

/// Close-to-Close estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CloseToClose {
    config: EstimatorConfig,
}

impl CloseToClose {
    /// Create an estimator with the given configuration.
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }
}

impl VolatilityEstimator for CloseToClose {
    fn method(&self) -> Method {
        Method::CloseToClose
    }

    fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn required_observations(&self, window: usize) -> usize {
        window + 1
    }

    fn estimate(
        &self,
        series: &PriceSeries,
        window: usize,
        annualize: bool,
    ) -> Result<VolatilityResult, VolatilityError> {
        let used = check_series(self, series, window)?;
        let vol = close_to_close_volatility(series.closes(), window, &self.config, annualize)?;
        trailing_result(self.method(), series, window, used, annualize, vol)
    }
}
