//! Yang-Zhang (2000) drift-independent OHLC estimator.
//!
//! Combines three variances over the trailing `n = window` bars, reading one
//! extra bar for the first overnight return:
//!
//! ```text
//! σ_o²  = var( ln(O_i / C_{i-1}) )                          overnight
//! σ_c²  = var( ln(C_i / O_i) )                              open-to-close
//! σ_rs² = mean( ln(H/C)·ln(H/O) + ln(L/C)·ln(L/O) )         Rogers-Satchell
//! k     = 0.34 / (1.34 + (n + 1) / (n - 1))
//! σ_d²  = max(0, σ_o² + k·σ_c² + (1 - k)·σ_rs²)
//! ```
//!
//! Variances use the `n - 1` denominator.

use super::{
    check_series, check_window, ensure_observations, ensure_positive, scale, trailing_result,
    VolatilityEstimator,
};
use crate::result::{Method, VolatilityResult};
use vol_core::math::stats::sample_variance;
use vol_core::params::EstimatorConfig;
use vol_core::series::{check_high_low, Ohlc, PriceSeries};
use vol_core::types::VolatilityError;

/// Daily variance components of a Yang-Zhang estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YangZhangComponents {
    /// Sample variance of overnight log returns
    pub overnight_variance: f64,
    /// Sample variance of open-to-close log returns
    pub open_close_variance: f64,
    /// Mean Rogers-Satchell intraday term
    pub rogers_satchell: f64,
    /// Open-to-close weight
    pub k: f64,
}

impl YangZhangComponents {
    /// Combined daily variance, floored at zero.
    pub fn variance(&self) -> f64 {
        (self.overnight_variance
            + self.k * self.open_close_variance
            + (1.0 - self.k) * self.rogers_satchell)
            .max(0.0)
    }
}

/// Open-to-close weight `k` for a window of `n` periods.
pub fn yang_zhang_k(n: usize) -> f64 {
    let n = n as f64;
    0.34 / (1.34 + (n + 1.0) / (n - 1.0))
}

/// Variance components over the trailing `window` periods.
///
/// # Errors
///
/// - `Configuration` if `window < 2`
/// - `MalformedSeries` for mismatched lengths, non-positive prices, or `high < low`
/// - `InsufficientData` if fewer than `window + 1` bars are supplied
pub fn yang_zhang_components(
    ohlc: &Ohlc<'_>,
    window: usize,
) -> Result<YangZhangComponents, VolatilityError> {
    check_window(window)?;
    ohlc.check_lengths()?;
    ensure_observations(ohlc.len(), window + 1)?;

    let bars = ohlc.tail(window + 1);
    ensure_positive("opens", bars.opens)?;
    ensure_positive("highs", bars.highs)?;
    ensure_positive("lows", bars.lows)?;
    ensure_positive("closes", bars.closes)?;
    check_high_low(bars.highs, bars.lows)?;

    let mut overnight = Vec::with_capacity(window);
    let mut open_close = Vec::with_capacity(window);
    let mut rs_sum = 0.0;
    for i in 1..bars.len() {
        let (o, h, l, c) = (bars.opens[i], bars.highs[i], bars.lows[i], bars.closes[i]);
        overnight.push((o / bars.closes[i - 1]).ln());
        open_close.push((c / o).ln());
        rs_sum += (h / c).ln() * (h / o).ln() + (l / c).ln() * (l / o).ln();
    }

    let insufficient = || VolatilityError::insufficient(bars.len(), window + 1);
    Ok(YangZhangComponents {
        overnight_variance: sample_variance(&overnight).ok_or_else(insufficient)?,
        open_close_variance: sample_variance(&open_close).ok_or_else(insufficient)?,
        rogers_satchell: rs_sum / window as f64,
        k: yang_zhang_k(window),
    })
}

/// Yang-Zhang volatility of bare OHLC arrays.
///
/// # Errors
///
/// Same as [`yang_zhang_components`].
pub fn yang_zhang_volatility(
    ohlc: &Ohlc<'_>,
    window: usize,
    config: &EstimatorConfig,
    annualize: bool,
) -> Result<f64, VolatilityError> {
    let components = yang_zhang_components(ohlc, window)?;
    Ok(scale(components.variance().sqrt(), config, annualize))
}

/// Yang-Zhang estimator.
///
/// Also the realized-volatility input of the [`Blender`](crate::blend::Blender).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YangZhang {
    config: EstimatorConfig,
}

impl YangZhang {
    /// Create an estimator with the given configuration.
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }
}

impl VolatilityEstimator for YangZhang {
    fn method(&self) -> Method {
        Method::YangZhang
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
        let components = yang_zhang_components(&series.ohlc()?, window)?;
        let vol = scale(components.variance().sqrt(), &self.config, annualize);
        Ok(
            trailing_result(self.method(), series, window, used, annualize, vol)?
                .with_metadata("k_parameter", components.k),
        )
    }
}
