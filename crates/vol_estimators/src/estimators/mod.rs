//! Realized-volatility estimators.
//!
//! Each estimator comes in two forms:
//! - a slice-level function (`close_to_close_volatility`, `parkinson_volatility`,
//!   `garman_klass_volatility`, `yang_zhang_volatility`) for callers holding bare
//!   price arrays, returning the volatility figure alone;
//! - a struct implementing [`VolatilityEstimator`] that reads a validated
//!   [`PriceSeries`] and returns a full [`VolatilityResult`] with dates and
//!   diagnostics.
//!
//! Daily volatility is annualized by multiplying by
//! `sqrt(annualization_factor)`.
//!
//! # Data requirements
//!
//! | Estimator      | Bars needed for window `n` | Columns |
//! |----------------|----------------------------|---------|
//! | Close-to-Close | `n + 1`                    | close |
//! | Parkinson      | `n`                        | high, low |
//! | Garman-Klass   | `n`                        | open, high, low, close |
//! | Yang-Zhang     | `n + 1`                    | open, high, low, close |
//!
//! Series-level estimates additionally require `min_data_points` bars.

mod close_to_close;
mod garman_klass;
mod parkinson;
mod yang_zhang;

pub use close_to_close::{close_to_close_volatility, CloseToClose};
pub use garman_klass::{garman_klass_volatility, GarmanKlass};
pub use parkinson::{parkinson_volatility, Parkinson};
pub use yang_zhang::{
    yang_zhang_components, yang_zhang_k, yang_zhang_volatility, YangZhang, YangZhangComponents,
};

use crate::result::{Method, VolatilityResult};
use vol_core::params::EstimatorConfig;
use vol_core::series::{first_non_positive, PriceSeries};
use vol_core::types::{ConfigError, SeriesError, VolatilityError};

/// A realized-volatility estimator over a validated price series.
///
/// Implementations are stateless apart from their [`EstimatorConfig`].
pub trait VolatilityEstimator {
    /// Method tag written into every result.
    fn method(&self) -> Method;

    /// Configuration in use.
    fn config(&self) -> &EstimatorConfig;

    /// Bars the estimator reads for a given window.
    fn required_observations(&self, window: usize) -> usize;

    /// Estimate volatility over the trailing `window` periods of `series`.
    ///
    /// # Errors
    ///
    /// - `Configuration` if `window < 2`
    /// - `InsufficientData` if the series is shorter than
    ///   `max(required_observations(window), min_data_points)`
    /// - `MalformedSeries` if a required column is missing
    fn estimate(
        &self,
        series: &PriceSeries,
        window: usize,
        annualize: bool,
    ) -> Result<VolatilityResult, VolatilityError>;

    /// Annualized estimate over the configured short window.
    fn estimate_short(&self, series: &PriceSeries) -> Result<VolatilityResult, VolatilityError> {
        self.estimate(series, self.config().short_window(), true)
    }

    /// Annualized estimate over the configured long window.
    fn estimate_long(&self, series: &PriceSeries) -> Result<VolatilityResult, VolatilityError> {
        self.estimate(series, self.config().long_window(), true)
    }
}

/// Reject windows below two periods.
pub(crate) fn check_window(window: usize) -> Result<(), VolatilityError> {
    if window < 2 {
        return Err(ConfigError::WindowTooSmall {
            name: "window",
            value: window,
        }
        .into());
    }
    Ok(())
}

/// Fail with `InsufficientData` when `got < need`.
pub(crate) fn ensure_observations(got: usize, need: usize) -> Result<(), VolatilityError> {
    if got < need {
        return Err(VolatilityError::insufficient(got, need));
    }
    Ok(())
}

/// Fail with `MalformedSeries` on the first non-positive value of a price column.
pub(crate) fn ensure_positive(field: &'static str, values: &[f64]) -> Result<(), VolatilityError> {
    match first_non_positive(values) {
        Some(index) => Err(SeriesError::NonPositivePrice {
            field,
            index,
            value: values[index],
        }
        .into()),
        None => Ok(()),
    }
}

/// Scale a per-period volatility to the requested basis.
pub(crate) fn scale(daily: f64, config: &EstimatorConfig, annualize: bool) -> f64 {
    if annualize {
        daily * config.annualization_scale()
    } else {
        daily
    }
}

/// Series-level preconditions shared by every estimator.
pub(crate) fn check_series(
    estimator: &dyn VolatilityEstimator,
    series: &PriceSeries,
    window: usize,
) -> Result<usize, VolatilityError> {
    check_window(window)?;
    let used = estimator.required_observations(window);
    let need = used.max(estimator.config().min_data_points());
    ensure_observations(series.len(), need)?;
    Ok(used)
}

/// Build a result covering the trailing `used` bars of `series`.
///
/// Methods with a published efficiency ratio carry it as `efficiency_ratio`.
pub(crate) fn trailing_result(
    method: Method,
    series: &PriceSeries,
    window: usize,
    used: usize,
    annualize: bool,
    volatility: f64,
) -> Result<VolatilityResult, VolatilityError> {
    let dates = series.dates();
    let start = dates.len().saturating_sub(used);
    match (dates.get(start), dates.last()) {
        (Some(&start_date), Some(&end_date)) => {
            let result = VolatilityResult::new(
                volatility, method, window, used, start_date, end_date, annualize,
            );
            Ok(match method.efficiency_ratio() {
                Some(ratio) => result.with_metadata("efficiency_ratio", ratio),
                None => result,
            })
        }
        _ => Err(VolatilityError::insufficient(dates.len(), used.max(1))),
    }
}
