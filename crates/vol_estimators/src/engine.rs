//! Integration facade over the estimators, validator and blender.
//!
//! [`VolatilityEngine`] is what callers holding provider data talk to. Besides
//! dispatching by [`Method`] it owns the caller-side policy for missing
//! implied volatility: when no ATM IV can be read from the chain, the engine
//! falls back to Close-to-Close over the full history instead of blending.

use tracing::{debug, warn};
use vol_core::chain::{OptionType, OptionsChainSnapshot};
use vol_core::params::{BlendWeights, EstimatorConfig};
use vol_core::series::{PriceData, PriceSeries};
use vol_core::types::VolatilityError;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::blend::Blender;
use crate::estimators::{CloseToClose, GarmanKlass, Parkinson, VolatilityEstimator, YangZhang};
use crate::implied::{extract_atm_implied_volatility, nearest_weekly_expiration};
use crate::quality::{QualityReport, QualityValidator};
use crate::result::{Method, VolatilityResult};

/// Smallest history the close-to-close fallback can use.
const MIN_FALLBACK_OBSERVATIONS: usize = 3;

/// Metadata key set on fallback results.
pub const FALLBACK_REASON_KEY: &str = "fallback_reason";

/// Volatility engine.
///
/// # Example
///
/// ```
/// use vol_core::series::{PriceData, PriceSeries};
/// use vol_core::types::Date;
/// use vol_estimators::prelude::*;
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let dates = (0..30).map(|i| start.add_days(i)).collect();
/// let closes = (0..30).map(|i| 100.0 + (i % 3) as f64).collect();
/// let series = PriceSeries::new(PriceData::new(dates, closes)).unwrap();
///
/// let engine = VolatilityEngine::default();
/// // No chain: close-to-close over the whole history
/// let result = engine.blend_or_fallback(&series, None, 101.0).unwrap();
/// assert_eq!(result.method(), Method::CloseToClose);
/// assert_eq!(result.window(), 29);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolatilityEngine {
    config: EstimatorConfig,
    weights: BlendWeights,
    validator: QualityValidator,
}

impl VolatilityEngine {
    /// Create an engine.
    pub fn new(config: EstimatorConfig, weights: BlendWeights) -> Self {
        Self {
            config,
            weights,
            validator: QualityValidator::default(),
        }
    }

    /// Replace the quality validator.
    pub fn with_validator(mut self, validator: QualityValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Estimator configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Blend weights.
    pub fn weights(&self) -> &BlendWeights {
        &self.weights
    }

    /// Advisory quality report of a validated series.
    pub fn quality_report(&self, series: &PriceSeries) -> QualityReport {
        self.validator.validate(series)
    }

    /// Advisory quality report of raw provider data.
    pub fn quality_report_data(&self, data: &PriceData) -> QualityReport {
        self.validator.validate_data(data)
    }

    /// Realized-volatility estimator for `method`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for [`Method::Blended`], which needs implied volatility.
    pub fn estimator(&self, method: Method) -> Result<Box<dyn VolatilityEstimator>, VolatilityError> {
        let config = self.config;
        let estimator: Box<dyn VolatilityEstimator> = match method {
            Method::CloseToClose => Box::new(CloseToClose::new(config)),
            Method::Parkinson => Box::new(Parkinson::new(config)),
            Method::GarmanKlass => Box::new(GarmanKlass::new(config)),
            Method::YangZhang => Box::new(YangZhang::new(config)),
            Method::Blended => {
                return Err(VolatilityError::InvalidInput(
                    "blended volatility needs an implied volatility input".to_string(),
                ))
            }
        };
        Ok(estimator)
    }

    /// Estimate with one method.
    ///
    /// `window` defaults to the configured short window.
    pub fn estimate(
        &self,
        method: Method,
        series: &PriceSeries,
        window: Option<usize>,
        annualize: bool,
    ) -> Result<VolatilityResult, VolatilityError> {
        let window = window.unwrap_or(self.config.short_window());
        let result = self.estimator(method)?.estimate(series, window, annualize)?;
        debug!(
            method = %method,
            window,
            volatility = result.volatility(),
            "volatility estimated"
        );
        Ok(result)
    }

    /// Estimate with every realized method the series has columns for.
    ///
    /// A close-only series yields Close-to-Close alone.
    pub fn estimate_all(
        &self,
        series: &PriceSeries,
        window: Option<usize>,
        annualize: bool,
    ) -> Result<Vec<VolatilityResult>, VolatilityError> {
        Method::REALIZED
            .iter()
            .filter(|m| series.has_ohlc() || !m.requires_ohlc())
            .map(|&m| self.estimate(m, series, window, annualize))
            .collect()
    }

    /// Blend with an implied volatility figure using the engine's weights.
    pub fn blend(
        &self,
        series: &PriceSeries,
        implied_volatility: f64,
    ) -> Result<VolatilityResult, VolatilityError> {
        Blender::new(self.config)
            .with_weights(self.weights)
            .calculate_blended(series, implied_volatility, None)
    }

    /// Blend when implied volatility is available, otherwise fall back.
    ///
    /// Uses the ATM call IV of the nearest expiration in `chain`. When there
    /// is no chain or no usable IV, returns annualized Close-to-Close over all
    /// `len - 1` returns of the series, tagged with
    /// `metadata.fallback_reason`.
    pub fn blend_or_fallback(
        &self,
        series: &PriceSeries,
        chain: Option<&OptionsChainSnapshot>,
        current_price: f64,
    ) -> Result<VolatilityResult, VolatilityError> {
        let implied = chain.and_then(|c| {
            nearest_weekly_expiration(c).and_then(|expiry| {
                extract_atm_implied_volatility(c, current_price, Some(expiry), OptionType::Call)
            })
        });

        match implied {
            Some(iv) => self.blend(series, iv),
            None => {
                let reason = if chain.is_some() {
                    "no ATM implied volatility in options chain"
                } else {
                    "no options chain"
                };
                warn!(
                    reason,
                    data_points = series.len(),
                    "implied volatility unavailable, falling back to close-to-close"
                );
                self.full_history_close_to_close(series)
                    .map(|r| r.with_metadata(FALLBACK_REASON_KEY, reason))
            }
        }
    }

    fn full_history_close_to_close(
        &self,
        series: &PriceSeries,
    ) -> Result<VolatilityResult, VolatilityError> {
        let need = MIN_FALLBACK_OBSERVATIONS.max(self.config.min_data_points());
        if series.len() < need {
            return Err(VolatilityError::insufficient(series.len(), need));
        }
        let window = series.len() - 1;
        CloseToClose::new(self.config).estimate(series, window, true)
    }

    /// Estimate one method over many independent series.
    ///
    /// Results are in input order. Runs on the rayon pool with the
    /// `parallel` feature.
    pub fn estimate_batch(
        &self,
        method: Method,
        series: &[PriceSeries],
        window: Option<usize>,
    ) -> Vec<Result<VolatilityResult, VolatilityError>> {
        let run = |s: &PriceSeries| self.estimate(method, s, window, true);

        #[cfg(feature = "parallel")]
        let results: Vec<_> = series.par_iter().map(run).collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = series.iter().map(run).collect();
        results
    }
}
