//! Blending of realized and implied volatility.
//!
//! ```text
//! blended = w_short · rv_short + w_long · rv_long + w_implied · iv
//! ```
//!
//! `rv_short` and `rv_long` are annualized Yang-Zhang estimates over the
//! configured short and long windows. The blender requires an implied
//! volatility figure; choosing a substitute when none is available is the
//! caller's decision (see [`VolatilityEngine::blend_or_fallback`]).
//!
//! [`VolatilityEngine::blend_or_fallback`]: crate::engine::VolatilityEngine::blend_or_fallback

use tracing::debug;
use vol_core::params::{BlendWeights, EstimatorConfig};
use vol_core::series::PriceSeries;
use vol_core::types::VolatilityError;

use crate::estimators::{VolatilityEstimator, YangZhang};
use crate::result::{Method, VolatilityResult};

/// Weighted realized/implied volatility blender.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Blender {
    config: EstimatorConfig,
    weights: BlendWeights,
}

impl Blender {
    /// Create a blender with default weights.
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            weights: BlendWeights::default(),
        }
    }

    /// Replace the default weights.
    pub fn with_weights(mut self, weights: BlendWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Default weights in use.
    pub fn weights(&self) -> &BlendWeights {
        &self.weights
    }

    /// Blend Yang-Zhang realized volatility with `implied_volatility`.
    ///
    /// # Arguments
    ///
    /// * `series` - OHLC history with at least `long_window + 1` bars
    /// * `implied_volatility` - Annualized implied volatility as a decimal
    /// * `weights` - Overrides the blender's weights for this call
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `implied_volatility` is negative or not finite
    /// - any error of the Yang-Zhang estimator over either window
    ///
    /// # Example
    ///
    /// ```
    /// use vol_core::series::{PriceData, PriceSeries};
    /// use vol_core::types::Date;
    /// use vol_estimators::blend::Blender;
    ///
    /// let start = Date::from_ymd(2024, 1, 1).unwrap();
    /// let n = 70;
    /// let dates = (0..n).map(|i| start.add_days(i as i64)).collect();
    /// let closes: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
    /// let opens: Vec<f64> = closes.iter().map(|c| c * 0.998).collect();
    /// let highs: Vec<f64> = closes.iter().map(|c| c * 1.01).collect();
    /// let lows: Vec<f64> = closes.iter().map(|c| c * 0.99).collect();
    /// let series = PriceSeries::new(
    ///     PriceData::new(dates, closes).with_ohlc(opens, highs, lows),
    /// )
    /// .unwrap();
    ///
    /// let result = Blender::default().calculate_blended(&series, 0.30, None).unwrap();
    /// assert_eq!(result.metadata_f64("implied_vol"), Some(0.30));
    /// ```
    pub fn calculate_blended(
        &self,
        series: &PriceSeries,
        implied_volatility: f64,
        weights: Option<BlendWeights>,
    ) -> Result<VolatilityResult, VolatilityError> {
        if !(implied_volatility.is_finite() && implied_volatility >= 0.0) {
            return Err(VolatilityError::InvalidInput(format!(
                "implied volatility must be a non-negative decimal, got {}",
                implied_volatility
            )));
        }
        let weights = weights.unwrap_or(self.weights);

        let yz = YangZhang::new(self.config);
        let rv_short = yz.estimate_short(series)?;
        let rv_long = yz.estimate_long(series)?;
        let blended = weights.combine(rv_short.volatility(), rv_long.volatility(), implied_volatility);

        debug!(
            rv_short = rv_short.volatility(),
            rv_long = rv_long.volatility(),
            implied_volatility,
            blended,
            "blended volatility"
        );

        Ok(VolatilityResult::new(
            blended,
            Method::Blended,
            rv_long.window(),
            rv_long.data_points(),
            rv_long.start_date(),
            rv_long.end_date(),
            true,
        )
        .with_metadata("rv_short", rv_short.volatility())
        .with_metadata("rv_long", rv_long.volatility())
        .with_metadata("implied_vol", implied_volatility)
        .with_metadata("weights", weights))
    }
}
