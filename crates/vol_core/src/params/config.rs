//! Estimator configuration.

use crate::types::ConfigError;

const DEFAULT_SHORT_WINDOW: usize = 20;
const DEFAULT_LONG_WINDOW: usize = 60;
const DEFAULT_ANNUALIZATION_FACTOR: f64 = 252.0;
const DEFAULT_MIN_DATA_POINTS: usize = 10;

/// Configuration shared by all realized-volatility estimators.
///
/// Fields are private so a constructed value is always valid:
/// - `short_window >= 2`
/// - `long_window >= short_window`
/// - `annualization_factor > 0` and finite
/// - `min_data_points >= 2`
///
/// # Example
///
/// ```
/// use vol_core::params::EstimatorConfig;
///
/// let config = EstimatorConfig::default();
/// assert_eq!(config.short_window(), 20);
/// assert_eq!(config.long_window(), 60);
/// assert_eq!(config.annualization_factor(), 252.0);
/// assert_eq!(config.min_data_points(), 10);
///
/// let weekly = EstimatorConfig::new(8, 26, 52.0, 10).unwrap();
/// assert!((weekly.annualization_scale() - 52.0_f64.sqrt()).abs() < 1e-12);
///
/// assert!(EstimatorConfig::new(30, 20, 252.0, 10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "EstimatorConfigSpec"))]
pub struct EstimatorConfig {
    short_window: usize,
    long_window: usize,
    annualization_factor: f64,
    min_data_points: usize,
}

impl Default for EstimatorConfig {
    /// Daily bars: 20/60 day windows, 252 trading days per year.
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            annualization_factor: DEFAULT_ANNUALIZATION_FACTOR,
            min_data_points: DEFAULT_MIN_DATA_POINTS,
        }
    }
}

impl EstimatorConfig {
    /// Create and validate a configuration.
    pub fn new(
        short_window: usize,
        long_window: usize,
        annualization_factor: f64,
        min_data_points: usize,
    ) -> Result<Self, ConfigError> {
        if short_window < 2 {
            return Err(ConfigError::WindowTooSmall {
                name: "short_window",
                value: short_window,
            });
        }
        if long_window < short_window {
            return Err(ConfigError::WindowOrder {
                short: short_window,
                long: long_window,
            });
        }
        if !(annualization_factor.is_finite() && annualization_factor > 0.0) {
            return Err(ConfigError::InvalidAnnualization(annualization_factor));
        }
        if min_data_points < 2 {
            return Err(ConfigError::InvalidMinDataPoints(min_data_points));
        }
        Ok(Self {
            short_window,
            long_window,
            annualization_factor,
            min_data_points,
        })
    }

    /// Copy with different windows, re-validated.
    pub fn with_windows(self, short_window: usize, long_window: usize) -> Result<Self, ConfigError> {
        Self::new(
            short_window,
            long_window,
            self.annualization_factor,
            self.min_data_points,
        )
    }

    /// Copy with a different annualization factor, re-validated.
    pub fn with_annualization_factor(self, factor: f64) -> Result<Self, ConfigError> {
        Self::new(self.short_window, self.long_window, factor, self.min_data_points)
    }

    /// Short look-back window in bars.
    pub fn short_window(&self) -> usize {
        self.short_window
    }

    /// Long look-back window in bars.
    pub fn long_window(&self) -> usize {
        self.long_window
    }

    /// Periods per year.
    pub fn annualization_factor(&self) -> f64 {
        self.annualization_factor
    }

    /// Minimum observations any series-level estimate requires.
    pub fn min_data_points(&self) -> usize {
        self.min_data_points
    }

    /// Multiplier from per-period to annual volatility: `sqrt(annualization_factor)`.
    pub fn annualization_scale(&self) -> f64 {
        self.annualization_factor.sqrt()
    }
}

/// Unvalidated wire form; missing fields take the defaults.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EstimatorConfigSpec {
    short_window: usize,
    long_window: usize,
    annualization_factor: f64,
    min_data_points: usize,
}

#[cfg(feature = "serde")]
impl Default for EstimatorConfigSpec {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            annualization_factor: DEFAULT_ANNUALIZATION_FACTOR,
            min_data_points: DEFAULT_MIN_DATA_POINTS,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<EstimatorConfigSpec> for EstimatorConfig {
    type Error = ConfigError;

    fn try_from(spec: EstimatorConfigSpec) -> Result<Self, Self::Error> {
        EstimatorConfig::new(
            spec.short_window,
            spec.long_window,
            spec.annualization_factor,
            spec.min_data_points,
        )
    }
}
