//! Blend weights.

use crate::types::ConfigError;

/// Absolute tolerance on `realized_short + realized_long + implied == 1.0`.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights of the three blend components.
///
/// Each weight is non-negative and the three sum to 1.0 within
/// [`WEIGHT_SUM_TOLERANCE`]. The default puts half the weight on implied
/// volatility: `{realized_short: 0.30, realized_long: 0.20, implied: 0.50}`.
///
/// # Example
///
/// ```
/// use vol_core::params::BlendWeights;
///
/// let w = BlendWeights::new(0.25, 0.25, 0.5).unwrap();
/// assert_eq!(w.implied(), 0.5);
///
/// let err = BlendWeights::new(0.5, 0.3, 0.3).unwrap_err();
/// assert!(err.to_string().contains("must sum to 1.0"));
///
/// let err = BlendWeights::new(-0.1, 0.6, 0.5).unwrap_err();
/// assert!(err.to_string().contains("non-negative"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BlendWeightsSpec"))]
pub struct BlendWeights {
    realized_short: f64,
    realized_long: f64,
    implied: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            realized_short: 0.30,
            realized_long: 0.20,
            implied: 0.50,
        }
    }
}

impl BlendWeights {
    /// Create and validate blend weights.
    ///
    /// Negative weights are reported before the sum check.
    pub fn new(realized_short: f64, realized_long: f64, implied: f64) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("realized_short", realized_short),
            ("realized_long", realized_long),
            ("implied", implied),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }
        let sum = realized_short + realized_long + implied;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightsSum { sum });
        }
        Ok(Self {
            realized_short,
            realized_long,
            implied,
        })
    }

    /// Weight of short-window realized volatility.
    pub fn realized_short(&self) -> f64 {
        self.realized_short
    }

    /// Weight of long-window realized volatility.
    pub fn realized_long(&self) -> f64 {
        self.realized_long
    }

    /// Weight of implied volatility.
    pub fn implied(&self) -> f64 {
        self.implied
    }

    /// Weighted sum of the three components.
    ///
    /// ```
    /// use vol_core::params::BlendWeights;
    ///
    /// let blended = BlendWeights::default().combine(0.20, 0.15, 0.35);
    /// assert!((blended - 0.265).abs() < 1e-12);
    /// ```
    pub fn combine(&self, rv_short: f64, rv_long: f64, implied_volatility: f64) -> f64 {
        self.realized_short * rv_short + self.realized_long * rv_long + self.implied * implied_volatility
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct BlendWeightsSpec {
    realized_short: f64,
    realized_long: f64,
    implied: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<BlendWeightsSpec> for BlendWeights {
    type Error = ConfigError;

    fn try_from(spec: BlendWeightsSpec) -> Result<Self, Self::Error> {
        BlendWeights::new(spec.realized_short, spec.realized_long, spec.implied)
    }
}
