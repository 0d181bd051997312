//! Error types for structured error handling.
//!
//! This module provides:
//! - `DateError`: Errors from date construction and parsing
//! - `ConfigError`: Invalid `EstimatorConfig` or `BlendWeights` parameters
//! - `SeriesError`: Malformed price data (lengths, non-positive prices, `high < low`)
//! - `VolatilityError`: Umbrella error returned by every estimator and the blender
//!
//! Configuration and series errors are deterministic input problems. They
//! propagate straight to the caller; nothing in the engine retries them.

use thiserror::Error;

/// Date-related errors.
///
/// # Examples
/// ```
/// use vol_core::types::error::DateError;
///
/// let err = DateError::InvalidDate { year: 2024, month: 2, day: 30 };
/// assert_eq!(format!("{}", err), "Invalid date: 2024-2-30");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component
        year: i32,
        /// Month component (1-12)
        month: u32,
        /// Day component (1-31)
        day: u32,
    },

    /// Failed to parse date string.
    #[error("Date parse error: {0}")]
    ParseError(String),
}

/// Invalid estimator or blend parameters.
///
/// Raised eagerly when an `EstimatorConfig` or `BlendWeights` is built,
/// never silently coerced.
///
/// # Examples
/// ```
/// use vol_core::types::ConfigError;
///
/// let err = ConfigError::WeightsSum { sum: 1.1 };
/// assert!(err.to_string().contains("must sum to 1.0"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A look-back window below the minimum of 2 observations.
    #[error("{name} must be at least 2, got {value}")]
    WindowTooSmall {
        /// Parameter name (`short_window`, `long_window`, `window`)
        name: &'static str,
        /// Rejected value
        value: usize,
    },

    /// `long_window` shorter than `short_window`.
    #[error("long_window ({long}) must be >= short_window ({short})")]
    WindowOrder {
        /// Configured short window
        short: usize,
        /// Configured long window
        long: usize,
    },

    /// Non-positive or non-finite annualization factor.
    #[error("annualization_factor must be positive and finite, got {0}")]
    InvalidAnnualization(f64),

    /// `min_data_points` below 2.
    #[error("min_data_points must be at least 2, got {0}")]
    InvalidMinDataPoints(usize),

    /// A blend weight below zero or not finite.
    #[error("blend weight {name} must be non-negative, got {value}")]
    NegativeWeight {
        /// Weight name (`realized_short`, `realized_long`, `implied`)
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Blend weights whose total is not 1.0.
    #[error("blend weights must sum to 1.0, got {sum}")]
    WeightsSum {
        /// Actual sum of the three weights
        sum: f64,
    },
}

/// Malformed price data.
///
/// Every variant that concerns a single bar names the offending index.
///
/// # Examples
/// ```
/// use vol_core::types::SeriesError;
///
/// let err = SeriesError::HighBelowLow { index: 7, high: 99.0, low: 101.0 };
/// assert!(err.to_string().contains("index 7"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// An array whose length differs from the reference array.
    #[error("{field} has length {got}, expected {expected}")]
    LengthMismatch {
        /// Name of the mismatched array
        field: &'static str,
        /// Required length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// A price that is zero, negative or not finite.
    #[error("{field} must be strictly positive at index {index}, got {value}")]
    NonPositivePrice {
        /// Name of the price array
        field: &'static str,
        /// Offending bar
        index: usize,
        /// Offending value
        value: f64,
    },

    /// A non-price quantity (volume, dividend) that is negative or not finite.
    #[error("{field} must be non-negative at index {index}, got {value}")]
    NegativeValue {
        /// Name of the array
        field: &'static str,
        /// Offending bar
        index: usize,
        /// Offending value
        value: f64,
    },

    /// A bar whose high is below its low.
    #[error("high ({high}) below low ({low}) at index {index}")]
    HighBelowLow {
        /// Offending bar
        index: usize,
        /// Bar high
        high: f64,
        /// Bar low
        low: f64,
    },

    /// Dates that are not strictly increasing (includes duplicates).
    #[error("dates must be strictly increasing: {previous} followed by {current} at index {index}")]
    NonIncreasingDates {
        /// Offending bar
        index: usize,
        /// Date at `index - 1`
        previous: String,
        /// Date at `index`
        current: String,
    },

    /// A column an estimator needs is absent from the series.
    #[error("series has no {0} column")]
    MissingColumn(&'static str),
}

/// Umbrella error for volatility computations.
///
/// # Variants
/// - `Configuration`: invalid parameters
/// - `InsufficientData`: fewer observations than the estimator/window requires
/// - `MalformedSeries`: structurally invalid price data
/// - `InvalidInput`: an out-of-range scalar argument (e.g. a negative implied volatility)
///
/// # Examples
/// ```
/// use vol_core::types::VolatilityError;
///
/// let err = VolatilityError::InsufficientData { got: 5, need: 21 };
/// assert_eq!(err.to_string(), "Insufficient data: got 5 observations, need 21");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VolatilityError {
    /// Invalid configuration or blend weights.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Not enough observations for the requested window.
    #[error("Insufficient data: got {got} observations, need {need}")]
    InsufficientData {
        /// Observations available
        got: usize,
        /// Observations required
        need: usize,
    },

    /// Malformed price data.
    #[error("Malformed series: {0}")]
    MalformedSeries(#[from] SeriesError),

    /// Invalid scalar input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl VolatilityError {
    /// Create an insufficient-data error.
    pub fn insufficient(got: usize, need: usize) -> Self {
        Self::InsufficientData { got, need }
    }

    /// Returns `true` for errors caused by the parameter objects rather than the data.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
