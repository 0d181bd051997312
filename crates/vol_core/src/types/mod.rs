//! Core calendar and error types.
//!
//! This module provides:
//! - `time`: `Date`, a trading-day identifier wrapping `chrono::NaiveDate`
//! - `error`: Structured error types for configuration, series validation and estimation
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Date`] from `time`
//! - [`ConfigError`], [`DateError`], [`SeriesError`], [`VolatilityError`] from `error`

pub mod error;
pub mod time;

// Re-export commonly used types at module level
pub use error::{ConfigError, DateError, SeriesError, VolatilityError};
pub use time::Date;
