//! Numerical helpers shared by the estimators.
//!
//! - `stats`: log returns, mean, sample variance and related reductions,
//!   generic over [`num_traits::Float`]

pub mod stats;

pub use stats::{log_returns, mean, sample_std_dev, sample_variance};
