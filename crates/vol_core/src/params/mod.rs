//! Validated parameter objects.
//!
//! - [`EstimatorConfig`]: look-back windows, annualization factor, minimum data
//! - [`BlendWeights`]: weights of short RV, long RV and IV in the blend
//!
//! Both validate on construction and on deserialisation, so an invalid value
//! can never reach an estimator.

mod config;
mod weights;

pub use config::EstimatorConfig;
pub use weights::{BlendWeights, WEIGHT_SUM_TOLERANCE};
