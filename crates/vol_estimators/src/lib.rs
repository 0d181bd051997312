//! # vol_estimators: Volatility Estimation and Blending
//!
//! ## Layer 2 (Kernel) Role
//!
//! Builds on `vol_core` to provide:
//! - Four realized-volatility estimators (`estimators`): Close-to-Close,
//!   Parkinson, Garman-Klass and Yang-Zhang
//! - An advisory data-quality report (`quality`)
//! - ATM implied volatility and term structure from an options chain (`implied`)
//! - Blending of short/long realized volatility with implied volatility (`blend`)
//! - `VolatilityEngine`, the integration facade that owns the
//!   implied-volatility fallback policy (`engine`)
//!
//! Every estimator, the blender, the validator and the extraction functions
//! are pure functions of their inputs. They hold no shared state and perform
//! no I/O, so they can be called concurrently without coordination.
//!
//! ## Usage Examples
//!
//! ```rust
//! use vol_core::series::{PriceData, PriceSeries};
//! use vol_core::types::Date;
//! use vol_estimators::prelude::*;
//!
//! let start = Date::from_ymd(2024, 1, 1).unwrap();
//! let dates: Vec<Date> = (0..40).map(|i| start.add_days(i)).collect();
//! let closes: Vec<f64> = (0..40)
//!     .map(|i| 100.0 * if i % 2 == 0 { 1.0 } else { 1.01 })
//!     .collect();
//! let series = PriceSeries::new(PriceData::new(dates, closes)).unwrap();
//!
//! let result = CloseToClose::default().estimate_short(&series).unwrap();
//! assert_eq!(result.method(), Method::CloseToClose);
//! assert!(result.volatility() > 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Serialise results and quality reports
//! - `parallel` (default): Batch estimation across series with rayon

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod blend;
pub mod engine;
pub mod estimators;
pub mod implied;
pub mod quality;
pub mod result;

/// Commonly used types and traits.
pub mod prelude {
    pub use crate::blend::Blender;
    pub use crate::engine::VolatilityEngine;
    pub use crate::estimators::{
        CloseToClose, GarmanKlass, Parkinson, VolatilityEstimator, YangZhang,
    };
    pub use crate::implied::{
        calculate_iv_term_structure, extract_atm_implied_volatility, nearest_weekly_expiration,
        TermStructurePoint,
    };
    pub use crate::quality::{QualityReport, QualityValidator};
    pub use crate::result::{MetadataValue, Method, VolatilityResult};
}
