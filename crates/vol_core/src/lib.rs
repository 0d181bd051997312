//! # vol_core: Foundation Types for the Volatility Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! vol_core is the bottom layer of the volatility workspace, providing:
//! - Trading-day dates: `Date` (`types::time`)
//! - Error taxonomy: `ConfigError`, `SeriesError`, `VolatilityError` (`types::error`)
//! - Validated OHLCV value objects: `PriceData`, `PriceSeries` (`series`)
//! - Options-chain snapshots: `OptionsChainSnapshot`, `OptionContract` (`chain`)
//! - Validated parameter objects: `EstimatorConfig`, `BlendWeights` (`params`)
//! - Generic sample statistics over `num_traits::Float` (`math::stats`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Calendar arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use vol_core::series::{PriceData, PriceSeries};
//! use vol_core::params::{BlendWeights, EstimatorConfig};
//! use vol_core::types::Date;
//!
//! let dates = vec![
//!     Date::from_ymd(2024, 1, 2).unwrap(),
//!     Date::from_ymd(2024, 1, 3).unwrap(),
//!     Date::from_ymd(2024, 1, 4).unwrap(),
//! ];
//! let series = PriceSeries::new(PriceData::new(dates, vec![100.0, 101.0, 100.5])).unwrap();
//! assert_eq!(series.len(), 3);
//!
//! let config = EstimatorConfig::default();
//! assert_eq!(config.short_window(), 20);
//!
//! let weights = BlendWeights::default();
//! assert!((weights.implied() - 0.5).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for dates, series, chains and parameters

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod chain;
pub mod math;
pub mod params;
pub mod series;
pub mod types;
