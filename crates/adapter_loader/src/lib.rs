//! # adapter_loader: Provider Data Loaders
//!
//! ## Adapter Layer Role
//!
//! Turns files handed over by market-data providers into `vol_core` value
//! objects, and owns the two contracts the engine relies on:
//!
//! - price histories reach the engine in ascending date order (`prices`)
//! - implied volatilities reach the engine as decimal fractions (`chain`)
//!
//! Price loaders return raw [`PriceData`](vol_core::series::PriceData) so the
//! quality report can inspect bad input before it is validated into a
//! [`PriceSeries`](vol_core::series::PriceSeries).
//!
//! ## Usage Examples
//!
//! ```rust
//! use adapter_loader::prices::read_price_csv;
//!
//! let csv = "date,close\n2024-01-03,101.0\n2024-01-02,100.0\n";
//! let data = read_price_csv(csv.as_bytes()).unwrap();
//! assert_eq!(data.closes, vec![100.0, 101.0]);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod chain;
pub mod error;
pub mod prices;

pub use chain::{load_chain_json, normalize_implied_volatility, parse_chain_json};
pub use error::LoaderError;
pub use prices::{load_price_csv, load_price_series, read_price_csv};
