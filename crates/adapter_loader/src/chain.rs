//! JSON options-chain loader.
//!
//! Accepts a snapshot document
//!
//! ```json
//! {
//!   "underlying": "SPY",
//!   "as_of": "2024-06-14",
//!   "contracts": [
//!     {"strike": 540.0, "expiration": "2024-06-21", "type": "call",
//!      "bid": 4.10, "ask": 4.30, "iv": 13.2}
//!   ]
//! }
//! ```
//!
//! and normalizes implied volatility to a decimal fraction. Providers quote
//! IV either as a decimal (`0.132`) or in percent (`13.2`); values above
//! [`PERCENT_QUOTE_THRESHOLD`] are read as percent. Contract order is kept.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use vol_core::chain::{OptionContract, OptionType, OptionsChainSnapshot};
use vol_core::types::Date;

use crate::error::LoaderError;

/// IV quotes above this are taken to be in percent (500% as a decimal).
pub const PERCENT_QUOTE_THRESHOLD: f64 = 5.0;

#[derive(Debug, Deserialize)]
struct RawChain {
    #[serde(default)]
    underlying: String,
    as_of: Date,
    contracts: Vec<RawContract>,
}

#[derive(Debug, Deserialize)]
struct RawContract {
    strike: f64,
    expiration: Date,
    #[serde(alias = "type")]
    option_type: String,
    #[serde(default)]
    bid: Option<f64>,
    #[serde(default)]
    ask: Option<f64>,
    #[serde(default, alias = "iv", alias = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

/// Implied volatility as a decimal fraction.
///
/// Returns `None` for non-finite or non-positive quotes; divides quotes above
/// [`PERCENT_QUOTE_THRESHOLD`] by 100.
///
/// ```
/// use adapter_loader::normalize_implied_volatility;
///
/// assert_eq!(normalize_implied_volatility(0.25), Some(0.25));
/// assert_eq!(normalize_implied_volatility(25.0), Some(0.25));
/// assert_eq!(normalize_implied_volatility(0.0), None);
/// ```
pub fn normalize_implied_volatility(value: f64) -> Option<f64> {
    if !(value.is_finite() && value > 0.0) {
        return None;
    }
    if value > PERCENT_QUOTE_THRESHOLD {
        Some(value / 100.0)
    } else {
        Some(value)
    }
}

/// Parse a chain snapshot from a JSON string.
///
/// # Errors
///
/// - `Json` for malformed documents or unparsable dates
/// - `InvalidContract` for an unknown option type or a non-positive strike
pub fn parse_chain_json(json: &str) -> Result<OptionsChainSnapshot, LoaderError> {
    let raw: RawChain = serde_json::from_str(json)?;
    let mut rescaled = 0usize;

    let contracts = raw
        .contracts
        .into_iter()
        .enumerate()
        .map(|(index, c)| {
            let option_type: OptionType = c
                .option_type
                .parse()
                .map_err(|message| LoaderError::InvalidContract { index, message })?;
            if !(c.strike.is_finite() && c.strike > 0.0) {
                return Err(LoaderError::InvalidContract {
                    index,
                    message: format!("strike must be positive, got {}", c.strike),
                });
            }
            let implied_volatility = c.implied_volatility.and_then(normalize_implied_volatility);
            if matches!(c.implied_volatility, Some(v) if v > PERCENT_QUOTE_THRESHOLD) {
                rescaled += 1;
            }
            Ok(OptionContract {
                strike: c.strike,
                expiration: c.expiration,
                option_type,
                bid: c.bid,
                ask: c.ask,
                implied_volatility,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        underlying = %raw.underlying,
        contracts = contracts.len(),
        rescaled,
        "parsed options chain"
    );
    Ok(OptionsChainSnapshot::new(raw.underlying, raw.as_of, contracts))
}

/// Load a chain snapshot from a JSON file.
pub fn load_chain_json(path: impl AsRef<Path>) -> Result<OptionsChainSnapshot, LoaderError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_chain_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CHAIN_JSON: &str = r#"{
        "underlying": "SPY",
        "as_of": "2024-06-14",
        "contracts": [
            {"strike": 545.0, "expiration": "2024-06-21", "type": "C", "iv": 14.5},
            {"strike": 540.0, "expiration": "2024-06-21", "option_type": "call",
             "bid": 4.1, "ask": 4.3, "implied_volatility": 0.132},
            {"strike": 540.0, "expiration": "2024-06-21", "type": "put", "iv": null},
            {"strike": 540.0, "expiration": "2024-06-28", "type": "call", "impliedVolatility": -1.0}
        ]
    }"#;

    #[test]
    fn test_normalize_threshold() {
        assert_eq!(normalize_implied_volatility(5.0), Some(5.0));
        assert_relative_eq!(normalize_implied_volatility(5.5).unwrap(), 0.055, epsilon = 1e-15);
        assert_eq!(normalize_implied_volatility(f64::NAN), None);
        assert_eq!(normalize_implied_volatility(-0.2), None);
    }

    #[test]
    fn test_parse_chain() {
        let chain = parse_chain_json(CHAIN_JSON).unwrap();
        assert_eq!(chain.underlying, "SPY");
        assert_eq!(chain.as_of, Date::from_ymd(2024, 6, 14).unwrap());
        assert_eq!(chain.len(), 4);

        // provider order preserved
        assert_eq!(chain.contracts[0].strike, 545.0);
        assert_relative_eq!(
            chain.contracts[0].implied_volatility.unwrap(),
            0.145,
            epsilon = 1e-15
        );
        assert_eq!(chain.contracts[1].implied_volatility, Some(0.132));
        assert_relative_eq!(chain.contracts[1].mid().unwrap(), 4.2, epsilon = 1e-12);
        assert_eq!(chain.contracts[2].option_type, OptionType::Put);
        assert_eq!(chain.contracts[2].implied_volatility, None);
        assert_eq!(chain.contracts[3].implied_volatility, None);
    }

    #[test]
    fn test_unknown_option_type() {
        let json = r#"{"as_of": "2024-06-14", "contracts": [
            {"strike": 100.0, "expiration": "2024-06-21", "type": "straddle"}
        ]}"#;
        let err = parse_chain_json(json).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidContract { index: 0, .. }));
        assert!(err.to_string().contains("straddle"));
    }

    #[test]
    fn test_non_positive_strike() {
        let json = r#"{"as_of": "2024-06-14", "contracts": [
            {"strike": 100.0, "expiration": "2024-06-21", "type": "call"},
            {"strike": 0.0, "expiration": "2024-06-21", "type": "call"}
        ]}"#;
        let err = parse_chain_json(json).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidContract { index: 1, .. }));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_chain_json("{\"as_of\": \"not a date\", \"contracts\": []}"),
            Err(LoaderError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        std::fs::write(&path, CHAIN_JSON).unwrap();
        assert_eq!(load_chain_json(&path).unwrap().len(), 4);
        assert!(matches!(
            load_chain_json(dir.path().join("missing.json")),
            Err(LoaderError::Io { .. })
        ));
    }
}
