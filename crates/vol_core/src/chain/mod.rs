//! Options-chain snapshot types.
//!
//! An [`OptionsChainSnapshot`] is a read-only collection of contracts as
//! delivered by an options-data provider adapter. Implied volatilities are
//! already normalised to decimal form (0.25, not 25) by that adapter.
//!
//! The snapshot carries its own `as_of` date so days-to-expiry can be
//! computed without consulting the system clock.

use crate::types::Date;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Option type (Call or Put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OptionType {
    /// Right to buy
    #[default]
    Call,
    /// Right to sell
    Put,
}

impl OptionType {
    /// Lower-case name, as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(format!("unknown option type '{}', expected call or put", other)),
        }
    }
}

/// One option contract quote in a chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    /// Strike price
    pub strike: f64,
    /// Expiration date
    pub expiration: Date,
    /// Call or put
    pub option_type: OptionType,
    /// Best bid
    #[cfg_attr(feature = "serde", serde(default))]
    pub bid: Option<f64>,
    /// Best ask
    #[cfg_attr(feature = "serde", serde(default))]
    pub ask: Option<f64>,
    /// Implied volatility as a decimal fraction
    #[cfg_attr(feature = "serde", serde(default))]
    pub implied_volatility: Option<f64>,
}

impl OptionContract {
    /// Create a contract quote with no bid/ask.
    pub fn new(
        strike: f64,
        expiration: Date,
        option_type: OptionType,
        implied_volatility: Option<f64>,
    ) -> Self {
        Self {
            strike,
            expiration,
            option_type,
            bid: None,
            ask: None,
            implied_volatility,
        }
    }

    /// Attach a bid/ask quote.
    pub fn with_quote(mut self, bid: f64, ask: f64) -> Self {
        self.bid = Some(bid);
        self.ask = Some(ask);
        self
    }

    /// Mid price when both sides are quoted.
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(0.5 * (bid + ask)),
            _ => None,
        }
    }

    /// Implied volatility, ignoring values that are not finite and positive.
    pub fn usable_implied_volatility(&self) -> Option<f64> {
        self.implied_volatility
            .filter(|iv| iv.is_finite() && *iv > 0.0)
    }
}

/// Read-only snapshot of an options chain.
///
/// # Example
///
/// ```
/// use vol_core::chain::{OptionContract, OptionType, OptionsChainSnapshot};
/// use vol_core::types::Date;
///
/// let as_of = Date::from_ymd(2024, 6, 14).unwrap();
/// let expiry = as_of.add_days(7);
/// let chain = OptionsChainSnapshot::new(
///     "SPY",
///     as_of,
///     vec![OptionContract::new(100.0, expiry, OptionType::Call, Some(0.22))],
/// );
/// assert_eq!(chain.expirations(), vec![expiry]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionsChainSnapshot {
    /// Underlying symbol
    pub underlying: String,
    /// Snapshot date, the reference for days-to-expiry
    pub as_of: Date,
    /// Contracts in provider order
    pub contracts: Vec<OptionContract>,
}

impl OptionsChainSnapshot {
    /// Create a snapshot.
    pub fn new(underlying: impl Into<String>, as_of: Date, contracts: Vec<OptionContract>) -> Self {
        Self {
            underlying: underlying.into(),
            as_of,
            contracts,
        }
    }

    /// Returns `true` when the chain has no contracts.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Number of contracts.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Distinct expirations on or after `as_of`, ascending.
    pub fn expirations(&self) -> Vec<Date> {
        self.contracts
            .iter()
            .map(|c| c.expiration)
            .filter(|e| *e >= self.as_of)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Contracts of one type, optionally restricted to one expiration, in provider order.
    pub fn filter<'a>(
        &'a self,
        option_type: OptionType,
        expiration: Option<Date>,
    ) -> impl Iterator<Item = &'a OptionContract> + 'a {
        self.contracts.iter().filter(move |c| {
            c.option_type == option_type && expiration.map_or(true, |e| c.expiration == e)
        })
    }

    /// Calendar days from `as_of` to `expiration`.
    pub fn days_to_expiry(&self, expiration: Date) -> i64 {
        expiration - self.as_of
    }
}
