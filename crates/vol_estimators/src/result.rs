//! Uniform output of every estimator and the blender.
//!
//! A [`VolatilityResult`] is the only artifact handed to external risk and
//! recommendation code. Its serialised form adds a derived
//! `volatility_percent` field next to the raw decimal and passes `metadata`
//! through untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use vol_core::params::BlendWeights;
use vol_core::types::Date;

/// Estimation method tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Method {
    /// Sample standard deviation of close-to-close log returns
    CloseToClose,
    /// High-low range estimator
    Parkinson,
    /// OHLC estimator
    GarmanKlass,
    /// Drift-independent OHLC estimator with overnight jumps
    YangZhang,
    /// Weighted realized/implied blend
    Blended,
}

impl Method {
    /// The four realized-volatility estimators, cheapest data requirement first.
    pub const REALIZED: [Method; 4] = [
        Method::CloseToClose,
        Method::Parkinson,
        Method::GarmanKlass,
        Method::YangZhang,
    ];

    /// Stable wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::CloseToClose => "close_to_close",
            Method::Parkinson => "parkinson",
            Method::GarmanKlass => "garman_klass",
            Method::YangZhang => "yang_zhang",
            Method::Blended => "blended",
        }
    }

    /// Whether the method needs open/high/low columns.
    pub fn requires_ohlc(&self) -> bool {
        matches!(
            self,
            Method::Parkinson | Method::GarmanKlass | Method::YangZhang | Method::Blended
        )
    }

    /// Published efficiency relative to close-to-close; informational only.
    pub fn efficiency_ratio(&self) -> Option<f64> {
        match self {
            Method::Parkinson => Some(5.2),
            Method::GarmanKlass => Some(7.4),
            Method::YangZhang => Some(8.0),
            Method::CloseToClose | Method::Blended => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    /// Accepts the wire tag, kebab-case, or a short alias (`c2c`, `gk`, `yz`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "close_to_close" | "c2c" => Ok(Method::CloseToClose),
            "parkinson" => Ok(Method::Parkinson),
            "garman_klass" | "gk" => Ok(Method::GarmanKlass),
            "yang_zhang" | "yz" => Ok(Method::YangZhang),
            "blended" => Ok(Method::Blended),
            other => Err(format!(
                "unknown method '{}', expected one of: close_to_close, parkinson, garman_klass, yang_zhang, blended",
                other
            )),
        }
    }
}

/// A metadata entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum MetadataValue {
    /// Numeric diagnostic
    Number(f64),
    /// Free-form annotation
    Text(String),
    /// Blend weights used
    Weights(BlendWeights),
}

impl MetadataValue {
    /// Numeric value, if this entry is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value, if this entry is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Blend weights, if this entry holds them.
    pub fn as_weights(&self) -> Option<&BlendWeights> {
        match self {
            MetadataValue::Weights(w) => Some(w),
            _ => None,
        }
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Number(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<BlendWeights> for MetadataValue {
    fn from(w: BlendWeights) -> Self {
        MetadataValue::Weights(w)
    }
}

/// Volatility estimate with provenance.
///
/// Immutable once produced: fields are read through accessors, metadata is
/// attached only while the producing estimator builds it.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityResult {
    volatility: f64,
    method: Method,
    window: usize,
    data_points: usize,
    start_date: Date,
    end_date: Date,
    annualized: bool,
    metadata: BTreeMap<String, MetadataValue>,
}

impl VolatilityResult {
    /// Create a result with empty metadata.
    pub fn new(
        volatility: f64,
        method: Method,
        window: usize,
        data_points: usize,
        start_date: Date,
        end_date: Date,
        annualized: bool,
    ) -> Self {
        Self {
            volatility,
            method,
            window,
            data_points,
            start_date,
            end_date,
            annualized,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Volatility as a decimal fraction (0.25 = 25%).
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Volatility in percent.
    pub fn volatility_percent(&self) -> f64 {
        self.volatility * 100.0
    }

    /// Producing method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Look-back window in periods.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of bars actually read.
    pub fn data_points(&self) -> usize {
        self.data_points
    }

    /// First bar read.
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Last bar read.
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// Whether `volatility` is annualized.
    pub fn annualized(&self) -> bool {
        self.annualized
    }

    /// Estimator-specific diagnostics.
    pub fn metadata(&self) -> &BTreeMap<String, MetadataValue> {
        &self.metadata
    }

    /// Numeric metadata entry by key.
    pub fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(MetadataValue::as_f64)
    }
}

impl fmt::Display for VolatilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.2}% ({} window {}, {} points, {} to {})",
            self.method,
            self.volatility_percent(),
            if self.annualized { "annualized" } else { "daily" },
            self.window,
            self.data_points,
            self.start_date,
            self.end_date
        )
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Serialize, Serializer};

    #[derive(Serialize)]
    struct VolatilityResultRecord<'a> {
        volatility: f64,
        volatility_percent: f64,
        method: Method,
        window: usize,
        data_points: usize,
        start_date: Date,
        end_date: Date,
        annualized: bool,
        metadata: &'a BTreeMap<String, MetadataValue>,
    }

    impl Serialize for VolatilityResult {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            VolatilityResultRecord {
                volatility: self.volatility,
                volatility_percent: self.volatility_percent(),
                method: self.method,
                window: self.window,
                data_points: self.data_points,
                start_date: self.start_date,
                end_date: self.end_date,
                annualized: self.annualized,
                metadata: &self.metadata,
            }
            .serialize(serializer)
        }
    }
}
