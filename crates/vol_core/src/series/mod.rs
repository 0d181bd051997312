//! Price history value objects.
//!
//! - [`PriceData`]: raw, unvalidated OHLCV columns as handed over by a
//!   provider adapter. The quality validator inspects this form so it can
//!   report problems without failing.
//! - [`PriceSeries`]: the validated, immutable form every estimator consumes.
//! - [`Ohlc`]: borrowed view of the four price columns a range-based
//!   estimator needs.
//!
//! Ordering is the adapter's responsibility: `PriceSeries` rejects dates that
//! are not strictly increasing but never re-sorts them.

use crate::types::{Date, SeriesError};

/// Raw OHLCV columns aligned on `dates`.
///
/// Only `dates` and `closes` are required; every other column is optional and
/// must have the length of `dates` when present.
///
/// # Example
///
/// ```
/// use vol_core::series::PriceData;
/// use vol_core::types::Date;
///
/// let d0 = Date::from_ymd(2024, 1, 2).unwrap();
/// let data = PriceData::new(vec![d0, d0.add_days(1)], vec![100.0, 101.0])
///     .with_ohlc(vec![99.5, 100.2], vec![100.5, 101.4], vec![99.0, 100.0]);
/// assert!(data.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceData {
    /// Trading days, strictly increasing
    pub dates: Vec<Date>,
    /// Close prices
    pub closes: Vec<f64>,
    /// Open prices
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub opens: Option<Vec<f64>>,
    /// Bar highs
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub highs: Option<Vec<f64>>,
    /// Bar lows
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub lows: Option<Vec<f64>>,
    /// Traded volume
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub volumes: Option<Vec<f64>>,
    /// Split/dividend adjusted closes
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub adjusted_closes: Option<Vec<f64>>,
    /// Cash dividend paid on the bar
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub dividends: Option<Vec<f64>>,
    /// Split coefficient of the bar (1.0 when no split)
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub split_coefficients: Option<Vec<f64>>,
}

impl PriceData {
    /// Create close-only data.
    pub fn new(dates: Vec<Date>, closes: Vec<f64>) -> Self {
        Self {
            dates,
            closes,
            ..Self::default()
        }
    }

    /// Attach open, high and low columns.
    pub fn with_ohlc(mut self, opens: Vec<f64>, highs: Vec<f64>, lows: Vec<f64>) -> Self {
        self.opens = Some(opens);
        self.highs = Some(highs);
        self.lows = Some(lows);
        self
    }

    /// Attach a volume column.
    pub fn with_volumes(mut self, volumes: Vec<f64>) -> Self {
        self.volumes = Some(volumes);
        self
    }

    /// Attach an adjusted-close column.
    pub fn with_adjusted_closes(mut self, adjusted_closes: Vec<f64>) -> Self {
        self.adjusted_closes = Some(adjusted_closes);
        self
    }

    /// Attach dividend and split-coefficient columns.
    pub fn with_corporate_actions(mut self, dividends: Vec<f64>, splits: Vec<f64>) -> Self {
        self.dividends = Some(dividends);
        self.split_coefficients = Some(splits);
        self
    }

    /// Number of bars (length of `dates`).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns `true` when there are no bars.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Named price columns that are present, closes first.
    ///
    /// Used by both validation and the quality report.
    pub fn price_columns(&self) -> Vec<(&'static str, &[f64])> {
        let mut columns: Vec<(&'static str, &[f64])> = vec![("closes", self.closes.as_slice())];
        let optional = [
            ("opens", &self.opens),
            ("highs", &self.highs),
            ("lows", &self.lows),
            ("adjusted_closes", &self.adjusted_closes),
            ("split_coefficients", &self.split_coefficients),
        ];
        for (name, column) in optional {
            if let Some(values) = column {
                columns.push((name, values.as_slice()));
            }
        }
        columns
    }

    fn optional_columns(&self) -> [(&'static str, Option<&Vec<f64>>); 7] {
        [
            ("opens", self.opens.as_ref()),
            ("highs", self.highs.as_ref()),
            ("lows", self.lows.as_ref()),
            ("volumes", self.volumes.as_ref()),
            ("adjusted_closes", self.adjusted_closes.as_ref()),
            ("dividends", self.dividends.as_ref()),
            ("split_coefficients", self.split_coefficients.as_ref()),
        ]
    }

    /// Check every structural invariant, reporting the first violation.
    ///
    /// Order of checks: column lengths, date ordering, positive prices,
    /// non-negative volumes/dividends, `high >= low`.
    pub fn validate(&self) -> Result<(), SeriesError> {
        let n = self.dates.len();

        if self.closes.len() != n {
            return Err(SeriesError::LengthMismatch {
                field: "closes",
                expected: n,
                got: self.closes.len(),
            });
        }
        for (field, column) in self.optional_columns() {
            if let Some(values) = column {
                if values.len() != n {
                    return Err(SeriesError::LengthMismatch {
                        field,
                        expected: n,
                        got: values.len(),
                    });
                }
            }
        }

        for (index, pair) in self.dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(SeriesError::NonIncreasingDates {
                    index: index + 1,
                    previous: pair[0].to_string(),
                    current: pair[1].to_string(),
                });
            }
        }

        for (field, values) in self.price_columns() {
            if let Some(index) = first_non_positive(values) {
                return Err(SeriesError::NonPositivePrice {
                    field,
                    index,
                    value: values[index],
                });
            }
        }

        let non_negative = [
            ("volumes", self.volumes.as_deref()),
            ("dividends", self.dividends.as_deref()),
        ];
        for (field, column) in non_negative {
            if let Some(values) = column {
                if let Some(index) = values.iter().position(|v| !(v.is_finite() && *v >= 0.0)) {
                    return Err(SeriesError::NegativeValue {
                        field,
                        index,
                        value: values[index],
                    });
                }
            }
        }

        if let (Some(highs), Some(lows)) = (&self.highs, &self.lows) {
            check_high_low(highs, lows)?;
        }

        Ok(())
    }
}

/// Index of the first value that is not a strictly positive finite number.
pub fn first_non_positive(values: &[f64]) -> Option<usize> {
    values.iter().position(|v| !(v.is_finite() && *v > 0.0))
}

/// Check `high >= low` bar by bar, naming the first offending index.
pub fn check_high_low(highs: &[f64], lows: &[f64]) -> Result<(), SeriesError> {
    match highs.iter().zip(lows).position(|(h, l)| h < l) {
        Some(index) => Err(SeriesError::HighBelowLow {
            index,
            high: highs[index],
            low: lows[index],
        }),
        None => Ok(()),
    }
}

/// Validated, immutable price history.
///
/// Constructed once from [`PriceData`]; never mutated afterwards.
///
/// # Example
///
/// ```
/// use vol_core::series::{PriceData, PriceSeries};
/// use vol_core::types::{Date, SeriesError};
///
/// let d0 = Date::from_ymd(2024, 1, 2).unwrap();
/// let bad = PriceData::new(vec![d0, d0.add_days(1)], vec![100.0, 0.0]);
/// assert!(matches!(
///     PriceSeries::new(bad),
///     Err(SeriesError::NonPositivePrice { index: 1, .. })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PriceData", into = "PriceData"))]
pub struct PriceSeries {
    data: PriceData,
}

impl PriceSeries {
    /// Validate raw data into a series.
    pub fn new(data: PriceData) -> Result<Self, SeriesError> {
        data.validate()?;
        Ok(Self { data })
    }

    /// Validate a close-only series.
    pub fn from_closes(dates: Vec<Date>, closes: Vec<f64>) -> Result<Self, SeriesError> {
        Self::new(PriceData::new(dates, closes))
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when there are no bars.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Trading days.
    pub fn dates(&self) -> &[Date] {
        &self.data.dates
    }

    /// Close prices.
    pub fn closes(&self) -> &[f64] {
        &self.data.closes
    }

    /// Open prices, if supplied.
    pub fn opens(&self) -> Option<&[f64]> {
        self.data.opens.as_deref()
    }

    /// Bar highs, if supplied.
    pub fn highs(&self) -> Option<&[f64]> {
        self.data.highs.as_deref()
    }

    /// Bar lows, if supplied.
    pub fn lows(&self) -> Option<&[f64]> {
        self.data.lows.as_deref()
    }

    /// Volumes, if supplied.
    pub fn volumes(&self) -> Option<&[f64]> {
        self.data.volumes.as_deref()
    }

    /// Adjusted closes, if supplied.
    pub fn adjusted_closes(&self) -> Option<&[f64]> {
        self.data.adjusted_closes.as_deref()
    }

    /// Dividends, if supplied.
    pub fn dividends(&self) -> Option<&[f64]> {
        self.data.dividends.as_deref()
    }

    /// Split coefficients, if supplied.
    pub fn split_coefficients(&self) -> Option<&[f64]> {
        self.data.split_coefficients.as_deref()
    }

    /// First trading day.
    pub fn start_date(&self) -> Option<Date> {
        self.data.dates.first().copied()
    }

    /// Last trading day.
    pub fn end_date(&self) -> Option<Date> {
        self.data.dates.last().copied()
    }

    /// Returns `true` when opens, highs and lows are all present.
    pub fn has_ohlc(&self) -> bool {
        self.data.opens.is_some() && self.data.highs.is_some() && self.data.lows.is_some()
    }

    /// Borrow the four OHLC columns.
    ///
    /// Fails with `SeriesError::MissingColumn` naming the first absent column.
    pub fn ohlc(&self) -> Result<Ohlc<'_>, SeriesError> {
        Ok(Ohlc {
            opens: self.opens().ok_or(SeriesError::MissingColumn("opens"))?,
            highs: self.highs().ok_or(SeriesError::MissingColumn("highs"))?,
            lows: self.lows().ok_or(SeriesError::MissingColumn("lows"))?,
            closes: self.closes(),
        })
    }

    /// Borrow the raw columns.
    pub fn as_data(&self) -> &PriceData {
        &self.data
    }

    /// Release the raw columns.
    pub fn into_data(self) -> PriceData {
        self.data
    }
}

impl TryFrom<PriceData> for PriceSeries {
    type Error = SeriesError;

    fn try_from(data: PriceData) -> Result<Self, Self::Error> {
        PriceSeries::new(data)
    }
}

impl From<PriceSeries> for PriceData {
    fn from(series: PriceSeries) -> Self {
        series.data
    }
}

/// Borrowed OHLC columns of equal length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ohlc<'a> {
    /// Open prices
    pub opens: &'a [f64],
    /// Bar highs
    pub highs: &'a [f64],
    /// Bar lows
    pub lows: &'a [f64],
    /// Close prices
    pub closes: &'a [f64],
}

impl<'a> Ohlc<'a> {
    /// Number of bars.
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Returns `true` when there are no bars.
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Check that all four columns have the same length.
    pub fn check_lengths(&self) -> Result<(), SeriesError> {
        let expected = self.opens.len();
        for (field, len) in [
            ("highs", self.highs.len()),
            ("lows", self.lows.len()),
            ("closes", self.closes.len()),
        ] {
            if len != expected {
                return Err(SeriesError::LengthMismatch {
                    field,
                    expected,
                    got: len,
                });
            }
        }
        Ok(())
    }

    /// The trailing `n` bars (all bars when `n >= len`).
    pub fn tail(&self, n: usize) -> Ohlc<'a> {
        let start = self.len().saturating_sub(n);
        Ohlc {
            opens: &self.opens[start..],
            highs: &self.highs[start..],
            lows: &self.lows[start..],
            closes: &self.closes[start..],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<Date> {
        let start = Date::from_ymd(2024, 1, 1).unwrap();
        (0..n as i64).map(|i| start.add_days(i)).collect()
    }

    // ========================================================================
    // Construction Tests
    // ========================================================================

    #[test]
    fn test_close_only_series() {
        let series = PriceSeries::from_closes(dates(3), vec![100.0, 101.0, 102.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert!(!series.has_ohlc());
        assert_eq!(series.start_date(), Some(dates(1)[0]));
        assert_eq!(series.end_date(), Some(dates(3)[2]));
    }

    #[test]
    fn test_empty_series_is_valid() {
        let series = PriceSeries::from_closes(vec![], vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.start_date(), None);
    }

    #[test]
    fn test_closes_shorter_than_dates() {
        let err = PriceSeries::from_closes(dates(3), vec![100.0, 101.0]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::LengthMismatch {
                field: "closes",
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_optional_column_length_mismatch() {
        let data = PriceData::new(dates(3), vec![100.0, 101.0, 102.0]).with_volumes(vec![1.0]);
        assert!(matches!(
            PriceSeries::new(data),
            Err(SeriesError::LengthMismatch {
                field: "volumes",
                ..
            })
        ));
    }

    #[test]
    fn test_non_positive_close() {
        let err = PriceSeries::from_closes(dates(3), vec![100.0, -1.0, 102.0]).unwrap_err();
        assert!(matches!(
            err,
            SeriesError::NonPositivePrice {
                field: "closes",
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_nan_close_rejected() {
        let err = PriceSeries::from_closes(dates(2), vec![100.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, SeriesError::NonPositivePrice { index: 1, .. }));
    }

    #[test]
    fn test_high_below_low_names_index() {
        let data = PriceData::new(dates(3), vec![100.0, 101.0, 102.0]).with_ohlc(
            vec![100.0, 101.0, 102.0],
            vec![101.0, 100.0, 103.0],
            vec![99.0, 100.5, 101.0],
        );
        let err = PriceSeries::new(data).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let mut d = dates(3);
        d[2] = d[1];
        let err = PriceSeries::from_closes(d, vec![100.0, 101.0, 102.0]).unwrap_err();
        assert!(matches!(err, SeriesError::NonIncreasingDates { index: 2, .. }));
    }

    #[test]
    fn test_descending_dates_rejected() {
        let mut d = dates(3);
        d.reverse();
        assert!(PriceSeries::from_closes(d, vec![100.0, 101.0, 102.0]).is_err());
    }

    #[test]
    fn test_zero_volume_allowed_negative_rejected() {
        let ok = PriceData::new(dates(2), vec![100.0, 101.0]).with_volumes(vec![0.0, 10.0]);
        assert!(PriceSeries::new(ok).is_ok());

        let bad = PriceData::new(dates(2), vec![100.0, 101.0]).with_volumes(vec![0.0, -10.0]);
        assert!(matches!(
            PriceSeries::new(bad),
            Err(SeriesError::NegativeValue {
                field: "volumes",
                index: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_split_coefficient_rejected() {
        let data = PriceData::new(dates(2), vec![100.0, 101.0])
            .with_corporate_actions(vec![0.0, 0.5], vec![1.0, 0.0]);
        assert!(matches!(
            PriceSeries::new(data),
            Err(SeriesError::NonPositivePrice {
                field: "split_coefficients",
                ..
            })
        ));
    }

    // ========================================================================
    // OHLC View Tests
    // ========================================================================

    #[test]
    fn test_ohlc_missing_column() {
        let series = PriceSeries::from_closes(dates(2), vec![100.0, 101.0]).unwrap();
        assert_eq!(series.ohlc().unwrap_err(), SeriesError::MissingColumn("opens"));
    }

    #[test]
    fn test_ohlc_tail() {
        let data = PriceData::new(dates(4), vec![1.0, 2.0, 3.0, 4.0]).with_ohlc(
            vec![1.0, 2.0, 3.0, 4.0],
            vec![1.5, 2.5, 3.5, 4.5],
            vec![0.5, 1.5, 2.5, 3.5],
        );
        let series = PriceSeries::new(data).unwrap();
        let ohlc = series.ohlc().unwrap();
        let tail = ohlc.tail(2);
        assert_eq!(tail.closes, &[3.0, 4.0]);
        assert_eq!(tail.opens, &[3.0, 4.0]);
        assert_eq!(ohlc.tail(10).len(), 4);
    }

    #[test]
    fn test_ohlc_check_lengths() {
        let ohlc = Ohlc {
            opens: &[1.0, 2.0],
            highs: &[1.0, 2.0],
            lows: &[1.0],
            closes: &[1.0, 2.0],
        };
        assert!(matches!(
            ohlc.check_lengths(),
            Err(SeriesError::LengthMismatch { field: "lows", .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialise_validates() {
        let json = r#"{"dates":["2024-01-01","2024-01-02"],"closes":[100.0,0.0]}"#;
        assert!(serde_json::from_str::<PriceSeries>(json).is_err());

        let json = r#"{"dates":["2024-01-01","2024-01-02"],"closes":[100.0,101.0]}"#;
        let series: PriceSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.closes(), &[100.0, 101.0]);
    }
}
