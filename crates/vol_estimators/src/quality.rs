//! Advisory data-quality report over a price history.
//!
//! The validator never fails and never blocks estimation. It separates two
//! kinds of finding:
//!
//! - **issues** make the input unusable (non-positive prices, misaligned
//!   columns, `high < low`); `is_valid` is `false` when any are present
//! - **warnings** only lower confidence (short history, calendar gaps,
//!   extreme single-period moves)
//!
//! `quality_score = max(0, 100 − 50 × issues − 10 × warnings)`.

use std::fmt;

use vol_core::series::{first_non_positive, PriceData, PriceSeries};

/// Score lost per issue.
const ISSUE_PENALTY: u32 = 50;
/// Score lost per warning.
const WARNING_PENALTY: u32 = 10;

/// Finding that makes the series unusable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum QualityIssue {
    /// A column does not line up with `dates`
    LengthMismatch {
        /// Offending column
        field: &'static str,
        /// Length of `dates`
        expected: usize,
        /// Column length
        got: usize,
    },
    /// Dates are not strictly increasing
    NonIncreasingDates {
        /// First offending index
        index: usize,
    },
    /// A price column holds zero, negative or non-finite values
    NonPositivePrices {
        /// Offending column
        field: &'static str,
        /// Number of bad values
        count: usize,
        /// Index of the first bad value
        first_index: usize,
    },
    /// Bars whose high is below their low
    HighBelowLow {
        /// Number of bad bars
        count: usize,
        /// Index of the first bad bar
        first_index: usize,
    },
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::LengthMismatch {
                field,
                expected,
                got,
            } => write!(f, "{} has {} values, expected {}", field, got, expected),
            QualityIssue::NonIncreasingDates { index } => {
                write!(f, "dates not strictly increasing at index {}", index)
            }
            QualityIssue::NonPositivePrices {
                field,
                count,
                first_index,
            } => write!(
                f,
                "{} non-positive {} (first at index {})",
                count, field, first_index
            ),
            QualityIssue::HighBelowLow { count, first_index } => write!(
                f,
                "{} bars with high below low (first at index {})",
                count, first_index
            ),
        }
    }
}

/// Finding that lowers confidence without invalidating the series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum QualityWarning {
    /// Fewer bars than the recommended minimum
    InsufficientHistory {
        /// Bars present
        got: usize,
        /// Recommended minimum
        recommended: usize,
    },
    /// Calendar gaps wider than the threshold
    DateGaps {
        /// Number of gaps
        count: usize,
        /// Widest gap in calendar days
        max_gap_days: i64,
    },
    /// Single-period close moves above the threshold
    ExtremeReturns {
        /// Number of moves
        count: usize,
        /// Largest absolute simple return
        max_abs_return: f64,
    },
}

impl fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityWarning::InsufficientHistory { got, recommended } => write!(
                f,
                "only {} data points, at least {} recommended",
                got, recommended
            ),
            QualityWarning::DateGaps {
                count,
                max_gap_days,
            } => write!(
                f,
                "{} date gaps, widest {} calendar days",
                count, max_gap_days
            ),
            QualityWarning::ExtremeReturns {
                count,
                max_abs_return,
            } => write!(
                f,
                "{} extreme single-period returns, largest {:.1}%",
                count,
                max_abs_return * 100.0
            ),
        }
    }
}

/// Outcome of a quality check.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct QualityReport {
    /// `true` when no issues were found
    pub is_valid: bool,
    /// Bars inspected
    pub data_points: usize,
    /// Blocking findings
    pub issues: Vec<QualityIssue>,
    /// Advisory findings
    pub warnings: Vec<QualityWarning>,
    /// 0 to 100
    pub quality_score: u32,
}

impl QualityReport {
    fn new(data_points: usize, issues: Vec<QualityIssue>, warnings: Vec<QualityWarning>) -> Self {
        let penalty = ISSUE_PENALTY
            .saturating_mul(issues.len() as u32)
            .saturating_add(WARNING_PENALTY.saturating_mul(warnings.len() as u32));
        Self {
            is_valid: issues.is_empty(),
            data_points,
            quality_score: 100u32.saturating_sub(penalty),
            issues,
            warnings,
        }
    }
}

/// Thresholds used by [`QualityValidator`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QualityThresholds {
    /// Bars below which history is flagged as short
    pub min_data_points: usize,
    /// Widest tolerated calendar gap between consecutive bars
    pub max_gap_days: i64,
    /// Largest tolerated absolute single-period simple return
    pub max_abs_return: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_data_points: 20,
            max_gap_days: 5,
            max_abs_return: 0.5,
        }
    }
}

/// Produces a [`QualityReport`] for a price history.
///
/// # Example
///
/// ```
/// use vol_core::series::PriceData;
/// use vol_core::types::Date;
/// use vol_estimators::quality::QualityValidator;
///
/// let d0 = Date::from_ymd(2024, 1, 1).unwrap();
/// let dates = (0..5).map(|i| d0.add_days(i)).collect();
/// let data = PriceData::new(dates, vec![100.0, 101.0, -1.0, 102.0, 103.0]);
///
/// let report = QualityValidator::default().validate_data(&data);
/// assert!(!report.is_valid);
/// assert_eq!(report.issues.len(), 1);
/// assert_eq!(report.warnings.len(), 1); // short history
/// assert_eq!(report.quality_score, 40);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QualityValidator {
    thresholds: QualityThresholds,
}

impl QualityValidator {
    /// Create a validator with custom thresholds.
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use.
    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// Report on a validated series. Only warnings can appear.
    pub fn validate(&self, series: &PriceSeries) -> QualityReport {
        self.validate_data(series.as_data())
    }

    /// Report on raw provider data.
    pub fn validate_data(&self, data: &PriceData) -> QualityReport {
        let n = data.dates.len();
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        if n < self.thresholds.min_data_points {
            warnings.push(QualityWarning::InsufficientHistory {
                got: n,
                recommended: self.thresholds.min_data_points,
            });
        }

        let aligned = Self::check_lengths(data, &mut issues);

        if let Some(index) = data
            .dates
            .windows(2)
            .position(|pair| pair[1] <= pair[0])
        {
            issues.push(QualityIssue::NonIncreasingDates { index: index + 1 });
        }

        let gaps: Vec<i64> = data
            .dates
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .filter(|days| *days > self.thresholds.max_gap_days)
            .collect();
        if let Some(&max_gap_days) = gaps.iter().max() {
            warnings.push(QualityWarning::DateGaps {
                count: gaps.len(),
                max_gap_days,
            });
        }

        for (field, values) in data.price_columns() {
            if let Some(first_index) = first_non_positive(values) {
                let count = values.iter().filter(|v| !(v.is_finite() && **v > 0.0)).count();
                issues.push(QualityIssue::NonPositivePrices {
                    field,
                    count,
                    first_index,
                });
            }
        }

        if let (Some(highs), Some(lows)) = (&data.highs, &data.lows) {
            let bad: Vec<usize> = highs
                .iter()
                .zip(lows)
                .enumerate()
                .filter(|(_, (h, l))| h < l)
                .map(|(i, _)| i)
                .collect();
            if let Some(&first_index) = bad.first() {
                issues.push(QualityIssue::HighBelowLow {
                    count: bad.len(),
                    first_index,
                });
            }
        }

        if aligned {
            self.check_returns(&data.closes, &mut warnings);
        }

        QualityReport::new(n, issues, warnings)
    }

    /// Record length mismatches; `true` when closes line up with dates.
    fn check_lengths(data: &PriceData, issues: &mut Vec<QualityIssue>) -> bool {
        let n = data.dates.len();
        let columns = [
            ("closes", Some(data.closes.len())),
            ("opens", data.opens.as_ref().map(Vec::len)),
            ("highs", data.highs.as_ref().map(Vec::len)),
            ("lows", data.lows.as_ref().map(Vec::len)),
            ("volumes", data.volumes.as_ref().map(Vec::len)),
            ("adjusted_closes", data.adjusted_closes.as_ref().map(Vec::len)),
            ("dividends", data.dividends.as_ref().map(Vec::len)),
            ("split_coefficients", data.split_coefficients.as_ref().map(Vec::len)),
        ];
        for (field, len) in columns {
            if let Some(got) = len {
                if got != n {
                    issues.push(QualityIssue::LengthMismatch {
                        field,
                        expected: n,
                        got,
                    });
                }
            }
        }
        data.closes.len() == n
    }

    /// Flag close-to-close simple returns above the threshold.
    ///
    /// Pairs involving a non-positive close are skipped; they are already
    /// reported as issues.
    fn check_returns(&self, closes: &[f64], warnings: &mut Vec<QualityWarning>) {
        let extreme: Vec<f64> = closes
            .windows(2)
            .filter(|w| w[0].is_finite() && w[0] > 0.0 && w[1].is_finite() && w[1] > 0.0)
            .map(|w| (w[1] / w[0] - 1.0).abs())
            .filter(|r| *r > self.thresholds.max_abs_return)
            .collect();
        if !extreme.is_empty() {
            let max_abs_return = extreme.iter().copied().fold(0.0, f64::max);
            warnings.push(QualityWarning::ExtremeReturns {
                count: extreme.len(),
                max_abs_return,
            });
        }
    }
}
