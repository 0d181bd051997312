//! Trading-day dates.
//!
//! `Date` identifies one bar of a price history or one option expiration.
//! Differences between dates are calendar days, which is what both the
//! quality gap check and days-to-expiry need.
//!
//! # Examples
//!
//! ```
//! use vol_core::types::time::Date;
//!
//! let trade = Date::from_ymd(2024, 6, 14).unwrap();
//! let expiry = Date::from_ymd(2024, 6, 21).unwrap();
//! assert_eq!(expiry - trade, 7);
//! ```

use chrono::NaiveDate;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use super::error::DateError;

/// Calendar date of a bar, a snapshot or an expiration.
///
/// Ordered, so price histories can be checked for strictly increasing bars
/// and chains can list expirations soonest first. Reads and writes
/// `YYYY-MM-DD`, the format provider files use.
///
/// # Examples
///
/// ```
/// use vol_core::types::time::Date;
///
/// let close: Date = "2024-06-14".parse().unwrap();
/// let weekly = Date::from_ymd(2024, 6, 21).unwrap();
/// assert!(close < weekly);
/// assert_eq!(weekly.to_string(), "2024-06-21");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Build a date, rejecting impossible calendar days.
    ///
    /// ```
    /// use vol_core::types::time::Date;
    ///
    /// // leap-day expiration
    /// assert!(Date::from_ymd(2024, 2, 29).is_ok());
    /// assert!(Date::from_ymd(2023, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Read a `YYYY-MM-DD` cell; surrounding whitespace is ignored.
    ///
    /// ```
    /// use vol_core::types::time::Date;
    ///
    /// assert!(Date::parse(" 2024-06-14").is_ok());
    /// // US-style exports must be converted upstream
    /// assert!(Date::parse("06/14/2024").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(format!("{}: {}", s, e)))
    }

    /// Returns the date `days` calendar days later (earlier when negative).
    ///
    /// Saturates at the chrono date range instead of overflowing.
    ///
    /// # Examples
    ///
    /// ```
    /// use vol_core::types::time::Date;
    ///
    /// let friday = Date::from_ymd(2024, 6, 14).unwrap();
    /// assert_eq!(friday.add_days(3), Date::from_ymd(2024, 6, 17).unwrap());
    /// ```
    pub fn add_days(self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0
                .checked_add_days(chrono::Days::new(days.unsigned_abs()))
                .unwrap_or(NaiveDate::MAX)
        } else {
            self.0
                .checked_sub_days(chrono::Days::new(days.unsigned_abs()))
                .unwrap_or(NaiveDate::MIN)
        };
        Date(shifted)
    }

    /// Year fraction from `self` to `end` on an ACT/365 basis.
    ///
    /// Negative when `end` is before `self`.
    pub fn year_fraction_to(self, end: Date) -> f64 {
        (end - self) as f64 / 365.0
    }
}

impl Sub for Date {
    type Output = i64;

    /// Calendar days from `other` to `self`; weekends and holidays count.
    fn sub(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl FromStr for Date {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, DateError> {
        Date::parse(s)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
