//! CSV price-history loader.
//!
//! Expected header (case-insensitive, any column order):
//!
//! ```text
//! date, open, high, low, close, volume, adjusted_close, dividend, split_coefficient
//! ```
//!
//! Only `date` and `close` are required. A column that is present must be
//! populated on every row. Rows are sorted ascending by date, since several
//! providers export newest first; duplicate dates are rejected.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::Deserialize;
use tracing::debug;
use vol_core::series::{PriceData, PriceSeries};
use vol_core::types::Date;

use crate::error::LoaderError;

#[derive(Debug, Deserialize)]
struct PriceRow {
    date: String,
    #[serde(default)]
    close: Option<f64>,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
    #[serde(default)]
    adjusted_close: Option<f64>,
    #[serde(default)]
    dividend: Option<f64>,
    #[serde(default)]
    split_coefficient: Option<f64>,
}

struct DatedRow {
    line: usize,
    date: Date,
    row: PriceRow,
}

/// Canonical column name for a provider header.
fn normalize_header(header: &str) -> String {
    let name = header.trim().to_lowercase().replace([' ', '-'], "_");
    match name.as_str() {
        "timestamp" => "date".to_string(),
        "adj_close" | "adjclose" => "adjusted_close".to_string(),
        "dividend_amount" | "dividends" => "dividend".to_string(),
        "split" | "split_ratio" => "split_coefficient".to_string(),
        _ => name,
    }
}

/// Read a price history from CSV.
///
/// # Errors
///
/// - `MissingColumn` if `date` or `close` is absent
/// - `InvalidDate` / `MissingValue` naming the offending line
/// - `DuplicateDate` if two rows share a date
/// - `Csv` for unparsable numbers or malformed records
pub fn read_price_csv<R: Read>(reader: R) -> Result<PriceData, LoaderError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: StringRecord = rdr.headers()?.iter().map(normalize_header).collect();
    rdr.set_headers(headers.clone());
    let has = |name: &str| headers.iter().any(|h| h == name);
    for required in ["date", "close"] {
        if !has(required) {
            return Err(LoaderError::MissingColumn(required));
        }
    }

    let mut rows = Vec::new();
    for (idx, record) in rdr.deserialize::<PriceRow>().enumerate() {
        // header is line 1
        let line = idx + 2;
        let row = record?;
        let date = Date::parse(&row.date).map_err(|source| LoaderError::InvalidDate { line, source })?;
        rows.push(DatedRow { line, date, row });
    }

    rows.sort_by_key(|r| r.date);
    if let Some(pair) = rows.windows(2).find(|pair| pair[0].date == pair[1].date) {
        return Err(LoaderError::DuplicateDate(pair[0].date.to_string()));
    }

    let column = |name: &'static str,
                  get: fn(&PriceRow) -> Option<f64>|
     -> Result<Option<Vec<f64>>, LoaderError> {
        if !has(name) {
            return Ok(None);
        }
        rows.iter()
            .map(|r| {
                get(&r.row).ok_or(LoaderError::MissingValue {
                    line: r.line,
                    column: name,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    };

    let data = PriceData {
        dates: rows.iter().map(|r| r.date).collect(),
        closes: column("close", |r| r.close)?.unwrap_or_default(),
        opens: column("open", |r| r.open)?,
        highs: column("high", |r| r.high)?,
        lows: column("low", |r| r.low)?,
        volumes: column("volume", |r| r.volume)?,
        adjusted_closes: column("adjusted_close", |r| r.adjusted_close)?,
        dividends: column("dividend", |r| r.dividend)?,
        split_coefficients: column("split_coefficient", |r| r.split_coefficient)?,
    };
    debug!(rows = data.len(), ohlc = data.opens.is_some(), "parsed price history");
    Ok(data)
}

/// Load a raw price history from a CSV file.
pub fn load_price_csv(path: impl AsRef<Path>) -> Result<PriceData, LoaderError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_price_csv(file)
}

/// Load and validate a price history from a CSV file.
pub fn load_price_series(path: impl AsRef<Path>) -> Result<PriceSeries, LoaderError> {
    Ok(PriceSeries::new(load_price_csv(path)?)?)
}
