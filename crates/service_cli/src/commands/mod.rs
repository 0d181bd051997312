//! Command implementations
//!
//! Each command returns its rendered output so `main` owns stdout.

pub mod blend;
pub mod estimate;
pub mod quality;
pub mod term_structure;

use clap::ValueEnum;
use serde::Serialize;
use vol_estimators::result::{MetadataValue, VolatilityResult};

use crate::Result;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub(crate) fn format_metadata(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Number(v) => format!("{:.6}", v),
        MetadataValue::Text(s) => s.clone(),
        MetadataValue::Weights(w) => format!(
            "short {:.2} / long {:.2} / implied {:.2}",
            w.realized_short(),
            w.realized_long(),
            w.implied()
        ),
    }
}

/// One row per result, metadata listed under each row when `with_metadata`.
pub(crate) fn results_table(results: &[VolatilityResult], with_metadata: bool) -> String {
    let mut lines = vec![format!(
        "{:<16} {:>10} {:>8} {:>7} {:<10}  {:<10}  {}",
        "method", "vol %", "window", "points", "start", "end", "basis"
    )];
    for r in results {
        lines.push(format!(
            "{:<16} {:>10.2} {:>8} {:>7} {:<10}  {:<10}  {}",
            r.method().as_str(),
            r.volatility_percent(),
            r.window(),
            r.data_points(),
            r.start_date().to_string(),
            r.end_date().to_string(),
            if r.annualized() { "annual" } else { "daily" }
        ));
        if with_metadata {
            for (key, value) in r.metadata() {
                lines.push(format!("  {:<18} {}", key, format_metadata(value)));
            }
        }
    }
    lines.join("\n")
}
