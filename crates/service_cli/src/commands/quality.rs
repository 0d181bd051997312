//! Quality command implementation
//!
//! Reports on a price history before it is validated, so bad input shows up
//! as issues rather than a load error.

use std::path::Path;

use adapter_loader::load_price_csv;
use tracing::info;
use vol_estimators::engine::VolatilityEngine;
use vol_estimators::quality::QualityReport;

use super::{to_json, OutputFormat};
use crate::Result;

/// Run the quality command
pub fn run(engine: &VolatilityEngine, prices: &Path, format: OutputFormat) -> Result<String> {
    let data = load_price_csv(prices)?;
    let report = engine.quality_report_data(&data);
    info!(
        prices = %prices.display(),
        score = report.quality_score,
        valid = report.is_valid,
        "quality check complete"
    );

    match format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Table => Ok(render(&report)),
    }
}

fn render(report: &QualityReport) -> String {
    let mut lines = vec![
        format!("data points   {}", report.data_points),
        format!("valid         {}", if report.is_valid { "yes" } else { "no" }),
        format!("quality score {}/100", report.quality_score),
    ];
    for issue in &report.issues {
        lines.push(format!("  issue:   {}", issue));
    }
    for warning in &report.warnings {
        lines.push(format!("  warning: {}", warning));
    }
    lines.join("\n")
}
