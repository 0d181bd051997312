//! Term-structure command implementation

use std::path::Path;

use adapter_loader::load_chain_json;
use tracing::{info, warn};
use vol_estimators::implied::{calculate_iv_term_structure, TermStructurePoint};

use super::{to_json, OutputFormat};
use crate::{CliError, Result};

/// Run the term-structure command
pub fn run(chain: &Path, spot: f64, expirations: usize, format: OutputFormat) -> Result<String> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "--spot must be a positive price, got {}",
            spot
        )));
    }
    let chain = load_chain_json(chain)?;
    let points = calculate_iv_term_structure(&chain, spot, expirations);
    if points.is_empty() {
        warn!(underlying = %chain.underlying, "no expiration has an ATM implied volatility");
    }
    info!(
        underlying = %chain.underlying,
        as_of = %chain.as_of,
        points = points.len(),
        "term structure built"
    );

    match format {
        OutputFormat::Json => to_json(&points),
        OutputFormat::Table => Ok(render(&points)),
    }
}

fn render(points: &[TermStructurePoint]) -> String {
    let mut lines = vec![format!(
        "{:<10}  {:>5} {:>8} {:>10} {:>8}",
        "expiry", "days", "years", "strike", "iv %"
    )];
    lines.extend(points.iter().map(|p| {
        format!(
            "{:<10}  {:>5} {:>8.4} {:>10.2} {:>8.2}",
            p.expiration.to_string(),
            p.days_to_expiry,
            p.years_to_expiry,
            p.strike,
            p.implied_volatility * 100.0
        )
    }));
    lines.join("\n")
}
