//! Machine-readable measurement reports.
//!
//! Field names follow [`Measurement`]; `outcome` is `"Converged"` or
//! `"Exhausted"`.

use crate::result::Measurement;

/// One-line JSON report, for appending to a log of runs.
pub fn to_json(measurement: &Measurement) -> Result<String, serde_json::Error> {
    serde_json::to_string(measurement)
}

/// Indented JSON report, for reading at a terminal.
pub fn to_json_pretty(measurement: &Measurement) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(measurement)
}
