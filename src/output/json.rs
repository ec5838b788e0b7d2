//! JSON output formatter for machine processing

use crate::domain::{ReportEntry, RunReport};
use crate::output::ReportFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput {
    /// Whether every evaluated check passed
    success: bool,
    /// Per-check results, sorted by name
    checks: Vec<JsonCheck>,
}

/// JSON representation of one check
#[derive(Serialize)]
struct JsonCheck {
    name: String,
    require: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    found_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl From<&ReportEntry> for JsonCheck {
    fn from(entry: &ReportEntry) -> Self {
        Self {
            name: entry.name.clone(),
            require: entry.require.clone(),
            success: entry.result.success,
            failure: entry.result.failure.clone(),
            found_version: entry.result.found_version.as_ref().map(|v| v.to_string()),
            suggestion_text: entry.suggestion_text.clone(),
            suggestion: entry.suggestion.clone(),
        }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            success: report.is_success(),
            checks: report.entries.iter().map(JsonCheck::from).collect(),
        };
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
