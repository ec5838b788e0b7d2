//! Aggregated results of a run

use super::{CheckNode, CheckResult};

/// Result of one check, with the details needed for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Check name
    pub name: String,
    /// Requirement as written back in canonical form
    pub require: String,
    pub suggestion_text: Option<String>,
    pub suggestion: Option<String>,
    pub result: CheckResult,
}

impl ReportEntry {
    /// Creates an entry from a node and its result
    pub fn new(node: &CheckNode, result: CheckResult) -> Self {
        Self {
            name: node.name.clone(),
            require: node.require.to_string(),
            suggestion_text: node.suggestion_text.clone(),
            suggestion: node.suggestion.clone(),
            result,
        }
    }
}

/// All results of a run, ordered by check name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    pub fn new(mut entries: Vec<ReportEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    /// True if every evaluated check passed
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|e| e.result.success)
    }

    /// Entries whose check failed
    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| !e.result.success)
    }

    /// Looks up the result for a check
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
