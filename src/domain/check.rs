//! Check nodes: one declared dependency and how to verify it

use super::{CheckResult, Version, VersionConstraint};
use crate::error::ConfigError;
use crate::parser::{parse_version, parse_version_constraint, split_depends};
use regex::Regex;
use tokio::sync::OnceCell;

/// Field values for one check, already merged with its template and free of placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckFields {
    /// Constraint text, e.g. `>=5`
    pub require: Option<String>,
    /// Shell command printing the version
    pub get_version: Option<String>,
    /// Regex whose first capture group isolates the version
    pub pattern: Option<String>,
    /// Advisory label shown when the check fails
    pub suggestion_text: Option<String>,
    /// Advisory command or hint shown when the check fails
    pub suggestion: Option<String>,
    /// Raw depends entries; each may itself be comma-separated
    pub depends: Vec<String>,
}

/// A named dependency check.
///
/// Holds the memoized result of its single evaluation.
#[derive(Debug)]
pub struct CheckNode {
    pub name: String,
    pub require: VersionConstraint,
    /// Shell command whose output contains the version
    pub probe: String,
    pub pattern: Option<Regex>,
    pub suggestion_text: Option<String>,
    pub suggestion: Option<String>,
    /// Prerequisite check names, deduplicated, in declaration order
    pub depends: Vec<String>,
    outcome: OnceCell<CheckResult>,
}

impl CheckNode {
    /// Builds a node from resolved field values
    pub fn from_fields(name: &str, fields: &CheckFields) -> Result<Self, ConfigError> {
        let require_text = fields
            .require
            .as_deref()
            .ok_or_else(|| ConfigError::missing_field(name, "require"))?;
        let require =
            parse_version_constraint(require_text).map_err(|source| ConfigError::InvalidRequire {
                check: name.to_string(),
                value: require_text.to_string(),
                source,
            })?;

        let probe = fields
            .get_version
            .clone()
            .ok_or_else(|| ConfigError::missing_field(name, "get_version"))?;

        let pattern = match fields.pattern.as_deref() {
            Some(text) => Some(compile_pattern(name, text)?),
            None => None,
        };

        let depends = split_depends(fields.depends.iter().map(String::as_str));
        if depends.iter().any(|d| d == name) {
            return Err(ConfigError::DependencyCycle {
                path: vec![name.to_string(), name.to_string()],
            });
        }

        Ok(Self {
            name: name.to_string(),
            require,
            probe,
            pattern,
            suggestion_text: fields.suggestion_text.clone(),
            suggestion: fields.suggestion.clone(),
            depends,
            outcome: OnceCell::new(),
        })
    }

    /// Isolates and parses the version from probe output.
    ///
    /// With a pattern, capture group 1 is used; otherwise the whole output.
    /// Either way the text is trimmed first. The error is the failure text.
    pub fn extract_version(&self, stdout: &str) -> Result<Version, String> {
        let text = match &self.pattern {
            Some(re) => {
                let caps = re.captures(stdout).ok_or_else(|| {
                    format!("Pattern '{}' not found in output", re.as_str())
                })?;
                caps.get(1).map_or("", |m| m.as_str())
            }
            None => stdout,
        };
        parse_version(text.trim()).map_err(|e| e.to_string())
    }

    /// The memoized result, once evaluation has finished
    pub fn result(&self) -> Option<&CheckResult> {
        self.outcome.get()
    }

    pub(crate) fn outcome(&self) -> &OnceCell<CheckResult> {
        &self.outcome
    }
}

fn compile_pattern(check: &str, text: &str) -> Result<Regex, ConfigError> {
    let re = Regex::new(text).map_err(|e| ConfigError::InvalidPattern {
        check: check.to_string(),
        message: e.to_string(),
    })?;
    if re.captures_len() < 2 {
        return Err(ConfigError::PatternWithoutGroup {
            check: check.to_string(),
            pattern: text.to_string(),
        });
    }
    Ok(re)
}
