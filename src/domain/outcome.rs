//! Per-check results and progress statuses

use super::Version;
use std::fmt;

/// Failure text for a version that does not satisfy the requirement
pub const TOO_OLD: &str = "Too old.";

/// Outcome of evaluating one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Whether the check passed
    pub success: bool,
    /// Human-readable cause of failure
    pub failure: Option<String>,
    /// Discovered version, set when it was parsed but rejected by the requirement
    pub found_version: Option<Version>,
}

impl CheckResult {
    /// Creates a passing result
    pub fn passed() -> Self {
        Self {
            success: true,
            failure: None,
            found_version: None,
        }
    }

    /// Creates a failing result with a reason
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            failure: Some(reason.into()),
            found_version: None,
        }
    }

    /// Creates a failing result for a prerequisite that did not pass
    pub fn failed_dependency(name: &str) -> Self {
        Self::failed(format!("Failed dependency: {}", name))
    }

    /// Creates a failing result for a version rejected by the requirement
    pub fn too_old(found: Version) -> Self {
        Self {
            success: false,
            failure: Some(TOO_OLD.to_string()),
            found_version: Some(found),
        }
    }
}

/// Status shown on a check's progress line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Dependency failure, probe failure, pattern mismatch or unparsable output
    NotFound,
    /// A version was found and satisfies the requirement
    Ok(Version),
    /// A version was found but fails the requirement
    TooOld(Version),
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::NotFound => write!(f, "Not found"),
            CheckStatus::Ok(version) => write!(f, "{} OK", version),
            CheckStatus::TooOld(version) => write!(f, "{} Too old", version),
        }
    }
}
