//! Check configuration loading
//!
//! This module provides functionality to:
//! - Read a TOML configuration file of checks and templates
//! - Merge each check with its template and fill in `{name}` placeholders
//!
//! The result is a mapping of check name to resolved field values; nothing
//! downstream ever sees a template or a placeholder.

mod template;

pub use template::{expand_checks, substitute_name, Depends, RawConfig, RawFields};

use crate::domain::CheckFields;
use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "depcheck.toml";

/// Read and resolve a configuration file
pub fn load_config(path: &Path) -> Result<BTreeMap<String, CheckFields>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;
    parse_config(&content, path)
}

/// Resolve configuration text; `path` is only used in error messages
pub fn parse_config(
    content: &str,
    path: &Path,
) -> Result<BTreeMap<String, CheckFields>, ConfigError> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| ConfigError::syntax(path, e.to_string()))?;
    tracing::debug!(
        path = %path.display(),
        checks = raw.checks.len(),
        templates = raw.templates.len(),
        "loaded config"
    );
    expand_checks(raw)
}
