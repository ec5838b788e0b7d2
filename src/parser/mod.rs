//! Version and constraint parsing
//!
//! Handles:
//! - Versions from probe output or config: `5.1.0`, `3.12`, `2.0-beta`, `1.2.3rc1`
//! - Constraints from a check's `require` field: `>=5`, `==1.2.3`, `!=2.0`
//! - `depends` lists: `"a, b,,c"`

use crate::domain::{Relation, Version, VersionConstraint};
use crate::error::VersionError;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

// Leading dot-separated ASCII integers, then everything else verbatim
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([0-9]+(?:\.[0-9]+)*)(.*)$").unwrap());

/// Parses a version, keeping any text after the numeric components as its tag.
///
/// `1.2.3-beta` yields components `[1, 2, 3]` and tag `-beta`; `1.2.x` yields
/// `[1, 2]` and `.x`. Text without a leading integer is an error.
pub fn parse_version(text: &str) -> Result<Version, VersionError> {
    let caps = VERSION_RE
        .captures(text)
        .ok_or_else(|| VersionError::NoNumericPrefix {
            text: text.to_string(),
        })?;

    let number = caps[1]
        .split('.')
        .map(|part| part.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| VersionError::ComponentOverflow {
            text: text.to_string(),
        })?;
    let extra = caps.get(2).map(|m| m.as_str().to_string());

    Version::new(number, extra).ok_or_else(|| VersionError::NoNumericPrefix {
        text: text.to_string(),
    })
}

/// Parses a leading relational operator followed by a version
pub fn parse_version_constraint(text: &str) -> Result<VersionConstraint, VersionError> {
    let trimmed = text.trim();
    let (relation, rest) =
        Relation::strip_prefix(trimmed).ok_or_else(|| VersionError::UnknownOperator {
            text: trimmed.to_string(),
        })?;
    let version = parse_version(rest.trim_start())?;
    Ok(VersionConstraint::new(relation, version))
}

/// Splits a comma-separated `depends` value.
///
/// Entries are trimmed; empty entries and repeats are dropped, first occurrence wins.
pub fn split_depends<'a, I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut names: Vec<String> = Vec::new();
    for name in entries.into_iter().flat_map(|e| e.split(',')).map(str::trim) {
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(s)
    }
}

impl FromStr for VersionConstraint {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version_constraint(s)
    }
}
