//! Loosely-structured version values
//!
//! A `Version` is a non-empty run of dot-separated integers followed by an
//! optional free-text tail (`5.1.0`, `3.12.1+`, `2.0-beta`). Tool output is
//! rarely semver, so ordering looks only at the numeric components.

use std::cmp::Ordering;
use std::fmt;

/// A parsed version: numeric components plus an optional trailing tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    number: Vec<u64>,
    extra: Option<String>,
}

impl Version {
    /// Creates a version from its parts.
    ///
    /// Returns `None` when `number` is empty. An empty `extra` is stored as `None`.
    pub fn new(number: Vec<u64>, extra: Option<String>) -> Option<Self> {
        if number.is_empty() {
            return None;
        }
        let extra = extra.filter(|e| !e.is_empty());
        Some(Self { number, extra })
    }

    /// Numeric components, most significant first
    pub fn number(&self) -> &[u64] {
        &self.number
    }

    /// Trailing text after the numeric components, if any
    pub fn extra(&self) -> Option<&str> {
        self.extra.as_deref()
    }

    /// Compares numeric components pairwise over the shorter of the two sequences.
    ///
    /// The first differing pair decides. When one sequence is a prefix of the
    /// other the result is `Equal`: `1.2` and `1.2.0` compare equal, and so do
    /// `1.2` and `1.2.7`. The tag in `extra` never takes part.
    pub fn compare(&self, other: &Version) -> Ordering {
        self.number
            .iter()
            .zip(other.number.iter())
            .map(|(a, b)| a.cmp(b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }

    pub fn is_less(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn is_less_or_equal(&self, other: &Version) -> bool {
        self.compare(other) != Ordering::Greater
    }

    pub fn is_greater(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub fn is_greater_or_equal(&self, other: &Version) -> bool {
        self.compare(other) != Ordering::Less
    }

    /// Equality over the zipped components (see [`Version::compare`])
    pub fn matches(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for n in &self.number {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", n)?;
            first = false;
        }
        if let Some(ref extra) = self.extra {
            f.write_str(extra)?;
        }
        Ok(())
    }
}
