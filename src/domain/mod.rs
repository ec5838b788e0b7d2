//! Core domain models for depcheck
//!
//! - Versions and relational constraints over them
//! - Check nodes built from resolved configuration fields
//! - Per-check results and the aggregated run report

mod check;
mod constraint;
mod outcome;
mod report;
mod version;

pub use check::{CheckFields, CheckNode};
pub use constraint::{Relation, VersionConstraint};
pub use outcome::{CheckResult, CheckStatus, TOO_OLD};
pub use report::{ReportEntry, RunReport};
pub use version::Version;
