//! depcheck - dependency verification library
//!
//! Verifies that external tools and libraries are installed at required
//! versions. Each check runs a probe command, extracts a version from its
//! output and tests it against a constraint. Checks may depend on other
//! checks; the engine evaluates the resulting graph concurrently, running
//! every check at most once.

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod parser;
pub mod probe;
pub mod progress;
