//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: Malformed version or constraint text
//! - ConfigError: Problems with the check configuration (fatal before any probe runs)
//! - ProbeError: A probe command could not be executed
//! - EngineError: The execution engine itself failed

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Execution engine errors
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Errors raised while parsing versions and constraints
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// No leading numeric component
    #[error("unable to parse version from '{text}'")]
    NoNumericPrefix { text: String },

    /// A numeric component does not fit in 64 bits
    #[error("version component too large in '{text}'")]
    ComponentOverflow { text: String },

    /// Constraint text does not start with a known operator
    #[error("unknown operator in '{text}': expected one of >=, <=, ==, !=, <, >")]
    UnknownOperator { text: String },
}

/// Errors related to the check configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error
    #[error("failed to parse config file {path}: {message}")]
    Syntax { path: PathBuf, message: String },

    /// A check refers to a template that does not exist
    #[error("check '{check}' uses unknown template '{template}'")]
    UnknownTemplate { check: String, template: String },

    /// A template refers to another template
    #[error("template '{template}' cannot itself use a template")]
    NestedTemplate { template: String },

    /// A mandatory field is absent after template expansion
    #[error("check '{check}' is missing required field '{field}'")]
    MissingField { check: String, field: &'static str },

    /// The require field does not parse as a constraint
    #[error("check '{check}' has invalid requirement '{value}': {source}")]
    InvalidRequire {
        check: String,
        value: String,
        #[source]
        source: VersionError,
    },

    /// The pattern field is not a valid regular expression
    #[error("check '{check}' has invalid pattern: {message}")]
    InvalidPattern { check: String, message: String },

    /// The pattern has no capture group to isolate the version
    #[error("check '{check}' pattern '{pattern}' has no capture group")]
    PatternWithoutGroup { check: String, pattern: String },

    /// A depends entry names a check that is not configured
    #[error("check '{check}' depends on unknown check '{dependency}'")]
    UnknownDependency { check: String, dependency: String },

    /// The depends graph contains a cycle
    #[error("dependency cycle: {}", path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    /// Two checks were given the same name
    #[error("check '{name}' is defined more than once")]
    DuplicateCheck { name: String },

    /// A check selected on the command line is not configured
    #[error("unknown check '{name}'")]
    UnknownCheck { name: String },
}

/// Errors raised while executing a probe command
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The shell could not be spawned
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The probe did not finish in time
    #[error("'{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },
}

/// Errors raised by the execution engine itself
#[derive(Error, Debug)]
pub enum EngineError {
    /// A check evaluation task panicked or was cancelled
    #[error("evaluation of check '{name}' did not complete: {message}")]
    TaskFailed { name: String, message: String },
}

impl ConfigError {
    /// Creates a new Read error
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Syntax error
    pub fn syntax(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::Syntax {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new MissingField error
    pub fn missing_field(check: impl Into<String>, field: &'static str) -> Self {
        ConfigError::MissingField {
            check: check.into(),
            field,
        }
    }

    /// Creates a new UnknownDependency error
    pub fn unknown_dependency(check: impl Into<String>, dependency: impl Into<String>) -> Self {
        ConfigError::UnknownDependency {
            check: check.into(),
            dependency: dependency.into(),
        }
    }
}

impl ProbeError {
    /// Creates a new Spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        ProbeError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(command: impl Into<String>, seconds: u64) -> Self {
        ProbeError::Timeout {
            command: command.into(),
            seconds,
        }
    }
}
