//! CLI argument parsing module for depcheck

use crate::config::DEFAULT_CONFIG_FILE;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Parse a probe timeout in whole seconds
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", s))?;
    if secs == 0 {
        return Err("timeout must be at least 1 second".to_string());
    }
    Ok(Duration::from_secs(secs))
}

/// Verify installed tools against version requirements
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depcheck",
    version,
    about = "Verify installed tools against version requirements"
)]
pub struct CliArgs {
    /// Configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Check only these names and their prerequisites (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    /// Kill probe commands that run longer than this many seconds
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    // Output options
    /// Output the report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - final report only
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,
}
