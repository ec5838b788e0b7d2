//! depcheck - verify installed tools against version requirements

use clap::Parser;
use depcheck::cli::CliArgs;
use depcheck::config::load_config;
use depcheck::engine::Engine;
use depcheck::output::{create_formatter, OutputConfig};
use depcheck::probe::{ProbeRunner, ShellProbe};
use depcheck::progress::Progress;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// `--debug` forces debug level; otherwise `RUST_LOG` applies, defaulting to warnings.
/// Logs go to stderr so the report on stdout stays clean.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("depcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("depcheck=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.debug);

    tracing::debug!("depcheck starting with args: {:?}", args);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.no_color);
    if !output_config.color {
        colored::control::set_override(false);
    }

    // Configuration errors abort before any probe runs
    let fields = load_config(&args.config)?;
    let mut runner = ShellProbe::new();
    if let Some(timeout) = args.timeout {
        runner = runner.with_timeout(timeout);
    }
    let runner: Arc<dyn ProbeRunner> = Arc::new(runner);

    let engine = Engine::from_fields(&fields, runner)?;

    let mut progress = Progress::new(output_config.shows_progress());
    progress.spinner("Checking dependencies...");
    let progress = Arc::new(progress);
    let engine = Arc::new(engine.with_progress(Arc::clone(&progress)));

    let result = if args.only.is_empty() {
        engine.run_all().await.map_err(anyhow::Error::from)
    } else {
        engine.run_selected(args.only.as_slice()).await.map_err(anyhow::Error::from)
    };
    progress.finish_and_clear();
    let report = result?;

    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
