//! Progress display while checks run
//!
//! Progress lines go to stdout; an indicatif spinner on stderr shows the
//! check currently being probed. Lines are printed above the spinner.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter shared by concurrently running checks
#[derive(Debug)]
pub struct Progress {
    /// Whether progress output is enabled (disabled in quiet and JSON modes)
    enabled: bool,
    /// Current spinner
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show a spinner with a message until `finish_and_clear`
    pub fn spinner(&mut self, message: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Update the spinner message
    pub fn set_message(&self, message: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(message.to_string());
        }
    }

    /// Print one progress line
    pub fn line(&self, message: &str) {
        if !self.enabled {
            return;
        }
        match self.bar {
            Some(ref bar) => bar.suspend(|| println!("{}", message)),
            None => println!("{}", message),
        }
    }

    /// Finish and clear the spinner
    pub fn finish_and_clear(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}
