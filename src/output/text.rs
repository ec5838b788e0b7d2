//! Text output formatter for human-readable display
//!
//! Prints an unambiguous `Success` / `Failure` line, then one indented block
//! per failed check so several failures stay readable.

use crate::domain::{ReportEntry, RunReport};
use crate::output::{ReportFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn format_status(&self, success: bool, writer: &mut dyn Write) -> std::io::Result<()> {
        match (success, self.color) {
            (true, true) => writeln!(writer, "{}", "Success".green().bold()),
            (false, true) => writeln!(writer, "{}", "Failure".red().bold()),
            (true, false) => writeln!(writer, "Success"),
            (false, false) => writeln!(writer, "Failure"),
        }
    }

    /// Format the detail block of one failed check
    fn format_failure(&self, entry: &ReportEntry, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.color {
            writeln!(
                writer,
                "  {} {}",
                entry.name.bold(),
                format!("({})", entry.require).dimmed()
            )?;
        } else {
            writeln!(writer, "  {} ({})", entry.name, entry.require)?;
        }

        if let Some(ref failure) = entry.result.failure {
            for line in failure.lines() {
                writeln!(writer, "    {}", line)?;
            }
        }
        if let Some(ref found) = entry.result.found_version {
            writeln!(writer, "    Found version: {}", found)?;
        }
        match (&entry.suggestion_text, &entry.suggestion) {
            (Some(text), Some(suggestion)) => writeln!(writer, "    {}: {}", text, suggestion)?,
            (Some(text), None) => writeln!(writer, "    {}", text)?,
            (None, Some(suggestion)) => writeln!(writer, "    Suggestion: {}", suggestion)?,
            (None, None) => {}
        }
        Ok(())
    }

    fn format_tally(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let failed = report.failures().count();
        let line = format!(
            "{} {}, {} failed",
            report.len(),
            if report.len() == 1 { "check" } else { "checks" },
            failed
        );
        if self.color {
            writeln!(writer, "{}", line.dimmed())
        } else {
            writeln!(writer, "{}", line)
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        self.format_status(report.is_success(), writer)?;
        for entry in report.failures() {
            self.format_failure(entry, writer)?;
        }
        if self.verbosity == Verbosity::Verbose {
            self.format_tally(report, writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CheckFields, CheckNode, CheckResult, Version};

    fn entry(name: &str, result: CheckResult) -> ReportEntry {
        let fields = CheckFields {
            require: Some(">=5".to_string()),
            get_version: Some("true".to_string()),
            suggestion_text: Some("Install it with".to_string()),
            suggestion: Some(format!("apt install {}", name)),
            ..Default::default()
        };
        ReportEntry::new(&CheckNode::from_fields(name, &fields).unwrap(), result)
    }

    fn render(formatter: &TextFormatter, report: &RunReport) -> String {
        let mut out = Vec::new();
        formatter.format(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_success_only_status_line() {
        let report = RunReport::new(vec![entry("awk", CheckResult::passed())]);
        let text = render(&TextFormatter::with_color(Verbosity::Normal, false), &report);
        assert_eq!(text, "Success\n");
    }

    #[test]
    fn test_failure_details_indented_per_check() {
        let old = Version::new(vec![4, 0, 0], None).unwrap();
        let report = RunReport::new(vec![
            entry("awk", CheckResult::too_old(old)),
            entry("make", CheckResult::passed()),
            entry("sed", CheckResult::failed_dependency("awk")),
        ]);
        let text = render(&TextFormatter::with_color(Verbosity::Normal, false), &report);
        assert_eq!(
            text,
            "Failure\n\
             \x20 awk (>=5)\n\
             \x20   Too old.\n\
             \x20   Found version: 4.0.0\n\
             \x20   Install it with: apt install awk\n\
             \x20 sed (>=5)\n\
             \x20   Failed dependency: awk\n\
             \x20   Install it with: apt install sed\n"
        );
    }

    #[test]
    fn test_multiline_failure_indented() {
        let report = RunReport::new(vec![entry("cc", CheckResult::failed("line one\nline two"))]);
        let text = render(&TextFormatter::with_color(Verbosity::Normal, false), &report);
        assert!(text.contains("    line one\n    line two\n"));
    }

    #[test]
    fn test_verbose_tally() {
        let report = RunReport::new(vec![
            entry("awk", CheckResult::passed()),
            entry("sed", CheckResult::failed("gone")),
        ]);
        let text = render(&TextFormatter::with_color(Verbosity::Verbose, false), &report);
        assert!(text.ends_with("2 checks, 1 failed\n"));
    }

    #[test]
    fn test_color_output_contains_status() {
        let report = RunReport::new(vec![entry("awk", CheckResult::failed("gone"))]);
        let text = render(&TextFormatter::new(Verbosity::Normal), &report);
        assert!(text.contains("Failure"));
        assert!(text.contains("awk"));
    }
}
