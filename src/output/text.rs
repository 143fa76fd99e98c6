//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One block per source package with a line per repository
//! - Per-manifest details in verbose mode
//! - A closing summary with totals

use crate::domain::{ManifestStatus, Outcome, PackageRun, RepositoryOutcome, RunReport};
use crate::output::{OutputFormatter, Verbosity};
use colored::{Color, Colorize};
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn outcome_marker(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::PullRequestCreated { .. } => self.paint("✓", Color::Green),
            Outcome::PushedToExistingBranch { .. } => self.paint("↻", Color::Cyan),
            Outcome::Skipped { .. } => self.dimmed("-"),
            Outcome::Failed { .. } => self.paint("✗", Color::Red),
        }
    }

    fn manifest_label(status: &ManifestStatus) -> String {
        match status {
            ManifestStatus::Updated { classification } => format!("updated ({})", classification),
            ManifestStatus::NotManifest => "ignored, not a package.json".to_string(),
            ManifestStatus::NotDeclared => "dependency not declared".to_string(),
            ManifestStatus::Unreadable { message } => format!("unreadable: {}", message),
            ManifestStatus::InstallFailed {
                classification,
                message,
            } => format!("install failed ({}): {}", classification, message),
        }
    }

    fn format_package_header(
        &self,
        run: &PackageRun,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let title = match (&run.dependency, &run.version) {
            (Some(name), Some(version)) => format!("{}@{}", name, version),
            _ => run.source_path.clone(),
        };
        writeln!(
            writer,
            "{} {}",
            self.bold(&title),
            self.dimmed(&format!("(from {})", display_source(&run.source_path)))
        )
    }

    fn format_repository(
        &self,
        repository: &RepositoryOutcome,
        name_width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let name = format!("{:width$}", repository.repository, width = name_width);
        let detail = repository.outcome.to_string();
        let detail = match repository.outcome {
            Outcome::Failed { .. } => self.paint(&detail, Color::Red),
            Outcome::Skipped { .. } => self.dimmed(&detail),
            _ => detail,
        };
        writeln!(
            writer,
            "  {} {} {}",
            self.outcome_marker(&repository.outcome),
            name,
            detail
        )?;

        if self.verbosity == Verbosity::Verbose {
            if let Some(kind) = repository.package_manager {
                writeln!(writer, "      {}", self.dimmed(&format!("package manager: {}", kind)))?;
            }
            for manifest in &repository.manifests {
                writeln!(
                    writer,
                    "      {} {}",
                    manifest.path,
                    self.dimmed(&Self::manifest_label(&manifest.status))
                )?;
            }
        }
        Ok(())
    }

    fn format_package(&self, run: &PackageRun, writer: &mut dyn Write) -> std::io::Result<()> {
        self.format_package_header(run, writer)?;

        if let Some(error) = &run.error {
            writeln!(
                writer,
                "  {} {}",
                self.paint("✗", Color::Red),
                self.paint(&format!("failed: {}", error), Color::Red)
            )?;
        } else if run.is_noop() {
            writeln!(
                writer,
                "  {}",
                self.dimmed("No dependents found, nothing to bump.")
            )?;
        }

        let name_width = run
            .repositories
            .iter()
            .map(|r| r.repository.len())
            .max()
            .unwrap_or(0)
            .max(16);
        for repository in &run.repositories {
            self.format_repository(repository, name_width, writer)?;
        }

        writeln!(writer)
    }

    fn format_summary(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let skipped: usize = report.packages.iter().map(|p| p.skipped_count()).sum();
        let failed_packages = report.packages.iter().filter(|p| p.error.is_some()).count();

        let created = report.total_created();
        let pushed = report.total_pushed();
        let failed = report.total_failed();

        write!(
            writer,
            "{} {} {}, {} {}, {} skipped, {} failed",
            self.bold("Summary:"),
            self.paint(&created.to_string(), Color::Green),
            if created == 1 {
                "pull request created"
            } else {
                "pull requests created"
            },
            self.paint(&pushed.to_string(), Color::Cyan),
            if pushed == 1 {
                "existing branch updated"
            } else {
                "existing branches updated"
            },
            skipped,
            if failed > 0 {
                self.paint(&failed.to_string(), Color::Red)
            } else {
                failed.to_string()
            }
        )?;
        if failed_packages > 0 {
            write!(
                writer,
                ", {}",
                self.paint(
                    &format!("{} package run(s) aborted", failed_packages),
                    Color::Red
                )
            )?;
        }
        writeln!(writer)
    }
}

fn display_source(source_path: &str) -> &str {
    if source_path.is_empty() {
        "./"
    } else {
        source_path
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for run in &report.packages {
                self.format_package(run, writer)?;
            }
        }
        self.format_summary(report, writer)
    }
}
