//! JSON output formatter for machine processing
//!
//! Writes one pretty-printed document with totals and, unless quiet, every
//! package run with its repository outcomes. Per-manifest details are only
//! included in verbose mode.

use crate::domain::{PackageRun, RunReport};
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn packages(&self, report: &RunReport) -> Vec<PackageRun> {
        match self.verbosity {
            Verbosity::Quiet => Vec::new(),
            Verbosity::Verbose => report.packages.clone(),
            Verbosity::Normal => report
                .packages
                .iter()
                .cloned()
                .map(|mut run| {
                    for repository in &mut run.repositories {
                        repository.manifests.clear();
                    }
                    run
                })
                .collect(),
        }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput {
    summary: JsonSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    packages: Vec<PackageRun>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    pull_requests_created: usize,
    existing_branches_updated: usize,
    skipped: usize,
    failed: usize,
    /// Package runs that stopped before processing repositories
    failed_package_runs: usize,
    success: bool,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            summary: JsonSummary {
                pull_requests_created: report.total_created(),
                existing_branches_updated: report.total_pushed(),
                skipped: report.packages.iter().map(|p| p.skipped_count()).sum(),
                failed: report.total_failed(),
                failed_package_runs: report.packages.iter().filter(|p| p.error.is_some()).count(),
                success: !report.has_failures(),
            },
            packages: self.packages(report),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
