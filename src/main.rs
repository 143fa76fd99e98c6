//! orgbump - bump a dependency across every dependent repository of an organization

use anyhow::Context;
use clap::Parser;
use orgbump::cli::CliArgs;
use orgbump::config::RunConfig;
use orgbump::orchestrator::Orchestrator;
use orgbump::output::{create_formatter, OutputConfig};
use orgbump::telemetry::{default_level, init_tracing};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.log_json, default_level(args.verbose));

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = RunConfig::from_cli(&args)?;

    if args.verbose {
        eprintln!("orgbump v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Repository: {}", config.full_name());
    }

    let show_progress = !args.quiet && !args.verbose;
    let orchestrator = Orchestrator::new(config)
        .context("failed to create GitHub client")?
        .with_progress(show_progress);
    let report = orchestrator.run().await;

    let output = OutputConfig::from_cli(args.json, args.verbose, args.quiet)
        .with_color(io::stdout().is_terminal());
    let formatter = create_formatter(output);
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if report.has_failures() {
        // Partial success - some repositories or package runs failed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
