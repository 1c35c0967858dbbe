//! gomod-outdated - report outdated dependencies of a Go module
//!
//! Clones the given git repository, reads its go.mod and lists the
//! dependencies for which `go list` reports a newer version.

use clap::Parser;
use colored::Colorize;
use gomod_outdated::cli::{CliArgs, USAGE};
use gomod_outdated::orchestrator::Orchestrator;
use gomod_outdated::output::{create_formatter, OutputConfig};
use gomod_outdated::platform::Platform;
use gomod_outdated::process::SystemProcessRunner;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Handle missing repository URL
    let Some(url) = args.url.clone() else {
        println!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    // Disable colors globally if requested
    if args.no_color {
        colored::control::set_override(false);
    }
    init_logging(&args);

    match run(&args, &url) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Set up logging on stderr; `RUST_LOG` overrides the verbosity flag
fn init_logging(args: &CliArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Main application logic
fn run(args: &CliArgs, url: &str) -> anyhow::Result<()> {
    let platform = Platform::current();
    tracing::debug!(
        platform = platform.display_name(),
        version = env!("CARGO_PKG_VERSION"),
        "starting"
    );

    // Colors only when writing to a terminal
    let color = !args.no_color && io::stdout().is_terminal();
    let formatter = create_formatter(OutputConfig::from_cli(args.json, color));

    // Run the workflow
    let orchestrator = Orchestrator::new(platform, args.tool_paths(), SystemProcessRunner::new());
    let mut stdout = io::stdout().lock();
    orchestrator.run(url, formatter.as_ref(), &mut stdout)?;
    Ok(())
}
