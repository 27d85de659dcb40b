//! Wipeout CLI - Command-line utility for secure multi-pass file
//! destruction.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use commands::Outcome;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    let result = match &cli.command {
        cli::Commands::Shred(args) => {
            commands::shred::execute(args, &*formatter, cli.json, cli.quiet)
        }
        cli::Commands::Plan(args) => commands::plan::execute(args, &*formatter),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(Outcome::Success)
        }
    };

    match result {
        Ok(outcome) => ExitCode::from(outcome.code()),
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::from(Outcome::Incomplete.code())
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the flags.
fn setup_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "wipeout_core=debug,wipeout=debug"
    } else if quiet {
        "off"
    } else {
        "error"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
