//! Prints the x264 API build number, revision and commit hash of a source tree.

mod cli;
mod commands;
mod config;
mod error;
mod fmt;
mod header;
mod resolver;
mod vcs;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries only the version string
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = commands::handle_command(&cli) {
        std::process::exit(commands::report_failure(&e, &mut std::io::stdout()));
    }
}
