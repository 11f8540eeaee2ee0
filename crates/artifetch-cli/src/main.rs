//! Artifetch CLI - fetch a PR-builder artifact archive and unpack it locally.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    init_tracing(cli.verbose);

    let formatter = output::create_formatter(cli.json, cli.verbose > 0, cli.quiet);

    match &cli.command {
        cli::Commands::Pull(args) => commands::pull::execute(args, &*formatter, cli.quiet),
        cli::Commands::Extract(args) => commands::extract::execute(args, &*formatter, cli.quiet),
        cli::Commands::List(args) => commands::list::execute(args, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays clean for paths and JSON.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
