//! oxide-bind CLI
//!
//! Command-line tool for inspecting bind markers and result channels.

use std::io::{self, BufReader};

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use oxide_bind_cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let stdin = BufReader::new(io::stdin());
    let stdout = io::stdout();
    run(cli, stdin, &mut stdout.lock())?;

    Ok(())
}
