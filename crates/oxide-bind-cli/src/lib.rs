//! Developer tool for the `oxide-bind` library.
//!
//! `oxide-bind` shows how statements resolve their bind markers and lets you
//! watch rows flow through a result channel.
//!
//! # CLI Usage
//!
//! ```bash
//! # Resolve the markers of a statement
//! oxide-bind parse "update user set firstname=?,lastname=? where ssn=?;"
//!
//! # Same, as JSON, for every line of a file
//! oxide-bind parse --file statements.sql --json
//!
//! # Count markers without resolving them
//! oxide-bind count "select * from t where a = '?' and b = ?"
//!
//! # Stream stdin through a channel of capacity 8, stopping after 100 rows
//! seq 1 1000000 | oxide-bind stream --capacity 8 --limit 100
//! ```

pub mod error;
pub mod input;
pub mod pump;
pub mod report;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oxide_bind::channel::DEFAULT_CHANNEL_CAPACITY;
use tracing::{info, warn};

pub use error::{CliError, Result};
use report::StatementReport;

/// Inspect bind markers and stream rows through a result channel.
#[derive(Debug, Parser)]
#[command(name = "oxide-bind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve the column bound to each marker.
    Parse {
        /// Statements to resolve (stdin if neither these nor --file are given).
        sql: Vec<String>,

        /// Read statements from a file, one per line.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Count markers outside literals and comments.
    Count {
        /// Statements to count (stdin if neither these nor --file are given).
        sql: Vec<String>,

        /// Read statements from a file, one per line.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Pump stdin lines through a result channel and print them.
    Stream {
        /// Channel capacity (0 for unbounded).
        #[arg(short, long, env = "OXIDE_BIND_CAPACITY")]
        #[arg(default_value_t = DEFAULT_CHANNEL_CAPACITY)]
        capacity: usize,

        /// Cancel the channel after this many rows.
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Runs a parsed command line against the given stdin and stdout.
///
/// # Errors
///
/// Returns [`CliError::InvalidStatements`] when `parse` could not resolve
/// every statement (after reporting all of them), and IO or serialization
/// errors otherwise.
pub fn run<R>(cli: Cli, stdin: R, out: &mut impl Write) -> Result<()>
where
    R: BufRead + Send + 'static,
{
    match cli.command {
        Commands::Parse { sql, file, json } => {
            let statements = input::read_statements(sql, file.as_deref(), stdin)?;
            let reports: Vec<StatementReport> = statements
                .into_iter()
                .map(StatementReport::resolve)
                .collect();

            if json {
                report::write_json(out, &reports)?;
            } else {
                report::write_text(out, &reports)?;
            }

            let failed = reports.iter().filter(|r| r.is_err()).count();
            if failed > 0 {
                warn!("{failed} of {} statement(s) failed to resolve", reports.len());
                return Err(CliError::InvalidStatements(failed));
            }
        }

        Commands::Count { sql, file } => {
            let statements = input::read_statements(sql, file.as_deref(), stdin)?;
            report::write_counts(out, &statements)?;
        }

        Commands::Stream { capacity, limit } => {
            let summary = pump::pump(stdin, out, capacity, limit)?;
            if limit.is_some_and(|limit| summary.consumed >= limit) {
                info!("Limit reached; channel cancelled.");
            }
        }
    }

    out.flush()?;
    Ok(())
}
