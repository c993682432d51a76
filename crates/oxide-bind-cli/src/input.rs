//! Where statements come from: arguments, a file, or stdin.

use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::error::{CliError, Result};

/// Collects the statements a command should inspect.
///
/// Arguments win over `file`, and `file` wins over `stdin`. File and stdin
/// input hold one statement per line; blank lines are skipped.
///
/// # Errors
///
/// Returns [`CliError::ReadFile`] when `file` cannot be read and
/// [`CliError::Io`] when stdin fails.
pub fn read_statements(
    sql: Vec<String>,
    file: Option<&Path>,
    stdin: impl BufRead,
) -> Result<Vec<String>> {
    if !sql.is_empty() {
        return Ok(sql);
    }

    if let Some(path) = file {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let statements = split_lines(content.lines().map(str::to_owned));
        debug!(
            "Read {} statement(s) from {}",
            statements.len(),
            path.display()
        );
        return Ok(statements);
    }

    let lines = stdin.lines().collect::<std::io::Result<Vec<_>>>()?;
    Ok(split_lines(lines))
}

fn split_lines(lines: impl IntoIterator<Item = String>) -> Vec<String> {
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect()
}
