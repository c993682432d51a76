//! Rendering of resolved statements.

use std::io::Write;

use oxide_bind::{BoundParameter, Statement};
use serde::Serialize;

use crate::error::Result;

/// Outcome of resolving one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementReport {
    /// Statement text as given.
    pub sql: String,
    /// Number of markers outside literals and comments.
    pub count: usize,
    /// Resolved parameters, empty when resolution failed.
    pub parameters: Vec<ParameterReport>,
    /// Resolution error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One resolved marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterReport {
    pub ordinal: usize,
    pub column: String,
    /// Byte offset of the marker.
    pub offset: usize,
}

impl From<&BoundParameter> for ParameterReport {
    fn from(parameter: &BoundParameter) -> Self {
        Self {
            ordinal: parameter.ordinal,
            column: parameter.column.clone(),
            offset: parameter.span.start,
        }
    }
}

impl StatementReport {
    /// Resolves `sql` and records the outcome.
    #[must_use]
    pub fn resolve(sql: impl Into<String>) -> Self {
        let statement = Statement::with_expression(sql);
        let count = statement.count_arguments();
        let (parameters, error) = match statement.parse() {
            Ok(bound) => (bound.iter().map(ParameterReport::from).collect(), None),
            Err(err) => (Vec::new(), Some(err.to_string())),
        };
        Self {
            sql: statement.expression().unwrap_or_default().to_owned(),
            count,
            parameters,
            error,
        }
    }

    /// Whether resolution failed.
    #[must_use]
    pub const fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

/// Writes reports as indented text, one block per statement.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_text(out: &mut impl Write, reports: &[StatementReport]) -> Result<()> {
    for report in reports {
        writeln!(out, "{}", report.sql)?;
        if let Some(error) = &report.error {
            writeln!(out, "  error: {error}")?;
            continue;
        }
        if report.parameters.is_empty() {
            writeln!(out, "  (no parameters)")?;
        }
        for parameter in &report.parameters {
            writeln!(
                out,
                "  {}: {} (offset {})",
                parameter.ordinal, parameter.column, parameter.offset
            )?;
        }
    }
    Ok(())
}

/// Writes reports as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(out: &mut impl Write, reports: &[StatementReport]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, reports)?;
    writeln!(out)?;
    Ok(())
}

/// Writes `count<TAB>sql` lines.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_counts(out: &mut impl Write, statements: &[String]) -> Result<()> {
    for sql in statements {
        writeln!(out, "{}\t{sql}", oxide_bind::lexer::count_markers(sql))?;
    }
    Ok(())
}
