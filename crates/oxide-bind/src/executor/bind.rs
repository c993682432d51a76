//! Positional pairing of resolved parameters with values.

use crate::bind::{BoundParameter, ParseError, Statement};

use super::value::{SqlValue, ToSqlValue};

/// Errors raised while binding values to a statement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    /// The statement could not be resolved.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The number of values does not match the number of markers.
    #[error("Statement has {expected} bind markers but {found} values were supplied")]
    ArityMismatch {
        /// Number of markers in the statement.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },
}

/// A value paired with the marker it binds to.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundValue {
    /// The marker and its column.
    pub parameter: BoundParameter,
    /// The value sent for the marker.
    pub value: SqlValue,
}

/// Pairs each marker of `statement` with the value at the same position.
///
/// # Errors
///
/// Returns `BindError::Parse` if the statement does not resolve, and
/// `BindError::ArityMismatch` if the value count differs from the marker count.
pub fn bind_values<I>(statement: &Statement, values: I) -> Result<Vec<BoundValue>, BindError>
where
    I: IntoIterator,
    I::Item: ToSqlValue,
{
    let parameters = statement.parse()?;
    let values: Vec<SqlValue> = values.into_iter().map(ToSqlValue::to_sql_value).collect();
    if parameters.len() != values.len() {
        return Err(BindError::ArityMismatch {
            expected: parameters.len(),
            found: values.len(),
        });
    }
    Ok(parameters
        .iter()
        .cloned()
        .zip(values)
        .map(|(parameter, value)| BoundValue { parameter, value })
        .collect())
}
