//! Resolved bind parameters.

use std::fmt;

use crate::lexer::Span;

/// A bind marker together with the column it binds to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundParameter {
    /// Zero-based position among the markers of the statement.
    pub ordinal: usize,
    /// Uppercased column name.
    pub column: String,
    /// Location of the marker in the statement text.
    pub span: Span,
}

impl BoundParameter {
    /// Creates a new bound parameter.
    #[must_use]
    pub fn new(ordinal: usize, column: impl Into<String>, span: Span) -> Self {
        Self {
            ordinal,
            column: column.into(),
            span,
        }
    }
}

impl fmt::Display for BoundParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.ordinal, self.column)
    }
}
