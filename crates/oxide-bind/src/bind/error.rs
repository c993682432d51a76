//! Bind parser error types.

use crate::lexer::{LexError, Span};

/// Errors returned while resolving the bind markers of a statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// `parse()` was called before any expression was set.
    #[error("No expression has been set")]
    NoExpression,

    /// A quoted literal runs to the end of the statement.
    #[error("Unterminated literal starting at position {}", .span.start)]
    UnterminatedLiteral {
        /// From the opening delimiter to the end of the statement.
        span: Span,
    },

    /// No column could be found for a bind marker.
    #[error("Cannot resolve a column for bind marker #{ordinal} at position {}", .span.start)]
    UnresolvedMarker {
        /// Zero-based position of the marker among all markers.
        ordinal: usize,
        /// Location of the marker.
        span: Span,
    },

    /// A `)` without a matching `(`, or a `(` that is never closed.
    #[error("Unbalanced parenthesis at position {}", .span.start)]
    UnbalancedParenthesis {
        /// Location of the offending parenthesis.
        span: Span,
    },
}

impl ParseError {
    /// Returns true for the error raised when no expression was ever set.
    ///
    /// Every other variant describes a malformed expression.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(self, Self::NoExpression)
    }

    /// Returns the location of the error, if it has one.
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self {
            Self::NoExpression => None,
            Self::UnterminatedLiteral { span }
            | Self::UnresolvedMarker { span, .. }
            | Self::UnbalancedParenthesis { span } => Some(*span),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        match err {
            LexError::UnterminatedLiteral { span } => Self::UnterminatedLiteral { span },
        }
    }
}
