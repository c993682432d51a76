//! Tokenizer error types.

use super::Span;

/// Errors raised while scanning statement text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A quoted literal or quoted identifier runs to the end of the input.
    #[error("Unterminated literal starting at position {}", .span.start)]
    UnterminatedLiteral {
        /// From the opening delimiter to the end of input.
        span: Span,
    },
}

impl LexError {
    /// Returns the location of the error.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::UnterminatedLiteral { span } => *span,
        }
    }
}
