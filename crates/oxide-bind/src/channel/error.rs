//! Result channel error types.

use std::fmt;

/// Why a channel operation did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The channel was cancelled (and, for takes, holds no more rows).
    #[error("Result channel was cancelled")]
    Cancelled,

    /// A bounded wait expired first.
    #[error("Timed out waiting on result channel")]
    TimedOut,
}

/// A rejected `put`, handing the row back to the caller.
pub struct PutError<T> {
    row: T,
    kind: ChannelError,
}

impl<T> PutError<T> {
    pub(crate) const fn new(row: T, kind: ChannelError) -> Self {
        Self { row, kind }
    }

    /// Returns why the row was rejected.
    #[must_use]
    pub const fn kind(&self) -> ChannelError {
        self.kind
    }

    /// Returns the rejected row.
    #[must_use]
    pub const fn row(&self) -> &T {
        &self.row
    }

    /// Takes back ownership of the rejected row.
    #[must_use]
    pub fn into_row(self) -> T {
        self.row
    }
}

impl<T> fmt::Debug for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PutError")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for PutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row rejected: {}", self.kind)
    }
}

impl<T> std::error::Error for PutError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<T> From<PutError<T>> for ChannelError {
    fn from(err: PutError<T>) -> Self {
        err.kind
    }
}
