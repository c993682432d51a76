//! Pull-ahead consumer view over a result channel.

use std::fmt;
use std::iter::FusedIterator;
use std::time::Duration;

use super::error::ChannelError;
use super::queue::ResultChannel;

/// A consumer of a [`ResultChannel`] with a one-row look-ahead slot.
///
/// Every consuming thread owns its own cursor, so look-ahead never leaks
/// between consumers. `has_next` reports clean end-of-data (`false`) once the
/// channel is cancelled and drained.
pub struct Cursor<T> {
    channel: ResultChannel<T>,
    lookahead: Option<T>,
}

impl<T> Cursor<T> {
    pub(crate) const fn new(channel: ResultChannel<T>) -> Self {
        Self {
            channel,
            lookahead: None,
        }
    }

    /// Returns true if a row is available, blocking until one arrives or the
    /// channel is cancelled.
    ///
    /// The row stays buffered in the cursor until the next call to `next`.
    pub fn has_next(&mut self) -> bool {
        if self.lookahead.is_none() {
            self.lookahead = self.channel.take().ok();
        }
        self.lookahead.is_some()
    }

    /// Like [`Cursor::has_next`], giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::TimedOut` if neither a row nor cancellation
    /// arrives in time.
    pub fn has_next_timeout(&mut self, timeout: Duration) -> Result<bool, ChannelError> {
        if self.lookahead.is_some() {
            return Ok(true);
        }
        match self.channel.take_timeout(timeout) {
            Ok(row) => {
                self.lookahead = Some(row);
                Ok(true)
            }
            Err(ChannelError::Cancelled) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Returns the buffered row, filling the slot first if it is empty.
    pub fn peek(&mut self) -> Option<&T> {
        if self.has_next() {
            self.lookahead.as_ref()
        } else {
            None
        }
    }

    /// Returns the next row or the cancellation signal.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Cancelled` when the channel is cancelled and
    /// nothing is buffered.
    pub fn next_row(&mut self) -> Result<T, ChannelError> {
        match self.lookahead.take() {
            Some(row) => Ok(row),
            None => self.channel.take(),
        }
    }

    /// Returns true if a row is sitting in the look-ahead slot.
    #[must_use]
    pub const fn is_buffered(&self) -> bool {
        self.lookahead.is_some()
    }

    /// Returns the channel this cursor reads from.
    #[must_use]
    pub const fn channel(&self) -> &ResultChannel<T> {
        &self.channel
    }
}

impl<T> Iterator for Cursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.has_next() {
            self.lookahead.take()
        } else {
            None
        }
    }
}

impl<T> FusedIterator for Cursor<T> {}

impl<T> fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("channel", &self.channel)
            .field("buffered", &self.is_buffered())
            .finish()
    }
}
