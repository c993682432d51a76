//! Running a statement into a result channel.

use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::bind::Statement;
use crate::channel::{ChannelError, Cursor, ResultChannel};

use super::bind::{BindError, BoundValue, bind_values};
use super::value::{Row, ToSqlValue};

/// Errors raised while executing a statement.
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    /// The values could not be bound.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The result channel stopped accepting rows.
    #[error("Result channel closed: {0}")]
    Channel(#[from] ChannelError),

    /// The backing store reported an error.
    #[error("Driver error: {0}")]
    Driver(String),

    /// The producer thread could not be started.
    #[error("Failed to spawn producer thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The producer thread panicked.
    #[error("Producer thread panicked")]
    ProducerPanicked,
}

/// The write end handed to a [`StatementExecutor`].
#[derive(Debug, Clone)]
pub struct RowSink {
    channel: ResultChannel<Row>,
}

impl RowSink {
    /// Creates a sink feeding `channel`.
    #[must_use]
    pub const fn new(channel: ResultChannel<Row>) -> Self {
        Self { channel }
    }

    /// Pushes one row, blocking while the consumer is behind.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Cancelled` once the consumer has abandoned the
    /// statement; the executor should stop producing.
    pub fn push(&self, row: Row) -> Result<(), ChannelError> {
        self.channel.put(row).map_err(ChannelError::from)
    }

    /// Returns true once the consumer has abandoned the statement.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.channel.is_cancelled()
    }

    /// Marks the end of the result set.
    fn close(&self) {
        self.channel.cancel();
    }
}

/// Executes bound statements against a backing store.
///
/// Implementations wrap the actual driver call. They push every produced row
/// into `sink` in order and return once the result set is exhausted.
pub trait StatementExecutor: Send + 'static {
    /// Executes `sql` with `params` bound positionally.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteError::Driver` on store failures and
    /// `ExecuteError::Channel` when `sink` rejects a row.
    fn execute(
        &mut self,
        sql: &str,
        params: &[BoundValue],
        sink: &RowSink,
    ) -> Result<(), ExecuteError>;
}

/// A statement streaming its rows from a producer thread.
///
/// The stream is an iterator over the rows. When it yields `None` the result
/// set has ended, normally or not; call [`QueryStream::finish`] to learn the
/// producer's outcome. Dropping the stream cancels the channel, so an
/// abandoned statement never leaves its producer blocked.
pub struct QueryStream {
    cursor: Cursor<Row>,
    producer: Option<JoinHandle<Result<(), ExecuteError>>>,
}

impl QueryStream {
    /// Binds `values` to `statement` and starts `executor` on a new thread.
    ///
    /// `capacity` bounds the rows buffered between the producer and the
    /// consumer; 0 means unbounded.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteError::Bind` if the values do not fit the statement and
    /// `ExecuteError::Spawn` if the thread cannot be created.
    pub fn spawn<E, I>(
        mut executor: E,
        statement: &Statement,
        values: I,
        capacity: usize,
    ) -> Result<Self, ExecuteError>
    where
        E: StatementExecutor,
        I: IntoIterator,
        I::Item: ToSqlValue,
    {
        let params = bind_values(statement, values)?;
        let sql = statement.expression().unwrap_or_default().to_owned();
        let channel = ResultChannel::bounded(capacity);
        let sink = RowSink::new(channel.clone());

        let producer = thread::Builder::new()
            .name(String::from("oxide-bind-producer"))
            .spawn(move || {
                debug!(params = params.len(), "executing statement");
                let result = executor.execute(&sql, &params, &sink);
                match &result {
                    Ok(()) => debug!("statement exhausted"),
                    Err(err) => warn!(error = %err, "statement execution stopped"),
                }
                sink.close();
                result
            })?;

        Ok(Self {
            cursor: channel.cursor(),
            producer: Some(producer),
        })
    }

    /// Abandons the statement. Rows already queued stay readable.
    pub fn cancel(&self) {
        self.cursor.channel().cancel();
    }

    /// Returns the number of rows waiting to be read.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.cursor.channel().size() + usize::from(self.cursor.is_buffered())
    }

    /// Stops the producer if it is still running and returns its outcome.
    ///
    /// Unread rows are discarded. An executor stopped early this way reports
    /// `ExecuteError::Channel(ChannelError::Cancelled)`.
    ///
    /// # Errors
    ///
    /// Returns the executor's error, or `ExecuteError::ProducerPanicked`.
    pub fn finish(mut self) -> Result<(), ExecuteError> {
        self.cancel();
        match self.producer.take() {
            Some(handle) => handle.join().map_err(|_| ExecuteError::ProducerPanicked)?,
            None => Ok(()),
        }
    }
}

impl Iterator for QueryStream {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.cursor.next()
    }
}

impl Drop for QueryStream {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for QueryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStream")
            .field("cursor", &self.cursor)
            .field("running", &self.producer.as_ref().is_some_and(|h| !h.is_finished()))
            .finish()
    }
}
