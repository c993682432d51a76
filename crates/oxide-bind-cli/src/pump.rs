//! The `stream` command: stdin lines through a result channel.
//!
//! A reader thread puts each line into the channel and cancels it at end of
//! input. The calling thread drains a cursor and writes every row to `out`.
//! With a limit, the consumer cancels once it has written enough rows. The
//! reader may then be blocked on input that never comes, so it is left to
//! stop at its next `put` (or at process exit) instead of being joined.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use oxide_bind::{Cursor, ResultChannel};
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// How many lines each side of the channel handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpSummary {
    /// Lines read from the input so far.
    pub produced: usize,
    /// Rows written to the output.
    pub consumed: usize,
}

/// Pumps `input` lines through a channel of `capacity` into `out`.
///
/// A `capacity` of 0 makes the channel unbounded.
///
/// # Errors
///
/// Returns an error if writing `out` fails, or, when the input runs out, if
/// reading it failed or the reader thread panicked.
pub fn pump<R>(
    input: R,
    out: &mut impl Write,
    capacity: usize,
    limit: Option<usize>,
) -> Result<PumpSummary>
where
    R: BufRead + Send + 'static,
{
    let channel = ResultChannel::<String>::bounded(capacity);
    debug!("Streaming through a channel of capacity {:?}", channel.capacity());

    let produced = Arc::new(AtomicUsize::new(0));
    let reader = {
        let channel = channel.clone();
        let produced = Arc::clone(&produced);
        thread::Builder::new()
            .name(String::from("oxide-bind-reader"))
            .spawn(move || {
                let result = read_into(input, &channel, &produced);
                channel.cancel();
                result
            })?
    };

    let mut consumed = 0;
    let drained = drain(&mut channel.cursor(), out, limit, &mut consumed);
    // Also stops the reader when writing failed.
    channel.cancel();

    if drained? {
        reader.join().map_err(|_| CliError::ProducerPanicked)??;
    } else {
        debug!("Limit reached; not waiting for the reader");
    }

    let produced = produced.load(Ordering::SeqCst);
    info!("Streamed {consumed} of {produced} line(s)");
    Ok(PumpSummary { produced, consumed })
}

/// Writes rows until the channel runs dry or `limit` is reached.
///
/// Returns true when the channel ran dry.
fn drain(
    cursor: &mut Cursor<String>,
    out: &mut impl Write,
    limit: Option<usize>,
    consumed: &mut usize,
) -> Result<bool> {
    while limit.is_none_or(|limit| *consumed < limit) {
        let Ok(row) = cursor.next_row() else {
            return Ok(true);
        };
        writeln!(out, "{row}")?;
        *consumed += 1;
    }
    Ok(false)
}

fn read_into(
    input: impl BufRead,
    channel: &ResultChannel<String>,
    produced: &AtomicUsize,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let read = produced.fetch_add(1, Ordering::SeqCst);
        if channel.put(line).is_err() {
            debug!("Consumer stopped after {read} line(s)");
            break;
        }
    }
    Ok(())
}
