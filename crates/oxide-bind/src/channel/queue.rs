//! Bounded FIFO hand-off between row producers and consumers.

use std::collections::VecDeque;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::cursor::Cursor;
use super::error::{ChannelError, PutError};

/// Default capacity used when callers do not pick one.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug)]
struct State<T> {
    queue: VecDeque<T>,
    cancelled: bool,
}

#[derive(Debug)]
struct Shared<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    /// `None` means unbounded.
    capacity: Option<NonZeroUsize>,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("result channel mutex poisoned; recovering inner state");
                poisoned.into_inner()
            }
        }
    }

    fn mark_cancelled(&self) {
        let queued = {
            let mut state = self.lock();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
            state.queue.len()
        };
        self.not_empty.notify_all();
        self.not_full.notify_all();
        debug!(queued, "result channel cancelled");
    }

    fn cancelled(&self) -> bool {
        self.lock().cancelled
    }
}

/// Waits on `condvar`, optionally until `deadline`.
///
/// Returns the reacquired guard and whether the deadline has passed.
fn wait_on<'a, T>(
    condvar: &Condvar,
    guard: MutexGuard<'a, State<T>>,
    deadline: Option<Instant>,
) -> (MutexGuard<'a, State<T>>, bool) {
    let Some(deadline) = deadline else {
        let guard = condvar
            .wait(guard)
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        return (guard, false);
    };

    let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
        return (guard, true);
    };
    let (guard, result) = condvar
        .wait_timeout(guard, remaining)
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    (guard, result.timed_out())
}

/// A bounded, cancellable FIFO of rows.
///
/// Handles are cheap to clone and all point at the same queue, so any number
/// of producers and consumers can share one channel. Once cancelled, `put`
/// fails immediately; `take` still hands out rows that were already queued
/// and fails only when the queue is empty.
pub struct ResultChannel<T> {
    shared: Arc<Shared<T>>,
}

impl<T> ResultChannel<T> {
    /// Creates a channel holding at most `capacity` rows.
    ///
    /// A capacity of 0 creates an unbounded channel whose `put` never blocks.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity(NonZeroUsize::new(capacity))
    }

    /// Creates a channel whose `put` never blocks.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    fn with_capacity(capacity: Option<NonZeroUsize>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    queue: VecDeque::new(),
                    cancelled: false,
                }),
                not_empty: Condvar::new(),
                not_full: Condvar::new(),
                capacity,
            }),
        }
    }

    /// Returns the capacity, or `None` for an unbounded channel.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.shared.capacity.map(NonZeroUsize::get)
    }

    /// Enqueues a row, blocking while the channel is full.
    ///
    /// # Errors
    ///
    /// Returns the row inside a `PutError` with `ChannelError::Cancelled` if
    /// the channel is cancelled before or while waiting.
    pub fn put(&self, row: T) -> Result<(), PutError<T>> {
        self.put_until(row, None)
    }

    /// Like [`ResultChannel::put`], giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// As `put`, plus `ChannelError::TimedOut` when no room frees up in time.
    pub fn put_timeout(&self, row: T, timeout: Duration) -> Result<(), PutError<T>> {
        self.put_until(row, Some(Instant::now() + timeout))
    }

    fn put_until(&self, row: T, deadline: Option<Instant>) -> Result<(), PutError<T>> {
        let mut state = self.shared.lock();
        let mut expired = false;
        loop {
            if state.cancelled {
                return Err(PutError::new(row, ChannelError::Cancelled));
            }
            let has_room = self
                .shared
                .capacity
                .is_none_or(|capacity| state.queue.len() < capacity.get());
            if has_room {
                state.queue.push_back(row);
                drop(state);
                self.shared.not_empty.notify_one();
                return Ok(());
            }
            if expired {
                return Err(PutError::new(row, ChannelError::TimedOut));
            }
            (state, expired) = wait_on(&self.shared.not_full, state, deadline);
        }
    }

    /// Removes and returns the oldest row, blocking while the channel is empty.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Cancelled` once the channel is cancelled and
    /// no rows remain.
    pub fn take(&self) -> Result<T, ChannelError> {
        self.take_until(None)
    }

    /// Like [`ResultChannel::take`], giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// As `take`, plus `ChannelError::TimedOut` when no row arrives in time.
    pub fn take_timeout(&self, timeout: Duration) -> Result<T, ChannelError> {
        self.take_until(Some(Instant::now() + timeout))
    }

    fn take_until(&self, deadline: Option<Instant>) -> Result<T, ChannelError> {
        let mut state = self.shared.lock();
        let mut expired = false;
        loop {
            if let Some(row) = state.queue.pop_front() {
                drop(state);
                self.shared.not_full.notify_one();
                return Ok(row);
            }
            if state.cancelled {
                return Err(ChannelError::Cancelled);
            }
            if expired {
                return Err(ChannelError::TimedOut);
            }
            (state, expired) = wait_on(&self.shared.not_empty, state, deadline);
        }
    }

    /// Removes and returns the oldest row without blocking.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Cancelled` once the channel is cancelled and
    /// no rows remain.
    pub fn try_take(&self) -> Result<Option<T>, ChannelError> {
        let mut state = self.shared.lock();
        match state.queue.pop_front() {
            Some(row) => {
                drop(state);
                self.shared.not_full.notify_one();
                Ok(Some(row))
            }
            None if state.cancelled => Err(ChannelError::Cancelled),
            None => Ok(None),
        }
    }

    /// Cancels the channel and wakes every blocked `put` and `take`.
    ///
    /// Cancelling twice is a no-op.
    pub fn cancel(&self) {
        self.shared.mark_cancelled();
    }

    /// Returns true once the channel has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled()
    }

    /// Returns the number of queued rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Creates a consumer with its own one-row look-ahead.
    #[must_use]
    pub fn cursor(&self) -> Cursor<T> {
        Cursor::new(self.clone())
    }
}

impl<T: Send + 'static> ResultChannel<T> {
    /// Returns a type-erased handle that can only cancel this channel.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            target: Arc::clone(&self.shared) as Arc<dyn Cancel>,
        }
    }
}

impl<T> Clone for ResultChannel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for ResultChannel<T> {
    fn default() -> Self {
        Self::bounded(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl<T> fmt::Debug for ResultChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("ResultChannel")
            .field("capacity", &self.capacity())
            .field("size", &state.queue.len())
            .field("cancelled", &state.cancelled)
            .finish()
    }
}

trait Cancel: Send + Sync {
    fn cancel(&self);
    fn is_cancelled(&self) -> bool;
}

impl<T: Send> Cancel for Shared<T> {
    fn cancel(&self) {
        self.mark_cancelled();
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled()
    }
}

/// Cancels one channel from anywhere, without access to its rows.
#[derive(Clone)]
pub struct CancelHandle {
    target: Arc<dyn Cancel>,
}

impl CancelHandle {
    /// Cancels the channel. See [`ResultChannel::cancel`].
    pub fn cancel(&self) {
        self.target.cancel();
    }

    /// Returns true once the channel has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.target.is_cancelled()
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let channel = ResultChannel::bounded(4);
        for row in ["A", "B", "C"] {
            channel.put(row).unwrap();
        }
        assert_eq!(channel.size(), 3);
        assert_eq!(channel.take().unwrap(), "A");
        assert_eq!(channel.take().unwrap(), "B");
        assert_eq!(channel.take().unwrap(), "C");
        assert_eq!(channel.size(), 0);
    }

    #[test]
    fn test_zero_capacity_is_unbounded() {
        let channel = ResultChannel::bounded(0);
        assert_eq!(channel.capacity(), None);
        for i in 0..1000 {
            channel.put(i).unwrap();
        }
        assert_eq!(channel.size(), 1000);
    }

    #[test]
    fn test_put_timeout_when_full() {
        let channel = ResultChannel::bounded(1);
        channel.put(1).unwrap();
        let err = channel.put_timeout(2, Duration::from_millis(20)).unwrap_err();
        assert_eq!(err.kind(), ChannelError::TimedOut);
        assert_eq!(err.into_row(), 2);
        assert_eq!(channel.size(), 1);
    }

    #[test]
    fn test_take_timeout_when_empty() {
        let channel: ResultChannel<u8> = ResultChannel::bounded(1);
        assert_eq!(
            channel.take_timeout(Duration::from_millis(20)),
            Err(ChannelError::TimedOut)
        );
    }

    #[test]
    fn test_try_take() {
        let channel = ResultChannel::bounded(2);
        assert_eq!(channel.try_take(), Ok(None));
        channel.put('x').unwrap();
        assert_eq!(channel.try_take(), Ok(Some('x')));
        channel.cancel();
        assert_eq!(channel.try_take(), Err(ChannelError::Cancelled));
    }

    #[test]
    fn test_put_after_cancel_returns_row() {
        let channel = ResultChannel::bounded(2);
        channel.cancel();
        let err = channel.put(String::from("late")).unwrap_err();
        assert_eq!(err.kind(), ChannelError::Cancelled);
        assert_eq!(err.row(), "late");
        assert_eq!(channel.size(), 0);
    }

    #[test]
    fn test_queued_rows_survive_cancel() {
        let channel = ResultChannel::bounded(2);
        channel.put(1).unwrap();
        channel.put(2).unwrap();
        channel.cancel();
        assert_eq!(channel.take(), Ok(1));
        assert_eq!(channel.take(), Ok(2));
        assert_eq!(channel.take(), Err(ChannelError::Cancelled));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let channel: ResultChannel<()> = ResultChannel::default();
        assert!(!channel.is_cancelled());
        channel.cancel();
        channel.cancel();
        assert!(channel.is_cancelled());
    }

    #[test]
    fn test_cancel_handle() {
        let channel: ResultChannel<u32> = ResultChannel::bounded(1);
        let handle = channel.cancel_handle();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(channel.is_cancelled());
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_debug_does_not_need_debug_rows() {
        struct Opaque;
        let channel = ResultChannel::bounded(3);
        channel.put(Opaque).unwrap();
        let rendered = format!("{channel:?}");
        assert!(rendered.contains("size: 1"));
        assert!(rendered.contains("capacity: Some(3)"));
    }
}
