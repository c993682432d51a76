//! Cancellable streaming result channel
//!
//! A bounded FIFO that lets an executing statement push rows while one or
//! more consumers pull them lazily. Cancellation is a flag guarded by the
//! channel's own lock and re-checked by every blocking wait, so cancelling
//! releases all blocked producers and consumers without tracking who they
//! are.
//!
//! ```rust
//! use std::thread;
//! use oxide_bind::channel::ResultChannel;
//!
//! let channel = ResultChannel::bounded(1);
//! let producer = {
//!     let channel = channel.clone();
//!     thread::spawn(move || {
//!         for row in ["A", "B", "C"] {
//!             channel.put(row).unwrap();
//!         }
//!         // end of data
//!         channel.cancel();
//!     })
//! };
//!
//! let rows: Vec<_> = channel.cursor().collect();
//! producer.join().unwrap();
//! assert_eq!(rows, vec!["A", "B", "C"]);
//! ```

mod cursor;
mod error;
mod queue;

pub use cursor::Cursor;
pub use error::{ChannelError, PutError};
pub use queue::{CancelHandle, DEFAULT_CHANNEL_CAPACITY, ResultChannel};
