//! Statement executor seam
//!
//! The driver call that runs a statement lives outside this crate behind the
//! [`StatementExecutor`] trait. This module binds values to resolved markers
//! and wires an executor to a [`ResultChannel`](crate::channel::ResultChannel)
//! so callers can stream rows without materializing the result set.

mod bind;
mod stream;
mod value;

pub use bind::{BindError, BoundValue, bind_values};
pub use stream::{ExecuteError, QueryStream, RowSink, StatementExecutor};
pub use value::{Row, SqlValue, ToSqlValue};
