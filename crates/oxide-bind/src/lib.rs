//! # oxide-bind
//!
//! Bind-marker resolution and streaming result channels for parameterized
//! statements.
//!
//! This crate provides:
//! - A tokenizer that hides quoted literals and comments from later stages
//! - A bound expression parser that recovers the column each `?` marker binds
//!   to, in marker order
//! - A bounded, cancellable result channel with per-consumer cursors
//! - A seam for the external statement executor that streams rows through
//!   the channel
//!
//! ## Resolving bind markers
//!
//! ```rust
//! use oxide_bind::Statement;
//!
//! let statement =
//!     Statement::from("select * from table where a = ? and UPPER(b) = ? and d = '?'");
//!
//! assert_eq!(statement.count_arguments(), 2);
//! assert_eq!(statement.column_names().unwrap(), vec!["A", "B"]);
//! ```
//!
//! ## Streaming rows
//!
//! ```rust
//! use oxide_bind::executor::{
//!     BoundValue, ExecuteError, QueryStream, Row, RowSink, StatementExecutor,
//! };
//! use oxide_bind::Statement;
//!
//! struct Echo;
//!
//! impl StatementExecutor for Echo {
//!     fn execute(
//!         &mut self,
//!         _sql: &str,
//!         params: &[BoundValue],
//!         sink: &RowSink,
//!     ) -> Result<(), ExecuteError> {
//!         for param in params {
//!             sink.push(Row::new(vec![param.value.clone()]))?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let statement = Statement::from("select * from user where ssn = ? or id = ?");
//! let stream = QueryStream::spawn(Echo, &statement, [1_i64, 2], 1).unwrap();
//! let rows: Vec<Row> = stream.collect();
//! assert_eq!(rows.len(), 2);
//! ```

pub mod bind;
pub mod channel;
pub mod executor;
pub mod lexer;

pub use bind::{BindParser, BoundParameter, ParseError, Statement};
pub use channel::{CancelHandle, ChannelError, Cursor, ResultChannel};
pub use executor::{QueryStream, Row, SqlValue, StatementExecutor};
pub use lexer::{Lexer, Token, TokenKind};
