//! Bound expression parser
//!
//! Recovers, for every `?` marker of a statement, the column it binds to.
//! Callers bind typed values strictly by position, so the resolved list is
//! always in the physical order of the markers.

mod error;
mod param;
mod parser;
mod statement;

pub use error::ParseError;
pub use param::BoundParameter;
pub use parser::BindParser;
pub use statement::Statement;
