//! Statement tokenizer
//!
//! A hand-written lexer that classifies statement text into identifiers,
//! keywords, literals, bind markers, parentheses, separators and operators.
//! Quoted literals and comments are opaque: nothing inside them is visible
//! to later stages.

mod error;
mod span;
mod token;
mod tokenizer;

pub use error::LexError;
pub use span::Span;
pub use token::{Keyword, LiteralKind, Separator, Token, TokenKind};
pub use tokenizer::{Lexer, count_markers};
