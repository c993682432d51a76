//! Statement text with a cached bind list.

use std::sync::OnceLock;

use super::error::ParseError;
use super::param::BoundParameter;
use super::parser::BindParser;
use crate::lexer::count_markers;

/// A statement expression and its lazily resolved bind parameters.
///
/// A fresh statement has no expression at all, which is different from an
/// empty one: parsing an unset statement is a usage error, parsing an empty
/// one yields no parameters.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    text: Option<String>,
    bindings: OnceLock<Vec<BoundParameter>>,
}

impl Statement {
    /// Creates a statement with no expression set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a statement with the given expression.
    #[must_use]
    pub fn with_expression(text: impl Into<String>) -> Self {
        let mut statement = Self::new();
        statement.set_expression(text);
        statement
    }

    /// Replaces the expression and drops any cached bind list.
    pub fn set_expression(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.bindings = OnceLock::new();
    }

    /// Returns the expression, or `None` if it was never set.
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Counts the bind markers without resolving them.
    ///
    /// Returns 0 when no expression is set.
    #[must_use]
    pub fn count_arguments(&self) -> usize {
        self.text.as_deref().map_or(0, count_markers)
    }

    /// Resolves the bind parameters, in marker order.
    ///
    /// The result is computed once per expression and cached.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::NoExpression` when no expression was ever set, or
    /// the parser's error when the expression is malformed.
    pub fn parse(&self) -> Result<&[BoundParameter], ParseError> {
        if let Some(bindings) = self.bindings.get() {
            return Ok(bindings);
        }
        let text = self.text.as_deref().ok_or(ParseError::NoExpression)?;
        let bindings = BindParser::new(text).parse()?;
        Ok(self.bindings.get_or_init(|| bindings))
    }

    /// Returns the resolved column names, in marker order.
    ///
    /// # Errors
    ///
    /// Same as [`Statement::parse`].
    pub fn column_names(&self) -> Result<Vec<&str>, ParseError> {
        Ok(self.parse()?.iter().map(|p| p.column.as_str()).collect())
    }
}

impl From<&str> for Statement {
    fn from(text: &str) -> Self {
        Self::with_expression(text)
    }
}

impl From<String> for Statement {
    fn from(text: String) -> Self {
        Self::with_expression(text)
    }
}
