//! Bind marker resolution.
//!
//! One pass over the tokens keeps a stack of parenthesized groups. Each group
//! holds a clause window: the column candidates seen since the last clause
//! boundary, nearest last. A marker binds to the nearest candidate of the
//! innermost window and falls back outwards only through groups that have not
//! crossed a clause boundary of their own, such as function arguments and
//! `IN` lists. Row tuples (`VALUES` rows and row-value comparisons) map their
//! markers to columns by position.

use std::{iter, mem};

use tracing::{debug, trace};

use super::error::ParseError;
use super::param::BoundParameter;
use crate::lexer::{Keyword, Lexer, Separator, Span, Token, TokenKind, count_markers};

/// Resolves the bind markers of one statement text.
pub struct BindParser<'a> {
    input: &'a str,
}

impl<'a> BindParser<'a> {
    /// Creates a new parser for the given statement text.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Returns the number of bind markers without resolving them.
    #[must_use]
    pub fn count_arguments(&self) -> usize {
        count_markers(self.input)
    }

    /// Resolves every bind marker to its column, in marker order.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if a literal is unterminated, parentheses are
    /// unbalanced, or a marker has no resolvable column.
    pub fn parse(&self) -> Result<Vec<BoundParameter>, ParseError> {
        let tokens = Lexer::tokenize(self.input)?;
        let mut resolver = Resolver::default();
        for (i, token) in tokens.iter().enumerate() {
            resolver.accept(token, tokens.get(i + 1))?;
        }
        resolver.finish()
    }
}

#[derive(Debug)]
enum GroupKind {
    Root,
    Nested,
    /// Arguments of a function call.
    Call,
    /// `INSERT INTO t (a, b, ...)`
    ColumnList,
    /// `VALUES (?, ?, ...)` of an `INSERT`
    ValuesTuple,
    /// Right-hand side of a row-value comparison, `(a, b) = (?, ?)`.
    RowTuple(Vec<Option<String>>),
}

#[derive(Debug)]
struct Group {
    kind: GroupKind,
    /// Column candidates since the last clause boundary, nearest last.
    window: Vec<String>,
    /// First candidate seen anywhere inside the group.
    first_column: Option<String>,
    /// First candidate of each comma-separated item.
    items: Vec<Option<String>>,
    /// Index of the current comma-separated item.
    item: usize,
    /// A `BETWEEN` is waiting for its `AND`.
    between_pending: bool,
    /// A clause boundary was crossed inside this group; markers no longer
    /// look past it.
    bounded: bool,
    /// Items of a just-closed multi-item group, e.g. the `(a, b)` of a
    /// row-value comparison.
    tuple: Option<Vec<Option<String>>>,
    open: Span,
}

impl Group {
    const fn new(kind: GroupKind, open: Span) -> Self {
        Self {
            kind,
            window: Vec::new(),
            first_column: None,
            items: Vec::new(),
            item: 0,
            between_pending: false,
            bounded: false,
            tuple: None,
            open,
        }
    }

    fn clear_window(&mut self) {
        self.window.clear();
        self.between_pending = false;
        self.tuple = None;
    }

    fn boundary(&mut self) {
        self.clear_window();
        self.bounded = true;
    }

    fn push_candidate(&mut self, column: String) {
        if self.first_column.is_none() {
            self.first_column = Some(column.clone());
        }
        if self.items.len() <= self.item {
            self.items.resize(self.item + 1, None);
        }
        if let Some(slot) = self.items.get_mut(self.item) {
            if slot.is_none() {
                *slot = Some(column.clone());
            }
        }
        self.tuple = None;
        self.window.push(column);
    }

    fn next_item(&mut self) {
        self.item += 1;
        self.clear_window();
    }

    /// Columns matched by position, for `VALUES` rows and row tuples.
    fn positional_columns<'a>(
        &'a self,
        insert_columns: Option<&'a [Option<String>]>,
    ) -> Option<&'a [Option<String>]> {
        if self.bounded {
            return None;
        }
        match &self.kind {
            GroupKind::ValuesTuple => Some(insert_columns.unwrap_or_default()),
            GroupKind::RowTuple(columns) => Some(columns.as_slice()),
            _ => None,
        }
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new(GroupKind::Root, Span::default())
    }
}

/// What the current top-level statement has shown so far.
#[derive(Debug, Default)]
struct Shape {
    insert: bool,
    clause_seen: bool,
    in_values: bool,
    columns: Option<Vec<Option<String>>>,
}

#[derive(Debug, Default)]
struct Resolver {
    root: Group,
    nested: Vec<Group>,
    shape: Shape,
    /// The previous token named a function.
    call_pending: bool,
    params: Vec<BoundParameter>,
}

impl Resolver {
    fn current(&mut self) -> &mut Group {
        self.nested.last_mut().unwrap_or(&mut self.root)
    }

    fn accept(&mut self, token: &Token<'_>, next: Option<&Token<'_>>) -> Result<(), ParseError> {
        match token.kind {
            TokenKind::Identifier | TokenKind::QuotedIdentifier => {
                // function names are never columns
                if next.is_some_and(|t| t.kind == TokenKind::LeftParen) {
                    self.call_pending = true;
                    return Ok(());
                }
                if let Some(column) = token.column_name() {
                    self.current().push_candidate(column);
                }
            }
            TokenKind::Keyword(keyword) => self.keyword(keyword),
            TokenKind::Marker => self.marker(token.span)?,
            TokenKind::LeftParen => self.open(token.span),
            TokenKind::RightParen => self.close(token.span)?,
            TokenKind::Separator(Separator::Comma) => self.current().next_item(),
            TokenKind::Separator(Separator::Semicolon) => self.end_statement(),
            TokenKind::Operator | TokenKind::Literal(_) => {}
        }
        Ok(())
    }

    fn keyword(&mut self, keyword: Keyword) {
        let at_root = self.nested.is_empty();
        match keyword {
            Keyword::And => {
                let group = self.current();
                if group.between_pending {
                    group.between_pending = false;
                } else {
                    group.boundary();
                }
            }
            Keyword::Or => self.current().boundary(),
            Keyword::Between => self.current().between_pending = true,
            Keyword::Insert if at_root => self.shape.insert = true,
            keyword if keyword.opens_clause() => {
                self.current().boundary();
                if at_root && self.shape.insert {
                    self.shape.clause_seen = true;
                    self.shape.in_values = keyword == Keyword::Values;
                }
            }
            _ => {}
        }
    }

    fn open(&mut self, span: Span) {
        let call = mem::take(&mut self.call_pending);
        let kind = if self.nested.is_empty() && self.shape.insert && self.shape.in_values {
            GroupKind::ValuesTuple
        } else if self.nested.is_empty()
            && self.shape.insert
            && !self.shape.clause_seen
            && self.shape.columns.is_none()
        {
            GroupKind::ColumnList
        } else if call {
            GroupKind::Call
        } else {
            let parent = self.current();
            match (&parent.kind, parent.tuple.take()) {
                // each row of `((?, ?), (?, ?))` maps like the outer tuple
                (GroupKind::RowTuple(columns), _) => GroupKind::RowTuple(columns.clone()),
                (_, Some(columns)) => GroupKind::RowTuple(columns),
                _ => GroupKind::Nested,
            }
        };
        self.nested.push(Group::new(kind, span));
    }

    fn close(&mut self, span: Span) -> Result<(), ParseError> {
        let Some(group) = self.nested.pop() else {
            return Err(ParseError::UnbalancedParenthesis { span });
        };

        let Group {
            kind,
            first_column,
            mut items,
            item,
            ..
        } = group;
        items.resize(item + 1, None);
        if let GroupKind::ColumnList = kind {
            self.shape.columns = Some(items.clone());
        }

        let parent = self.current();
        parent.window.clear();
        if let Some(column) = first_column {
            parent.push_candidate(column);
        }
        if item > 0 && !matches!(kind, GroupKind::Call) {
            parent.tuple = Some(items);
        }
        Ok(())
    }

    fn end_statement(&mut self) {
        if self.nested.is_empty() {
            self.shape = Shape::default();
        }
        self.current().boundary();
    }

    fn resolve(&self) -> Option<String> {
        let insert_columns = self.shape.columns.as_deref();
        for group in self.nested.iter().rev().chain(iter::once(&self.root)) {
            if let Some(columns) = group.positional_columns(insert_columns) {
                return columns.get(group.item).cloned().flatten();
            }
            if let Some(column) = group.window.last() {
                return Some(column.clone());
            }
            if group.bounded {
                return None;
            }
        }
        None
    }

    fn marker(&mut self, span: Span) -> Result<(), ParseError> {
        let ordinal = self.params.len();
        let column = self
            .resolve()
            .ok_or(ParseError::UnresolvedMarker { ordinal, span })?;
        trace!(ordinal, column = %column, "resolved bind marker");
        self.params.push(BoundParameter::new(ordinal, column, span));
        Ok(())
    }

    fn finish(self) -> Result<Vec<BoundParameter>, ParseError> {
        if let Some(unclosed) = self.nested.last() {
            return Err(ParseError::UnbalancedParenthesis {
                span: unclosed.open,
            });
        }
        debug!(markers = self.params.len(), "resolved bind parameters");
        Ok(self.params)
    }
}
