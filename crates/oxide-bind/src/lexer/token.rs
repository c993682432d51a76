//! Token types for the statement tokenizer.

use super::Span;

/// Reserved words that are never column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Statement heads
    Select,
    Insert,
    Into,
    Update,
    Delete,

    // Clause openers
    From,
    Where,
    Values,
    Set,
    Limit,
    Offset,
    Order,
    Group,
    By,
    Having,
    Join,
    Inner,
    Left,
    Right,
    Outer,
    Cross,
    On,
    Using,
    Returning,
    Union,
    Distinct,
    As,
    Asc,
    Desc,

    // Logic
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Is,
    Null,
    True,
    False,
    Exists,

    // Conditional expressions
    Case,
    When,
    Then,
    Else,
    End,
}

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Self; 45] = [
        Self::Select,
        Self::Insert,
        Self::Into,
        Self::Update,
        Self::Delete,
        Self::From,
        Self::Where,
        Self::Values,
        Self::Set,
        Self::Limit,
        Self::Offset,
        Self::Order,
        Self::Group,
        Self::By,
        Self::Having,
        Self::Join,
        Self::Inner,
        Self::Left,
        Self::Right,
        Self::Outer,
        Self::Cross,
        Self::On,
        Self::Using,
        Self::Returning,
        Self::Union,
        Self::Distinct,
        Self::As,
        Self::Asc,
        Self::Desc,
        Self::And,
        Self::Or,
        Self::Not,
        Self::In,
        Self::Between,
        Self::Like,
        Self::Is,
        Self::Null,
        Self::True,
        Self::False,
        Self::Exists,
        Self::Case,
        Self::When,
        Self::Then,
        Self::Else,
        Self::End,
    ];

    /// Attempts to parse a keyword from a word (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(s))
    }

    /// Returns the keyword as an uppercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Values => "VALUES",
            Self::Set => "SET",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Order => "ORDER",
            Self::Group => "GROUP",
            Self::By => "BY",
            Self::Having => "HAVING",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Returning => "RETURNING",
            Self::Union => "UNION",
            Self::Distinct => "DISTINCT",
            Self::As => "AS",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Exists => "EXISTS",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
        }
    }

    /// Returns true if the keyword starts a new clause.
    ///
    /// Backward column resolution never looks past one of these.
    #[must_use]
    pub const fn opens_clause(&self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::From
                | Self::Where
                | Self::Values
                | Self::Set
                | Self::Limit
                | Self::Offset
                | Self::Order
                | Self::Group
                | Self::Having
                | Self::On
                | Self::Using
                | Self::Returning
                | Self::Union
                | Self::When
                | Self::Then
                | Self::Else
        )
    }
}

/// Kind of a string-like literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// `'...'` or `"..."`
    Quoted,
    /// 42, 3.5, 1e10
    Number,
}

/// Clause separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// ,
    Comma,
    /// ;
    Semicolon,
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare name (e.g., `firstname`)
    Identifier,
    /// Backtick-quoted name (e.g., `` `first name` ``)
    QuotedIdentifier,
    /// Reserved word
    Keyword(Keyword),
    /// Comparison, arithmetic, member access and any other symbol
    Operator,
    /// Quoted text or number
    Literal(LiteralKind),
    /// ?
    Marker,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// , or ;
    Separator(Separator),
}

/// A token borrowed from the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The raw text, delimiters included.
    pub text: &'a str,
    /// The location in the statement text.
    pub span: Span,
}

impl<'a> Token<'a> {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Returns true if this is a bind marker.
    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self.kind, TokenKind::Marker)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Returns the column name this token spells, if it names one.
    ///
    /// Bare identifiers are uppercased; backtick-quoted ones lose their
    /// delimiters and doubled backticks before uppercasing.
    #[must_use]
    pub fn column_name(&self) -> Option<String> {
        match self.kind {
            TokenKind::Identifier => Some(self.text.to_uppercase()),
            TokenKind::QuotedIdentifier => {
                let inner = &self.text[1..self.text.len() - 1];
                Some(inner.replace("``", "`").to_uppercase())
            }
            _ => None,
        }
    }
}
