//! Statement tokenizer implementation.

use super::{Keyword, LexError, LiteralKind, Separator, Span, Token, TokenKind};

/// A lexer that splits statement text into tokens.
///
/// The lexer is an iterator of `Result<Token, LexError>`. It yields at most
/// one error and then stops.
pub struct Lexer<'a> {
    /// The statement text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// Set once an error has been yielded.
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            failed: false,
        }
    }

    /// Tokenizes the entire input.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` if a quoted literal is never closed.
    pub fn tokenize(input: &'a str) -> Result<Vec<Token<'a>>, LexError> {
        Self::new(input).collect()
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // -- ...
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // /* ... */, an unclosed comment swallows the rest of the input
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Creates a token spanning from start to the current position.
    fn make_token(&self, kind: TokenKind) -> Token<'a> {
        Token::new(kind, &self.input[self.start..self.pos], Span::new(self.start, self.pos))
    }

    fn unterminated(&mut self) -> LexError {
        self.failed = true;
        LexError::UnterminatedLiteral {
            span: Span::new(self.start, self.input.len()),
        }
    }

    /// Scans up to and including the closing `quote`.
    ///
    /// A doubled quote inside the span is an escaped quote, not a terminator.
    fn scan_quoted(&mut self, quote: char) -> Result<(), LexError> {
        loop {
            match self.advance() {
                Some(c) if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                    } else {
                        return Ok(());
                    }
                }
                Some(_) => {}
                None => return Err(self.unterminated()),
            }
        }
    }

    /// Scans an identifier or keyword.
    fn scan_word(&mut self) -> Token<'a> {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier),
        }
    }

    /// Scans an integer or decimal number.
    fn scan_number(&mut self) -> Token<'a> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let exponent_follows = match self.peek_next() {
                Some(c) if c.is_ascii_digit() => true,
                Some('+' | '-') => true,
                _ => false,
            };
            if exponent_follows {
                self.advance();
                if self.peek().is_some_and(|c| c == '+' || c == '-') {
                    self.advance();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }

        self.make_token(TokenKind::Literal(LiteralKind::Number))
    }

    /// Consumes `second` if it follows, for two-character operators.
    fn operator_pair(&mut self, seconds: &[char]) -> Token<'a> {
        if self.peek().is_some_and(|c| seconds.contains(&c)) {
            self.advance();
        }
        self.make_token(TokenKind::Operator)
    }

    /// Scans the next token.
    fn next_token(&mut self) -> Option<Result<Token<'a>, LexError>> {
        if self.failed {
            return None;
        }

        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let c = self.advance()?;

        let token = match c {
            '?' => self.make_token(TokenKind::Marker),
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Separator(Separator::Comma)),
            ';' => self.make_token(TokenKind::Separator(Separator::Semicolon)),

            '\'' | '"' => match self.scan_quoted(c) {
                Ok(()) => self.make_token(TokenKind::Literal(LiteralKind::Quoted)),
                Err(e) => return Some(Err(e)),
            },
            '`' => match self.scan_quoted('`') {
                Ok(()) => self.make_token(TokenKind::QuotedIdentifier),
                Err(e) => return Some(Err(e)),
            },

            '<' => self.operator_pair(&['=', '>', '<']),
            '>' => self.operator_pair(&['=', '>']),
            '!' => self.operator_pair(&['=']),
            '|' => self.operator_pair(&['|']),
            ':' => self.operator_pair(&[':']),

            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_word(),

            _ => self.make_token(TokenKind::Operator),
        };

        Some(Ok(token))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Counts the bind markers outside literals and comments.
///
/// When the text holds an unterminated literal, the markers before it are
/// counted.
#[must_use]
pub fn count_markers(input: &str) -> usize {
    Lexer::new(input)
        .map_while(Result::ok)
        .filter(Token::is_marker)
        .count()
}
