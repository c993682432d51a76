#![allow(dead_code)]

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use oxide_bind::{BindParser, BoundParameter, ParseError};

/// Upper bound for any blocking step in a test, so a regression fails
/// instead of hanging the suite.
pub const WAIT: Duration = Duration::from_secs(5);

/// Long enough for a blocked thread to have returned if it were not blocked.
pub const SETTLE: Duration = Duration::from_millis(100);

pub fn parse(sql: &str) -> Vec<BoundParameter> {
    BindParser::new(sql)
        .parse()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    BindParser::new(sql)
        .parse()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn columns(sql: &str) -> Vec<String> {
    parse(sql).into_iter().map(|p| p.column).collect()
}

/// Byte offsets of the `?` characters outside quoted literals.
///
/// Deliberately independent of the crate's lexer.
pub fn marker_offsets(sql: &str) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut quote: Option<char> = None;
    let mut chars = sql.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match quote {
            Some(q) if c == q => {
                if chars.peek().is_some_and(|&(_, n)| n == q) {
                    chars.next();
                } else {
                    quote = None;
                }
            }
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '?' => offsets.push(i),
            None => {}
        }
    }
    offsets
}

/// Runs `f` on its own thread and returns its result, failing the test if it
/// does not finish within [`WAIT`].
pub fn within<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(WAIT)
        .unwrap_or_else(|_| panic!("operation did not finish within {WAIT:?}"))
}
