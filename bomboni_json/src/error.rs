use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// A 1-based line/column position in the original input.
///
/// Line is `1 + ` the number of newlines seen before the position; column is
/// the number of characters since the last newline, plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub fn of(input: &[u8], offset: usize) -> Self {
        let mut line = 1;
        let mut last_newline = None;
        for (i, &b) in input.iter().enumerate().take(offset) {
            if b == b'\n' {
                line += 1;
                last_newline = Some(i);
            }
        }
        let column = match last_newline {
            Some(i) => offset - i,
            None => offset + 1,
        };
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{}", self.line, self.column)
    }
}

/// A fatal JSON syntax or grammar violation. Aborts the current decode or
/// encode call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonError {
    #[error("({position}): unexpected character `{found}`, expected {expected}")]
    UnexpectedByte {
        position: Position,
        found: String,
        expected: &'static str,
    },
    #[error("({position}): unexpected end of input, expected {expected}")]
    UnexpectedEof {
        position: Position,
        expected: &'static str,
    },
    #[error("({position}): invalid escape sequence")]
    InvalidEscape { position: Position },
    #[error("({position}): lone UTF-16 surrogate in `\\u` escape")]
    LoneSurrogate { position: Position },
    #[error("({position}): control character in string literal")]
    ControlCharacterInString { position: Position },
    #[error("({position}): unterminated string literal")]
    UnterminatedString { position: Position },
    #[error("({position}): invalid number literal")]
    InvalidNumber { position: Position },
    #[error("({position}): expected `:` after object key")]
    ExpectedColon { position: Position },
    #[error("({position}): trailing data after top-level value")]
    TrailingData { position: Position },
    #[error("number `{text}` does not fit in {bits}-bit {signed_label}")]
    NumberOutOfRange {
        text: String,
        bits: u8,
        signed_label: &'static str,
    },
    #[error("number `{text}` is not an integer")]
    NumberNotInteger { text: String },
    #[error("indent string may only contain spaces and tabs")]
    InvalidIndent,
    #[error("writer call `{call}` is not valid after `{after}`")]
    InvalidWriteState { call: &'static str, after: &'static str },
    #[error("cannot write non-finite float {value} as a JSON number literal")]
    NonFiniteFloat { value: f64 },
}

/// A violation that does not abort the traversal; accumulated and surfaced
/// only if the call otherwise succeeds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NonFatalJsonError {
    #[error("({position}): invalid UTF-8 in string literal")]
    InvalidUtf8 { position: Position },
}
