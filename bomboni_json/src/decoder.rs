use crate::error::{JsonError, NonFatalJsonError, Position};
use crate::token::{Kind, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

/// A strict, grammar-checking JSON tokenizer over an in-memory buffer.
///
/// [`Decoder::peek`] never advances state; [`Decoder::read`] consumes
/// exactly one token, validating that it is grammatical at the current
/// position (see the state table in the Protobuf/JSON codec design notes).
/// Commas are consumed internally and never surface as tokens.
pub struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
    stack: Vec<Frame>,
    last: Option<Kind>,
    peeked: Option<Token>,
    non_fatal: Vec<NonFatalJsonError>,
}

impl<'a> Decoder<'a> {
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
            stack: Vec::new(),
            last: None,
            peeked: None,
            non_fatal: Vec::new(),
        }
    }

    /// Returns the kind of the next token without consuming it. Idempotent
    /// until the next [`Decoder::read`].
    pub fn peek(&mut self) -> Result<Kind, JsonError> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lex_next()?);
        }
        Ok(self.peeked.as_ref().expect("just populated").kind)
    }

    /// Reads and consumes the next token. After EOF, keeps returning EOF.
    pub fn read(&mut self) -> Result<Token, JsonError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lex_next()?,
        };
        self.advance(&token);
        Ok(token)
    }

    /// Drains the non-fatal errors (invalid UTF-8 in strings) accumulated so
    /// far.
    pub fn take_non_fatal(&mut self) -> Vec<NonFatalJsonError> {
        std::mem::take(&mut self.non_fatal)
    }

    /// Recursively skips exactly one JSON value, used to discard an unknown
    /// field's value without interpreting it.
    pub fn skip_value(&mut self) -> Result<(), JsonError> {
        let token = self.read()?;
        match token.kind {
            Kind::StartObject => loop {
                if self.peek()? == Kind::EndObject {
                    self.read()?;
                    break;
                }
                self.read()?; // name
                self.skip_value()?;
            },
            Kind::StartArray => loop {
                if self.peek()? == Kind::EndArray {
                    self.read()?;
                    break;
                }
                self.skip_value()?;
            },
            _ => {}
        }
        Ok(())
    }

    fn advance(&mut self, token: &Token) {
        match token.kind {
            Kind::StartObject => self.stack.push(Frame::Object),
            Kind::StartArray => self.stack.push(Frame::Array),
            Kind::EndObject | Kind::EndArray => {
                self.stack.pop();
            }
            _ => {}
        }
        self.last = Some(token.kind);
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.col,
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if (b & 0xC0) != 0x80 {
            self.col += 1;
        }
        Some(b)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek_byte(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.bump();
        }
    }

    fn describe_byte(b: u8) -> String {
        if b.is_ascii_graphic() || b == b' ' {
            (b as char).to_string()
        } else {
            format!("0x{b:02x}")
        }
    }

    fn unexpected(&self, b: u8, expected: &'static str) -> JsonError {
        JsonError::UnexpectedByte {
            position: self.position(),
            found: Self::describe_byte(b),
            expected,
        }
    }

    fn unexpected_or_eof(&self, expected: &'static str) -> JsonError {
        match self.peek_byte() {
            Some(b) => self.unexpected(b, expected),
            None => JsonError::UnexpectedEof {
                position: self.position(),
                expected,
            },
        }
    }

    fn lex_next(&mut self) -> Result<Token, JsonError> {
        if self.stack.is_empty() {
            match self.last {
                None => {
                    self.skip_ws();
                    if self.pos >= self.input.len() {
                        return Ok(self.make_token(Kind::Eof, self.pos, self.pos, self.position(), false, String::new()));
                    }
                    self.lex_value()
                }
                Some(_) => {
                    self.skip_ws();
                    if self.pos >= self.input.len() {
                        Ok(self.make_token(Kind::Eof, self.pos, self.pos, self.position(), false, String::new()))
                    } else {
                        Err(JsonError::TrailingData {
                            position: self.position(),
                        })
                    }
                }
            }
        } else {
            match self.stack[self.stack.len() - 1] {
                Frame::Object => self.lex_in_object(),
                Frame::Array => self.lex_in_array(),
            }
        }
    }

    fn lex_in_object(&mut self) -> Result<Token, JsonError> {
        match self.last {
            Some(Kind::StartObject) => {
                self.skip_ws();
                if self.peek_byte() == Some(b'}') {
                    self.lex_single_byte(Kind::EndObject)
                } else {
                    self.lex_name()
                }
            }
            Some(Kind::Name) => {
                self.skip_ws();
                self.lex_value()
            }
            _ => {
                self.skip_ws();
                match self.peek_byte() {
                    Some(b',') => {
                        self.bump();
                        self.skip_ws();
                        self.lex_name()
                    }
                    Some(b'}') => self.lex_single_byte(Kind::EndObject),
                    _ => Err(self.unexpected_or_eof("`,` or `}`")),
                }
            }
        }
    }

    fn lex_in_array(&mut self) -> Result<Token, JsonError> {
        match self.last {
            Some(Kind::StartArray) => {
                self.skip_ws();
                if self.peek_byte() == Some(b']') {
                    self.lex_single_byte(Kind::EndArray)
                } else {
                    self.lex_value()
                }
            }
            _ => {
                self.skip_ws();
                match self.peek_byte() {
                    Some(b',') => {
                        self.bump();
                        self.skip_ws();
                        self.lex_value()
                    }
                    Some(b']') => self.lex_single_byte(Kind::EndArray),
                    _ => Err(self.unexpected_or_eof("`,` or `]`")),
                }
            }
        }
    }

    fn lex_single_byte(&mut self, kind: Kind) -> Result<Token, JsonError> {
        let start = self.pos;
        let position = self.position();
        self.bump();
        Ok(self.make_token(kind, start, self.pos, position, false, String::new()))
    }

    fn lex_name(&mut self) -> Result<Token, JsonError> {
        let start = self.pos;
        let position = self.position();
        if self.peek_byte() != Some(b'"') {
            return Err(self.unexpected_or_eof("an object key"));
        }
        let content = self.lex_string_content()?;
        let end = self.pos;
        self.skip_ws();
        match self.peek_byte() {
            Some(b':') => {
                self.bump();
            }
            _ => return Err(self.unexpected_or_eof("`:`")),
        }
        Ok(self.make_token(Kind::Name, start, end, position, false, content))
    }

    fn lex_value(&mut self) -> Result<Token, JsonError> {
        let start = self.pos;
        let position = self.position();
        match self.peek_byte() {
            Some(b'"') => {
                let content = self.lex_string_content()?;
                Ok(self.make_token(Kind::String, start, self.pos, position, false, content))
            }
            Some(b'{') => self.lex_single_byte(Kind::StartObject),
            Some(b'[') => self.lex_single_byte(Kind::StartArray),
            Some(b't') => {
                self.expect_literal("true")?;
                Ok(self.make_token(Kind::Bool, start, self.pos, position, true, String::new()))
            }
            Some(b'f') => {
                self.expect_literal("false")?;
                Ok(self.make_token(Kind::Bool, start, self.pos, position, false, String::new()))
            }
            Some(b'n') => {
                self.expect_literal("null")?;
                Ok(self.make_token(Kind::Null, start, self.pos, position, false, String::new()))
            }
            Some(b'-' | b'0'..=b'9') => self.lex_number(),
            _ => Err(self.unexpected_or_eof("a value")),
        }
    }

    fn expect_literal(&mut self, literal: &'static str) -> Result<(), JsonError> {
        for expected in literal.bytes() {
            let position = self.position();
            match self.bump() {
                Some(b) if b == expected => {}
                Some(b) => {
                    return Err(JsonError::UnexpectedByte {
                        position,
                        found: Self::describe_byte(b),
                        expected: "a value",
                    })
                }
                None => {
                    return Err(JsonError::UnexpectedEof {
                        position,
                        expected: "a value",
                    })
                }
            }
        }
        Ok(())
    }

    fn lex_number(&mut self) -> Result<Token, JsonError> {
        let start = self.pos;
        let position = self.position();
        if self.peek_byte() == Some(b'-') {
            self.bump();
        }
        match self.peek_byte() {
            Some(b'0') => {
                self.bump();
            }
            Some(b'1'..=b'9') => {
                while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                    self.bump();
                }
            }
            _ => return Err(self.unexpected_or_eof("a digit")),
        }
        if self.peek_byte() == Some(b'.') {
            self.bump();
            if !matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                return Err(self.unexpected_or_eof("a digit"));
            }
            while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            self.bump();
            if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                self.bump();
            }
            if !matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                return Err(self.unexpected_or_eof("a digit"));
            }
            while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                self.bump();
            }
        }
        let text = std::str::from_utf8(&self.input[start..self.pos])
            .expect("number grammar only matches ASCII bytes")
            .to_string();
        Ok(self.make_token(Kind::Number, start, self.pos, position, false, text))
    }

    fn lex_string_content(&mut self) -> Result<String, JsonError> {
        let open_position = self.position();
        self.bump(); // opening quote
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let char_position = self.position();
            match self.bump() {
                None => {
                    return Err(JsonError::UnterminatedString {
                        position: open_position,
                    })
                }
                Some(b'"') => break,
                Some(b'\\') => self.lex_escape(&mut buf, char_position)?,
                Some(b) if b < 0x20 => {
                    return Err(JsonError::ControlCharacterInString {
                        position: char_position,
                    })
                }
                Some(b) => buf.push(b),
            }
        }
        match String::from_utf8(buf) {
            Ok(s) => Ok(s),
            Err(err) => {
                self.non_fatal.push(NonFatalJsonError::InvalidUtf8 {
                    position: open_position,
                });
                Ok(String::from_utf8_lossy(&err.into_bytes()).into_owned())
            }
        }
    }

    fn lex_escape(&mut self, buf: &mut Vec<u8>, position: Position) -> Result<(), JsonError> {
        match self.bump() {
            Some(b'"') => buf.push(b'"'),
            Some(b'\\') => buf.push(b'\\'),
            Some(b'/') => buf.push(b'/'),
            Some(b'b') => buf.push(0x08),
            Some(b'f') => buf.push(0x0C),
            Some(b'n') => buf.push(b'\n'),
            Some(b'r') => buf.push(b'\r'),
            Some(b't') => buf.push(b'\t'),
            Some(b'u') => {
                let high = self.lex_hex4(position)?;
                let code_point = if (0xD800..=0xDBFF).contains(&high) {
                    if self.bump() != Some(b'\\') || self.bump() != Some(b'u') {
                        return Err(JsonError::LoneSurrogate { position });
                    }
                    let low = self.lex_hex4(position)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(JsonError::LoneSurrogate { position });
                    }
                    0x10000 + (high - 0xD800) * 0x400 + (low - 0xDC00)
                } else if (0xDC00..=0xDFFF).contains(&high) {
                    return Err(JsonError::LoneSurrogate { position });
                } else {
                    high
                };
                let c = char::from_u32(code_point)
                    .ok_or(JsonError::InvalidEscape { position })?;
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
            }
            Some(_) => return Err(JsonError::InvalidEscape { position }),
            None => {
                return Err(JsonError::UnexpectedEof {
                    position,
                    expected: "an escape sequence",
                })
            }
        }
        Ok(())
    }

    fn lex_hex4(&mut self, position: Position) -> Result<u32, JsonError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let b = self.bump().ok_or(JsonError::UnexpectedEof {
                position,
                expected: "4 hex digits",
            })?;
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => return Err(JsonError::InvalidEscape { position }),
            };
            value = value * 16 + u32::from(digit);
        }
        Ok(value)
    }

    fn make_token(
        &self,
        kind: Kind,
        start: usize,
        end: usize,
        position: Position,
        bool_value: bool,
        text: String,
    ) -> Token {
        Token {
            kind,
            start,
            end,
            position,
            bool_value,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Kind> {
        let mut decoder = Decoder::new(input.as_bytes());
        let mut out = Vec::new();
        loop {
            let token = decoder.read().unwrap();
            let kind = token.kind;
            out.push(kind);
            if kind == Kind::Eof {
                break;
            }
        }
        out
    }

    #[test]
    fn flat_object() {
        let ks = kinds(r#"{"a":1,"b":"x"}"#);
        assert_eq!(
            ks,
            vec![
                Kind::StartObject,
                Kind::Name,
                Kind::Number,
                Kind::Name,
                Kind::String,
                Kind::EndObject,
                Kind::Eof,
            ]
        );
    }

    #[test]
    fn nested_array() {
        let ks = kinds(r#"[1,[2,3],null,true,false]"#);
        assert_eq!(
            ks,
            vec![
                Kind::StartArray,
                Kind::Number,
                Kind::StartArray,
                Kind::Number,
                Kind::Number,
                Kind::EndArray,
                Kind::Null,
                Kind::Bool,
                Kind::Bool,
                Kind::EndArray,
                Kind::Eof,
            ]
        );
    }

    #[test]
    fn trailing_data_errors() {
        let mut decoder = Decoder::new(b"1 2");
        decoder.read().unwrap();
        assert!(matches!(
            decoder.read(),
            Err(JsonError::TrailingData { .. })
        ));
    }

    #[test]
    fn peek_is_idempotent() {
        let mut decoder = Decoder::new(b"[1]");
        assert_eq!(decoder.peek().unwrap(), Kind::StartArray);
        assert_eq!(decoder.peek().unwrap(), Kind::StartArray);
        assert_eq!(decoder.read().unwrap().kind(), Kind::StartArray);
    }

    #[test]
    fn string_becomes_name_before_colon() {
        let mut decoder = Decoder::new(br#"{"key": "value"}"#);
        assert_eq!(decoder.read().unwrap().kind(), Kind::StartObject);
        let name = decoder.read().unwrap();
        assert_eq!(name.kind(), Kind::Name);
        assert_eq!(name.as_str(), "key");
    }

    #[test]
    fn surrogate_pair() {
        let mut decoder = Decoder::new("\"😀\"".as_bytes());
        let token = decoder.read().unwrap();
        assert_eq!(token.as_str(), "\u{1F600}");
    }

    #[test]
    fn lone_surrogate_errors() {
        let mut decoder = Decoder::new(br#""\uD800""#);
        assert!(matches!(decoder.read(), Err(JsonError::LoneSurrogate { .. })));
    }

    #[test]
    fn control_char_in_string_errors() {
        let mut decoder = Decoder::new(b"\"a\x01b\"");
        assert!(matches!(
            decoder.read(),
            Err(JsonError::ControlCharacterInString { .. })
        ));
    }

    #[test]
    fn leading_zero_errors() {
        let mut decoder = Decoder::new(b"01");
        assert!(decoder.read().is_err());
    }

    #[test]
    fn positions_are_line_and_column() {
        let mut decoder = Decoder::new(b"{\n  \"a\": tru }");
        decoder.read().unwrap(); // StartObject
        decoder.read().unwrap(); // Name
        let err = decoder.read().unwrap_err();
        match err {
            JsonError::UnexpectedByte { position, .. } => {
                assert_eq!(position.line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn skip_value_skips_nested_structure() {
        let mut decoder = Decoder::new(br#"{"a": {"b": [1,2,3]}, "c": 1}"#);
        decoder.read().unwrap(); // StartObject
        decoder.read().unwrap(); // Name "a"
        decoder.skip_value().unwrap();
        let next = decoder.read().unwrap();
        assert_eq!(next.kind(), Kind::Name);
        assert_eq!(next.as_str(), "c");
    }
}
