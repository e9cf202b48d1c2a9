use crate::error::{JsonError, Position};

/// The kind of a JSON token. `Name` is distinguished from `String` purely by
/// grammatical position: a string immediately followed by `:` inside an
/// object is a `Name`, never surfaced as a plain `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Name,
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Eof,
}

/// An immutable lexed token.
///
/// Numbers are never interpreted at lex time: [`Token::raw`] exposes the
/// exact matched bytes, and [`Token::as_int`], [`Token::as_uint`] and
/// [`Token::as_float`] each apply their own width-specific conversion,
/// possibly of the same token, with possibly different outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub(crate) kind: Kind,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) position: Position,
    pub(crate) bool_value: bool,
    pub(crate) text: String,
}

impl Token {
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Byte offsets `[start, end)` into the original input buffer.
    #[must_use]
    pub fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    /// Position of the start of this token in the original input.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The decoded boolean value. Only meaningful for `Kind::Bool`.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        self.bool_value
    }

    /// The un-escaped string contents. Only meaningful for `Kind::String`
    /// and `Kind::Name`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The raw, unparsed number text. Only meaningful for `Kind::Number`.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.text
    }

    /// Interprets this number token as a signed integer of the given width
    /// (32 or 64), accepting trailing `.0`-style fractions and exponents
    /// that collapse to an exact integer.
    pub fn as_int(&self, bits: u8) -> Result<i64, JsonError> {
        int_from_text(&self.text, bits)
    }

    /// Interprets this number token as an unsigned integer of the given
    /// width (32 or 64).
    pub fn as_uint(&self, bits: u8) -> Result<u64, JsonError> {
        uint_from_text(&self.text, bits)
    }

    /// Interprets this number token as a float of the given width (32 or
    /// 64), rejecting values that overflow the target width.
    pub fn as_float(&self, bits: u8) -> Result<f64, JsonError> {
        float_from_text(&self.text, self.position, bits)
    }
}

/// Interprets arbitrary text (typically a trimmed JSON string's contents,
/// per the Protobuf/JSON integer-from-string convention) as a signed
/// integer of the given width. Shares the exponent-canonicalization rules
/// used for bare numeric tokens.
pub fn int_from_text(text: &str, bits: u8) -> Result<i64, JsonError> {
    let magnitude = canonicalize_integer(text)?;
    let value: i128 = magnitude.parse().map_err(|_| JsonError::NumberOutOfRange {
        text: text.to_string(),
        bits,
        signed_label: "signed integer",
    })?;
    let (min, max): (i128, i128) = match bits {
        32 => (i64::from(i32::MIN) as i128, i64::from(i32::MAX) as i128),
        64 => (i64::MIN as i128, i64::MAX as i128),
        _ => unreachable!("unsupported integer width {bits}"),
    };
    if value < min || value > max {
        return Err(JsonError::NumberOutOfRange {
            text: text.to_string(),
            bits,
            signed_label: "signed integer",
        });
    }
    Ok(value as i64)
}

/// As [`int_from_text`], but for unsigned integers.
pub fn uint_from_text(text: &str, bits: u8) -> Result<u64, JsonError> {
    let magnitude = canonicalize_integer(text)?;
    let value: i128 = magnitude.parse().map_err(|_| JsonError::NumberOutOfRange {
        text: text.to_string(),
        bits,
        signed_label: "unsigned integer",
    })?;
    if value < 0 {
        return Err(JsonError::NumberOutOfRange {
            text: text.to_string(),
            bits,
            signed_label: "unsigned integer",
        });
    }
    let max: i128 = match bits {
        32 => i128::from(u32::MAX),
        64 => i128::from(u64::MAX),
        _ => unreachable!("unsupported integer width {bits}"),
    };
    if value > max {
        return Err(JsonError::NumberOutOfRange {
            text: text.to_string(),
            bits,
            signed_label: "unsigned integer",
        });
    }
    Ok(value as u64)
}

/// Interprets arbitrary text as a float of the given width, rejecting
/// values that overflow the target width. `position` is only used to
/// locate a parse failure in the original input; pass a default when the
/// text did not come from a token (e.g. a trimmed JSON string).
pub fn float_from_text(text: &str, position: Position, bits: u8) -> Result<f64, JsonError> {
    let value: f64 = text
        .parse()
        .map_err(|_| JsonError::InvalidNumber { position })?;
    if value.is_infinite() {
        return Err(JsonError::NumberOutOfRange {
            text: text.to_string(),
            bits,
            signed_label: "float",
        });
    }
    if bits == 32 && (value as f32).is_infinite() {
        return Err(JsonError::NumberOutOfRange {
            text: text.to_string(),
            bits,
            signed_label: "float",
        });
    }
    Ok(value)
}

/// Canonicalizes a JSON number's text into a plain decimal integer string
/// (optionally signed) by distributing the exponent into the integer part.
/// Fails if the number has a non-zero fractional remainder after shifting.
fn canonicalize_integer(text: &str) -> Result<String, JsonError> {
    let err = || JsonError::NumberNotInteger {
        text: text.to_string(),
    };

    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
        Some((m, e)) => (m, e.parse::<i32>().map_err(|_| err())?),
        None => (rest, 0),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };

    let digits: String = format!("{int_part}{frac_part}");
    let point = int_part.len() as i64 + i64::from(exponent);

    let magnitude = if point <= 0 {
        if digits.bytes().any(|b| b != b'0') {
            return Err(err());
        }
        "0".to_string()
    } else if (point as usize) >= digits.len() {
        let pad = point as usize - digits.len();
        format!("{digits}{}", "0".repeat(pad))
    } else {
        let (head, tail) = digits.split_at(point as usize);
        if tail.bytes().any(|b| b != b'0') {
            return Err(err());
        }
        if head.is_empty() {
            "0".to_string()
        } else {
            head.to_string()
        }
    };

    if negative && magnitude != "0" {
        Ok(format!("-{magnitude}"))
    } else {
        Ok(magnitude)
    }
}
