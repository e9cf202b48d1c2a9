use crate::error::JsonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    StartObject,
    StartArray,
    Name,
    Value,
    EndObject,
    EndArray,
}

/// A stateful JSON writer.
///
/// Punctuation (`,`, `:`) and, when an indent string is set, newlines and
/// indentation are inserted automatically between sibling calls; callers
/// never write them directly. Calls out of grammatical order return
/// [`JsonError::InvalidWriteState`] instead of producing malformed output.
pub struct Encoder {
    buf: Vec<u8>,
    indent: Option<String>,
    stack: Vec<Frame>,
    last: Option<Last>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            indent: None,
            stack: Vec::new(),
            last: None,
        }
    }

    /// Enables pretty-printing with the given per-level indent string, which
    /// may only contain spaces and tabs.
    pub fn with_indent(indent: impl Into<String>) -> Result<Self, JsonError> {
        let indent = indent.into();
        if !indent.bytes().all(|b| b == b' ' || b == b'\t') {
            return Err(JsonError::InvalidIndent);
        }
        let mut encoder = Self::new();
        encoder.indent = Some(indent);
        Ok(encoder)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_null(&mut self) -> Result<(), JsonError> {
        self.before_value("write_null")?;
        self.buf.extend_from_slice(b"null");
        self.last = Some(Last::Value);
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), JsonError> {
        self.before_value("write_bool")?;
        self.buf
            .extend_from_slice(if value { b"true" } else { b"false" });
        self.last = Some(Last::Value);
        Ok(())
    }

    pub fn write_int(&mut self, value: i64) -> Result<(), JsonError> {
        self.before_value("write_int")?;
        self.buf.extend_from_slice(value.to_string().as_bytes());
        self.last = Some(Last::Value);
        Ok(())
    }

    pub fn write_uint(&mut self, value: u64) -> Result<(), JsonError> {
        self.before_value("write_uint")?;
        self.buf.extend_from_slice(value.to_string().as_bytes());
        self.last = Some(Last::Value);
        Ok(())
    }

    /// Writes a finite float in the shortest round-trippable decimal form,
    /// switching to exponent notation outside `[1e-6, 1e21)`. `bits` (32 or
    /// 64) picks the cutoff and the rounding width: a `float` field's value
    /// is widened to `f64` by its caller but must still be formatted to the
    /// precision an `f32` round-trips at. NaN and the infinities are not
    /// valid JSON number literals; callers needing the Protobuf/JSON
    /// "NaN"/"Infinity" string convention must call [`Encoder::write_string`]
    /// instead.
    pub fn write_float(&mut self, value: f64, bits: u8) -> Result<(), JsonError> {
        if !value.is_finite() {
            return Err(JsonError::NonFiniteFloat { value });
        }
        self.before_value("write_float")?;
        self.buf.extend_from_slice(format_float(value, bits).as_bytes());
        self.last = Some(Last::Value);
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), JsonError> {
        self.before_value("write_string")?;
        write_json_string(&mut self.buf, value);
        self.last = Some(Last::Value);
        Ok(())
    }

    pub fn write_name(&mut self, name: &str) -> Result<(), JsonError> {
        if !matches!(self.stack.last(), Some(Frame::Object)) {
            return Err(JsonError::InvalidWriteState {
                call: "write_name",
                after: "names may only be written inside an object",
            });
        }
        match self.last {
            Some(Last::StartObject) => self.write_indent(self.stack.len()),
            Some(Last::Value) | Some(Last::EndObject) | Some(Last::EndArray) => {
                self.write_item_separator();
            }
            _ => {
                return Err(JsonError::InvalidWriteState {
                    call: "write_name",
                    after: "a name may not follow another name",
                })
            }
        }
        write_json_string(&mut self.buf, name);
        self.buf.push(b':');
        if self.indent.is_some() {
            self.buf.push(b' ');
        }
        self.last = Some(Last::Name);
        Ok(())
    }

    pub fn start_object(&mut self) -> Result<(), JsonError> {
        self.before_value("start_object")?;
        self.buf.push(b'{');
        self.stack.push(Frame::Object);
        self.last = Some(Last::StartObject);
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<(), JsonError> {
        if !matches!(self.stack.last(), Some(Frame::Object)) {
            return Err(JsonError::InvalidWriteState {
                call: "end_object",
                after: "not inside an object",
            });
        }
        if !matches!(self.last, Some(Last::StartObject)) {
            self.write_closing_indent();
        }
        self.stack.pop();
        self.buf.push(b'}');
        self.last = Some(Last::EndObject);
        Ok(())
    }

    pub fn start_array(&mut self) -> Result<(), JsonError> {
        self.before_value("start_array")?;
        self.buf.push(b'[');
        self.stack.push(Frame::Array);
        self.last = Some(Last::StartArray);
        Ok(())
    }

    pub fn end_array(&mut self) -> Result<(), JsonError> {
        if !matches!(self.stack.last(), Some(Frame::Array)) {
            return Err(JsonError::InvalidWriteState {
                call: "end_array",
                after: "not inside an array",
            });
        }
        if !matches!(self.last, Some(Last::StartArray)) {
            self.write_closing_indent();
        }
        self.stack.pop();
        self.buf.push(b']');
        self.last = Some(Last::EndArray);
        Ok(())
    }

    fn before_value(&mut self, call: &'static str) -> Result<(), JsonError> {
        match self.stack.last() {
            None => {
                if self.last.is_some() {
                    return Err(JsonError::InvalidWriteState {
                        call,
                        after: "a top-level value has already been written",
                    });
                }
            }
            Some(Frame::Object) => {
                if !matches!(self.last, Some(Last::Name)) {
                    return Err(JsonError::InvalidWriteState {
                        call,
                        after: "a value may only follow a name inside an object",
                    });
                }
            }
            Some(Frame::Array) => match self.last {
                Some(Last::StartArray) => self.write_indent(self.stack.len()),
                Some(Last::Value) | Some(Last::EndObject) | Some(Last::EndArray) => {
                    self.write_item_separator();
                }
                _ => {
                    return Err(JsonError::InvalidWriteState {
                        call,
                        after: "unexpected array state",
                    })
                }
            },
        }
        Ok(())
    }

    fn write_item_separator(&mut self) {
        self.buf.push(b',');
        self.write_indent(self.stack.len());
    }

    fn write_closing_indent(&mut self) {
        self.write_indent(self.stack.len() - 1);
    }

    fn write_indent(&mut self, depth: usize) {
        if let Some(indent) = &self.indent {
            self.buf.push(b'\n');
            for _ in 0..depth {
                self.buf.extend_from_slice(indent.as_bytes());
            }
        }
    }
}

/// `%g`-style formatting with `-1` precision: the shortest decimal that
/// round-trips, switching to exponent form for `|x| < 1e-6` or
/// `|x| >= 1e21`. Exponents are zero-padded to two digits and signed, then
/// a single leading zero is trimmed (`e-07` -> `e-7`), matching the
/// reference protobuf/JSON float encoding this spec is drawn from.
fn format_float(value: f64, bits: u8) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() {
            "-0".to_string()
        } else {
            "0".to_string()
        };
    }
    let use_exponent = if bits == 32 {
        let abs = (value as f32).abs();
        abs < 1e-6 || abs >= 1e21
    } else {
        let abs = value.abs();
        abs < 1e-6 || abs >= 1e21
    };
    if !use_exponent {
        return if bits == 32 {
            format!("{}", value as f32)
        } else {
            format!("{value}")
        };
    }
    let exponential = if bits == 32 {
        format!("{:e}", value as f32)
    } else {
        format!("{value:e}")
    };
    let (mantissa, exponent) = exponential
        .split_once('e')
        .expect("LowerExp always emits an 'e'");
    let exponent: i32 = exponent.parse().expect("LowerExp exponent is an integer");
    let sign = if exponent < 0 { '-' } else { '+' };
    let magnitude = exponent.unsigned_abs();
    if magnitude < 10 {
        format!("{mantissa}e{sign}{magnitude}")
    } else {
        format!("{mantissa}e{sign}{magnitude:02}")
    }
}

fn write_json_string(buf: &mut Vec<u8>, value: &str) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    buf.push(b'"');
    for c in value.chars() {
        match c {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            '\u{08}' => buf.extend_from_slice(b"\\b"),
            '\u{0C}' => buf.extend_from_slice(b"\\f"),
            c if (c as u32) < 0x20 => {
                let code = c as u32;
                buf.extend_from_slice(b"\\u00");
                buf.push(HEX[((code >> 4) & 0xF) as usize]);
                buf.push(HEX[(code & 0xF) as usize]);
            }
            c => {
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
            }
        }
    }
    buf.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(encoder: Encoder) -> String {
        String::from_utf8(encoder.into_bytes()).unwrap()
    }

    #[test]
    fn compact_object() {
        let mut e = Encoder::new();
        e.start_object().unwrap();
        e.write_name("a").unwrap();
        e.write_int(1).unwrap();
        e.write_name("b").unwrap();
        e.write_string("x").unwrap();
        e.end_object().unwrap();
        assert_eq!(json(e), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn empty_containers() {
        let mut e = Encoder::new();
        e.start_object().unwrap();
        e.write_name("items").unwrap();
        e.start_array().unwrap();
        e.end_array().unwrap();
        e.end_object().unwrap();
        assert_eq!(json(e), r#"{"items":[]}"#);
    }

    #[test]
    fn pretty_printed() {
        let mut e = Encoder::with_indent("  ").unwrap();
        e.start_object().unwrap();
        e.write_name("a").unwrap();
        e.write_int(1).unwrap();
        e.end_object().unwrap();
        assert_eq!(json(e), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn string_escaping() {
        let mut e = Encoder::new();
        e.write_string("a\n\"b\"\t\u{1}").unwrap();
        assert_eq!(json(e), r#""a\n\"b\"\t""#);
    }

    #[test]
    fn second_top_level_value_errors() {
        let mut e = Encoder::new();
        e.write_int(1).unwrap();
        assert!(matches!(
            e.write_int(2),
            Err(JsonError::InvalidWriteState { .. })
        ));
    }

    #[test]
    fn name_outside_object_errors() {
        let mut e = Encoder::new();
        e.start_array().unwrap();
        assert!(matches!(
            e.write_name("x"),
            Err(JsonError::InvalidWriteState { .. })
        ));
    }

    #[test]
    fn nan_is_rejected() {
        let mut e = Encoder::new();
        assert!(matches!(
            e.write_float(f64::NAN, 64),
            Err(JsonError::NonFiniteFloat { .. })
        ));
    }

    #[test]
    fn float_plain_form_below_exponent_cutoff() {
        let mut e = Encoder::new();
        e.write_float(1.5, 64).unwrap();
        assert_eq!(json(e), "1.5");

        let mut e = Encoder::new();
        e.write_float(1e-6, 64).unwrap();
        assert_eq!(json(e), "0.000001");
    }

    #[test]
    fn float_exponent_form_outside_cutoff() {
        let mut e = Encoder::new();
        e.write_float(1e22, 64).unwrap();
        assert_eq!(json(e), "1e+22");

        let mut e = Encoder::new();
        e.write_float(1e21, 64).unwrap();
        assert_eq!(json(e), "1e+21");

        let mut e = Encoder::new();
        e.write_float(1.5e-7, 64).unwrap();
        assert_eq!(json(e), "1.5e-7");
    }

    #[test]
    fn float_32_bit_cutoff_uses_f32_precision() {
        let mut e = Encoder::new();
        e.write_float(f64::from(0.1f32), 32).unwrap();
        assert_eq!(json(e), "0.1");
    }

    #[test]
    fn nested_array_pretty() {
        let mut e = Encoder::with_indent("  ").unwrap();
        e.start_array().unwrap();
        e.write_int(1).unwrap();
        e.start_array().unwrap();
        e.write_int(2).unwrap();
        e.end_array().unwrap();
        e.end_array().unwrap();
        assert_eq!(json(e), "[\n  1,\n  [\n    2\n  ]\n]");
    }
}
