use base64::{engine::general_purpose, Engine as _};

use bomboni_json::{float_from_text, int_from_text, uint_from_text, Decoder, Encoder, Kind as JsonKind, Position, Token};
use bomboni_reflect::{CodecError, Kind as ProtoKind, MapKey, SchemaError, Value};

/// Marshals a non-message, non-map, non-repeated value of the given kind.
pub(crate) fn marshal_scalar(
    encoder: &mut Encoder,
    kind: &ProtoKind,
    value: &Value,
) -> Result<(), CodecError> {
    match (kind, value) {
        (ProtoKind::Bool, Value::Bool(v)) => encoder.write_bool(*v).map_err(Into::into),
        (ProtoKind::Int32 | ProtoKind::Sint32 | ProtoKind::Sfixed32, Value::I32(v)) => {
            encoder.write_int(i64::from(*v)).map_err(Into::into)
        }
        (ProtoKind::Uint32 | ProtoKind::Fixed32, Value::U32(v)) => {
            encoder.write_uint(u64::from(*v)).map_err(Into::into)
        }
        (ProtoKind::Int64 | ProtoKind::Sint64 | ProtoKind::Sfixed64, Value::I64(v)) => {
            encoder.write_string(&v.to_string()).map_err(Into::into)
        }
        (ProtoKind::Uint64 | ProtoKind::Fixed64, Value::U64(v)) => {
            encoder.write_string(&v.to_string()).map_err(Into::into)
        }
        (ProtoKind::Float, Value::F32(v)) => marshal_float(encoder, f64::from(*v), 32),
        (ProtoKind::Double, Value::F64(v)) => marshal_float(encoder, *v, 64),
        (ProtoKind::String, Value::String(v)) => encoder.write_string(v).map_err(Into::into),
        (ProtoKind::Bytes, Value::Bytes(v)) => encoder
            .write_string(&general_purpose::STANDARD.encode(v))
            .map_err(Into::into),
        (ProtoKind::Enum(enum_desc), Value::EnumNumber(n)) => match enum_desc.get_value(*n) {
            Some(ev) => encoder.write_string(ev.name()).map_err(Into::into),
            None => encoder.write_int(i64::from(*n)).map_err(Into::into),
        },
        _ => Err(SchemaError::TypeMismatch {
            name: String::new(),
            expected: "a scalar value matching the field kind",
            found: "a mismatched reflective value",
        }
        .into()),
    }
}

fn marshal_float(encoder: &mut Encoder, value: f64, bits: u8) -> Result<(), CodecError> {
    if value.is_nan() {
        encoder.write_string("NaN")
    } else if value.is_infinite() {
        encoder.write_string(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        encoder.write_float(value, bits)
    }
    .map_err(Into::into)
}

/// Unmarshals a non-message, non-map, non-repeated value of the given kind,
/// consuming exactly one token from `decoder`.
pub(crate) fn unmarshal_scalar(decoder: &mut Decoder, kind: &ProtoKind) -> Result<Value, CodecError> {
    let token = decoder.read()?;
    match kind {
        ProtoKind::Bool => match token.kind() {
            JsonKind::Bool => Ok(Value::Bool(token.as_bool())),
            found => Err(type_mismatch("a boolean", found)),
        },
        ProtoKind::Int32 | ProtoKind::Sint32 | ProtoKind::Sfixed32 => {
            Ok(Value::I32(read_int(&token, 32)? as i32))
        }
        ProtoKind::Uint32 | ProtoKind::Fixed32 => Ok(Value::U32(read_uint(&token, 32)? as u32)),
        ProtoKind::Int64 | ProtoKind::Sint64 | ProtoKind::Sfixed64 => {
            Ok(Value::I64(read_int(&token, 64)?))
        }
        ProtoKind::Uint64 | ProtoKind::Fixed64 => Ok(Value::U64(read_uint(&token, 64)?)),
        ProtoKind::Float => Ok(Value::F32(read_float(&token, 32)? as f32)),
        ProtoKind::Double => Ok(Value::F64(read_float(&token, 64)?)),
        ProtoKind::String => match token.kind() {
            JsonKind::String => Ok(Value::String(token.as_str().to_string())),
            found => Err(type_mismatch("a string", found)),
        },
        ProtoKind::Bytes => match token.kind() {
            JsonKind::String => Ok(Value::Bytes(decode_bytes(token.as_str())?.into())),
            found => Err(type_mismatch("a base64 string", found)),
        },
        ProtoKind::Enum(enum_desc) => match token.kind() {
            JsonKind::Null if enum_desc.full_name() == "google.protobuf.NullValue" => {
                Ok(Value::EnumNumber(0))
            }
            JsonKind::String => {
                let name = token.as_str();
                match enum_desc.get_value_by_name(name) {
                    Some(v) => Ok(Value::EnumNumber(v.number())),
                    None => Err(SchemaError::InvalidEnumValue {
                        text: name.to_string(),
                    }
                    .into()),
                }
            }
            JsonKind::Number => Ok(Value::EnumNumber(token.as_int(32)? as i32)),
            found => Err(type_mismatch("an enum name or number", found)),
        },
        ProtoKind::Message(_) => {
            unreachable!("message fields are dispatched before reaching unmarshal_scalar")
        }
    }
}

fn read_int(token: &Token, bits: u8) -> Result<i64, CodecError> {
    match token.kind() {
        JsonKind::Number => Ok(token.as_int(bits)?),
        JsonKind::String => Ok(int_from_text(token.as_str().trim(), bits)?),
        found => Err(type_mismatch("an integer or a numeric string", found)),
    }
}

fn read_uint(token: &Token, bits: u8) -> Result<u64, CodecError> {
    match token.kind() {
        JsonKind::Number => Ok(token.as_uint(bits)?),
        JsonKind::String => Ok(uint_from_text(token.as_str().trim(), bits)?),
        found => Err(type_mismatch("an integer or a numeric string", found)),
    }
}

fn read_float(token: &Token, bits: u8) -> Result<f64, CodecError> {
    match token.kind() {
        JsonKind::Number => Ok(token.as_float(bits)?),
        JsonKind::String => match token.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => Ok(float_from_text(other.trim(), Position::default(), bits)?),
        },
        found => Err(type_mismatch(
            "a float, a numeric string or a special value",
            found,
        )),
    }
}

fn pad_base64(text: &str) -> String {
    let rem = text.len() % 4;
    if rem == 0 {
        text.to_string()
    } else {
        format!("{text}{}", "=".repeat(4 - rem))
    }
}

fn decode_bytes(text: &str) -> Result<Vec<u8>, CodecError> {
    let padded = pad_base64(text);
    general_purpose::STANDARD
        .decode(&padded)
        .or_else(|_| general_purpose::URL_SAFE.decode(&padded))
        .map_err(|_| {
            SchemaError::InvalidBase64 {
                text: text.to_string(),
            }
            .into()
        })
}

pub(crate) fn map_key_to_string(key: &MapKey) -> String {
    match key {
        MapKey::Bool(v) => v.to_string(),
        MapKey::I32(v) => v.to_string(),
        MapKey::I64(v) => v.to_string(),
        MapKey::U32(v) => v.to_string(),
        MapKey::U64(v) => v.to_string(),
        MapKey::String(v) => v.clone(),
    }
}

pub(crate) fn parse_map_key(text: &str, kind: &ProtoKind) -> Result<MapKey, CodecError> {
    match kind {
        ProtoKind::Bool => match text {
            "true" => Ok(MapKey::Bool(true)),
            "false" => Ok(MapKey::Bool(false)),
            _ => Err(SchemaError::TypeMismatch {
                name: String::new(),
                expected: "`true` or `false`",
                found: "a map key string",
            }
            .into()),
        },
        ProtoKind::Int32 | ProtoKind::Sint32 | ProtoKind::Sfixed32 => {
            Ok(MapKey::I32(int_from_text(text, 32)? as i32))
        }
        ProtoKind::Uint32 | ProtoKind::Fixed32 => Ok(MapKey::U32(uint_from_text(text, 32)? as u32)),
        ProtoKind::Int64 | ProtoKind::Sint64 | ProtoKind::Sfixed64 => {
            Ok(MapKey::I64(int_from_text(text, 64)?))
        }
        ProtoKind::Uint64 | ProtoKind::Fixed64 => Ok(MapKey::U64(uint_from_text(text, 64)?)),
        ProtoKind::String => Ok(MapKey::String(text.to_string())),
        _ => Err(SchemaError::TypeMismatch {
            name: String::new(),
            expected: "a valid map key kind",
            found: "an unsupported field kind",
        }
        .into()),
    }
}

/// Sorts map entries for deterministic emission: ascending numeric for
/// integer key kinds, ascending lexicographic on the string form otherwise.
pub(crate) fn sort_map_entries<V>(entries: &mut [(&MapKey, V)]) {
    entries.sort_by(|(a, _), (b, _)| compare_map_keys(a, b));
}

fn compare_map_keys(a: &MapKey, b: &MapKey) -> std::cmp::Ordering {
    match (a, b) {
        (MapKey::I32(x), MapKey::I32(y)) => x.cmp(y),
        (MapKey::I64(x), MapKey::I64(y)) => x.cmp(y),
        (MapKey::U32(x), MapKey::U32(y)) => x.cmp(y),
        (MapKey::U64(x), MapKey::U64(y)) => x.cmp(y),
        _ => map_key_to_string(a).cmp(&map_key_to_string(b)),
    }
}

pub(crate) fn type_mismatch(expected: &'static str, found: JsonKind) -> CodecError {
    SchemaError::TypeMismatch {
        name: String::new(),
        expected,
        found: json_kind_label(found),
    }
    .into()
}

pub(crate) fn json_kind_label(kind: JsonKind) -> &'static str {
    match kind {
        JsonKind::Null => "null",
        JsonKind::Bool => "a boolean",
        JsonKind::Number => "a number",
        JsonKind::String => "a string",
        JsonKind::Name => "a name",
        JsonKind::StartObject => "an object",
        JsonKind::EndObject => "`}`",
        JsonKind::StartArray => "an array",
        JsonKind::EndArray => "`]`",
        JsonKind::Eof => "end of input",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_key_ordering_is_numeric_for_integers() {
        let a = MapKey::I32(-101);
        let b = MapKey::I32(0);
        let c = MapKey::I32(255);
        let mut entries = vec![(&c, ()), (&a, ()), (&b, ())];
        sort_map_entries(&mut entries);
        let ordered: Vec<i32> = entries
            .into_iter()
            .map(|(k, _)| match k {
                MapKey::I32(v) => *v,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ordered, vec![-101, 0, 255]);
    }

    #[test]
    fn base64_padding_is_added() {
        assert_eq!(decode_bytes("6LC35q2M").unwrap(), "谷歌".as_bytes());
    }
}
