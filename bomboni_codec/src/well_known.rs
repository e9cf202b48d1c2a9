use bomboni_core::{camel_case_to_snake_case, proto_field_to_json_name};
use bomboni_json::{Decoder, Encoder, Kind as JsonKind};
use bomboni_reflect::{
    CodecError, DynamicMessage, FieldDescriptor, Kind as ProtoKind, MessageDescriptor,
    RangeError, ReflectMessage, ResolutionError, SchemaError, SemanticError, Value,
};
use prost::Message as _;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::message::{
    expect_kind, marshal_fields_into, marshal_list, marshal_map, marshal_singular,
    unmarshal_fields_into, unmarshal_list, unmarshal_map, unmarshal_singular,
};
use crate::options::{MarshalOptions, UnmarshalOptions};
use crate::scalar::type_mismatch;

const DURATION_SECONDS_MAX: i64 = 315_576_000_000;
const TIMESTAMP_SECONDS_MIN: i64 = -62_135_596_800;
const TIMESTAMP_SECONDS_MAX: i64 = 253_402_300_799;

pub(crate) fn is_well_known(descriptor: &MessageDescriptor) -> bool {
    well_known_kind(descriptor.full_name()).is_some()
}

enum WellKnown {
    Empty,
    Wrapper,
    Duration,
    Timestamp,
    FieldMask,
    Struct,
    ListValue,
    Value,
    Any,
}

fn well_known_kind(full_name: &str) -> Option<WellKnown> {
    Some(match full_name {
        "google.protobuf.Empty" => WellKnown::Empty,
        "google.protobuf.BoolValue"
        | "google.protobuf.Int32Value"
        | "google.protobuf.Int64Value"
        | "google.protobuf.UInt32Value"
        | "google.protobuf.UInt64Value"
        | "google.protobuf.FloatValue"
        | "google.protobuf.DoubleValue"
        | "google.protobuf.StringValue"
        | "google.protobuf.BytesValue" => WellKnown::Wrapper,
        "google.protobuf.Duration" => WellKnown::Duration,
        "google.protobuf.Timestamp" => WellKnown::Timestamp,
        "google.protobuf.FieldMask" => WellKnown::FieldMask,
        "google.protobuf.Struct" => WellKnown::Struct,
        "google.protobuf.ListValue" => WellKnown::ListValue,
        "google.protobuf.Value" => WellKnown::Value,
        "google.protobuf.Any" => WellKnown::Any,
        _ => return None,
    })
}

pub(crate) fn marshal_well_known(
    encoder: &mut Encoder,
    message: &DynamicMessage,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    match well_known_kind(message.descriptor().full_name()).expect("caller checked is_well_known")
    {
        WellKnown::Empty => {
            encoder.start_object()?;
            encoder.end_object()?;
            Ok(())
        }
        WellKnown::Wrapper => marshal_wrapper(encoder, message, options),
        WellKnown::Duration => marshal_duration(encoder, message),
        WellKnown::Timestamp => marshal_timestamp(encoder, message),
        WellKnown::FieldMask => marshal_field_mask(encoder, message),
        WellKnown::Struct => marshal_struct(encoder, message, options),
        WellKnown::ListValue => marshal_list_value(encoder, message, options),
        WellKnown::Value => marshal_value_message(encoder, message, options),
        WellKnown::Any => marshal_any(encoder, message, options),
    }
}

pub(crate) fn unmarshal_well_known(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
    options: &UnmarshalOptions,
) -> Result<bomboni_reflect::Outcome<()>, CodecError> {
    match well_known_kind(message.descriptor().full_name()).expect("caller checked is_well_known")
    {
        WellKnown::Empty => {
            expect_kind(decoder, JsonKind::StartObject)?;
            expect_kind(decoder, JsonKind::EndObject)?;
            Ok(bomboni_reflect::Outcome::new(()))
        }
        WellKnown::Wrapper => unmarshal_wrapper(decoder, message, options),
        WellKnown::Duration => unmarshal_duration(decoder, message),
        WellKnown::Timestamp => unmarshal_timestamp(decoder, message),
        WellKnown::FieldMask => unmarshal_field_mask(decoder, message),
        WellKnown::Struct => unmarshal_struct(decoder, message, options),
        WellKnown::ListValue => unmarshal_list_value(decoder, message, options),
        WellKnown::Value => unmarshal_value_message(decoder, message, options),
        WellKnown::Any => unmarshal_any(decoder, message, options),
    }
}

fn value_field(message: &DynamicMessage) -> FieldDescriptor {
    message
        .descriptor()
        .get_field_by_name("value")
        .expect("wrapper type has a value field")
}

fn marshal_wrapper(
    encoder: &mut Encoder,
    message: &DynamicMessage,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    let field = value_field(message);
    let value = message.get_field(&field);
    marshal_singular(encoder, &field, &value, options)
}

fn unmarshal_wrapper(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
    options: &UnmarshalOptions,
) -> Result<bomboni_reflect::Outcome<()>, CodecError> {
    let field = value_field(message);
    let mut outcome = bomboni_reflect::Outcome::new(());
    let value = unmarshal_singular(decoder, &field, options, &mut outcome)?;
    message.set_field(&field, value);
    Ok(outcome)
}

fn get_i64_field(message: &DynamicMessage, name: &str) -> i64 {
    let field = message
        .descriptor()
        .get_field_by_name(name)
        .unwrap_or_else(|| panic!("well-known message has a `{name}` field"));
    message.get_field(&field).as_i64().unwrap_or(0)
}

fn get_i32_field(message: &DynamicMessage, name: &str) -> i32 {
    let field = message
        .descriptor()
        .get_field_by_name(name)
        .unwrap_or_else(|| panic!("well-known message has a `{name}` field"));
    message.get_field(&field).as_i32().unwrap_or(0)
}

fn set_i64_field(message: &mut DynamicMessage, name: &str, value: i64) {
    let field = message
        .descriptor()
        .get_field_by_name(name)
        .unwrap_or_else(|| panic!("well-known message has a `{name}` field"));
    message.set_field(&field, Value::I64(value));
}

fn set_i32_field(message: &mut DynamicMessage, name: &str, value: i32) {
    let field = message
        .descriptor()
        .get_field_by_name(name)
        .unwrap_or_else(|| panic!("well-known message has a `{name}` field"));
    message.set_field(&field, Value::I32(value));
}

fn format_fraction(nanos: u32) -> String {
    if nanos == 0 {
        String::new()
    } else if nanos % 1_000_000 == 0 {
        format!("{:03}", nanos / 1_000_000)
    } else if nanos % 1_000 == 0 {
        format!("{:06}", nanos / 1_000)
    } else {
        format!("{nanos:09}")
    }
}

fn format_duration(seconds: i64, nanos: i32) -> Result<String, CodecError> {
    if seconds.unsigned_abs() > DURATION_SECONDS_MAX as u64 || nanos.unsigned_abs() >= 1_000_000_000
    {
        return Err(RangeError::DurationOutOfRange { seconds, nanos }.into());
    }
    if (seconds > 0 && nanos < 0) || (seconds < 0 && nanos > 0) {
        return Err(RangeError::DurationOutOfRange { seconds, nanos }.into());
    }
    let negative = seconds < 0 || nanos < 0;
    let abs_seconds = seconds.unsigned_abs();
    let abs_nanos = nanos.unsigned_abs();
    let fraction = format_fraction(abs_nanos);
    let sign = if negative { "-" } else { "" };
    Ok(if fraction.is_empty() {
        format!("{sign}{abs_seconds}s")
    } else {
        format!("{sign}{abs_seconds}.{fraction}s")
    })
}

fn parse_duration(text: &str) -> Result<(i64, i32), CodecError> {
    let invalid = || RangeError::InvalidDurationFormat {
        text: text.to_string(),
    };
    let body = text.strip_suffix('s').ok_or_else(invalid)?;
    let (negative, body) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid().into());
    }
    let mut seconds: i64 = int_part.parse().map_err(|_| invalid())?;
    let mut nanos: i32 = if let Some(frac) = frac_part {
        if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid().into());
        }
        let padded = format!("{frac:0<9}");
        padded.parse().map_err(|_| invalid())?
    } else {
        0
    };
    if negative {
        seconds = -seconds;
        nanos = -nanos;
    }
    if seconds.unsigned_abs() > DURATION_SECONDS_MAX as u64 {
        return Err(RangeError::DurationOutOfRange { seconds, nanos }.into());
    }
    Ok((seconds, nanos))
}

fn marshal_duration(encoder: &mut Encoder, message: &DynamicMessage) -> Result<(), CodecError> {
    let seconds = get_i64_field(message, "seconds");
    let nanos = get_i32_field(message, "nanos");
    encoder
        .write_string(&format_duration(seconds, nanos)?)
        .map_err(Into::into)
}

fn unmarshal_duration(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
) -> Result<bomboni_reflect::Outcome<()>, CodecError> {
    let token = decoder.read()?;
    if token.kind() != JsonKind::String {
        return Err(type_mismatch("a duration string", token.kind()));
    }
    let (seconds, nanos) = parse_duration(token.as_str())?;
    set_i64_field(message, "seconds", seconds);
    set_i32_field(message, "nanos", nanos);
    Ok(bomboni_reflect::Outcome::new(()))
}

fn format_timestamp(seconds: i64, nanos: i32) -> Result<String, CodecError> {
    if !(TIMESTAMP_SECONDS_MIN..=TIMESTAMP_SECONDS_MAX).contains(&seconds)
        || !(0..1_000_000_000).contains(&nanos)
    {
        return Err(RangeError::TimestampOutOfRange { seconds, nanos }.into());
    }
    let datetime = OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|_| RangeError::TimestampOutOfRange { seconds, nanos })?
        .replace_nanosecond(nanos as u32)
        .map_err(|_| RangeError::TimestampOutOfRange { seconds, nanos })?;
    let fraction = format_fraction(nanos as u32);
    Ok(if fraction.is_empty() {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            datetime.year(),
            u8::from(datetime.month()),
            datetime.day(),
            datetime.hour(),
            datetime.minute(),
            datetime.second()
        )
    } else {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{}Z",
            datetime.year(),
            u8::from(datetime.month()),
            datetime.day(),
            datetime.hour(),
            datetime.minute(),
            datetime.second(),
            fraction
        )
    })
}

fn marshal_timestamp(encoder: &mut Encoder, message: &DynamicMessage) -> Result<(), CodecError> {
    let seconds = get_i64_field(message, "seconds");
    let nanos = get_i32_field(message, "nanos");
    encoder
        .write_string(&format_timestamp(seconds, nanos)?)
        .map_err(Into::into)
}

fn unmarshal_timestamp(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
) -> Result<bomboni_reflect::Outcome<()>, CodecError> {
    let token = decoder.read()?;
    if token.kind() != JsonKind::String {
        return Err(type_mismatch("an RFC 3339 timestamp string", token.kind()));
    }
    let text = token.as_str();
    let datetime = OffsetDateTime::parse(text, &Rfc3339).map_err(|_| {
        RangeError::InvalidTimestampFormat {
            text: text.to_string(),
        }
    })?;
    let seconds = datetime.unix_timestamp();
    let nanos = datetime.nanosecond() as i32;
    if !(TIMESTAMP_SECONDS_MIN..=TIMESTAMP_SECONDS_MAX).contains(&seconds) {
        return Err(RangeError::TimestampOutOfRange { seconds, nanos }.into());
    }
    set_i64_field(message, "seconds", seconds);
    set_i32_field(message, "nanos", nanos);
    Ok(bomboni_reflect::Outcome::new(()))
}

fn marshal_field_mask(encoder: &mut Encoder, message: &DynamicMessage) -> Result<(), CodecError> {
    let field = message
        .descriptor()
        .get_field_by_name("paths")
        .expect("FieldMask has a paths field");
    let value = message.get_field(&field);
    let paths = value.as_list().expect("paths is a repeated field");
    let mut camel_paths = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_str().expect("path entries are strings");
        let camel = proto_field_to_json_name(path);
        if camel_case_to_snake_case(&camel) != path {
            return Err(SemanticError::FieldMaskNotReversible {
                path: path.to_string(),
            }
            .into());
        }
        camel_paths.push(camel);
    }
    encoder
        .write_string(&camel_paths.join(","))
        .map_err(Into::into)
}

fn unmarshal_field_mask(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
) -> Result<bomboni_reflect::Outcome<()>, CodecError> {
    let token = decoder.read()?;
    if token.kind() != JsonKind::String {
        return Err(type_mismatch("a comma-separated field mask string", token.kind()));
    }
    let text = token.as_str();
    let paths: Vec<Value> = if text.is_empty() {
        Vec::new()
    } else {
        text.split(',')
            .map(|p| Value::String(camel_case_to_snake_case(p)))
            .collect()
    };
    let field = message
        .descriptor()
        .get_field_by_name("paths")
        .expect("FieldMask has a paths field");
    message.set_field(&field, Value::List(paths));
    Ok(bomboni_reflect::Outcome::new(()))
}

fn struct_fields_field(message: &DynamicMessage) -> FieldDescriptor {
    message
        .descriptor()
        .get_field_by_name("fields")
        .expect("Struct has a fields field")
}

fn marshal_struct(
    encoder: &mut Encoder,
    message: &DynamicMessage,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    let field = struct_fields_field(message);
    let value = message.get_field(&field);
    marshal_map(encoder, &field, &value, options)
}

fn unmarshal_struct(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
    options: &UnmarshalOptions,
) -> Result<bomboni_reflect::Outcome<()>, CodecError> {
    let field = struct_fields_field(message);
    let mut outcome = bomboni_reflect::Outcome::new(());
    let value = unmarshal_map(decoder, &field, options, &mut outcome)?;
    message.set_field(&field, value);
    Ok(outcome)
}

fn list_values_field(message: &DynamicMessage) -> FieldDescriptor {
    message
        .descriptor()
        .get_field_by_name("values")
        .expect("ListValue has a values field")
}

fn marshal_list_value(
    encoder: &mut Encoder,
    message: &DynamicMessage,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    let field = list_values_field(message);
    let value = message.get_field(&field);
    marshal_list(encoder, &field, &value, options)
}

fn unmarshal_list_value(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
    options: &UnmarshalOptions,
) -> Result<bomboni_reflect::Outcome<()>, CodecError> {
    let field = list_values_field(message);
    let mut outcome = bomboni_reflect::Outcome::new(());
    let value = unmarshal_list(decoder, &field, options, &mut outcome)?;
    message.set_field(&field, value);
    Ok(outcome)
}

// google.protobuf.Value oneof field numbers, per well_known_types.proto.
const VALUE_NULL: u32 = 1;
const VALUE_NUMBER: u32 = 2;
const VALUE_STRING: u32 = 3;
const VALUE_STRUCT: u32 = 4;
const VALUE_LIST: u32 = 5;
const VALUE_BOOL: u32 = 6;

fn marshal_value_message(
    encoder: &mut Encoder,
    message: &DynamicMessage,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    let descriptor = message.descriptor();
    for number in [
        VALUE_NULL,
        VALUE_NUMBER,
        VALUE_STRING,
        VALUE_STRUCT,
        VALUE_LIST,
        VALUE_BOOL,
    ] {
        let field = descriptor
            .get_field(number)
            .expect("google.protobuf.Value has this field number");
        if !message.has_field(&field) {
            continue;
        }
        return match number {
            VALUE_NULL => encoder.write_null().map_err(Into::into),
            VALUE_NUMBER => {
                let n = message.get_field(&field).as_f64().unwrap_or(0.0);
                if !n.is_finite() {
                    return Err(SemanticError::NonFiniteNumberValue.into());
                }
                encoder.write_float(n, 64).map_err(Into::into)
            }
            VALUE_STRING => {
                let s = message.get_field(&field);
                encoder
                    .write_string(s.as_str().unwrap_or_default())
                    .map_err(Into::into)
            }
            VALUE_BOOL => {
                let b = message.get_field(&field).as_bool().unwrap_or(false);
                encoder.write_bool(b).map_err(Into::into)
            }
            VALUE_STRUCT | VALUE_LIST => {
                let value = message.get_field(&field);
                match value.as_message() {
                    Some(inner) => crate::message::marshal_message(encoder, inner, options),
                    None => encoder.write_null().map_err(Into::into),
                }
            }
            _ => unreachable!(),
        };
    }
    Err(SemanticError::ValueVariantNotSet.into())
}

fn unmarshal_value_message(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
    options: &UnmarshalOptions,
) -> Result<bomboni_reflect::Outcome<()>, CodecError> {
    let descriptor = message.descriptor();
    let mut outcome = bomboni_reflect::Outcome::new(());
    match decoder.peek()? {
        JsonKind::Null => {
            decoder.read()?;
            let field = descriptor.get_field(VALUE_NULL).unwrap();
            message.set_field(&field, Value::EnumNumber(0));
        }
        JsonKind::Bool => {
            let token = decoder.read()?;
            let field = descriptor.get_field(VALUE_BOOL).unwrap();
            message.set_field(&field, Value::Bool(token.as_bool()));
        }
        JsonKind::Number => {
            let token = decoder.read()?;
            let field = descriptor.get_field(VALUE_NUMBER).unwrap();
            message.set_field(&field, Value::F64(token.as_float(64)?));
        }
        JsonKind::String => {
            let token = decoder.read()?;
            let field = descriptor.get_field(VALUE_STRING).unwrap();
            message.set_field(&field, Value::String(token.as_str().to_string()));
        }
        JsonKind::StartArray => {
            let field = descriptor.get_field(VALUE_LIST).unwrap();
            let ProtoKind::Message(inner_descriptor) = field.kind() else {
                unreachable!("ListValue field is a message")
            };
            let mut inner = DynamicMessage::new(inner_descriptor);
            let inner_outcome = unmarshal_list_value(decoder, &mut inner, options)?;
            outcome.merge_non_fatal(inner_outcome);
            message.set_field(&field, Value::Message(inner));
        }
        JsonKind::StartObject => {
            let field = descriptor.get_field(VALUE_STRUCT).unwrap();
            let ProtoKind::Message(inner_descriptor) = field.kind() else {
                unreachable!("Struct field is a message")
            };
            let mut inner = DynamicMessage::new(inner_descriptor);
            let inner_outcome = unmarshal_struct(decoder, &mut inner, options)?;
            outcome.merge_non_fatal(inner_outcome);
            message.set_field(&field, Value::Message(inner));
        }
        found => return Err(type_mismatch("a JSON value", found)),
    }
    Ok(outcome)
}

fn marshal_any(
    encoder: &mut Encoder,
    message: &DynamicMessage,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    let type_url = any_field_str(message, "type_url");
    let value_bytes = any_field_bytes(message, "value");
    if type_url.is_empty() {
        if value_bytes.is_empty() {
            encoder.start_object()?;
            encoder.end_object()?;
            return Ok(());
        }
        return Err(SemanticError::AnyValueWithoutTypeUrl.into());
    }
    let resolver = options
        .resolver
        .as_ref()
        .ok_or_else(|| ResolutionError::UnknownTypeUrl {
            type_url: type_url.clone(),
        })?;
    let descriptor = resolver.find_message_by_url(&type_url)?;
    let inner = DynamicMessage::decode(descriptor.clone(), value_bytes.as_slice())
        .map_err(|_| ResolutionError::UnknownTypeUrl {
            type_url: type_url.clone(),
        })?;
    encoder.start_object()?;
    encoder.write_name("@type")?;
    encoder.write_string(&type_url)?;
    if is_well_known(&descriptor) {
        encoder.write_name("value")?;
        marshal_well_known(encoder, &inner, options)?;
    } else {
        marshal_fields_into(encoder, &inner, options)?;
    }
    encoder.end_object()?;
    Ok(())
}

fn any_field_str(message: &DynamicMessage, name: &str) -> String {
    let field = message.descriptor().get_field_by_name(name).unwrap();
    message
        .get_field(&field)
        .as_str()
        .unwrap_or_default()
        .to_string()
}

fn any_field_bytes(message: &DynamicMessage, name: &str) -> Vec<u8> {
    let field = message.descriptor().get_field_by_name(name).unwrap();
    message
        .get_field(&field)
        .as_bytes()
        .map(|b| b.to_vec())
        .unwrap_or_default()
}

fn unmarshal_any(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
    options: &UnmarshalOptions,
) -> Result<bomboni_reflect::Outcome<()>, CodecError> {
    expect_kind(decoder, JsonKind::StartObject)?;
    if matches!(decoder.peek()?, JsonKind::EndObject) {
        decoder.read()?;
        return Ok(bomboni_reflect::Outcome::new(()));
    }
    let first_name = decoder.read()?;
    if first_name.as_str() != "@type" {
        return Err(type_mismatch(
            "`@type` as the first member of an Any object",
            first_name.kind(),
        ));
    }
    let type_token = decoder.read()?;
    if type_token.kind() != JsonKind::String {
        return Err(type_mismatch("a type URL string", type_token.kind()));
    }
    let type_url = type_token.as_str().to_string();
    let resolver = options
        .resolver
        .as_ref()
        .ok_or_else(|| ResolutionError::UnknownTypeUrl {
            type_url: type_url.clone(),
        })?;
    let descriptor = resolver.find_message_by_url(&type_url)?;
    let mut inner = DynamicMessage::new(descriptor.clone());
    let mut outcome = bomboni_reflect::Outcome::new(());
    if matches!(decoder.peek()?, JsonKind::EndObject) {
        // No further members: an empty embedded message.
    } else if is_well_known(&descriptor) {
        let name = decoder.read()?;
        if name.as_str() != "value" {
            return Err(SchemaError::UnknownField {
                name: name.as_str().to_string(),
            }
            .into());
        }
        let inner_outcome = unmarshal_well_known(decoder, &mut inner, options)?;
        outcome.merge_non_fatal(inner_outcome);
    } else {
        let inner_outcome = unmarshal_fields_into(decoder, &mut inner, options)?;
        outcome.merge_non_fatal(inner_outcome);
    }
    expect_kind(decoder, JsonKind::EndObject)?;

    let type_url_field = message.descriptor().get_field_by_name("type_url").unwrap();
    message.set_field(&type_url_field, Value::String(type_url));
    let value_field = message.descriptor().get_field_by_name("value").unwrap();
    message.set_field(&value_field, Value::Bytes(inner.encode_to_vec().into()));
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats_match_worked_examples() {
        assert_eq!(
            format_duration(-3600, -123).unwrap(),
            "-3600.000000123s"
        );
        assert_eq!(format_duration(0, -1).unwrap(), "-0.000000001s");
        assert_eq!(format_duration(1, 0).unwrap(), "1s");
        assert_eq!(format_duration(3, 500_000_000).unwrap(), "3.500s");
    }

    #[test]
    fn duration_round_trips_through_parse() {
        for (seconds, nanos) in [(-3600_i64, -123_i32), (0, -1), (1, 0), (3, 500_000_000)] {
            let text = format_duration(seconds, nanos).unwrap();
            assert_eq!(parse_duration(&text).unwrap(), (seconds, nanos));
        }
    }

    #[test]
    fn duration_out_of_range_is_rejected() {
        assert!(format_duration(DURATION_SECONDS_MAX + 1, 0).is_err());
    }

    #[test]
    fn timestamp_formats_epoch() {
        assert_eq!(format_timestamp(0, 0).unwrap(), "1970-01-01T00:00:00Z");
        assert_eq!(
            format_timestamp(0, 1).unwrap(),
            "1970-01-01T00:00:00.000000001Z"
        );
    }

    #[test]
    fn fraction_trims_to_significant_group() {
        assert_eq!(format_fraction(0), "");
        assert_eq!(format_fraction(500_000_000), "500");
        assert_eq!(format_fraction(500_000), "000500");
        assert_eq!(format_fraction(123), "000000123");
    }
}
