use std::collections::HashMap;

use bomboni_json::{Decoder, Encoder, Kind as JsonKind};
use bomboni_reflect::{
    Cardinality, CodecError, DynamicMessage, ExtensionDescriptor, FieldDescriptor,
    Kind as ProtoKind, MapKey, Outcome, ReflectMessage, SchemaError, Value,
};

use crate::options::{MarshalOptions, UnmarshalOptions};
use crate::scalar::{self, map_key_to_string, parse_map_key, sort_map_entries};
use crate::well_known;

/// Marshals a message, dispatching to its well-known-type shape first.
pub(crate) fn marshal_message(
    encoder: &mut Encoder,
    message: &DynamicMessage,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    if well_known::is_well_known(&message.descriptor()) {
        return well_known::marshal_well_known(encoder, message, options);
    }
    encoder.start_object()?;
    marshal_fields_into(encoder, message, options)?;
    encoder.end_object()?;
    Ok(())
}

/// Marshals a message's own fields without opening or closing the
/// surrounding object, so callers with an already-open object (`Any`'s
/// inlined representation) can reuse the same per-field loop.
pub(crate) fn marshal_fields_into(
    encoder: &mut Encoder,
    message: &DynamicMessage,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    for field in message.descriptor().fields() {
        let populated = field_is_populated(message, &field);
        if !populated && !options.emit_unpopulated {
            continue;
        }
        if !populated && field.containing_oneof().is_some() {
            // Oneof members never emit a synthetic default.
            continue;
        }
        encoder.write_name(field.json_name())?;
        marshal_field_value(encoder, message, &field, options)?;
    }
    Ok(())
}

fn field_is_populated(message: &DynamicMessage, field: &FieldDescriptor) -> bool {
    message.has_field(field)
}

fn marshal_field_value(
    encoder: &mut Encoder,
    message: &DynamicMessage,
    field: &FieldDescriptor,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    let value = message.get_field(field);
    if field.is_map() {
        marshal_map(encoder, field, &value, options)
    } else if field.is_list() {
        marshal_list(encoder, field, &value, options)
    } else {
        marshal_singular(encoder, field, &value, options)
    }
}

pub(crate) fn marshal_singular(
    encoder: &mut Encoder,
    field: &FieldDescriptor,
    value: &Value,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    if matches!(field.kind(), ProtoKind::Message(_)) {
        match value.as_message() {
            Some(inner) => marshal_message(encoder, inner, options),
            None => encoder.write_null().map_err(Into::into),
        }
    } else {
        scalar::marshal_scalar(encoder, &field.kind(), value)
    }
}

pub(crate) fn marshal_list(
    encoder: &mut Encoder,
    field: &FieldDescriptor,
    value: &Value,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    let items = value.as_list().ok_or_else(|| SchemaError::TypeMismatch {
        name: field.name().to_string(),
        expected: "a repeated field value",
        found: "a mismatched reflective value",
    })?;
    encoder.start_array()?;
    for item in items {
        marshal_singular(encoder, field, item, options)?;
    }
    encoder.end_array()?;
    Ok(())
}

pub(crate) fn marshal_map(
    encoder: &mut Encoder,
    field: &FieldDescriptor,
    value: &Value,
    options: &MarshalOptions,
) -> Result<(), CodecError> {
    let map = value.as_map().ok_or_else(|| SchemaError::TypeMismatch {
        name: field.name().to_string(),
        expected: "a map field value",
        found: "a mismatched reflective value",
    })?;
    let (_, value_field) = map_entry_fields(field);
    let mut entries: Vec<(&MapKey, &Value)> = map.iter().collect();
    sort_map_entries(&mut entries);
    encoder.start_object()?;
    for (key, entry) in entries {
        encoder.write_name(&map_key_to_string(key))?;
        marshal_singular(encoder, &value_field, entry, options)?;
    }
    encoder.end_object()?;
    Ok(())
}

/// Unmarshals a message, dispatching to its well-known-type shape first.
pub(crate) fn unmarshal_message(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
    options: &UnmarshalOptions,
) -> Result<Outcome<()>, CodecError> {
    // Every known field, the unknown-field blob, and any set extensions are
    // wiped before decoding, so reusing a message across two calls never
    // leaves fields behind that the new JSON simply omits.
    prost::Message::clear(message);
    if well_known::is_well_known(&message.descriptor()) {
        return well_known::unmarshal_well_known(decoder, message, options);
    }
    expect_kind(decoder, JsonKind::StartObject)?;
    let mut outcome = unmarshal_fields_into(decoder, message, options)?;
    expect_kind(decoder, JsonKind::EndObject)?;
    if !options.allow_partial {
        check_required_fields(message, &mut outcome);
    }
    Ok(outcome)
}

fn check_required_fields(message: &DynamicMessage, outcome: &mut Outcome<()>) {
    for field in message.descriptor().fields() {
        if field.cardinality() == Cardinality::Required && !message.has_field(&field) {
            outcome.push_non_fatal(bomboni_reflect::NonFatalError::RequiredNotSet {
                name: field.full_name().to_string(),
            });
        }
    }
}

/// Unmarshals a message's own fields up to (not including) the closing
/// `}`, so callers already inside an open object (`Any`'s inlined
/// representation) can reuse the same per-field loop.
pub(crate) fn unmarshal_fields_into(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
    options: &UnmarshalOptions,
) -> Result<Outcome<()>, CodecError> {
    let mut outcome = Outcome::new(());
    let mut seen_numbers: HashMap<u32, ()> = HashMap::new();
    let mut seen_oneofs: HashMap<String, ()> = HashMap::new();
    loop {
        if matches!(decoder.peek()?, JsonKind::EndObject) {
            break;
        }
        let name_token = decoder.read()?;
        let name = name_token.as_str().to_string();
        if let Some(extension_name) = name.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if try_unmarshal_extension(decoder, message, extension_name, options, &mut outcome)? {
                continue;
            }
            if options.discard_unknown {
                decoder.skip_value()?;
                continue;
            }
            return Err(SchemaError::UnknownField { name }.into());
        }
        let descriptor = message.descriptor();
        let field = descriptor
            .get_field_by_json_name(&name)
            .or_else(|| descriptor.get_field_by_name(&name));
        let Some(field) = field else {
            if options.discard_unknown {
                decoder.skip_value()?;
                continue;
            }
            return Err(SchemaError::UnknownField { name }.into());
        };
        if seen_numbers.insert(field.number(), ()).is_some() {
            return Err(SchemaError::DuplicateField {
                name: field.name().to_string(),
            }
            .into());
        }
        if let Some(oneof) = field.containing_oneof() {
            if seen_oneofs.insert(oneof.name().to_string(), ()).is_some() {
                return Err(SchemaError::DuplicateOneof {
                    name: oneof.name().to_string(),
                }
                .into());
            }
        }
        if matches!(decoder.peek()?, JsonKind::Null) && !accepts_null(&field) {
            decoder.read()?;
            message.clear_field(&field);
            continue;
        }
        let value = if field.is_map() {
            unmarshal_map(decoder, &field, options, &mut outcome)?
        } else if field.is_list() {
            unmarshal_list(decoder, &field, options, &mut outcome)?
        } else {
            unmarshal_singular(decoder, &field, options, &mut outcome)?
        };
        message.set_field(&field, value);
    }
    Ok(outcome)
}

/// Returns a map field's synthetic `key`/`value` entry fields, found on the
/// map entry message that `field.kind()` points to.
fn map_entry_fields(field: &FieldDescriptor) -> (FieldDescriptor, FieldDescriptor) {
    let ProtoKind::Message(entry) = field.kind() else {
        unreachable!("map fields are always backed by a synthetic entry message")
    };
    let key_field = entry
        .get_field_by_name("key")
        .expect("map entry message has a key field");
    let value_field = entry
        .get_field_by_name("value")
        .expect("map entry message has a value field");
    (key_field, value_field)
}

fn accepts_null(field: &FieldDescriptor) -> bool {
    match field.kind() {
        ProtoKind::Message(m) => m.full_name() == "google.protobuf.Value",
        ProtoKind::Enum(e) => e.full_name() == "google.protobuf.NullValue",
        _ => false,
    }
}

pub(crate) fn unmarshal_singular(
    decoder: &mut Decoder,
    field: &FieldDescriptor,
    options: &UnmarshalOptions,
    outcome: &mut Outcome<()>,
) -> Result<Value, CodecError> {
    if let ProtoKind::Message(inner_descriptor) = field.kind() {
        let mut inner = DynamicMessage::new(inner_descriptor);
        let inner_outcome = unmarshal_message(decoder, &mut inner, options)?;
        outcome.merge_non_fatal(inner_outcome);
        Ok(Value::Message(inner))
    } else {
        scalar::unmarshal_scalar(decoder, &field.kind())
    }
}

pub(crate) fn unmarshal_list(
    decoder: &mut Decoder,
    field: &FieldDescriptor,
    options: &UnmarshalOptions,
    outcome: &mut Outcome<()>,
) -> Result<Value, CodecError> {
    expect_kind(decoder, JsonKind::StartArray)?;
    let mut items = Vec::new();
    loop {
        if matches!(decoder.peek()?, JsonKind::EndArray) {
            decoder.read()?;
            break;
        }
        items.push(unmarshal_singular(decoder, field, options, outcome)?);
    }
    Ok(Value::List(items))
}

pub(crate) fn unmarshal_map(
    decoder: &mut Decoder,
    field: &FieldDescriptor,
    options: &UnmarshalOptions,
    outcome: &mut Outcome<()>,
) -> Result<Value, CodecError> {
    let (key_field, value_field) = map_entry_fields(field);
    expect_kind(decoder, JsonKind::StartObject)?;
    let mut map = HashMap::new();
    loop {
        if matches!(decoder.peek()?, JsonKind::EndObject) {
            decoder.read()?;
            break;
        }
        let key_token = decoder.read()?;
        let key = parse_map_key(key_token.as_str(), &key_field.kind())?;
        if map.contains_key(&key) {
            return Err(SchemaError::DuplicateMapKey {
                key: key_token.as_str().to_string(),
            }
            .into());
        }
        let value = unmarshal_singular(decoder, &value_field, options, outcome)?;
        map.insert(key, value);
    }
    Ok(Value::Map(map))
}

/// Unmarshals a `[fully.qualified.extension.name]` member against a
/// resolver-supplied extension descriptor. If the bare name doesn't
/// resolve, retries with a `.message_set_extension` suffix before giving
/// up, per the `MessageSet` convention. Only singular (non-repeated,
/// non-map) extensions are supported. Returns `false` when the name cannot
/// be resolved to an extension of this message, leaving the value token
/// unconsumed so the caller can fall back to its own unknown-field policy.
fn try_unmarshal_extension(
    decoder: &mut Decoder,
    message: &mut DynamicMessage,
    full_name: &str,
    options: &UnmarshalOptions,
    outcome: &mut Outcome<()>,
) -> Result<bool, CodecError> {
    let Some(resolver) = &options.resolver else {
        return Ok(false);
    };
    let extension = match resolver.find_extension_by_name(full_name) {
        Ok(extension) => extension,
        Err(_) => {
            let message_set_name = format!("{full_name}.message_set_extension");
            match resolver.find_extension_by_name(&message_set_name) {
                Ok(extension) => extension,
                Err(_) => return Ok(false),
            }
        }
    };
    if extension.containing_message().full_name() != message.descriptor().full_name() {
        return Ok(false);
    }
    if extension.is_list() {
        return Ok(false);
    }
    let value = unmarshal_extension_value(decoder, &extension, options, outcome)?;
    message.set_extension(&extension, value);
    Ok(true)
}

fn unmarshal_extension_value(
    decoder: &mut Decoder,
    extension: &ExtensionDescriptor,
    options: &UnmarshalOptions,
    outcome: &mut Outcome<()>,
) -> Result<Value, CodecError> {
    if let ProtoKind::Message(inner_descriptor) = extension.kind() {
        let mut inner = DynamicMessage::new(inner_descriptor);
        let inner_outcome = unmarshal_message(decoder, &mut inner, options)?;
        outcome.merge_non_fatal(inner_outcome);
        Ok(Value::Message(inner))
    } else {
        scalar::unmarshal_scalar(decoder, &extension.kind())
    }
}

pub(crate) fn expect_kind(decoder: &mut Decoder, kind: JsonKind) -> Result<(), CodecError> {
    let token = decoder.read()?;
    if token.kind() == kind {
        Ok(())
    } else {
        Err(scalar::type_mismatch(
            match kind {
                JsonKind::StartObject => "an object",
                JsonKind::StartArray => "an array",
                JsonKind::EndObject => "`}`",
                _ => "a different token",
            },
            token.kind(),
        ))
    }
}
