use bomboni_codec::{marshal, unmarshal, MarshalOptions, UnmarshalOptions};
use bomboni_reflect::{DescriptorPool, DynamicMessage, MapKey, Value};

fn pool() -> DescriptorPool {
    let file_descriptor_set =
        protox::compile(["tests/proto/fixture.proto"], ["tests/proto"]).unwrap();
    DescriptorPool::from_file_descriptor_set(file_descriptor_set).unwrap()
}

fn kitchen_message(pool: &DescriptorPool) -> DynamicMessage {
    let descriptor = pool.get_message_by_name("fixture.Kitchen").unwrap();
    DynamicMessage::new(descriptor)
}

#[test]
fn scalar_kitchen_sink_round_trips() {
    let pool = pool();
    let mut message = kitchen_message(&pool);
    message.set_field_by_name("flag", Value::Bool(true));
    message.set_field_by_name("small_int", Value::I32(-7));
    message.set_field_by_name("big_int", Value::I64(-9_223_372_036_854_775_800));
    message.set_field_by_name("big_uint", Value::U64(18_446_744_073_709_551_610));
    message.set_field_by_name("ratio", Value::F32(0.5));
    message.set_field_by_name("precise_ratio", Value::F64(1.25));
    message.set_field_by_name("label", Value::String("hello".to_string()));
    message.set_field_by_name("blob", Value::Bytes(b"hi".to_vec().into()));
    message.set_field_by_name("color", Value::EnumNumber(1));

    let outcome = marshal(&message, &MarshalOptions::default()).unwrap();
    let json = String::from_utf8(outcome.value).unwrap();
    assert!(json.contains("\"bigInt\":\"-9223372036854775800\""));
    assert!(json.contains("\"bigUint\":\"18446744073709551610\""));
    assert!(json.contains("\"blob\":\"aGk=\""));
    assert!(json.contains("\"color\":\"RED\""));

    let mut decoded = kitchen_message(&pool);
    unmarshal(json.as_bytes(), &mut decoded, &UnmarshalOptions::default()).unwrap();
    assert_eq!(decoded, message);
}

#[test]
fn float_specials_are_strings() {
    let pool = pool();
    let mut message = kitchen_message(&pool);
    message.set_field_by_name("precise_ratio", Value::F64(f64::NAN.copysign(1.0)));
    let outcome = marshal(&message, &MarshalOptions::default()).unwrap();
    let json = String::from_utf8(outcome.value).unwrap();
    assert!(json.contains("\"preciseRatio\":\"NaN\""));
}

#[test]
fn map_entries_are_emitted_in_sorted_key_order() {
    let pool = pool();
    let descriptor = pool.get_message_by_name("fixture.Kitchen").unwrap();
    let field = descriptor.get_field_by_name("counts").unwrap();
    let mut message = kitchen_message(&pool);
    let mut map = std::collections::HashMap::new();
    map.insert(MapKey::String("b".to_string()), Value::I32(2));
    map.insert(MapKey::String("a".to_string()), Value::I32(1));
    message.set_field(&field, Value::Map(map));

    let outcome = marshal(&message, &MarshalOptions::default()).unwrap();
    let json = String::from_utf8(outcome.value).unwrap();
    let a_pos = json.find("\"a\"").unwrap();
    let b_pos = json.find("\"b\"").unwrap();
    assert!(a_pos < b_pos);
}

#[test]
fn unknown_enum_number_round_trips_as_number() {
    let pool = pool();
    let mut message = kitchen_message(&pool);
    message.set_field_by_name("color", Value::EnumNumber(99));
    let outcome = marshal(&message, &MarshalOptions::default()).unwrap();
    let json = String::from_utf8(outcome.value).unwrap();
    assert!(json.contains("\"color\":99"));

    let mut decoded = kitchen_message(&pool);
    unmarshal(json.as_bytes(), &mut decoded, &UnmarshalOptions::default()).unwrap();
    assert_eq!(decoded, message);
}

#[test]
fn duration_round_trips_through_any() {
    let pool = pool();
    let wrapper_descriptor = pool.get_message_by_name("fixture.Wrapper").unwrap();
    let duration_descriptor = pool.get_message_by_name("google.protobuf.Duration").unwrap();

    let mut duration = DynamicMessage::new(duration_descriptor.clone());
    duration.set_field_by_name("seconds", Value::I64(3));
    duration.set_field_by_name("nanos", Value::I32(500_000_000));

    let mut wrapper = DynamicMessage::new(wrapper_descriptor);
    wrapper.set_field_by_name("timeout", Value::Message(duration.clone()));
    let any_field = wrapper.descriptor().get_field_by_name("payload").unwrap();
    let any_descriptor = match any_field.kind() {
        bomboni_reflect::Kind::Message(m) => m,
        _ => unreachable!(),
    };
    let mut any = DynamicMessage::new(any_descriptor);
    any.set_field_by_name(
        "type_url",
        Value::String("type.googleapis.com/google.protobuf.Duration".to_string()),
    );
    use prost::Message as _;
    any.set_field_by_name("value", Value::Bytes(duration.encode_to_vec().into()));
    wrapper.set_field_by_name("payload", Value::Message(any));

    let mut options = MarshalOptions::default();
    options.resolver = Some(std::sync::Arc::new(bomboni_reflect::PoolResolver::new(
        pool.clone(),
    )));
    let outcome = marshal(&wrapper, &options).unwrap();
    let json = String::from_utf8(outcome.value).unwrap();
    assert!(json.contains("\"timeout\":\"3.500s\""));
    assert!(json.contains("\"@type\":\"type.googleapis.com/google.protobuf.Duration\""));
    assert!(json.contains("\"value\":\"3.500s\""));

    let mut unmarshal_options = UnmarshalOptions::default();
    unmarshal_options.resolver = Some(std::sync::Arc::new(bomboni_reflect::PoolResolver::new(pool)));
    let mut decoded = DynamicMessage::new(wrapper.descriptor());
    unmarshal(json.as_bytes(), &mut decoded, &unmarshal_options).unwrap();
    assert_eq!(decoded, wrapper);
}
