use std::str::FromStr;

use bomboni_proto::google::protobuf::{Any, Duration, Empty, FieldMask, Struct, Timestamp};
use bomboni_proto::google::rpc::{Code, Status};

#[test]
fn duration_display_round_trips() {
    let d = Duration::new(12, 345_000_000);
    let text = d.to_string();
    assert_eq!(Duration::from_str(&text).unwrap(), d);
}

#[test]
fn timestamp_display_round_trips() {
    let t = Timestamp::new(1_700_000_000, 500_000_000);
    let text = t.to_string();
    assert_eq!(Timestamp::from_str(&text).unwrap(), t);
}

#[test]
fn field_mask_masks_prefixes() {
    let mask = FieldMask::from(["user.name", "user.email"]);
    assert!(mask.masks("user.name"));
    assert!(!mask.masks("user.phone"));
}

#[test]
fn struct_round_trips_through_json() {
    let json = serde_json::json!({"a": 1, "b": [true, null, "x"]});
    let s: Struct = json.clone().into();
    let back: serde_json::Value = s.into();
    assert_eq!(back, json);
}

#[test]
fn any_pack_unpack_round_trips() {
    let status = Status::new(Code::NotFound, "missing".into(), vec![]);
    let any = Any::pack_from(&status).unwrap();
    assert_eq!(any.type_url, "type.googleapis.com/google.rpc.Status");
    let decoded: Status = any.unpack_into().unwrap();
    assert_eq!(decoded, status);
    assert!(Any::pack_from(&status)
        .unwrap()
        .unpack_into::<Empty>()
        .is_err());
}
