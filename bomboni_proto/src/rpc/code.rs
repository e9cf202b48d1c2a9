//! `google.rpc.Code` is generated directly from `code.proto`; no extra
//! conversions are needed beyond what `prost` derives.
