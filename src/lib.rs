#![doc = include_str!("../README.md")]

/// Common utilities and data structures.
pub mod common {
    pub use bomboni_common::*;
}

/// Core utilities shared by the rest of the library.
pub mod core {
    pub use bomboni_core::*;
}

/// Streaming JSON tokenizer and writer.
pub mod json {
    pub use bomboni_json::*;
}

/// Reflective message model backing the Protobuf/JSON codec.
pub mod reflect {
    pub use bomboni_reflect::*;
}

#[cfg(feature = "proto")]
/// Generated Protocol Buffers messages.
pub mod proto {
    pub use bomboni_proto::*;
}

#[cfg(feature = "codec")]
/// Schema-driven Protobuf/JSON codec.
pub mod codec {
    pub use bomboni_codec::*;
}
