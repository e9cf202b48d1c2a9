//! The reflective message model and error types behind Bomboni's
//! Protobuf/JSON codec.
//!
//! The codec in `bomboni_codec` is written against a fixed capability set:
//! descriptor and value introspection, a type-URL/extension [`Resolver`],
//! and a [`BinaryCodec`] for re-encoding `Any.value`. The descriptor/value
//! half of that capability set is already exactly what `prost_reflect`
//! provides (`MessageDescriptor`, `FieldDescriptor`, `DynamicMessage`,
//! `Value`), so this crate re-exports it rather than wrapping it behind a
//! second, parallel trait with only one implementation. `Resolver` and
//! `BinaryCodec` are the genuinely new seams.

pub mod codec;
pub mod error;
pub mod resolver;

pub use codec::{BinaryCodec, ProstBinaryCodec};
pub use error::{
    CodecError, CodecResult, NonFatalError, Outcome, RangeError, ResolutionError, SchemaError,
    SemanticError,
};
pub use resolver::{type_name_from_url, PoolResolver, Resolver};

pub use prost_reflect::{
    Cardinality, DescriptorPool, DynamicMessage, ExtensionDescriptor, FieldDescriptor, Kind,
    MapKey, MessageDescriptor, OneofDescriptor, ReflectMessage, Value,
};
