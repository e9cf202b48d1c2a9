use prost::Message as _;
use prost_reflect::{DynamicMessage, MessageDescriptor};

/// Wire-format protobuf marshal/unmarshal, used only to re-encode/re-decode
/// `google.protobuf.Any.value`. The codec treats this as an opaque black
/// box; it never inspects binary protobuf bytes itself.
pub trait BinaryCodec {
    fn marshal(&self, message: &DynamicMessage) -> Vec<u8>;

    fn unmarshal(
        &self,
        descriptor: MessageDescriptor,
        bytes: &[u8],
    ) -> Result<DynamicMessage, prost::DecodeError>;
}

/// The default [`BinaryCodec`], delegating straight to `prost`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProstBinaryCodec;

impl BinaryCodec for ProstBinaryCodec {
    fn marshal(&self, message: &DynamicMessage) -> Vec<u8> {
        message.encode_to_vec()
    }

    fn unmarshal(
        &self,
        descriptor: MessageDescriptor,
        bytes: &[u8],
    ) -> Result<DynamicMessage, prost::DecodeError> {
        DynamicMessage::decode(descriptor, bytes)
    }
}
