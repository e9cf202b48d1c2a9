//! Schema-driven Protobuf/JSON codec.
//!
//! Marshals a reflective [`DynamicMessage`] to the canonical JSON
//! representation defined by the Protobuf/JSON mapping, and parses that
//! representation back into a message, populating every field with
//! type-correct values. Scalar conversion lives in [`scalar`], the
//! generic per-field traversal in [`message`], and well-known-type
//! overrides (`Duration`, `Timestamp`, `Any`, ...) in [`well_known`].
//! The lexer and writer underneath are [`bomboni_json`]; the descriptor
//! and value model is [`bomboni_reflect`].

mod message;
mod options;
mod scalar;
mod well_known;

pub use options::{MarshalOptions, UnmarshalOptions};

use bomboni_json::{Decoder, Encoder};
use bomboni_reflect::{CodecResult, DynamicMessage, Outcome};

/// Marshals `message` into its canonical JSON byte representation.
pub fn marshal(message: &DynamicMessage, options: &MarshalOptions) -> CodecResult<Vec<u8>> {
    let mut encoder = match &options.indent {
        Some(indent) => Encoder::with_indent(indent.clone())?,
        None => Encoder::new(),
    };
    message::marshal_message(&mut encoder, message, options)?;
    Ok(Outcome::new(encoder.into_bytes()))
}

/// Unmarshals `bytes` into `message`. `message` is cleared first, so any
/// fields, unknown-field data, or extensions it held before the call are
/// gone regardless of whether the JSON mentions them.
pub fn unmarshal(
    bytes: &[u8],
    message: &mut DynamicMessage,
    options: &UnmarshalOptions,
) -> CodecResult<()> {
    let mut decoder = Decoder::new(bytes);
    let mut outcome = message::unmarshal_message(&mut decoder, message, options)?;
    // A well-formed single top-level value followed by anything but
    // whitespace is rejected by the decoder itself as TrailingData.
    decoder.read()?;
    for error in decoder.take_non_fatal() {
        outcome.push_non_fatal(error);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmarshal_rejects_trailing_data() {
        let decoder_input = b"{}x";
        let mut decoder = Decoder::new(decoder_input);
        assert!(decoder.skip_value().is_ok());
        assert!(decoder.read().is_err());
    }
}
