//! Streaming, allocation-light JSON tokenizer and writer.
//!
//! This crate implements the two leaf layers of Bomboni's Protobuf/JSON
//! codec: a grammar-checking lexer ([`decoder::Decoder`]) that defers all
//! numeric interpretation to the caller, and a state-tracking writer
//! ([`encoder::Encoder`]) that inserts punctuation and indentation without
//! needing a DOM. Neither layer knows anything about Protobuf; they only
//! understand JSON's own grammar.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod token;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{JsonError, NonFatalJsonError, Position};
pub use token::{float_from_text, int_from_text, uint_from_text, Kind, Token};
