//! Native Rust ergonomics for the generated well-known types: construction
//! helpers, canonicalization (`normalized`), and conversions to/from the
//! standard library's own time and byte types. JSON representation for
//! these types is handled generically by `bomboni_codec`, not here.

mod any;
mod duration;
mod empty;
mod field_mask;
mod struct_value;
mod timestamp;
mod wrappers;
