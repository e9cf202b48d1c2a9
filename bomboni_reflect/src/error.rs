use thiserror::Error;

use bomboni_json::{JsonError, NonFatalJsonError};

/// Malformed JSON, as reported by the lexer/writer.
pub type JsonSyntaxError = JsonError;

/// A structural violation of the Protobuf/JSON mapping: an unknown field
/// where none is allowed, a duplicate field or oneof, a duplicate map key,
/// or a JSON token whose kind cannot represent the target field's type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("unknown field `{name}`")]
    UnknownField { name: String },
    #[error("field `{name}` is set more than once")]
    DuplicateField { name: String },
    #[error("oneof `{name}` has more than one member set")]
    DuplicateOneof { name: String },
    #[error("duplicate map key `{key}`")]
    DuplicateMapKey { key: String },
    #[error("field `{name}` expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid base64 in bytes field: `{text}`")]
    InvalidBase64 { text: String },
    #[error("invalid enum value `{text}`")]
    InvalidEnumValue { text: String },
}

/// A value that is syntactically well-formed JSON but falls outside the
/// representable range of its target Protobuf type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("number `{text}` does not fit in {bits}-bit {signed_label}")]
    IntegerOutOfRange {
        text: String,
        bits: u8,
        signed_label: &'static str,
    },
    #[error("duration out of range: {seconds}s {nanos}ns")]
    DurationOutOfRange { seconds: i64, nanos: i32 },
    #[error("timestamp out of range: {seconds}s {nanos}ns")]
    TimestampOutOfRange { seconds: i64, nanos: i32 },
    #[error("invalid duration string `{text}`")]
    InvalidDurationFormat { text: String },
    #[error("invalid timestamp string `{text}`")]
    InvalidTimestampFormat { text: String },
}

/// A value violates a Protobuf/JSON semantic rule that is not a matter of
/// grammar or range: an `Any` with no `type_url`, a `Value` with no variant
/// set, a `FieldMask` path that cannot round-trip through camelCase.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("google.protobuf.Any has a value but no type_url")]
    AnyValueWithoutTypeUrl,
    #[error("google.protobuf.Value has no variant set")]
    ValueVariantNotSet,
    #[error("google.protobuf.Value cannot hold a non-finite number")]
    NonFiniteNumberValue,
    #[error("field mask path `{path}` does not round-trip through camelCase")]
    FieldMaskNotReversible { path: String },
}

/// A type URL or extension name could not be resolved against the host's
/// descriptor pool.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("no message type registered for type URL `{type_url}`")]
    UnknownTypeUrl { type_url: String },
    #[error("no extension registered with full name `{name}`")]
    UnknownExtension { name: String },
}

/// Unified fatal error for a single marshal or unmarshal call. The first
/// fatal error encountered aborts the traversal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error(transparent)]
    Syntax(#[from] JsonSyntaxError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("required field `{name}` is not set")]
    RequiredNotSet { name: String },
}

/// A violation that does not abort the traversal by itself; accumulated on
/// [`Outcome`] and surfaced only once the call otherwise succeeds.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NonFatalError {
    #[error(transparent)]
    InvalidUtf8(#[from] NonFatalJsonError),
    #[error("required field `{name}` is not set")]
    RequiredNotSet { name: String },
}

/// A successful result paired with any non-fatal errors accumulated along
/// the way. Fatal errors short-circuit via `Result`'s own `?` instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub non_fatal: Vec<NonFatalError>,
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            non_fatal: Vec::new(),
        }
    }

    /// Folds another outcome's non-fatal errors into this one, keeping this
    /// outcome's value.
    pub fn merge_non_fatal<U>(&mut self, other: Outcome<U>) -> U {
        self.non_fatal.extend(other.non_fatal);
        other.value
    }

    pub fn push_non_fatal(&mut self, error: impl Into<NonFatalError>) {
        self.non_fatal.push(error.into());
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            non_fatal: self.non_fatal,
        }
    }
}

/// A codec call result: fatal errors abort via `Result::Err`; non-fatal
/// ones ride along on `Outcome` and are only meaningful once the call
/// returns `Ok`.
pub type CodecResult<T> = Result<Outcome<T>, CodecError>;
