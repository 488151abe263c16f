//! Error types for schema construction, decoding and encoding.

use thiserror::Error;

/// Errors produced while building a field or a [crate::schema::Struct].
///
/// A schema that failed to build is never usable; there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Number type tag is not one of the known names.
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),
    /// Text encoding tag is not one of the known names or aliases.
    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),
    /// Width is not valid for the number kind.
    #[error("invalid width {width} for {kind} number")]
    InvalidWidth { width: usize, kind: &'static str },
    /// Array count is zero.
    #[error("array count must be positive")]
    InvalidArrayCount,
    /// String length is zero.
    #[error("string length must be positive")]
    InvalidStringLength,
    /// Bitfield words are not an integer or an array of integers.
    #[error("bitfield must be backed by an integer or an array of integers")]
    InvalidBitfieldWords,
    /// More flags were declared than the words can hold.
    #[error("bitfield declares {flags} flags but only has {capacity} bits")]
    TooManyFlags { flags: usize, capacity: usize },
    /// Field or flag name is empty.
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),
    /// Two fields or flags share one output name.
    #[error("duplicate name in record: {0}")]
    DuplicateName(String),
    /// Struct has no fields.
    #[error("struct must have at least one field")]
    EmptyStruct,
    /// Total byte size does not fit in `usize`.
    #[error("field byte size overflows usize")]
    SizeOverflow,
    /// JSON schema definition could not be parsed.
    #[cfg(feature = "serde")]
    #[error("invalid schema definition: {0}")]
    Json(String),
}

/// Errors produced when decoding bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read went past the end of the buffer.
    #[error("read past the end of the buffer")]
    OutOfBounds,
    /// Input is shorter than the fixed size of the record.
    #[error("input too short: need {needed} bytes, got {actual}")]
    TruncatedInput { needed: usize, actual: usize },
}

/// Errors produced when encoding values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A write went past the end of the buffer.
    #[error("write past the end of the buffer")]
    OutOfBounds,
    /// No value was supplied for a field.
    #[error("missing value for field {0}")]
    MissingField(String),
    /// The value cannot be written by this field.
    #[error("invalid value: expected {expected}, found {found}")]
    InvalidValue {
        expected: &'static str,
        found: &'static str,
    },
}
