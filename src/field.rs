//! Field descriptors: the [Codec] trait and the closed [FieldType] set.

use crate::{
    array::ArrayField,
    bitfield::BitfieldField,
    cursor::{ReadCursor, WriteCursor},
    errors::{DecodeError, EncodeError},
    number::NumberField,
    schema::Struct,
    string::StringField,
    value::Value,
};

/// Fixed-size decode and encode over an explicit cursor.
///
/// Implementors are immutable descriptors; every call gets its own cursor, so one
/// descriptor can serve any number of concurrent calls.
pub trait Codec {
    /// Number of bytes this field occupies, fixed at construction.
    fn byte_size(&self) -> usize;

    /// Reads exactly [Codec::byte_size] bytes at the cursor.
    fn decode_from(&self, cursor: &mut ReadCursor<'_>) -> Result<Value, DecodeError>;

    /// Writes exactly [Codec::byte_size] bytes at the cursor, skipping bytes it leaves unset.
    fn encode_into(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<(), EncodeError>;

    /// Decodes from the start of `data`, which must hold at least [Codec::byte_size] bytes.
    fn from_bytes(&self, data: &[u8]) -> Result<Value, DecodeError> {
        let needed = self.byte_size();
        if data.len() < needed {
            return Err(DecodeError::TruncatedInput {
                needed,
                actual: data.len(),
            });
        }

        self.decode_from(&mut ReadCursor::new(data))
    }

    /// Encodes into a fresh zero-filled buffer of [Codec::byte_size] bytes.
    fn to_bytes(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        let mut buffer = vec![0u8; self.byte_size()];
        self.encode_into(&mut WriteCursor::new(&mut buffer), value)?;
        Ok(buffer)
    }
}

/// Every kind of field a [Struct] can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Number(NumberField),
    Array(ArrayField),
    String(StringField),
    /// Flags are flattened into the enclosing struct when decoded as part of one.
    Bitfield(BitfieldField),
    Struct(Struct),
}

impl Codec for FieldType {
    fn byte_size(&self) -> usize {
        match self {
            FieldType::Number(field) => field.byte_size(),
            FieldType::Array(field) => field.byte_size(),
            FieldType::String(field) => field.byte_size(),
            FieldType::Bitfield(field) => field.byte_size(),
            FieldType::Struct(field) => field.byte_size(),
        }
    }

    fn decode_from(&self, cursor: &mut ReadCursor<'_>) -> Result<Value, DecodeError> {
        match self {
            FieldType::Number(field) => field.decode_from(cursor),
            FieldType::Array(field) => field.decode_from(cursor),
            FieldType::String(field) => field.decode_from(cursor),
            FieldType::Bitfield(field) => field.decode_from(cursor),
            FieldType::Struct(field) => field.decode_from(cursor),
        }
    }

    fn encode_into(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<(), EncodeError> {
        match self {
            FieldType::Number(field) => field.encode_into(cursor, value),
            FieldType::Array(field) => field.encode_into(cursor, value),
            FieldType::String(field) => field.encode_into(cursor, value),
            FieldType::Bitfield(field) => field.encode_into(cursor, value),
            FieldType::Struct(field) => field.encode_into(cursor, value),
        }
    }
}

impl From<NumberField> for FieldType {
    fn from(value: NumberField) -> Self {
        FieldType::Number(value)
    }
}

impl From<ArrayField> for FieldType {
    fn from(value: ArrayField) -> Self {
        FieldType::Array(value)
    }
}

impl From<StringField> for FieldType {
    fn from(value: StringField) -> Self {
        FieldType::String(value)
    }
}

impl From<BitfieldField> for FieldType {
    fn from(value: BitfieldField) -> Self {
        FieldType::Bitfield(value)
    }
}

impl From<Struct> for FieldType {
    fn from(value: Struct) -> Self {
        FieldType::Struct(value)
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::FieldTypeDef> for FieldType {
    type Error = crate::errors::SchemaError;

    fn try_from(value: crate::serde::FieldTypeDef) -> Result<Self, Self::Error> {
        use crate::serde::{ComplexDef, FieldTypeDef};

        match value {
            FieldTypeDef::Number(tag) => Ok(FieldType::Number(tag.parse()?)),
            FieldTypeDef::Complex(ComplexDef::String { length, encoding }) => {
                let encoding = match encoding {
                    Some(tag) => tag.parse()?,
                    None => Default::default(),
                };
                Ok(FieldType::String(StringField::new(length, encoding)?))
            }
            FieldTypeDef::Complex(ComplexDef::Array { element, count }) => {
                let element = FieldType::try_from(*element)?;
                Ok(FieldType::Array(ArrayField::new(element, count)?))
            }
            FieldTypeDef::Complex(ComplexDef::Bitfield { words, flags }) => {
                let words = FieldType::try_from(*words)?;
                Ok(FieldType::Bitfield(BitfieldField::new(words, flags)?))
            }
            FieldTypeDef::Complex(ComplexDef::Struct { fields }) => {
                let def = crate::serde::SchemaDef { fields };
                Ok(FieldType::Struct(Struct::try_from(def)?))
            }
        }
    }
}
