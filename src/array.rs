//! Fixed-count arrays of one element type.

use crate::{
    cursor::{ReadCursor, WriteCursor},
    errors::{DecodeError, EncodeError, SchemaError},
    field::{Codec, FieldType},
    value::Value,
};

/// `count` consecutive elements of the same field type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayField {
    element: Box<FieldType>,
    count: usize,
    byte_size: usize,
}

impl ArrayField {
    /// Builds an array of `count` elements. Fails if `count` is zero or the total size overflows.
    pub fn new(element: impl Into<FieldType>, count: usize) -> Result<Self, SchemaError> {
        if count == 0 {
            return Err(SchemaError::InvalidArrayCount);
        }

        let element = Box::new(element.into());
        let byte_size = element
            .byte_size()
            .checked_mul(count)
            .ok_or(SchemaError::SizeOverflow)?;

        Ok(Self {
            element,
            count,
            byte_size,
        })
    }

    pub fn element(&self) -> &FieldType {
        &self.element
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Codec for ArrayField {
    fn byte_size(&self) -> usize {
        self.byte_size
    }

    fn decode_from(&self, cursor: &mut ReadCursor<'_>) -> Result<Value, DecodeError> {
        let mut values = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            values.push(self.element.decode_from(cursor)?);
        }

        Ok(Value::Array(values))
    }

    /// Writes up to `count` elements. Missing trailing elements are skipped, extra ones dropped.
    fn encode_into(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<(), EncodeError> {
        let written = match value {
            Value::Array(items) => {
                for item in items.iter().take(self.count) {
                    self.element.encode_into(cursor, item)?;
                }
                items.len().min(self.count)
            }
            Value::Bytes(bytes) => {
                for byte in bytes.iter().take(self.count) {
                    self.element.encode_into(cursor, &Value::UInt(*byte as u64))?;
                }
                bytes.len().min(self.count)
            }
            _ => {
                return Err(EncodeError::InvalidValue {
                    expected: "array",
                    found: value.kind(),
                });
            }
        };

        cursor.skip((self.count - written) * self.element.byte_size())
    }
}
