//! Struct: an ordered set of named fields forming one fixed-size record.

use std::collections::HashSet;

use crate::{
    cursor::{ReadCursor, WriteCursor},
    errors::{DecodeError, EncodeError, SchemaError},
    field::{Codec, FieldType},
    value::{Record, Value},
};

/// A fixed-size record: fields laid out back to back in declaration order.
///
/// The byte size is computed once in [Struct::new]. Decoding and encoding create
/// their own cursor per call, so a `Struct` can be shared freely between threads.
///
/// Bitfield flags live in the struct's own namespace: decoding inserts each flag
/// next to the other fields, and encoding looks each flag up by its own name.
#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    fields: Vec<(String, FieldType)>,
    byte_size: usize,
}

impl Struct {
    /// Builds a struct from `(name, field)` pairs in wire order.
    ///
    /// Fails if there are no fields, a name is empty, or two fields or flags would
    /// share a name.
    ///
    /// ```
    /// use bytecraft::{field::Codec, number::NumberField, schema::Struct, value::Value};
    ///
    /// let header = Struct::new([("version", NumberField::U8), ("length", NumberField::U16_LE)]).unwrap();
    /// assert_eq!(header.byte_size(), 3);
    ///
    /// let parsed = header.decode(&[0x02, 0x10, 0x00]).unwrap();
    /// assert_eq!(parsed.get("length"), Some(&Value::UInt(16)));
    /// ```
    pub fn new<I, S, F>(fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (S, F)>,
        S: Into<String>,
        F: Into<FieldType>,
    {
        let fields: Vec<(String, FieldType)> = fields
            .into_iter()
            .map(|(name, field)| (name.into(), field.into()))
            .collect();

        if fields.is_empty() {
            return Err(SchemaError::EmptyStruct);
        }

        let mut names = HashSet::new();
        for (name, field) in &fields {
            if name.is_empty() {
                return Err(SchemaError::InvalidFieldName(name.clone()));
            }
            if !names.insert(name.as_str()) {
                return Err(SchemaError::DuplicateName(name.clone()));
            }
            if let FieldType::Bitfield(bitfield) = field {
                for flag in bitfield.flag_names() {
                    if !names.insert(flag) {
                        return Err(SchemaError::DuplicateName(flag.to_string()));
                    }
                }
            }
        }

        let byte_size = fields
            .iter()
            .try_fold(0usize, |total, (_, field)| total.checked_add(field.byte_size()))
            .ok_or(SchemaError::SizeOverflow)?;

        Ok(Self { fields, byte_size })
    }

    /// Builds a struct from a JSON [crate::serde::SchemaDef].
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let def: crate::serde::SchemaDef =
            serde_json::from_str(json).map_err(|e| SchemaError::Json(e.to_string()))?;
        Self::try_from(def)
    }

    /// Fields in wire order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, field)| field)
    }

    /// Decodes one record from the start of `data`.
    ///
    /// Fails with [DecodeError::TruncatedInput] if `data` is shorter than the record.
    /// Bytes past the end of the record are ignored.
    pub fn decode(&self, data: &[u8]) -> Result<Record, DecodeError> {
        if data.len() < self.byte_size {
            return Err(DecodeError::TruncatedInput {
                needed: self.byte_size,
                actual: data.len(),
            });
        }

        self.decode_record(&mut ReadCursor::new(data))
    }

    /// Encodes `values` into a new buffer of exactly [Codec::byte_size] bytes.
    pub fn encode(&self, values: &Record) -> Result<Vec<u8>, EncodeError> {
        let mut buffer = vec![0u8; self.byte_size];
        self.encode_record(&mut WriteCursor::new(&mut buffer), values)?;
        Ok(buffer)
    }

    fn decode_record(&self, cursor: &mut ReadCursor<'_>) -> Result<Record, DecodeError> {
        let mut record = Record::new();

        for (name, field) in &self.fields {
            match field {
                FieldType::Bitfield(bitfield) => bitfield.decode_flags(cursor, &mut record)?,
                _ => {
                    record.insert(name.clone(), field.decode_from(cursor)?);
                }
            }
        }

        Ok(record)
    }

    fn encode_record(
        &self,
        cursor: &mut WriteCursor<'_>,
        values: &Record,
    ) -> Result<(), EncodeError> {
        for (name, field) in &self.fields {
            match field {
                FieldType::Bitfield(bitfield) => {
                    // Flags may also be grouped under the bitfield's own name.
                    let grouped = values.get(name).and_then(Value::as_record);
                    bitfield.encode_flags(cursor, |flag| {
                        grouped
                            .and_then(|group| group.get(flag))
                            .or_else(|| values.get(flag))
                    })?;
                }
                _ => {
                    let value = values
                        .get(name)
                        .ok_or_else(|| EncodeError::MissingField(name.clone()))?;
                    field.encode_into(cursor, value)?;
                }
            }
        }

        Ok(())
    }
}

impl Codec for Struct {
    fn byte_size(&self) -> usize {
        self.byte_size
    }

    fn decode_from(&self, cursor: &mut ReadCursor<'_>) -> Result<Value, DecodeError> {
        Ok(Value::Struct(self.decode_record(cursor)?))
    }

    fn encode_into(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Struct(values) => self.encode_record(cursor, values),
            _ => Err(EncodeError::InvalidValue {
                expected: "struct",
                found: value.kind(),
            }),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::SchemaDef> for Struct {
    type Error = SchemaError;

    fn try_from(value: crate::serde::SchemaDef) -> Result<Self, Self::Error> {
        let mut fields = Vec::with_capacity(value.fields.len());
        for def in value.fields {
            fields.push((def.name, FieldType::try_from(def.field_type)?));
        }

        Struct::new(fields)
    }
}
