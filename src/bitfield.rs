//! Named boolean flags packed into integer words.
//!
//! Flags are assigned to bits in declaration order, starting at bit 0 (the least
//! significant bit) of the first word. When the words are an array, flag `i` lives
//! in word `i / bits_per_word` at bit `i % bits_per_word`.

use std::collections::HashSet;

use crate::{
    cursor::{ReadCursor, WriteCursor},
    errors::{DecodeError, EncodeError, SchemaError},
    field::{Codec, FieldType},
    number::NumberField,
    value::{Record, Value},
};

/// Integer storage behind a [BitfieldField].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitfieldWords {
    /// One integer.
    Single(NumberField),
    /// `count` integers of the same type, filled in array order.
    Array { element: NumberField, count: usize },
}

impl BitfieldWords {
    pub fn word(&self) -> NumberField {
        match *self {
            BitfieldWords::Single(word) => word,
            BitfieldWords::Array { element, .. } => element,
        }
    }

    pub fn count(&self) -> usize {
        match *self {
            BitfieldWords::Single(_) => 1,
            BitfieldWords::Array { count, .. } => count,
        }
    }

    pub fn bits_per_word(&self) -> usize {
        self.word().width() * 8
    }

    /// Total number of bits available for flags, saturating at `usize::MAX`.
    pub fn capacity(&self) -> usize {
        self.bits_per_word().saturating_mul(self.count())
    }
}

impl TryFrom<FieldType> for BitfieldWords {
    type Error = SchemaError;

    fn try_from(value: FieldType) -> Result<Self, Self::Error> {
        match value {
            FieldType::Number(word) if word.is_integer() => Ok(BitfieldWords::Single(word)),
            FieldType::Array(array) => match array.element() {
                FieldType::Number(element) if element.is_integer() => Ok(BitfieldWords::Array {
                    element: *element,
                    count: array.count(),
                }),
                _ => Err(SchemaError::InvalidBitfieldWords),
            },
            _ => Err(SchemaError::InvalidBitfieldWords),
        }
    }
}

/// Boolean flags mapped onto the bits of one or more integer words.
///
/// A `None` entry in the flag list reserves a bit that is never surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitfieldField {
    words: BitfieldWords,
    flags: Vec<Option<String>>,
}

impl BitfieldField {
    /// Builds a bitfield over an integer field or an array of integer fields.
    ///
    /// ```
    /// use bytecraft::{bitfield::BitfieldField, field::Codec, number::NumberField};
    ///
    /// let flags = BitfieldField::new(NumberField::U8, [Some("ready"), None, Some("error")]).unwrap();
    /// let value = flags.from_bytes(&[0b101]).unwrap();
    /// assert_eq!(value.as_record().unwrap()["error"].as_bool(), Some(true));
    /// ```
    pub fn new<I, S>(words: impl Into<FieldType>, flags: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let words = BitfieldWords::try_from(words.into())?;
        let flags: Vec<Option<String>> = flags.into_iter().map(|f| f.map(Into::into)).collect();

        if flags.len() > words.capacity() {
            return Err(SchemaError::TooManyFlags {
                flags: flags.len(),
                capacity: words.capacity(),
            });
        }

        let mut seen = HashSet::new();
        for name in flags.iter().flatten() {
            if name.is_empty() {
                return Err(SchemaError::InvalidFieldName(name.clone()));
            }
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateName(name.clone()));
            }
        }

        Ok(Self { words, flags })
    }

    pub fn words(&self) -> BitfieldWords {
        self.words
    }

    /// Declared flag names, including unnamed bits.
    pub fn flags(&self) -> &[Option<String>] {
        &self.flags
    }

    /// Names of the surfaced flags, in bit order.
    pub fn flag_names(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().flatten().map(String::as_str)
    }

    /// Reads every word and inserts one boolean per named flag into `out`.
    pub(crate) fn decode_flags(
        &self,
        cursor: &mut ReadCursor<'_>,
        out: &mut Record,
    ) -> Result<(), DecodeError> {
        let word = self.words.word();
        let bits_per_word = self.words.bits_per_word();

        for index in 0..self.words.count() {
            let bits = word.read_bits(cursor)?;
            let start = index * bits_per_word;

            for bit in 0..bits_per_word {
                if let Some(Some(name)) = self.flags.get(start + bit) {
                    out.insert(name.clone(), Value::Bool((bits >> bit) & 1 == 1));
                }
            }
        }

        Ok(())
    }

    /// Packs the truthy flags returned by `lookup` and writes every word, set or not.
    pub(crate) fn encode_flags<'v>(
        &self,
        cursor: &mut WriteCursor<'_>,
        lookup: impl Fn(&str) -> Option<&'v Value>,
    ) -> Result<(), EncodeError> {
        let word = self.words.word();
        let bits_per_word = self.words.bits_per_word();

        for index in 0..self.words.count() {
            let start = index * bits_per_word;
            let mut bits = 0u64;

            for bit in 0..bits_per_word {
                if let Some(Some(name)) = self.flags.get(start + bit) {
                    if lookup(name).is_some_and(Value::is_truthy) {
                        bits |= 1 << bit;
                    }
                }
            }

            word.write_bits(cursor, bits)?;
        }

        Ok(())
    }
}

impl Codec for BitfieldField {
    fn byte_size(&self) -> usize {
        self.words.word().width() * self.words.count()
    }

    fn decode_from(&self, cursor: &mut ReadCursor<'_>) -> Result<Value, DecodeError> {
        let mut flags = Record::new();
        self.decode_flags(cursor, &mut flags)?;
        Ok(Value::Struct(flags))
    }

    fn encode_into(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Struct(flags) => self.encode_flags(cursor, |name| flags.get(name)),
            _ => Err(EncodeError::InvalidValue {
                expected: "struct of flags",
                found: value.kind(),
            }),
        }
    }
}
