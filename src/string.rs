//! Fixed-length text fields.

use std::{fmt, str::FromStr};

use crate::{
    cursor::{ReadCursor, WriteCursor},
    errors::{DecodeError, EncodeError, SchemaError},
    field::Codec,
    value::Value,
};

/// Text encoding of a [StringField].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// One byte per UTF-16 code unit, keeping its low 8 bits.
    #[default]
    Ascii,
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl Encoding {
    /// Decodes `bytes`, dropping NUL characters. Returns `None` if the bytes are not valid text.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        let text = match self {
            Encoding::Ascii => {
                return Some(bytes.iter().filter(|b| **b != 0).map(|b| *b as char).collect());
            }
            Encoding::Utf8 => std::str::from_utf8(bytes).ok()?.to_string(),
            Encoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes)?,
            Encoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes)?,
        };

        Some(text.replace('\0', ""))
    }

    /// Encodes `text`; UTF-16 code units are emitted in this encoding's byte order.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Ascii => text.encode_utf16().map(|unit| unit as u8).collect(),
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    let chunks = bytes.chunks_exact(2);

    // An odd trailing byte is only accepted as padding.
    if chunks.remainder().iter().any(|b| *b != 0) {
        return None;
    }

    let units = chunks.map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Ascii => "ascii",
            Encoding::Utf8 => "utf8",
            Encoding::Utf16Le => "utf16le",
            Encoding::Utf16Be => "utf16be",
        })
    }
}

impl FromStr for Encoding {
    type Err = SchemaError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_ascii_lowercase().as_str() {
            "ascii" | "latin1" | "binary" => Ok(Encoding::Ascii),
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "utf16le" | "utf-16le" | "utf16-le" | "ucs2" | "ucs-2" => Ok(Encoding::Utf16Le),
            "utf16be" | "utf-16be" | "utf16-be" => Ok(Encoding::Utf16Be),
            _ => Err(SchemaError::UnknownEncoding(tag.to_string())),
        }
    }
}

/// Text stored in exactly `length` bytes.
///
/// Shorter text leaves the rest of the slot untouched (zero in a fresh buffer);
/// longer text is clipped to the slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringField {
    length: usize,
    encoding: Encoding,
}

impl StringField {
    pub fn new(length: usize, encoding: Encoding) -> Result<Self, SchemaError> {
        if length == 0 {
            return Err(SchemaError::InvalidStringLength);
        }

        Ok(Self { length, encoding })
    }

    /// ASCII string of `length` bytes.
    pub fn ascii(length: usize) -> Result<Self, SchemaError> {
        Self::new(length, Encoding::Ascii)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl Codec for StringField {
    fn byte_size(&self) -> usize {
        self.length
    }

    fn decode_from(&self, cursor: &mut ReadCursor<'_>) -> Result<Value, DecodeError> {
        cursor.text(self.length, self.encoding)
    }

    fn encode_into(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::String(text) => cursor.text(text, self.length, self.encoding),
            Value::Bytes(bytes) => cursor.clipped(bytes, self.length),
            _ => Err(EncodeError::InvalidValue {
                expected: "string",
                found: value.kind(),
            }),
        }
    }
}
