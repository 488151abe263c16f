//! JSON-deserializable struct description.
//!
//! These types describe the *layout* of a record. They are meant to be loaded from
//! JSON (for example a layout file shipped next to the data it describes) and then
//! converted into a [crate::schema::Struct] with `TryFrom` or [crate::schema::Struct::from_json].
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "age",    "type": "uint8" },
//!     { "name": "height", "type": "uint16le" },
//!     { "name": "name",   "type": { "string": { "length": 6, "encoding": "utf8" } } },
//!     { "name": "scores", "type": { "array": { "element": "int16be", "count": 4 } } },
//!     { "name": "flags",  "type": { "bitfield": { "words": "uint8", "flags": ["a", null, "b"] } } }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Top-level record layout.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchemaDef {
    /// Fields in wire order.
    pub fields: Vec<FieldDef>,
}

/// One named field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    /// Key of the field in decoded records.
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldTypeDef,
}

/// Either a number tag such as `"uint16le"` or a composite field.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum FieldTypeDef {
    /// Number tag, parsed with [crate::number::NumberField]'s `FromStr`.
    Number(String),
    Complex(ComplexDef),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum ComplexDef {
    String {
        /// Size in bytes.
        length: usize,
        /// Encoding tag; ascii when absent.
        #[serde(default)]
        encoding: Option<String>,
    },
    Array {
        element: Box<FieldTypeDef>,
        count: usize,
    },
    Bitfield {
        /// An integer number tag or an array of one.
        words: Box<FieldTypeDef>,
        /// Flag names from the least significant bit up; `null` skips a bit.
        flags: Vec<Option<String>>,
    },
    Struct {
        fields: Vec<FieldDef>,
    },
}

#[cfg(test)]
mod tests {
    use crate::{
        errors::SchemaError,
        field::{Codec, FieldType},
        number::NumberField,
        schema::Struct,
        string::Encoding,
        value::Value,
    };

    const LAYOUT: &str = r#"{
        "fields": [
            { "name": "age", "type": "uint8" },
            { "name": "height", "type": "UInt16LE" },
            { "name": "flags", "type": { "bitfield": {
                "words": "uint16le",
                "flags": ["one", "two", null, "three", null, null, null, "four", null, null, "five", "six"]
            } } },
            { "name": "length", "type": "uint32le" }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let schema = Struct::from_json(LAYOUT).unwrap();
        assert_eq!(schema.byte_size(), 9);

        let decoded = schema
            .decode(&[21, 0x52, 0x22, 0x85, 0x77, 0x05, 0x12, 0x88, 0x63])
            .unwrap();
        assert_eq!(decoded["height"], Value::UInt(0x2252));
        assert_eq!(decoded["five"], Value::Bool(true));
        assert_eq!(decoded["length"], Value::UInt(0x63881205));
    }

    #[test]
    fn test_composite_fields() {
        let schema = Struct::from_json(
            r#"{ "fields": [
                { "name": "name", "type": { "string": { "length": 6, "encoding": "utf-16le" } } },
                { "name": "code", "type": { "string": { "length": 2 } } },
                { "name": "scores", "type": { "array": { "element": "int16", "count": 4 } } },
                { "name": "point", "type": { "struct": { "fields": [
                    { "name": "x", "type": "float" },
                    { "name": "y", "type": "floatle" }
                ] } } }
            ] }"#,
        )
        .unwrap();

        assert_eq!(schema.byte_size(), 6 + 2 + 8 + 8);

        match schema.get("name") {
            Some(FieldType::String(field)) => assert_eq!(field.encoding(), Encoding::Utf16Le),
            other => panic!("unexpected field {other:?}"),
        }
        match schema.get("code") {
            Some(FieldType::String(field)) => assert_eq!(field.encoding(), Encoding::Ascii),
            other => panic!("unexpected field {other:?}"),
        }
        match schema.get("scores") {
            Some(FieldType::Array(field)) => {
                assert_eq!(field.element(), &FieldType::Number(NumberField::I16_BE));
            }
            other => panic!("unexpected field {other:?}"),
        }
    }

    #[test]
    fn test_unknown_tags() {
        assert_eq!(
            Struct::from_json(r#"{ "fields": [ { "name": "a", "type": "uint12" } ] }"#)
                .unwrap_err(),
            SchemaError::UnknownFieldType("uint12".to_string())
        );
        assert_eq!(
            Struct::from_json(
                r#"{ "fields": [ { "name": "a", "type": { "string": { "length": 2, "encoding": "ebcdic" } } } ] }"#
            )
            .unwrap_err(),
            SchemaError::UnknownEncoding("ebcdic".to_string())
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Struct::from_json(r#"{ "fields": 3 }"#),
            Err(SchemaError::Json(_))
        ));
    }

    #[test]
    fn test_invalid_bitfield_words() {
        assert_eq!(
            Struct::from_json(
                r#"{ "fields": [ { "name": "f", "type": { "bitfield": { "words": "float", "flags": ["a"] } } } ] }"#
            )
            .unwrap_err(),
            SchemaError::InvalidBitfieldWords
        );
    }

    #[test]
    fn test_decoded_record_serializes() {
        let schema = Struct::from_json(LAYOUT).unwrap();
        let decoded = schema
            .decode(&[21, 0x52, 0x22, 0x85, 0x77, 0x05, 0x12, 0x88, 0x63])
            .unwrap();

        let json = serde_json::to_value(&decoded).unwrap();
        assert_eq!(json["age"], serde_json::json!(21));
        assert_eq!(json["one"], serde_json::json!(true));
    }
}
