//! Fixed-layout binary record codec.
//!
//! A record layout is a [schema::Struct]: an ordered list of named fields, each a
//! number, a fixed-count array, a fixed-size string, a bitfield of named flags, or
//! another struct. Every field has a byte size known up front, so a struct always
//! reads and writes exactly [field::Codec::byte_size] bytes.
//!
//! ```
//! use bytecraft::{
//!     bitfield::BitfieldField,
//!     field::FieldType,
//!     number::NumberField,
//!     schema::Struct,
//!     string::StringField,
//!     value::Value,
//! };
//!
//! let schema = Struct::new([
//!     ("name", FieldType::from(StringField::ascii(6).unwrap())),
//!     ("age", NumberField::U8.into()),
//!     ("flags", BitfieldField::new(NumberField::U8, [Some("admin"), Some("banned")]).unwrap().into()),
//! ])
//! .unwrap();
//!
//! let record = schema.decode(b"\x05devon\x15\x01").unwrap();
//! assert_eq!(record["name"], Value::from("\x05devon"));
//! assert_eq!(record["age"], Value::UInt(21));
//! assert_eq!(record["admin"], Value::Bool(true));
//!
//! assert_eq!(schema.encode(&record).unwrap(), b"\x05devon\x15\x01");
//! ```

pub mod array;
pub mod bitfield;
pub mod cursor;
pub mod errors;
pub mod field;
pub mod number;
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;
pub mod string;
pub mod value;
