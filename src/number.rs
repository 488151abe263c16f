//! Fixed-width integer and floating-point fields.

use std::{fmt, str::FromStr};

use crate::{
    cursor::{Endian, ReadCursor, WriteCursor},
    errors::{DecodeError, EncodeError, SchemaError},
    field::Codec,
    value::Value,
};

/// How the bytes of a [NumberField] are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Unsigned,
    Signed,
    Float,
}

impl NumberKind {
    fn name(self) -> &'static str {
        match self {
            NumberKind::Unsigned => "unsigned",
            NumberKind::Signed => "signed",
            NumberKind::Float => "float",
        }
    }
}

/// A 1, 2, 3, 4 or 8 byte number with a fixed byte order.
///
/// Integers may use any of the widths, floats only 4 (`f32`) and 8 (`f64`).
/// Writing a value that does not fit the width wraps it to the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberField {
    kind: NumberKind,
    width: usize,
    endian: Endian,
}

impl NumberField {
    pub const U8: Self = Self::raw(NumberKind::Unsigned, 1, Endian::Big);
    pub const I8: Self = Self::raw(NumberKind::Signed, 1, Endian::Big);

    pub const U16_BE: Self = Self::raw(NumberKind::Unsigned, 2, Endian::Big);
    pub const U16_LE: Self = Self::raw(NumberKind::Unsigned, 2, Endian::Little);
    pub const I16_BE: Self = Self::raw(NumberKind::Signed, 2, Endian::Big);
    pub const I16_LE: Self = Self::raw(NumberKind::Signed, 2, Endian::Little);

    pub const U24_BE: Self = Self::raw(NumberKind::Unsigned, 3, Endian::Big);
    pub const U24_LE: Self = Self::raw(NumberKind::Unsigned, 3, Endian::Little);
    pub const I24_BE: Self = Self::raw(NumberKind::Signed, 3, Endian::Big);
    pub const I24_LE: Self = Self::raw(NumberKind::Signed, 3, Endian::Little);

    pub const U32_BE: Self = Self::raw(NumberKind::Unsigned, 4, Endian::Big);
    pub const U32_LE: Self = Self::raw(NumberKind::Unsigned, 4, Endian::Little);
    pub const I32_BE: Self = Self::raw(NumberKind::Signed, 4, Endian::Big);
    pub const I32_LE: Self = Self::raw(NumberKind::Signed, 4, Endian::Little);

    pub const U64_BE: Self = Self::raw(NumberKind::Unsigned, 8, Endian::Big);
    pub const U64_LE: Self = Self::raw(NumberKind::Unsigned, 8, Endian::Little);
    pub const I64_BE: Self = Self::raw(NumberKind::Signed, 8, Endian::Big);
    pub const I64_LE: Self = Self::raw(NumberKind::Signed, 8, Endian::Little);

    pub const F32_BE: Self = Self::raw(NumberKind::Float, 4, Endian::Big);
    pub const F32_LE: Self = Self::raw(NumberKind::Float, 4, Endian::Little);
    pub const F64_BE: Self = Self::raw(NumberKind::Float, 8, Endian::Big);
    pub const F64_LE: Self = Self::raw(NumberKind::Float, 8, Endian::Little);

    // Unqualified names are big-endian.
    pub const U16: Self = Self::U16_BE;
    pub const I16: Self = Self::I16_BE;
    pub const U24: Self = Self::U24_BE;
    pub const I24: Self = Self::I24_BE;
    pub const U32: Self = Self::U32_BE;
    pub const I32: Self = Self::I32_BE;
    pub const U64: Self = Self::U64_BE;
    pub const I64: Self = Self::I64_BE;
    pub const F32: Self = Self::F32_BE;
    pub const F64: Self = Self::F64_BE;

    const fn raw(kind: NumberKind, width: usize, endian: Endian) -> Self {
        Self {
            kind,
            width,
            endian,
        }
    }

    /// Builds a number field, checking that `width` is valid for `kind`.
    pub fn new(kind: NumberKind, width: usize, endian: Endian) -> Result<Self, SchemaError> {
        let valid = match kind {
            NumberKind::Unsigned | NumberKind::Signed => matches!(width, 1 | 2 | 3 | 4 | 8),
            NumberKind::Float => matches!(width, 4 | 8),
        };

        if !valid {
            return Err(SchemaError::InvalidWidth {
                width,
                kind: kind.name(),
            });
        }

        Ok(Self::raw(kind, width, endian))
    }

    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn is_integer(&self) -> bool {
        self.kind != NumberKind::Float
    }

    /// Reads the raw integer bit pattern, zero-extended to 64 bits.
    pub(crate) fn read_bits(&self, cursor: &mut ReadCursor<'_>) -> Result<u64, DecodeError> {
        Ok(match self.width {
            1 => cursor.u8()? as u64,
            2 => cursor.u16(self.endian)? as u64,
            3 => cursor.u24(self.endian)? as u64,
            4 => cursor.u32(self.endian)? as u64,
            _ => cursor.u64(self.endian)?,
        })
    }

    /// Writes the low `width * 8` bits of `bits`.
    pub(crate) fn write_bits(
        &self,
        cursor: &mut WriteCursor<'_>,
        bits: u64,
    ) -> Result<(), EncodeError> {
        match self.width {
            1 => cursor.u8(bits as u8),
            2 => cursor.u16(bits as u16, self.endian),
            3 => cursor.u24(bits as u32, self.endian),
            4 => cursor.u32(bits as u32, self.endian),
            _ => cursor.u64(bits, self.endian),
        }
    }

    fn read_signed(&self, cursor: &mut ReadCursor<'_>) -> Result<i64, DecodeError> {
        Ok(match self.width {
            1 => cursor.i8()? as i64,
            2 => cursor.i16(self.endian)? as i64,
            3 => cursor.i24(self.endian)? as i64,
            4 => cursor.i32(self.endian)? as i64,
            _ => cursor.i64(self.endian)?,
        })
    }

    fn write_signed(&self, cursor: &mut WriteCursor<'_>, value: i64) -> Result<(), EncodeError> {
        match self.width {
            1 => cursor.i8(value as i8),
            2 => cursor.i16(value as i16, self.endian),
            3 => cursor.i24(value as i32, self.endian),
            4 => cursor.i32(value as i32, self.endian),
            _ => cursor.i64(value, self.endian),
        }
    }
}

/// Truncates toward zero and wraps modulo 2^64. NaN and infinities become 0.
fn float_bits(value: f64) -> u64 {
    if !value.is_finite() {
        return 0;
    }

    let magnitude = value.trunc().abs().rem_euclid(2f64.powi(64)) as u64;
    if value < 0.0 {
        magnitude.wrapping_neg()
    } else {
        magnitude
    }
}

/// Integer bit pattern of a value, wrapping anything out of range.
fn integer_bits(value: &Value) -> Result<u64, EncodeError> {
    match *value {
        Value::UInt(v) => Ok(v),
        Value::Int(v) => Ok(v as u64),
        Value::Float(v) => Ok(float_bits(v)),
        Value::Bool(v) => Ok(v as u64),
        _ => Err(EncodeError::InvalidValue {
            expected: "number",
            found: value.kind(),
        }),
    }
}

impl Codec for NumberField {
    fn byte_size(&self) -> usize {
        self.width
    }

    fn decode_from(&self, cursor: &mut ReadCursor<'_>) -> Result<Value, DecodeError> {
        match self.kind {
            NumberKind::Unsigned => Ok(Value::UInt(self.read_bits(cursor)?)),
            NumberKind::Signed => Ok(Value::Int(self.read_signed(cursor)?)),
            NumberKind::Float if self.width == 4 => {
                Ok(Value::Float(cursor.f32(self.endian)? as f64))
            }
            NumberKind::Float => Ok(Value::Float(cursor.f64(self.endian)?)),
        }
    }

    fn encode_into(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<(), EncodeError> {
        match self.kind {
            NumberKind::Unsigned => self.write_bits(cursor, integer_bits(value)?),
            NumberKind::Signed => self.write_signed(cursor, integer_bits(value)? as i64),
            NumberKind::Float => {
                let float = match *value {
                    Value::Bool(v) => v as u8 as f64,
                    _ => value.as_f64().ok_or(EncodeError::InvalidValue {
                        expected: "number",
                        found: value.kind(),
                    })?,
                };

                if self.width == 4 {
                    cursor.f32(float as f32, self.endian)
                } else {
                    cursor.f64(float, self.endian)
                }
            }
        }
    }
}

impl fmt::Display for NumberField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match (self.kind, self.width) {
            (NumberKind::Float, 4) => "float".to_string(),
            (NumberKind::Float, _) => "double".to_string(),
            (NumberKind::Unsigned, width) => format!("uint{}", width * 8),
            (NumberKind::Signed, width) => format!("int{}", width * 8),
        };

        if self.width == 1 {
            return f.write_str(&base);
        }

        match self.endian {
            Endian::Big => write!(f, "{base}be"),
            Endian::Little => write!(f, "{base}le"),
        }
    }
}

fn parse_base(name: &str) -> Option<(NumberKind, usize)> {
    Some(match name {
        "uint8" | "u8" => (NumberKind::Unsigned, 1),
        "int8" | "i8" => (NumberKind::Signed, 1),
        "uint16" | "u16" => (NumberKind::Unsigned, 2),
        "int16" | "i16" => (NumberKind::Signed, 2),
        "uint24" | "u24" => (NumberKind::Unsigned, 3),
        "int24" | "i24" => (NumberKind::Signed, 3),
        "uint32" | "u32" => (NumberKind::Unsigned, 4),
        "int32" | "i32" => (NumberKind::Signed, 4),
        "uint64" | "u64" => (NumberKind::Unsigned, 8),
        "int64" | "i64" => (NumberKind::Signed, 8),
        "float" | "float32" | "f32" => (NumberKind::Float, 4),
        "double" | "float64" | "f64" => (NumberKind::Float, 8),
        _ => return None,
    })
}

/// Parses type tags such as `uint16le`, `UInt24BE`, `int32` or `double`.
///
/// A tag without a `be`/`le` suffix is big-endian.
impl FromStr for NumberField {
    type Err = SchemaError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let name = tag.to_ascii_lowercase().replace(['-', '_'], "");

        if let Some((kind, width)) = parse_base(&name) {
            return Self::new(kind, width, Endian::Big);
        }

        for (suffix, endian) in [("be", Endian::Big), ("le", Endian::Little)] {
            if let Some((kind, width)) = name.strip_suffix(suffix).and_then(parse_base) {
                return Self::new(kind, width, endian);
            }
        }

        Err(SchemaError::UnknownFieldType(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(field: NumberField, value: impl Into<Value>) -> Vec<u8> {
        field.to_bytes(&value.into()).unwrap()
    }

    #[test]
    fn test_uint8() {
        assert_eq!(NumberField::U8.from_bytes(&[0xab, 0xff]).unwrap(), Value::UInt(0xab));
        assert_eq!(NumberField::U8.byte_size(), 1);
        assert_eq!(encode(NumberField::U8, 0xffu8), vec![0xff]);
    }

    #[test]
    fn test_uint16() {
        assert_eq!(NumberField::U16, NumberField::U16_BE);
        assert_eq!(NumberField::U16_BE.from_bytes(&[0xab, 0xff]).unwrap(), Value::UInt(0xabff));
        assert_eq!(NumberField::U16_LE.from_bytes(&[0xff, 0xab]).unwrap(), Value::UInt(0xabff));
        assert_eq!(encode(NumberField::U16_LE, 0xabffu16), vec![0xff, 0xab]);
    }

    #[test]
    fn test_uint24() {
        assert_eq!(NumberField::U24, NumberField::U24_BE);
        assert_eq!(NumberField::U24_BE.byte_size(), 3);
        assert_eq!(
            NumberField::U24_BE.from_bytes(&[0xff, 0xab, 0x24]).unwrap(),
            Value::UInt(0xffab24)
        );
        assert_eq!(encode(NumberField::U24_BE, 0xffab24u32), vec![0xff, 0xab, 0x24]);
        assert_eq!(encode(NumberField::U24_LE, 0xffab24u32), vec![0x24, 0xab, 0xff]);
    }

    #[test]
    fn test_int24() {
        assert_eq!(
            NumberField::I24_BE.from_bytes(&[0xff, 0xab, 0x24]).unwrap(),
            Value::Int(-21724)
        );
        assert_eq!(
            NumberField::I24_LE.from_bytes(&[0x24, 0xab, 0xff]).unwrap(),
            Value::Int(-21724)
        );
        assert_eq!(encode(NumberField::I24_BE, 21724), vec![0x00, 0x54, 0xdc]);
        assert_eq!(encode(NumberField::I24_BE, -21724), vec![0xff, 0xab, 0x24]);
        assert_eq!(encode(NumberField::I24_LE, -21724), vec![0x24, 0xab, 0xff]);
    }

    #[test]
    fn test_int_widths() {
        assert_eq!(NumberField::I8.from_bytes(&[0xff]).unwrap(), Value::Int(-1));
        assert_eq!(NumberField::I16_LE.from_bytes(&[0xab, 0xff]).unwrap(), Value::Int(-85));
        assert_eq!(
            NumberField::I32_LE.from_bytes(&[0xbf, 0x24, 0xab, 0xff]).unwrap(),
            Value::Int(-5561153)
        );
        assert_eq!(encode(NumberField::I32_BE, -5561153), vec![0xff, 0xab, 0x24, 0xbf]);
        assert_eq!(
            encode(NumberField::I64_LE, -2i64),
            vec![0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_floats() {
        let value = NumberField::F32_BE.from_bytes(&[0x43, 0x7a, 0x8c, 0xcd]).unwrap();
        assert!((value.as_f64().unwrap() - 250.55).abs() < 0.005);
        assert_eq!(encode(NumberField::F32_LE, 250.55f32), vec![0xcd, 0x8c, 0x7a, 0x43]);

        assert_eq!(
            encode(NumberField::F64_BE, 1234.56),
            vec![0x40, 0x93, 0x4a, 0x3d, 0x70, 0xa3, 0xd7, 0x0a]
        );
        assert_eq!(NumberField::F64.byte_size(), 8);
    }

    #[test]
    fn test_out_of_range_wraps() {
        assert_eq!(encode(NumberField::U8, 0x1ffu16), vec![0xff]);
        assert_eq!(encode(NumberField::U8, -1), vec![0xff]);
        assert_eq!(encode(NumberField::U16_BE, 0x12345u32), vec![0x23, 0x45]);
        assert_eq!(encode(NumberField::I8, 200u8), vec![200]);
    }

    #[test]
    fn test_float_into_integer_field() {
        assert_eq!(
            encode(NumberField::U64_BE, 1.8e19),
            vec![0xf9, 0xcc, 0xd8, 0xa1, 0xc5, 0x08, 0x00, 0x00]
        );
        assert_eq!(encode(NumberField::U16_BE, 258.9), vec![0x01, 0x02]);
        assert_eq!(encode(NumberField::I24_BE, -21724.7), vec![0xff, 0xab, 0x24]);
        assert_eq!(encode(NumberField::I8, -2.0), vec![0xfe]);
        assert_eq!(encode(NumberField::U8, 256.0), vec![0x00]);
        assert_eq!(encode(NumberField::U64_LE, 2f64.powi(64) + 2f64.powi(12)), {
            let mut bytes = vec![0u8; 8];
            bytes[1] = 0x10;
            bytes
        });
    }

    #[test]
    fn test_non_finite_into_integer_field() {
        assert_eq!(encode(NumberField::U32_BE, f64::NAN), vec![0; 4]);
        assert_eq!(encode(NumberField::U32_BE, f64::INFINITY), vec![0; 4]);
        assert_eq!(encode(NumberField::I16_LE, f64::NEG_INFINITY), vec![0; 2]);
    }

    #[test]
    fn test_invalid_value() {
        assert_eq!(
            NumberField::U8.to_bytes(&Value::from("x")).unwrap_err(),
            EncodeError::InvalidValue {
                expected: "number",
                found: "string"
            }
        );
    }

    #[test]
    fn test_invalid_width() {
        assert_eq!(
            NumberField::new(NumberKind::Float, 2, Endian::Big).unwrap_err(),
            SchemaError::InvalidWidth {
                width: 2,
                kind: "float"
            }
        );
        assert!(NumberField::new(NumberKind::Unsigned, 5, Endian::Big).is_err());
        assert!(NumberField::new(NumberKind::Signed, 3, Endian::Little).is_ok());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("uint8".parse::<NumberField>().unwrap(), NumberField::U8);
        assert_eq!("UInt16LE".parse::<NumberField>().unwrap(), NumberField::U16_LE);
        assert_eq!("int24".parse::<NumberField>().unwrap(), NumberField::I24_BE);
        assert_eq!("double".parse::<NumberField>().unwrap(), NumberField::F64_BE);
        assert_eq!("DoubleLE".parse::<NumberField>().unwrap(), NumberField::F64_LE);
        assert_eq!("floatle".parse::<NumberField>().unwrap(), NumberField::F32_LE);
        assert_eq!(
            "uint12".parse::<NumberField>().unwrap_err(),
            SchemaError::UnknownFieldType("uint12".to_string())
        );
    }

    #[test]
    fn test_display_round_trips_tag() {
        for field in [
            NumberField::U8,
            NumberField::I16_LE,
            NumberField::U24_BE,
            NumberField::F32_LE,
            NumberField::F64_BE,
            NumberField::I64_LE,
        ] {
            assert_eq!(field.to_string().parse::<NumberField>().unwrap(), field);
        }
        assert_eq!(NumberField::U32_LE.to_string(), "uint32le");
    }
}
