//! Sequential, endian-aware byte cursors.
//!
//! A cursor is created for one decode or encode call and dropped when the call
//! returns. Field descriptors never hold a cursor; they receive one as an argument.

use crate::{
    errors::{DecodeError, EncodeError},
    string::Encoding,
    value::Value,
};

/// Byte order of a multi-byte number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Most significant byte first.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

/// Reads values from a byte slice, advancing one position per read.
#[derive(Debug, Clone)]
pub struct ReadCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns the next `n` bytes and advances past them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or(DecodeError::OutOfBounds)?;

        let bytes = &self.data[self.pos..end];
        self.pos = end;

        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.take(N)?;
        <[u8; N]>::try_from(bytes).map_err(|_| DecodeError::OutOfBounds)
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.array::<1>()?[0])
    }

    pub fn i8(&mut self) -> Result<i8, DecodeError> {
        Ok(self.u8()? as i8)
    }

    pub fn u16(&mut self, endian: Endian) -> Result<u16, DecodeError> {
        let bytes = self.array()?;
        Ok(match endian {
            Endian::Big => u16::from_be_bytes(bytes),
            Endian::Little => u16::from_le_bytes(bytes),
        })
    }

    pub fn i16(&mut self, endian: Endian) -> Result<i16, DecodeError> {
        Ok(self.u16(endian)? as i16)
    }

    /// Reads a 24-bit unsigned integer as a 16-bit word plus one byte.
    pub fn u24(&mut self, endian: Endian) -> Result<u32, DecodeError> {
        match endian {
            Endian::Big => {
                let high = self.u16(Endian::Big)? as u32;
                Ok((high << 8) + self.u8()? as u32)
            }
            Endian::Little => {
                let low = self.u16(Endian::Little)? as u32;
                Ok(low + ((self.u8()? as u32) << 16))
            }
        }
    }

    /// Reads a 24-bit signed integer; the sign comes from the most significant byte.
    pub fn i24(&mut self, endian: Endian) -> Result<i32, DecodeError> {
        match endian {
            Endian::Big => {
                let high = self.i16(Endian::Big)? as i32;
                Ok((high << 8) + self.u8()? as i32)
            }
            Endian::Little => {
                let low = self.u16(Endian::Little)? as i32;
                Ok(low + ((self.i8()? as i32) << 16))
            }
        }
    }

    pub fn u32(&mut self, endian: Endian) -> Result<u32, DecodeError> {
        let bytes = self.array()?;
        Ok(match endian {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
        })
    }

    pub fn i32(&mut self, endian: Endian) -> Result<i32, DecodeError> {
        Ok(self.u32(endian)? as i32)
    }

    pub fn u64(&mut self, endian: Endian) -> Result<u64, DecodeError> {
        let bytes = self.array()?;
        Ok(match endian {
            Endian::Big => u64::from_be_bytes(bytes),
            Endian::Little => u64::from_le_bytes(bytes),
        })
    }

    pub fn i64(&mut self, endian: Endian) -> Result<i64, DecodeError> {
        Ok(self.u64(endian)? as i64)
    }

    pub fn f32(&mut self, endian: Endian) -> Result<f32, DecodeError> {
        Ok(f32::from_bits(self.u32(endian)?))
    }

    pub fn f64(&mut self, endian: Endian) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.u64(endian)?))
    }

    /// Reads `len` bytes of text. Bytes the encoding rejects come back as [Value::Bytes].
    pub fn text(&mut self, len: usize, encoding: Encoding) -> Result<Value, DecodeError> {
        let bytes = self.take(len)?;

        Ok(match encoding.decode(bytes) {
            Some(text) => Value::String(text),
            None => Value::Bytes(bytes.to_vec()),
        })
    }
}

/// Writes values into a mutable byte slice, advancing one position per write.
///
/// The slice is expected to be zero-filled; bytes that are skipped keep their value.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> WriteCursor<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn reserve(&mut self, n: usize) -> Result<&mut [u8], EncodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.data.len())
            .ok_or(EncodeError::OutOfBounds)?;

        let start = self.pos;
        self.pos = end;

        Ok(&mut self.data[start..end])
    }

    /// Copies `bytes` at the position and advances past them.
    pub fn put(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Advances `n` bytes without touching them.
    pub fn skip(&mut self, n: usize) -> Result<(), EncodeError> {
        self.reserve(n).map(|_| ())
    }

    pub fn u8(&mut self, value: u8) -> Result<(), EncodeError> {
        self.put(&[value])
    }

    pub fn i8(&mut self, value: i8) -> Result<(), EncodeError> {
        self.u8(value as u8)
    }

    pub fn u16(&mut self, value: u16, endian: Endian) -> Result<(), EncodeError> {
        match endian {
            Endian::Big => self.put(&value.to_be_bytes()),
            Endian::Little => self.put(&value.to_le_bytes()),
        }
    }

    pub fn i16(&mut self, value: i16, endian: Endian) -> Result<(), EncodeError> {
        self.u16(value as u16, endian)
    }

    /// Writes the low 24 bits of `value`.
    pub fn u24(&mut self, value: u32, endian: Endian) -> Result<(), EncodeError> {
        let bytes = [(value >> 16) as u8, (value >> 8) as u8, value as u8];
        match endian {
            Endian::Big => self.put(&bytes),
            Endian::Little => self.put(&[bytes[2], bytes[1], bytes[0]]),
        }
    }

    /// Writes a signed 24-bit integer; negative values are folded into the unsigned pattern.
    pub fn i24(&mut self, value: i32, endian: Endian) -> Result<(), EncodeError> {
        let folded = if value < 0 {
            value.wrapping_add(0x100_0000)
        } else {
            value
        };
        self.u24(folded as u32, endian)
    }

    pub fn u32(&mut self, value: u32, endian: Endian) -> Result<(), EncodeError> {
        match endian {
            Endian::Big => self.put(&value.to_be_bytes()),
            Endian::Little => self.put(&value.to_le_bytes()),
        }
    }

    pub fn i32(&mut self, value: i32, endian: Endian) -> Result<(), EncodeError> {
        self.u32(value as u32, endian)
    }

    pub fn u64(&mut self, value: u64, endian: Endian) -> Result<(), EncodeError> {
        match endian {
            Endian::Big => self.put(&value.to_be_bytes()),
            Endian::Little => self.put(&value.to_le_bytes()),
        }
    }

    pub fn i64(&mut self, value: i64, endian: Endian) -> Result<(), EncodeError> {
        self.u64(value as u64, endian)
    }

    pub fn f32(&mut self, value: f32, endian: Endian) -> Result<(), EncodeError> {
        self.u32(value.to_bits(), endian)
    }

    pub fn f64(&mut self, value: f64, endian: Endian) -> Result<(), EncodeError> {
        self.u64(value.to_bits(), endian)
    }

    /// Writes at most `len` bytes of `bytes`, then advances to the end of the `len` byte slot.
    pub fn clipped(&mut self, bytes: &[u8], len: usize) -> Result<(), EncodeError> {
        let slot = self.reserve(len)?;
        let n = bytes.len().min(len);
        slot[..n].copy_from_slice(&bytes[..n]);
        Ok(())
    }

    /// Encodes `text` into a `len` byte slot, clipping anything that does not fit.
    pub fn text(&mut self, text: &str, len: usize, encoding: Encoding) -> Result<(), EncodeError> {
        self.clipped(&encoding.encode(text), len)
    }
}
