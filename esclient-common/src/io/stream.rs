//! Binary stream primitives
//!
//! Fields are written back to back with no tags, so readers must consume them in
//! exactly the order writers produced them. Multi-byte integers are big endian;
//! lengths and counts are variable-length ints (7 bits per byte, low group
//! first). Strings are a count of UTF-16 code units followed by each unit in
//! one to three bytes.

use crate::bytes_reference::BytesReference;
use crate::{EsClientError, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// A vint never needs more than 5 bytes for 32 bits
const MAX_VINT_BYTES: u32 = 5;
/// A vlong never needs more than 10 bytes for 64 bits
const MAX_VLONG_BYTES: u32 = 10;

/// Appends encoded fields to a growable buffer
#[derive(Debug, Default)]
pub struct StreamOutput {
    buffer: BytesMut,
}

impl StreamOutput {
    /// Create an empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an output with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// View of the bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Finish writing and take the encoded bytes
    pub fn freeze(self) -> Bytes {
        self.buffer.freeze()
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        self.buffer.put_slice(value);
    }

    pub fn write_boolean(&mut self, value: bool) {
        self.write_byte(u8::from(value));
    }

    pub fn write_int(&mut self, value: i32) {
        self.buffer.put_i32(value);
    }

    pub fn write_long(&mut self, value: i64) {
        self.buffer.put_i64(value);
    }

    /// Write an unsigned int in 1 to 5 bytes
    pub fn write_vint(&mut self, mut value: u32) {
        while value & !0x7F != 0 {
            self.write_byte(((value & 0x7F) | 0x80) as u8);
            value >>= 7;
        }
        self.write_byte(value as u8);
    }

    /// Write an unsigned long in 1 to 10 bytes
    pub fn write_vlong(&mut self, mut value: u64) {
        while value & !0x7F != 0 {
            self.write_byte(((value & 0x7F) | 0x80) as u8);
            value >>= 7;
        }
        self.write_byte(value as u8);
    }

    /// Write a string as a unit count followed by 1-3 bytes per UTF-16 unit
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.write_length(units.len(), "string")?;
        for unit in units {
            if unit <= 0x007F {
                self.write_byte(unit as u8);
            } else if unit > 0x07FF {
                self.write_byte((0xE0 | ((unit >> 12) & 0x0F)) as u8);
                self.write_byte((0x80 | ((unit >> 6) & 0x3F)) as u8);
                self.write_byte((0x80 | (unit & 0x3F)) as u8);
            } else {
                self.write_byte((0xC0 | ((unit >> 6) & 0x1F)) as u8);
                self.write_byte((0x80 | (unit & 0x3F)) as u8);
            }
        }
        Ok(())
    }

    /// Write a presence flag, then the string when present
    pub fn write_optional_string(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => {
                self.write_boolean(true);
                self.write_string(value)
            }
            None => {
                self.write_boolean(false);
                Ok(())
            }
        }
    }

    pub fn write_string_array(&mut self, values: &[String]) -> Result<()> {
        self.write_length(values.len(), "string array")?;
        for value in values {
            self.write_string(value)?;
        }
        Ok(())
    }

    /// Like [`StreamOutput::write_string_array`], with an absent array written as empty
    pub fn write_string_array_nullable(&mut self, values: Option<&[String]>) -> Result<()> {
        self.write_string_array(values.unwrap_or_default())
    }

    /// Write a length-prefixed run of bytes
    pub fn write_bytes_reference(&mut self, value: &BytesReference) -> Result<()> {
        let bytes = value.to_bytes();
        self.write_length(bytes.len(), "bytes reference")?;
        self.write_bytes(&bytes);
        Ok(())
    }

    fn write_length(&mut self, length: usize, what: &str) -> Result<()> {
        let length = u32::try_from(length)
            .ok()
            .filter(|l| *l <= i32::MAX as u32)
            .ok_or_else(|| EsClientError::encode(format!("{what} too long: {length}")))?;
        self.write_vint(length);
        Ok(())
    }
}

/// Reads encoded fields from the front of a byte buffer
#[derive(Debug, Clone)]
pub struct StreamInput {
    buffer: Bytes,
}

impl StreamInput {
    pub fn new(buffer: impl Into<Bytes>) -> Self {
        Self {
            buffer: buffer.into(),
        }
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> usize {
        self.buffer.remaining()
    }

    fn ensure(&self, needed: usize, what: &str) -> Result<()> {
        if self.buffer.remaining() < needed {
            return Err(EsClientError::decode(format!(
                "unexpected end of input reading {what}: needed {needed} bytes, {} left",
                self.buffer.remaining()
            )));
        }
        Ok(())
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.ensure(1, "byte")?;
        Ok(self.buffer.get_u8())
    }

    pub fn read_boolean(&mut self) -> Result<bool> {
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(EsClientError::decode(format!(
                "unexpected byte [{other:#04x}] reading boolean"
            ))),
        }
    }

    pub fn read_int(&mut self) -> Result<i32> {
        self.ensure(4, "int")?;
        Ok(self.buffer.get_i32())
    }

    pub fn read_long(&mut self) -> Result<i64> {
        self.ensure(8, "long")?;
        Ok(self.buffer.get_i64())
    }

    pub fn read_vint(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for index in 0..MAX_VINT_BYTES {
            let byte = self.read_byte()?;
            value |= u32::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(EsClientError::decode("vint is longer than 5 bytes"))
    }

    pub fn read_vlong(&mut self) -> Result<u64> {
        let mut value = 0u64;
        for index in 0..MAX_VLONG_BYTES {
            let byte = self.read_byte()?;
            value |= u64::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(EsClientError::decode("vlong is longer than 10 bytes"))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let count = self.read_vint()? as usize;
        // every unit takes at least one byte
        self.ensure(count, "string")?;
        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            let first = u16::from(self.read_byte()?);
            let unit = match first >> 4 {
                0..=7 => first,
                12 | 13 => {
                    let second = u16::from(self.read_continuation()?);
                    ((first & 0x1F) << 6) | (second & 0x3F)
                }
                14 => {
                    let second = u16::from(self.read_continuation()?);
                    let third = u16::from(self.read_continuation()?);
                    ((first & 0x0F) << 12) | ((second & 0x3F) << 6) | (third & 0x3F)
                }
                _ => {
                    return Err(EsClientError::decode(format!(
                        "invalid leading byte [{first:#04x}] in string"
                    )))
                }
            };
            units.push(unit);
        }
        String::from_utf16(&units)
            .map_err(|e| EsClientError::decode(format!("invalid string content: {e}")))
    }

    fn read_continuation(&mut self) -> Result<u8> {
        let byte = self.read_byte()?;
        if byte & 0xC0 != 0x80 {
            return Err(EsClientError::decode(format!(
                "invalid continuation byte [{byte:#04x}] in string"
            )));
        }
        Ok(byte)
    }

    pub fn read_optional_string(&mut self) -> Result<Option<String>> {
        if self.read_boolean()? {
            Ok(Some(self.read_string()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_string_array(&mut self) -> Result<Vec<String>> {
        let count = self.read_vint()? as usize;
        let mut values = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            values.push(self.read_string()?);
        }
        Ok(values)
    }

    /// Read a length-prefixed run of bytes
    ///
    /// The result is an owned slice of the input; it shares the input's
    /// allocation but nothing can modify it.
    pub fn read_bytes_reference(&mut self) -> Result<BytesReference> {
        let length = self.read_vint()? as usize;
        self.ensure(length, "bytes reference")?;
        Ok(BytesReference::Array(self.buffer.split_to(length)))
    }
}

/// A value with a fixed field order on the wire
pub trait Streamable: Sized {
    /// Read a value, consuming its fields in write order
    fn read_from(input: &mut StreamInput) -> Result<Self>;

    /// Write all fields of the value
    fn write_to(&self, out: &mut StreamOutput) -> Result<()>;
}

/// Encode `value` into a fresh buffer
pub fn to_bytes<T: Streamable>(value: &T) -> Result<Bytes> {
    let mut out = StreamOutput::new();
    value.write_to(&mut out)?;
    Ok(out.freeze())
}

/// Decode a value from `bytes`
pub fn from_bytes<T: Streamable>(bytes: impl Into<Bytes>) -> Result<T> {
    let mut input = StreamInput::new(bytes);
    T::read_from(&mut input)
}
