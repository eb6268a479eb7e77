//! Byte cursors for building and parsing packets.
//!
//! [`PacketWriter`] appends fields to a growable buffer; [`PacketReader`]
//! walks a borrowed slice field by field. Both agree on a [`ByteOrder`] for
//! multi-byte numbers, which the host fixes for the whole session.
//!
//! Strings are written the way most game hosts write them: a 7-bit
//! variable-length byte count followed by UTF-8 bytes.

use crate::{ByteOrder, ProtocolError};

/// Generates a `write_*` method for a fixed-width number.
macro_rules! write_number {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Appends a `", stringify!($ty), "`.")]
        pub fn $name(&mut self, value: $ty) {
            let bytes = match self.order {
                ByteOrder::Little => value.to_le_bytes(),
                ByteOrder::Big => value.to_be_bytes(),
            };
            self.buf.extend_from_slice(&bytes);
        }
    };
}

/// Generates a `read_*` method for a fixed-width number.
macro_rules! read_number {
    ($name:ident, $ty:ty) => {
        #[doc = concat!("Reads a `", stringify!($ty), "`.")]
        pub fn $name(&mut self) -> Result<$ty, ProtocolError> {
            let bytes = self.take(std::mem::size_of::<$ty>())?;
            let mut raw = [0u8; std::mem::size_of::<$ty>()];
            raw.copy_from_slice(bytes);
            Ok(match self.order {
                ByteOrder::Little => <$ty>::from_le_bytes(raw),
                ByteOrder::Big => <$ty>::from_be_bytes(raw),
            })
        }
    };
}

// ---------------------------------------------------------------------------
// PacketWriter
// ---------------------------------------------------------------------------

/// Builds one outgoing packet.
#[derive(Debug, Clone, Default)]
pub struct PacketWriter {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl PacketWriter {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            buf: Vec::new(),
            order,
        }
    }

    pub fn with_capacity(order: ByteOrder, capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            order,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    write_number!(write_u16, u16);
    write_number!(write_i16, i16);
    write_number!(write_u32, u32);
    write_number!(write_i32, i32);
    write_number!(write_u64, u64);
    write_number!(write_i64, i64);
    write_number!(write_f32, f32);
    write_number!(write_f64, f64);

    /// Appends raw bytes with no length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends a 7-bit variable-length unsigned integer (1 to 5 bytes).
    pub fn write_var_u32(&mut self, mut value: u32) {
        while value >= 0x80 {
            self.buf.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    /// Appends a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) -> Result<(), ProtocolError> {
        let len = u32::try_from(value.len()).map_err(|_| {
            ProtocolError::InvalidMessage(format!(
                "string of {} bytes is too long",
                value.len()
            ))
        })?;
        self.write_var_u32(len);
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PacketReader
// ---------------------------------------------------------------------------

/// Reads one incoming packet front to back.
///
/// Every read either consumes exactly the bytes of its field or fails with
/// [`ProtocolError::Truncated`] and consumes nothing.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    data: &'a [u8],
    pos: usize,
    order: ByteOrder,
}

impl<'a> PacketReader<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self {
            data,
            pos: 0,
            order,
        }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the packet.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn take(&mut self, wanted: usize) -> Result<&'a [u8], ProtocolError> {
        let remaining = self.remaining();
        if wanted > remaining {
            return Err(ProtocolError::Truncated { wanted, remaining });
        }
        let bytes = &self.data[self.pos..self.pos + wanted];
        self.pos += wanted;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, ProtocolError> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.read_u8()? != 0)
    }

    read_number!(read_u16, u16);
    read_number!(read_i16, i16);
    read_number!(read_u32, u32);
    read_number!(read_i32, i32);
    read_number!(read_u64, u64);
    read_number!(read_i64, i64);
    read_number!(read_f32, f32);
    read_number!(read_f64, f64);

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ProtocolError> {
        self.take(len)
    }

    /// Reads a 7-bit variable-length unsigned integer.
    pub fn read_var_u32(&mut self) -> Result<u32, ProtocolError> {
        let start = self.pos;
        let mut value: u32 = 0;
        for shift in (0..35).step_by(7) {
            let byte = match self.read_u8() {
                Ok(byte) => byte,
                Err(e) => {
                    self.pos = start;
                    return Err(e);
                }
            };
            value |= u32::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        self.pos = start;
        Err(ProtocolError::VarIntOverflow)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> Result<&'a str, ProtocolError> {
        let start = self.pos;
        let len = self.read_var_u32()? as usize;
        let bytes = match self.take(len) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.pos = start;
                return Err(e);
            }
        };
        std::str::from_utf8(bytes).map_err(|e| {
            self.pos = start;
            ProtocolError::InvalidUtf8(e)
        })
    }
}
