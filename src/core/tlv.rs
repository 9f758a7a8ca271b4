//! # TLV Cursor
//!
//! Bounds-checked reading and writing of CCNx 1.0 Type-Length-Value units.
//!
//! ## Wire Format
//! ```text
//! [Type(2, BE)] [Length(2, BE)] [Value(Length)]
//! ```
//!
//! Reads go through [`TlvReader`], a cursor over a borrowed byte slice. Every
//! read checks the remaining length first and fails with
//! `CodecError::TruncatedInput` instead of panicking, so decoders can be fed
//! arbitrary bytes. Writes append to a `BytesMut`.

use crate::error::{CodecError, Result};
use bytes::{BufMut, BytesMut};

/// Size of the fixed Type + Length header.
pub const TL_SIZE: usize = 4;

/// Largest value length representable in the 16-bit Length field.
pub const MAX_VALUE_LENGTH: usize = u16::MAX as usize;

/// Sequential read cursor over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct TlvReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> TlvReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current absolute offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The full underlying buffer.
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(CodecError::TruncatedInput {
                offset: self.pos,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Reads `n` raw bytes, borrowing from the underlying buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.read_bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(u64::from_be_bytes(raw))
    }

    /// Advances the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Moves the cursor back by `n` bytes. Cannot move before the start.
    pub fn rewind(&mut self, n: usize) -> Result<()> {
        if n > self.pos {
            return Err(CodecError::TruncatedInput {
                offset: self.pos,
                needed: n,
                available: self.pos,
            });
        }
        self.pos -= n;
        Ok(())
    }

    /// Reads a Type + Length header.
    pub fn read_type_length(&mut self) -> Result<(u16, u16)> {
        self.ensure(TL_SIZE)?;
        let tlv_type = self.read_u16()?;
        let length = self.read_u16()?;
        Ok((tlv_type, length))
    }

    /// Reads a Type + Length header and rewinds over it.
    pub fn peek_type_length(&mut self) -> Result<(u16, u16)> {
        let header = self.read_type_length()?;
        self.rewind(TL_SIZE)?;
        Ok(header)
    }
}

/// Checks that a value length fits the 16-bit Length field.
pub fn check_value_length(length: usize) -> Result<u16> {
    u16::try_from(length).map_err(|_| CodecError::MessageTooLarge {
        size: length,
        limit: MAX_VALUE_LENGTH,
    })
}

/// Writes a Type + Length header.
pub fn write_type_length(out: &mut BytesMut, tlv_type: u16, length: usize) -> Result<()> {
    let length = check_value_length(length)?;
    out.reserve(TL_SIZE);
    out.put_u16(tlv_type);
    out.put_u16(length);
    Ok(())
}

/// Writes a complete TLV with an opaque value.
pub fn write_tlv(out: &mut BytesMut, tlv_type: u16, value: &[u8]) -> Result<usize> {
    write_type_length(out, tlv_type, value.len())?;
    out.put_slice(value);
    Ok(TL_SIZE + value.len())
}
