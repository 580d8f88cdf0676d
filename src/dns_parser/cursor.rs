use byteorder::{BigEndian, ByteOrder};

use super::Error;

/// A bounds-checked read position over a received packet
///
/// Reads never go past the end of the buffer; a short buffer yields
/// `Error::OutOfBounds` instead. The writing half of the codec appends to a
/// plain `Vec<u8>` through `byteorder::WriteBytesExt`.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Cursor<'a> {
        Cursor { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn set_position(&mut self, pos: usize) -> Result<(), Error> {
        if pos > self.buf.len() {
            return Err(Error::OutOfBounds {
                offset: pos,
                len: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Reads `len` bytes at an absolute offset without moving the cursor
    pub fn peek_at(&self, offset: usize, len: usize) -> Result<&'a [u8], Error> {
        match offset.checked_add(len) {
            Some(end) if end <= self.buf.len() => Ok(&self.buf[offset..end]),
            _ => Err(Error::OutOfBounds { offset, len }),
        }
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let bytes = self.peek_at(self.pos, len)?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }
}
