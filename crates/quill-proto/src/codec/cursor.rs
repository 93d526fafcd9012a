//! Bounds-checked little-endian reader over a frame.

use super::WORD;
use crate::errors::{ProtocolError, Result};

/// Read position within a borrowed frame.
///
/// Every read checks the remaining length first and fails with
/// [`ProtocolError::Truncated`] instead of slicing out of bounds. The offset
/// only advances on success.
#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], offset: usize) -> Self {
        Self { buf, offset }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.offset >= self.buf.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let truncated = ProtocolError::Truncated {
            offset: self.offset,
            needed: len,
            available: self.buf.len().saturating_sub(self.offset),
        };

        let end = self.offset.checked_add(len).ok_or_else(|| truncated.clone())?;
        let bytes = self.buf.get(self.offset..end).ok_or(truncated)?;
        self.offset = end;

        Ok(bytes)
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.take(WORD)?;
        let mut word = [0u8; WORD];
        word.copy_from_slice(bytes);
        Ok(i32::from_le_bytes(word))
    }

    /// Length prefix followed by an `i32`. The prefix value is ignored.
    pub(crate) fn read_prefixed_i32(&mut self) -> Result<i32> {
        let _width = self.read_i32()?;
        self.read_i32()
    }

    /// Length prefix followed by exactly that many bytes.
    pub(crate) fn read_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let offset = self.offset;
        let value = self.read_i32()?;
        let len =
            usize::try_from(value).map_err(|_| ProtocolError::NegativeLength { offset, value })?;
        self.take(len)
    }
}
