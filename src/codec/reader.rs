//! Cursor over a frame payload.
//!
//! Reads fixed-width little-endian integers and length-encoded values.
//! Byte strings are returned as `Bytes` slices sharing the frame's buffer.

use bytes::Bytes;

use super::lenenc::read_lenenc_int;
use crate::error::{MywireError, Result};

/// Sequential reader over one payload.
#[derive(Debug, Clone)]
pub struct PayloadReader {
    data: Bytes,
    pos: usize,
}

impl PayloadReader {
    /// Create a reader positioned at the first payload byte.
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Current offset into the payload.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Next byte without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn take(&mut self, n: usize) -> Result<Bytes> {
        if self.remaining() < n {
            return Err(MywireError::truncated(n, self.remaining()));
        }
        let out = self.data.slice(self.pos..self.pos + n);
        self.pos += n;
        Ok(out)
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    pub fn u8(&mut self) -> Result<u8> {
        let b = self.peek().ok_or_else(|| MywireError::truncated(1, 0))?;
        self.pos += 1;
        Ok(b)
    }

    pub fn u16_le(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u32_le(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Fixed-length byte string.
    pub fn fixed(&mut self, n: usize) -> Result<Bytes> {
        self.take(n)
    }

    pub fn lenenc_int(&mut self) -> Result<u64> {
        let (value, used) = read_lenenc_int(&self.data, self.pos)?;
        self.pos += used;
        Ok(value)
    }

    /// Length-encoded byte string.
    pub fn lenenc_bytes(&mut self) -> Result<Bytes> {
        let len = self.lenenc_int()?;
        let len = usize::try_from(len)
            .map_err(|_| MywireError::malformed(format!("String length {} overflows", len)))?;
        self.take(len)
    }

    /// Length-encoded string, decoded as lossy UTF-8.
    pub fn lenenc_str(&mut self) -> Result<String> {
        let bytes = self.lenenc_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Everything that is left.
    pub fn rest(&mut self) -> Bytes {
        let out = self.data.slice(self.pos..);
        self.pos = self.data.len();
        out
    }
}
