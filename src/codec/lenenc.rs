//! Length-encoded integers.
//!
//! ```text
//! first byte   value                      total size
//! < 0xFB       the byte itself            1
//! 0xFB         NULL (row context only)    1
//! 0xFC         next 2 bytes, LE           3
//! 0xFD         next 3 bytes, LE           4
//! 0xFE         next 8 bytes, LE           9
//! 0xFF         undefined                  -
//! ```
//!
//! # Example
//!
//! ```
//! use mywire_client::codec::read_lenenc_int;
//!
//! assert_eq!(read_lenenc_int(&[0xFC, 0x2C, 0x01], 0).unwrap(), (300, 3));
//! assert_eq!(read_lenenc_int(&[0x0A], 0).unwrap(), (10, 1));
//! ```

use bytes::BufMut;

use crate::error::{MywireError, Result};

const PREFIX_NULL: u8 = 0xFB;
const PREFIX_U16: u8 = 0xFC;
const PREFIX_U24: u8 = 0xFD;
const PREFIX_U64: u8 = 0xFE;

/// Read a length-encoded integer at `offset`.
///
/// Returns the value and the number of bytes consumed. `0xFB` and `0xFF`
/// are not numeric prefixes and yield `MalformedPacket`; callers in row
/// context check for the NULL marker before calling this.
pub fn read_lenenc_int(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    let available = buf.len().saturating_sub(offset);
    let Some(&first) = buf.get(offset) else {
        return Err(MywireError::truncated(1, available));
    };

    let width = match first {
        b if b < PREFIX_NULL => return Ok((u64::from(b), 1)),
        PREFIX_U16 => 2,
        PREFIX_U24 => 3,
        PREFIX_U64 => 8,
        PREFIX_NULL => {
            return Err(MywireError::malformed(
                "NULL marker 0xFB where a length-encoded integer was expected",
            ))
        }
        other => {
            return Err(MywireError::malformed(format!(
                "Invalid length-encoded integer prefix 0x{:02X}",
                other
            )))
        }
    };

    if available < 1 + width {
        return Err(MywireError::truncated(1 + width, available));
    }

    let mut le = [0u8; 8];
    le[..width].copy_from_slice(&buf[offset + 1..offset + 1 + width]);
    Ok((u64::from_le_bytes(le), 1 + width))
}

/// Number of bytes `value` occupies when length-encoded.
pub fn lenenc_int_len(value: u64) -> usize {
    match value {
        0..=0xFA => 1,
        0xFB..=0xFFFF => 3,
        0x1_0000..=0xFF_FFFF => 4,
        _ => 9,
    }
}

/// Append `value` as a length-encoded integer.
pub fn put_lenenc_int<B: BufMut>(dst: &mut B, value: u64) {
    match lenenc_int_len(value) {
        1 => dst.put_u8(value as u8),
        3 => {
            dst.put_u8(PREFIX_U16);
            dst.put_u16_le(value as u16);
        }
        4 => {
            dst.put_u8(PREFIX_U24);
            dst.put_slice(&value.to_le_bytes()[..3]);
        }
        _ => {
            dst.put_u8(PREFIX_U64);
            dst.put_u64_le(value);
        }
    }
}

/// Append a length-encoded byte string.
pub fn put_lenenc_bytes<B: BufMut>(dst: &mut B, data: &[u8]) {
    put_lenenc_int(dst, data.len() as u64);
    dst.put_slice(data);
}
