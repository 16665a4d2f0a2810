//! Acknowledgement (OK) packet.
//!
//! ```text
//! 0x00 | affected_rows lenenc | last_insert_id lenenc | status u16 | warnings u16 | info
//! ```

use bytes::Bytes;
use serde::Serialize;

use crate::codec::PayloadReader;
use crate::error::{MywireError, Result};
use crate::protocol::markers;

/// Server status bitset carried by OK and EOF packets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StatusFlags(pub u16);

impl StatusFlags {
    pub const IN_TRANS: u16 = 0x0001;
    pub const AUTOCOMMIT: u16 = 0x0002;
    pub const MORE_RESULTS_EXISTS: u16 = 0x0008;
    pub const NO_GOOD_INDEX_USED: u16 = 0x0010;
    pub const NO_INDEX_USED: u16 = 0x0020;
    pub const CURSOR_EXISTS: u16 = 0x0040;
    pub const LAST_ROW_SENT: u16 = 0x0080;
    pub const DB_DROPPED: u16 = 0x0100;
    pub const NO_BACKSLASH_ESCAPES: u16 = 0x0200;
    pub const METADATA_CHANGED: u16 = 0x0400;
    pub const QUERY_WAS_SLOW: u16 = 0x0800;
    pub const PS_OUT_PARAMS: u16 = 0x1000;
    pub const IN_TRANS_READONLY: u16 = 0x2000;
    pub const SESSION_STATE_CHANGED: u16 = 0x4000;

    /// Check whether all bits of `flag` are set.
    #[inline]
    pub fn contains(self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    /// Another result set follows this one.
    #[inline]
    pub fn more_results(self) -> bool {
        self.contains(Self::MORE_RESULTS_EXISTS)
    }

    #[inline]
    pub fn in_transaction(self) -> bool {
        self.contains(Self::IN_TRANS)
    }
}

/// Successful completion of a statement that produced no result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OkPacket {
    pub affected_rows: u64,
    pub last_insert_id: u64,
    pub status: StatusFlags,
    pub warnings: u16,
    /// Human-readable info, e.g. `Rows matched: 1  Changed: 1  Warnings: 0`.
    pub info: String,
}

impl OkPacket {
    /// Decode an OK payload (discriminator included).
    pub fn decode(payload: &Bytes) -> Result<Self> {
        let mut r = PayloadReader::new(payload.clone());

        let header = r.u8()?;
        if header != markers::OK {
            return Err(MywireError::malformed(format!(
                "OK packet starts with 0x{:02X}",
                header
            )));
        }

        let affected_rows = r.lenenc_int()?;
        let last_insert_id = r.lenenc_int()?;
        let status = StatusFlags(r.u16_le()?);
        let warnings = r.u16_le()?;
        let info = String::from_utf8_lossy(&r.rest()).into_owned();

        Ok(Self {
            affected_rows,
            last_insert_id,
            status,
            warnings,
            info,
        })
    }
}
