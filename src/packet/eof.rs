//! End marker (EOF) packet.
//!
//! ```text
//! 0xFE | warnings u16 | status u16
//! ```
//!
//! The same shape closes both the column list and the row list.

use bytes::Bytes;
use serde::Serialize;

use super::ok::StatusFlags;
use crate::codec::PayloadReader;
use crate::error::{MywireError, Result};
use crate::protocol::markers;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EofPacket {
    pub warnings: u16,
    pub status: StatusFlags,
}

impl EofPacket {
    /// Decode an EOF payload (discriminator included).
    ///
    /// A bare `0xFE` (pre-4.1 servers) decodes with zeroed fields.
    pub fn decode(payload: &Bytes) -> Result<Self> {
        if !markers::is_eof(payload) {
            return Err(MywireError::malformed(format!(
                "Not an end marker: {} byte payload starting with {:?}",
                payload.len(),
                payload.first()
            )));
        }

        let mut r = PayloadReader::new(payload.clone());
        r.skip(1)?;
        if r.remaining() == 0 {
            return Ok(Self::default());
        }

        let warnings = r.u16_le()?;
        let status = StatusFlags(r.u16_le()?);
        Ok(Self { warnings, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        let eof = EofPacket::decode(&Bytes::from_static(&[0xFE, 0x02, 0x00, 0x22, 0x00])).unwrap();
        assert_eq!(eof.warnings, 2);
        assert!(eof.status.contains(StatusFlags::AUTOCOMMIT));
        assert!(eof.status.contains(StatusFlags::NO_INDEX_USED));
        assert!(!eof.status.more_results());
    }

    #[test]
    fn test_bare_marker() {
        let eof = EofPacket::decode(&Bytes::from_static(&[0xFE])).unwrap();
        assert_eq!(eof, EofPacket::default());
    }

    #[test]
    fn test_truncated_status() {
        let err = EofPacket::decode(&Bytes::from_static(&[0xFE, 0x00, 0x00, 0x02])).unwrap_err();
        assert!(matches!(err, MywireError::TruncatedInput { .. }));
    }

    #[test]
    fn test_long_payload_is_not_eof() {
        let err = EofPacket::decode(&Bytes::from_static(&[0xFE, 0, 0, 0, 0, 0, 0, 0, 0])).unwrap_err();
        assert!(matches!(err, MywireError::MalformedPacket(_)));
    }
}
