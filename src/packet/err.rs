//! Server error (ERR) packet.
//!
//! ```text
//! 0xFF | code u16 | ['#' sql_state[5]] | message
//! ```

use bytes::Bytes;
use serde::Serialize;

use crate::codec::PayloadReader;
use crate::error::{MywireError, Result};
use crate::protocol::markers;

const SQL_STATE_MARKER: u8 = b'#';
const SQL_STATE_LEN: usize = 5;

/// Application-level failure reported by the server.
///
/// Decoding one of these is a normal outcome, not a protocol violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrPacket {
    pub code: u16,
    /// Five-character SQLSTATE, absent when the server omitted the marker.
    pub sql_state: Option<String>,
    pub message: String,
}

impl ErrPacket {
    /// Decode an ERR payload (discriminator included).
    pub fn decode(payload: &Bytes) -> Result<Self> {
        let mut r = PayloadReader::new(payload.clone());

        let header = r.u8()?;
        if header != markers::ERR {
            return Err(MywireError::malformed(format!(
                "ERR packet starts with 0x{:02X}",
                header
            )));
        }

        let code = r.u16_le()?;

        let sql_state = if r.peek() == Some(SQL_STATE_MARKER) {
            r.skip(1)?;
            let state = r.fixed(SQL_STATE_LEN)?;
            Some(String::from_utf8_lossy(&state).into_owned())
        } else {
            None
        };

        let message = String::from_utf8_lossy(&r.rest()).into_owned();

        Ok(Self {
            code,
            sql_state,
            message,
        })
    }
}

impl std::fmt::Display for ErrPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sql_state {
            Some(state) => write!(f, "ERROR {} ({}): {}", self.code, state, self.message),
            None => write!(f, "ERROR {}: {}", self.code, self.message),
        }
    }
}
