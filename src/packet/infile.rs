//! Local infile request.
//!
//! Sent instead of a result set when the statement was `LOAD DATA LOCAL
//! INFILE`; the client is expected to stream the named file back.

use bytes::Bytes;
use serde::Serialize;

use crate::error::{MywireError, Result};
use crate::protocol::markers;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalInfileRequest {
    pub filename: String,
}

impl LocalInfileRequest {
    /// Decode a `0xFB | filename` payload.
    pub fn decode(payload: &Bytes) -> Result<Self> {
        match payload.first() {
            Some(&markers::LOCAL_INFILE) => {}
            Some(&b) => {
                return Err(MywireError::malformed(format!(
                    "Local infile request starts with 0x{:02X}",
                    b
                )))
            }
            None => return Err(MywireError::truncated(1, 0)),
        }

        let filename = String::from_utf8_lossy(&payload[1..]).into_owned();
        if filename.is_empty() {
            return Err(MywireError::malformed("Local infile request without a filename"));
        }

        Ok(Self { filename })
    }
}
