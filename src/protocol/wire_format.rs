//! Wire format encoding and decoding.
//!
//! Implements the 4-byte packet header:
//! ```text
//! ┌────────────────┬─────────┐
//! │ Payload Length │ Seq ID  │
//! │ 3 bytes        │ 1 byte  │
//! │ uint24 LE      │         │
//! └────────────────┴─────────┘
//! ```
//!
//! The first payload byte is the discriminator (see [`markers`]).

/// Header size in bytes (fixed, exactly 4).
pub const HEADER_SIZE: usize = 4;

/// Largest payload a single frame can carry (2^24 - 1).
///
/// A frame of exactly this length is continued by the next frame.
pub const MAX_PACKET_PAYLOAD: u32 = 0xFF_FFFF;

/// Default maximum logical payload size after continuation joining (64 MB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: u32 = 64 * 1024 * 1024;

/// Discriminator values carried in the first payload byte.
pub mod markers {
    /// Acknowledgement (OK packet).
    pub const OK: u8 = 0x00;
    /// Server-side error result.
    pub const ERR: u8 = 0xFF;
    /// End marker (EOF packet) when the payload is short.
    pub const EOF: u8 = 0xFE;
    /// Local infile request in idle context, NULL column value in row context.
    pub const LOCAL_INFILE: u8 = 0xFB;
    /// NULL column value inside a text row.
    pub const NULL: u8 = 0xFB;

    /// A 0xFE payload this long or longer is a lenenc prefix, not an end marker.
    pub const EOF_MAX_PAYLOAD: usize = 9;

    /// Check whether a payload is an end marker.
    #[inline]
    pub fn is_eof(payload: &[u8]) -> bool {
        payload.first() == Some(&EOF) && payload.len() < EOF_MAX_PAYLOAD
    }
}

/// Decoded header from wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Payload length in bytes (24-bit).
    pub payload_length: u32,
    /// Sequence number, wrapping at 255.
    pub sequence_id: u8,
}

impl Header {
    /// Create a new header.
    pub fn new(payload_length: u32, sequence_id: u8) -> Self {
        Self {
            payload_length,
            sequence_id,
        }
    }

    /// Encode header to bytes (Little Endian length).
    ///
    /// # Example
    ///
    /// ```
    /// use mywire_client::protocol::Header;
    ///
    /// let bytes = Header::new(300, 1).encode();
    /// assert_eq!(bytes, [0x2C, 0x01, 0x00, 0x01]);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let len = self.payload_length.to_le_bytes();
        [len[0], len[1], len[2], self.sequence_id]
    }

    /// Decode header from bytes.
    ///
    /// Returns `None` if buffer is too short.
    ///
    /// # Example
    ///
    /// ```
    /// use mywire_client::protocol::Header;
    ///
    /// let header = Header::decode(&[0x05, 0x00, 0x00, 0x02]).unwrap();
    /// assert_eq!(header.payload_length, 5);
    /// assert_eq!(header.sequence_id, 2);
    /// ```
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        Some(Self {
            payload_length: u32::from_le_bytes([buf[0], buf[1], buf[2], 0]),
            sequence_id: buf[3],
        })
    }

    /// Check if the payload continues in the next frame.
    #[inline]
    pub fn is_continued(&self) -> bool {
        self.payload_length == MAX_PACKET_PAYLOAD
    }
}
