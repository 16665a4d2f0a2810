//! Frame struct with typed accessors.
//!
//! Represents one complete logical packet: header plus payload.
//! Uses `bytes::Bytes` so row values can be sliced out without copying.
//!
//! # Example
//!
//! ```
//! use mywire_client::protocol::{Frame, Header};
//! use bytes::Bytes;
//!
//! let frame = Frame::new(Header::new(1, 3), Bytes::from_static(&[0x02]));
//!
//! assert_eq!(frame.sequence_id(), 3);
//! assert_eq!(frame.discriminator(), Some(0x02));
//! ```

use bytes::Bytes;

use super::wire_format::{markers, Header, HEADER_SIZE, MAX_PACKET_PAYLOAD};
use crate::error::{MywireError, Result};

/// A complete protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Decoded header.
    pub header: Header,
    /// Payload bytes (zero-copy via `bytes::Bytes`).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame from header and payload.
    pub fn new(header: Header, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Create a frame carrying `payload` with a matching header.
    ///
    /// The header length saturates at `u32::MAX`; decoding checks the payload
    /// itself, not the header.
    pub fn from_payload(sequence_id: u8, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let payload_length = u32::try_from(payload.len()).unwrap_or(u32::MAX);
        Self {
            header: Header::new(payload_length, sequence_id),
            payload,
        }
    }

    /// Parse one frame from raw bytes (4-byte header followed by the payload).
    ///
    /// The declared payload length must match the bytes supplied exactly.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = Header::decode(data)
            .ok_or_else(|| MywireError::truncated(HEADER_SIZE, data.len()))?;

        let declared = header.payload_length as usize;
        let available = data.len() - HEADER_SIZE;
        if available < declared {
            return Err(MywireError::truncated(declared, available));
        }
        if available > declared {
            return Err(MywireError::malformed(format!(
                "Frame declares {} payload bytes but carries {}",
                declared, available
            )));
        }

        Ok(Self::new(
            header,
            Bytes::copy_from_slice(&data[HEADER_SIZE..]),
        ))
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Get the sequence number.
    #[inline]
    pub fn sequence_id(&self) -> u8 {
        self.header.sequence_id
    }

    /// First payload byte, `None` for an empty payload.
    #[inline]
    pub fn discriminator(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Check if this frame is a short 0xFE end marker.
    #[inline]
    pub fn is_eof(&self) -> bool {
        markers::is_eof(&self.payload)
    }
}

/// Build the wire bytes for one logical payload.
///
/// Payloads of `MAX_PACKET_PAYLOAD` bytes or more are split into continuation
/// frames with consecutive sequence ids, ending with a shorter (possibly
/// empty) frame.
///
/// # Example
///
/// ```
/// use mywire_client::protocol::build_frame;
///
/// let bytes = build_frame(0, &[0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00]);
/// assert_eq!(&bytes[..4], &[7, 0, 0, 0]);
/// assert_eq!(bytes.len(), 4 + 7);
/// ```
pub fn build_frame(sequence_id: u8, payload: &[u8]) -> Vec<u8> {
    let max = MAX_PACKET_PAYLOAD as usize;
    let count = payload.len() / max + 1;
    let mut buf = Vec::with_capacity(count * HEADER_SIZE + payload.len());

    let mut sequence_id = sequence_id;
    let mut rest = payload;
    loop {
        let (chunk, tail) = rest.split_at(rest.len().min(max));
        buf.extend_from_slice(&Header::new(chunk.len() as u32, sequence_id).encode());
        buf.extend_from_slice(chunk);
        if chunk.len() < max {
            return buf;
        }
        rest = tail;
        sequence_id = sequence_id.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = Frame::from_payload(4, Bytes::from_static(b"\x01"));

        assert_eq!(frame.sequence_id(), 4);
        assert_eq!(frame.header.payload_length, 1);
        assert_eq!(frame.payload(), b"\x01");
        assert_eq!(frame.discriminator(), Some(0x01));
    }

    #[test]
    fn test_empty_payload_has_no_discriminator() {
        let frame = Frame::from_payload(0, Bytes::new());
        assert_eq!(frame.payload_len(), 0);
        assert_eq!(frame.discriminator(), None);
    }

    #[test]
    fn test_parse_roundtrip() {
        let bytes = build_frame(9, b"\xFE\x00\x00\x02\x00");
        let frame = Frame::parse(&bytes).unwrap();

        assert_eq!(frame.sequence_id(), 9);
        assert!(frame.is_eof());
        assert_eq!(frame.payload(), b"\xFE\x00\x00\x02\x00");
    }

    #[test]
    fn test_build_frame_splits_full_payload() {
        let payload = vec![0x5A; MAX_PACKET_PAYLOAD as usize];
        let bytes = build_frame(0xFF, &payload);

        assert_eq!(bytes.len(), 2 * HEADER_SIZE + payload.len());
        assert_eq!(&bytes[..HEADER_SIZE], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&bytes[bytes.len() - HEADER_SIZE..], &[0, 0, 0, 0x00]);
    }

    #[test]
    fn test_build_frame_splits_oversized_payload() {
        let payload = vec![0x5A; MAX_PACKET_PAYLOAD as usize + 3];
        let bytes = build_frame(2, &payload);

        let second = HEADER_SIZE + MAX_PACKET_PAYLOAD as usize;
        assert_eq!(bytes.len(), 2 * HEADER_SIZE + payload.len());
        assert_eq!(&bytes[second..second + HEADER_SIZE], &[3, 0, 0, 3]);
    }

    #[test]
    fn test_parse_short_header() {
        let err = Frame::parse(&[1, 0]).unwrap_err();
        assert!(matches!(
            err,
            MywireError::TruncatedInput {
                needed: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn test_parse_short_payload() {
        let mut bytes = build_frame(0, b"hello");
        bytes.truncate(6);
        let err = Frame::parse(&bytes).unwrap_err();
        assert!(matches!(
            err,
            MywireError::TruncatedInput {
                needed: 5,
                available: 2
            }
        ));
    }

    #[test]
    fn test_parse_surplus_payload() {
        let mut bytes = build_frame(0, b"hi");
        bytes.push(0);
        assert!(matches!(
            Frame::parse(&bytes),
            Err(MywireError::MalformedPacket(_))
        ));
    }
}
