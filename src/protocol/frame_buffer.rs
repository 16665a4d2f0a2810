//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for buffer management.
//! Implements a state machine for handling fragmented frames:
//! - `WaitingForHeader`: Need at least 4 bytes
//! - `WaitingForPayload`: Header parsed, need N more payload bytes
//!
//! Payloads of exactly `MAX_PACKET_PAYLOAD` bytes are continued by the next
//! frame. The pieces are joined so callers only ever see logical frames; a
//! joined frame reports the total length and the last sequence id.
//!
//! # Example
//!
//! ```
//! use mywire_client::protocol::{build_frame, FrameBuffer};
//!
//! let mut buffer = FrameBuffer::new();
//! let bytes = build_frame(1, &[0x02]);
//!
//! assert!(buffer.push(&bytes[..2]).unwrap().is_empty());
//! let frames = buffer.push(&bytes[2..]).unwrap();
//! assert_eq!(frames[0].discriminator(), Some(0x02));
//! ```

use bytes::BytesMut;

use super::wire_format::{Header, DEFAULT_MAX_PAYLOAD_SIZE, HEADER_SIZE};
use super::Frame;
use crate::error::{MywireError, Result};

/// State machine for frame parsing.
#[derive(Debug, Clone)]
enum State {
    /// Waiting for complete header (need 4 bytes).
    WaitingForHeader,
    /// Header parsed, waiting for payload bytes.
    WaitingForPayload { header: Header },
}

/// A payload that spans several physical frames.
struct Continuation {
    payload: BytesMut,
    next_sequence: u8,
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
pub struct FrameBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Pending multi-frame payload.
    continuation: Option<Continuation>,
    /// Maximum allowed logical payload size.
    max_payload_size: u32,
}

impl FrameBuffer {
    /// Create a new frame buffer with default settings.
    ///
    /// Default capacity: 64KB, max payload: 64MB.
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD_SIZE)
    }

    /// Create a new frame buffer with custom max payload size.
    pub fn with_max_payload(max_payload_size: u32) -> Self {
        Self {
            buffer: BytesMut::with_capacity(64 * 1024),
            state: State::WaitingForHeader,
            continuation: None,
            max_payload_size,
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// Partial data is buffered internally for the next push.
    ///
    /// # Errors
    ///
    /// Returns error if a logical payload exceeds `max_payload_size` or a
    /// continuation frame arrives out of sequence.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one()? {
            frames.push(frame);
        }

        Ok(frames)
    }

    /// Try to extract a single logical frame from the buffer.
    ///
    /// Returns:
    /// - `Ok(Some(frame))` if a complete frame was extracted
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` on protocol violation
    fn try_extract_one(&mut self) -> Result<Option<Frame>> {
        loop {
            match &self.state {
                State::WaitingForHeader => {
                    let Some(header) = Header::decode(&self.buffer) else {
                        return Ok(None);
                    };

                    let pending = self.continuation.as_ref().map_or(0, |c| c.payload.len());
                    if pending + header.payload_length as usize > self.max_payload_size as usize {
                        return Err(MywireError::malformed(format!(
                            "Payload size {} exceeds maximum {}",
                            pending + header.payload_length as usize,
                            self.max_payload_size
                        )));
                    }

                    if let Some(cont) = &self.continuation {
                        if header.sequence_id != cont.next_sequence {
                            return Err(MywireError::malformed(format!(
                                "Continuation frame has sequence {} but {} was expected",
                                header.sequence_id, cont.next_sequence
                            )));
                        }
                    }

                    let _ = self.buffer.split_to(HEADER_SIZE);
                    self.state = State::WaitingForPayload { header };
                }

                State::WaitingForPayload { header } => {
                    let header = *header;
                    let len = header.payload_length as usize;
                    if self.buffer.len() < len {
                        return Ok(None);
                    }

                    let piece = self.buffer.split_to(len);
                    self.state = State::WaitingForHeader;

                    let payload = match self.continuation.take() {
                        Some(mut cont) => {
                            cont.payload.extend_from_slice(&piece);
                            cont.payload
                        }
                        None => piece,
                    };

                    if header.is_continued() {
                        tracing::trace!(
                            "Frame {} continues, {} bytes so far",
                            header.sequence_id,
                            payload.len()
                        );
                        self.continuation = Some(Continuation {
                            payload,
                            next_sequence: header.sequence_id.wrapping_add(1),
                        });
                        continue;
                    }

                    let header = Header::new(payload.len() as u32, header.sequence_id);
                    return Ok(Some(Frame::new(header, payload.freeze())));
                }
            }
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer holds no partial frame.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
            && self.continuation.is_none()
            && matches!(self.state, State::WaitingForHeader)
    }

    /// Clear the buffer and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.continuation = None;
        self.state = State::WaitingForHeader;
    }

    /// Get the current state for debugging.
    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match &self.state {
            State::WaitingForHeader => "WaitingForHeader",
            State::WaitingForPayload { .. } => "WaitingForPayload",
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
