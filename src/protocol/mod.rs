//! Protocol module - wire format, framing, and frame types.
//!
//! This module implements the packet layer underneath the response decoder:
//! - 4-byte header encoding/decoding
//! - Frame buffer for accumulating partial reads and joining continuations
//! - Frame struct with typed accessors

mod frame;
mod frame_buffer;
mod wire_format;

pub use frame::{build_frame, Frame};
pub use frame_buffer::FrameBuffer;
pub use wire_format::{
    markers, Header, DEFAULT_MAX_PAYLOAD_SIZE, HEADER_SIZE, MAX_PACKET_PAYLOAD,
};
