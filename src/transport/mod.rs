//! Transport module - turns a byte stream into frames for the decoder.
//!
//! Connection setup, handshake and request writing belong to the caller;
//! this only reads.

mod reader;

pub use reader::{read_response, FrameReader};
