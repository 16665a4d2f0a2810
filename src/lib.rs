//! # mywire-client
//!
//! Client-side decoder for the MySQL text-protocol query response stream.
//!
//! A query answer arrives as a sequence of length-prefixed frames whose
//! meaning depends on what came before: the same first byte can be an
//! acknowledgement, a column count, or the start of a row value. This crate
//! tracks that context per connection and turns each frame into a typed
//! event.
//!
//! ## Architecture
//!
//! - **Protocol**: 4-byte frame header, frame buffer for partial reads
//! - **Codec**: length-encoded integers and a payload cursor
//! - **Packet**: OK / ERR / column count / column definition / EOF / row decoders
//! - **Response**: the per-connection state machine emitting [`ResponseEvent`]s
//! - **Handler**: owner-side sinks, including a collecting [`ResultSetCollector`]
//! - **Transport**: async [`transport::FrameReader`] over any `AsyncRead`
//!
//! ## Example
//!
//! ```
//! use mywire_client::protocol::build_frame;
//! use mywire_client::{ResponseDecoder, ResponseEvent};
//!
//! let mut decoder = ResponseDecoder::new();
//! let event = decoder
//!     .decode_bytes(&build_frame(1, &[0xFF, 0x48, 0x04, b'#', b'4', b'2', b'0', b'0', b'0']))
//!     .unwrap();
//!
//! assert!(matches!(event, ResponseEvent::Error(e) if e.code == 1096));
//! ```

pub mod codec;
pub mod error;
pub mod handler;
pub mod packet;
pub mod protocol;
pub mod response;
pub mod transport;

pub use error::{MywireError, Result};
pub use handler::{QueryResult, ResponseHandler, ResultSet, ResultSetCollector};
pub use response::{Phase, ResponseDecoder, ResponseEvent};
