//! Response module - the per-connection query-response state machine.
//!
//! - [`ResponseDecoder`] - classifies frames and advances [`Phase`]
//! - [`ResponseEvent`] - what each frame turned out to be
//! - [`DecoderConfig`] / [`DecoderBuilder`] - decoding limits
//!
//! # Example
//!
//! ```
//! use mywire_client::protocol::Frame;
//! use mywire_client::response::{Phase, ResponseDecoder, ResponseEvent};
//!
//! let mut decoder = ResponseDecoder::new();
//! let event = decoder.decode(&Frame::from_payload(1, vec![0x03])).unwrap();
//!
//! assert_eq!(event, ResponseEvent::ResultHeader(3));
//! assert_eq!(decoder.phase(), Phase::AwaitingColumns { expected: 3 });
//! ```

mod decoder;
mod event;
mod phase;

pub use decoder::{DecoderBuilder, DecoderConfig, ResponseDecoder, DEFAULT_MAX_COLUMNS};
pub use event::ResponseEvent;
pub use phase::Phase;
