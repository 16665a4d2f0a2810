//! Codec module - primitive encodings shared by every packet decoder.
//!
//! - [`read_lenenc_int`] - the self-describing variable-width integer
//! - [`PayloadReader`] - cursor over a payload with lenenc and LE readers
//! - [`put_lenenc_int`] / [`put_lenenc_bytes`] - encoders for building frames
//!
//! # Example
//!
//! ```
//! use mywire_client::codec::{put_lenenc_bytes, PayloadReader};
//! use bytes::Bytes;
//!
//! let mut buf = Vec::new();
//! put_lenenc_bytes(&mut buf, b"users");
//!
//! let mut reader = PayloadReader::new(Bytes::from(buf));
//! assert_eq!(reader.lenenc_str().unwrap(), "users");
//! ```

mod lenenc;
mod reader;

pub use lenenc::{lenenc_int_len, put_lenenc_bytes, put_lenenc_int, read_lenenc_int};
pub use reader::PayloadReader;
