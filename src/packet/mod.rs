//! Packet module - decoders for the structured packets of a query response.
//!
//! Each decoder consumes one complete payload (discriminator included) and
//! either returns a typed record or fails with `TruncatedInput` /
//! `MalformedPacket`. None of them looks at decoder phase; picking the right
//! decoder for a frame is the job of [`crate::response::ResponseDecoder`].
//!
//! - [`OkPacket`] - acknowledgement
//! - [`ErrPacket`] - server-side error
//! - [`decode_column_count`] - result-set header
//! - [`ColumnDefinition`] - one column's metadata
//! - [`EofPacket`] - end of columns / end of rows
//! - [`TextRow`] - one data row
//! - [`LocalInfileRequest`] - `LOAD DATA LOCAL INFILE` file request

mod column;
mod eof;
mod err;
mod infile;
mod ok;
mod row;
mod text;

pub use column::{decode_column_count, ColumnDefinition, ColumnFlags, ColumnType};
pub use eof::EofPacket;
pub use err::ErrPacket;
pub use infile::LocalInfileRequest;
pub use ok::{OkPacket, StatusFlags};
pub use row::TextRow;

#[cfg(test)]
pub(crate) use column::tests::column_payload;
