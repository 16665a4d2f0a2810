//! Handler module - owner-side sinks for decoder events.
//!
//! Provides:
//! - [`ResponseHandler`] - one callback per event kind
//! - [`ResultSetCollector`] - buffers a whole response into [`QueryResult`]s
//!
//! # Example
//!
//! ```
//! use mywire_client::handler::ResultSetCollector;
//! use mywire_client::protocol::build_frame;
//! use mywire_client::response::ResponseDecoder;
//!
//! let mut decoder = ResponseDecoder::new();
//! let mut collector = ResultSetCollector::new();
//!
//! let ok = build_frame(1, &[0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00]);
//! decoder.dispatch_bytes(&ok, &mut collector).unwrap();
//!
//! let results = collector.into_results();
//! assert_eq!(results.len(), 1);
//! ```

mod collector;

pub use collector::{QueryResult, ResultSet, ResultSetCollector};

use crate::error::Result;
use crate::packet::{
    ColumnDefinition, EofPacket, ErrPacket, LocalInfileRequest, OkPacket, TextRow,
};
use crate::response::ResponseEvent;

/// Receives decoded events in wire order.
///
/// Every callback defaults to a no-op. Returning `Err` stops dispatch and the
/// error is handed back to whoever fed the frame.
pub trait ResponseHandler {
    fn on_ok(&mut self, _ok: OkPacket) -> Result<()> {
        Ok(())
    }

    fn on_error(&mut self, _err: ErrPacket) -> Result<()> {
        Ok(())
    }

    fn on_local_infile(&mut self, _request: LocalInfileRequest) -> Result<()> {
        Ok(())
    }

    fn on_result_header(&mut self, _column_count: u64) -> Result<()> {
        Ok(())
    }

    fn on_column(&mut self, _column: ColumnDefinition) -> Result<()> {
        Ok(())
    }

    fn on_columns_complete(&mut self, _eof: EofPacket) -> Result<()> {
        Ok(())
    }

    fn on_row(&mut self, _row: TextRow) -> Result<()> {
        Ok(())
    }

    fn on_rows_complete(&mut self, _eof: EofPacket) -> Result<()> {
        Ok(())
    }

    /// Route one event to its callback.
    fn handle_event(&mut self, event: ResponseEvent) -> Result<()> {
        match event {
            ResponseEvent::Acknowledgement(ok) => self.on_ok(ok),
            ResponseEvent::Error(err) => self.on_error(err),
            ResponseEvent::LocalInfileRequest(req) => self.on_local_infile(req),
            ResponseEvent::ResultHeader(n) => self.on_result_header(n),
            ResponseEvent::ColumnDescriptor(col) => self.on_column(col),
            ResponseEvent::ColumnsComplete(eof) => self.on_columns_complete(eof),
            ResponseEvent::Row(row) => self.on_row(row),
            ResponseEvent::RowsComplete(eof) => self.on_rows_complete(eof),
        }
    }
}

impl<H: ResponseHandler + ?Sized> ResponseHandler for &mut H {
    fn on_ok(&mut self, ok: OkPacket) -> Result<()> {
        (**self).on_ok(ok)
    }

    fn on_error(&mut self, err: ErrPacket) -> Result<()> {
        (**self).on_error(err)
    }

    fn on_local_infile(&mut self, request: LocalInfileRequest) -> Result<()> {
        (**self).on_local_infile(request)
    }

    fn on_result_header(&mut self, column_count: u64) -> Result<()> {
        (**self).on_result_header(column_count)
    }

    fn on_column(&mut self, column: ColumnDefinition) -> Result<()> {
        (**self).on_column(column)
    }

    fn on_columns_complete(&mut self, eof: EofPacket) -> Result<()> {
        (**self).on_columns_complete(eof)
    }

    fn on_row(&mut self, row: TextRow) -> Result<()> {
        (**self).on_row(row)
    }

    fn on_rows_complete(&mut self, eof: EofPacket) -> Result<()> {
        (**self).on_rows_complete(eof)
    }

    fn handle_event(&mut self, event: ResponseEvent) -> Result<()> {
        (**self).handle_event(event)
    }
}
