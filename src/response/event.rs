//! Events emitted by the response decoder.

use serde::Serialize;

use crate::error::Result;
use crate::packet::{
    ColumnDefinition, EofPacket, ErrPacket, LocalInfileRequest, OkPacket, TextRow,
};

/// One decoded frame, classified by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResponseEvent {
    /// Statement completed without a result set.
    Acknowledgement(OkPacket),
    /// Server reported an application-level error.
    Error(ErrPacket),
    /// Server asks the client to upload a local file.
    LocalInfileRequest(LocalInfileRequest),
    /// A result set with this many columns begins.
    ResultHeader(u64),
    ColumnDescriptor(ColumnDefinition),
    ColumnsComplete(EofPacket),
    Row(TextRow),
    RowsComplete(EofPacket),
}

impl ResponseEvent {
    /// Whether this event returns the decoder to `Idle`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ResponseEvent::Acknowledgement(_)
                | ResponseEvent::Error(_)
                | ResponseEvent::LocalInfileRequest(_)
                | ResponseEvent::RowsComplete(_)
        )
    }

    /// Whether the server announced another result set after this one.
    pub fn has_more_results(&self) -> bool {
        match self {
            ResponseEvent::Acknowledgement(ok) => ok.status.more_results(),
            ResponseEvent::RowsComplete(eof) => eof.status.more_results(),
            _ => false,
        }
    }

    /// Serialize to a JSON object tagged with the event kind.
    ///
    /// Row values and column defaults render as text; NULL becomes `null`.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseEvent::Acknowledgement(_) => "Acknowledgement",
            ResponseEvent::Error(_) => "Error",
            ResponseEvent::LocalInfileRequest(_) => "LocalInfileRequest",
            ResponseEvent::ResultHeader(_) => "ResultHeader",
            ResponseEvent::ColumnDescriptor(_) => "ColumnDescriptor",
            ResponseEvent::ColumnsComplete(_) => "ColumnsComplete",
            ResponseEvent::Row(_) => "Row",
            ResponseEvent::RowsComplete(_) => "RowsComplete",
        }
    }
}
