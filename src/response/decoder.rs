//! Response state machine.
//!
//! Maps `(phase, discriminator)` to the packet decoder to run, the next
//! phase, and the event to emit:
//!
//! ```text
//! Phase            Discriminator   Decoder            Next phase
//! ---------------  --------------  -----------------  ----------------
//! Idle             0x00            OkPacket           Idle
//! Idle             0xFF            ErrPacket          Idle
//! Idle             0xFB            LocalInfileRequest Idle
//! Idle             other           column count (n)   AwaitingColumns(n)
//! AwaitingColumns  0xFF            ErrPacket          Idle
//! AwaitingColumns  0xFE (short)    EofPacket          AwaitingRows
//! AwaitingColumns  other           ColumnDefinition   AwaitingColumns
//! AwaitingRows     0xFF            ErrPacket          Idle
//! AwaitingRows     0xFE (short)    EofPacket          Idle
//! AwaitingRows     other           TextRow            AwaitingRows
//! ```
//!
//! Any decode failure halts the decoder for good: framing alignment is lost
//! and the owner must drop the connection.

use super::{Phase, ResponseEvent};
use crate::error::{MywireError, Result};
use crate::handler::ResponseHandler;
use crate::packet::{
    decode_column_count, ColumnDefinition, EofPacket, ErrPacket, LocalInfileRequest, OkPacket,
    TextRow,
};
use crate::protocol::{markers, Frame, DEFAULT_MAX_PAYLOAD_SIZE};

/// Default upper bound on the column count a header may announce.
pub const DEFAULT_MAX_COLUMNS: usize = 4096;

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Largest column count accepted from a result-set header.
    pub max_columns: usize,
    /// Largest frame payload accepted.
    pub max_payload_size: u32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_columns: DEFAULT_MAX_COLUMNS,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

/// Builder for a [`ResponseDecoder`].
#[derive(Debug, Default)]
pub struct DecoderBuilder {
    config: DecoderConfig,
}

impl DecoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest column count a header may announce.
    ///
    /// Default: 4096
    pub fn max_columns(mut self, limit: usize) -> Self {
        self.config.max_columns = limit;
        self
    }

    /// Set the largest frame payload accepted.
    ///
    /// Default: 64 MB
    pub fn max_payload_size(mut self, limit: u32) -> Self {
        self.config.max_payload_size = limit;
        self
    }

    pub fn build(self) -> ResponseDecoder {
        ResponseDecoder::with_config(self.config)
    }
}

/// Per-connection decoder for the query-response stream.
///
/// Not shared across connections. Frames must be fed in wire order by the
/// single task that reads the connection.
#[derive(Debug)]
pub struct ResponseDecoder {
    config: DecoderConfig,
    phase: Phase,
    /// Column definitions of the result set in flight.
    columns: Vec<ColumnDefinition>,
    halted: bool,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            columns: Vec::new(),
            halted: false,
        }
    }

    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::new()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Column definitions accumulated for the result set in flight.
    #[inline]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    #[inline]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Whether a protocol violation stopped this decoder.
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Decode one frame and advance the phase.
    ///
    /// # Errors
    ///
    /// `TruncatedInput` or `MalformedPacket` on a protocol violation, after
    /// which every further call returns `Halted`.
    pub fn decode(&mut self, frame: &Frame) -> Result<ResponseEvent> {
        if self.halted {
            return Err(MywireError::Halted);
        }

        let result = self.step(frame);
        if let Err(e) = &result {
            self.halt(e);
        }
        result
    }

    /// Parse raw frame bytes (4-byte header included) and decode them.
    pub fn decode_bytes(&mut self, data: &[u8]) -> Result<ResponseEvent> {
        if self.halted {
            return Err(MywireError::Halted);
        }

        match Frame::parse(data) {
            Ok(frame) => self.decode(&frame),
            Err(e) => {
                self.halt(&e);
                Err(e)
            }
        }
    }

    /// Decode one frame and hand the event to `handler`.
    pub fn dispatch<H: ResponseHandler>(
        &mut self,
        frame: &Frame,
        handler: &mut H,
    ) -> Result<ResponseEvent> {
        let event = self.decode(frame)?;
        handler.handle_event(event.clone())?;
        Ok(event)
    }

    /// Parse raw frame bytes, decode them and hand the event to `handler`.
    pub fn dispatch_bytes<H: ResponseHandler>(
        &mut self,
        data: &[u8],
        handler: &mut H,
    ) -> Result<ResponseEvent> {
        let event = self.decode_bytes(data)?;
        handler.handle_event(event.clone())?;
        Ok(event)
    }

    fn step(&mut self, frame: &Frame) -> Result<ResponseEvent> {
        let payload = &frame.payload;
        if payload.len() > self.config.max_payload_size as usize {
            return Err(MywireError::malformed(format!(
                "Payload size {} exceeds maximum {}",
                payload.len(),
                self.config.max_payload_size
            )));
        }

        let discriminator = frame
            .discriminator()
            .ok_or_else(|| MywireError::truncated(1, 0))?;

        match (self.phase, discriminator) {
            (_, markers::ERR) => {
                let err = ErrPacket::decode(payload)?;
                tracing::debug!("Server error in phase {}: {}", self.phase, err);
                self.enter_idle();
                Ok(ResponseEvent::Error(err))
            }

            (Phase::Idle, markers::OK) => {
                let ok = OkPacket::decode(payload)?;
                tracing::debug!(
                    "OK: {} affected rows, last insert id {}",
                    ok.affected_rows,
                    ok.last_insert_id
                );
                Ok(ResponseEvent::Acknowledgement(ok))
            }

            (Phase::Idle, markers::LOCAL_INFILE) => {
                let request = LocalInfileRequest::decode(payload)?;
                tracing::debug!("Local infile request for {}", request.filename);
                Ok(ResponseEvent::LocalInfileRequest(request))
            }

            (Phase::Idle, _) => {
                let expected = decode_column_count(payload, self.config.max_columns)?;
                tracing::debug!("Result set with {} columns", expected);
                self.columns = Vec::with_capacity(expected as usize);
                self.transition(Phase::AwaitingColumns { expected });
                Ok(ResponseEvent::ResultHeader(expected))
            }

            (Phase::AwaitingColumns { expected }, markers::EOF) if frame.is_eof() => {
                let eof = EofPacket::decode(payload)?;
                if self.columns.len() as u64 != expected {
                    return Err(MywireError::malformed(format!(
                        "Column list closed after {} definitions, header announced {}",
                        self.columns.len(),
                        expected
                    )));
                }
                tracing::debug!("Columns complete: {}", self.columns.len());
                self.transition(Phase::AwaitingRows {
                    columns: self.columns.len(),
                });
                Ok(ResponseEvent::ColumnsComplete(eof))
            }

            (Phase::AwaitingColumns { expected }, _) => {
                let column = ColumnDefinition::decode(payload)?;
                if self.columns.len() as u64 >= expected {
                    return Err(MywireError::malformed(format!(
                        "Column definition '{}' beyond the {} announced",
                        column.name, expected
                    )));
                }
                tracing::trace!("Column {}: {}", self.columns.len(), column.name);
                self.columns.push(column.clone());
                Ok(ResponseEvent::ColumnDescriptor(column))
            }

            (Phase::AwaitingRows { .. }, markers::EOF) if frame.is_eof() => {
                let eof = EofPacket::decode(payload)?;
                tracing::debug!("Rows complete, status 0x{:04X}", eof.status.0);
                self.enter_idle();
                Ok(ResponseEvent::RowsComplete(eof))
            }

            (Phase::AwaitingRows { columns }, _) => {
                debug_assert_eq!(columns, self.columns.len());
                let row = TextRow::decode(payload, columns)?;
                Ok(ResponseEvent::Row(row))
            }
        }
    }

    fn transition(&mut self, next: Phase) {
        tracing::trace!("Phase {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Return to `Idle` and drop the in-flight result set.
    fn enter_idle(&mut self) {
        self.transition(Phase::Idle);
        self.columns = Vec::new();
    }

    fn halt(&mut self, error: &MywireError) {
        tracing::warn!(
            "Protocol violation in phase {}, halting decoder: {}",
            self.phase,
            error
        );
        self.halted = true;
        self.phase = Phase::Idle;
        self.columns = Vec::new();
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}
