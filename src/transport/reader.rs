//! Async frame source over any byte stream.
//!
//! # Example
//!
//! ```ignore
//! use mywire_client::handler::ResultSetCollector;
//! use mywire_client::response::ResponseDecoder;
//! use mywire_client::transport::{read_response, FrameReader};
//!
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:3306").await?;
//! // ... handshake and COM_QUERY written by the connection layer ...
//! let mut frames = FrameReader::new(stream);
//! let mut decoder = ResponseDecoder::new();
//! let mut rows = ResultSetCollector::new();
//! read_response(&mut frames, &mut decoder, &mut rows).await?;
//! ```

use std::collections::VecDeque;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{MywireError, Result};
use crate::handler::ResponseHandler;
use crate::protocol::{Frame, FrameBuffer};
use crate::response::ResponseDecoder;

/// Size of a single socket read.
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Reads complete logical frames from an `AsyncRead`.
pub struct FrameReader<R> {
    reader: R,
    buffer: FrameBuffer,
    ready: VecDeque<Frame>,
    chunk: Vec<u8>,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_buffer(reader, FrameBuffer::new())
    }

    /// Use a preconfigured frame buffer, e.g. one with a smaller payload limit.
    pub fn with_buffer(reader: R, buffer: FrameBuffer) -> Self {
        Self {
            reader,
            buffer,
            ready: VecDeque::new(),
            chunk: vec![0u8; READ_CHUNK_SIZE],
        }
    }

    /// Next complete frame.
    ///
    /// Returns `Ok(None)` on EOF between frames and `ConnectionClosed` on EOF
    /// in the middle of one.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.ready.pop_front() {
                return Ok(Some(frame));
            }

            let n = self.reader.read(&mut self.chunk).await?;
            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                tracing::debug!("EOF with {} bytes of a partial frame buffered", self.buffer.len());
                return Err(MywireError::ConnectionClosed);
            }

            self.ready.extend(self.buffer.push(&self.chunk[..n])?);
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Feed frames into `decoder` until the response is complete.
///
/// Stops after a terminal event that does not announce further result sets.
/// Any error is returned as-is; tearing the connection down is up to the
/// caller.
pub async fn read_response<R, H>(
    frames: &mut FrameReader<R>,
    decoder: &mut ResponseDecoder,
    handler: &mut H,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    H: ResponseHandler,
{
    loop {
        let frame = frames
            .next_frame()
            .await?
            .ok_or(MywireError::ConnectionClosed)?;

        let event = decoder.dispatch(&frame, handler)?;
        if event.is_terminal() && !event.has_more_results() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{QueryResult, ResultSetCollector};
    use crate::packet::column_payload;
    use crate::protocol::build_frame;
    use tokio::io::{duplex, AsyncWriteExt};

    #[tokio::test]
    async fn test_next_frame_across_reads() {
        let (mut client, server) = duplex(64);
        let mut reader = FrameReader::new(server);

        let bytes = build_frame(1, b"\x00\x00\x00\x02\x00\x00\x00");
        tokio::spawn(async move {
            client.write_all(&bytes[..3]).await.unwrap();
            client.write_all(&bytes[3..]).await.unwrap();
        });

        let frame = reader.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.discriminator(), Some(0x00));
        assert!(reader.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_eof_mid_frame() {
        let (mut client, server) = duplex(64);
        let mut reader = FrameReader::new(server);

        client.write_all(&[0x05, 0x00, 0x00, 0x01, 0x00]).await.unwrap();
        drop(client);

        assert!(matches!(
            reader.next_frame().await,
            Err(MywireError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_read_response_stops_at_rows_complete() {
        let (mut client, server) = duplex(4096);

        let mut wire = Vec::new();
        wire.extend(build_frame(1, &[0x01]));
        wire.extend(build_frame(2, &column_payload("v", 0xFD, 0)));
        wire.extend(build_frame(3, &[0xFE, 0, 0, 0x02, 0]));
        wire.extend(build_frame(4, b"\x03abc"));
        wire.extend(build_frame(5, &[0xFE, 0, 0, 0x02, 0]));
        // Next response, must stay unread.
        wire.extend(build_frame(1, &[0x00, 0, 0, 0x02, 0, 0, 0]));
        client.write_all(&wire).await.unwrap();

        let mut frames = FrameReader::new(server);
        let mut decoder = ResponseDecoder::new();
        let mut collector = ResultSetCollector::new();

        read_response(&mut frames, &mut decoder, &mut collector)
            .await
            .unwrap();

        let results = collector.into_results();
        assert_eq!(results.len(), 1);
        let QueryResult::Rows(set) = &results[0] else {
            panic!("expected rows");
        };
        assert_eq!(set.rows[0].get_str(0), Some("abc"));

        let next = frames.next_frame().await.unwrap().unwrap();
        assert_eq!(next.discriminator(), Some(0x00));
    }

    #[tokio::test]
    async fn test_read_response_follows_more_results() {
        let (mut client, server) = duplex(4096);

        let mut wire = Vec::new();
        // OK with MORE_RESULTS_EXISTS, then a plain OK.
        wire.extend(build_frame(1, &[0x00, 0x01, 0x00, 0x0A, 0x00, 0x00, 0x00]));
        wire.extend(build_frame(2, &[0x00, 0x02, 0x00, 0x02, 0x00, 0x00, 0x00]));
        client.write_all(&wire).await.unwrap();

        let mut frames = FrameReader::new(server);
        let mut decoder = ResponseDecoder::new();
        let mut collector = ResultSetCollector::new();

        read_response(&mut frames, &mut decoder, &mut collector)
            .await
            .unwrap();

        let affected: Vec<u64> = collector
            .results()
            .iter()
            .map(|r| match r {
                QueryResult::Ok(ok) => ok.affected_rows,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(affected, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_read_response_connection_closed() {
        let (mut client, server) = duplex(4096);
        client.write_all(&build_frame(1, &[0x02])).await.unwrap();
        drop(client);

        let mut frames = FrameReader::new(server);
        let mut decoder = ResponseDecoder::new();
        let mut collector = ResultSetCollector::new();

        let err = read_response(&mut frames, &mut decoder, &mut collector)
            .await
            .unwrap_err();
        assert!(matches!(err, MywireError::ConnectionClosed));
    }
}
