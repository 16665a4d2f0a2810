//! Error types for mywire-client.

use thiserror::Error;

/// Main error type for all decoding and transport operations.
#[derive(Debug, Error)]
pub enum MywireError {
    /// A decoder needed more bytes than the frame supplied.
    ///
    /// Always indicates framing desync.
    #[error("Truncated input: needed {needed} bytes, {available} available")]
    TruncatedInput { needed: usize, available: usize },

    /// A decoded value violates the expected packet shape.
    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    /// The decoder already reported a fatal violation and refuses further frames.
    #[error("Decoder halted after a protocol violation")]
    Halted,

    /// I/O error while reading frames from the transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport reached EOF in the middle of a frame or response.
    #[error("Connection closed")]
    ConnectionClosed,

    /// JSON export of a collected result set failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MywireError {
    pub(crate) fn truncated(needed: usize, available: usize) -> Self {
        MywireError::TruncatedInput { needed, available }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        MywireError::MalformedPacket(msg.into())
    }

    /// Whether the owning connection has to be torn down after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, MywireError::Json(_))
    }
}

/// Result type alias using MywireError.
pub type Result<T> = std::result::Result<T, MywireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = MywireError::truncated(3, 1);
        assert_eq!(
            err.to_string(),
            "Truncated input: needed 3 bytes, 1 available"
        );

        let err = MywireError::malformed("bad discriminator");
        assert_eq!(err.to_string(), "Malformed packet: bad discriminator");
    }

    #[test]
    fn test_fatality() {
        assert!(MywireError::truncated(1, 0).is_fatal());
        assert!(MywireError::malformed("x").is_fatal());
        assert!(MywireError::Halted.is_fatal());
        assert!(MywireError::ConnectionClosed.is_fatal());

        let json_err = serde_json::from_str::<u8>("nope").unwrap_err();
        assert!(!MywireError::from(json_err).is_fatal());
    }
}
