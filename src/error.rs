//! Error types for stomp-client.

use thiserror::Error;

/// Main error type for all STOMP session operations.
///
/// Every failure is terminal for the operation that raised it: there is no
/// retry or local recovery anywhere in this crate. After a
/// [`StompError::Protocol`] the accumulation buffer's contents are undefined
/// and the session should be dropped and re-established rather than reused.
#[derive(Debug, Error)]
pub enum StompError {
    /// I/O failure while connecting, reading, or writing the broker stream.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// The broker closed the connection while a frame was still outstanding.
    #[error("connection closed")]
    ConnectionClosed,

    /// Malformed frame encountered during decode (missing header delimiter,
    /// non-UTF-8 data).
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Result type alias using StompError.
pub type Result<T> = std::result::Result<T, StompError>;
