//! Session: the command API over one broker connection.
//!
//! A [`Session`] owns a single stream and the accumulation buffer for bytes
//! read from it. Command methods encode a frame, write it, and either return
//! immediately (BEGIN, COMMIT, ABORT, UNSUBSCRIBE, SEND, DISCONNECT) or
//! perform one blocking receive (CONNECT, SUBSCRIBE).
//!
//! One caller task drives a session serially; every method takes `&mut self`
//! so concurrent use is ruled out at compile time rather than with locks.
//! Receives block until the broker terminates a frame, with no timeout
//! (callers wanting a deadline can wrap a method in `tokio::time::timeout`).
//!
//! # Example
//!
//! ```ignore
//! use stomp_client::{Headers, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::builder()
//!         .host("broker.internal")
//!         .connect("guest", "guest")
//!         .await?;
//!
//!     session.send("/queue/a", "hello", Headers::new()).await?;
//!     let frames = session.subscribe("/queue/a", Headers::new()).await?;
//!     for frame in frames {
//!         println!("{}: {}", frame.command(), frame.body());
//!     }
//!     session.disconnect(Headers::new()).await?;
//!     Ok(())
//! }
//! ```

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{Result, StompError};
use crate::protocol::{encode_frame, Command, Frame, FrameBuffer, Headers};
use crate::transport;

/// Default broker host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default STOMP broker port.
pub const DEFAULT_PORT: u16 = 61613;

/// Default buffer size per socket read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 2048;

/// Builder for configuring and connecting a [`Session`].
///
/// # Example
///
/// ```ignore
/// let session = Session::builder()
///     .host("localhost")
///     .port(61613)
///     .connect("guest", "guest")
///     .await?;
/// ```
pub struct SessionBuilder {
    host: String,
    port: u16,
    read_chunk_size: usize,
}

impl SessionBuilder {
    /// Create a builder with default connection parameters.
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }

    /// Set the broker host. Default: `localhost`.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the broker port. Default: 61613.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the buffer size per socket read. Default: 2048 bytes.
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size;
        self
    }

    /// Open the TCP connection and perform the CONNECT handshake.
    ///
    /// Transmits CONNECT with `login` and `passcode` headers, then performs
    /// one blocking receive to sweep the broker's CONNECTED acknowledgement
    /// (which is discarded unparsed).
    pub async fn connect(self, login: &str, passcode: &str) -> Result<Session<TcpStream>> {
        let stream = transport::connect(&self.host, self.port).await?;
        let mut session = Session::with_chunk_size(stream, self.read_chunk_size);
        session.handshake(login, passcode).await?;
        Ok(session)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A STOMP session over one exclusively-owned stream connection.
///
/// Generic over the transport so tests can drive it with in-memory streams;
/// production sessions come from [`Session::connect`] or
/// [`SessionBuilder::connect`] and run over TCP.
pub struct Session<S> {
    /// The broker connection.
    stream: S,
    /// Bytes read but not yet resolved into frames. Persists across calls so
    /// partial frames spanning multiple reads are retained.
    buffer: FrameBuffer,
    /// Buffer size per socket read.
    read_chunk_size: usize,
}

impl Session<TcpStream> {
    /// Create a session builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Connect to the default broker address with the given credentials.
    pub async fn connect(login: &str, passcode: &str) -> Result<Self> {
        SessionBuilder::new().connect(login, passcode).await
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    /// Wrap an already-connected stream.
    ///
    /// No CONNECT handshake is performed; the caller decides whether the
    /// peer expects one.
    pub fn from_stream(stream: S) -> Self {
        Self::with_chunk_size(stream, DEFAULT_READ_CHUNK_SIZE)
    }

    fn with_chunk_size(stream: S, read_chunk_size: usize) -> Self {
        Self {
            stream,
            buffer: FrameBuffer::new(),
            read_chunk_size,
        }
    }

    /// Transmit CONNECT and sweep the acknowledgement.
    async fn handshake(&mut self, login: &str, passcode: &str) -> Result<()> {
        let mut headers = Headers::new();
        headers.insert("login".to_string(), login.to_string());
        headers.insert("passcode".to_string(), passcode.to_string());
        self.transmit(Command::Connect, &headers, "").await?;
        self.receive().await?;
        Ok(())
    }

    /// Open a transaction. Fire-and-forget.
    pub async fn begin(&mut self, headers: Headers) -> Result<()> {
        self.transmit(Command::Begin, &headers, "").await
    }

    /// Commit a transaction. Fire-and-forget.
    pub async fn commit(&mut self, headers: Headers) -> Result<()> {
        self.transmit(Command::Commit, &headers, "").await
    }

    /// Abort a transaction. Fire-and-forget.
    pub async fn abort(&mut self, headers: Headers) -> Result<()> {
        self.transmit(Command::Abort, &headers, "").await
    }

    /// Subscribe to a destination and return whatever MESSAGE frames the
    /// next receive decodes.
    ///
    /// The `destination` header is injected after merging caller headers, so
    /// it overrides any caller-supplied value for the same key. The returned
    /// list may hold zero, one, or many frames depending on what has arrived
    /// since the last read; there is no 1:1 request/reply correlation.
    pub async fn subscribe(&mut self, destination: &str, mut headers: Headers) -> Result<Vec<Frame>> {
        headers.insert("destination".to_string(), destination.to_string());
        self.transmit(Command::Subscribe, &headers, "").await?;
        self.receive().await
    }

    /// Unsubscribe from a destination. Fire-and-forget.
    pub async fn unsubscribe(&mut self, destination: &str, mut headers: Headers) -> Result<()> {
        headers.insert("destination".to_string(), destination.to_string());
        self.transmit(Command::Unsubscribe, &headers, "").await
    }

    /// Send a message to a destination. Fire-and-forget.
    pub async fn send(&mut self, destination: &str, message: &str, mut headers: Headers) -> Result<()> {
        headers.insert("destination".to_string(), destination.to_string());
        self.transmit(Command::Send, &headers, message).await
    }

    /// Transmit DISCONNECT. Fire-and-forget; the connection itself is left
    /// for the broker or the caller to close.
    pub async fn disconnect(&mut self, headers: Headers) -> Result<()> {
        self.transmit(Command::Disconnect, &headers, "").await
    }

    /// Blocking receive: read until at least one complete frame boundary is
    /// present, then decode and return all frames found.
    ///
    /// Blocks indefinitely if the broker never terminates a frame.
    ///
    /// # Errors
    ///
    /// [`StompError::ConnectionClosed`] on EOF, [`StompError::Connection`]
    /// on a read failure, [`StompError::Protocol`] on a malformed frame.
    pub async fn receive(&mut self) -> Result<Vec<Frame>> {
        let mut chunk = vec![0u8; self.read_chunk_size];
        loop {
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(StompError::ConnectionClosed);
            }
            if let Some(frames) = self.buffer.push(&chunk[..n])? {
                tracing::debug!(count = frames.len(), "decoded inbound frames");
                return Ok(frames);
            }
        }
    }

    /// Encode and write one frame.
    async fn transmit(&mut self, command: Command, headers: &Headers, body: &str) -> Result<()> {
        let bytes = encode_frame(command, headers, body);
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        tracing::debug!(%command, len = bytes.len(), "transmitted frame");
        Ok(())
    }
}
