//! TCP transport to the broker.
//!
//! A session owns exactly one stream for its whole lifetime; this module
//! only dials it. Connection teardown is left to the broker or the caller
//! after DISCONNECT.

use tokio::net::TcpStream;

use crate::error::Result;

/// Open a TCP connection to the broker at `(host, port)`.
pub async fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let stream = TcpStream::connect((host, port)).await?;
    tracing::debug!(host, port, "connected to broker");
    Ok(stream)
}
