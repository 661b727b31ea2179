//! Frame wire encoding and the accumulation buffer for decoding.
//!
//! Two halves, both pure of I/O:
//!
//! - [`encode_frame`] turns a (command, headers, body) triple into outbound
//!   bytes.
//! - [`FrameBuffer`] accumulates inbound bytes across socket reads and, once
//!   the terminal NUL condition holds, decodes the buffer into MESSAGE
//!   frames.
//!
//! The wire grammar is asymmetric as observed on real brokers: outbound
//! lines are terminated with carriage return, inbound frames are parsed on
//! newline. That asymmetry is part of the protocol surface and is preserved
//! here, not corrected.
//!
//! There is no escaping: a header name or value containing `:`, a newline,
//! or the NUL byte corrupts framing. Inherited wire-compatibility
//! limitation.

use bytes::BytesMut;

use super::{Command, Frame, Headers};
use crate::error::{Result, StompError};

/// Frame terminator byte.
const NUL: u8 = 0x00;

/// Outbound line terminator.
const LINE_END: u8 = b'\r';

/// Inbound command marker the decoder splits on. MESSAGE is the only broker
/// command surfaced as a structured frame; everything preceding the first
/// marker (the CONNECTED acknowledgement, typically) is swept unparsed.
const MESSAGE_MARKER: &str = "MESSAGE\n";

/// Encode a frame for transmission.
///
/// Emits, in order: the command line, one `key:value` line per header entry
/// (header-map iteration order), a blank line ending the headers, the body
/// line (empty body still emits an empty line), and the NUL terminator line.
///
/// # Example
///
/// ```
/// use stomp_client::protocol::{encode_frame, Command, Headers};
///
/// let bytes = encode_frame(Command::Begin, &Headers::new(), "");
/// assert_eq!(bytes, b"BEGIN\r\r\r\x00\r");
/// ```
pub fn encode_frame(command: Command, headers: &Headers, body: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(command.as_str().len() + body.len() + 16);
    buf.extend_from_slice(command.as_str().as_bytes());
    buf.push(LINE_END);
    for (name, value) in headers {
        buf.extend_from_slice(name.as_bytes());
        buf.push(b':');
        buf.extend_from_slice(value.as_bytes());
        buf.push(LINE_END);
    }
    buf.push(LINE_END);
    buf.extend_from_slice(body.as_bytes());
    buf.push(LINE_END);
    buf.push(NUL);
    buf.push(LINE_END);
    buf
}

/// Buffer accumulating inbound bytes until complete frames can be decoded.
///
/// Decoding is only attempted once the buffer ends in the terminal
/// condition: a NUL byte last, or second-to-last (some brokers append one
/// hanging newline after the terminator). Until then every pushed byte is
/// retained for the next push, so partial frames spanning multiple socket
/// reads are never lost.
pub struct FrameBuffer {
    /// Accumulated bytes not yet resolved into frames.
    buffer: BytesMut,
}

impl FrameBuffer {
    /// Create an empty frame buffer.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(2048),
        }
    }

    /// Push received data and decode if a frame boundary has been reached.
    ///
    /// Returns:
    /// - `Ok(None)` if the terminal condition does not yet hold; the caller
    ///   must keep reading from the connection.
    /// - `Ok(Some(frames))` once it does; the buffer is fully consumed. The
    ///   vector may be empty when the buffer held only non-MESSAGE material
    ///   (e.g. the CONNECTED acknowledgement).
    ///
    /// # Errors
    ///
    /// [`StompError::Protocol`] on non-UTF-8 data or a header line without a
    /// `:` delimiter. Buffer contents after an error are undefined.
    pub fn push(&mut self, data: &[u8]) -> Result<Option<Vec<Frame>>> {
        self.buffer.extend_from_slice(data);

        if !is_terminal(&self.buffer) {
            return Ok(None);
        }

        let text = std::str::from_utf8(&self.buffer)
            .map_err(|e| StompError::Protocol(format!("frame data is not valid UTF-8: {e}")))?;
        let frames = decode_messages(text)?;
        self.buffer.clear();
        Ok(Some(frames))
    }

    /// Get the number of buffered, not-yet-decoded bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard all buffered bytes.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal condition: buffer ends with NUL, or with NUL followed by one
/// trailing byte (the hanging newline).
fn is_terminal(buf: &[u8]) -> bool {
    matches!(buf, [.., NUL] | [.., NUL, _])
}

/// Decode a terminal buffer into MESSAGE frames.
///
/// Splits on the `MESSAGE\n` marker; the first segment is preamble and is
/// discarded.
fn decode_messages(text: &str) -> Result<Vec<Frame>> {
    let mut segments = text.split(MESSAGE_MARKER);
    segments.next();

    let mut frames = Vec::new();
    for segment in segments {
        frames.push(decode_segment(segment)?);
    }
    Ok(frames)
}

/// Parse one MESSAGE segment (everything after its command line).
///
/// Header lines until the first blank line, body lines after it. A line
/// consisting solely of the NUL terminator is skipped. Body lines are
/// rejoined with `\n`, reconstructing multi-line bodies.
fn decode_segment(segment: &str) -> Result<Frame> {
    let mut headers = Headers::new();
    let mut body_lines: Vec<&str> = Vec::new();
    let mut in_headers = true;

    for line in segment.split('\n') {
        if line.is_empty() {
            in_headers = false;
        } else if line != "\u{0}" {
            if in_headers {
                let (name, value) = line.split_once(':').ok_or_else(|| {
                    StompError::Protocol(format!("header line without ':' delimiter: {line:?}"))
                })?;
                headers.insert(name.to_string(), value.to_string());
            } else {
                body_lines.push(line);
            }
        }
    }

    Ok(Frame::new(Command::Message, headers, body_lines.join("\n")))
}
