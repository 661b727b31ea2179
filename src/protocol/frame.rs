//! Frame struct with typed accessors.
//!
//! Represents one complete STOMP frame: command, header map, body.
//!
//! # Example
//!
//! ```
//! use stomp_client::protocol::{Command, Frame, Headers};
//!
//! let mut headers = Headers::new();
//! headers.insert("destination".to_string(), "/queue/a".to_string());
//! let frame = Frame::new(Command::Message, headers, "hello".to_string());
//!
//! assert_eq!(frame.command(), Command::Message);
//! assert_eq!(frame.header("destination"), Some("/queue/a"));
//! assert_eq!(frame.body(), "hello");
//! ```

use std::collections::HashMap;

use super::Command;

/// Header map for a single frame.
///
/// Duplicate keys are not supported; the last write for a given key wins,
/// both when callers build outbound headers and when the decoder encounters
/// a repeated header name within one inbound frame.
pub type Headers = HashMap<String, String>;

/// A complete STOMP frame.
///
/// Outbound frames are constructed transiently per transmission; inbound
/// frames are constructed once by the decoder and handed to the caller.
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame command.
    pub command: Command,
    /// Header name/value pairs.
    pub headers: Headers,
    /// Frame body, possibly empty, possibly multi-line.
    pub body: String,
}

impl Frame {
    /// Create a new frame from its parts.
    pub fn new(command: Command, headers: Headers, body: String) -> Self {
        Self {
            command,
            headers,
            body,
        }
    }

    /// Get the frame command.
    #[inline]
    pub fn command(&self) -> Command {
        self.command
    }

    /// Look up a header value by name.
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Get the frame body.
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }
}
