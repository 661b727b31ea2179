//! STOMP command vocabulary.
//!
//! The protocol uses a fixed set of command strings. Eight of them are
//! client-initiated; `MESSAGE` is the only broker command this client ever
//! surfaces as a structured value (CONNECTED and other server frames are
//! swept from the buffer unparsed, see [`crate::protocol::FrameBuffer`]).

use std::fmt;

/// A STOMP frame command.
///
/// Extending inbound recognition beyond `MESSAGE` (e.g. structured CONNECTED
/// or ERROR frames) means adding variants here and teaching the decoder to
/// split on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Connect,
    Begin,
    Commit,
    Abort,
    Subscribe,
    Unsubscribe,
    Send,
    Disconnect,
    /// Broker-to-client message delivery. The only inbound command decoded.
    Message,
}

impl Command {
    /// Wire spelling of the command.
    ///
    /// # Example
    ///
    /// ```
    /// use stomp_client::protocol::Command;
    ///
    /// assert_eq!(Command::Subscribe.as_str(), "SUBSCRIBE");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Begin => "BEGIN",
            Command::Commit => "COMMIT",
            Command::Abort => "ABORT",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Send => "SEND",
            Command::Disconnect => "DISCONNECT",
            Command::Message => "MESSAGE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
