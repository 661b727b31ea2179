//! STOMP frame protocol: command vocabulary, frame type, wire codec.
//!
//! Everything here is pure of I/O. [`encode_frame`] produces outbound bytes;
//! [`FrameBuffer`] accumulates inbound bytes and decodes complete frames.
//! The [`crate::session::Session`] drives both against its connection.

mod codec;
mod command;
mod frame;

pub use codec::{encode_frame, FrameBuffer};
pub use command::Command;
pub use frame::{Frame, Headers};
