//! # stomp-client
//!
//! Client implementation of the STOMP framing layer over a single
//! persistent stream connection to a message broker.
//!
//! ## Architecture
//!
//! - **Protocol** (pure): frame encoding and the accumulation/decoding of
//!   inbound byte streams into discrete frames
//! - **Session**: owns the connection; exposes the command surface
//!   (connect, begin, commit, abort, subscribe, unsubscribe, send,
//!   disconnect) and the blocking receive loop
//!
//! Only MESSAGE frames are surfaced from the broker; CONNECTED and other
//! server frames are consumed from the buffer unparsed.
//!
//! ## Example
//!
//! ```ignore
//! use stomp_client::{Headers, Session};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut session = Session::connect("guest", "guest").await.unwrap();
//!     session.send("/queue/a", "hello", Headers::new()).await.unwrap();
//!     let frames = session.subscribe("/queue/a", Headers::new()).await.unwrap();
//!     println!("got {} frames", frames.len());
//! }
//! ```

pub mod error;
pub mod protocol;
pub mod transport;

mod session;

pub use error::{Result, StompError};
pub use protocol::{Command, Frame, Headers};
pub use session::{Session, SessionBuilder, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_READ_CHUNK_SIZE};
