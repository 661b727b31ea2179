//! End-to-end tests against a stub STOMP broker over real TCP.
//!
//! The stub accepts one connection and is scripted per test: it reads
//! client frames (carriage-return separated, NUL terminated) and replies
//! with broker frames (newline separated, NUL terminated), mirroring the
//! wire asymmetry real brokers exhibit.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use stomp_client::{Command, Headers, Session};

/// A client frame as seen by the stub broker.
#[derive(Debug)]
struct ClientFrame {
    command: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl ClientFrame {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One accepted broker-side connection plus read-ahead buffering, since a
/// fire-and-forget client may have several frames in flight at once.
struct StubBroker {
    stream: TcpStream,
    pending: Vec<u8>,
}

impl StubBroker {
    async fn accept(listener: &TcpListener) -> Self {
        let (stream, _) = listener.accept().await.unwrap();
        Self {
            stream,
            pending: Vec::new(),
        }
    }

    /// Read one complete client frame (through its NUL terminator).
    async fn read_frame(&mut self) -> ClientFrame {
        let mut buf = [0u8; 1024];
        while !self.pending.contains(&0u8) {
            let n = self.stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed mid-frame");
            self.pending.extend_from_slice(&buf[..n]);
        }

        let nul = self.pending.iter().position(|&b| b == 0u8).unwrap();
        let frame_bytes: Vec<u8> = self.pending.drain(..=nul).collect();

        // The previous frame's trailing carriage return may land in this
        // frame's bytes regardless of TCP segmentation; commands never
        // start with one, so trim it before parsing.
        let text = String::from_utf8(frame_bytes).unwrap();
        parse_client_frame(
            text.trim_start_matches('\r')
                .trim_end_matches(['\u{0}', '\r']),
        )
    }

    async fn write_raw(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.unwrap();
        self.stream.flush().await.unwrap();
    }

    async fn write_connected(&mut self) {
        self.write_raw(b"CONNECTED\nsession:stub\n\n\x00\n").await;
    }

    async fn write_message(&mut self, destination: &str, body: &str) {
        let frame = format!("MESSAGE\ndestination:{destination}\n\n{body}\n\x00\n");
        self.write_raw(frame.as_bytes()).await;
    }
}

/// Parse a client frame from its carriage-return separated text.
fn parse_client_frame(text: &str) -> ClientFrame {
    let mut lines = text.split('\r');
    let command = lines.next().unwrap().to_string();

    let mut headers = Vec::new();
    for line in lines.by_ref() {
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':').expect("client header line");
        headers.push((name.to_string(), value.to_string()));
    }

    let mut body_parts: Vec<&str> = lines.collect();
    while body_parts.last() == Some(&"") {
        body_parts.pop();
    }

    ClientFrame {
        command,
        headers,
        body: body_parts.join("\r"),
    }
}

/// Bind a listener and hand its port to the client side, moving the
/// listener into the scripted broker task.
async fn stub_listener() -> (TcpListener, u16) {
    // First caller wins; later try_init calls are no-ops.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

async fn connect_session(port: u16) -> Session<TcpStream> {
    Session::builder()
        .host("127.0.0.1")
        .port(port)
        .connect("guest", "guest")
        .await
        .unwrap()
}

#[tokio::test]
async fn test_connect_sweeps_connected_reply() {
    let (listener, port) = stub_listener().await;

    let broker = tokio::spawn(async move {
        let mut broker = StubBroker::accept(&listener).await;
        let connect = broker.read_frame().await;
        broker.write_connected().await;
        connect
    });

    // Must return normally: the CONNECTED reply is discarded unparsed.
    let _session = connect_session(port).await;

    let connect = broker.await.unwrap();
    assert_eq!(connect.command, "CONNECT");
    assert_eq!(connect.header("login"), Some("guest"));
    assert_eq!(connect.header("passcode"), Some("guest"));
}

#[tokio::test]
async fn test_send_then_subscribe_echoes_message() {
    let (listener, port) = stub_listener().await;

    let broker = tokio::spawn(async move {
        let mut broker = StubBroker::accept(&listener).await;
        broker.read_frame().await; // CONNECT
        broker.write_connected().await;

        let send = broker.read_frame().await;
        assert_eq!(send.command, "SEND");
        assert_eq!(send.body, "hello");
        let destination = send.header("destination").unwrap().to_string();

        let subscribe = broker.read_frame().await;
        assert_eq!(subscribe.command, "SUBSCRIBE");
        assert_eq!(subscribe.header("destination"), Some(destination.as_str()));

        broker.write_message(&destination, &send.body).await;

        let disconnect = broker.read_frame().await;
        assert_eq!(disconnect.command, "DISCONNECT");
    });

    let mut session = connect_session(port).await;
    session.send("/queue/a", "hello", Headers::new()).await.unwrap();

    let frames = session.subscribe("/queue/a", Headers::new()).await.unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].command(), Command::Message);
    assert_eq!(frames[0].body(), "hello");
    assert_eq!(frames[0].header("destination"), Some("/queue/a"));

    session.disconnect(Headers::new()).await.unwrap();
    broker.await.unwrap();
}

#[tokio::test]
async fn test_subscribe_may_return_many_buffered_frames() {
    let (listener, port) = stub_listener().await;

    let broker = tokio::spawn(async move {
        let mut broker = StubBroker::accept(&listener).await;
        broker.read_frame().await; // CONNECT
        broker.write_connected().await;

        broker.read_frame().await; // SUBSCRIBE

        // Two complete frames in a single write; the client must return
        // both from one receive, in arrival order.
        broker
            .write_raw(
                b"MESSAGE\ndestination:/queue/a\n\nfirst\n\x00\n\
                  MESSAGE\ndestination:/queue/a\n\nsecond\n\x00\n",
            )
            .await;
    });

    let mut session = connect_session(port).await;
    let frames = session.subscribe("/queue/a", Headers::new()).await.unwrap();

    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].body(), "first");
    assert_eq!(frames[1].body(), "second");
    broker.await.unwrap();
}

#[tokio::test]
async fn test_multi_line_body_survives_the_wire() {
    let (listener, port) = stub_listener().await;

    let broker = tokio::spawn(async move {
        let mut broker = StubBroker::accept(&listener).await;
        broker.read_frame().await; // CONNECT
        broker.write_connected().await;

        broker.read_frame().await; // SUBSCRIBE
        broker.write_message("/queue/a", "line1\nline2").await;
    });

    let mut session = connect_session(port).await;
    let frames = session.subscribe("/queue/a", Headers::new()).await.unwrap();

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].body(), "line1\nline2");
    broker.await.unwrap();
}

#[tokio::test]
async fn test_transaction_sequence_against_stub() {
    let (listener, port) = stub_listener().await;

    let broker = tokio::spawn(async move {
        let mut broker = StubBroker::accept(&listener).await;
        broker.read_frame().await; // CONNECT
        broker.write_connected().await;

        let begin = broker.read_frame().await;
        assert_eq!(begin.command, "BEGIN");

        let send = broker.read_frame().await;
        assert_eq!(send.command, "SEND");
        assert_eq!(send.header("transaction"), Some("tx1"));

        let commit = broker.read_frame().await;
        assert_eq!(commit.command, "COMMIT");
        assert_eq!(commit.header("transaction"), Some("tx1"));
    });

    let mut session = connect_session(port).await;

    let mut tx = Headers::new();
    tx.insert("transaction".to_string(), "tx1".to_string());

    session.begin(tx.clone()).await.unwrap();
    session.send("/queue/a", "in-tx", tx.clone()).await.unwrap();
    session.commit(tx).await.unwrap();
    broker.await.unwrap();
}
