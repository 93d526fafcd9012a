//! Async runtime
//!
//! Event loop that reads input lines and transport events concurrently with
//! `tokio::select!`. Transport events are fed to the connection manager one
//! at a time and whatever they changed is written to the output.

use std::io::{self, Write};

use quill_client::{
    ClientConfig, ClientError, ConnectionManager, ConnectionState, Event, FileUpload, Message,
    MessageKind, Transport, TransportEvent, transport::WsTransport,
};
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc::UnboundedReceiver,
};

use crate::command::{self, Command};

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Client could not be configured.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
}

/// Whether the loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Leave the loop.
    Quit,
}

/// Line-oriented chat session.
pub struct Runtime<T: Transport, W: Write> {
    manager: ConnectionManager<T>,
    events: UnboundedReceiver<TransportEvent>,
    config: ClientConfig,
    out: W,
}

impl Runtime<WsTransport, io::Stdout> {
    /// Create a WebSocket session for `origin`, writing to stdout.
    pub fn connect_to(origin: &str, max_upload_size: usize) -> Result<Self, RuntimeError> {
        let config = ClientConfig::from_origin(origin)?.with_max_upload_size(max_upload_size);
        let (transport, events) = WsTransport::new();

        Ok(Self::new(transport, events, config, io::stdout()))
    }
}

impl<T: Transport, W: Write> Runtime<T, W> {
    /// Create a session over `transport`, whose sockets report on `events`.
    pub fn new(
        transport: T,
        events: UnboundedReceiver<TransportEvent>,
        config: ClientConfig,
        out: W,
    ) -> Self {
        let manager = ConnectionManager::new(transport, &config);
        Self { manager, events, config, out }
    }

    /// Connection manager.
    pub fn manager(&self) -> &ConnectionManager<T> {
        &self.manager
    }

    /// Output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Connect, then process input and transport events until `/quit` or
    /// end of input. Disconnects before returning.
    pub async fn run<R>(&mut self, input: R) -> Result<(), RuntimeError>
    where
        R: AsyncBufRead + Unpin,
    {
        self.manager.connect(&self.config.socket_url);
        let mut lines = input.lines();

        loop {
            tokio::select! {
                // Inbound first so frames already received are applied before
                // the next command
                biased;

                Some(event) = self.events.recv() => self.handle_transport_event(event)?,

                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle_line(&line).await? == Flow::Quit {
                        break;
                    }
                },
            }
        }

        self.manager.disconnect();
        self.render_state()?;
        Ok(())
    }

    /// Execute one input line. Command failures are logged, not returned.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow, RuntimeError> {
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let result = match command::parse(line) {
            Command::Message { content } => self.manager.send_text(&content),
            Command::SendFile { path } => {
                match FileUpload::read(&path, self.config.max_upload_size).await {
                    Ok(upload) => self.manager.send_upload(&upload),
                    Err(e) => Err(e),
                }
            },
            Command::Fetch { id } => self.manager.fetch(id),
            Command::Connect => {
                self.manager.connect(&self.config.socket_url);
                self.render_state()?;
                Ok(())
            },
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown { input } => {
                tracing::warn!(input = %input, "unknown command");
                Ok(())
            },
            Command::InvalidArgs { command, error } => {
                tracing::warn!(command = %command, error = %error, "invalid command arguments");
                Ok(())
            },
        };

        match result {
            Ok(()) => {},
            Err(e) if e.is_precondition() => tracing::info!(error = %e, "command refused"),
            Err(e) => tracing::warn!(error = %e, "command failed"),
        }

        Ok(Flow::Continue)
    }

    /// Apply one transport event and render what changed.
    pub fn handle_transport_event(&mut self, event: TransportEvent) -> Result<(), RuntimeError> {
        let before = self.manager.state();

        match self.manager.handle_event(event) {
            Ok(events) => {
                for event in &events {
                    render_event(&mut self.out, &self.config, event)?;
                }
            },
            Err(e) => tracing::debug!(error = %e, "frame dropped"),
        }

        if self.manager.state() != before {
            self.render_state()?;
        }
        Ok(())
    }

    fn render_state(&mut self) -> io::Result<()> {
        let status = match self.manager.state() {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        writeln!(self.out, "* {status}")
    }
}

/// Write one applied event as a line of output.
pub fn render_event(
    out: &mut impl Write,
    config: &ClientConfig,
    event: &Event,
) -> io::Result<()> {
    match event {
        Event::Add(message @ Message { kind: MessageKind::Text, .. }) => {
            writeln!(out, "[{}] {}", message.id, message.text)
        },
        Event::Add(message) => {
            let url = config.download_url(message).unwrap_or_default();
            writeln!(out, "[{}] file {} {url}", message.id, message.text)
        },
        Event::Delete(id) => writeln!(out, "[{id}] deleted"),
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use quill_client::{ConnectionId, transport::MemoryTransport};
    use quill_proto::{encode_fetch, encode_single, encode_text};
    use tokio::sync::mpsc;

    use super::*;

    type TestRuntime = Runtime<MemoryTransport, Vec<u8>>;

    fn runtime() -> (TestRuntime, MemoryTransport, mpsc::UnboundedSender<TransportEvent>) {
        let transport = MemoryTransport::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let runtime = Runtime::new(transport.clone(), rx, ClientConfig::default(), Vec::new());
        (runtime, transport, tx)
    }

    fn output(runtime: &TestRuntime) -> String {
        String::from_utf8(runtime.output().clone()).unwrap()
    }

    #[test]
    fn renders_each_event_kind() {
        let config = ClientConfig::default();
        let mut out = Vec::new();

        render_event(&mut out, &config, &Event::Add(Message::new_text(1, "hi"))).unwrap();
        render_event(&mut out, &config, &Event::Add(Message::new_file(2, "a.txt"))).unwrap();
        render_event(&mut out, &config, &Event::Delete(1)).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[1] hi\n[2] file a.txt http://127.0.0.1:3000/queryfile/a.txt\n[1] deleted\n"
        );
    }

    #[tokio::test]
    async fn run_sends_lines_until_quit() {
        let (mut runtime, transport, tx) = runtime();
        let id = ConnectionId::new(1);
        tx.send(TransportEvent::Opened(id)).unwrap();

        runtime.run(&b"hello\n\n/fetch 9\n/quit\nnot sent\n"[..]).await.unwrap();

        let socket = transport.socket(id).unwrap();
        assert_eq!(socket.url, "ws://127.0.0.1:3000/ws");
        assert_eq!(socket.sent, vec![encode_text("hello").unwrap(), encode_fetch(9)]);
        assert!(socket.closed);
        assert_eq!(output(&runtime), "* connected\n* disconnected\n");
    }

    #[tokio::test]
    async fn inbound_frames_are_rendered() {
        let (mut runtime, _transport, tx) = runtime();
        let id = ConnectionId::new(1);
        tx.send(TransportEvent::Opened(id)).unwrap();
        tx.send(TransportEvent::Binary(id, encode_single(&Message::new_text(4, "yo")).unwrap()))
            .unwrap();
        tx.send(TransportEvent::Binary(id, Bytes::from_static(&[0x3E, 1]))).unwrap();

        runtime.run(&b""[..]).await.unwrap();

        assert_eq!(output(&runtime), "* connected\n[4] yo\n* disconnected\n");
        assert_eq!(runtime.manager().store().len(), 1);
    }

    #[tokio::test]
    async fn failed_commands_keep_running() {
        let (mut runtime, _transport, _tx) = runtime();

        // Not connected, bad arguments, unknown command, missing file
        for line in ["hello", "/fetch x", "/dance", "/file /definitely/not/here.bin"] {
            assert_eq!(runtime.handle_line(line).await.unwrap(), Flow::Continue);
        }
        assert_eq!(runtime.handle_line("/quit").await.unwrap(), Flow::Quit);
    }

    #[tokio::test]
    async fn file_command_uploads() {
        let (mut runtime, transport, tx) = runtime();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"abc").unwrap();

        let id = ConnectionId::new(1);
        tx.send(TransportEvent::Opened(id)).unwrap();
        let input = format!("/file {}\n", path.display());
        runtime.run(input.as_bytes()).await.unwrap();

        let sent = transport.socket(id).unwrap().sent;
        assert_eq!(sent, vec![quill_proto::encode_file("notes.txt", b"abc").unwrap()]);
    }

    #[tokio::test]
    async fn oversized_file_is_not_sent() {
        let transport = MemoryTransport::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let config = ClientConfig::default().with_max_upload_size(2);
        let mut runtime = Runtime::new(transport.clone(), rx, config, Vec::new());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"abc").unwrap();

        let id = ConnectionId::new(1);
        tx.send(TransportEvent::Opened(id)).unwrap();
        let input = format!("/file {}\nhi\n", path.display());
        runtime.run(input.as_bytes()).await.unwrap();

        // Refused upload leaves the session usable
        let sent = transport.socket(id).unwrap().sent;
        assert_eq!(sent, vec![encode_text("hi").unwrap()]);
    }

    #[tokio::test]
    async fn connect_command_replaces_socket() {
        let (mut runtime, transport, _tx) = runtime();

        runtime.run(&b"/connect\n"[..]).await.unwrap();

        let sockets = transport.sockets();
        assert_eq!(sockets.len(), 2);
        assert!(sockets.iter().all(|s| s.closed));
        assert_eq!(output(&runtime), "* connecting\n* disconnected\n");
    }
}
