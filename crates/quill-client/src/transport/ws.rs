//! WebSocket transport on tokio-tungstenite.
//!
//! Each `open` spawns one task owning the socket. The task bridges an outbound
//! channel (frames from the [`WsHandle`]) and the socket's read half, and
//! reports everything on the shared event channel returned by
//! [`WsTransport::new`].

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use super::{ConnectionId, Transport, TransportError, TransportEvent, TransportHandle};

/// Opens WebSocket connections, one task per socket.
#[derive(Debug, Clone)]
pub struct WsTransport {
    events: mpsc::UnboundedSender<TransportEvent>,
}

impl WsTransport {
    /// Create a transport and the receiver all its sockets report to.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events }, rx)
    }
}

impl Transport for WsTransport {
    type Handle = WsHandle;

    /// # Panics
    ///
    /// Must be called from within a tokio runtime.
    fn open(&mut self, id: ConnectionId, url: &str) -> WsHandle {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_socket(id, url.to_owned(), outbound_rx, self.events.clone()));

        WsHandle { id, outbound: outbound_tx }
    }
}

#[derive(Debug)]
enum Outbound {
    Frame(Bytes),
    Close,
}

/// Handle to one socket task.
///
/// Dropping the handle also closes the socket.
#[derive(Debug)]
pub struct WsHandle {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl TransportHandle for WsHandle {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn send(&self, frame: Bytes) -> Result<(), TransportError> {
        self.outbound.send(Outbound::Frame(frame)).map_err(|_| TransportError::Closed)
    }

    fn close(&self) {
        // Task already gone means the socket is already closed
        let _ = self.outbound.send(Outbound::Close);
    }
}

async fn run_socket(
    id: ConnectionId,
    url: String,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let socket = match connect_async(url.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            tracing::warn!(connection = %id, url = %url, error = %e, "websocket connect failed");
            let _ = events.send(TransportEvent::Error(id, e.to_string()));
            let _ = events.send(TransportEvent::Closed(id));
            return;
        },
    };

    let _ = events.send(TransportEvent::Opened(id));
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outgoing = outbound.recv() => match outgoing {
                Some(Outbound::Frame(frame)) => {
                    if let Err(e) = sink.send(WsMessage::Binary(frame)).await {
                        tracing::warn!(connection = %id, error = %e, "websocket send failed");
                        let _ = events.send(TransportEvent::Error(id, e.to_string()));
                        break;
                    }
                },
                Some(Outbound::Close) | None => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    let _ = sink.close().await;
                    break;
                },
            },
            incoming = stream.next() => match incoming {
                Some(Ok(WsMessage::Binary(data))) => {
                    let _ = events.send(TransportEvent::Binary(id, data));
                },
                Some(Ok(WsMessage::Close(frame))) => {
                    tracing::debug!(connection = %id, ?frame, "peer closed websocket");
                    // Flushes the queued close reply
                    let _ = sink.close().await;
                    break;
                },
                Some(Ok(other)) => {
                    tracing::trace!(connection = %id, len = other.len(), "ignoring non-binary message");
                },
                Some(Err(e)) => {
                    tracing::warn!(connection = %id, error = %e, "websocket read failed");
                    let _ = events.send(TransportEvent::Error(id, e.to_string()));
                    break;
                },
                None => break,
            },
        }
    }

    let _ = events.send(TransportEvent::Closed(id));
}
