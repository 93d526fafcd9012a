//! Connection lifecycle.
//!
//! The manager owns at most one socket handle and the dispatcher. It performs
//! no I/O of its own: sockets are opened through a [`Transport`] and their
//! notifications are fed back through [`ConnectionManager::handle_event`].
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────┐ connect ┌────────────┐ Opened ┌───────────┐
//! │ Disconnected │────────>│ Connecting │───────>│ Connected │
//! └──────────────┘         └────────────┘        └───────────┘
//!        ^                       │                     │
//!        │      Closed / disconnect                    │
//!        └───────────────────────┴─────────────────────┘
//! ```
//!
//! `connect` from any state replaces the current socket. Notifications carry
//! the [`ConnectionId`] of the socket that produced them; anything from a
//! replaced socket is ignored.

use bytes::Bytes;
use quill_proto::{Event, Tag, decode, encode_fetch, encode_file, encode_text};

use crate::{
    ClientConfig, ClientError, ConnectionId, Dispatcher, FileUpload, MessageStore, Transport,
    TransportEvent, TransportHandle,
};

/// Socket state as seen by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No socket, or the socket closed
    #[default]
    Disconnected,
    /// Socket opening, not yet usable
    Connecting,
    /// Socket open, frames flow both ways
    Connected,
}

/// Owns the socket and the message history.
#[derive(Debug)]
pub struct ConnectionManager<T: Transport> {
    transport: T,
    handle: Option<T::Handle>,
    state: ConnectionState,
    next_id: u64,
    dispatcher: Dispatcher,
    max_upload_size: usize,
}

impl<T: Transport> ConnectionManager<T> {
    /// Create a disconnected manager with an empty store.
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            handle: None,
            state: ConnectionState::Disconnected,
            next_id: 0,
            dispatcher: Dispatcher::new(),
            max_upload_size: config.max_upload_size,
        }
    }

    /// Current socket state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Identifier of the current socket handle, if one is held.
    ///
    /// A handle is kept after a remote close, so this can be `Some` while the
    /// state is `Disconnected`.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.handle.as_ref().map(TransportHandle::id)
    }

    /// Message history.
    pub fn store(&self) -> &MessageStore {
        self.dispatcher.store()
    }

    /// Open a socket to `url`, closing the current one first.
    ///
    /// The old socket is not waited on. Returns the id the new socket's
    /// notifications will carry.
    pub fn connect(&mut self, url: &str) -> ConnectionId {
        if let Some(old) = self.handle.take() {
            tracing::debug!(connection = %old.id(), "closing previous websocket");
            old.close();
        }

        self.next_id += 1;
        let id = ConnectionId::new(self.next_id);
        self.handle = Some(self.transport.open(id, url));
        self.state = ConnectionState::Connecting;

        tracing::info!(connection = %id, url, "websocket connecting");
        id
    }

    /// Close the current socket, if any, and forget it.
    pub fn disconnect(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::info!(connection = %handle.id(), "websocket disconnect");
            handle.close();
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Hand an encoded frame to the socket.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotConnected` unless the state is `Connected`
    /// - `ClientError::Transport` if the socket refused the frame
    pub fn send(&mut self, frame: Bytes) -> Result<(), ClientError> {
        let handle = self.connected_handle()?;
        handle.send(frame)?;
        Ok(())
    }

    /// Send a chat message.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotConnected` unless the state is `Connected`
    /// - `ClientError::Protocol` if `text` is empty
    /// - `ClientError::Transport` if the socket refused the frame
    pub fn send_text(&mut self, text: &str) -> Result<(), ClientError> {
        self.connected_handle()?;
        let frame = encode_text(text)?;
        self.send(frame)
    }

    /// Upload a file.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotConnected` unless the state is `Connected`
    /// - `ClientError::UploadTooLarge` if `content` exceeds the upload limit
    /// - `ClientError::Protocol` if a field does not fit a length prefix
    /// - `ClientError::Transport` if the socket refused the frame
    pub fn send_file(&mut self, name: &str, content: &[u8]) -> Result<(), ClientError> {
        self.connected_handle()?;
        if content.len() > self.max_upload_size {
            return Err(ClientError::UploadTooLarge {
                size: content.len(),
                max: self.max_upload_size,
            });
        }

        let frame = encode_file(name, content)?;
        tracing::debug!(name, size = content.len(), "sending file");
        self.send(frame)
    }

    /// Upload a file read with [`FileUpload::read`].
    ///
    /// # Errors
    ///
    /// Same as [`send_file`](Self::send_file).
    pub fn send_upload(&mut self, upload: &FileUpload) -> Result<(), ClientError> {
        self.send_file(&upload.name, &upload.content)
    }

    /// Ask the server to resend one message.
    ///
    /// # Errors
    ///
    /// - `ClientError::NotConnected` unless the state is `Connected`
    /// - `ClientError::Transport` if the socket refused the frame
    pub fn fetch(&mut self, id: i32) -> Result<(), ClientError> {
        self.send(encode_fetch(id))
    }

    /// Process one notification from the transport.
    ///
    /// Returns the events applied to the store, in order. Only binary data on
    /// the current, connected socket produces events.
    ///
    /// # Errors
    ///
    /// - `ClientError::Protocol` if a binary frame is malformed; nothing from
    ///   that frame is applied and the connection stays up
    pub fn handle_event(&mut self, event: TransportEvent) -> Result<Vec<Event>, ClientError> {
        let id = event.connection_id();
        if self.connection_id() != Some(id) {
            tracing::debug!(connection = %id, "ignoring event from stale websocket");
            return Ok(Vec::new());
        }

        match event {
            TransportEvent::Opened(_) => {
                tracing::info!(connection = %id, "websocket open");
                self.state = ConnectionState::Connected;
                Ok(Vec::new())
            },
            TransportEvent::Binary(_, frame) => self.handle_frame(id, &frame),
            TransportEvent::Closed(_) => {
                tracing::info!(connection = %id, "websocket close");
                self.state = ConnectionState::Disconnected;
                Ok(Vec::new())
            },
            TransportEvent::Error(_, reason) => {
                tracing::warn!(connection = %id, reason = %reason, "websocket error");
                Ok(Vec::new())
            },
        }
    }

    fn handle_frame(&mut self, id: ConnectionId, frame: &[u8]) -> Result<Vec<Event>, ClientError> {
        if self.state != ConnectionState::Connected {
            tracing::debug!(connection = %id, state = ?self.state, "dropping frame");
            return Ok(Vec::new());
        }

        let events = decode(frame).inspect_err(|e| {
            tracing::warn!(connection = %id, error = %e, len = frame.len(), "malformed frame");
        })?;

        if events.is_empty()
            && let Some(&tag) = frame.first()
            && !Tag::from_u8(tag).is_some_and(Tag::is_inbound)
        {
            tracing::debug!(connection = %id, tag, "ignoring frame with unknown tag");
        }

        self.dispatcher.apply_all(&events);
        Ok(events)
    }

    fn connected_handle(&self) -> Result<&T::Handle, ClientError> {
        match (&self.handle, self.state) {
            (Some(handle), ConnectionState::Connected) => Ok(handle),
            _ => Err(ClientError::NotConnected { state: self.state }),
        }
    }
}
