//! Socket abstraction.
//!
//! The [`ConnectionManager`](crate::ConnectionManager) opens sockets through a
//! [`Transport`] and holds the returned [`TransportHandle`]. Everything the
//! socket reports (open, data, close, failure) comes back as a
//! [`TransportEvent`] tagged with the [`ConnectionId`] it belongs to, so that
//! late events from a socket that has since been replaced can be told apart.
//!
//! Opening, sending and closing never block and never wait for the peer.

mod memory;
#[cfg(feature = "transport")]
mod ws;

use std::fmt;

use bytes::Bytes;
pub use memory::{MemoryHandle, MemorySocket, MemoryTransport, SocketOp};
use thiserror::Error;
#[cfg(feature = "transport")]
pub use ws::{WsHandle, WsTransport};

/// Identifier of one socket opened by a connection manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notifications from a socket, in the order the socket produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The socket finished opening.
    Opened(ConnectionId),
    /// One complete binary message arrived.
    Binary(ConnectionId, Bytes),
    /// The socket is closed, by either side or after a failed open.
    Closed(ConnectionId),
    /// Socket-level failure. Always followed by `Closed` when fatal.
    Error(ConnectionId, String),
}

impl TransportEvent {
    /// Socket this event belongs to.
    pub fn connection_id(&self) -> ConnectionId {
        match self {
            Self::Opened(id) | Self::Binary(id, _) | Self::Closed(id) | Self::Error(id, _) => *id,
        }
    }
}

/// Transport errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The socket no longer accepts frames.
    #[error("connection closed")]
    Closed,

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Opens sockets.
pub trait Transport {
    /// Handle to one open (or opening) socket.
    type Handle: TransportHandle;

    /// Start opening a socket to `url`.
    ///
    /// Returns immediately. The outcome is reported later as
    /// [`TransportEvent::Opened`] or as `Error` followed by `Closed`, all
    /// carrying `id`.
    fn open(&mut self, id: ConnectionId, url: &str) -> Self::Handle;
}

/// One socket.
pub trait TransportHandle {
    /// Identifier given at open time.
    fn id(&self) -> ConnectionId;

    /// Queue a binary frame. Frames go out in submission order.
    ///
    /// # Errors
    ///
    /// - `TransportError::Closed` if the socket is gone
    fn send(&self, frame: Bytes) -> Result<(), TransportError>;

    /// Start closing the socket without waiting for completion.
    fn close(&self);
}
