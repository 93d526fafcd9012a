//! Client
//!
//! Connection lifecycle and message state for the Quill chat client. Inbound
//! frames are decoded by [`quill_proto`] into events, which the [`Dispatcher`]
//! applies to the [`MessageStore`]. Outbound user actions are encoded and
//! handed to the socket owned by the [`ConnectionManager`].
//!
//! # Architecture
//!
//! The connection manager does no I/O itself. It opens sockets through a
//! [`Transport`] and learns about them only through [`TransportEvent`]s that
//! the caller feeds into [`ConnectionManager::handle_event`], one at a time.
//! A single consumer of that event stream is what guarantees that one frame is
//! fully applied before the next is looked at.
//!
//! # Components
//!
//! - [`MessageStore`]: Ordered message list (append / remove-all-by-id)
//! - [`Dispatcher`]: Owns the store and applies decoded events to it
//! - [`ConnectionManager`]: Socket lifecycle, send path, inbound processing
//! - [`ClientConfig`]: Socket and download URLs, upload limit
//! - [`FileUpload`]: Whole-file reads for uploads
//! - [`transport::MemoryTransport`]: In-process transport for tests
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides
//! [`transport::WsTransport`], a WebSocket transport on tokio-tungstenite.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod connection;
mod dispatcher;
mod error;
mod store;
pub mod transport;
mod upload;

pub use config::{ClientConfig, DEFAULT_MAX_UPLOAD_SIZE};
pub use connection::{ConnectionManager, ConnectionState};
pub use dispatcher::Dispatcher;
pub use error::ClientError;
pub use quill_proto::{Event, Message, MessageKind};
pub use store::MessageStore;
pub use transport::{ConnectionId, Transport, TransportError, TransportEvent, TransportHandle};
pub use upload::FileUpload;
