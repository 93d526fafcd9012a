//! In-process transport.
//!
//! Records every socket opened, every frame submitted and every close. No
//! events are generated on its own: tests feed `TransportEvent`s to the
//! connection manager by hand, which makes interleavings explicit.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use super::{ConnectionId, Transport, TransportError, TransportHandle};

/// Socket lifecycle step, in the order the transport saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketOp {
    /// `open` was called for this socket.
    Open(ConnectionId),
    /// `close` was called for this socket.
    Close(ConnectionId),
}

/// What happened to one socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySocket {
    /// Identifier given at open time.
    pub id: ConnectionId,
    /// URL passed to `open`.
    pub url: String,
    /// Frames submitted, in order.
    pub sent: Vec<Bytes>,
    /// True once `close` was called.
    pub closed: bool,
}

/// Transport that records instead of connecting.
///
/// Clones share the same log, so a test can keep a clone after moving the
/// original into a connection manager.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    log: Arc<Mutex<Log>>,
}

#[derive(Debug, Default)]
struct Log {
    sockets: Vec<MemorySocket>,
    ops: Vec<SocketOp>,
}

impl MemoryTransport {
    /// Create a transport with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every socket opened so far, oldest first.
    pub fn sockets(&self) -> Vec<MemorySocket> {
        lock(&self.log).sockets.clone()
    }

    /// Socket with `id`, if it was opened.
    pub fn socket(&self, id: ConnectionId) -> Option<MemorySocket> {
        lock(&self.log).sockets.iter().find(|s| s.id == id).cloned()
    }

    /// Every open and close across all sockets, oldest first.
    pub fn ops(&self) -> Vec<SocketOp> {
        lock(&self.log).ops.clone()
    }
}

impl Transport for MemoryTransport {
    type Handle = MemoryHandle;

    fn open(&mut self, id: ConnectionId, url: &str) -> MemoryHandle {
        let mut log = lock(&self.log);
        log.sockets.push(MemorySocket { id, url: url.to_owned(), sent: Vec::new(), closed: false });
        log.ops.push(SocketOp::Open(id));

        MemoryHandle { id, log: Arc::clone(&self.log) }
    }
}

/// Handle to a recorded socket.
#[derive(Debug)]
pub struct MemoryHandle {
    id: ConnectionId,
    log: Arc<Mutex<Log>>,
}

impl TransportHandle for MemoryHandle {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn send(&self, frame: Bytes) -> Result<(), TransportError> {
        let mut log = lock(&self.log);
        match log.sockets.iter_mut().find(|s| s.id == self.id) {
            Some(socket) if !socket.closed => {
                socket.sent.push(frame);
                Ok(())
            },
            _ => Err(TransportError::Closed),
        }
    }

    fn close(&self) {
        let mut log = lock(&self.log);
        if let Some(socket) = log.sockets.iter_mut().find(|s| s.id == self.id) {
            socket.closed = true;
        }
        log.ops.push(SocketOp::Close(self.id));
    }
}

fn lock(log: &Mutex<Log>) -> MutexGuard<'_, Log> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}
