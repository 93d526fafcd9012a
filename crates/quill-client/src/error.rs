//! Client error types.
//!
//! Precondition failures (no open socket, oversized upload) are separated from
//! failures in the layers below: frame encoding, the socket itself and local
//! file access.

use std::io;

use quill_proto::ProtocolError;
use thiserror::Error;

use crate::{ConnectionState, TransportError};

/// Errors returned by the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// A send was attempted without an open socket.
    #[error("not connected: socket is {state:?}")]
    NotConnected {
        /// State when the send was attempted
        state: ConnectionState,
    },

    /// File exceeds the configured upload limit.
    #[error("upload too large: {size} bytes exceeds limit of {max}")]
    UploadTooLarge {
        /// Size of the rejected file
        size: usize,
        /// Configured maximum
        max: usize,
    },

    /// Frame could not be encoded or decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Socket refused the frame.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Selected path cannot be uploaded.
    #[error("upload error: {0}")]
    Upload(String),

    /// Local file access failed.
    #[error("io error: {0}")]
    Io(String),

    /// Origin URL could not be mapped to socket and download URLs.
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),
}

impl ClientError {
    /// Returns true if the operation was refused before anything was sent.
    ///
    /// These are user-correctable (connect first, type something, pick a
    /// smaller file) and leave the connection untouched.
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::NotConnected { .. } | Self::UploadTooLarge { .. } => true,
            Self::Protocol(e) => !e.is_malformed_frame(),
            Self::Transport(_) | Self::Upload(_) | Self::Io(_) | Self::InvalidOrigin(_) => false,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
