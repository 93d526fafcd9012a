//! Protocol error types.
//!
//! Two families share one enum: malformed frames received from the peer, and
//! precondition violations when encoding a frame for the peer.

use thiserror::Error;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised while encoding or decoding frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame has no method tag.
    #[error("empty frame: missing method tag")]
    EmptyFrame,

    /// A field would read past the end of the frame.
    #[error("frame truncated: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        /// Cursor position where the read started
        offset: usize,
        /// Bytes the field required
        needed: usize,
        /// Bytes left in the frame from `offset`
        available: usize,
    },

    /// A length prefix was negative.
    #[error("negative length prefix {value} at offset {offset}")]
    NegativeLength {
        /// Position of the length prefix
        offset: usize,
        /// Decoded prefix value
        value: i32,
    },

    /// Text messages must carry at least one byte.
    #[error("text message must not be empty")]
    EmptyText,

    /// Field length does not fit a non-negative 32-bit length prefix.
    #[error("field too large: {size} bytes exceeds {max}")]
    FieldTooLarge {
        /// Length of the field in bytes
        size: usize,
        /// Largest encodable length
        max: usize,
    },
}

impl ProtocolError {
    /// Returns true if the error describes bytes received from the peer.
    ///
    /// Malformed frames abort decoding of that frame only. The remaining
    /// variants are caller mistakes caught before anything hits the wire.
    pub fn is_malformed_frame(&self) -> bool {
        matches!(self, Self::EmptyFrame | Self::Truncated { .. } | Self::NegativeLength { .. })
    }
}
