//! Quill wire protocol
//!
//! Byte-exact codec for the Quill chat transport. A frame is a one-byte
//! [`Tag`] followed by little-endian, length-prefixed fields. The client sends
//! text and file uploads; the peer answers with message batches, single
//! messages and deletions, which decode into [`Event`]s.
//!
//! # Components
//!
//! - [`Tag`]: Leading byte of every frame
//! - [`Message`] / [`MessageKind`]: One chat message as carried in a record
//! - [`Event`]: Decoded inbound frame content (`Add` / `Delete`)
//! - [`codec`]: Pure encode/decode functions, no I/O
//! - [`ProtocolError`]: Malformed frames and encoding preconditions

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod errors;
mod message;
mod tag;

pub use codec::{
    Request, decode, decode_request, encode_batch, encode_delete, encode_fetch, encode_file,
    encode_record, encode_single, encode_text, parse_record,
};
pub use errors::{ProtocolError, Result};
pub use message::{DOWNLOAD_PREFIX, Event, Message, MessageKind};
pub use tag::Tag;
