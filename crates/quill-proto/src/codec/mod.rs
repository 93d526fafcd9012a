//! Frame encoding and decoding.
//!
//! Every field on the wire is a 4-byte little-endian length prefix ("LP")
//! followed by the value. Integer fields carry an LP of 4 that is written but
//! never validated on read, so a peer that writes a different width still
//! decodes as long as the value itself is four bytes.
//!
//! ```text
//! out  0x02  id (no LP)
//! out  0x03  LP text
//! out  0x04  LP name, LP content
//! in   0x3D  record*            (until end of frame)
//! in   0x3E  record             (trailing bytes ignored)
//! in   0x3F  LP id
//!
//! record = LP id, LP kind, LP text
//! ```
//!
//! Client-side operations are [`encode_text`], [`encode_file`],
//! [`encode_fetch`] and [`decode`]. The peer side ([`encode_batch`],
//! [`encode_single`], [`encode_delete`], [`decode_request`]) exists so that
//! tests and in-process peers speak the exact same bytes.

mod cursor;
mod inbound;
mod outbound;

pub use inbound::{decode, encode_batch, encode_delete, encode_record, encode_single, parse_record};
pub use outbound::{Request, decode_request, encode_fetch, encode_file, encode_text};

use crate::errors::{ProtocolError, Result};

/// Width of every length prefix and integer field.
pub(crate) const WORD: usize = 4;

/// Length prefix written before integer fields.
pub(crate) const WORD_PREFIX: i32 = 4;

/// Convert a field length into its wire prefix.
pub(crate) fn wire_len(len: usize) -> Result<i32> {
    i32::try_from(len)
        .map_err(|_| ProtocolError::FieldTooLarge { size: len, max: i32::MAX as usize })
}
