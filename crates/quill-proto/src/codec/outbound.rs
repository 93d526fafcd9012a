//! Client-to-peer frames: text, file uploads and single-message fetches.

use bytes::{BufMut, Bytes, BytesMut};

use super::{WORD, cursor::Cursor, wire_len};
use crate::{
    Tag,
    errors::{ProtocolError, Result},
};

/// Encode a text message: `[3][LP][UTF-8 text]`.
///
/// # Errors
///
/// - `ProtocolError::EmptyText` if `text` is empty
/// - `ProtocolError::FieldTooLarge` if `text` exceeds `i32::MAX` bytes
pub fn encode_text(text: &str) -> Result<Bytes> {
    if text.is_empty() {
        return Err(ProtocolError::EmptyText);
    }

    let len = wire_len(text.len())?;
    let mut buf = BytesMut::with_capacity(1 + WORD + text.len());

    buf.put_u8(Tag::SendText.to_u8());
    buf.put_i32_le(len);
    buf.put_slice(text.as_bytes());

    Ok(buf.freeze())
}

/// Encode a file upload: `[4][LP][UTF-8 name][LP][content]`.
///
/// The whole file content travels in one frame.
///
/// # Errors
///
/// - `ProtocolError::FieldTooLarge` if name or content exceeds `i32::MAX`
///   bytes
pub fn encode_file(name: &str, content: &[u8]) -> Result<Bytes> {
    let name_len = wire_len(name.len())?;
    let content_len = wire_len(content.len())?;
    let mut buf = BytesMut::with_capacity(1 + 2 * WORD + name.len() + content.len());

    buf.put_u8(Tag::SendFile.to_u8());
    buf.put_i32_le(name_len);
    buf.put_slice(name.as_bytes());
    buf.put_i32_le(content_len);
    buf.put_slice(content);

    Ok(buf.freeze())
}

/// Encode a request for the peer to re-broadcast message `id`: `[2][id]`.
///
/// Unlike every other integer on the wire, the id carries no length prefix.
pub fn encode_fetch(id: i32) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + WORD);

    buf.put_u8(Tag::FetchSingle.to_u8());
    buf.put_i32_le(id);

    buf.freeze()
}

/// Decoded client-to-peer frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Re-broadcast one message.
    FetchSingle(i32),
    /// New text message.
    SendText(String),
    /// File upload.
    SendFile {
        /// File name as chosen by the sender.
        name: String,
        /// Raw file content.
        content: Bytes,
    },
}

/// Decode a client-to-peer frame.
///
/// Returns `None` for tags that are not client requests. Strings decode
/// lossily, like inbound text.
///
/// # Errors
///
/// - `ProtocolError::EmptyFrame` if there is no tag byte
/// - `ProtocolError::Truncated` / `ProtocolError::NegativeLength` for
///   malformed fields
pub fn decode_request(frame: &[u8]) -> Result<Option<Request>> {
    let (&tag, _) = frame.split_first().ok_or(ProtocolError::EmptyFrame)?;
    let mut cursor = Cursor::new(frame, 1);

    let request = match Tag::from_u8(tag) {
        Some(Tag::FetchSingle) => Request::FetchSingle(cursor.read_i32()?),
        Some(Tag::SendText) => {
            let text = String::from_utf8_lossy(cursor.read_prefixed_bytes()?).into_owned();
            Request::SendText(text)
        },
        Some(Tag::SendFile) => {
            let name = String::from_utf8_lossy(cursor.read_prefixed_bytes()?).into_owned();
            let content = Bytes::copy_from_slice(cursor.read_prefixed_bytes()?);
            Request::SendFile { name, content }
        },
        Some(Tag::Batch | Tag::Single | Tag::Delete) | None => return Ok(None),
    };

    Ok(Some(request))
}
