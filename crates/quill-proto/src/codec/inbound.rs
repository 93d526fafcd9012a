//! Peer-to-client frames: message batches, single messages and deletions.

use bytes::{BufMut, Bytes, BytesMut};

use super::{WORD, WORD_PREFIX, cursor::Cursor, wire_len};
use crate::{
    Event, Message, MessageKind, Tag,
    errors::{ProtocolError, Result},
};

/// Decode an inbound frame into events.
///
/// - `Batch`: records until the end of the frame, one `Add` each, in order.
///   A batch with no records is valid and yields nothing.
/// - `Single`: exactly one record. Trailing bytes are ignored.
/// - `Delete`: one length-prefixed id.
/// - Any other tag yields no events and is not an error.
///
/// Decoding is all-or-nothing: a malformed record anywhere in the frame fails
/// the whole frame, so callers never apply half a batch.
///
/// # Errors
///
/// - `ProtocolError::EmptyFrame` if there is no tag byte
/// - `ProtocolError::Truncated` if a field runs past the end of the frame
/// - `ProtocolError::NegativeLength` if a text length prefix is negative
pub fn decode(frame: &[u8]) -> Result<Vec<Event>> {
    let (&tag, _) = frame.split_first().ok_or(ProtocolError::EmptyFrame)?;
    let mut cursor = Cursor::new(frame, 1);

    match Tag::from_u8(tag) {
        Some(Tag::Batch) => {
            let mut events = Vec::new();
            while !cursor.is_at_end() {
                events.push(Event::Add(read_record(&mut cursor)?));
            }
            debug_assert_eq!(cursor.offset(), frame.len());
            Ok(events)
        },
        Some(Tag::Single) => Ok(vec![Event::Add(read_record(&mut cursor)?)]),
        Some(Tag::Delete) => Ok(vec![Event::Delete(cursor.read_prefixed_i32()?)]),
        Some(Tag::FetchSingle | Tag::SendText | Tag::SendFile) | None => Ok(Vec::new()),
    }
}

/// Parse one message record starting at `offset`.
///
/// Returns the message and the offset just past the record, which is
/// `offset + 20 + text_len`.
pub fn parse_record(frame: &[u8], offset: usize) -> Result<(Message, usize)> {
    let mut cursor = Cursor::new(frame, offset);
    let message = read_record(&mut cursor)?;
    Ok((message, cursor.offset()))
}

fn read_record(cursor: &mut Cursor<'_>) -> Result<Message> {
    let id = cursor.read_prefixed_i32()?;
    let kind = MessageKind::from_wire(cursor.read_prefixed_i32()?);
    let text = String::from_utf8_lossy(cursor.read_prefixed_bytes()?).into_owned();

    Ok(Message { id, kind, text })
}

fn record_len(message: &Message) -> usize {
    5 * WORD + message.text.len()
}

/// Append one message record to `dst`.
///
/// # Errors
///
/// - `ProtocolError::FieldTooLarge` if the text exceeds `i32::MAX` bytes
pub fn encode_record(dst: &mut impl BufMut, message: &Message) -> Result<()> {
    let text = message.text.as_bytes();
    let text_len = wire_len(text.len())?;

    dst.put_i32_le(WORD_PREFIX);
    dst.put_i32_le(message.id);
    dst.put_i32_le(WORD_PREFIX);
    dst.put_i32_le(message.kind.to_wire());
    dst.put_i32_le(text_len);
    dst.put_slice(text);

    Ok(())
}

/// Encode a batch frame holding `messages` in order.
pub fn encode_batch(messages: &[Message]) -> Result<Bytes> {
    let capacity = 1 + messages.iter().map(record_len).sum::<usize>();
    let mut buf = BytesMut::with_capacity(capacity);

    buf.put_u8(Tag::Batch.to_u8());
    for message in messages {
        encode_record(&mut buf, message)?;
    }

    Ok(buf.freeze())
}

/// Encode a single-message frame.
pub fn encode_single(message: &Message) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(1 + record_len(message));

    buf.put_u8(Tag::Single.to_u8());
    encode_record(&mut buf, message)?;

    Ok(buf.freeze())
}

/// Encode a delete frame.
pub fn encode_delete(id: i32) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + 2 * WORD);

    buf.put_u8(Tag::Delete.to_u8());
    buf.put_i32_le(WORD_PREFIX);
    buf.put_i32_le(id);

    buf.freeze()
}
