//! Property-based tests for the frame codec.
//!
//! These cover the decoder for arbitrary messages and arbitrary bytes, using
//! the peer-side encoders to build byte-exact inbound frames.

use proptest::prelude::*;
use quill_proto::{
    Event, Message, MessageKind, ProtocolError, Request, decode, decode_request, encode_batch,
    encode_delete, encode_file, encode_single, encode_text, parse_record,
};

/// Strategy for message kinds
fn arbitrary_kind() -> impl Strategy<Value = MessageKind> {
    prop_oneof![Just(MessageKind::Text), Just(MessageKind::File)]
}

/// Strategy for messages with non-empty text, including multi-byte characters
fn arbitrary_message() -> impl Strategy<Value = Message> {
    (any::<i32>(), arbitrary_kind(), "\\PC{1,32}")
        .prop_map(|(id, kind, text)| Message { id, kind, text })
}

proptest! {
    #[test]
    fn prop_batch_round_trip(message in arbitrary_message()) {
        let frame = encode_batch(std::slice::from_ref(&message)).expect("encode should succeed");
        let events = decode(&frame).expect("decode should succeed");

        // PROPERTY: id, kind and text survive exactly
        prop_assert_eq!(events, vec![Event::Add(message)]);
    }

    #[test]
    fn prop_batch_yields_one_add_per_record(
        messages in prop::collection::vec(arbitrary_message(), 0..16)
    ) {
        let frame = encode_batch(&messages).expect("encode should succeed");

        // PROPERTY: walking the records ends exactly at the frame length
        let mut offset = 1;
        let mut parsed = Vec::new();
        while offset < frame.len() {
            let (message, next) = parse_record(&frame, offset).expect("record should parse");
            prop_assert!(next > offset);
            parsed.push(message);
            offset = next;
        }
        prop_assert_eq!(offset, frame.len());
        prop_assert_eq!(&parsed, &messages);

        // PROPERTY: decode agrees with the record walk, in record order
        let events = decode(&frame).expect("decode should succeed");
        prop_assert_eq!(events.len(), messages.len());
        let expected: Vec<Event> = messages.into_iter().map(Event::Add).collect();
        prop_assert_eq!(events, expected);
    }

    #[test]
    fn prop_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
        let _ = decode_request(&bytes);
    }

    #[test]
    fn prop_truncated_single_is_malformed(message in arbitrary_message(), cut in any::<prop::sample::Index>()) {
        let frame = encode_single(&message).expect("encode should succeed");

        // Keep the tag, drop at least one byte
        let len = 1 + cut.index(frame.len() - 1);
        let result = decode(&frame[..len]);

        prop_assert!(matches!(result, Err(ref e) if e.is_malformed_frame()), "{:?}", result);
    }

    #[test]
    fn prop_truncated_delete_is_malformed(id in any::<i32>(), len in 1usize..9) {
        let frame = encode_delete(id);
        let result = decode(&frame[..len]);
        prop_assert!(matches!(result, Err(ProtocolError::Truncated { .. })), "{:?}", result);
        prop_assert_eq!(decode(&frame), Ok(vec![Event::Delete(id)]));
    }

    #[test]
    fn prop_text_request_round_trip(text in "\\PC{1,64}") {
        let frame = encode_text(&text).expect("encode should succeed");
        prop_assert_eq!(decode_request(&frame), Ok(Some(Request::SendText(text))));
    }

    #[test]
    fn prop_file_request_round_trip(
        name in "[a-zA-Z0-9._-]{1,24}",
        content in prop::collection::vec(any::<u8>(), 0..512)
    ) {
        let frame = encode_file(&name, &content).expect("encode should succeed");
        prop_assert_eq!(frame.len(), 1 + 4 + name.len() + 4 + content.len());

        match decode_request(&frame) {
            Ok(Some(Request::SendFile { name: decoded_name, content: decoded_content })) => {
                prop_assert_eq!(decoded_name, name);
                prop_assert_eq!(&decoded_content[..], &content[..]);
            },
            other => prop_assert!(false, "unexpected decode result: {:?}", other),
        }
    }
}

#[test]
fn outbound_frames_decode_to_nothing_on_the_client() {
    let text = encode_text("hello").expect("encode should succeed");
    let file = encode_file("a", b"b").expect("encode should succeed");

    assert_eq!(decode(&text), Ok(Vec::new()));
    assert_eq!(decode(&file), Ok(Vec::new()));
}
