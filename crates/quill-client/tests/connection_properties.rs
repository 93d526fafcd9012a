//! Property-based tests for inbound processing.
//!
//! Random sequences of peer frames are fed through a connected manager and
//! the resulting store is compared against a plain `Vec` model.

use bytes::Bytes;
use proptest::prelude::*;
use quill_client::{
    ClientConfig, ConnectionManager, Message, MessageKind, TransportEvent,
    transport::MemoryTransport,
};
use quill_proto::{encode_batch, encode_delete, encode_single};

/// One frame the peer may send
#[derive(Debug, Clone)]
enum PeerFrame {
    Batch(Vec<Message>),
    Single(Message),
    Delete(i32),
    Garbage(Vec<u8>),
}

/// Small id range so deletes hit existing messages and ids repeat
fn arbitrary_message() -> impl Strategy<Value = Message> {
    (0..6i32, prop_oneof![Just(MessageKind::Text), Just(MessageKind::File)], "[a-z]{1,8}")
        .prop_map(|(id, kind, text)| Message { id, kind, text })
}

fn arbitrary_frame() -> impl Strategy<Value = PeerFrame> {
    prop_oneof![
        prop::collection::vec(arbitrary_message(), 0..4).prop_map(PeerFrame::Batch),
        arbitrary_message().prop_map(PeerFrame::Single),
        (0..6i32).prop_map(PeerFrame::Delete),
        // Tags 0x3D..=0x3F followed by too few bytes for a record
        (0x3Du8..=0x3F, prop::collection::vec(any::<u8>(), 1..4))
            .prop_map(|(tag, rest)| PeerFrame::Garbage([vec![tag], rest].concat())),
    ]
}

fn encode(frame: &PeerFrame) -> Bytes {
    match frame {
        PeerFrame::Batch(messages) => encode_batch(messages).expect("encode should succeed"),
        PeerFrame::Single(message) => encode_single(message).expect("encode should succeed"),
        PeerFrame::Delete(id) => encode_delete(*id),
        PeerFrame::Garbage(bytes) => Bytes::from(bytes.clone()),
    }
}

/// Reference semantics: append on add, remove every match on delete
fn apply_model(model: &mut Vec<Message>, frame: &PeerFrame) {
    match frame {
        PeerFrame::Batch(messages) => model.extend(messages.iter().cloned()),
        PeerFrame::Single(message) => model.push(message.clone()),
        PeerFrame::Delete(id) => model.retain(|m| m.id != *id),
        PeerFrame::Garbage(_) => {},
    }
}

proptest! {
    #[test]
    fn prop_store_matches_model(frames in prop::collection::vec(arbitrary_frame(), 0..32)) {
        let transport = MemoryTransport::new();
        let mut manager = ConnectionManager::new(transport, &ClientConfig::default());
        let id = manager.connect("ws://test/ws");
        manager.handle_event(TransportEvent::Opened(id)).expect("open should apply");

        let mut model = Vec::new();
        for frame in &frames {
            let result = manager.handle_event(TransportEvent::Binary(id, encode(frame)));

            // PROPERTY: garbage is rejected whole, everything else applies
            match frame {
                PeerFrame::Garbage(_) => prop_assert!(result.is_err()),
                _ => prop_assert!(result.is_ok()),
            }
            apply_model(&mut model, frame);

            // PROPERTY: the store equals the model after every frame
            prop_assert_eq!(manager.store().messages(), model.as_slice());
        }
    }

    #[test]
    fn prop_stale_socket_never_mutates(frames in prop::collection::vec(arbitrary_frame(), 1..16)) {
        let transport = MemoryTransport::new();
        let mut manager = ConnectionManager::new(transport, &ClientConfig::default());
        let stale = manager.connect("ws://test/ws");
        manager.handle_event(TransportEvent::Opened(stale)).expect("open should apply");
        let current = manager.connect("ws://test/ws");
        manager.handle_event(TransportEvent::Opened(current)).expect("open should apply");

        for frame in &frames {
            let applied = manager
                .handle_event(TransportEvent::Binary(stale, encode(frame)))
                .expect("stale events are ignored");
            prop_assert!(applied.is_empty());
        }

        // PROPERTY: frames from a replaced socket never reach the store
        prop_assert!(manager.store().is_empty());
    }
}
