//! Fuzz target for inbound frame sequences applied to the store
//!
//! Feeds arbitrary frames through a connected manager and checks the store
//! against a reference `Vec` after each frame.
//!
//! # Invariants
//!
//! - Processing never panics
//! - A frame that fails to decode leaves the store untouched
//! - The store always equals the reference model

#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use quill_client::{
    ClientConfig, ConnectionManager, Event, Message, TransportEvent, transport::MemoryTransport,
};
use quill_proto::decode;

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    Raw(Vec<u8>),
    Add { id: u8, text: String },
    Delete { id: u8 },
}

fn frame(op: &Op) -> Bytes {
    match op {
        Op::Raw(bytes) => Bytes::from(bytes.clone()),
        Op::Add { id, text } => {
            quill_proto::encode_single(&Message::new_text(i32::from(*id % 8), text.as_str()))
                .unwrap_or_default()
        },
        Op::Delete { id } => quill_proto::encode_delete(i32::from(*id % 8)),
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut manager = ConnectionManager::new(MemoryTransport::new(), &ClientConfig::default());
    let id = manager.connect("ws://fuzz/ws");
    let _ = manager.handle_event(TransportEvent::Opened(id));

    let mut model: Vec<Message> = Vec::new();
    for op in ops.iter().take(128) {
        let bytes = frame(op);
        let expected = decode(&bytes);
        let result = manager.handle_event(TransportEvent::Binary(id, bytes));

        match expected {
            Ok(events) => {
                assert_eq!(result.as_ref().ok(), Some(&events));
                for event in events {
                    match event {
                        Event::Add(message) => model.push(message),
                        Event::Delete(id) => model.retain(|m| m.id != id),
                    }
                }
            },
            Err(_) => assert!(result.is_err()),
        }

        assert_eq!(manager.store().messages(), model.as_slice());
    }
});
