//! Fuzz target for record length prefix boundaries
//!
//! Builds batch frames record by record, choosing each text length prefix from
//! exact, short, long, negative and extreme values.
//!
//! # Invariants
//!
//! - Decoding never panics
//! - A frame whose prefixes are all exact decodes to one `Add` per record, in
//!   order, with the original ids
//! - A negative text prefix on the first record fails with `NegativeLength`
//! - Any other frame either decodes fully or fails as a whole

#![no_main]

use arbitrary::Arbitrary;
use bytes::{BufMut, BytesMut};
use libfuzzer_sys::fuzz_target;
use quill_proto::{Event, ProtocolError, decode};

#[derive(Debug, Clone, Arbitrary)]
struct BoundaryRecord {
    id: i32,
    kind: i32,
    text: Vec<u8>,
    text_prefix: TextPrefix,
}

#[derive(Debug, Clone, Arbitrary)]
enum TextPrefix {
    Exact,
    Short(u8),
    Long(u8),
    Negative(u8),
    Max,
    Min,
}

impl TextPrefix {
    fn value(&self, len: usize) -> i32 {
        let len = len as i32;
        match self {
            Self::Exact => len,
            Self::Short(by) => len.saturating_sub(i32::from(*by) + 1).max(0),
            Self::Long(by) => len + i32::from(*by) + 1,
            Self::Negative(by) => -(i32::from(*by) + 1),
            Self::Max => i32::MAX,
            Self::Min => i32::MIN,
        }
    }
}

fuzz_target!(|records: Vec<BoundaryRecord>| {
    let records: Vec<_> = records.into_iter().take(64).collect();

    let mut frame = BytesMut::new();
    frame.put_u8(0x3D);
    for record in &records {
        let text = &record.text[..record.text.len().min(1024)];
        frame.put_i32_le(4);
        frame.put_i32_le(record.id);
        frame.put_i32_le(4);
        frame.put_i32_le(record.kind);
        frame.put_i32_le(record.text_prefix.value(text.len()));
        frame.put_slice(text);
    }

    let result = decode(&frame);

    let all_exact = records.iter().all(|r| matches!(r.text_prefix, TextPrefix::Exact));
    if all_exact {
        let events = result.expect("exact prefixes must decode");
        assert_eq!(events.len(), records.len());
        for (event, record) in events.iter().zip(&records) {
            assert!(matches!(event, Event::Add(message) if message.id == record.id));
        }
        return;
    }

    if let Some(first) = records.first() {
        if matches!(first.text_prefix, TextPrefix::Negative(_) | TextPrefix::Min) {
            assert!(matches!(result, Err(ProtocolError::NegativeLength { offset: 17, .. })));
        }
    }
});
