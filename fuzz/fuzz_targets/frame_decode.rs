//! Fuzz target for inbound and outbound frame decoding
//!
//! Arbitrary bytes go through both decoders. Neither may panic; invalid input
//! must come back as a `ProtocolError`.

#![no_main]

use libfuzzer_sys::fuzz_target;
use quill_proto::{decode, decode_request};

fuzz_target!(|data: &[u8]| {
    let _ = decode(data);
    let _ = decode_request(data);
});
