//! Fuzz target for request parsing across every dialect.
//!
//! Feeds arbitrary frames to each dialect's request parser. Invalid input
//! must come back as an error value: no panics, no out-of-bounds reads, and
//! on success the body must have been consumed exactly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nineframe_proto::{Decoder, create_request_parser};

const VERSIONS: [&[u8]; 4] = [b"9P2000", b"9P2000.u", b"9P2000.e", b"9P2000.L"];

fuzz_target!(|input: (u8, u16, &[u8])| {
    let (dialect, max_payload, frame) = input;

    let version = VERSIONS[usize::from(dialect) % VERSIONS.len()];
    let parser =
        create_request_parser(version, u32::from(max_payload)).expect("known dialect literal");

    let mut reader = Decoder::new(frame);
    let Ok(header) = nineframe_proto::parse_message_header(&mut reader) else {
        return;
    };

    if parser.parse_request(header, &mut reader).is_ok() {
        assert_eq!(reader.remaining(), 0);
    }
});
