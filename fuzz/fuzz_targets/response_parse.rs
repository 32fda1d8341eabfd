//! Fuzz target for response parsing across every dialect.
//!
//! The mirror of the request target: arbitrary frames against each
//! dialect's response parser must never panic and never partially succeed.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nineframe_proto::{Decoder, create_response_parser};

const VERSIONS: [&[u8]; 4] = [b"9P2000", b"9P2000.u", b"9P2000.e", b"9P2000.L"];

fuzz_target!(|input: (u8, u16, &[u8])| {
    let (dialect, max_payload, frame) = input;

    let version = VERSIONS[usize::from(dialect) % VERSIONS.len()];
    let parser =
        create_response_parser(version, u32::from(max_payload)).expect("known dialect literal");

    let mut reader = Decoder::new(frame);
    let Ok(header) = nineframe_proto::parse_message_header(&mut reader) else {
        return;
    };

    if parser.parse_response(header, &mut reader).is_ok() {
        assert_eq!(reader.remaining(), 0);
    }
});
