//! Fuzz target for message header parsing.
//!
//! Arbitrary byte sequences must either parse into a structurally valid
//! header or return an error; the parser must never panic, never read past
//! the seventh byte, and never accept a frame size below the header size.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nineframe_proto::{Decoder, MessageHeader, parse_message_header};

fuzz_target!(|data: &[u8]| {
    let mut reader = Decoder::new(data);
    if let Ok(header) = parse_message_header(&mut reader) {
        assert!(header.message_size() >= MessageHeader::SIZE as u32);
        assert_eq!(reader.position(), MessageHeader::SIZE);
    }
});
