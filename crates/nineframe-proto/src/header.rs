//! The fixed seven-byte header every message starts with.
//!
//! Layout on the wire, little-endian: `size:u32 | type:u8 | tag:u16`, where
//! `size` counts the whole frame including the header itself. The header can
//! be parsed before version negotiation completes, so nothing here consults
//! a negotiated maximum; frame-limit checks live in [`validate_header`] and
//! run inside the versioned parsers.

use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Tag;
use crate::decoder::Decoder;
use crate::errors::{ProtocolError, Result};

/// Fixed message header: frame size, opcode byte and client tag.
///
/// Stored as little-endian byte-order fields so a header can be cast
/// directly from (and to) untrusted wire bytes; every 7-byte pattern is a
/// structurally valid header, and all validation is explicit.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct MessageHeader {
    size: U32,
    message_type: u8,
    tag: U16,
}

impl MessageHeader {
    /// Size of the serialized header in bytes.
    pub const SIZE: usize = 7;

    /// Assemble a header for a message with the given body size.
    #[must_use]
    pub fn new(message_type: u8, tag: Tag, payload_size: u32) -> Self {
        MessageHeader {
            size: U32::new(Self::SIZE as u32 + payload_size),
            message_type,
            tag: U16::new(tag),
        }
    }

    /// Total frame size in bytes, header included.
    #[must_use]
    pub fn message_size(&self) -> u32 {
        self.size.get()
    }

    /// The opcode byte. Identity is authoritative; the request/response
    /// parity convention of the base dialect is not relied upon anywhere.
    #[must_use]
    pub const fn message_type(&self) -> u8 {
        self.message_type
    }

    /// Client-chosen tag correlating a request with its response.
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    /// Body size in bytes: everything after the header.
    #[must_use]
    pub fn payload_size(&self) -> u32 {
        self.message_size().saturating_sub(Self::SIZE as u32)
    }

    /// The header as wire bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        IntoBytes::as_bytes(self)
    }
}

// Manual impls: the packed repr rules out deriving anything that takes field
// references.
impl std::fmt::Debug for MessageHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageHeader")
            .field("size", &self.message_size())
            .field("type", &self.message_type())
            .field("tag", &self.tag())
            .finish()
    }
}

impl PartialEq for MessageHeader {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for MessageHeader {}

/// Parse a message header off the reader.
///
/// Needs exactly [`MessageHeader::SIZE`] bytes and never reads further. The
/// only semantic check applied is that the declared frame size covers the
/// header itself; the opcode is not interpreted and the negotiated maximum
/// is deliberately not consulted, so this runs before version negotiation.
pub fn parse_message_header(reader: &mut Decoder<'_>) -> Result<MessageHeader> {
    if reader.remaining() < MessageHeader::SIZE {
        return Err(ProtocolError::IllFormedHeader);
    }

    let bytes = reader.read_bytes(MessageHeader::SIZE)?;
    let header =
        MessageHeader::read_from_bytes(bytes).map_err(|_| ProtocolError::IllFormedHeader)?;

    if header.message_size() < MessageHeader::SIZE as u32 {
        return Err(ProtocolError::FrameTooShort { declared: header.message_size() });
    }

    Ok(header)
}

/// Check a parsed header against the negotiated frame limit and the bytes
/// actually on hand.
///
/// The reader is expected to have been pre-limited to exactly one frame by
/// the transport adapter, so both a shortfall and a surplus are errors. The
/// checks run in a fixed order: frame shorter than a header, frame above the
/// negotiated maximum, missing body bytes, surplus body bytes.
pub fn validate_header(
    header: MessageHeader,
    data_available: usize,
    max_message_size: u32,
) -> Result<()> {
    if header.message_size() < MessageHeader::SIZE as u32 {
        return Err(ProtocolError::FrameTooShort { declared: header.message_size() });
    }

    if header.message_size() > max_message_size {
        return Err(ProtocolError::FrameTooBig {
            declared: header.message_size(),
            max: max_message_size,
        });
    }

    let expected = header.payload_size();
    let available = data_available as u32;
    if expected > available {
        return Err(ProtocolError::NotEnoughData { expected, actual: available });
    }
    if expected < available {
        return Err(ProtocolError::MoreThanExpectedData { expected, actual: available });
    }

    Ok(())
}
