//! Error types for the 9P message codec.
//!
//! Every way a frame can be refused is one variant of [`ProtocolError`], and
//! every variant carries a stable numeric code under the `"9p2000"` domain
//! tag so callers can branch without matching on message strings. The codec
//! never panics and never retries: an error is returned as a value and the
//! cursor is left at the failing position, so a caller may resynchronize on
//! the next length-prefixed frame boundary if it chooses to.

use thiserror::Error;

/// Domain tag under which [`ProtocolError::code`] values are stable.
pub const ERROR_DOMAIN: &str = "9p2000";

/// Shorthand for results produced by the codec.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while parsing or writing 9P messages.
///
/// The first seven variants mirror the wire-level validation sequence: header
/// shape, frame limits, and frame/buffer agreement. The remaining variants
/// come from the primitive codec (cursor exhaustion on either side) and from
/// protocol limits on variable-length constructs.
///
/// All of these are fatal to the connection but never to the process; 9P has
/// no in-band resynchronization, so the usual caller response is to close the
/// transport.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Version negotiation was attempted with a version string this codec
    /// does not know.
    #[error("unsupported protocol version")]
    UnsupportedProtocolVersion,

    /// The opcode is not mapped in the negotiated dialect.
    #[error("ill-formed message: unsupported message type")]
    UnsupportedMessageType {
        /// The opcode byte that failed to dispatch.
        opcode: u8,
    },

    /// Fewer than seven bytes were available to read a header from.
    #[error("ill-formed message header: not enough data to read a header")]
    IllFormedHeader,

    /// The declared frame size is smaller than the fixed header itself.
    #[error("ill-formed message: declared frame size less than header")]
    FrameTooShort {
        /// The size field as read off the wire.
        declared: u32,
    },

    /// The declared frame size exceeds the negotiated maximum.
    #[error("ill-formed message: declared frame size greater than negotiated one")]
    FrameTooBig {
        /// The size field as read off the wire.
        declared: u32,
        /// The negotiated maximum message size, header included.
        max: u32,
    },

    /// The frame declares more body bytes than the reader holds.
    #[error("ill-formed message: declared frame size larger than message data received")]
    NotEnoughData {
        /// Body bytes the header promised.
        expected: u32,
        /// Body bytes actually available.
        actual: u32,
    },

    /// The reader holds bytes past the declared end of the frame, or a
    /// message body left bytes unconsumed.
    #[error("ill-formed message: declared frame size less than message data received")]
    MoreThanExpectedData {
        /// Body bytes the header promised.
        expected: u32,
        /// Body bytes actually available.
        actual: u32,
    },

    /// A read primitive ran past the end of its input.
    #[error("insufficient data to decode value")]
    InsufficientData {
        /// Bytes the failed read needed.
        needed: usize,
        /// Bytes remaining at the cursor.
        available: usize,
    },

    /// A write primitive ran past the end of its output buffer.
    #[error("insufficient space to encode value")]
    InsufficientSpace {
        /// Bytes the failed write needed.
        needed: usize,
        /// Bytes remaining at the cursor.
        available: usize,
    },

    /// A walk path or qid sequence exceeded the sixteen-element limit.
    #[error("walk path exceeds the element limit")]
    WalkTooLong {
        /// Element count that was requested or decoded.
        count: u32,
    },

    /// A stat record's variable strings pushed its encoding past the 16-bit
    /// size field it must be prefixed with.
    #[error("stat record does not fit its 16-bit size field")]
    StatTooLarge {
        /// Encoded size of the offending record in bytes.
        size: usize,
    },

    /// A string was longer than its 16-bit length prefix can express.
    #[error("string does not fit its 16-bit length prefix")]
    StringTooLong {
        /// Byte length of the offending string.
        length: usize,
    },
}

impl ProtocolError {
    /// Stable numeric code of this error under [`ERROR_DOMAIN`].
    ///
    /// Codes are append-only: existing values never change meaning.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::UnsupportedProtocolVersion => 0,
            Self::UnsupportedMessageType { .. } => 1,
            Self::IllFormedHeader => 2,
            Self::FrameTooShort { .. } => 3,
            Self::FrameTooBig { .. } => 4,
            Self::NotEnoughData { .. } => 5,
            Self::MoreThanExpectedData { .. } => 6,
            Self::InsufficientData { .. } => 7,
            Self::InsufficientSpace { .. } => 8,
            Self::WalkTooLong { .. } => 9,
            Self::StatTooLarge { .. } => 10,
            Self::StringTooLong { .. } => 11,
        }
    }
}
