//! Zero-copy message codec for the 9P family of file-system protocols.
//!
//! Four dialects share one opcode number space: the base 9P2000, the Unix
//! extension `9P2000.u` (numeric identities and an error code), the Erlang
//! extension `9P2000.e` (session resumption, compound short read/write) and
//! the POSIX-oriented `9P2000.L`. This crate translates between
//! length-prefixed frames and typed message values in both directions and
//! holds the small negotiated state (payload limit, dialect dispatch) needed
//! to do it correctly.
//!
//! The codec does no I/O, keeps no sessions, and tracks no fids; those
//! belong to the client or server built on top. Parsing allocates nothing:
//! strings, blobs, stat records and walk paths inside decoded messages are
//! borrowed views into the caller's receive buffer. Writers stream into a
//! caller-supplied buffer, backfilling the frame size (and, for directory
//! listings, the inner data length) in place.
//!
//! # Decode
//!
//! ```
//! use nineframe_proto::{Decoder, UnversionedParser, DEFAULT_MAX_MESSAGE_SIZE};
//!
//! let frame: &[u8] = &[
//!     0x13, 0x00, 0x00, 0x00, 0x64, 0xFF, 0xFF, // header
//!     0x00, 0x20, 0x00, 0x00, 0x06, 0x00, b'9', b'P', b'2', b'0', b'0', b'0',
//! ];
//! let parser = UnversionedParser { max_payload_size: DEFAULT_MAX_MESSAGE_SIZE };
//! let mut reader = Decoder::new(frame);
//! let header = parser.parse_message_header(&mut reader)?;
//! let version = parser.parse_version_request(header, &mut reader)?;
//! assert_eq!(version.version, b"9P2000");
//! # Ok::<(), nineframe_proto::ProtocolError>(())
//! ```
//!
//! # Encode
//!
//! ```
//! use nineframe_proto::messages::{Request, base};
//! use nineframe_proto::{NO_TAG, RequestWriter};
//!
//! let mut buf = [0u8; 64];
//! let mut writer = RequestWriter::new(&mut buf, NO_TAG);
//! let len = writer.request(&Request::Version(base::request::Version {
//!     msize: 8192,
//!     version: b"9P2000",
//! }))?;
//! assert_eq!(len, 19);
//! # Ok::<(), nineframe_proto::ProtocolError>(())
//! ```

pub mod decoder;
pub mod dir;
pub mod encoder;
pub mod errors;
pub mod header;
pub mod messages;
pub mod parser;
pub mod types;
pub mod writer;

pub use decoder::Decoder;
pub use dir::{DirEntryReader, DirListingWriter};
pub use encoder::Encoder;
pub use errors::{ERROR_DOMAIN, ProtocolError, Result};
pub use header::{MessageHeader, parse_message_header, validate_header};
pub use messages::{Request, Response};
pub use parser::{
    RequestParser, ResponseParser, UnversionedParser, create_request_parser,
    create_response_parser,
};
pub use types::{
    FileMode, OpenMode, PathSegments, Qid, QidSeq, QidType, Stat, UnixStat, WalkPath,
};
pub use writer::{DataWriter, PathDataWriter, PathWriter, RequestWriter, ResponseWriter};

/// 16-bit identifier correlating a request with its response; chosen by the
/// client.
pub type Tag = u16;

/// Client-chosen 32-bit handle for a file on the server. The codec decodes
/// and encodes fids but never tracks their lifecycle.
pub type Fid = u32;

/// Tag value meaning "no tag"; only valid on Version exchanges.
pub const NO_TAG: Tag = Tag::MAX;

/// Fid value meaning "no fid", e.g. the afid of an unauthenticated attach.
pub const NO_FID: Fid = Fid::MAX;

/// Maximum number of segments in a walk path, and of qids in a walk
/// response.
pub const MAX_WELEM: usize = 16;

/// Default maximum message size in bytes before a smaller one is
/// negotiated.
pub const DEFAULT_MAX_MESSAGE_SIZE: u32 = 8 * 1024;

/// Smallest sensible negotiable message size: fits a Walk request of
/// sixteen 256-byte segments.
pub const MIN_MESSAGE_SIZE: u32 = 4145;

/// Version string of the base dialect.
pub const PROTOCOL_VERSION: &str = "9P2000";

/// Version string a server answers with when it supports none of the
/// proposed versions.
pub const UNKNOWN_PROTOCOL_VERSION: &str = "unknown";
