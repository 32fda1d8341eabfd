//! The base 9P2000 dialect: opcodes 100..=127.
//!
//! Requests are even-numbered and responses odd, except that 106 (TError)
//! is reserved and illegal on the wire. Dispatch never relies on that
//! parity; the opcode byte alone is authoritative.

use crate::decoder::Decoder;
use crate::errors::{ProtocolError, Result};
use crate::messages::{Request, Response};

/// Message type codes of the base dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Version negotiation request.
    TVersion = 100,
    /// Version negotiation response.
    RVersion = 101,
    /// Authentication request.
    TAuth = 102,
    /// Authentication response.
    RAuth = 103,
    /// Attach request.
    TAttach = 104,
    /// Attach response.
    RAttach = 105,
    /// Reserved; an error never travels as a request.
    TError = 106,
    /// Error response.
    RError = 107,
    /// Flush request.
    TFlush = 108,
    /// Flush response.
    RFlush = 109,
    /// Walk request.
    TWalk = 110,
    /// Walk response.
    RWalk = 111,
    /// Open request.
    TOpen = 112,
    /// Open response.
    ROpen = 113,
    /// Create request.
    TCreate = 114,
    /// Create response.
    RCreate = 115,
    /// Read request.
    TRead = 116,
    /// Read response.
    RRead = 117,
    /// Write request.
    TWrite = 118,
    /// Write response.
    RWrite = 119,
    /// Clunk request.
    TClunk = 120,
    /// Clunk response.
    RClunk = 121,
    /// Remove request.
    TRemove = 122,
    /// Remove response.
    RRemove = 123,
    /// Stat request.
    TStat = 124,
    /// Stat response.
    RStat = 125,
    /// Write-stat request.
    TWStat = 126,
    /// Write-stat response.
    RWStat = 127,
}

impl MessageType {
    /// Map an opcode byte to a base-dialect message type.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        Some(match code {
            100 => Self::TVersion,
            101 => Self::RVersion,
            102 => Self::TAuth,
            103 => Self::RAuth,
            104 => Self::TAttach,
            105 => Self::RAttach,
            106 => Self::TError,
            107 => Self::RError,
            108 => Self::TFlush,
            109 => Self::RFlush,
            110 => Self::TWalk,
            111 => Self::RWalk,
            112 => Self::TOpen,
            113 => Self::ROpen,
            114 => Self::TCreate,
            115 => Self::RCreate,
            116 => Self::TRead,
            117 => Self::RRead,
            118 => Self::TWrite,
            119 => Self::RWrite,
            120 => Self::TClunk,
            121 => Self::RClunk,
            122 => Self::TRemove,
            123 => Self::RRemove,
            124 => Self::TStat,
            125 => Self::RStat,
            126 => Self::TWStat,
            127 => Self::RWStat,
            _ => return None,
        })
    }
}

/// Request message bodies.
pub mod request {
    use crate::decoder::Decoder;
    use crate::errors::Result;
    use crate::types::{OpenMode, WalkPath};
    use crate::{Fid, Tag};

    /// Negotiate the protocol version and message size for a connection.
    /// Must be the first message sent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Version<'a> {
        /// Client-suggested maximum message size in bytes, header included.
        pub msize: u32,
        /// Proposed protocol version string.
        pub version: &'a [u8],
    }

    impl<'a> Version<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Version { msize: reader.read_u32()?, version: reader.read_str()? })
        }
    }

    /// Establish a fid to be used for authentication.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Auth<'a> {
        /// New fid for the authentication exchange.
        pub afid: Fid,
        /// User to authenticate as.
        pub uname: &'a [u8],
        /// File tree to access.
        pub aname: &'a [u8],
    }

    impl<'a> Auth<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Auth {
                afid: reader.read_u32()?,
                uname: reader.read_str()?,
                aname: reader.read_str()?,
            })
        }
    }

    /// Abort an outstanding request by its tag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flush {
        /// Tag of the request to abort.
        pub oldtag: Tag,
    }

    impl Flush {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Flush { oldtag: reader.read_u16()? })
        }
    }

    /// Introduce a user to the server and attach a fid to a file tree root.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Attach<'a> {
        /// Fid that will represent the root of the tree.
        pub fid: Fid,
        /// Fid established by a prior Auth exchange, or `NO_FID`.
        pub afid: Fid,
        /// User on whose behalf all actions run.
        pub uname: &'a [u8],
        /// File tree to attach to.
        pub aname: &'a [u8],
    }

    impl<'a> Attach<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Attach {
                fid: reader.read_u32()?,
                afid: reader.read_u32()?,
                uname: reader.read_str()?,
                aname: reader.read_str()?,
            })
        }
    }

    /// Traverse a path from a fid, binding the final node to a new fid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Walk<'a> {
        /// Starting fid.
        pub fid: Fid,
        /// Fid to bind the walk result to.
        pub newfid: Fid,
        /// Path to traverse, at most sixteen segments.
        pub path: WalkPath<'a>,
    }

    impl<'a> Walk<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Walk {
                fid: reader.read_u32()?,
                newfid: reader.read_u32()?,
                path: reader.read_walk_path()?,
            })
        }
    }

    /// Open the file a fid points at.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Open {
        /// Fid to open.
        pub fid: Fid,
        /// Access and modifier bits.
        pub mode: OpenMode,
    }

    impl Open {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Open {
                fid: reader.read_u32()?,
                mode: OpenMode::from_bits(reader.read_u8()?),
            })
        }
    }

    /// Create a file in the directory a fid points at, then open it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Create<'a> {
        /// Fid of the containing directory; becomes the new file on success.
        pub fid: Fid,
        /// Name of the file to create.
        pub name: &'a [u8],
        /// Permission bits for the new file.
        pub perm: u32,
        /// Mode to open the new file in.
        pub mode: OpenMode,
    }

    impl<'a> Create<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Create {
                fid: reader.read_u32()?,
                name: reader.read_str()?,
                perm: reader.read_u32()?,
                mode: OpenMode::from_bits(reader.read_u8()?),
            })
        }
    }

    /// Read a byte range out of an open file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Read {
        /// Open fid to read from.
        pub fid: Fid,
        /// Byte offset to start at.
        pub offset: u64,
        /// Maximum number of bytes to return.
        pub count: u32,
    }

    impl Read {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Read {
                fid: reader.read_u32()?,
                offset: reader.read_u64()?,
                count: reader.read_u32()?,
            })
        }
    }

    /// Write a byte range into an open file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Write<'a> {
        /// Open fid to write to.
        pub fid: Fid,
        /// Byte offset to start at.
        pub offset: u64,
        /// The bytes to write, borrowed from the receive buffer.
        pub data: &'a [u8],
    }

    impl<'a> Write<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Write {
                fid: reader.read_u32()?,
                offset: reader.read_u64()?,
                data: reader.read_blob()?,
            })
        }
    }

    /// Release a fid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Clunk {
        /// Fid to release.
        pub fid: Fid,
    }

    impl Clunk {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Clunk { fid: reader.read_u32()? })
        }
    }

    /// Remove the file a fid points at and release the fid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Remove {
        /// Fid of the file to remove.
        pub fid: Fid,
    }

    impl Remove {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Remove { fid: reader.read_u32()? })
        }
    }

    /// Inquire about the file a fid points at.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Stat {
        /// Fid of the file to describe.
        pub fid: Fid,
    }

    impl Stat {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Stat { fid: reader.read_u32()? })
        }
    }

    /// Update metadata of the file a fid points at.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WStat<'a> {
        /// Fid of the file to update.
        pub fid: Fid,
        /// New metadata; fields left as "don't touch" keep their values.
        pub stat: crate::types::Stat<'a>,
    }

    impl<'a> WStat<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(WStat { fid: reader.read_u32()?, stat: reader.read_stat()? })
        }
    }
}

/// Response message bodies.
pub mod response {
    use crate::decoder::Decoder;
    use crate::errors::Result;
    use crate::types::{Qid, QidSeq};

    /// Version negotiation reply: a possibly reduced message size and either
    /// the accepted version string or the literal `unknown`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Version<'a> {
        /// Maximum message size the server will honor.
        pub msize: u32,
        /// Accepted version string.
        pub version: &'a [u8],
    }

    impl<'a> Version<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Version { msize: reader.read_u32()?, version: reader.read_str()? })
        }
    }

    /// Authentication handle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Auth {
        /// Qid of the authentication file.
        pub qid: Qid,
    }

    impl Auth {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Auth { qid: reader.read_qid()? })
        }
    }

    /// Attach result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Attach {
        /// Qid of the attached tree root.
        pub qid: Qid,
    }

    impl Attach {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Attach { qid: reader.read_qid()? })
        }
    }

    /// The server failed the transaction; no other response fields are
    /// valid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Error<'a> {
        /// Human-readable reason.
        pub ename: &'a [u8],
    }

    impl<'a> Error<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Error { ename: reader.read_str()? })
        }
    }

    /// Flush acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flush;

    /// Walk result: one qid per traversed segment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Walk {
        /// Qids of the nodes visited, in walk order.
        pub qids: QidSeq,
    }

    impl Walk {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Walk { qids: reader.read_qid_seq()? })
        }
    }

    /// Open result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Open {
        /// Qid of the opened file.
        pub qid: Qid,
        /// Maximum number of bytes guaranteed to transfer in one message.
        pub iounit: u32,
    }

    impl Open {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Open { qid: reader.read_qid()?, iounit: reader.read_u32()? })
        }
    }

    /// Create result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Create {
        /// Qid of the created file.
        pub qid: Qid,
        /// Maximum number of bytes guaranteed to transfer in one message.
        pub iounit: u32,
    }

    impl Create {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Create { qid: reader.read_qid()?, iounit: reader.read_u32()? })
        }
    }

    /// Read result: the bytes read, borrowed from the receive buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Read<'a> {
        /// Data read from the file.
        pub data: &'a [u8],
    }

    impl<'a> Read<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Read { data: reader.read_blob()? })
        }
    }

    /// Write result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Write {
        /// Number of bytes written.
        pub count: u32,
    }

    impl Write {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Write { count: reader.read_u32()? })
        }
    }

    /// Clunk acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Clunk;

    /// Remove acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Remove;

    /// Stat result.
    ///
    /// The record travels behind an extra 16-bit size prefix counting the
    /// whole encoded record, on top of the record's own size field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Stat<'a> {
        /// The outer size prefix: encoded record length in bytes.
        pub dummy_size: u16,
        /// File metadata.
        pub stat: crate::types::Stat<'a>,
    }

    impl<'a> Stat<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Stat { dummy_size: reader.read_u16()?, stat: reader.read_stat()? })
        }
    }

    /// Write-stat acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WStat;
}

/// Dispatch a request body by opcode.
pub(crate) fn parse_request<'b>(code: u8, reader: &mut Decoder<'b>) -> Result<Request<'b>> {
    let unsupported = ProtocolError::UnsupportedMessageType { opcode: code };
    let Some(message_type) = MessageType::from_u8(code) else {
        return Err(unsupported);
    };

    match message_type {
        MessageType::TVersion => request::Version::decode(reader).map(Request::Version),
        MessageType::TAuth => request::Auth::decode(reader).map(Request::Auth),
        MessageType::TAttach => request::Attach::decode(reader).map(Request::Attach),
        MessageType::TFlush => request::Flush::decode(reader).map(Request::Flush),
        MessageType::TWalk => request::Walk::decode(reader).map(Request::Walk),
        MessageType::TOpen => request::Open::decode(reader).map(Request::Open),
        MessageType::TCreate => request::Create::decode(reader).map(Request::Create),
        MessageType::TRead => request::Read::decode(reader).map(Request::Read),
        MessageType::TWrite => request::Write::decode(reader).map(Request::Write),
        MessageType::TClunk => request::Clunk::decode(reader).map(Request::Clunk),
        MessageType::TRemove => request::Remove::decode(reader).map(Request::Remove),
        MessageType::TStat => request::Stat::decode(reader).map(Request::Stat),
        MessageType::TWStat => request::WStat::decode(reader).map(Request::WStat),
        // TError is reserved, and response codes never dispatch as requests.
        _ => Err(unsupported),
    }
}

/// Dispatch a response body by opcode.
pub(crate) fn parse_response<'b>(code: u8, reader: &mut Decoder<'b>) -> Result<Response<'b>> {
    let unsupported = ProtocolError::UnsupportedMessageType { opcode: code };
    let Some(message_type) = MessageType::from_u8(code) else {
        return Err(unsupported);
    };

    match message_type {
        MessageType::RVersion => response::Version::decode(reader).map(Response::Version),
        MessageType::RAuth => response::Auth::decode(reader).map(Response::Auth),
        MessageType::RAttach => response::Attach::decode(reader).map(Response::Attach),
        MessageType::RError => response::Error::decode(reader).map(Response::Error),
        MessageType::RFlush => Ok(Response::Flush(response::Flush)),
        MessageType::RWalk => response::Walk::decode(reader).map(Response::Walk),
        MessageType::ROpen => response::Open::decode(reader).map(Response::Open),
        MessageType::RCreate => response::Create::decode(reader).map(Response::Create),
        MessageType::RRead => response::Read::decode(reader).map(Response::Read),
        MessageType::RWrite => response::Write::decode(reader).map(Response::Write),
        MessageType::RClunk => Ok(Response::Clunk(response::Clunk)),
        MessageType::RRemove => Ok(Response::Remove(response::Remove)),
        MessageType::RStat => response::Stat::decode(reader).map(Response::Stat),
        MessageType::RWStat => Ok(Response::WStat(response::WStat)),
        _ => Err(unsupported),
    }
}

/// Human-readable name of a base-dialect opcode, for diagnostics.
#[must_use]
pub fn message_name(code: u8) -> &'static str {
    match MessageType::from_u8(code) {
        Some(MessageType::TVersion) => "TVersion",
        Some(MessageType::RVersion) => "RVersion",
        Some(MessageType::TAuth) => "TAuth",
        Some(MessageType::RAuth) => "RAuth",
        Some(MessageType::TAttach) => "TAttach",
        Some(MessageType::RAttach) => "RAttach",
        Some(MessageType::TError) => "TError",
        Some(MessageType::RError) => "RError",
        Some(MessageType::TFlush) => "TFlush",
        Some(MessageType::RFlush) => "RFlush",
        Some(MessageType::TWalk) => "TWalk",
        Some(MessageType::RWalk) => "RWalk",
        Some(MessageType::TOpen) => "TOpen",
        Some(MessageType::ROpen) => "ROpen",
        Some(MessageType::TCreate) => "TCreate",
        Some(MessageType::RCreate) => "RCreate",
        Some(MessageType::TRead) => "TRead",
        Some(MessageType::RRead) => "RRead",
        Some(MessageType::TWrite) => "TWrite",
        Some(MessageType::RWrite) => "RWrite",
        Some(MessageType::TClunk) => "TClunk",
        Some(MessageType::RClunk) => "RClunk",
        Some(MessageType::TRemove) => "TRemove",
        Some(MessageType::RRemove) => "RRemove",
        Some(MessageType::TStat) => "TStat",
        Some(MessageType::RStat) => "RStat",
        Some(MessageType::TWStat) => "TWStat",
        Some(MessageType::RWStat) => "RWStat",
        None => "Unsupported",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_mapping_is_total_over_the_base_range() {
        for code in 100..=127u8 {
            assert!(MessageType::from_u8(code).is_some(), "code {code}");
        }
        assert_eq!(MessageType::from_u8(99), None);
        assert_eq!(MessageType::from_u8(128), None);
    }

    #[test]
    fn terror_never_dispatches() {
        let mut reader = Decoder::new(&[]);
        assert_eq!(
            parse_request(106, &mut reader),
            Err(ProtocolError::UnsupportedMessageType { opcode: 106 })
        );
    }

    #[test]
    fn response_codes_do_not_dispatch_as_requests() {
        let mut reader = Decoder::new(&[]);
        assert!(parse_request(101, &mut reader).is_err());
        assert!(parse_response(100, &mut Decoder::new(&[])).is_err());
    }

    #[test]
    fn names_cover_the_dialect() {
        assert_eq!(message_name(100), "TVersion");
        assert_eq!(message_name(107), "RError");
        assert_eq!(message_name(127), "RWStat");
        assert_eq!(message_name(42), "Unsupported");
    }
}
