//! The 9P2000.e dialect.
//!
//! Adds session resumption plus the compound short read and short write,
//! which walk a path and transfer file contents in a single round trip.
//! Everything else is inherited from the base dialect unchanged.

use crate::decoder::Decoder;
use crate::errors::Result;
use crate::messages::{Request, Response, base};

/// Version string negotiating this dialect.
pub const PROTOCOL_VERSION: &str = "9P2000.e";

/// Message type codes added by the Erlang dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Session resumption request.
    TSession = 150,
    /// Session resumption response.
    RSession = 151,
    /// Short-read request.
    TShortRead = 152,
    /// Short-read response.
    RShortRead = 153,
    /// Short-write request.
    TShortWrite = 154,
    /// Short-write response.
    RShortWrite = 155,
}

impl MessageType {
    /// Map an opcode byte to an Erlang-dialect message type.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        Some(match code {
            150 => Self::TSession,
            151 => Self::RSession,
            152 => Self::TShortRead,
            153 => Self::RShortRead,
            154 => Self::TShortWrite,
            155 => Self::RShortWrite,
            _ => return None,
        })
    }
}

/// Request message bodies added by the Erlang dialect.
pub mod request {
    use crate::decoder::Decoder;
    use crate::errors::Result;
    use crate::types::WalkPath;
    use crate::Fid;

    /// Re-establish a previously negotiated session after reconnect.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Session {
        /// Key identifying the session to resume.
        pub key: [u8; 8],
    }

    impl Session {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            let mut key = [0u8; 8];
            key.copy_from_slice(reader.read_bytes(8)?);
            Ok(Session { key })
        }
    }

    /// Read a whole file named by a path relative to a root fid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShortRead<'a> {
        /// Fid of the directory the path starts from.
        pub fid: Fid,
        /// Path of the file to read.
        pub path: WalkPath<'a>,
    }

    impl<'a> ShortRead<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(ShortRead { fid: reader.read_u32()?, path: reader.read_walk_path()? })
        }
    }

    /// Overwrite a whole file named by a path relative to a root fid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShortWrite<'a> {
        /// Fid of the directory the path starts from.
        pub fid: Fid,
        /// Path of the file to write.
        pub path: WalkPath<'a>,
        /// The bytes to write.
        pub data: &'a [u8],
    }

    impl<'a> ShortWrite<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(ShortWrite {
                fid: reader.read_u32()?,
                path: reader.read_walk_path()?,
                data: reader.read_blob()?,
            })
        }
    }
}

/// Response message bodies added by the Erlang dialect.
pub mod response {
    use crate::decoder::Decoder;
    use crate::errors::Result;

    /// Session resumption acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Session;

    /// Short-read result: the file contents.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShortRead<'a> {
        /// Data read from the file.
        pub data: &'a [u8],
    }

    impl<'a> ShortRead<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(ShortRead { data: reader.read_blob()? })
        }
    }

    /// Short-write result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShortWrite {
        /// Number of bytes written.
        pub count: u32,
    }

    impl ShortWrite {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(ShortWrite { count: reader.read_u32()? })
        }
    }
}

/// Dispatch a request body by opcode: the three added messages, then the
/// base dialect.
pub(crate) fn parse_request<'b>(code: u8, reader: &mut Decoder<'b>) -> Result<Request<'b>> {
    match MessageType::from_u8(code) {
        Some(MessageType::TSession) => request::Session::decode(reader).map(Request::Session),
        Some(MessageType::TShortRead) => {
            request::ShortRead::decode(reader).map(Request::ShortRead)
        }
        Some(MessageType::TShortWrite) => {
            request::ShortWrite::decode(reader).map(Request::ShortWrite)
        }
        _ => base::parse_request(code, reader),
    }
}

/// Dispatch a response body by opcode: the three added messages, then the
/// base dialect.
pub(crate) fn parse_response<'b>(code: u8, reader: &mut Decoder<'b>) -> Result<Response<'b>> {
    match MessageType::from_u8(code) {
        Some(MessageType::RSession) => Ok(Response::Session(response::Session)),
        Some(MessageType::RShortRead) => {
            response::ShortRead::decode(reader).map(Response::ShortRead)
        }
        Some(MessageType::RShortWrite) => {
            response::ShortWrite::decode(reader).map(Response::ShortWrite)
        }
        _ => base::parse_response(code, reader),
    }
}

/// Human-readable name of an opcode under this dialect.
#[must_use]
pub fn message_name(code: u8) -> &'static str {
    match MessageType::from_u8(code) {
        Some(MessageType::TSession) => "TSession",
        Some(MessageType::RSession) => "RSession",
        Some(MessageType::TShortRead) => "TShortRead",
        Some(MessageType::RShortRead) => "RShortRead",
        Some(MessageType::TShortWrite) => "TShortWrite",
        Some(MessageType::RShortWrite) => "RShortWrite",
        None => base::message_name(code),
    }
}
