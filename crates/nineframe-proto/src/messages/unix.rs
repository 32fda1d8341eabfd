//! The 9P2000.u dialect.
//!
//! Introduces no new opcodes; it widens six existing messages with numeric
//! identities, an extension string, and an error code, and swaps the stat
//! record for its Unix-extended form.

use crate::decoder::Decoder;
use crate::errors::Result;
use crate::messages::{Request, Response, base};

/// Version string negotiating this dialect.
pub const PROTOCOL_VERSION: &str = "9P2000.u";

/// Marker for "no numeric uid supplied".
pub const NO_NUID: u32 = u32::MAX;

/// Request message bodies widened by the Unix dialect.
pub mod request {
    use crate::decoder::Decoder;
    use crate::errors::Result;
    use crate::messages::base;
    use crate::types::UnixStat;
    use crate::Fid;

    /// Auth carrying the numeric uid alongside the user name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Auth<'a> {
        /// The base-dialect fields.
        pub auth: base::request::Auth<'a>,
        /// Numeric id of the authenticating user, or [`super::NO_NUID`].
        pub n_uname: u32,
    }

    impl<'a> Auth<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Auth {
                auth: base::request::Auth::decode(reader)?,
                n_uname: reader.read_u32()?,
            })
        }
    }

    /// Attach carrying the numeric uid alongside the user name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Attach<'a> {
        /// The base-dialect fields.
        pub attach: base::request::Attach<'a>,
        /// Numeric id of the attaching user, or [`super::NO_NUID`].
        pub n_uname: u32,
    }

    impl<'a> Attach<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Attach {
                attach: base::request::Attach::decode(reader)?,
                n_uname: reader.read_u32()?,
            })
        }
    }

    /// Create carrying a kind-specific extension string (symlink target,
    /// device numbers and the like).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Create<'a> {
        /// The base-dialect fields.
        pub create: base::request::Create<'a>,
        /// Kind-specific extension data.
        pub extension: &'a [u8],
    }

    impl<'a> Create<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Create {
                create: base::request::Create::decode(reader)?,
                extension: reader.read_str()?,
            })
        }
    }

    /// Write-stat carrying the Unix-extended record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WStat<'a> {
        /// Fid of the file to update.
        pub fid: Fid,
        /// New metadata in Unix-extended form.
        pub stat: UnixStat<'a>,
    }

    impl<'a> WStat<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(WStat { fid: reader.read_u32()?, stat: reader.read_unix_stat()? })
        }
    }
}

/// Response message bodies widened by the Unix dialect.
pub mod response {
    use crate::decoder::Decoder;
    use crate::errors::Result;
    use crate::messages::base;
    use crate::types::UnixStat;

    /// Error carrying a numeric code alongside the message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Error<'a> {
        /// The base-dialect fields.
        pub error: base::response::Error<'a>,
        /// Numeric error code (an errno value by convention).
        pub errcode: u32,
    }

    impl<'a> Error<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Error {
                error: base::response::Error::decode(reader)?,
                errcode: reader.read_u32()?,
            })
        }
    }

    /// Stat result carrying the Unix-extended record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Stat<'a> {
        /// The outer size prefix: encoded record length in bytes.
        pub dummy_size: u16,
        /// File metadata in Unix-extended form.
        pub stat: UnixStat<'a>,
    }

    impl<'a> Stat<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Stat { dummy_size: reader.read_u16()?, stat: reader.read_unix_stat()? })
        }
    }
}

/// Dispatch a request body by opcode: the four widened messages, then the
/// base dialect for everything else.
pub(crate) fn parse_request<'b>(code: u8, reader: &mut Decoder<'b>) -> Result<Request<'b>> {
    match base::MessageType::from_u8(code) {
        Some(base::MessageType::TAuth) => {
            request::Auth::decode(reader).map(Request::AuthUnix)
        }
        Some(base::MessageType::TAttach) => {
            request::Attach::decode(reader).map(Request::AttachUnix)
        }
        Some(base::MessageType::TCreate) => {
            request::Create::decode(reader).map(Request::CreateUnix)
        }
        Some(base::MessageType::TWStat) => {
            request::WStat::decode(reader).map(Request::WStatUnix)
        }
        _ => base::parse_request(code, reader),
    }
}

/// Dispatch a response body by opcode: the two widened messages, then the
/// base dialect for everything else.
pub(crate) fn parse_response<'b>(code: u8, reader: &mut Decoder<'b>) -> Result<Response<'b>> {
    match base::MessageType::from_u8(code) {
        Some(base::MessageType::RError) => {
            response::Error::decode(reader).map(Response::ErrorUnix)
        }
        Some(base::MessageType::RStat) => {
            response::Stat::decode(reader).map(Response::StatUnix)
        }
        _ => base::parse_response(code, reader),
    }
}

/// Human-readable name of an opcode under this dialect.
///
/// The Unix dialect adds no codes of its own.
#[must_use]
pub fn message_name(code: u8) -> &'static str {
    base::message_name(code)
}
