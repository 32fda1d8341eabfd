//! Versioned message parsers and dialect negotiation.
//!
//! [`UnversionedParser`] handles the pre-negotiation handshake: it can parse
//! a header and a base-dialect Version request, nothing else. Once a version
//! string has been agreed on, [`create_request_parser`] /
//! [`create_response_parser`] hand out a parser bound to the negotiated
//! payload size and the dialect's opcode dispatch.
//!
//! A parser is immutable after construction and may be shared by concurrent
//! parse calls; every call brings its own [`Decoder`].

use tracing::{debug, trace};

use crate::decoder::Decoder;
use crate::errors::{ProtocolError, Result};
use crate::header::{MessageHeader, parse_message_header, validate_header};
use crate::messages::{Request, Response, base, erlang, linux, unix};
use crate::PROTOCOL_VERSION;

/// Dialect dispatch for request bodies: opcode plus a reader positioned at
/// the start of the body.
pub type RequestDispatch =
    for<'b> fn(u8, &mut Decoder<'b>) -> std::result::Result<Request<'b>, ProtocolError>;

/// Dialect dispatch for response bodies.
pub type ResponseDispatch =
    for<'b> fn(u8, &mut Decoder<'b>) -> std::result::Result<Response<'b>, ProtocolError>;

/// Opcode-to-name mapping used for diagnostics.
pub type NameMapper = fn(u8) -> &'static str;

/// Run a dispatch slot and require it to consume the frame exactly.
///
/// Reaching past the frame end fails inside the slot; bytes left over after
/// it returns are a framing error too, never a partial success.
fn dispatch_body<'b, M>(
    dispatch: fn(u8, &mut Decoder<'b>) -> std::result::Result<M, ProtocolError>,
    header: MessageHeader,
    reader: &mut Decoder<'b>,
) -> Result<M> {
    let message = dispatch(header.message_type(), reader)?;

    let left_over = reader.remaining() as u32;
    if left_over != 0 {
        return Err(ProtocolError::MoreThanExpectedData {
            expected: header.payload_size() - left_over,
            actual: header.payload_size(),
        });
    }

    Ok(message)
}

/// Parser usable before version negotiation completes.
///
/// Only the fixed header and the base-dialect Version request can be parsed
/// at this stage; in practice that is exactly what a server needs to read
/// the first message of a connection.
#[derive(Debug, Clone, Copy)]
pub struct UnversionedParser {
    /// Maximum payload size accepted until a smaller one is negotiated.
    pub max_payload_size: u32,
}

impl UnversionedParser {
    /// Maximum message size in bytes, header included.
    #[must_use]
    pub const fn max_message_size(&self) -> u32 {
        MessageHeader::SIZE as u32 + self.max_payload_size
    }

    /// Parse a message header off the reader.
    pub fn parse_message_header(&self, reader: &mut Decoder<'_>) -> Result<MessageHeader> {
        parse_message_header(reader)
    }

    /// Parse exactly a base-dialect Version request from a header and body.
    pub fn parse_version_request<'b>(
        &self,
        header: MessageHeader,
        reader: &mut Decoder<'b>,
    ) -> Result<base::request::Version<'b>> {
        validate_header(header, reader.remaining(), self.max_message_size())?;

        if header.message_type() != base::MessageType::TVersion as u8 {
            return Err(ProtocolError::UnsupportedMessageType {
                opcode: header.message_type(),
            });
        }

        let version = base::request::Version::decode(reader)?;
        let left_over = reader.remaining() as u32;
        if left_over != 0 {
            return Err(ProtocolError::MoreThanExpectedData {
                expected: header.payload_size() - left_over,
                actual: header.payload_size(),
            });
        }

        Ok(version)
    }
}

/// Request parser bound to a negotiated dialect and payload size.
///
/// Used by servers. Construction is the only allocationless setup there is;
/// parse calls are pure functions of the reader.
#[derive(Debug, Clone, Copy)]
pub struct RequestParser {
    max_payload_size: u32,
    name_mapper: NameMapper,
    dispatch: RequestDispatch,
}

impl RequestParser {
    /// Maximum message size in bytes, header included.
    #[must_use]
    pub const fn max_message_size(&self) -> u32 {
        MessageHeader::SIZE as u32 + self.max_payload_size
    }

    /// Human-readable name of an opcode under the negotiated dialect.
    #[must_use]
    pub fn message_name(&self, code: u8) -> &'static str {
        (self.name_mapper)(code)
    }

    /// Parse a request body for a previously parsed header.
    ///
    /// The reader must hold exactly the frame body; the transport adapter is
    /// expected to have limited it. On success the body has been consumed in
    /// full.
    pub fn parse_request<'b>(
        &self,
        header: MessageHeader,
        reader: &mut Decoder<'b>,
    ) -> Result<Request<'b>> {
        validate_header(header, reader.remaining(), self.max_message_size())
            .inspect_err(|error| {
                debug!(%error, opcode = header.message_type(), "rejecting request frame");
            })?;
        dispatch_body(self.dispatch, header, reader)
    }
}

/// Response parser bound to a negotiated dialect and payload size.
///
/// Used by clients; the mirror of [`RequestParser`].
#[derive(Debug, Clone, Copy)]
pub struct ResponseParser {
    max_payload_size: u32,
    name_mapper: NameMapper,
    dispatch: ResponseDispatch,
}

impl ResponseParser {
    /// Maximum message size in bytes, header included.
    #[must_use]
    pub const fn max_message_size(&self) -> u32 {
        MessageHeader::SIZE as u32 + self.max_payload_size
    }

    /// Human-readable name of an opcode under the negotiated dialect.
    #[must_use]
    pub fn message_name(&self, code: u8) -> &'static str {
        (self.name_mapper)(code)
    }

    /// Parse a response body for a previously parsed header.
    pub fn parse_response<'b>(
        &self,
        header: MessageHeader,
        reader: &mut Decoder<'b>,
    ) -> Result<Response<'b>> {
        validate_header(header, reader.remaining(), self.max_message_size())
            .inspect_err(|error| {
                debug!(%error, opcode = header.message_type(), "rejecting response frame");
            })?;
        dispatch_body(self.dispatch, header, reader)
    }
}

fn dialect_tables(version: &[u8]) -> Option<(RequestDispatch, ResponseDispatch, NameMapper)> {
    if version == PROTOCOL_VERSION.as_bytes() {
        Some((base::parse_request, base::parse_response, base::message_name))
    } else if version == unix::PROTOCOL_VERSION.as_bytes() {
        Some((unix::parse_request, unix::parse_response, unix::message_name))
    } else if version == erlang::PROTOCOL_VERSION.as_bytes() {
        Some((erlang::parse_request, erlang::parse_response, erlang::message_name))
    } else if version == linux::PROTOCOL_VERSION.as_bytes() {
        Some((linux::parse_request, linux::parse_response, linux::message_name))
    } else {
        None
    }
}

/// Create a request parser for a negotiated version string and payload size.
///
/// Fails with [`ProtocolError::UnsupportedProtocolVersion`] for any version
/// string other than the four dialect literals; in particular the
/// [`UNKNOWN_PROTOCOL_VERSION`](crate::UNKNOWN_PROTOCOL_VERSION) placeholder
/// is not a negotiable version.
pub fn create_request_parser(version: &[u8], max_payload_size: u32) -> Result<RequestParser> {
    let Some((dispatch, _, name_mapper)) = dialect_tables(version) else {
        debug!(version = %String::from_utf8_lossy(version), "unsupported protocol version");
        return Err(ProtocolError::UnsupportedProtocolVersion);
    };

    trace!(
        version = %String::from_utf8_lossy(version),
        max_payload_size,
        "request parser negotiated"
    );
    Ok(RequestParser { max_payload_size, name_mapper, dispatch })
}

/// Create a response parser for a negotiated version string and payload
/// size.
pub fn create_response_parser(version: &[u8], max_payload_size: u32) -> Result<ResponseParser> {
    let Some((_, dispatch, name_mapper)) = dialect_tables(version) else {
        debug!(version = %String::from_utf8_lossy(version), "unsupported protocol version");
        return Err(ProtocolError::UnsupportedProtocolVersion);
    };

    trace!(
        version = %String::from_utf8_lossy(version),
        max_payload_size,
        "response parser negotiated"
    );
    Ok(ResponseParser { max_payload_size, name_mapper, dispatch })
}
