//! Typed message representations for every supported dialect.
//!
//! A decoded message is one variant of [`Request`] or [`Response`]; which
//! variants a connection can actually produce is decided by the dialect
//! dispatch the negotiated parser carries, not by the type. Each variant
//! maps to exactly one opcode, exposed by the `opcode` accessor; the Unix
//! widenings share their opcode with the base message they replace.
//!
//! Message bodies borrow from the receive buffer; a message decoded from
//! buffer `b` must not outlive `b`.

pub mod base;
pub mod erlang;
pub mod linux;
pub mod unix;

/// A request message of any supported dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    /// Version negotiation.
    Version(base::request::Version<'a>),
    /// Authentication.
    Auth(base::request::Auth<'a>),
    /// Abort an outstanding request.
    Flush(base::request::Flush),
    /// Attach to a file tree.
    Attach(base::request::Attach<'a>),
    /// Traverse a path.
    Walk(base::request::Walk<'a>),
    /// Open a file.
    Open(base::request::Open),
    /// Create and open a file.
    Create(base::request::Create<'a>),
    /// Read from an open file.
    Read(base::request::Read),
    /// Write to an open file.
    Write(base::request::Write<'a>),
    /// Release a fid.
    Clunk(base::request::Clunk),
    /// Remove a file.
    Remove(base::request::Remove),
    /// Read file metadata.
    Stat(base::request::Stat),
    /// Write file metadata.
    WStat(base::request::WStat<'a>),

    /// Authentication, Unix-widened.
    AuthUnix(unix::request::Auth<'a>),
    /// Attach, Unix-widened.
    AttachUnix(unix::request::Attach<'a>),
    /// Create, Unix-widened.
    CreateUnix(unix::request::Create<'a>),
    /// Write file metadata, Unix-widened.
    WStatUnix(unix::request::WStat<'a>),

    /// Resume a session (Erlang dialect).
    Session(erlang::request::Session),
    /// Compound walk-and-read (Erlang dialect).
    ShortRead(erlang::request::ShortRead<'a>),
    /// Compound walk-and-write (Erlang dialect).
    ShortWrite(erlang::request::ShortWrite<'a>),

    /// File-system information (Linux dialect).
    StatFs(linux::request::StatFs),
    /// Open with Linux flags (Linux dialect).
    LOpen(linux::request::LOpen),
    /// Create with Linux flags (Linux dialect).
    LCreate(linux::request::LCreate<'a>),
    /// Create a symbolic link (Linux dialect).
    Symlink(linux::request::Symlink<'a>),
    /// Create a device node (Linux dialect).
    MkNode(linux::request::MkNode<'a>),
    /// Rename a file (Linux dialect).
    Rename(linux::request::Rename<'a>),
    /// Read a symbolic link (Linux dialect).
    ReadLink(linux::request::ReadLink),
    /// Read file attributes (Linux dialect).
    GetAttr(linux::request::GetAttr),
    /// Write file attributes (Linux dialect).
    SetAttr(linux::request::SetAttr),
    /// Walk to an extended attribute (Linux dialect).
    XAttrWalk(linux::request::XAttrWalk<'a>),
    /// Create an extended attribute (Linux dialect).
    XAttrCreate(linux::request::XAttrCreate<'a>),
    /// Read directory entries (Linux dialect).
    ReadDir(linux::request::ReadDir),
    /// Flush file data to storage (Linux dialect).
    FSync(linux::request::FSync),
    /// Take or release a record lock (Linux dialect).
    Lock(linux::request::Lock<'a>),
    /// Query a record lock (Linux dialect).
    GetLock(linux::request::GetLock<'a>),
    /// Create a hard link (Linux dialect).
    Link(linux::request::Link<'a>),
    /// Create a directory (Linux dialect).
    MkDir(linux::request::MkDir<'a>),
    /// Rename by directory and name (Linux dialect).
    RenameAt(linux::request::RenameAt<'a>),
    /// Unlink by directory and name (Linux dialect).
    UnlinkAt(linux::request::UnlinkAt<'a>),
}

impl Request<'_> {
    /// The opcode byte this message travels under.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        match self {
            Self::Version(_) => base::MessageType::TVersion as u8,
            Self::Auth(_) | Self::AuthUnix(_) => base::MessageType::TAuth as u8,
            Self::Flush(_) => base::MessageType::TFlush as u8,
            Self::Attach(_) | Self::AttachUnix(_) => base::MessageType::TAttach as u8,
            Self::Walk(_) => base::MessageType::TWalk as u8,
            Self::Open(_) => base::MessageType::TOpen as u8,
            Self::Create(_) | Self::CreateUnix(_) => base::MessageType::TCreate as u8,
            Self::Read(_) => base::MessageType::TRead as u8,
            Self::Write(_) => base::MessageType::TWrite as u8,
            Self::Clunk(_) => base::MessageType::TClunk as u8,
            Self::Remove(_) => base::MessageType::TRemove as u8,
            Self::Stat(_) => base::MessageType::TStat as u8,
            Self::WStat(_) | Self::WStatUnix(_) => base::MessageType::TWStat as u8,
            Self::Session(_) => erlang::MessageType::TSession as u8,
            Self::ShortRead(_) => erlang::MessageType::TShortRead as u8,
            Self::ShortWrite(_) => erlang::MessageType::TShortWrite as u8,
            Self::StatFs(_) => linux::MessageType::Tstatfs as u8,
            Self::LOpen(_) => linux::MessageType::Tlopen as u8,
            Self::LCreate(_) => linux::MessageType::Tlcreate as u8,
            Self::Symlink(_) => linux::MessageType::Tsymlink as u8,
            Self::MkNode(_) => linux::MessageType::Tmknod as u8,
            Self::Rename(_) => linux::MessageType::Trename as u8,
            Self::ReadLink(_) => linux::MessageType::Treadlink as u8,
            Self::GetAttr(_) => linux::MessageType::Tgetattr as u8,
            Self::SetAttr(_) => linux::MessageType::Tsetattr as u8,
            Self::XAttrWalk(_) => linux::MessageType::Txattrwalk as u8,
            Self::XAttrCreate(_) => linux::MessageType::Txattrcreate as u8,
            Self::ReadDir(_) => linux::MessageType::Treaddir as u8,
            Self::FSync(_) => linux::MessageType::Tfsync as u8,
            Self::Lock(_) => linux::MessageType::Tlock as u8,
            Self::GetLock(_) => linux::MessageType::Tgetlock as u8,
            Self::Link(_) => linux::MessageType::Tlink as u8,
            Self::MkDir(_) => linux::MessageType::Tmkdir as u8,
            Self::RenameAt(_) => linux::MessageType::Trenameat as u8,
            Self::UnlinkAt(_) => linux::MessageType::Tunlinkat as u8,
        }
    }
}

/// A response message of any supported dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response<'a> {
    /// Version negotiation result.
    Version(base::response::Version<'a>),
    /// Authentication handle.
    Auth(base::response::Auth),
    /// Attach result.
    Attach(base::response::Attach),
    /// Transaction failure with a message.
    Error(base::response::Error<'a>),
    /// Flush acknowledgement.
    Flush(base::response::Flush),
    /// Walk result.
    Walk(base::response::Walk),
    /// Open result.
    Open(base::response::Open),
    /// Create result.
    Create(base::response::Create),
    /// Read result.
    Read(base::response::Read<'a>),
    /// Write result.
    Write(base::response::Write),
    /// Clunk acknowledgement.
    Clunk(base::response::Clunk),
    /// Remove acknowledgement.
    Remove(base::response::Remove),
    /// Stat result.
    Stat(base::response::Stat<'a>),
    /// Write-stat acknowledgement.
    WStat(base::response::WStat),

    /// Transaction failure, Unix-widened.
    ErrorUnix(unix::response::Error<'a>),
    /// Stat result, Unix-widened.
    StatUnix(unix::response::Stat<'a>),

    /// Session resumption acknowledgement (Erlang dialect).
    Session(erlang::response::Session),
    /// Compound read result (Erlang dialect).
    ShortRead(erlang::response::ShortRead<'a>),
    /// Compound write result (Erlang dialect).
    ShortWrite(erlang::response::ShortWrite),

    /// Transaction failure with an errno (Linux dialect).
    LError(linux::response::LError),
    /// File-system information (Linux dialect).
    StatFs(linux::response::StatFs),
    /// Open result (Linux dialect).
    LOpen(linux::response::LOpen),
    /// Create result (Linux dialect).
    LCreate(linux::response::LCreate),
    /// Symbolic-link creation result (Linux dialect).
    Symlink(linux::response::Symlink),
    /// Device-node creation result (Linux dialect).
    MkNode(linux::response::MkNode),
    /// Rename acknowledgement (Linux dialect).
    Rename(linux::response::Rename),
    /// Symbolic-link read result (Linux dialect).
    ReadLink(linux::response::ReadLink<'a>),
    /// File attributes (Linux dialect).
    GetAttr(linux::response::GetAttr),
    /// Attribute-write acknowledgement (Linux dialect).
    SetAttr(linux::response::SetAttr),
    /// Extended-attribute walk result (Linux dialect).
    XAttrWalk(linux::response::XAttrWalk),
    /// Extended-attribute creation acknowledgement (Linux dialect).
    XAttrCreate(linux::response::XAttrCreate),
    /// Directory read result (Linux dialect).
    ReadDir(linux::response::ReadDir<'a>),
    /// Sync acknowledgement (Linux dialect).
    FSync(linux::response::FSync),
    /// Record-lock result (Linux dialect).
    Lock(linux::response::Lock),
    /// Record-lock query result (Linux dialect).
    GetLock(linux::response::GetLock<'a>),
    /// Hard-link creation acknowledgement (Linux dialect).
    Link(linux::response::Link),
    /// Directory creation result (Linux dialect).
    MkDir(linux::response::MkDir),
    /// Rename-at acknowledgement (Linux dialect).
    RenameAt(linux::response::RenameAt),
    /// Unlink-at acknowledgement (Linux dialect).
    UnlinkAt(linux::response::UnlinkAt),
}

impl Response<'_> {
    /// The opcode byte this message travels under.
    #[must_use]
    pub const fn opcode(&self) -> u8 {
        match self {
            Self::Version(_) => base::MessageType::RVersion as u8,
            Self::Auth(_) => base::MessageType::RAuth as u8,
            Self::Attach(_) => base::MessageType::RAttach as u8,
            Self::Error(_) | Self::ErrorUnix(_) => base::MessageType::RError as u8,
            Self::Flush(_) => base::MessageType::RFlush as u8,
            Self::Walk(_) => base::MessageType::RWalk as u8,
            Self::Open(_) => base::MessageType::ROpen as u8,
            Self::Create(_) => base::MessageType::RCreate as u8,
            Self::Read(_) => base::MessageType::RRead as u8,
            Self::Write(_) => base::MessageType::RWrite as u8,
            Self::Clunk(_) => base::MessageType::RClunk as u8,
            Self::Remove(_) => base::MessageType::RRemove as u8,
            Self::Stat(_) | Self::StatUnix(_) => base::MessageType::RStat as u8,
            Self::WStat(_) => base::MessageType::RWStat as u8,
            Self::Session(_) => erlang::MessageType::RSession as u8,
            Self::ShortRead(_) => erlang::MessageType::RShortRead as u8,
            Self::ShortWrite(_) => erlang::MessageType::RShortWrite as u8,
            Self::LError(_) => linux::MessageType::Rlerror as u8,
            Self::StatFs(_) => linux::MessageType::Rstatfs as u8,
            Self::LOpen(_) => linux::MessageType::Rlopen as u8,
            Self::LCreate(_) => linux::MessageType::Rlcreate as u8,
            Self::Symlink(_) => linux::MessageType::Rsymlink as u8,
            Self::MkNode(_) => linux::MessageType::Rmknod as u8,
            Self::Rename(_) => linux::MessageType::Rrename as u8,
            Self::ReadLink(_) => linux::MessageType::Rreadlink as u8,
            Self::GetAttr(_) => linux::MessageType::Rgetattr as u8,
            Self::SetAttr(_) => linux::MessageType::Rsetattr as u8,
            Self::XAttrWalk(_) => linux::MessageType::Rxattrwalk as u8,
            Self::XAttrCreate(_) => linux::MessageType::Rxattrcreate as u8,
            Self::ReadDir(_) => linux::MessageType::Rreaddir as u8,
            Self::FSync(_) => linux::MessageType::Rfsync as u8,
            Self::Lock(_) => linux::MessageType::Rlock as u8,
            Self::GetLock(_) => linux::MessageType::Rgetlock as u8,
            Self::Link(_) => linux::MessageType::Rlink as u8,
            Self::MkDir(_) => linux::MessageType::Rmkdir as u8,
            Self::RenameAt(_) => linux::MessageType::Rrenameat as u8,
            Self::UnlinkAt(_) => linux::MessageType::Runlinkat as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_widenings_share_their_base_opcode() {
        let plain = Request::Auth(base::request::Auth { afid: 0, uname: b"", aname: b"" });
        let widened = Request::AuthUnix(unix::request::Auth {
            auth: base::request::Auth { afid: 0, uname: b"", aname: b"" },
            n_uname: 0,
        });
        assert_eq!(plain.opcode(), widened.opcode());
        assert_eq!(plain.opcode(), 102);
    }

    #[test]
    fn linux_error_response_has_no_request_partner() {
        let response = Response::LError(linux::response::LError { ecode: 13 });
        assert_eq!(response.opcode(), 7);
    }
}
