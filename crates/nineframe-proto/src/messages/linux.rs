//! The 9P2000.L dialect.
//!
//! Replaces much of the message set with a POSIX-oriented one in the opcode
//! range 6..=77 and layers on top of the Unix dialect, so the base messages
//! it does not replace keep their Unix-widened forms. The numbering here
//! does not follow the base dialect's request/response parity convention
//! (there is no Tlerror on the wire and Rlerror is 7); dispatch is keyed on
//! the opcode byte alone.

use crate::decoder::Decoder;
use crate::errors::Result;
use crate::messages::{Request, Response, unix};

/// Version string negotiating this dialect.
pub const PROTOCOL_VERSION: &str = "9P2000.L";

/// Message type codes added by the Linux dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Reserved; an error never travels as a request.
    Tlerror = 6,
    /// Error response carrying a numeric errno.
    Rlerror = 7,
    /// File-system information request.
    Tstatfs = 8,
    /// File-system information response.
    Rstatfs = 9,
    /// Open request with Linux open flags.
    Tlopen = 12,
    /// Open response.
    Rlopen = 13,
    /// Create request with Linux open flags.
    Tlcreate = 14,
    /// Create response.
    Rlcreate = 15,
    /// Symbolic-link creation request.
    Tsymlink = 16,
    /// Symbolic-link creation response.
    Rsymlink = 17,
    /// Device-node creation request.
    Tmknod = 18,
    /// Device-node creation response.
    Rmknod = 19,
    /// Rename request.
    Trename = 20,
    /// Rename response.
    Rrename = 21,
    /// Symbolic-link read request.
    Treadlink = 22,
    /// Symbolic-link read response.
    Rreadlink = 23,
    /// Attribute read request.
    Tgetattr = 24,
    /// Attribute read response.
    Rgetattr = 25,
    /// Attribute write request.
    Tsetattr = 26,
    /// Attribute write response.
    Rsetattr = 27,
    /// Extended-attribute walk request.
    Txattrwalk = 30,
    /// Extended-attribute walk response.
    Rxattrwalk = 31,
    /// Extended-attribute creation request.
    Txattrcreate = 32,
    /// Extended-attribute creation response.
    Rxattrcreate = 33,
    /// Directory read request.
    Treaddir = 40,
    /// Directory read response.
    Rreaddir = 41,
    /// Sync request.
    Tfsync = 50,
    /// Sync response.
    Rfsync = 51,
    /// Record-lock request.
    Tlock = 52,
    /// Record-lock response.
    Rlock = 53,
    /// Record-lock query request.
    Tgetlock = 54,
    /// Record-lock query response.
    Rgetlock = 55,
    /// Hard-link creation request.
    Tlink = 60,
    /// Hard-link creation response.
    Rlink = 61,
    /// Directory creation request.
    Tmkdir = 72,
    /// Directory creation response.
    Rmkdir = 73,
    /// Rename-at request.
    Trenameat = 74,
    /// Rename-at response.
    Rrenameat = 75,
    /// Unlink-at request.
    Tunlinkat = 76,
    /// Unlink-at response.
    Runlinkat = 77,
}

impl MessageType {
    /// Map an opcode byte to a Linux-dialect message type.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        Some(match code {
            6 => Self::Tlerror,
            7 => Self::Rlerror,
            8 => Self::Tstatfs,
            9 => Self::Rstatfs,
            12 => Self::Tlopen,
            13 => Self::Rlopen,
            14 => Self::Tlcreate,
            15 => Self::Rlcreate,
            16 => Self::Tsymlink,
            17 => Self::Rsymlink,
            18 => Self::Tmknod,
            19 => Self::Rmknod,
            20 => Self::Trename,
            21 => Self::Rrename,
            22 => Self::Treadlink,
            23 => Self::Rreadlink,
            24 => Self::Tgetattr,
            25 => Self::Rgetattr,
            26 => Self::Tsetattr,
            27 => Self::Rsetattr,
            30 => Self::Txattrwalk,
            31 => Self::Rxattrwalk,
            32 => Self::Txattrcreate,
            33 => Self::Rxattrcreate,
            40 => Self::Treaddir,
            41 => Self::Rreaddir,
            50 => Self::Tfsync,
            51 => Self::Rfsync,
            52 => Self::Tlock,
            53 => Self::Rlock,
            54 => Self::Tgetlock,
            55 => Self::Rgetlock,
            60 => Self::Tlink,
            61 => Self::Rlink,
            72 => Self::Tmkdir,
            73 => Self::Rmkdir,
            74 => Self::Trenameat,
            75 => Self::Rrenameat,
            76 => Self::Tunlinkat,
            77 => Self::Runlinkat,
            _ => return None,
        })
    }
}

/// One entry in the data payload of a directory-read response:
/// `qid | offset:u64 | type:u8 | name:string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry<'a> {
    /// Qid of the entry.
    pub qid: crate::types::Qid,
    /// Offset to pass to the next directory read to resume after this entry.
    pub offset: u64,
    /// File-kind byte.
    pub kind: u8,
    /// Entry name.
    pub name: &'a [u8],
}

impl<'a> DirEntry<'a> {
    pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
        Ok(DirEntry {
            qid: reader.read_qid()?,
            offset: reader.read_u64()?,
            kind: reader.read_u8()?,
            name: reader.read_str()?,
        })
    }
}

/// Request message bodies added by the Linux dialect.
pub mod request {
    use crate::decoder::Decoder;
    use crate::errors::Result;
    use crate::Fid;

    /// Ask for file-system information about the tree a fid lives in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatFs {
        /// Any fid in the file system of interest.
        pub fid: Fid,
    }

    impl StatFs {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(StatFs { fid: reader.read_u32()? })
        }
    }

    /// Open a file with Linux open(2) flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LOpen {
        /// Fid to open.
        pub fid: Fid,
        /// Linux open flags.
        pub flags: u32,
    }

    impl LOpen {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(LOpen { fid: reader.read_u32()?, flags: reader.read_u32()? })
        }
    }

    /// Create a regular file.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LCreate<'a> {
        /// Fid of the containing directory; becomes the new file on success.
        pub fid: Fid,
        /// Name of the file to create.
        pub name: &'a [u8],
        /// Linux open flags for the new file.
        pub flags: u32,
        /// Linux mode bits for the new file.
        pub mode: u32,
        /// Effective group id of the caller.
        pub gid: u32,
    }

    impl<'a> LCreate<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(LCreate {
                fid: reader.read_u32()?,
                name: reader.read_str()?,
                flags: reader.read_u32()?,
                mode: reader.read_u32()?,
                gid: reader.read_u32()?,
            })
        }
    }

    /// Create a symbolic link.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Symlink<'a> {
        /// Fid of the containing directory.
        pub fid: Fid,
        /// Name of the link to create.
        pub name: &'a [u8],
        /// Target path the link points at.
        pub symtgt: &'a [u8],
        /// Effective group id of the caller.
        pub gid: u32,
    }

    impl<'a> Symlink<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Symlink {
                fid: reader.read_u32()?,
                name: reader.read_str()?,
                symtgt: reader.read_str()?,
                gid: reader.read_u32()?,
            })
        }
    }

    /// Create a device node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MkNode<'a> {
        /// Fid of the containing directory.
        pub dfid: Fid,
        /// Name of the node to create.
        pub name: &'a [u8],
        /// Linux mode bits, kind included.
        pub mode: u32,
        /// Device major number.
        pub major: u32,
        /// Device minor number.
        pub minor: u32,
        /// Effective group id of the caller.
        pub gid: u32,
    }

    impl<'a> MkNode<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(MkNode {
                dfid: reader.read_u32()?,
                name: reader.read_str()?,
                mode: reader.read_u32()?,
                major: reader.read_u32()?,
                minor: reader.read_u32()?,
                gid: reader.read_u32()?,
            })
        }
    }

    /// Move a file into a directory under a new name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Rename<'a> {
        /// Fid of the file to rename.
        pub fid: Fid,
        /// Fid of the destination directory.
        pub dfid: Fid,
        /// New name.
        pub name: &'a [u8],
    }

    impl<'a> Rename<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Rename {
                fid: reader.read_u32()?,
                dfid: reader.read_u32()?,
                name: reader.read_str()?,
            })
        }
    }

    /// Read the target of a symbolic link.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ReadLink {
        /// Fid of the link.
        pub fid: Fid,
    }

    impl ReadLink {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(ReadLink { fid: reader.read_u32()? })
        }
    }

    /// Read file attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GetAttr {
        /// Fid of the file to describe.
        pub fid: Fid,
        /// Bit mask of the attributes the client wants.
        pub request_mask: u64,
    }

    impl GetAttr {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(GetAttr { fid: reader.read_u32()?, request_mask: reader.read_u64()? })
        }
    }

    /// Write file attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SetAttr {
        /// Fid of the file to update.
        pub fid: Fid,
        /// Bit mask of the fields below that are valid.
        pub valid: u32,
        /// Protection bits.
        pub mode: u32,
        /// Numeric owner id.
        pub uid: u32,
        /// Numeric group id.
        pub gid: u32,
        /// New file size in bytes.
        pub size: u64,
        /// Access time, seconds.
        pub atime_sec: u64,
        /// Access time, nanosecond part.
        pub atime_nsec: u64,
        /// Modification time, seconds.
        pub mtime_sec: u64,
        /// Modification time, nanosecond part.
        pub mtime_nsec: u64,
    }

    impl SetAttr {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(SetAttr {
                fid: reader.read_u32()?,
                valid: reader.read_u32()?,
                mode: reader.read_u32()?,
                uid: reader.read_u32()?,
                gid: reader.read_u32()?,
                size: reader.read_u64()?,
                atime_sec: reader.read_u64()?,
                atime_nsec: reader.read_u64()?,
                mtime_sec: reader.read_u64()?,
                mtime_nsec: reader.read_u64()?,
            })
        }
    }

    /// Bind a new fid to an extended attribute (or, with an empty name, to
    /// the list of attribute names).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct XAttrWalk<'a> {
        /// Fid of the file carrying the attribute.
        pub fid: Fid,
        /// Fid to bind to the attribute contents.
        pub newfid: Fid,
        /// Attribute name; empty to list names.
        pub name: &'a [u8],
    }

    impl<'a> XAttrWalk<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(XAttrWalk {
                fid: reader.read_u32()?,
                newfid: reader.read_u32()?,
                name: reader.read_str()?,
            })
        }
    }

    /// Prepare a fid for writing an extended attribute.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct XAttrCreate<'a> {
        /// Fid that will receive the attribute writes.
        pub fid: Fid,
        /// Attribute name.
        pub name: &'a [u8],
        /// Total size of the attribute value to come.
        pub attr_size: u64,
        /// Linux setxattr flags.
        pub flags: u32,
    }

    impl<'a> XAttrCreate<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(XAttrCreate {
                fid: reader.read_u32()?,
                name: reader.read_str()?,
                attr_size: reader.read_u64()?,
                flags: reader.read_u32()?,
            })
        }
    }

    /// Read directory entries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ReadDir {
        /// Open fid of the directory.
        pub fid: Fid,
        /// Offset from a previous entry, or zero to start over.
        pub offset: u64,
        /// Maximum number of payload bytes to return.
        pub count: u32,
    }

    impl ReadDir {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(ReadDir {
                fid: reader.read_u32()?,
                offset: reader.read_u64()?,
                count: reader.read_u32()?,
            })
        }
    }

    /// Flush cached file data to stable storage.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FSync {
        /// Open fid to sync.
        pub fid: Fid,
    }

    impl FSync {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(FSync { fid: reader.read_u32()? })
        }
    }

    /// Acquire or release a POSIX record lock.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Lock<'a> {
        /// Open fid to lock.
        pub fid: Fid,
        /// Lock kind: read, write or unlock.
        pub kind: u8,
        /// Lock flags.
        pub flags: u32,
        /// First byte of the locked range.
        pub start: u64,
        /// Length of the locked range; zero means to the end of the file.
        pub length: u64,
        /// Process id of the lock holder on the client.
        pub proc_id: u32,
        /// Unique identifier of the client system.
        pub client_id: &'a [u8],
    }

    impl<'a> Lock<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Lock {
                fid: reader.read_u32()?,
                kind: reader.read_u8()?,
                flags: reader.read_u32()?,
                start: reader.read_u64()?,
                length: reader.read_u64()?,
                proc_id: reader.read_u32()?,
                client_id: reader.read_str()?,
            })
        }
    }

    /// Test for the existence of a POSIX record lock.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GetLock<'a> {
        /// Open fid to test.
        pub fid: Fid,
        /// Lock kind to test for.
        pub kind: u8,
        /// First byte of the range to test.
        pub start: u64,
        /// Length of the range to test.
        pub length: u64,
        /// Process id of the inquiring process.
        pub proc_id: u32,
        /// Unique identifier of the client system.
        pub client_id: &'a [u8],
    }

    impl<'a> GetLock<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(GetLock {
                fid: reader.read_u32()?,
                kind: reader.read_u8()?,
                start: reader.read_u64()?,
                length: reader.read_u64()?,
                proc_id: reader.read_u32()?,
                client_id: reader.read_str()?,
            })
        }
    }

    /// Create a hard link.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Link<'a> {
        /// Fid of the directory to create the link in.
        pub dfid: Fid,
        /// Fid of the link target.
        pub fid: Fid,
        /// Name of the new link.
        pub name: &'a [u8],
    }

    impl<'a> Link<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(Link {
                dfid: reader.read_u32()?,
                fid: reader.read_u32()?,
                name: reader.read_str()?,
            })
        }
    }

    /// Create a directory.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MkDir<'a> {
        /// Fid of the containing directory.
        pub dfid: Fid,
        /// Name of the directory to create.
        pub name: &'a [u8],
        /// Linux mkdir(2) mode bits.
        pub mode: u32,
        /// Effective group id of the caller.
        pub gid: u32,
    }

    impl<'a> MkDir<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(MkDir {
                dfid: reader.read_u32()?,
                name: reader.read_str()?,
                mode: reader.read_u32()?,
                gid: reader.read_u32()?,
            })
        }
    }

    /// Rename a directory entry without fids for the files themselves.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenameAt<'a> {
        /// Fid of the source directory.
        pub olddirfid: Fid,
        /// Name within the source directory.
        pub oldname: &'a [u8],
        /// Fid of the destination directory.
        pub newdirfid: Fid,
        /// Name within the destination directory.
        pub newname: &'a [u8],
    }

    impl<'a> RenameAt<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(RenameAt {
                olddirfid: reader.read_u32()?,
                oldname: reader.read_str()?,
                newdirfid: reader.read_u32()?,
                newname: reader.read_str()?,
            })
        }
    }

    /// Unlink a file or directory by name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UnlinkAt<'a> {
        /// Fid of the containing directory.
        pub dfid: Fid,
        /// Name of the entry to unlink.
        pub name: &'a [u8],
        /// Linux unlinkat(2) flags.
        pub flags: u32,
    }

    impl<'a> UnlinkAt<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(UnlinkAt {
                dfid: reader.read_u32()?,
                name: reader.read_str()?,
                flags: reader.read_u32()?,
            })
        }
    }
}

/// Response message bodies added by the Linux dialect.
pub mod response {
    use crate::decoder::Decoder;
    use crate::errors::Result;
    use crate::types::Qid;

    /// The server failed the transaction; carries a numeric errno instead
    /// of a string.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LError {
        /// Linux errno value.
        pub ecode: u32,
    }

    impl LError {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(LError { ecode: reader.read_u32()? })
        }
    }

    /// File-system information.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatFs {
        /// File-system type.
        pub kind: u32,
        /// Optimal transfer block size.
        pub bsize: u32,
        /// Total data blocks.
        pub blocks: u64,
        /// Free blocks.
        pub bfree: u64,
        /// Free blocks available to unprivileged users.
        pub bavail: u64,
        /// Total file nodes.
        pub files: u64,
        /// Free file nodes.
        pub ffree: u64,
        /// File-system id.
        pub fsid: u64,
        /// Maximum file-name length.
        pub namelen: u32,
    }

    impl StatFs {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(StatFs {
                kind: reader.read_u32()?,
                bsize: reader.read_u32()?,
                blocks: reader.read_u64()?,
                bfree: reader.read_u64()?,
                bavail: reader.read_u64()?,
                files: reader.read_u64()?,
                ffree: reader.read_u64()?,
                fsid: reader.read_u64()?,
                namelen: reader.read_u32()?,
            })
        }
    }

    /// Open result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LOpen {
        /// Qid of the opened file.
        pub qid: Qid,
        /// Maximum number of bytes guaranteed to transfer in one message.
        pub iounit: u32,
    }

    impl LOpen {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(LOpen { qid: reader.read_qid()?, iounit: reader.read_u32()? })
        }
    }

    /// Create result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LCreate {
        /// Qid of the created file.
        pub qid: Qid,
        /// Maximum number of bytes guaranteed to transfer in one message.
        pub iounit: u32,
    }

    impl LCreate {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(LCreate { qid: reader.read_qid()?, iounit: reader.read_u32()? })
        }
    }

    /// Symbolic-link creation result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Symlink {
        /// Qid of the new link.
        pub qid: Qid,
    }

    impl Symlink {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Symlink { qid: reader.read_qid()? })
        }
    }

    /// Device-node creation result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MkNode {
        /// Qid of the new node.
        pub qid: Qid,
    }

    impl MkNode {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(MkNode { qid: reader.read_qid()? })
        }
    }

    /// Rename acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Rename;

    /// Symbolic-link read result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ReadLink<'a> {
        /// Target path of the link.
        pub target: &'a [u8],
    }

    impl<'a> ReadLink<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(ReadLink { target: reader.read_str()? })
        }
    }

    /// File attributes, declared here in wire order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct GetAttr {
        /// Bit mask of the fields below the server filled in.
        pub valid: u64,
        /// Qid of the file.
        pub qid: Qid,
        /// Protection bits.
        pub mode: u32,
        /// Numeric owner id.
        pub uid: u32,
        /// Numeric group id.
        pub gid: u32,
        /// Number of hard links.
        pub nlink: u64,
        /// Device id, for special files.
        pub rdev: u64,
        /// File size in bytes.
        pub size: u64,
        /// Block size for file-system I/O.
        pub blksize: u64,
        /// Number of 512-byte blocks allocated.
        pub blocks: u64,
        /// Access time, seconds.
        pub atime_sec: u64,
        /// Access time, nanosecond part.
        pub atime_nsec: u64,
        /// Modification time, seconds.
        pub mtime_sec: u64,
        /// Modification time, nanosecond part.
        pub mtime_nsec: u64,
        /// Status-change time, seconds.
        pub ctime_sec: u64,
        /// Status-change time, nanosecond part.
        pub ctime_nsec: u64,
        /// Creation time, seconds; reserved.
        pub btime_sec: u64,
        /// Creation time, nanosecond part; reserved.
        pub btime_nsec: u64,
        /// Generation number; reserved.
        pub r#gen: u64,
        /// Data version number; reserved.
        pub data_version: u64,
    }

    impl GetAttr {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(GetAttr {
                valid: reader.read_u64()?,
                qid: reader.read_qid()?,
                mode: reader.read_u32()?,
                uid: reader.read_u32()?,
                gid: reader.read_u32()?,
                nlink: reader.read_u64()?,
                rdev: reader.read_u64()?,
                size: reader.read_u64()?,
                blksize: reader.read_u64()?,
                blocks: reader.read_u64()?,
                atime_sec: reader.read_u64()?,
                atime_nsec: reader.read_u64()?,
                mtime_sec: reader.read_u64()?,
                mtime_nsec: reader.read_u64()?,
                ctime_sec: reader.read_u64()?,
                ctime_nsec: reader.read_u64()?,
                btime_sec: reader.read_u64()?,
                btime_nsec: reader.read_u64()?,
                r#gen: reader.read_u64()?,
                data_version: reader.read_u64()?,
            })
        }
    }

    /// Attribute-write acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SetAttr;

    /// Extended-attribute walk result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct XAttrWalk {
        /// Size of the attribute value in bytes.
        pub size: u64,
    }

    impl XAttrWalk {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(XAttrWalk { size: reader.read_u64()? })
        }
    }

    /// Extended-attribute creation acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct XAttrCreate;

    /// Directory read result: a run of packed directory entries.
    ///
    /// Iterate with [`DirEntryReader`](crate::DirEntryReader).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ReadDir<'a> {
        /// Packed entries, borrowed from the receive buffer.
        pub data: &'a [u8],
    }

    impl<'a> ReadDir<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(ReadDir { data: reader.read_blob()? })
        }
    }

    /// Sync acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FSync;

    /// Record-lock result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Lock {
        /// Lock status: success, blocked, error or grace.
        pub status: u8,
    }

    impl Lock {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(Lock { status: reader.read_u8()? })
        }
    }

    /// Record-lock query result: the conflicting lock, if any.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GetLock<'a> {
        /// Kind of the conflicting lock, or unlock if none.
        pub kind: u8,
        /// First byte of the conflicting range.
        pub start: u64,
        /// Length of the conflicting range.
        pub length: u64,
        /// Process id of the conflicting lock holder.
        pub proc_id: u32,
        /// Client system of the conflicting lock holder.
        pub client_id: &'a [u8],
    }

    impl<'a> GetLock<'a> {
        pub(crate) fn decode(reader: &mut Decoder<'a>) -> Result<Self> {
            Ok(GetLock {
                kind: reader.read_u8()?,
                start: reader.read_u64()?,
                length: reader.read_u64()?,
                proc_id: reader.read_u32()?,
                client_id: reader.read_str()?,
            })
        }
    }

    /// Hard-link creation acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Link;

    /// Directory creation result.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MkDir {
        /// Qid of the new directory.
        pub qid: Qid,
    }

    impl MkDir {
        pub(crate) fn decode(reader: &mut Decoder<'_>) -> Result<Self> {
            Ok(MkDir { qid: reader.read_qid()? })
        }
    }

    /// Rename-at acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RenameAt;

    /// Unlink-at acknowledgement; carries nothing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UnlinkAt;
}

/// Dispatch a request body by opcode: the POSIX message set, then the Unix
/// dialect (and through it the base dialect).
pub(crate) fn parse_request<'b>(code: u8, reader: &mut Decoder<'b>) -> Result<Request<'b>> {
    match MessageType::from_u8(code) {
        Some(MessageType::Tstatfs) => request::StatFs::decode(reader).map(Request::StatFs),
        Some(MessageType::Tlopen) => request::LOpen::decode(reader).map(Request::LOpen),
        Some(MessageType::Tlcreate) => request::LCreate::decode(reader).map(Request::LCreate),
        Some(MessageType::Tsymlink) => request::Symlink::decode(reader).map(Request::Symlink),
        Some(MessageType::Tmknod) => request::MkNode::decode(reader).map(Request::MkNode),
        Some(MessageType::Trename) => request::Rename::decode(reader).map(Request::Rename),
        Some(MessageType::Treadlink) => {
            request::ReadLink::decode(reader).map(Request::ReadLink)
        }
        Some(MessageType::Tgetattr) => request::GetAttr::decode(reader).map(Request::GetAttr),
        Some(MessageType::Tsetattr) => request::SetAttr::decode(reader).map(Request::SetAttr),
        Some(MessageType::Txattrwalk) => {
            request::XAttrWalk::decode(reader).map(Request::XAttrWalk)
        }
        Some(MessageType::Txattrcreate) => {
            request::XAttrCreate::decode(reader).map(Request::XAttrCreate)
        }
        Some(MessageType::Treaddir) => request::ReadDir::decode(reader).map(Request::ReadDir),
        Some(MessageType::Tfsync) => request::FSync::decode(reader).map(Request::FSync),
        Some(MessageType::Tlock) => request::Lock::decode(reader).map(Request::Lock),
        Some(MessageType::Tgetlock) => request::GetLock::decode(reader).map(Request::GetLock),
        Some(MessageType::Tlink) => request::Link::decode(reader).map(Request::Link),
        Some(MessageType::Tmkdir) => request::MkDir::decode(reader).map(Request::MkDir),
        Some(MessageType::Trenameat) => {
            request::RenameAt::decode(reader).map(Request::RenameAt)
        }
        Some(MessageType::Tunlinkat) => {
            request::UnlinkAt::decode(reader).map(Request::UnlinkAt)
        }
        _ => unix::parse_request(code, reader),
    }
}

/// Dispatch a response body by opcode: the POSIX message set, then the Unix
/// dialect (and through it the base dialect).
pub(crate) fn parse_response<'b>(code: u8, reader: &mut Decoder<'b>) -> Result<Response<'b>> {
    match MessageType::from_u8(code) {
        Some(MessageType::Rlerror) => response::LError::decode(reader).map(Response::LError),
        Some(MessageType::Rstatfs) => response::StatFs::decode(reader).map(Response::StatFs),
        Some(MessageType::Rlopen) => response::LOpen::decode(reader).map(Response::LOpen),
        Some(MessageType::Rlcreate) => {
            response::LCreate::decode(reader).map(Response::LCreate)
        }
        Some(MessageType::Rsymlink) => {
            response::Symlink::decode(reader).map(Response::Symlink)
        }
        Some(MessageType::Rmknod) => response::MkNode::decode(reader).map(Response::MkNode),
        Some(MessageType::Rrename) => Ok(Response::Rename(response::Rename)),
        Some(MessageType::Rreadlink) => {
            response::ReadLink::decode(reader).map(Response::ReadLink)
        }
        Some(MessageType::Rgetattr) => {
            response::GetAttr::decode(reader).map(Response::GetAttr)
        }
        Some(MessageType::Rsetattr) => Ok(Response::SetAttr(response::SetAttr)),
        Some(MessageType::Rxattrwalk) => {
            response::XAttrWalk::decode(reader).map(Response::XAttrWalk)
        }
        Some(MessageType::Rxattrcreate) => Ok(Response::XAttrCreate(response::XAttrCreate)),
        Some(MessageType::Rreaddir) => {
            response::ReadDir::decode(reader).map(Response::ReadDir)
        }
        Some(MessageType::Rfsync) => Ok(Response::FSync(response::FSync)),
        Some(MessageType::Rlock) => response::Lock::decode(reader).map(Response::Lock),
        Some(MessageType::Rgetlock) => {
            response::GetLock::decode(reader).map(Response::GetLock)
        }
        Some(MessageType::Rlink) => Ok(Response::Link(response::Link)),
        Some(MessageType::Rmkdir) => response::MkDir::decode(reader).map(Response::MkDir),
        Some(MessageType::Rrenameat) => Ok(Response::RenameAt(response::RenameAt)),
        Some(MessageType::Runlinkat) => Ok(Response::UnlinkAt(response::UnlinkAt)),
        _ => unix::parse_response(code, reader),
    }
}

/// Human-readable name of an opcode under this dialect.
#[must_use]
pub fn message_name(code: u8) -> &'static str {
    match MessageType::from_u8(code) {
        Some(MessageType::Tlerror) => "Tlerror",
        Some(MessageType::Rlerror) => "Rlerror",
        Some(MessageType::Tstatfs) => "Tstatfs",
        Some(MessageType::Rstatfs) => "Rstatfs",
        Some(MessageType::Tlopen) => "Tlopen",
        Some(MessageType::Rlopen) => "Rlopen",
        Some(MessageType::Tlcreate) => "Tlcreate",
        Some(MessageType::Rlcreate) => "Rlcreate",
        Some(MessageType::Tsymlink) => "Tsymlink",
        Some(MessageType::Rsymlink) => "Rsymlink",
        Some(MessageType::Tmknod) => "Tmknod",
        Some(MessageType::Rmknod) => "Rmknod",
        Some(MessageType::Trename) => "Trename",
        Some(MessageType::Rrename) => "Rrename",
        Some(MessageType::Treadlink) => "Treadlink",
        Some(MessageType::Rreadlink) => "Rreadlink",
        Some(MessageType::Tgetattr) => "Tgetattr",
        Some(MessageType::Rgetattr) => "Rgetattr",
        Some(MessageType::Tsetattr) => "Tsetattr",
        Some(MessageType::Rsetattr) => "Rsetattr",
        Some(MessageType::Txattrwalk) => "Txattrwalk",
        Some(MessageType::Rxattrwalk) => "Rxattrwalk",
        Some(MessageType::Txattrcreate) => "Txattrcreate",
        Some(MessageType::Rxattrcreate) => "Rxattrcreate",
        Some(MessageType::Treaddir) => "Treaddir",
        Some(MessageType::Rreaddir) => "Rreaddir",
        Some(MessageType::Tfsync) => "Tfsync",
        Some(MessageType::Rfsync) => "Rfsync",
        Some(MessageType::Tlock) => "Tlock",
        Some(MessageType::Rlock) => "Rlock",
        Some(MessageType::Tgetlock) => "Tgetlock",
        Some(MessageType::Rgetlock) => "Rgetlock",
        Some(MessageType::Tlink) => "Tlink",
        Some(MessageType::Rlink) => "Rlink",
        Some(MessageType::Tmkdir) => "Tmkdir",
        Some(MessageType::Rmkdir) => "Rmkdir",
        Some(MessageType::Trenameat) => "Trenameat",
        Some(MessageType::Rrenameat) => "Rrenameat",
        Some(MessageType::Tunlinkat) => "Tunlinkat",
        Some(MessageType::Runlinkat) => "Runlinkat",
        None => unix::message_name(code),
    }
}
