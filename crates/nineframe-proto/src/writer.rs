//! Message writers: frame assembly with size backfill.
//!
//! A writer streams a message into a caller-supplied buffer: a placeholder
//! header first, then the body, with the header's size field backfilled in
//! place. Whole messages are driven by the [`Request`] / [`Response`] sum
//! types; the messages that carry a variable-length path or trailing data
//! (Walk, Write, ShortRead, ShortWrite) additionally support incremental
//! construction through [`PathWriter`], [`DataWriter`] and
//! [`PathDataWriter`], which backfill the segment count as segments are
//! appended.
//!
//! The body is written once, directly into the destination; nothing is
//! buffered in a temporary collection. After every completed operation the
//! frame in the buffer is well-formed, and the returned length says how many
//! bytes to put on the wire.

use crate::encoder::Encoder;
use crate::errors::{ProtocolError, Result};
use crate::header::MessageHeader;
use crate::messages::{Request, Response, base, erlang};
use crate::types::{Stat, UnixStat};
use crate::{MAX_WELEM, Tag};

/// Frame state shared by the request and response writers: the encoder, the
/// header start position and the header fields written so far.
#[derive(Debug)]
pub(crate) struct FrameBuilder<'b> {
    encoder: Encoder<'b>,
    start: usize,
    tag: Tag,
}

impl<'b> FrameBuilder<'b> {
    fn new(buffer: &'b mut [u8], tag: Tag) -> Self {
        let encoder = Encoder::new(buffer);
        let start = encoder.position();
        FrameBuilder { encoder, start, tag }
    }

    pub(crate) fn encoder(&mut self) -> &mut Encoder<'b> {
        &mut self.encoder
    }

    /// Start a message of the given kind: rewind to the frame start and lay
    /// down a placeholder header carrying the opcode and tag.
    pub(crate) fn begin(&mut self, message_type: u8) -> Result<()> {
        self.encoder.seek(self.start)?;
        self.encoder
            .put_bytes(MessageHeader::new(message_type, self.tag, 0).as_bytes())
    }

    /// Backfill the header's size field with the bytes written since the
    /// frame start, leaving the cursor at the end of the body.
    pub(crate) fn update_message_size(&mut self) -> Result<u32> {
        let end = self.encoder.position();
        let size = (end - self.start) as u32;
        self.encoder.seek(self.start)?;
        self.encoder.put_u32(size)?;
        self.encoder.seek(end)?;
        Ok(size)
    }
}

/// Writer for request messages.
///
/// One writer builds one frame; the buffer is exclusively borrowed until the
/// writer is dropped.
#[derive(Debug)]
pub struct RequestWriter<'b> {
    frame: FrameBuilder<'b>,
}

impl<'b> RequestWriter<'b> {
    /// Wrap an output buffer. `tag` correlates the request with its
    /// response; version negotiation conventionally uses
    /// [`NO_TAG`](crate::NO_TAG).
    #[must_use]
    pub fn new(buffer: &'b mut [u8], tag: Tag) -> Self {
        RequestWriter { frame: FrameBuilder::new(buffer, tag) }
    }

    /// Encode a complete request message, returning the frame length.
    pub fn request(&mut self, message: &Request<'_>) -> Result<u32> {
        self.frame.begin(message.opcode())?;
        encode_request_body(self.frame.encoder(), message)?;
        self.frame.update_message_size()
    }

    /// Start a Walk request; segments are appended through the returned
    /// [`PathWriter`].
    pub fn walk(&mut self, fid: crate::Fid, newfid: crate::Fid) -> Result<PathWriter<'_, 'b>> {
        self.frame.begin(base::MessageType::TWalk as u8)?;
        self.frame.encoder().put_u32(fid)?;
        self.frame.encoder().put_u32(newfid)?;
        PathWriter::start(&mut self.frame)
    }

    /// Start a Write request; the trailing data is supplied through the
    /// returned [`DataWriter`].
    pub fn write(&mut self, fid: crate::Fid, offset: u64) -> Result<DataWriter<'_, 'b>> {
        self.frame.begin(base::MessageType::TWrite as u8)?;
        self.frame.encoder().put_u32(fid)?;
        self.frame.encoder().put_u64(offset)?;
        Ok(DataWriter { frame: &mut self.frame })
    }

    /// Start a ShortRead request (Erlang dialect); path segments are
    /// appended through the returned [`PathWriter`].
    pub fn short_read(&mut self, fid: crate::Fid) -> Result<PathWriter<'_, 'b>> {
        self.frame.begin(erlang::MessageType::TShortRead as u8)?;
        self.frame.encoder().put_u32(fid)?;
        PathWriter::start(&mut self.frame)
    }

    /// Start a ShortWrite request (Erlang dialect); path segments and the
    /// trailing data go through the returned [`PathDataWriter`].
    pub fn short_write(&mut self, fid: crate::Fid) -> Result<PathDataWriter<'_, 'b>> {
        self.frame.begin(erlang::MessageType::TShortWrite as u8)?;
        self.frame.encoder().put_u32(fid)?;
        let path = PathWriter::start(&mut self.frame)?;
        Ok(PathDataWriter { path })
    }
}

/// Writer for response messages.
#[derive(Debug)]
pub struct ResponseWriter<'b> {
    frame: FrameBuilder<'b>,
}

impl<'b> ResponseWriter<'b> {
    /// Wrap an output buffer; `tag` echoes the request being answered.
    #[must_use]
    pub fn new(buffer: &'b mut [u8], tag: Tag) -> Self {
        ResponseWriter { frame: FrameBuilder::new(buffer, tag) }
    }

    /// Encode a complete response message, returning the frame length.
    pub fn response(&mut self, message: &Response<'_>) -> Result<u32> {
        self.frame.begin(message.opcode())?;
        encode_response_body(self.frame.encoder(), message)?;
        self.frame.update_message_size()
    }

    pub(crate) fn frame(&mut self) -> &mut FrameBuilder<'b> {
        &mut self.frame
    }
}

/// Incremental path construction for Walk and ShortRead requests.
///
/// Each appended segment is written immediately; the segment count written
/// ahead of the segments is backfilled on every append, so the frame stays
/// well-formed throughout.
#[derive(Debug)]
pub struct PathWriter<'w, 'b> {
    frame: &'w mut FrameBuilder<'b>,
    count_pos: usize,
    count: u16,
}

impl<'w, 'b> PathWriter<'w, 'b> {
    fn start(frame: &'w mut FrameBuilder<'b>) -> Result<Self> {
        let count_pos = frame.encoder().position();
        frame.encoder().put_u16(0)?;
        frame.update_message_size()?;
        Ok(PathWriter { frame, count_pos, count: 0 })
    }

    /// Append one path segment. A seventeenth segment is refused.
    pub fn segment(&mut self, segment: &[u8]) -> Result<&mut Self> {
        if usize::from(self.count) >= MAX_WELEM {
            return Err(ProtocolError::WalkTooLong { count: u32::from(self.count) + 1 });
        }

        self.frame.encoder().put_str(segment)?;
        self.count += 1;

        let end = self.frame.encoder().position();
        self.frame.encoder().seek(self.count_pos)?;
        self.frame.encoder().put_u16(self.count)?;
        self.frame.encoder().seek(end)?;
        self.frame.update_message_size()?;
        Ok(self)
    }

    /// Finish the message, returning the frame length.
    pub fn finish(self) -> Result<u32> {
        self.frame.update_message_size()
    }

    fn into_data_writer(self) -> DataWriter<'w, 'b> {
        DataWriter { frame: self.frame }
    }
}

/// Trailing-data construction for Write requests.
#[derive(Debug)]
pub struct DataWriter<'w, 'b> {
    frame: &'w mut FrameBuilder<'b>,
}

impl DataWriter<'_, '_> {
    /// Append the data blob and finish the message, returning the frame
    /// length.
    pub fn data(self, data: &[u8]) -> Result<u32> {
        self.frame.encoder().put_blob(data)?;
        self.frame.update_message_size()
    }
}

/// Path-then-data construction for ShortWrite requests.
#[derive(Debug)]
pub struct PathDataWriter<'w, 'b> {
    path: PathWriter<'w, 'b>,
}

impl PathDataWriter<'_, '_> {
    /// Append one path segment.
    pub fn segment(&mut self, segment: &[u8]) -> Result<&mut Self> {
        self.path.segment(segment)?;
        Ok(self)
    }

    /// Append the data blob and finish the message, returning the frame
    /// length.
    pub fn data(self, data: &[u8]) -> Result<u32> {
        self.path.into_data_writer().data(data)
    }
}

fn put_stat_with_size(encoder: &mut Encoder<'_>, dummy_size: u16, stat: &Stat<'_>) -> Result<()> {
    encoder.put_u16(dummy_size)?;
    encoder.put_stat(stat)
}

fn put_unix_stat_with_size(
    encoder: &mut Encoder<'_>,
    dummy_size: u16,
    stat: &UnixStat<'_>,
) -> Result<()> {
    encoder.put_u16(dummy_size)?;
    encoder.put_unix_stat(stat)
}

fn encode_request_body(encoder: &mut Encoder<'_>, message: &Request<'_>) -> Result<()> {
    match message {
        Request::Version(m) => {
            encoder.put_u32(m.msize)?;
            encoder.put_str(m.version)
        }
        Request::Auth(m) => {
            encoder.put_u32(m.afid)?;
            encoder.put_str(m.uname)?;
            encoder.put_str(m.aname)
        }
        Request::AuthUnix(m) => {
            encoder.put_u32(m.auth.afid)?;
            encoder.put_str(m.auth.uname)?;
            encoder.put_str(m.auth.aname)?;
            encoder.put_u32(m.n_uname)
        }
        Request::Flush(m) => encoder.put_u16(m.oldtag),
        Request::Attach(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u32(m.afid)?;
            encoder.put_str(m.uname)?;
            encoder.put_str(m.aname)
        }
        Request::AttachUnix(m) => {
            encoder.put_u32(m.attach.fid)?;
            encoder.put_u32(m.attach.afid)?;
            encoder.put_str(m.attach.uname)?;
            encoder.put_str(m.attach.aname)?;
            encoder.put_u32(m.n_uname)
        }
        Request::Walk(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u32(m.newfid)?;
            encoder.put_walk_path(&m.path)
        }
        Request::Open(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u8(m.mode.bits())
        }
        Request::Create(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_str(m.name)?;
            encoder.put_u32(m.perm)?;
            encoder.put_u8(m.mode.bits())
        }
        Request::CreateUnix(m) => {
            encoder.put_u32(m.create.fid)?;
            encoder.put_str(m.create.name)?;
            encoder.put_u32(m.create.perm)?;
            encoder.put_u8(m.create.mode.bits())?;
            encoder.put_str(m.extension)
        }
        Request::Read(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u64(m.offset)?;
            encoder.put_u32(m.count)
        }
        Request::Write(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u64(m.offset)?;
            encoder.put_blob(m.data)
        }
        Request::Clunk(m) => encoder.put_u32(m.fid),
        Request::Remove(m) => encoder.put_u32(m.fid),
        Request::Stat(m) => encoder.put_u32(m.fid),
        Request::WStat(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_stat(&m.stat)
        }
        Request::WStatUnix(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_unix_stat(&m.stat)
        }
        Request::Session(m) => encoder.put_bytes(&m.key),
        Request::ShortRead(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_walk_path(&m.path)
        }
        Request::ShortWrite(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_walk_path(&m.path)?;
            encoder.put_blob(m.data)
        }
        Request::StatFs(m) => encoder.put_u32(m.fid),
        Request::LOpen(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u32(m.flags)
        }
        Request::LCreate(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_str(m.name)?;
            encoder.put_u32(m.flags)?;
            encoder.put_u32(m.mode)?;
            encoder.put_u32(m.gid)
        }
        Request::Symlink(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_str(m.name)?;
            encoder.put_str(m.symtgt)?;
            encoder.put_u32(m.gid)
        }
        Request::MkNode(m) => {
            encoder.put_u32(m.dfid)?;
            encoder.put_str(m.name)?;
            encoder.put_u32(m.mode)?;
            encoder.put_u32(m.major)?;
            encoder.put_u32(m.minor)?;
            encoder.put_u32(m.gid)
        }
        Request::Rename(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u32(m.dfid)?;
            encoder.put_str(m.name)
        }
        Request::ReadLink(m) => encoder.put_u32(m.fid),
        Request::GetAttr(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u64(m.request_mask)
        }
        Request::SetAttr(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u32(m.valid)?;
            encoder.put_u32(m.mode)?;
            encoder.put_u32(m.uid)?;
            encoder.put_u32(m.gid)?;
            encoder.put_u64(m.size)?;
            encoder.put_u64(m.atime_sec)?;
            encoder.put_u64(m.atime_nsec)?;
            encoder.put_u64(m.mtime_sec)?;
            encoder.put_u64(m.mtime_nsec)
        }
        Request::XAttrWalk(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u32(m.newfid)?;
            encoder.put_str(m.name)
        }
        Request::XAttrCreate(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_str(m.name)?;
            encoder.put_u64(m.attr_size)?;
            encoder.put_u32(m.flags)
        }
        Request::ReadDir(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u64(m.offset)?;
            encoder.put_u32(m.count)
        }
        Request::FSync(m) => encoder.put_u32(m.fid),
        Request::Lock(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u8(m.kind)?;
            encoder.put_u32(m.flags)?;
            encoder.put_u64(m.start)?;
            encoder.put_u64(m.length)?;
            encoder.put_u32(m.proc_id)?;
            encoder.put_str(m.client_id)
        }
        Request::GetLock(m) => {
            encoder.put_u32(m.fid)?;
            encoder.put_u8(m.kind)?;
            encoder.put_u64(m.start)?;
            encoder.put_u64(m.length)?;
            encoder.put_u32(m.proc_id)?;
            encoder.put_str(m.client_id)
        }
        Request::Link(m) => {
            encoder.put_u32(m.dfid)?;
            encoder.put_u32(m.fid)?;
            encoder.put_str(m.name)
        }
        Request::MkDir(m) => {
            encoder.put_u32(m.dfid)?;
            encoder.put_str(m.name)?;
            encoder.put_u32(m.mode)?;
            encoder.put_u32(m.gid)
        }
        Request::RenameAt(m) => {
            encoder.put_u32(m.olddirfid)?;
            encoder.put_str(m.oldname)?;
            encoder.put_u32(m.newdirfid)?;
            encoder.put_str(m.newname)
        }
        Request::UnlinkAt(m) => {
            encoder.put_u32(m.dfid)?;
            encoder.put_str(m.name)?;
            encoder.put_u32(m.flags)
        }
    }
}

fn encode_response_body(encoder: &mut Encoder<'_>, message: &Response<'_>) -> Result<()> {
    match message {
        Response::Version(m) => {
            encoder.put_u32(m.msize)?;
            encoder.put_str(m.version)
        }
        Response::Auth(m) => encoder.put_qid(m.qid),
        Response::Attach(m) => encoder.put_qid(m.qid),
        Response::Error(m) => encoder.put_str(m.ename),
        Response::ErrorUnix(m) => {
            encoder.put_str(m.error.ename)?;
            encoder.put_u32(m.errcode)
        }
        Response::Flush(_) | Response::Clunk(_) | Response::Remove(_) | Response::WStat(_) => {
            Ok(())
        }
        Response::Walk(m) => encoder.put_qid_seq(m.qids.as_slice()),
        Response::Open(m) => {
            encoder.put_qid(m.qid)?;
            encoder.put_u32(m.iounit)
        }
        Response::Create(m) => {
            encoder.put_qid(m.qid)?;
            encoder.put_u32(m.iounit)
        }
        Response::Read(m) => encoder.put_blob(m.data),
        Response::Write(m) => encoder.put_u32(m.count),
        Response::Stat(m) => put_stat_with_size(encoder, m.dummy_size, &m.stat),
        Response::StatUnix(m) => put_unix_stat_with_size(encoder, m.dummy_size, &m.stat),
        Response::Session(_) => Ok(()),
        Response::ShortRead(m) => encoder.put_blob(m.data),
        Response::ShortWrite(m) => encoder.put_u32(m.count),
        Response::LError(m) => encoder.put_u32(m.ecode),
        Response::StatFs(m) => {
            encoder.put_u32(m.kind)?;
            encoder.put_u32(m.bsize)?;
            encoder.put_u64(m.blocks)?;
            encoder.put_u64(m.bfree)?;
            encoder.put_u64(m.bavail)?;
            encoder.put_u64(m.files)?;
            encoder.put_u64(m.ffree)?;
            encoder.put_u64(m.fsid)?;
            encoder.put_u32(m.namelen)
        }
        Response::LOpen(m) => {
            encoder.put_qid(m.qid)?;
            encoder.put_u32(m.iounit)
        }
        Response::LCreate(m) => {
            encoder.put_qid(m.qid)?;
            encoder.put_u32(m.iounit)
        }
        Response::Symlink(m) => encoder.put_qid(m.qid),
        Response::MkNode(m) => encoder.put_qid(m.qid),
        Response::Rename(_)
        | Response::SetAttr(_)
        | Response::XAttrCreate(_)
        | Response::FSync(_)
        | Response::Link(_)
        | Response::RenameAt(_)
        | Response::UnlinkAt(_) => Ok(()),
        Response::ReadLink(m) => encoder.put_str(m.target),
        Response::GetAttr(m) => {
            encoder.put_u64(m.valid)?;
            encoder.put_qid(m.qid)?;
            encoder.put_u32(m.mode)?;
            encoder.put_u32(m.uid)?;
            encoder.put_u32(m.gid)?;
            encoder.put_u64(m.nlink)?;
            encoder.put_u64(m.rdev)?;
            encoder.put_u64(m.size)?;
            encoder.put_u64(m.blksize)?;
            encoder.put_u64(m.blocks)?;
            encoder.put_u64(m.atime_sec)?;
            encoder.put_u64(m.atime_nsec)?;
            encoder.put_u64(m.mtime_sec)?;
            encoder.put_u64(m.mtime_nsec)?;
            encoder.put_u64(m.ctime_sec)?;
            encoder.put_u64(m.ctime_nsec)?;
            encoder.put_u64(m.btime_sec)?;
            encoder.put_u64(m.btime_nsec)?;
            encoder.put_u64(m.r#gen)?;
            encoder.put_u64(m.data_version)
        }
        Response::XAttrWalk(m) => encoder.put_u64(m.size),
        Response::ReadDir(m) => encoder.put_blob(m.data),
        Response::Lock(m) => encoder.put_u8(m.status),
        Response::GetLock(m) => {
            encoder.put_u8(m.kind)?;
            encoder.put_u64(m.start)?;
            encoder.put_u64(m.length)?;
            encoder.put_u32(m.proc_id)?;
            encoder.put_str(m.client_id)
        }
        Response::MkDir(m) => encoder.put_qid(m.qid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::header::parse_message_header;
    use crate::{NO_FID, NO_TAG};

    #[test]
    fn version_request_matches_the_handshake_wire_image() {
        let mut buf = [0u8; 64];
        let mut writer = RequestWriter::new(&mut buf, NO_TAG);

        let len = writer
            .request(&Request::Version(base::request::Version {
                msize: 8192,
                version: b"9P2000",
            }))
            .unwrap();

        assert_eq!(len, 19);
        let expected = [
            0x13, 0x00, 0x00, 0x00, // size = 19
            0x64, // type = 100
            0xFF, 0xFF, // tag = NOTAG
            0x00, 0x20, 0x00, 0x00, // msize = 8192
            0x06, 0x00, b'9', b'P', b'2', b'0', b'0', b'0',
        ];
        assert_eq!(&buf[..len as usize], &expected);
    }

    #[test]
    fn attach_request_layout_and_size() {
        let mut buf = [0u8; 64];
        let mut writer = RequestWriter::new(&mut buf, 1);

        let len = writer
            .request(&Request::Attach(base::request::Attach {
                fid: 0,
                afid: NO_FID,
                uname: b"bob",
                aname: b"",
            }))
            .unwrap();

        assert_eq!(len, 22);
        assert_eq!(buf[4], 104);
        assert_eq!(&buf[7..11], &[0, 0, 0, 0]);
        assert_eq!(&buf[11..15], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&buf[15..20], &[3, 0, b'b', b'o', b'b']);
        assert_eq!(&buf[20..22], &[0, 0]);
    }

    #[test]
    fn header_size_field_equals_bytes_written() {
        let mut buf = [0u8; 64];
        let mut writer = ResponseWriter::new(&mut buf, 5);
        let len = writer
            .response(&Response::Error(base::response::Error { ename: b"permission denied" }))
            .unwrap();

        assert_eq!(len, 7 + 2 + 17);
        let mut reader = Decoder::new(&buf[..len as usize]);
        let header = parse_message_header(&mut reader).unwrap();
        assert_eq!(header.message_size(), len);
        assert_eq!(header.message_type(), 107);
        assert_eq!(header.tag(), 5);
    }

    #[test]
    fn incremental_walk_backfills_the_segment_count() {
        let mut buf = [0u8; 128];
        let mut writer = RequestWriter::new(&mut buf, 1);

        let mut path = writer.walk(1, 2).unwrap();
        path.segment(b"usr").unwrap();
        path.segment(b"bin").unwrap();
        let len = path.finish().unwrap();

        // size | type | tag | fid | newfid | nwname | 2 segments
        assert_eq!(len, 7 + 4 + 4 + 2 + 5 + 5);
        assert_eq!(buf[4], 110);
        assert_eq!(&buf[15..17], &[2, 0]);
        assert_eq!(&buf[17..22], &[3, 0, b'u', b's', b'r']);
    }

    #[test]
    fn seventeenth_segment_is_refused() {
        let mut buf = [0u8; 1024];
        let mut writer = RequestWriter::new(&mut buf, 1);

        let mut path = writer.walk(1, 2).unwrap();
        for _ in 0..MAX_WELEM {
            path.segment(b"a").unwrap();
        }
        assert_eq!(
            path.segment(b"a").map(|_| ()),
            Err(ProtocolError::WalkTooLong { count: 17 })
        );
    }

    #[test]
    fn empty_walk_is_well_formed() {
        let mut buf = [0u8; 32];
        let mut writer = RequestWriter::new(&mut buf, 1);
        let len = writer.walk(1, 2).unwrap().finish().unwrap();
        assert_eq!(len, 7 + 4 + 4 + 2);
        assert_eq!(&buf[15..17], &[0, 0]);
    }

    #[test]
    fn write_request_appends_trailing_data() {
        let mut buf = [0u8; 64];
        let mut writer = RequestWriter::new(&mut buf, 1);

        let len = writer.write(3, 512).unwrap().data(b"hello").unwrap();
        assert_eq!(len, 7 + 4 + 8 + 4 + 5);
        assert_eq!(&buf[19..23], &[5, 0, 0, 0]);
        assert_eq!(&buf[23..28], b"hello");
    }

    #[test]
    fn short_write_combines_path_and_data() {
        let mut buf = [0u8; 128];
        let mut writer = RequestWriter::new(&mut buf, 1);

        let mut message = writer.short_write(7).unwrap();
        message.segment(b"tmp").unwrap();
        let len = message.data(b"x").unwrap();

        assert_eq!(buf[4], 154);
        // size | type | tag | fid | nwname | "tmp" | blob
        assert_eq!(len, 7 + 4 + 2 + 5 + 4 + 1);
        let mut reader = Decoder::new(&buf[..len as usize]);
        let header = parse_message_header(&mut reader).unwrap();
        let parsed = crate::create_request_parser(b"9P2000.e", 8192)
            .unwrap()
            .parse_request(header, &mut reader)
            .unwrap();
        let Request::ShortWrite(short_write) = parsed else {
            unreachable!("short write frames parse back to their own variant");
        };
        assert_eq!(short_write.fid, 7);
        assert_eq!(short_write.data, b"x");
        let segments: Vec<&[u8]> = short_write.path.iter().collect();
        assert_eq!(segments, [b"tmp".as_slice()]);
    }

    #[test]
    fn buffer_exhaustion_surfaces_insufficient_space() {
        let mut buf = [0u8; 10];
        let mut writer = RequestWriter::new(&mut buf, 1);
        let result = writer.request(&Request::Version(base::request::Version {
            msize: 8192,
            version: b"9P2000",
        }));
        assert!(matches!(result, Err(ProtocolError::InsufficientSpace { .. })));
    }

    #[test]
    fn stat_response_carries_the_outer_size_prefix() {
        let stat = Stat {
            kind: 1,
            dev: 2,
            qid: crate::Qid::default(),
            length: 512,
            name: b"f",
            uid: b"u",
            gid: b"g",
            muid: b"u",
            ..Stat::default()
        };
        let stat = Stat { size: stat.size_field(), ..stat };

        let mut buf = [0u8; 128];
        let mut writer = ResponseWriter::new(&mut buf, 1);
        let len = writer
            .response(&Response::Stat(base::response::Stat {
                dummy_size: stat.protocol_size() as u16,
                stat,
            }))
            .unwrap();

        // The outer prefix counts the full record, the inner field excludes
        // itself.
        let outer = u16::from_le_bytes([buf[7], buf[8]]);
        let inner = u16::from_le_bytes([buf[9], buf[10]]);
        assert_eq!(u32::from(outer), stat.protocol_size());
        assert_eq!(inner, stat.size_field());
        assert_eq!(len, 7 + 2 + stat.protocol_size());
    }
}
