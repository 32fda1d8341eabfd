//! Property-based round-trip tests.
//!
//! Every message that encodes must parse back to an equal value under the
//! dialect that defines it, for all field values, not just the examples the
//! wire-format tests spell out. Strategies generate owned field data; the
//! messages borrow from it for the duration of one case.

use nineframe_proto::messages::{Request, Response, base, erlang, linux, unix};
use nineframe_proto::{
    Decoder, FileMode, OpenMode, Qid, QidSeq, QidType, RequestWriter, ResponseWriter, Stat,
    UnixStat, create_request_parser, create_response_parser, parse_message_header,
};
use proptest::prelude::*;

const TEST_PAYLOAD_LIMIT: u32 = 1 << 16;

fn assert_request_round_trips(version: &str, message: &Request<'_>) {
    let mut buf = vec![0u8; (TEST_PAYLOAD_LIMIT as usize) + 7];
    let len = RequestWriter::new(&mut buf, 1).request(message).expect("encodes") as usize;

    let parser = create_request_parser(version.as_bytes(), TEST_PAYLOAD_LIMIT).expect("negotiates");
    let mut reader = Decoder::new(&buf[..len]);
    let header = parse_message_header(&mut reader).expect("header parses");
    assert_eq!(header.message_size() as usize, len);
    assert_eq!(header.message_type(), message.opcode());

    let parsed = parser.parse_request(header, &mut reader).expect("body parses");
    assert_eq!(&parsed, message);
    assert_eq!(reader.remaining(), 0);
}

fn assert_response_round_trips(version: &str, message: &Response<'_>) {
    let mut buf = vec![0u8; (TEST_PAYLOAD_LIMIT as usize) + 7];
    let len = ResponseWriter::new(&mut buf, 1).response(message).expect("encodes") as usize;

    let parser =
        create_response_parser(version.as_bytes(), TEST_PAYLOAD_LIMIT).expect("negotiates");
    let mut reader = Decoder::new(&buf[..len]);
    let header = parse_message_header(&mut reader).expect("header parses");
    assert_eq!(header.message_type(), message.opcode());

    let parsed = parser.parse_response(header, &mut reader).expect("body parses");
    assert_eq!(&parsed, message);
    assert_eq!(reader.remaining(), 0);
}

fn small_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..48)
}

fn arbitrary_qid() -> impl Strategy<Value = Qid> {
    (any::<u8>(), any::<u32>(), any::<u64>()).prop_map(|(kind, version, path)| Qid {
        kind: QidType::from_bits_retain(kind),
        version,
        path,
    })
}

#[derive(Debug, Clone)]
struct StatSpec {
    kind: u16,
    dev: u32,
    qid: Qid,
    mode: u32,
    atime: u32,
    mtime: u32,
    length: u64,
    name: Vec<u8>,
    uid: Vec<u8>,
    gid: Vec<u8>,
    muid: Vec<u8>,
}

impl StatSpec {
    fn as_stat(&self) -> Stat<'_> {
        let stat = Stat {
            size: 0,
            kind: self.kind,
            dev: self.dev,
            qid: self.qid,
            mode: FileMode::from_bits_retain(self.mode),
            atime: self.atime,
            mtime: self.mtime,
            length: self.length,
            name: &self.name,
            uid: &self.uid,
            gid: &self.gid,
            muid: &self.muid,
        };
        Stat { size: stat.size_field(), ..stat }
    }
}

fn arbitrary_stat_spec() -> impl Strategy<Value = StatSpec> {
    (
        (any::<u16>(), any::<u32>(), arbitrary_qid(), any::<u32>()),
        (any::<u32>(), any::<u32>(), any::<u64>()),
        (small_bytes(), small_bytes(), small_bytes(), small_bytes()),
    )
        .prop_map(|((kind, dev, qid, mode), (atime, mtime, length), (name, uid, gid, muid))| {
            StatSpec { kind, dev, qid, mode, atime, mtime, length, name, uid, gid, muid }
        })
}

#[derive(Debug, Clone)]
struct UnixStatSpec {
    stat: StatSpec,
    extension: Vec<u8>,
    n_uid: u32,
    n_gid: u32,
    n_muid: u32,
}

impl UnixStatSpec {
    fn as_stat(&self) -> UnixStat<'_> {
        let stat = UnixStat {
            stat: self.stat.as_stat(),
            extension: &self.extension,
            n_uid: self.n_uid,
            n_gid: self.n_gid,
            n_muid: self.n_muid,
        };
        let size = stat.size_field();
        UnixStat { stat: Stat { size, ..stat.stat }, ..stat }
    }
}

fn arbitrary_unix_stat_spec() -> impl Strategy<Value = UnixStatSpec> {
    (arbitrary_stat_spec(), small_bytes(), any::<u32>(), any::<u32>(), any::<u32>()).prop_map(
        |(stat, extension, n_uid, n_gid, n_muid)| UnixStatSpec {
            stat,
            extension,
            n_uid,
            n_gid,
            n_muid,
        },
    )
}

proptest! {
    #[test]
    fn base_version_request(msize in any::<u32>(), version in small_bytes()) {
        assert_request_round_trips(
            "9P2000",
            &Request::Version(base::request::Version { msize, version: &version }),
        );
    }

    #[test]
    fn base_auth_request(afid in any::<u32>(), uname in small_bytes(), aname in small_bytes()) {
        assert_request_round_trips(
            "9P2000",
            &Request::Auth(base::request::Auth { afid, uname: &uname, aname: &aname }),
        );
    }

    #[test]
    fn base_attach_request(
        fid in any::<u32>(),
        afid in any::<u32>(),
        uname in small_bytes(),
        aname in small_bytes(),
    ) {
        assert_request_round_trips(
            "9P2000",
            &Request::Attach(base::request::Attach {
                fid,
                afid,
                uname: &uname,
                aname: &aname,
            }),
        );
    }

    #[test]
    fn base_fid_only_requests(fid in any::<u32>(), oldtag in any::<u16>()) {
        assert_request_round_trips("9P2000", &Request::Flush(base::request::Flush { oldtag }));
        assert_request_round_trips("9P2000", &Request::Clunk(base::request::Clunk { fid }));
        assert_request_round_trips("9P2000", &Request::Remove(base::request::Remove { fid }));
        assert_request_round_trips("9P2000", &Request::Stat(base::request::Stat { fid }));
    }

    #[test]
    fn base_open_and_create_requests(
        fid in any::<u32>(),
        mode in any::<u8>(),
        name in small_bytes(),
        perm in any::<u32>(),
    ) {
        assert_request_round_trips(
            "9P2000",
            &Request::Open(base::request::Open { fid, mode: OpenMode::from_bits(mode) }),
        );
        assert_request_round_trips(
            "9P2000",
            &Request::Create(base::request::Create {
                fid,
                name: &name,
                perm,
                mode: OpenMode::from_bits(mode),
            }),
        );
    }

    #[test]
    fn base_read_write_requests(
        fid in any::<u32>(),
        offset in any::<u64>(),
        count in any::<u32>(),
        data in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        assert_request_round_trips(
            "9P2000",
            &Request::Read(base::request::Read { fid, offset, count }),
        );
        assert_request_round_trips(
            "9P2000",
            &Request::Write(base::request::Write { fid, offset, data: &data }),
        );
    }

    #[test]
    fn base_wstat_request(fid in any::<u32>(), spec in arbitrary_stat_spec()) {
        assert_request_round_trips(
            "9P2000",
            &Request::WStat(base::request::WStat { fid, stat: spec.as_stat() }),
        );
    }

    #[test]
    fn incremental_walk_round_trips(
        fid in any::<u32>(),
        newfid in any::<u32>(),
        segments in prop::collection::vec(small_bytes(), 0..=16),
    ) {
        let mut buf = vec![0u8; (TEST_PAYLOAD_LIMIT as usize) + 7];
        let mut writer = RequestWriter::new(&mut buf, 1);
        let mut path = writer.walk(fid, newfid).expect("walk begins");
        for segment in &segments {
            path.segment(segment).expect("segment fits");
        }
        let len = path.finish().expect("finishes") as usize;

        let parser = create_request_parser(b"9P2000", TEST_PAYLOAD_LIMIT).expect("negotiates");
        let mut reader = Decoder::new(&buf[..len]);
        let header = parse_message_header(&mut reader).expect("header parses");
        let Request::Walk(walk) = parser.parse_request(header, &mut reader).expect("parses")
        else {
            unreachable!("opcode 110 parses as a walk");
        };

        prop_assert_eq!(walk.fid, fid);
        prop_assert_eq!(walk.newfid, newfid);
        prop_assert_eq!(usize::from(walk.path.len()), segments.len());
        let decoded: Vec<&[u8]> = walk.path.iter().collect();
        let expected: Vec<&[u8]> = segments.iter().map(Vec::as_slice).collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn base_responses_round_trip(
        msize in any::<u32>(),
        version in small_bytes(),
        qid in arbitrary_qid(),
        iounit in any::<u32>(),
        count in any::<u32>(),
        ename in small_bytes(),
        data in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        assert_response_round_trips(
            "9P2000",
            &Response::Version(base::response::Version { msize, version: &version }),
        );
        assert_response_round_trips("9P2000", &Response::Auth(base::response::Auth { qid }));
        assert_response_round_trips(
            "9P2000",
            &Response::Attach(base::response::Attach { qid }),
        );
        assert_response_round_trips(
            "9P2000",
            &Response::Error(base::response::Error { ename: &ename }),
        );
        assert_response_round_trips(
            "9P2000",
            &Response::Open(base::response::Open { qid, iounit }),
        );
        assert_response_round_trips(
            "9P2000",
            &Response::Create(base::response::Create { qid, iounit }),
        );
        assert_response_round_trips("9P2000", &Response::Read(base::response::Read { data: &data }));
        assert_response_round_trips("9P2000", &Response::Write(base::response::Write { count }));
        assert_response_round_trips("9P2000", &Response::Flush(base::response::Flush));
        assert_response_round_trips("9P2000", &Response::Clunk(base::response::Clunk));
        assert_response_round_trips("9P2000", &Response::Remove(base::response::Remove));
        assert_response_round_trips("9P2000", &Response::WStat(base::response::WStat));
    }

    #[test]
    fn base_walk_response_round_trips(
        qids in prop::collection::vec(arbitrary_qid(), 0..=16),
    ) {
        let seq: QidSeq = qids.iter().collect();
        assert_response_round_trips(
            "9P2000",
            &Response::Walk(base::response::Walk { qids: seq }),
        );
    }

    #[test]
    fn base_stat_response_round_trips(spec in arbitrary_stat_spec()) {
        let stat = spec.as_stat();
        assert_response_round_trips(
            "9P2000",
            &Response::Stat(base::response::Stat {
                dummy_size: stat.protocol_size() as u16,
                stat,
            }),
        );
    }

    #[test]
    fn unix_widened_requests_round_trip(
        fid in any::<u32>(),
        afid in any::<u32>(),
        uname in small_bytes(),
        aname in small_bytes(),
        n_uname in any::<u32>(),
        name in small_bytes(),
        perm in any::<u32>(),
        mode in any::<u8>(),
        extension in small_bytes(),
    ) {
        assert_request_round_trips(
            "9P2000.u",
            &Request::AuthUnix(unix::request::Auth {
                auth: base::request::Auth { afid, uname: &uname, aname: &aname },
                n_uname,
            }),
        );
        assert_request_round_trips(
            "9P2000.u",
            &Request::AttachUnix(unix::request::Attach {
                attach: base::request::Attach { fid, afid, uname: &uname, aname: &aname },
                n_uname,
            }),
        );
        assert_request_round_trips(
            "9P2000.u",
            &Request::CreateUnix(unix::request::Create {
                create: base::request::Create {
                    fid,
                    name: &name,
                    perm,
                    mode: OpenMode::from_bits(mode),
                },
                extension: &extension,
            }),
        );
    }

    #[test]
    fn unix_wstat_round_trips(fid in any::<u32>(), spec in arbitrary_unix_stat_spec()) {
        assert_request_round_trips(
            "9P2000.u",
            &Request::WStatUnix(unix::request::WStat { fid, stat: spec.as_stat() }),
        );
    }

    #[test]
    fn unix_widened_responses_round_trip(
        ename in small_bytes(),
        errcode in any::<u32>(),
        spec in arbitrary_unix_stat_spec(),
    ) {
        assert_response_round_trips(
            "9P2000.u",
            &Response::ErrorUnix(unix::response::Error {
                error: base::response::Error { ename: &ename },
                errcode,
            }),
        );

        let stat = spec.as_stat();
        assert_response_round_trips(
            "9P2000.u",
            &Response::StatUnix(unix::response::Stat {
                dummy_size: stat.protocol_size() as u16,
                stat,
            }),
        );
    }

    #[test]
    fn erlang_messages_round_trip(
        key in any::<[u8; 8]>(),
        count in any::<u32>(),
        data in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        assert_request_round_trips(
            "9P2000.e",
            &Request::Session(erlang::request::Session { key }),
        );
        assert_response_round_trips("9P2000.e", &Response::Session(erlang::response::Session));
        assert_response_round_trips(
            "9P2000.e",
            &Response::ShortRead(erlang::response::ShortRead { data: &data }),
        );
        assert_response_round_trips(
            "9P2000.e",
            &Response::ShortWrite(erlang::response::ShortWrite { count }),
        );
    }

    #[test]
    fn erlang_short_read_builds_incrementally(
        fid in any::<u32>(),
        segments in prop::collection::vec(small_bytes(), 0..=16),
    ) {
        let mut buf = vec![0u8; (TEST_PAYLOAD_LIMIT as usize) + 7];
        let mut writer = RequestWriter::new(&mut buf, 1);
        let mut path = writer.short_read(fid).expect("short read begins");
        for segment in &segments {
            path.segment(segment).expect("segment fits");
        }
        let len = path.finish().expect("finishes") as usize;

        let parser = create_request_parser(b"9P2000.e", TEST_PAYLOAD_LIMIT).expect("negotiates");
        let mut reader = Decoder::new(&buf[..len]);
        let header = parse_message_header(&mut reader).expect("header parses");
        let Request::ShortRead(short_read) =
            parser.parse_request(header, &mut reader).expect("parses")
        else {
            unreachable!("opcode 152 parses as a short read");
        };
        prop_assert_eq!(short_read.fid, fid);
        let decoded: Vec<&[u8]> = short_read.path.iter().collect();
        let expected: Vec<&[u8]> = segments.iter().map(Vec::as_slice).collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn erlang_short_write_builds_incrementally(
        fid in any::<u32>(),
        segments in prop::collection::vec(small_bytes(), 0..=16),
        data in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let mut buf = vec![0u8; (TEST_PAYLOAD_LIMIT as usize) + 7];
        let mut writer = RequestWriter::new(&mut buf, 1);
        let mut message = writer.short_write(fid).expect("short write begins");
        for segment in &segments {
            message.segment(segment).expect("segment fits");
        }
        let len = message.data(&data).expect("data fits") as usize;

        let parser = create_request_parser(b"9P2000.e", TEST_PAYLOAD_LIMIT).expect("negotiates");
        let mut reader = Decoder::new(&buf[..len]);
        let header = parse_message_header(&mut reader).expect("header parses");
        let Request::ShortWrite(short_write) =
            parser.parse_request(header, &mut reader).expect("parses")
        else {
            unreachable!("opcode 154 parses as a short write");
        };
        prop_assert_eq!(short_write.fid, fid);
        prop_assert_eq!(short_write.data, data.as_slice());
    }

    #[test]
    fn linux_requests_round_trip(
        fid in any::<u32>(),
        dfid in any::<u32>(),
        flags in any::<u32>(),
        mode in any::<u32>(),
        gid in any::<u32>(),
        name in small_bytes(),
        target in small_bytes(),
        mask in any::<u64>(),
    ) {
        assert_request_round_trips(
            "9P2000.L",
            &Request::StatFs(linux::request::StatFs { fid }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::LOpen(linux::request::LOpen { fid, flags }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::LCreate(linux::request::LCreate { fid, name: &name, flags, mode, gid }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::Symlink(linux::request::Symlink {
                fid,
                name: &name,
                symtgt: &target,
                gid,
            }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::Rename(linux::request::Rename { fid, dfid, name: &name }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::GetAttr(linux::request::GetAttr { fid, request_mask: mask }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::MkDir(linux::request::MkDir { dfid, name: &name, mode, gid }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::UnlinkAt(linux::request::UnlinkAt { dfid, name: &name, flags }),
        );
    }

    #[test]
    fn linux_mknod_and_setattr_round_trip(
        dfid in any::<u32>(),
        name in small_bytes(),
        mode in any::<u32>(),
        major in any::<u32>(),
        minor in any::<u32>(),
        gid in any::<u32>(),
        fid in any::<u32>(),
        valid in any::<u32>(),
        uid in any::<u32>(),
        size in any::<u64>(),
        times in any::<[u64; 4]>(),
    ) {
        assert_request_round_trips(
            "9P2000.L",
            &Request::MkNode(linux::request::MkNode { dfid, name: &name, mode, major, minor, gid }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::SetAttr(linux::request::SetAttr {
                fid,
                valid,
                mode,
                uid,
                gid,
                size,
                atime_sec: times[0],
                atime_nsec: times[1],
                mtime_sec: times[2],
                mtime_nsec: times[3],
            }),
        );
    }

    #[test]
    fn linux_xattr_and_dir_requests_round_trip(
        fid in any::<u32>(),
        newfid in any::<u32>(),
        name in small_bytes(),
        attr_size in any::<u64>(),
        flags in any::<u32>(),
        offset in any::<u64>(),
        count in any::<u32>(),
    ) {
        assert_request_round_trips(
            "9P2000.L",
            &Request::XAttrWalk(linux::request::XAttrWalk { fid, newfid, name: &name }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::XAttrCreate(linux::request::XAttrCreate {
                fid,
                name: &name,
                attr_size,
                flags,
            }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::ReadDir(linux::request::ReadDir { fid, offset, count }),
        );
        assert_request_round_trips("9P2000.L", &Request::FSync(linux::request::FSync { fid }));
        assert_request_round_trips(
            "9P2000.L",
            &Request::ReadLink(linux::request::ReadLink { fid }),
        );
    }

    #[test]
    fn linux_lock_requests_round_trip(
        fid in any::<u32>(),
        kind in any::<u8>(),
        flags in any::<u32>(),
        start in any::<u64>(),
        length in any::<u64>(),
        proc_id in any::<u32>(),
        client_id in small_bytes(),
    ) {
        assert_request_round_trips(
            "9P2000.L",
            &Request::Lock(linux::request::Lock {
                fid,
                kind,
                flags,
                start,
                length,
                proc_id,
                client_id: &client_id,
            }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::GetLock(linux::request::GetLock {
                fid,
                kind,
                start,
                length,
                proc_id,
                client_id: &client_id,
            }),
        );
    }

    #[test]
    fn linux_link_and_renameat_round_trip(
        dfid in any::<u32>(),
        fid in any::<u32>(),
        name in small_bytes(),
        olddirfid in any::<u32>(),
        oldname in small_bytes(),
        newdirfid in any::<u32>(),
        newname in small_bytes(),
    ) {
        assert_request_round_trips(
            "9P2000.L",
            &Request::Link(linux::request::Link { dfid, fid, name: &name }),
        );
        assert_request_round_trips(
            "9P2000.L",
            &Request::RenameAt(linux::request::RenameAt {
                olddirfid,
                oldname: &oldname,
                newdirfid,
                newname: &newname,
            }),
        );
    }

    #[test]
    fn linux_responses_round_trip(
        ecode in any::<u32>(),
        qid in arbitrary_qid(),
        iounit in any::<u32>(),
        target in small_bytes(),
        xattr_size in any::<u64>(),
        status in any::<u8>(),
        data in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        assert_response_round_trips(
            "9P2000.L",
            &Response::LError(linux::response::LError { ecode }),
        );
        assert_response_round_trips(
            "9P2000.L",
            &Response::LOpen(linux::response::LOpen { qid, iounit }),
        );
        assert_response_round_trips(
            "9P2000.L",
            &Response::LCreate(linux::response::LCreate { qid, iounit }),
        );
        assert_response_round_trips(
            "9P2000.L",
            &Response::Symlink(linux::response::Symlink { qid }),
        );
        assert_response_round_trips(
            "9P2000.L",
            &Response::MkNode(linux::response::MkNode { qid }),
        );
        assert_response_round_trips(
            "9P2000.L",
            &Response::ReadLink(linux::response::ReadLink { target: &target }),
        );
        assert_response_round_trips(
            "9P2000.L",
            &Response::XAttrWalk(linux::response::XAttrWalk { size: xattr_size }),
        );
        assert_response_round_trips(
            "9P2000.L",
            &Response::ReadDir(linux::response::ReadDir { data: &data }),
        );
        assert_response_round_trips(
            "9P2000.L",
            &Response::Lock(linux::response::Lock { status }),
        );
        assert_response_round_trips(
            "9P2000.L",
            &Response::MkDir(linux::response::MkDir { qid }),
        );
    }

    #[test]
    fn linux_statfs_response_round_trips(
        kind in any::<u32>(),
        bsize in any::<u32>(),
        sizes in any::<[u64; 6]>(),
        namelen in any::<u32>(),
    ) {
        assert_response_round_trips(
            "9P2000.L",
            &Response::StatFs(linux::response::StatFs {
                kind,
                bsize,
                blocks: sizes[0],
                bfree: sizes[1],
                bavail: sizes[2],
                files: sizes[3],
                ffree: sizes[4],
                fsid: sizes[5],
                namelen,
            }),
        );
    }

    #[test]
    fn linux_getattr_response_round_trips(
        valid in any::<u64>(),
        qid in arbitrary_qid(),
        mode in any::<u32>(),
        uid in any::<u32>(),
        gid in any::<u32>(),
        words in any::<[u64; 15]>(),
    ) {
        assert_response_round_trips(
            "9P2000.L",
            &Response::GetAttr(linux::response::GetAttr {
                valid,
                qid,
                mode,
                uid,
                gid,
                nlink: words[0],
                rdev: words[1],
                size: words[2],
                blksize: words[3],
                blocks: words[4],
                atime_sec: words[5],
                atime_nsec: words[6],
                mtime_sec: words[7],
                mtime_nsec: words[8],
                ctime_sec: words[9],
                ctime_nsec: words[10],
                btime_sec: words[11],
                btime_nsec: words[12],
                r#gen: words[13],
                data_version: words[14],
            }),
        );
    }

    #[test]
    fn linux_getlock_response_round_trips(
        kind in any::<u8>(),
        start in any::<u64>(),
        length in any::<u64>(),
        proc_id in any::<u32>(),
        client_id in small_bytes(),
    ) {
        assert_response_round_trips(
            "9P2000.L",
            &Response::GetLock(linux::response::GetLock {
                kind,
                start,
                length,
                proc_id,
                client_id: &client_id,
            }),
        );
    }
}

mod dir_listing {
    use super::*;
    use nineframe_proto::DirListingWriter;

    proptest! {
        /// The listing contains exactly the records whose traversal range
        /// lies past the offset and whose cumulative size fits the count,
        /// in input order.
        #[test]
        fn listing_matches_the_skip_and_cut_model(
            specs in prop::collection::vec(arbitrary_stat_spec(), 0..12),
            offset_records in 0usize..14,
            max_bytes in 0u32..4096,
        ) {
            let stats: Vec<Stat<'_>> = specs.iter().map(StatSpec::as_stat).collect();

            // Model: skip whole records up to the offset, then take whole
            // records while they fit.
            let offset: u64 = stats
                .iter()
                .take(offset_records)
                .map(|stat| u64::from(stat.protocol_size()))
                .sum();
            let mut expected = Vec::new();
            let mut traversed = 0u64;
            let mut encoded = 0u32;
            for stat in &stats {
                let size = stat.protocol_size();
                traversed += u64::from(size);
                if traversed <= offset {
                    continue;
                }
                if encoded + size > max_bytes {
                    break;
                }
                encoded += size;
                expected.push(*stat);
            }

            let mut buf = vec![0u8; 65536];
            let mut writer = ResponseWriter::new(&mut buf, 1);
            let mut listing =
                DirListingWriter::new(&mut writer, max_bytes, offset).expect("listing begins");
            for stat in &stats {
                if !listing.encode(stat).expect("encode succeeds") {
                    break;
                }
            }
            prop_assert_eq!(listing.bytes_encoded(), encoded);

            // Decode the payload back into records and compare.
            let size = listing.message_size() as usize;
            let parser = create_response_parser(b"9P2000", 65536).expect("negotiates");
            let mut reader = Decoder::new(&buf[..size]);
            let header = parse_message_header(&mut reader).expect("header parses");
            let Response::Read(read) =
                parser.parse_response(header, &mut reader).expect("parses")
            else {
                unreachable!("a dir listing is a read response");
            };

            let mut decoded = Vec::new();
            let mut payload = Decoder::new(read.data);
            while payload.remaining() > 0 {
                decoded.push(payload.read_stat().expect("payload holds whole records"));
            }
            prop_assert_eq!(decoded, expected);
        }
    }
}
