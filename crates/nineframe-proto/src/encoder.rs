//! Cursored writer over a caller-supplied output buffer.
//!
//! The encoder is the mirror of [`Decoder`](crate::Decoder): little-endian
//! integers, length-prefixed strings and blobs, and the compound protocol
//! values. It additionally supports position seek, which the message writers
//! use to backfill a frame size, a path segment count or an inner data
//! length after the bytes they describe have been written.
//!
//! The buffer is fixed-size; a write that does not fit reports
//! [`ProtocolError::InsufficientSpace`] and leaves the cursor where it was.

use crate::errors::{ProtocolError, Result};
use crate::types::{Qid, Stat, UnixStat, WalkPath};

/// Cursor over a mutable byte region messages are encoded into.
///
/// The encoder exclusively borrows the output buffer until it is dropped.
#[derive(Debug)]
pub struct Encoder<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Encoder<'a> {
    /// Wrap an output region, cursor at its start.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Encoder { buf, pos: 0 }
    }

    /// Bytes left between the cursor and the end of the region.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Current cursor position from the start of the region.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor to an absolute position inside the region.
    ///
    /// Seeking backwards is how writers backfill counts and sizes; seeking
    /// past the end of the region is an error.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(ProtocolError::InsufficientSpace {
                needed: pos,
                available: self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Write raw bytes at the cursor.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self.pos.checked_add(bytes.len()).ok_or(ProtocolError::InsufficientSpace {
            needed: bytes.len(),
            available: self.remaining(),
        })?;
        let available = self.buf.len() - self.pos;
        let dest = self.buf.get_mut(self.pos..end).ok_or(ProtocolError::InsufficientSpace {
            needed: bytes.len(),
            available,
        })?;
        dest.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    /// Write one byte.
    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.put_bytes(&[value])
    }

    /// Write a 16-bit little-endian integer.
    pub fn put_u16(&mut self, value: u16) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    /// Write a 32-bit little-endian integer.
    pub fn put_u32(&mut self, value: u32) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    /// Write a 64-bit little-endian integer.
    pub fn put_u64(&mut self, value: u64) -> Result<()> {
        self.put_bytes(&value.to_le_bytes())
    }

    /// Write a length-prefixed string: `len:u16 | bytes[len]`.
    pub fn put_str(&mut self, s: &[u8]) -> Result<()> {
        let len = u16::try_from(s.len())
            .map_err(|_| ProtocolError::StringTooLong { length: s.len() })?;
        self.put_u16(len)?;
        self.put_bytes(s)
    }

    /// Write a length-prefixed byte blob: `len:u32 | bytes[len]`.
    pub fn put_blob(&mut self, data: &[u8]) -> Result<()> {
        self.put_u32(data.len() as u32)?;
        self.put_bytes(data)
    }

    /// Write a qid: `type:u8 | version:u32 | path:u64`.
    pub fn put_qid(&mut self, qid: Qid) -> Result<()> {
        self.put_u8(qid.kind.bits())?;
        self.put_u32(qid.version)?;
        self.put_u64(qid.path)
    }

    /// Write a stat record in declared field order.
    ///
    /// The `size` field is written as stored; use [`Stat::size_field`] to
    /// compute a consistent value. A record whose encoding would not fit the
    /// 16-bit size field is refused.
    pub fn put_stat(&mut self, stat: &Stat<'_>) -> Result<()> {
        let size = stat.protocol_size() as usize;
        if size - 2 > usize::from(u16::MAX) {
            return Err(ProtocolError::StatTooLarge { size });
        }
        self.put_stat_fields(stat)
    }

    fn put_stat_fields(&mut self, stat: &Stat<'_>) -> Result<()> {
        self.put_u16(stat.size)?;
        self.put_u16(stat.kind)?;
        self.put_u32(stat.dev)?;
        self.put_qid(stat.qid)?;
        self.put_u32(stat.mode.bits())?;
        self.put_u32(stat.atime)?;
        self.put_u32(stat.mtime)?;
        self.put_u64(stat.length)?;
        self.put_str(stat.name)?;
        self.put_str(stat.uid)?;
        self.put_str(stat.gid)?;
        self.put_str(stat.muid)
    }

    /// Write a Unix-extended stat record.
    pub fn put_unix_stat(&mut self, stat: &UnixStat<'_>) -> Result<()> {
        let size = stat.protocol_size() as usize;
        if size - 2 > usize::from(u16::MAX) {
            return Err(ProtocolError::StatTooLarge { size });
        }
        self.put_stat_fields(&stat.stat)?;
        self.put_str(stat.extension)?;
        self.put_u32(stat.n_uid)?;
        self.put_u32(stat.n_gid)?;
        self.put_u32(stat.n_muid)
    }

    /// Write a walk path: the count prefix followed by the raw pre-encoded
    /// segment span the view holds. At most [`MAX_WELEM`] segments.
    ///
    /// [`MAX_WELEM`]: crate::MAX_WELEM
    pub fn put_walk_path(&mut self, path: &WalkPath<'_>) -> Result<()> {
        if usize::from(path.len()) > crate::MAX_WELEM {
            return Err(ProtocolError::WalkTooLong { count: u32::from(path.len()) });
        }
        self.put_u16(path.len())?;
        self.put_bytes(path.as_bytes())
    }

    /// Write a qid sequence: `count:u16 | qid[count]`.
    pub fn put_qid_seq(&mut self, qids: &[Qid]) -> Result<()> {
        let count = u16::try_from(qids.len())
            .map_err(|_| ProtocolError::WalkTooLong { count: qids.len() as u32 })?;
        self.put_u16(count)?;
        for qid in qids {
            self.put_qid(*qid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Decoder;
    use crate::types::QidType;

    #[test]
    fn integers_are_little_endian() {
        let mut buf = [0u8; 8];
        let mut enc = Encoder::new(&mut buf);

        enc.put_u32(0x2000).unwrap();
        enc.put_u16(0xFFFF).unwrap();
        assert_eq!(enc.position(), 6);
        assert_eq!(&buf[..6], &[0x00, 0x20, 0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn overflowing_write_leaves_cursor_in_place() {
        let mut buf = [0u8; 3];
        let mut enc = Encoder::new(&mut buf);

        enc.put_u16(7).unwrap();
        assert_eq!(
            enc.put_u32(9),
            Err(ProtocolError::InsufficientSpace { needed: 4, available: 1 })
        );
        assert_eq!(enc.position(), 2);
    }

    #[test]
    fn seek_allows_backfill() {
        let mut buf = [0u8; 8];
        let mut enc = Encoder::new(&mut buf);

        enc.put_u32(0).unwrap();
        enc.put_u32(0xAABB_CCDD).unwrap();
        enc.seek(0).unwrap();
        enc.put_u32(8).unwrap();

        assert_eq!(&buf, &[8, 0, 0, 0, 0xDD, 0xCC, 0xBB, 0xAA]);
    }

    #[test]
    fn seek_past_end_is_refused() {
        let mut buf = [0u8; 4];
        let mut enc = Encoder::new(&mut buf);
        assert!(enc.seek(5).is_err());
        assert_eq!(enc.position(), 0);
    }

    #[test]
    fn string_round_trip() {
        let mut buf = [0u8; 16];
        let mut enc = Encoder::new(&mut buf);
        enc.put_str(b"9P2000").unwrap();
        let written = enc.position();

        let mut dec = Decoder::new(&buf[..written]);
        assert_eq!(dec.read_str().unwrap(), b"9P2000");
    }

    #[test]
    fn qid_round_trip() {
        let qid = Qid { kind: QidType::AUTH, version: 3, path: 0xDEAD_BEEF };
        let mut buf = [0u8; 13];
        Encoder::new(&mut buf).put_qid(qid).unwrap();

        assert_eq!(Decoder::new(&buf).read_qid().unwrap(), qid);
    }

    #[test]
    fn stat_round_trip_preserves_every_field() {
        let stat = Stat {
            kind: 1,
            dev: 2,
            qid: Qid { kind: QidType::DIR, version: 0, path: 64 },
            mode: crate::types::FileMode::DIR | crate::types::FileMode::READ,
            atime: 100,
            mtime: 200,
            length: 4096,
            name: b"root",
            uid: b"glenda",
            gid: b"adm",
            muid: b"glenda",
            ..Stat::default()
        };
        let stat = Stat { size: stat.size_field(), ..stat };

        let mut buf = [0u8; 128];
        let mut enc = Encoder::new(&mut buf);
        enc.put_stat(&stat).unwrap();
        let written = enc.position();
        assert_eq!(written as u32, stat.protocol_size());

        let decoded = Decoder::new(&buf[..written]).read_stat().unwrap();
        assert_eq!(decoded, stat);
    }

    #[test]
    fn qid_seq_rejects_more_than_max_welem_on_decode() {
        let qids = [Qid::default(); 17];
        let mut buf = [0u8; 256];
        let mut enc = Encoder::new(&mut buf);
        // The encoder itself takes any slice length that fits a u16 count;
        // the sixteen-element bound belongs to the walk messages.
        enc.put_qid_seq(&qids).unwrap();

        let written = enc.position();
        let mut dec = Decoder::new(&buf[..written]);
        assert_eq!(dec.read_qid_seq(), Err(ProtocolError::WalkTooLong { count: 17 }));
    }
}
