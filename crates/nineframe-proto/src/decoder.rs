//! Cursored reader over one received frame.
//!
//! All multi-byte integers on the wire are little-endian. Reads never copy:
//! strings, blobs and walk paths come back as sub-slices of the input
//! borrowed for the decoder's lifetime. Every failing read reports
//! [`ProtocolError::InsufficientData`] and leaves the cursor at the failing
//! position.

use crate::MAX_WELEM;
use crate::errors::{ProtocolError, Result};
use crate::types::{Qid, QidSeq, QidType, Stat, UnixStat, WalkPath};

/// Cursor over a contiguous byte region holding exactly one frame.
///
/// The decoder exclusively borrows its input for the duration of parsing;
/// decoded messages hold views into the same bytes.
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Wrap a byte region, cursor at its start.
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Decoder { buf, pos: 0 }
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

    /// View the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(ProtocolError::InsufficientData {
            needed: n,
            available: self.remaining(),
        })?;
        let view = self.buf.get(self.pos..end).ok_or(ProtocolError::InsufficientData {
            needed: n,
            available: self.remaining(),
        })?;
        self.pos = end;
        Ok(view)
    }

    /// Advance past `n` bytes without looking at them.
    pub fn advance(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let view = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(view);
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_array::<1>().map(|b| b[0])
    }

    /// Read a 16-bit little-endian integer.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Read a 32-bit little-endian integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Read a 64-bit little-endian integer.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Read a length-prefixed string: `len:u16 | bytes[len]`.
    ///
    /// The bytes are UTF-8 by protocol convention but returned unvalidated.
    pub fn read_str(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u16()?;
        self.read_bytes(len as usize)
    }

    /// Read a length-prefixed byte blob: `len:u32 | bytes[len]`.
    pub fn read_blob(&mut self) -> Result<&'a [u8]> {
        let len = self.read_u32()?;
        self.read_bytes(len as usize)
    }

    /// Read a qid: `type:u8 | version:u32 | path:u64`.
    pub fn read_qid(&mut self) -> Result<Qid> {
        Ok(Qid {
            kind: QidType::from_bits_retain(self.read_u8()?),
            version: self.read_u32()?,
            path: self.read_u64()?,
        })
    }

    /// Read a stat record in declared field order.
    pub fn read_stat(&mut self) -> Result<Stat<'a>> {
        Ok(Stat {
            size: self.read_u16()?,
            kind: self.read_u16()?,
            dev: self.read_u32()?,
            qid: self.read_qid()?,
            mode: crate::types::FileMode::from_bits_retain(self.read_u32()?),
            atime: self.read_u32()?,
            mtime: self.read_u32()?,
            length: self.read_u64()?,
            name: self.read_str()?,
            uid: self.read_str()?,
            gid: self.read_str()?,
            muid: self.read_str()?,
        })
    }

    /// Read a Unix-extended stat record: the base record followed by the
    /// extension string and the three numeric identities.
    pub fn read_unix_stat(&mut self) -> Result<UnixStat<'a>> {
        Ok(UnixStat {
            stat: self.read_stat()?,
            extension: self.read_str()?,
            n_uid: self.read_u32()?,
            n_gid: self.read_u32()?,
            n_muid: self.read_u32()?,
        })
    }

    /// Read a walk path: `count:u16` followed by `count` strings.
    ///
    /// The segment span is scanned once to establish its extent, then
    /// captured as a view; segment decoding happens lazily on iteration.
    /// A count above [`MAX_WELEM`] is an error.
    pub fn read_walk_path(&mut self) -> Result<WalkPath<'a>> {
        let count = self.read_u16()?;
        if count as usize > MAX_WELEM {
            return Err(ProtocolError::WalkTooLong { count: u32::from(count) });
        }

        let start = self.pos;
        for _ in 0..count {
            let len = self.read_u16()?;
            self.advance(len as usize)?;
        }

        // Span bounds were just walked, the slice is in range.
        Ok(WalkPath::new(count, &self.buf[start..self.pos]))
    }

    /// Read a qid sequence: `count:u16 | qid[count]`, at most [`MAX_WELEM`]
    /// elements.
    pub fn read_qid_seq(&mut self) -> Result<QidSeq> {
        let count = self.read_u16()?;
        if count as usize > MAX_WELEM {
            return Err(ProtocolError::WalkTooLong { count: u32::from(count) });
        }

        let mut seq = QidSeq { count, ..QidSeq::default() };
        for slot in seq.qids.iter_mut().take(count as usize) {
            *slot = self.read_qid()?;
        }
        Ok(seq)
    }
}
