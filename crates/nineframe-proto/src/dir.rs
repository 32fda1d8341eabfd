//! Directory payload helpers.
//!
//! [`DirListingWriter`] stream-encodes stat records into the data payload of
//! a base-dialect Read response, honoring the client's byte offset and count
//! limit. [`DirEntryReader`] walks the packed entries of a 9P2000.L
//! directory-read response.

use crate::decoder::Decoder;
use crate::errors::Result;
use crate::messages::base;
use crate::messages::linux::DirEntry;
use crate::types::Stat;
use crate::writer::ResponseWriter;

/// Streams a directory listing into a Read response.
///
/// A directory read returns the byte range `[offset, offset + max_bytes)` of
/// the concatenated stat encodings that make up the directory, except that
/// records are never split: a record crossing either boundary is skipped
/// whole, so every byte of the response belongs to a complete record.
///
/// Candidate records are offered in directory order via
/// [`DirListingWriter::encode`]; the response's inner data length and the
/// frame size are kept current after every accepted record, so the caller
/// can stop at any point and transmit what has been built.
#[derive(Debug)]
pub struct DirListingWriter<'w, 'b> {
    writer: &'w mut ResponseWriter<'b>,
    data_pos: usize,
    offset: u64,
    max_bytes: u32,
    bytes_traversed: u64,
    bytes_encoded: u32,
}

impl<'w, 'b> DirListingWriter<'w, 'b> {
    /// Prepare `writer` with a Read response carrying an empty data payload
    /// and wrap it for listing. `max_bytes` and `offset` come from the
    /// client's read request.
    pub fn new(
        writer: &'w mut ResponseWriter<'b>,
        max_bytes: u32,
        offset: u64,
    ) -> Result<Self> {
        let frame = writer.frame();
        frame.begin(base::MessageType::RRead as u8)?;
        let data_pos = frame.encoder().position();
        frame.encoder().put_blob(&[])?;
        frame.update_message_size()?;

        Ok(DirListingWriter {
            writer,
            data_pos,
            offset,
            max_bytes,
            bytes_traversed: 0,
            bytes_encoded: 0,
        })
    }

    /// Offer the next directory entry.
    ///
    /// Returns `Ok(true)` if the caller should keep offering entries: the
    /// record was either written or silently skipped because it lies before
    /// the client's offset. Returns `Ok(false)` when the record would push
    /// the payload past the client's count; nothing is written and the
    /// listing is complete.
    pub fn encode(&mut self, stat: &Stat<'_>) -> Result<bool> {
        let proto_size = stat.protocol_size();

        self.bytes_traversed += u64::from(proto_size);
        if self.bytes_traversed <= self.offset {
            return Ok(true);
        }

        if self.bytes_encoded + proto_size > self.max_bytes {
            return Ok(false);
        }
        self.bytes_encoded += proto_size;

        let frame = self.writer.frame();
        frame.encoder().put_stat(stat)?;

        // Backfill the inner data length, then the frame size.
        let end = frame.encoder().position();
        let data_len = (end - self.data_pos - 4) as u32;
        frame.encoder().seek(self.data_pos)?;
        frame.encoder().put_u32(data_len)?;
        frame.encoder().seek(end)?;
        frame.update_message_size()?;

        Ok(true)
    }

    /// Total encoded bytes of all records traversed so far, written or not.
    #[must_use]
    pub const fn bytes_traversed(&self) -> u64 {
        self.bytes_traversed
    }

    /// Bytes actually written into the response payload.
    #[must_use]
    pub const fn bytes_encoded(&self) -> u32 {
        self.bytes_encoded
    }

    /// The frame length built so far: header, inner data length, payload.
    #[must_use]
    pub const fn message_size(&self) -> u32 {
        crate::header::MessageHeader::SIZE as u32 + 4 + self.bytes_encoded
    }
}

/// Iterator over the packed entries of a 9P2000.L directory-read payload.
///
/// Yields `Ok` entries until the payload is exhausted; a malformed entry
/// yields one `Err` and ends the iteration.
#[derive(Debug)]
pub struct DirEntryReader<'a> {
    reader: Decoder<'a>,
    failed: bool,
}

impl<'a> DirEntryReader<'a> {
    /// Wrap the data payload of a directory-read response.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        DirEntryReader { reader: Decoder::new(data), failed: false }
    }
}

impl<'a> Iterator for DirEntryReader<'a> {
    type Item = Result<DirEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.remaining() == 0 {
            return None;
        }

        let entry = DirEntry::decode(&mut self.reader);
        if entry.is_err() {
            self.failed = true;
        }
        Some(entry)
    }
}
