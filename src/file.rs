//! Whole-file codec: composition of the four on-disk sections.
//!
//! # Layout
//! A file is exactly `Header · Metadata · Blocks · BlockIndex`, in that
//! order, with no gaps and no padding beyond the 512-byte header page.  The
//! header pins the other sections in place:
//!
//! ```text
//! offset 0                        fixed 512-byte header page
//! offset 512                      metadata, 2 * meta_info_length bytes
//! offset start_of_blocks()        record blocks
//! offset record_block_index_pos   block index, runs to end of file
//! ```
//!
//! # Reader
//! [`YxdbFile::from_bytes`] decodes each section inside an isolated window
//! sized from the header, so a section that under- or over-consumes is
//! caught at its own boundary instead of corrupting the next one.  A
//! `record_block_index_pos` pointing before the end of metadata fails with
//! `NegativeBlockRegion`; the stream must end with the block index.
//!
//! # Writer
//! [`YxdbFile::to_bytes`] serializes the sections in order and trusts the
//! header; consistency of `meta_info_length`, `record_block_index_pos` and
//! `num_records` with the actual content is the caller's job.
//! [`YxdbFile::finalize`] recomputes the first two from the owned sections;
//! `num_records` stays caller-owned because record width depends on the
//! schema.

use std::io::{self, Write};

use crate::block::{read_blocks, write_blocks};
use crate::cursor::ByteReader;
use crate::error::YxdbError;
use crate::header::{FileHeader, HEADER_PAGE_SIZE};
use crate::index::BlockIndex;
use crate::meta::MetaInfo;

/// One decoded database file, exclusively owning all four sections.  The
/// payload is the decompressed concatenation of every block.
#[derive(Debug, Clone, PartialEq)]
pub struct YxdbFile {
    pub header: FileHeader,
    pub metadata: MetaInfo,
    pub payload: Vec<u8>,
    pub block_index: BlockIndex,
}

impl YxdbFile {
    /// A fresh, empty file around the given schema.  Call [`finalize`] after
    /// filling the payload.
    ///
    /// [`finalize`]: YxdbFile::finalize
    pub fn new(metadata: MetaInfo) -> Self {
        Self {
            header: FileHeader::new(),
            metadata,
            payload: Vec::new(),
            block_index: BlockIndex::default(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, YxdbError> {
        let mut r = ByteReader::new(bytes);
        let header = r.isolate(HEADER_PAGE_SIZE, "file header", FileHeader::read)?;

        let metadata_len = 2 * header.meta_info_length as usize;
        let metadata = r.isolate(metadata_len, "record metadata", MetaInfo::read)?;

        let blocks_start = r.offset();
        if header.record_block_index_pos < blocks_start {
            return Err(YxdbError::NegativeBlockRegion {
                index_pos: header.record_block_index_pos,
                blocks_start,
            });
        }
        let num_block_bytes = (header.record_block_index_pos - blocks_start) as usize;
        let payload = r.isolate(num_block_bytes, "record blocks", read_blocks)?;

        // The block index consumes the remainder; the stream ends with it.
        let block_index = BlockIndex::read(&mut r)?;

        Ok(Self { header, metadata, payload, block_index })
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        self.header.write(&mut writer)?;
        self.metadata.write(&mut writer)?;
        write_blocks(&self.payload, &mut writer)?;
        self.block_index.write(&mut writer)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, YxdbError> {
        let mut out = Vec::new();
        self.header.write(&mut out)?;
        out.extend_from_slice(&self.metadata.to_bytes()?);
        write_blocks(&self.payload, &mut out)?;
        self.block_index.write(&mut out)?;
        Ok(out)
    }

    /// Recompute `meta_info_length` and `record_block_index_pos` from the
    /// owned metadata and payload, so a subsequent [`to_bytes`] produces a
    /// self-consistent file.
    ///
    /// [`to_bytes`]: YxdbFile::to_bytes
    pub fn finalize(&mut self) -> Result<(), YxdbError> {
        let metadata = self.metadata.to_bytes()?;
        self.header.meta_info_length = (metadata.len() / 2) as u32;

        let mut blocks = Vec::new();
        write_blocks(&self.payload, &mut blocks)?;
        self.header.record_block_index_pos =
            (HEADER_PAGE_SIZE + metadata.len() + blocks.len()) as u64;
        Ok(())
    }
}
