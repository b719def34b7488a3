use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::Utc;

use crate::cursor::ByteReader;
use crate::error::YxdbError;

/// Size of the fixed header page at the start of every file.
pub const HEADER_PAGE_SIZE: usize = 512;
/// File id of a database carrying a spatial index.
pub const FILE_ID_SPATIAL: u32 = 0x0044_0205;
/// File id of a database without one.
pub const FILE_ID_STANDARD: u32 = 0x0044_0204;

pub const DESCRIPTION_SIZE: usize = 64;
/// Bytes left on the page after the declared fields; preserved verbatim.
pub const RESERVED_SIZE: usize = 396;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// Free-form label, not interpreted.
    pub description: [u8; DESCRIPTION_SIZE],
    pub file_id: u32,
    pub creation_date: u32,
    pub flags1: u32,
    pub flags2: u32,
    /// Length of the metadata section in UTF-16 code units (bytes / 2).
    pub meta_info_length: u32,
    pub mystery: u32,
    /// Absolute byte offset of the spatial index, or 0.  The body at that
    /// offset is opaque to this codec.
    pub spatial_index_pos: u64,
    /// Absolute byte offset of the block index section.
    pub record_block_index_pos: u64,
    /// Total record count across all blocks.
    pub num_records: u64,
    pub compression_version: u32,
    pub reserved: [u8; RESERVED_SIZE],
}

impl FileHeader {
    pub fn new() -> Self {
        Self {
            description: [0; DESCRIPTION_SIZE],
            file_id: FILE_ID_STANDARD,
            creation_date: Utc::now().timestamp() as u32,
            flags1: 0,
            flags2: 0,
            meta_info_length: 0,
            mystery: 0,
            spatial_index_pos: 0,
            record_block_index_pos: 0,
            num_records: 0,
            compression_version: 0,
            reserved: [0; RESERVED_SIZE],
        }
    }

    pub fn has_spatial_index(&self) -> bool {
        self.file_id == FILE_ID_SPATIAL
    }

    /// Byte offset at which block data starts: the header page plus the
    /// UTF-16LE metadata section.
    pub fn start_of_blocks(&self) -> u64 {
        HEADER_PAGE_SIZE as u64 + 2 * self.meta_info_length as u64
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, YxdbError> {
        let mut description = [0u8; DESCRIPTION_SIZE];
        description.copy_from_slice(r.bytes(DESCRIPTION_SIZE, "header description")?);
        let file_id = r.u32_le("header file id")?;
        let creation_date = r.u32_le("header creation date")?;
        let flags1 = r.u32_le("header flags1")?;
        let flags2 = r.u32_le("header flags2")?;
        let meta_info_length = r.u32_le("header meta info length")?;
        let mystery = r.u32_le("header mystery")?;
        let spatial_index_pos = r.u64_le("header spatial index position")?;
        let record_block_index_pos = r.u64_le("header record block index position")?;
        let num_records = r.u64_le("header record count")?;
        let compression_version = r.u32_le("header compression version")?;
        let mut reserved = [0u8; RESERVED_SIZE];
        reserved.copy_from_slice(r.bytes(RESERVED_SIZE, "header reserved space")?);
        Ok(Self {
            description,
            file_id,
            creation_date,
            flags1,
            flags2,
            meta_info_length,
            mystery,
            spatial_index_pos,
            record_block_index_pos,
            num_records,
            compression_version,
            reserved,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, YxdbError> {
        let mut r = ByteReader::new(bytes);
        r.isolate(HEADER_PAGE_SIZE, "file header", Self::read)
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.description)?;
        writer.write_u32::<LittleEndian>(self.file_id)?;
        writer.write_u32::<LittleEndian>(self.creation_date)?;
        writer.write_u32::<LittleEndian>(self.flags1)?;
        writer.write_u32::<LittleEndian>(self.flags2)?;
        writer.write_u32::<LittleEndian>(self.meta_info_length)?;
        writer.write_u32::<LittleEndian>(self.mystery)?;
        writer.write_u64::<LittleEndian>(self.spatial_index_pos)?;
        writer.write_u64::<LittleEndian>(self.record_block_index_pos)?;
        writer.write_u64::<LittleEndian>(self.num_records)?;
        writer.write_u32::<LittleEndian>(self.compression_version)?;
        writer.write_all(&self.reserved)?;
        Ok(())
    }
}

impl Default for FileHeader {
    fn default() -> Self {
        Self::new()
    }
}
