//! Record block codec.
//!
//! On disk a block is one length-prefixed, optionally compressed chunk:
//!
//! ```text
//! writtenSize: u32 LE   bit 31 set ⇒ payload stored verbatim
//!                       bit 31 clear ⇒ payload is LZF-compressed
//! payload:     writtenSize & 0x7FFFFFFF bytes
//! ```
//!
//! The writer compresses a chunk only when the result is strictly smaller
//! than the input; otherwise the chunk is stored verbatim with the high bit
//! set.  Readers concatenate decoded payloads without separators; the block
//! framing is a property of the on-disk form, not of the in-memory value.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::compress::{compress_bounded, decompress_bounded, LzfError};
use crate::cursor::ByteReader;
use crate::error::YxdbError;

/// Fixed output bound for decompressing one block: 256 KiB.
pub const DECOMPRESSION_BUFFER_SIZE: usize = 0x40000;
/// Writer hint for how many records to aim at per block.
pub const RECORDS_PER_BLOCK: usize = 65536;
/// Record count per spatial-index block; informational only.
pub const SPATIAL_INDEX_RECORD_BLOCK_SIZE: usize = 32;
/// Largest chunk the writer will put in one block.  Bounded by the reader's
/// decompression buffer so every written block is readable.
pub const MAX_BLOCK_PAYLOAD: usize = DECOMPRESSION_BUFFER_SIZE;

const UNCOMPRESSED_FLAG: u32 = 0x8000_0000;
const LENGTH_MASK: u32 = 0x7FFF_FFFF;

fn read_block(r: &mut ByteReader<'_>, out: &mut Vec<u8>) -> Result<(), YxdbError> {
    let block_start = r.offset();
    let written_size = r.u32_le("block length prefix")?;
    let payload_len = (written_size & LENGTH_MASK) as usize;
    let payload = r.bytes(payload_len, "block payload")?;
    if written_size & UNCOMPRESSED_FLAG != 0 {
        out.extend_from_slice(payload);
        return Ok(());
    }
    if payload.is_empty() {
        // Writers represent an empty chunk as a zero-length verbatim block;
        // a zero-length compressed payload has nothing for LZF to decode.
        return Err(YxdbError::LzfCorrupt { offset: block_start });
    }
    let raw = decompress_bounded(payload, DECOMPRESSION_BUFFER_SIZE).map_err(|err| match err {
        LzfError::BufferTooSmall => YxdbError::BufferTooSmall {
            offset: block_start,
            limit: DECOMPRESSION_BUFFER_SIZE,
        },
        _ => YxdbError::LzfCorrupt { offset: block_start },
    })?;
    out.extend_from_slice(&raw);
    Ok(())
}

/// Decode blocks until the reader is exhausted, concatenating payloads.
pub fn read_blocks(r: &mut ByteReader<'_>) -> Result<Vec<u8>, YxdbError> {
    let mut out = Vec::new();
    while !r.is_empty() {
        read_block(r, &mut out)?;
    }
    Ok(out)
}

pub fn decode_blocks(bytes: &[u8]) -> Result<Vec<u8>, YxdbError> {
    read_blocks(&mut ByteReader::new(bytes))
}

fn write_block<W: Write>(chunk: &[u8], writer: &mut W) -> io::Result<()> {
    match compress_bounded(chunk, chunk.len().saturating_sub(1)) {
        Some(packed) => {
            writer.write_u32::<LittleEndian>(packed.len() as u32)?;
            writer.write_all(&packed)
        }
        None => {
            writer.write_u32::<LittleEndian>(chunk.len() as u32 | UNCOMPRESSED_FLAG)?;
            writer.write_all(chunk)
        }
    }
}

/// Split `payload` into blocks and write them out.
///
/// An empty payload still yields one zero-length block, so the block region
/// of a file is never empty.
pub fn write_blocks<W: Write>(payload: &[u8], mut writer: W) -> io::Result<()> {
    if payload.is_empty() {
        return write_block(payload, &mut writer);
    }
    for chunk in payload.chunks(MAX_BLOCK_PAYLOAD) {
        write_block(chunk, &mut writer)?;
    }
    Ok(())
}

pub fn encode_blocks(payload: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    write_blocks(payload, &mut out)?;
    Ok(out)
}
