use std::io;
use thiserror::Error;

use crate::field::FieldType;

/// Every decode failure carries the absolute byte offset at which it was
/// detected plus a label naming the field or region being read.
#[derive(Error, Debug)]
pub enum YxdbError {
    #[error("truncated input reading {label} at byte {offset}")]
    Truncated { offset: u64, label: &'static str },

    #[error("{label} sub-parser did not consume exactly its {budget}-byte window at byte {offset}")]
    IsolationMismatch {
        offset: u64,
        label: &'static str,
        budget: u64,
    },

    #[error("record block index position {index_pos} precedes the start of blocks at byte {blocks_start}")]
    NegativeBlockRegion { index_pos: u64, blocks_start: u64 },

    #[error("block at byte {offset} expands beyond the {limit}-byte decompression buffer")]
    BufferTooSmall { offset: u64, limit: usize },

    #[error("compressed block at byte {offset} holds a corrupt LZF stream")]
    LzfCorrupt { offset: u64 },

    #[error("metadata window at byte {offset} is missing its newline and NUL trailer")]
    MetadataTruncated { offset: u64 },

    #[error("metadata XML is malformed: {0}")]
    XmlMalformed(String),

    #[error("field attribute {attr}={value:?} is not a base-10 integer")]
    BadFieldAttribute {
        attr: &'static str,
        value: String,
    },

    #[error("block index entry {index} ({value:#018x}) overflows a signed 64-bit offset")]
    OffsetOverflow { index: usize, value: u64 },

    #[error("no value codec for field type {0}")]
    Unimplemented(FieldType),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
