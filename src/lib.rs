pub mod block;
pub mod compress;
pub mod cursor;
pub mod error;
pub mod field;
pub mod file;
pub mod header;
pub mod index;
pub mod meta;
pub mod value;

pub use block::{decode_blocks, encode_blocks, DECOMPRESSION_BUFFER_SIZE, RECORDS_PER_BLOCK};
pub use cursor::ByteReader;
pub use error::YxdbError;
pub use field::FieldType;
pub use file::YxdbFile;
pub use header::{FileHeader, FILE_ID_SPATIAL, FILE_ID_STANDARD, HEADER_PAGE_SIZE};
pub use index::BlockIndex;
pub use meta::{Field, MetaInfo, RecordInfo};
pub use value::{get_value_codec, FieldValue, ValueCodec};
