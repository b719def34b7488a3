//! Block index: the trailing array of block offsets.

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::cursor::ByteReader;
use crate::error::YxdbError;

/// On disk: `u32 LE` count followed by `count` offsets as `u64 LE`,
/// reinterpreted as signed.  The index is the final section of a file; its
/// body must fill the remaining input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockIndex {
    pub offsets: Vec<i64>,
}

impl BlockIndex {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, YxdbError> {
        let count = r.u32_le("block index count")? as usize;
        if r.remaining() as u64 != count as u64 * 8 {
            return Err(YxdbError::IsolationMismatch {
                offset: r.offset(),
                label: "block index entries",
                budget: count as u64 * 8,
            });
        }
        let mut offsets = Vec::with_capacity(count);
        for index in 0..count {
            let value = r.u64_le("block index entry")?;
            if value > i64::MAX as u64 {
                return Err(YxdbError::OffsetOverflow { index, value });
            }
            offsets.push(value as i64);
        }
        Ok(Self { offsets })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, YxdbError> {
        Self::read(&mut ByteReader::new(bytes))
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.offsets.len() as u32)?;
        for &offset in &self.offsets {
            writer.write_u64::<LittleEndian>(offset as u64)?;
        }
        Ok(())
    }
}
