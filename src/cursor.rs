//! Positioned reads over an in-memory byte slice.
//!
//! All binary I/O is strictly little-endian.  The writer side needs no
//! equivalent type: encoding goes through `byteorder::WriteBytesExt` on any
//! `io::Write` sink.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::YxdbError;

/// A reader over a borrowed byte slice that knows its absolute position in
/// the enclosing stream, so every error can name the exact offset at which
/// the input fell short.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: u64,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, base: 0 }
    }

    fn window(buf: &'a [u8], base: u64) -> Self {
        Self { buf, pos: 0, base }
    }

    /// Absolute offset of the next unread byte.
    pub fn offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Exactly `n` bytes, or `Truncated`.
    pub fn bytes(&mut self, n: usize, label: &'static str) -> Result<&'a [u8], YxdbError> {
        if self.remaining() < n {
            return Err(YxdbError::Truncated { offset: self.offset(), label });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn u8(&mut self, label: &'static str) -> Result<u8, YxdbError> {
        Ok(self.bytes(1, label)?[0])
    }

    pub fn u16_le(&mut self, label: &'static str) -> Result<u16, YxdbError> {
        Ok(LittleEndian::read_u16(self.bytes(2, label)?))
    }

    pub fn u32_le(&mut self, label: &'static str) -> Result<u32, YxdbError> {
        Ok(LittleEndian::read_u32(self.bytes(4, label)?))
    }

    pub fn u64_le(&mut self, label: &'static str) -> Result<u64, YxdbError> {
        Ok(LittleEndian::read_u64(self.bytes(8, label)?))
    }

    pub fn i64_le(&mut self, label: &'static str) -> Result<i64, YxdbError> {
        Ok(LittleEndian::read_i64(self.bytes(8, label)?))
    }

    /// Run `parser` against the next `n` bytes as a self-contained window.
    ///
    /// The window is fully materialized before the parser runs, so a parser
    /// that reads past the end has by definition overrun its budget; that
    /// `Truncated`, like a parser returning with bytes still unread, becomes
    /// `IsolationMismatch`.
    pub fn isolate<T, F>(&mut self, n: usize, label: &'static str, parser: F) -> Result<T, YxdbError>
    where
        F: FnOnce(&mut ByteReader<'a>) -> Result<T, YxdbError>,
    {
        let start = self.offset();
        let window = self.bytes(n, label)?;
        let mut sub = ByteReader::window(window, start);
        let value = parser(&mut sub).map_err(|err| match err {
            YxdbError::Truncated { offset, .. } => YxdbError::IsolationMismatch {
                offset,
                label,
                budget: n as u64,
            },
            other => other,
        })?;
        if !sub.is_empty() {
            return Err(YxdbError::IsolationMismatch {
                offset: sub.offset(),
                label,
                budget: n as u64,
            });
        }
        Ok(value)
    }
}
