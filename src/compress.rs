//! Bounded LZF compression, the only codec the on-disk format speaks.

pub use lzf::LzfError;

/// Compress `input`, keeping the result only if it fits in `max_out` bytes.
///
/// Block writers pass `max_out = input.len() - 1`, so a compressed payload is
/// chosen only when strictly smaller than the original.  Empty and
/// incompressible inputs return `None` and are stored verbatim.
pub fn compress_bounded(input: &[u8], max_out: usize) -> Option<Vec<u8>> {
    if input.is_empty() {
        return None;
    }
    match lzf::compress(input) {
        Ok(packed) if packed.len() <= max_out => Some(packed),
        _ => None,
    }
}

/// Decompress `input` into a buffer of at most `buf_size` bytes.
///
/// `LzfError::BufferTooSmall` means the payload expands past `buf_size`;
/// anything else means the stream itself is corrupt.
pub fn decompress_bounded(input: &[u8], buf_size: usize) -> Result<Vec<u8>, LzfError> {
    lzf::decompress(input, buf_size)
}
