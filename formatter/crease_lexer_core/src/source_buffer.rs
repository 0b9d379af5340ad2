//! Sentinel-terminated source buffer for zero-bounds-check scanning.
//!
//! The buffer guarantees a `0x00` sentinel byte after the source content,
//! allowing the scanner to detect EOF without explicit bounds checking.
//! The total buffer size is rounded up to the next 64-byte boundary, which
//! also provides safe padding for `peek()` near the end of the buffer.
//!
//! Beyond cursor creation, the buffer answers the position queries the
//! formatter needs: character data by span and 1-based spelling columns.

use crate::Cursor;

/// Cache line size in bytes, used for buffer alignment padding.
const CACHE_LINE: usize = 64;

/// Sentinel-terminated source buffer.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     rounded up to 64-byte boundary
///              source_len (sentinel)
/// ```
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// Owned buffer: `[source_bytes..., 0x00 sentinel, 0x00 padding...]`.
    buf: Vec<u8>,
    /// Length of the actual source content (excludes sentinel and padding).
    source_len: u32,
}

impl SourceBuffer {
    /// Create a new sentinel-terminated buffer from source code.
    ///
    /// Source files larger than `u32::MAX` bytes saturate `source_len`;
    /// positions are `u32` to keep tokens compact.
    pub fn new(source: &str) -> Self {
        let source_bytes = source.as_bytes();
        let source_len = source_bytes.len();

        // Round up to next 64-byte boundary (minimum: source + 1 sentinel byte).
        let padded_len = (source_len + 1 + CACHE_LINE - 1) & !(CACHE_LINE - 1);

        let mut buf = vec![0u8; padded_len];
        buf[..source_len].copy_from_slice(source_bytes);

        Self {
            buf,
            source_len: u32::try_from(source_len).unwrap_or(u32::MAX),
        }
    }

    /// Returns the source bytes (without sentinel or padding).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.source_len as usize]
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Length of the source content in bytes.
    pub fn len(&self) -> u32 {
        self.source_len
    }

    /// Returns `true` if the source content is empty.
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }

    /// Source text in `[start, end)`, clamped to the buffer.
    ///
    /// The formatter uses this for character-data queries (e.g. deciding
    /// whether a comment token starts with `//`).
    pub fn text(&self, start: u32, end: u32) -> &[u8] {
        let start = (start.min(self.source_len)) as usize;
        let end = (end.min(self.source_len)) as usize;
        &self.buf[start..end.max(start)]
    }

    /// 1-based spelling column of the given byte offset.
    ///
    /// Column 1 is the first byte after the preceding `\n` (or the start of
    /// the file). Columns count bytes, matching the layout engine's column
    /// arithmetic.
    pub fn column_at(&self, offset: u32) -> u32 {
        let offset = offset.min(self.source_len) as usize;
        let line_start = memchr::memrchr(b'\n', &self.buf[..offset])
            .map(|p| p + 1)
            .unwrap_or(0);
        (offset - line_start) as u32 + 1
    }
}
