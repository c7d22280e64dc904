//! In-memory stand-ins for the font seams.

use std::{collections::BTreeMap, string::String, vec::Vec};

use super::{ByteStore, FontDescriptor, FontError, GlyphBitmap, GlyphSource};
use crate::gb2312::Gb2312Code;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MemStoreError;

/// Files held in memory; records every read as `(path, offset, len)`.
#[derive(Default)]
pub struct MemByteStore {
    files: BTreeMap<String, Vec<u8>>,
    pub reads: Vec<(String, u64, usize)>,
    pub fail_reads: bool,
    /// Caps every read at this many bytes.
    pub short_reads: Option<usize>,
}

impl MemByteStore {
    pub fn with_file(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(path.into(), bytes);
        self
    }

    /// A file of `size` bytes where byte `i` is `i % 251`.
    pub fn with_patterned_file(self, path: &str, size: usize) -> Self {
        let bytes = (0..size).map(|i| (i % 251) as u8).collect();
        self.with_file(path, bytes)
    }
}

impl ByteStore for MemByteStore {
    type Error = MemStoreError;

    fn exists(&mut self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn file_size(&mut self, path: &str) -> Result<u64, Self::Error> {
        self.files
            .get(path)
            .map(|f| f.len() as u64)
            .ok_or(MemStoreError)
    }

    fn read_at(&mut self, path: &str, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.reads.push((path.into(), offset, buf.len()));
        if self.fail_reads {
            return Err(MemStoreError);
        }

        let file = self.files.get(path).ok_or(MemStoreError)?;
        let start = (offset as usize).min(file.len());
        let mut n = buf.len().min(file.len() - start);
        if let Some(cap) = self.short_reads {
            n = n.min(cap);
        }
        buf[..n].copy_from_slice(&file[start..start + n]);
        Ok(n)
    }
}

/// Glyph source returning a solid glyph and counting loads.
pub struct CountingSource {
    pub descriptor: Option<FontDescriptor>,
    pub loads: usize,
    pub fail: Option<FontError>,
}

impl CountingSource {
    pub fn solid(pixel_size: u8) -> Self {
        Self {
            descriptor: Some(FontDescriptor {
                pixel_size,
                glyph_width: pixel_size,
                glyph_height: pixel_size,
                bytes_per_glyph: (pixel_size as u16).div_ceil(8) * pixel_size as u16,
                header_offset: 0,
                index_adjust: 0,
                file_size: 0,
            }),
            loads: 0,
            fail: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            descriptor: None,
            loads: 0,
            fail: None,
        }
    }
}

impl GlyphSource for CountingSource {
    fn descriptor(&self) -> Option<FontDescriptor> {
        self.descriptor
    }

    fn load_glyph(&mut self, _code: Gb2312Code) -> Result<GlyphBitmap, FontError> {
        self.loads += 1;
        if let Some(err) = self.fail {
            return Err(err);
        }
        let d = self.descriptor.ok_or(FontError::NotFound)?;
        let bytes = vec![0xFFu8; d.bytes_per_glyph as usize];
        GlyphBitmap::new(d.glyph_width, d.glyph_height, &bytes).ok_or(FontError::Io)
    }
}
