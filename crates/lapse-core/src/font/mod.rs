//! GB2312 bitmap fonts read glyph-by-glyph from a byte store.

mod cache;
mod detect;
mod store;

#[cfg(test)]
pub(crate) mod mock;

pub use cache::CachedGlyphSource;
pub use detect::{FontFormat, KNOWN_FORMATS, detect_format, geometry_for_size};
pub use store::{FontState, FontStore, PATH_CAPACITY};

use crate::gb2312::Gb2312Code;

/// Largest glyph record supported (32x32 at 1bpp).
pub const MAX_GLYPH_BYTES: usize = 128;

/// Random-access byte source backing font files.
pub trait ByteStore {
    type Error: core::fmt::Debug;

    fn exists(&mut self, path: &str) -> bool;
    fn file_size(&mut self, path: &str) -> Result<u64, Self::Error>;
    /// Reads up to `buf.len()` bytes at `offset`; short reads are allowed.
    fn read_at(&mut self, path: &str, offset: u64, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Font loading and glyph lookup failures.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FontError {
    /// File missing, font not loaded, or glyph offset past the end of file.
    NotFound,
    /// Byte store failure or short read.
    Io,
    /// File size matches no known layout.
    FormatUnrecognized,
    /// Byte pair outside the GB2312 grid.
    InvalidCode,
    /// Text unit could not be mapped to a GB2312 code.
    DecodeFailure,
}

/// Geometry of the loaded font, fixed between `load` and `unload`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FontDescriptor {
    pub pixel_size: u8,
    pub glyph_width: u8,
    pub glyph_height: u8,
    pub bytes_per_glyph: u16,
    pub header_offset: u32,
    pub index_adjust: i32,
    pub file_size: u64,
}

impl FontDescriptor {
    pub const fn bytes_per_row(&self) -> usize {
        (self.glyph_width as usize).div_ceil(8)
    }
}

/// Summary reported to status screens.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FontInfo {
    pub pixel_size: u8,
    pub file_size: u64,
}

/// One glyph record: row-major, MSB-first, rows padded to whole bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlyphBitmap {
    data: [u8; MAX_GLYPH_BYTES],
    len: usize,
    width: u8,
    height: u8,
}

impl GlyphBitmap {
    /// Wraps a record; `None` if `bytes` does not match the geometry.
    pub fn new(width: u8, height: u8, bytes: &[u8]) -> Option<Self> {
        let expected = (width as usize).div_ceil(8) * height as usize;
        if bytes.len() != expected || expected > MAX_GLYPH_BYTES {
            return None;
        }

        let mut data = [0u8; MAX_GLYPH_BYTES];
        data[..expected].copy_from_slice(bytes);
        Some(Self {
            data,
            len: expected,
            width,
            height,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub const fn width(&self) -> u8 {
        self.width
    }

    pub const fn height(&self) -> u8 {
        self.height
    }
}

/// Anything that can hand out glyph bitmaps for GB2312 codes.
pub trait GlyphSource {
    /// Geometry of the active font, `None` while no font is available.
    fn descriptor(&self) -> Option<FontDescriptor>;
    fn load_glyph(&mut self, code: Gb2312Code) -> Result<GlyphBitmap, FontError>;

    /// Bumped whenever the code-to-bitmap mapping changes without a new
    /// descriptor (for example a runtime index shift).
    fn revision(&self) -> u32 {
        0
    }
}

impl<G: GlyphSource + ?Sized> GlyphSource for &mut G {
    fn descriptor(&self) -> Option<FontDescriptor> {
        (**self).descriptor()
    }

    fn load_glyph(&mut self, code: Gb2312Code) -> Result<GlyphBitmap, FontError> {
        (**self).load_glyph(code)
    }

    fn revision(&self) -> u32 {
        (**self).revision()
    }
}

/// An absent source (no storage mounted) never has a font.
impl<G: GlyphSource> GlyphSource for Option<G> {
    fn descriptor(&self) -> Option<FontDescriptor> {
        self.as_ref().and_then(G::descriptor)
    }

    fn load_glyph(&mut self, code: Gb2312Code) -> Result<GlyphBitmap, FontError> {
        match self {
            Some(inner) => inner.load_glyph(code),
            None => Err(FontError::NotFound),
        }
    }

    fn revision(&self) -> u32 {
        self.as_ref().map_or(0, G::revision)
    }
}

#[cfg(test)]
mod tests;
