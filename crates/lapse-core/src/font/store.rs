use heapless::String;
use log::{debug, info, warn};

use super::{
    ByteStore, FontDescriptor, FontError, FontInfo, GlyphBitmap, GlyphSource, MAX_GLYPH_BYTES,
    detect::{detect_format, geometry_for_size},
};
use crate::gb2312::Gb2312Code;

/// Longest font path kept by the store.
pub const PATH_CAPACITY: usize = 64;

/// Lifecycle of the single font slot.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FontState {
    Unloaded,
    Available(FontDescriptor),
    /// Last `load` failed; stays here until the next `load`.
    Unavailable(FontError),
}

/// Uncached GB2312 font reader. Each glyph costs exactly one store read.
#[derive(Debug)]
pub struct FontStore<S> {
    store: S,
    path: String<PATH_CAPACITY>,
    state: FontState,
    index_offset: i32,
    revision: u32,
}

impl<S> FontStore<S>
where
    S: ByteStore,
{
    pub const fn new(store: S) -> Self {
        Self {
            store,
            path: String::new(),
            state: FontState::Unloaded,
            index_offset: 0,
            revision: 0,
        }
    }

    pub fn state(&self) -> FontState {
        self.state
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, FontState::Available(_))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn release(self) -> S {
        self.store
    }

    /// Opens `path`, detects its layout, and makes it the active font.
    ///
    /// On failure the store is left `Unavailable`; callers keep drawing ASCII.
    pub fn load(&mut self, path: &str) -> Result<FontDescriptor, FontError> {
        let result = self.try_load(path);
        self.bump_revision();
        self.state = match result {
            Ok(descriptor) => FontState::Available(descriptor),
            Err(err) => {
                self.path.clear();
                FontState::Unavailable(err)
            }
        };
        result
    }

    fn try_load(&mut self, path: &str) -> Result<FontDescriptor, FontError> {
        self.path.clear();

        if !self.store.exists(path) {
            warn!("font: {path} not found");
            return Err(FontError::NotFound);
        }
        if self.path.push_str(path).is_err() {
            warn!("font: path too long ({} bytes)", path.len());
            return Err(FontError::NotFound);
        }

        let file_size = self.store.file_size(path).map_err(|err| {
            warn!("font: cannot stat {path}: {err:?}");
            FontError::Io
        })?;

        let Some(format) = detect_format(file_size) else {
            warn!("font: unrecognized layout for {path} ({file_size} bytes)");
            return Err(FontError::FormatUnrecognized);
        };

        let descriptor = FontDescriptor {
            pixel_size: format.pixel_size,
            glyph_width: format.glyph_width,
            glyph_height: format.glyph_height,
            bytes_per_glyph: format.bytes_per_glyph,
            header_offset: format.header_offset,
            index_adjust: format.index_adjust,
            file_size,
        };

        info!(
            "font: loaded {} ({}px, {} B/glyph, header={} size={})",
            path,
            descriptor.pixel_size,
            descriptor.bytes_per_glyph,
            descriptor.header_offset,
            file_size
        );

        Ok(descriptor)
    }

    /// Drops the active font.
    pub fn unload(&mut self) {
        self.path.clear();
        self.state = FontState::Unloaded;
        self.bump_revision();
    }

    /// Sets the runtime shift added to every glyph index; survives reloads.
    pub fn set_index_offset(&mut self, delta: i32) {
        if delta != self.index_offset {
            debug!("font: index offset {} -> {}", self.index_offset, delta);
            self.index_offset = delta;
            self.bump_revision();
        }
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn index_offset(&self) -> i32 {
        self.index_offset
    }

    pub fn descriptor(&self) -> Option<FontDescriptor> {
        match self.state {
            FontState::Available(descriptor) => Some(descriptor),
            _ => None,
        }
    }

    pub fn info(&self) -> Option<FontInfo> {
        self.descriptor().map(|d| FontInfo {
            pixel_size: d.pixel_size,
            file_size: d.file_size,
        })
    }

    /// Cell size for `pixel_size`, or the loaded font's cell for unknown sizes.
    pub fn glyph_geometry(&self, pixel_size: u8) -> (u8, u8) {
        geometry_for_size(pixel_size)
            .or_else(|| self.descriptor().map(|d| (d.glyph_width, d.glyph_height)))
            .unwrap_or((0, 0))
    }

    /// Byte offset of `code` in the font file, before bounds checks.
    pub fn glyph_offset(&self, descriptor: &FontDescriptor, code: Gb2312Code) -> u64 {
        let index = (code.index() as i32)
            .saturating_add(descriptor.index_adjust)
            .saturating_add(self.index_offset)
            .max(0) as u64;
        descriptor.header_offset as u64 + index * descriptor.bytes_per_glyph as u64
    }

    /// Validates a raw byte pair and loads its glyph.
    pub fn load_pair(&mut self, hi: u8, lo: u8) -> Result<GlyphBitmap, FontError> {
        let code = Gb2312Code::new(hi, lo).ok_or(FontError::InvalidCode)?;
        self.load_glyph(code)
    }

    /// Reads one glyph record.
    pub fn load_glyph(&mut self, code: Gb2312Code) -> Result<GlyphBitmap, FontError> {
        let descriptor = self.descriptor().ok_or(FontError::NotFound)?;
        let len = descriptor.bytes_per_glyph as usize;
        if len > MAX_GLYPH_BYTES {
            return Err(FontError::FormatUnrecognized);
        }

        let offset = self.glyph_offset(&descriptor, code);
        if offset + len as u64 > descriptor.file_size {
            debug!(
                "font: glyph {:02X}{:02X} past end (offset={offset})",
                code.hi(),
                code.lo()
            );
            return Err(FontError::NotFound);
        }

        let mut buf = [0u8; MAX_GLYPH_BYTES];
        let read = self
            .store
            .read_at(&self.path, offset, &mut buf[..len])
            .map_err(|err| {
                warn!("font: read failed at {offset}: {err:?}");
                FontError::Io
            })?;
        if read < len {
            warn!("font: short read at {offset} ({read}/{len})");
            return Err(FontError::Io);
        }

        GlyphBitmap::new(descriptor.glyph_width, descriptor.glyph_height, &buf[..len])
            .ok_or(FontError::FormatUnrecognized)
    }
}

impl<S> GlyphSource for FontStore<S>
where
    S: ByteStore,
{
    fn descriptor(&self) -> Option<FontDescriptor> {
        FontStore::descriptor(self)
    }

    fn load_glyph(&mut self, code: Gb2312Code) -> Result<GlyphBitmap, FontError> {
        FontStore::load_glyph(self, code)
    }

    fn revision(&self) -> u32 {
        self.revision
    }
}
