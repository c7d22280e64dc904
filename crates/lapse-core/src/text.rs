//! Mixed ASCII / Chinese text layout on a pixel sink.

use log::debug;

use crate::{
    ascii,
    canvas::PixelSink,
    font::{FontError, GlyphBitmap, GlyphSource},
    gb2312::{
        Gb2312Code, decode_utf8_char, looks_like_gb2312, unicode_to_gb2312,
        utf8_or_gb2312_to_gb2312,
    },
    raster::{FontScale, draw_bitmap},
};

/// Drawn when no Chinese font is loaded.
const PLACEHOLDER_NO_FONT: &[u8; 2] = b"??";
/// Drawn when a character has no GB2312 mapping.
const PLACEHOLDER_UNMAPPED: &[u8; 2] = b"**";
/// Drawn when the glyph record could not be read.
const PLACEHOLDER_READ_FAILED: &[u8; 2] = b"##";

/// Chinese pixel size assumed by callers that do not pass one.
pub const DEFAULT_CHINESE_SIZE: u8 = 16;

enum Unit {
    Ascii(u8),
    Glyph(GlyphBitmap),
    Placeholder(&'static [u8; 2]),
}

/// Owns the glyph source and scale used by every text draw call.
pub struct FontRenderContext<G> {
    glyphs: G,
    scale: FontScale,
}

impl<G> FontRenderContext<G>
where
    G: GlyphSource,
{
    pub fn new(glyphs: G) -> Self {
        Self::with_scale(glyphs, FontScale::DEFAULT)
    }

    pub fn with_scale(glyphs: G, scale: FontScale) -> Self {
        Self { glyphs, scale }
    }

    pub fn glyphs(&self) -> &G {
        &self.glyphs
    }

    pub fn glyphs_mut(&mut self) -> &mut G {
        &mut self.glyphs
    }

    pub fn into_inner(self) -> G {
        self.glyphs
    }

    /// Sets the Chinese glyph scale, clamped to `[0.5, 1.0]`.
    pub fn set_font_scale(&mut self, scale: f32) {
        self.scale = FontScale::new(scale);
    }

    pub fn font_scale(&self) -> f32 {
        self.scale.get()
    }

    pub fn scale(&self) -> FontScale {
        self.scale
    }

    pub fn is_chinese_available(&self) -> bool {
        self.glyphs.descriptor().is_some()
    }

    /// Rendered `(width, height)` of one Chinese cell.
    ///
    /// Uses the loaded font's cell, else a square of `size_hint` pixels.
    pub fn chinese_cell(&self, size_hint: u8) -> (i32, i32) {
        let (w, h) = match self.glyphs.descriptor() {
            Some(d) => (d.glyph_width, d.glyph_height),
            None => (size_hint, size_hint),
        };
        (
            self.scale.scaled_extent(w) as i32,
            self.scale.scaled_extent(h) as i32,
        )
    }

    fn resolve(bytes: &[u8], gb_mode: bool) -> (Result<Gb2312Code, FontError>, usize) {
        let (code, consumed) = if gb_mode {
            utf8_or_gb2312_to_gb2312(bytes)
        } else {
            let (codepoint, consumed) = decode_utf8_char(bytes);
            (codepoint.and_then(unicode_to_gb2312), consumed)
        };
        (code.ok_or(FontError::DecodeFailure), consumed.max(1))
    }

    fn next_unit(&mut self, bytes: &[u8], gb_mode: bool) -> (Unit, usize) {
        let lead = bytes[0];
        if lead < 0x80 {
            return (Unit::Ascii(lead), 1);
        }

        let (code, consumed) = Self::resolve(bytes, gb_mode);
        if !self.is_chinese_available() {
            return (Unit::Placeholder(PLACEHOLDER_NO_FONT), consumed);
        }

        let unit = match code.and_then(|code| self.glyphs.load_glyph(code)) {
            Ok(glyph) => Unit::Glyph(glyph),
            Err(FontError::DecodeFailure) => Unit::Placeholder(PLACEHOLDER_UNMAPPED),
            Err(err) => {
                debug!("text: glyph unavailable ({err:?})");
                Unit::Placeholder(PLACEHOLDER_READ_FAILED)
            }
        };
        (unit, consumed)
    }

    fn unit_width(&self, unit: &Unit) -> i32 {
        match unit {
            Unit::Ascii(_) => ascii::CELL,
            Unit::Glyph(glyph) => self.scale.scaled_extent(glyph.width()) as i32,
            Unit::Placeholder(marks) => ascii::CELL * marks.len() as i32,
        }
    }

    fn draw_unit<S: PixelSink + ?Sized>(&self, sink: &mut S, x: i32, y: i32, unit: &Unit, on: bool) {
        match unit {
            Unit::Ascii(c) => {
                ascii::draw_char(sink, x, y, *c, 1, on);
            }
            Unit::Glyph(glyph) => {
                draw_bitmap(sink, x, y, glyph, self.scale, on);
            }
            Unit::Placeholder(marks) => {
                ascii::draw_string(sink, x, y, &marks[..], 1, on);
            }
        }
    }

    /// Lays out `text` starting at `(x, y)`, wrapping at the sink edge.
    ///
    /// ASCII bytes use the 8x8 font; other units are read as raw GB2312 or
    /// UTF-8 (sniffed once per call) and drawn from the glyph source. Lines
    /// that would cross the bottom edge are not drawn. Returns the cursor
    /// advance on the last line.
    pub fn draw_mixed_string<S: PixelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        x: i32,
        y: i32,
        text: &[u8],
        size_hint: u8,
        on: bool,
    ) -> i32 {
        let (_, line_height) = self.chinese_cell(size_hint);
        let gb_mode = looks_like_gb2312(text);
        let width = sink.width();
        let height = sink.height();

        let (mut cx, mut cy) = (x, y);
        let mut i = 0;

        while i < text.len() {
            if text[i] == b'\n' {
                cx = x;
                cy += line_height;
                i += 1;
                continue;
            }

            let (unit, consumed) = self.next_unit(&text[i..], gb_mode);
            i += consumed;
            let unit_width = self.unit_width(&unit);

            let (mut ux, mut uy) = (cx, cy);
            if ux + unit_width > width && ux != x && ux != 0 {
                ux = if x + unit_width <= width { x } else { 0 };
                uy += line_height;
            }
            if uy + line_height > height {
                break;
            }

            self.draw_unit(sink, ux, uy, &unit, on);
            cx = ux + unit_width;
            cy = uy;
        }

        cx - x
    }

    /// Draws only the Chinese units of `text`; other bytes are skipped.
    ///
    /// Returns 0 without drawing when no font is loaded.
    pub fn draw_chinese_string<S: PixelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        x: i32,
        y: i32,
        text: &[u8],
        on: bool,
    ) -> i32 {
        if !self.is_chinese_available() {
            return 0;
        }

        let (cell_w, cell_h) = self.chinese_cell(DEFAULT_CHINESE_SIZE);
        let gb_mode = looks_like_gb2312(text);
        let (mut cx, mut cy) = (x, y);
        let mut i = 0;

        while i < text.len() {
            if text[i] < 0x80 {
                i += 1;
                continue;
            }

            let (code, consumed) = Self::resolve(&text[i..], gb_mode);
            i += consumed;
            let Ok(glyph) = code.and_then(|code| self.glyphs.load_glyph(code)) else {
                continue;
            };

            if cx + cell_w > sink.width() && cx != x && cx != 0 {
                cx = if x + cell_w <= sink.width() { x } else { 0 };
                cy += cell_h;
            }
            if cy + cell_h > sink.height() {
                break;
            }

            draw_bitmap(sink, cx, cy, &glyph, self.scale, on);
            cx += cell_w;
        }

        cx - x
    }

    /// Draws one GB2312 pair. Returns its width, or 0 if nothing was drawn.
    pub fn draw_chinese_char<S: PixelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        x: i32,
        y: i32,
        hi: u8,
        lo: u8,
        on: bool,
    ) -> i32 {
        let Some(code) = Gb2312Code::new(hi, lo) else {
            return 0;
        };

        match self.glyphs.load_glyph(code) {
            Ok(glyph) => draw_bitmap(sink, x, y, &glyph, self.scale, on).0 as i32,
            Err(err) => {
                debug!("text: {hi:02X}{lo:02X} not drawn ({err:?})");
                0
            }
        }
    }

    /// ASCII passthrough with integer magnification.
    pub fn draw_char<S: PixelSink + ?Sized>(
        &self,
        sink: &mut S,
        x: i32,
        y: i32,
        c: u8,
        size: u8,
        on: bool,
    ) -> i32 {
        ascii::draw_char(sink, x, y, c, size, on)
    }

    pub fn draw_string<S: PixelSink + ?Sized>(
        &self,
        sink: &mut S,
        x: i32,
        y: i32,
        text: &[u8],
        size: u8,
        on: bool,
    ) -> i32 {
        ascii::draw_string(sink, x, y, text, size, on)
    }
}
