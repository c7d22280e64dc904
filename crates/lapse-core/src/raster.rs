//! Scaled blitting of MSB-first glyph bitmaps.

use crate::{canvas::PixelSink, font::GlyphBitmap};

/// Smallest rendered glyph edge, whatever the scale.
pub const MIN_SCALED_EXTENT: u16 = 8;

/// Downscale factor applied to Chinese glyphs, kept in `[0.5, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontScale(f32);

impl FontScale {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 1.0;
    pub const DEFAULT: Self = Self(0.75);
    pub const FULL: Self = Self(1.0);

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::DEFAULT;
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn from_permille(permille: u16) -> Self {
        Self::new(permille as f32 / 1000.0)
    }

    pub const fn get(self) -> f32 {
        self.0
    }

    pub fn to_permille(self) -> u16 {
        round_positive(self.0 * 1000.0) as u16
    }

    /// Rendered length of a `len`-pixel edge: `max(8, round(len * scale))`.
    pub fn scaled_extent(self, len: u8) -> u16 {
        (round_positive(len as f32 * self.0) as u16).max(MIN_SCALED_EXTENT)
    }
}

impl Default for FontScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[inline]
fn round_positive(value: f32) -> u32 {
    (value + 0.5) as u32
}

/// Blits `bitmap` (`glyph_w` x `glyph_h`) at `(x, y)` with nearest-neighbour
/// downscaling. Only set bits are written. Returns the rendered footprint.
#[allow(clippy::too_many_arguments)]
pub fn draw_glyph<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    bitmap: &[u8],
    glyph_w: u8,
    glyph_h: u8,
    scale: FontScale,
    on: bool,
) -> (u16, u16) {
    let scaled_w = scale.scaled_extent(glyph_w);
    let scaled_h = scale.scaled_extent(glyph_h);
    let bytes_per_row = (glyph_w as usize).div_ceil(8);

    for row in 0..scaled_h {
        let src_row = (row as f32 / scale.get()) as usize;
        if src_row >= glyph_h as usize {
            continue;
        }

        for col in 0..scaled_w {
            let src_col = (col as f32 / scale.get()) as usize;
            if src_col >= glyph_w as usize {
                continue;
            }

            let Some(byte) = bitmap.get(src_row * bytes_per_row + src_col / 8) else {
                continue;
            };
            if byte & (0x80 >> (src_col % 8)) != 0 {
                sink.set_pixel(x + col as i32, y + row as i32, on);
            }
        }
    }

    (scaled_w, scaled_h)
}

/// [`draw_glyph`] for a loaded glyph record.
pub fn draw_bitmap<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    glyph: &GlyphBitmap,
    scale: FontScale,
    on: bool,
) -> (u16, u16) {
    draw_glyph(
        sink,
        x,
        y,
        glyph.as_bytes(),
        glyph.width(),
        glyph.height(),
        scale,
        on,
    )
}
