//! Built-in 8x8 ASCII font.
//!
//! Glyphs are column-major: one byte per column, bit 0 is the top row.

use crate::canvas::PixelSink;

/// Cell edge of an unscaled ASCII glyph.
pub const CELL: i32 = 8;

const FIRST: u8 = b' ';
const LAST: u8 = b'~';

#[rustfmt::skip]
const FONT_8X8: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x06, 0x5F, 0x5F, 0x06, 0x00, 0x00],
    [0x00, 0x03, 0x03, 0x00, 0x03, 0x03, 0x00, 0x00],
    [0x14, 0x7F, 0x7F, 0x14, 0x7F, 0x7F, 0x14, 0x00],
    [0x24, 0x2E, 0x6B, 0x6B, 0x3A, 0x12, 0x00, 0x00],
    [0x46, 0x66, 0x30, 0x18, 0x0C, 0x66, 0x62, 0x00],
    [0x30, 0x7A, 0x4F, 0x5D, 0x37, 0x7A, 0x48, 0x00],
    [0x00, 0x04, 0x07, 0x03, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x1C, 0x3E, 0x63, 0x41, 0x00, 0x00, 0x00],
    [0x00, 0x41, 0x63, 0x3E, 0x1C, 0x00, 0x00, 0x00],
    [0x08, 0x2A, 0x3E, 0x1C, 0x3E, 0x2A, 0x08, 0x00],
    [0x08, 0x08, 0x3E, 0x3E, 0x08, 0x08, 0x00, 0x00],
    [0x00, 0x80, 0xE0, 0x60, 0x00, 0x00, 0x00, 0x00],
    [0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x00],
    [0x00, 0x00, 0x60, 0x60, 0x00, 0x00, 0x00, 0x00],
    [0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0x01, 0x00],
    [0x3E, 0x7F, 0x71, 0x59, 0x4D, 0x7F, 0x3E, 0x00],
    [0x40, 0x42, 0x7F, 0x7F, 0x40, 0x40, 0x00, 0x00],
    [0x62, 0x73, 0x59, 0x49, 0x6F, 0x66, 0x00, 0x00],
    [0x22, 0x63, 0x49, 0x49, 0x7F, 0x36, 0x00, 0x00],
    [0x18, 0x1C, 0x16, 0x53, 0x7F, 0x7F, 0x50, 0x00],
    [0x27, 0x67, 0x45, 0x45, 0x7D, 0x39, 0x00, 0x00],
    [0x3C, 0x7E, 0x4B, 0x49, 0x79, 0x30, 0x00, 0x00],
    [0x03, 0x03, 0x71, 0x79, 0x0F, 0x07, 0x00, 0x00],
    [0x36, 0x7F, 0x49, 0x49, 0x7F, 0x36, 0x00, 0x00],
    [0x06, 0x4F, 0x49, 0x69, 0x3F, 0x1E, 0x00, 0x00],
    [0x00, 0x00, 0x66, 0x66, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x80, 0xE6, 0x66, 0x00, 0x00, 0x00, 0x00],
    [0x08, 0x1C, 0x36, 0x63, 0x41, 0x00, 0x00, 0x00],
    [0x24, 0x24, 0x24, 0x24, 0x24, 0x24, 0x00, 0x00],
    [0x00, 0x41, 0x63, 0x36, 0x1C, 0x08, 0x00, 0x00],
    [0x02, 0x03, 0x51, 0x59, 0x0F, 0x06, 0x00, 0x00],
    [0x3E, 0x7F, 0x41, 0x5D, 0x5D, 0x1F, 0x1E, 0x00],
    [0x7C, 0x7E, 0x13, 0x13, 0x7E, 0x7C, 0x00, 0x00],
    [0x41, 0x7F, 0x7F, 0x49, 0x49, 0x7F, 0x36, 0x00],
    [0x1C, 0x3E, 0x63, 0x41, 0x41, 0x63, 0x22, 0x00],
    [0x41, 0x7F, 0x7F, 0x41, 0x63, 0x3E, 0x1C, 0x00],
    [0x41, 0x7F, 0x7F, 0x49, 0x5D, 0x41, 0x63, 0x00],
    [0x41, 0x7F, 0x7F, 0x49, 0x1D, 0x01, 0x03, 0x00],
    [0x1C, 0x3E, 0x63, 0x41, 0x51, 0x73, 0x72, 0x00],
    [0x7F, 0x7F, 0x08, 0x08, 0x7F, 0x7F, 0x00, 0x00],
    [0x00, 0x41, 0x7F, 0x7F, 0x41, 0x00, 0x00, 0x00],
    [0x30, 0x70, 0x40, 0x41, 0x7F, 0x3F, 0x01, 0x00],
    [0x41, 0x7F, 0x7F, 0x08, 0x1C, 0x77, 0x63, 0x00],
    [0x41, 0x7F, 0x7F, 0x41, 0x40, 0x60, 0x70, 0x00],
    [0x7F, 0x7F, 0x0E, 0x1C, 0x0E, 0x7F, 0x7F, 0x00],
    [0x7F, 0x7F, 0x06, 0x0C, 0x18, 0x7F, 0x7F, 0x00],
    [0x1C, 0x3E, 0x63, 0x41, 0x63, 0x3E, 0x1C, 0x00],
    [0x41, 0x7F, 0x7F, 0x49, 0x09, 0x0F, 0x06, 0x00],
    [0x1E, 0x3F, 0x21, 0x71, 0x7F, 0x5E, 0x00, 0x00],
    [0x41, 0x7F, 0x7F, 0x09, 0x19, 0x7F, 0x66, 0x00],
    [0x26, 0x6F, 0x4D, 0x59, 0x73, 0x32, 0x00, 0x00],
    [0x03, 0x41, 0x7F, 0x7F, 0x41, 0x03, 0x00, 0x00],
    [0x7F, 0x7F, 0x40, 0x40, 0x7F, 0x7F, 0x00, 0x00],
    [0x1F, 0x3F, 0x60, 0x60, 0x3F, 0x1F, 0x00, 0x00],
    [0x7F, 0x7F, 0x30, 0x18, 0x30, 0x7F, 0x7F, 0x00],
    [0x43, 0x67, 0x3C, 0x18, 0x3C, 0x67, 0x43, 0x00],
    [0x07, 0x4F, 0x78, 0x78, 0x4F, 0x07, 0x00, 0x00],
    [0x47, 0x63, 0x71, 0x59, 0x4D, 0x67, 0x73, 0x00],
    [0x00, 0x7F, 0x7F, 0x41, 0x41, 0x00, 0x00, 0x00],
    [0x01, 0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x00],
    [0x00, 0x41, 0x41, 0x7F, 0x7F, 0x00, 0x00, 0x00],
    [0x08, 0x0C, 0x06, 0x03, 0x06, 0x0C, 0x08, 0x00],
    [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80],
    [0x00, 0x00, 0x03, 0x07, 0x04, 0x00, 0x00, 0x00],
    [0x20, 0x74, 0x54, 0x54, 0x3C, 0x78, 0x40, 0x00],
    [0x41, 0x7F, 0x3F, 0x48, 0x48, 0x78, 0x30, 0x00],
    [0x38, 0x7C, 0x44, 0x44, 0x6C, 0x28, 0x00, 0x00],
    [0x30, 0x78, 0x48, 0x49, 0x3F, 0x7F, 0x40, 0x00],
    [0x38, 0x7C, 0x54, 0x54, 0x5C, 0x18, 0x00, 0x00],
    [0x48, 0x7E, 0x7F, 0x49, 0x03, 0x02, 0x00, 0x00],
    [0x98, 0xBC, 0xA4, 0xA4, 0xF8, 0x7C, 0x04, 0x00],
    [0x41, 0x7F, 0x7F, 0x08, 0x04, 0x7C, 0x78, 0x00],
    [0x00, 0x44, 0x7D, 0x7D, 0x40, 0x00, 0x00, 0x00],
    [0x60, 0xE0, 0x80, 0x80, 0xFD, 0x7D, 0x00, 0x00],
    [0x41, 0x7F, 0x7F, 0x10, 0x38, 0x6C, 0x44, 0x00],
    [0x00, 0x41, 0x7F, 0x7F, 0x40, 0x00, 0x00, 0x00],
    [0x7C, 0x7C, 0x18, 0x38, 0x1C, 0x7C, 0x78, 0x00],
    [0x7C, 0x7C, 0x04, 0x04, 0x7C, 0x78, 0x00, 0x00],
    [0x38, 0x7C, 0x44, 0x44, 0x7C, 0x38, 0x00, 0x00],
    [0x84, 0xFC, 0xF8, 0xA4, 0x24, 0x3C, 0x18, 0x00],
    [0x18, 0x3C, 0x24, 0xA4, 0xF8, 0xFC, 0x84, 0x00],
    [0x44, 0x7C, 0x78, 0x4C, 0x04, 0x1C, 0x18, 0x00],
    [0x48, 0x5C, 0x54, 0x54, 0x74, 0x24, 0x00, 0x00],
    [0x00, 0x04, 0x3E, 0x7F, 0x44, 0x24, 0x00, 0x00],
    [0x3C, 0x7C, 0x40, 0x40, 0x3C, 0x7C, 0x40, 0x00],
    [0x1C, 0x3C, 0x60, 0x60, 0x3C, 0x1C, 0x00, 0x00],
    [0x3C, 0x7C, 0x70, 0x38, 0x70, 0x7C, 0x3C, 0x00],
    [0x44, 0x6C, 0x38, 0x10, 0x38, 0x6C, 0x44, 0x00],
    [0x9C, 0xBC, 0xA0, 0xA0, 0xFC, 0x7C, 0x00, 0x00],
    [0x4C, 0x64, 0x74, 0x5C, 0x4C, 0x64, 0x00, 0x00],
    [0x08, 0x08, 0x3E, 0x77, 0x41, 0x41, 0x00, 0x00],
    [0x00, 0x00, 0x00, 0x77, 0x77, 0x00, 0x00, 0x00],
    [0x41, 0x41, 0x77, 0x3E, 0x08, 0x08, 0x00, 0x00],
    [0x02, 0x03, 0x01, 0x03, 0x02, 0x03, 0x01, 0x00],
];

/// Glyph columns for `c`; bytes outside printable ASCII render as `?`.
pub fn glyph(c: u8) -> &'static [u8; 8] {
    let c = if (FIRST..=LAST).contains(&c) { c } else { b'?' };
    &FONT_8X8[(c - FIRST) as usize]
}

/// Draws one character magnified by `size` (0 is treated as 1).
///
/// Returns the horizontal advance, `8 * size`.
pub fn draw_char<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    c: u8,
    size: u8,
    on: bool,
) -> i32 {
    let size = size.max(1) as i32;

    for (col, bits) in glyph(c).iter().enumerate() {
        for row in 0..8 {
            if bits & (1 << row) == 0 {
                continue;
            }

            let px = x + col as i32 * size;
            let py = y + row * size;
            if size == 1 {
                sink.set_pixel(px, py, on);
            } else {
                sink.fill_rect(px, py, size, size, on);
            }
        }
    }

    CELL * size
}

/// Draws a byte string; `\n` returns to `x` one cell lower. No wrapping.
///
/// Returns the advance of the last line.
pub fn draw_string<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y: i32,
    text: &[u8],
    size: u8,
    on: bool,
) -> i32 {
    let (mut cx, mut cy) = (x, y);

    for &c in text {
        if c == b'\n' {
            cx = x;
            cy += CELL * size.max(1) as i32;
        } else {
            cx += draw_char(sink, cx, cy, c, size, on);
        }
    }

    cx - x
}

/// Pixel width of `text` on one line.
pub fn text_width(text: &[u8], size: u8) -> i32 {
    text.len() as i32 * CELL * size.max(1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::mock::GridSink;

    #[test]
    fn non_printable_maps_to_question_mark() {
        assert_eq!(glyph(0x07), glyph(b'?'));
        assert_eq!(glyph(0xC8), glyph(b'?'));
        assert_ne!(glyph(b'A'), glyph(b'?'));
    }

    #[test]
    fn char_advance_scales_with_size() {
        let mut grid = GridSink::new(64, 32);
        assert_eq!(draw_char(&mut grid, 0, 0, b'A', 1, true), 8);
        assert_eq!(draw_char(&mut grid, 8, 0, b'A', 2, true), 16);
        assert_eq!(draw_char(&mut grid, 24, 0, b'A', 0, true), 8);
    }

    #[test]
    fn glyph_columns_are_lsb_top() {
        let mut grid = GridSink::new(8, 8);
        draw_char(&mut grid, 0, 0, b'_', 1, true);

        // '_' is bit 7 in every column: the bottom row only.
        assert_eq!(grid.lit(), 8);
        assert_eq!(grid.lit_in(0, 7, 8, 1), 8);
    }

    #[test]
    fn doubled_glyph_fills_blocks() {
        let mut single = GridSink::new(16, 16);
        let mut double = GridSink::new(16, 16);
        draw_char(&mut single, 0, 0, b'H', 1, true);
        draw_char(&mut double, 0, 0, b'H', 2, true);

        assert_eq!(double.lit(), single.lit() * 4);
    }

    #[test]
    fn string_honours_newline() {
        let mut grid = GridSink::new(32, 32);
        let advance = draw_string(&mut grid, 4, 0, b"AB\nC", 1, true);

        assert_eq!(advance, 8);
        assert!(grid.lit_in(4, 8, 8, 8) > 0);
        assert_eq!(grid.lit_in(12, 8, 8, 8), 0);
        assert_eq!(text_width(b"abc", 2), 48);
    }
}
