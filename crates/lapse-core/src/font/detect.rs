//! Font layout detection from total file size.

/// Glyph count of a full GB2312 font (rows 0xA1..=0xF7, 94 cells each).
pub const GB2312_GLYPHS: u64 = 87 * 94;

/// One known on-disk layout.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FontFormat {
    pub file_size: u64,
    pub pixel_size: u8,
    pub glyph_width: u8,
    pub glyph_height: u8,
    pub bytes_per_glyph: u16,
    pub header_offset: u32,
    pub index_adjust: i32,
}

impl FontFormat {
    const fn variant(
        file_size: u64,
        pixel_size: u8,
        bytes_per_glyph: u16,
        header_offset: u32,
    ) -> Self {
        Self {
            file_size,
            pixel_size,
            glyph_width: pixel_size,
            glyph_height: pixel_size,
            bytes_per_glyph,
            header_offset,
            index_adjust: 0,
        }
    }

    const fn standard(pixel_size: u8) -> Self {
        let bytes_per_glyph = (pixel_size as u16).div_ceil(8) * pixel_size as u16;
        Self::variant(
            bytes_per_glyph as u64 * GB2312_GLYPHS,
            pixel_size,
            bytes_per_glyph,
            0,
        )
    }
}

/// Checked in order; the first entry with a matching size wins.
///
/// The full-set 12px and 16px sizes (`24 * 8178`, `32 * 8178`) are the first
/// two explicit rows, so only 24px and 32px come from the computed rule.
pub const KNOWN_FORMATS: [FontFormat; 5] = [
    FontFormat::variant(196_272, 12, 24, 576),
    FontFormat::variant(261_696, 16, 32, 0),
    // Extended GBK-range export with a 64-byte header.
    FontFormat::variant(267_616, 16, 32, 64),
    FontFormat::standard(24),
    FontFormat::standard(32),
];

/// Picks the layout for a file of `file_size` bytes.
pub fn detect_format(file_size: u64) -> Option<FontFormat> {
    KNOWN_FORMATS
        .iter()
        .find(|format| format.file_size == file_size)
        .copied()
}

/// Glyph cell for the sizes shipped on the card.
pub const fn geometry_for_size(pixel_size: u8) -> Option<(u8, u8)> {
    match pixel_size {
        12 | 16 | 24 | 32 => Some((pixel_size, pixel_size)),
        _ => None,
    }
}
