use super::detect::GB2312_GLYPHS;
use super::mock::{CountingSource, MemByteStore};
use super::*;

const PATH: &str = "/FONT/GB2312.FON";

fn store_with(size: usize) -> FontStore<MemByteStore> {
    FontStore::new(MemByteStore::default().with_patterned_file(PATH, size))
}

fn code(hi: u8, lo: u8) -> Gb2312Code {
    Gb2312Code::new(hi, lo).unwrap()
}

#[test]
fn detects_plain_16px_font() {
    let mut fonts = store_with(261_696);
    let d = fonts.load(PATH).unwrap();

    assert_eq!(d.pixel_size, 16);
    assert_eq!(d.bytes_per_glyph, 32);
    assert_eq!(d.header_offset, 0);
    assert_eq!(fonts.state(), FontState::Available(d));
}

#[test]
fn detects_headered_variants() {
    let d = store_with(267_616).load(PATH).unwrap();
    assert_eq!((d.pixel_size, d.bytes_per_glyph, d.header_offset), (16, 32, 64));

    let d = store_with(196_272).load(PATH).unwrap();
    assert_eq!((d.pixel_size, d.bytes_per_glyph, d.header_offset), (12, 24, 576));
}

#[test]
fn every_known_format_is_reachable() {
    for (i, format) in KNOWN_FORMATS.iter().enumerate() {
        assert_eq!(detect_format(format.file_size), Some(*format), "row {i}");
    }
}

#[test]
fn full_set_sizes_resolve_to_explicit_rows() {
    let d = detect_format(24 * GB2312_GLYPHS).unwrap();
    assert_eq!((d.pixel_size, d.header_offset), (12, 576));

    let d = detect_format(32 * GB2312_GLYPHS).unwrap();
    assert_eq!((d.pixel_size, d.header_offset), (16, 0));
}

#[test]
fn detects_large_standard_sizes() {
    let d = store_with(72 * 8178).load(PATH).unwrap();
    assert_eq!((d.pixel_size, d.glyph_width, d.bytes_per_glyph), (24, 24, 72));

    let d = store_with(128 * 8178).load(PATH).unwrap();
    assert_eq!((d.pixel_size, d.bytes_per_glyph, d.bytes_per_row()), (32, 128, 4));
}

#[test]
fn every_known_format_has_consistent_geometry() {
    for format in KNOWN_FORMATS {
        let per_row = (format.glyph_width as u16).div_ceil(8);
        assert_eq!(format.bytes_per_glyph, per_row * format.glyph_height as u16);
    }
}

#[test]
fn unknown_size_leaves_font_unavailable() {
    let mut fonts = store_with(12_345);

    assert_eq!(fonts.load(PATH), Err(FontError::FormatUnrecognized));
    assert_eq!(
        fonts.state(),
        FontState::Unavailable(FontError::FormatUnrecognized)
    );
    assert_eq!(fonts.load_glyph(code(0xB0, 0xA1)), Err(FontError::NotFound));
    assert!(fonts.store_mut().reads.is_empty());
}

#[test]
fn missing_file_is_not_found() {
    let mut fonts = FontStore::new(MemByteStore::default());
    assert_eq!(fonts.load(PATH), Err(FontError::NotFound));
    assert!(!fonts.is_available());
}

#[test]
fn headered_12px_glyph_is_one_read_after_header() {
    let mut fonts = store_with(196_272);
    fonts.load(PATH).unwrap();

    let glyph = fonts.load_glyph(code(0xA1, 0xA1)).unwrap();

    let reads = &fonts.store_mut().reads;
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0], (String::from(PATH), 576, 24));

    let expected: Vec<u8> = (576..600).map(|i| (i % 251) as u8).collect();
    assert_eq!(glyph.as_bytes(), expected.as_slice());
    assert_eq!((glyph.width(), glyph.height()), (12, 12));
}

#[test]
fn glyph_offset_follows_grid_index() {
    let mut fonts = store_with(267_616);
    fonts.load(PATH).unwrap();

    fonts.load_glyph(code(0xB0, 0xA1)).unwrap();
    assert_eq!(fonts.store_mut().reads[0].1, 64 + 1410 * 32);
}

#[test]
fn index_offset_shifts_and_clamps() {
    let mut fonts = store_with(261_696);
    fonts.load(PATH).unwrap();

    fonts.set_index_offset(3);
    fonts.load_glyph(code(0xA1, 0xA1)).unwrap();
    fonts.set_index_offset(-10);
    fonts.load_glyph(code(0xA1, 0xA2)).unwrap();

    let offsets: Vec<u64> = fonts.store_mut().reads.iter().map(|r| r.1).collect();
    assert_eq!(offsets, [3 * 32, 0]);
}

#[test]
fn index_offset_survives_reload() {
    let mut fonts = store_with(261_696);
    fonts.set_index_offset(94);
    fonts.load(PATH).unwrap();
    fonts.unload();
    fonts.load(PATH).unwrap();

    assert_eq!(fonts.index_offset(), 94);
    fonts.load_glyph(code(0xA1, 0xA1)).unwrap();
    assert_eq!(fonts.store_mut().reads[0].1, 94 * 32);
}

#[test]
fn glyph_past_end_of_file_is_not_found_without_reading() {
    let mut fonts = store_with(261_696);
    fonts.load(PATH).unwrap();
    fonts.set_index_offset(1);

    assert_eq!(fonts.load_glyph(code(0xF7, 0xFE)), Err(FontError::NotFound));
    assert!(fonts.store_mut().reads.is_empty());
}

#[test]
fn read_failures_map_to_io() {
    let mut fonts = store_with(261_696);
    fonts.load(PATH).unwrap();

    fonts.store_mut().short_reads = Some(10);
    assert_eq!(fonts.load_glyph(code(0xB0, 0xA1)), Err(FontError::Io));

    fonts.store_mut().short_reads = None;
    fonts.store_mut().fail_reads = true;
    assert_eq!(fonts.load_glyph(code(0xB0, 0xA1)), Err(FontError::Io));
    assert!(fonts.is_available());
}

#[test]
fn raw_pairs_are_validated() {
    let mut fonts = store_with(261_696);
    fonts.load(PATH).unwrap();

    assert_eq!(fonts.load_pair(0xA0, 0xA1), Err(FontError::InvalidCode));
    assert!(fonts.load_pair(0xBF, 0xAA).is_ok());
}

#[test]
fn unload_returns_to_unloaded() {
    let mut fonts = store_with(261_696);
    fonts.load(PATH).unwrap();
    fonts.unload();

    assert_eq!(fonts.state(), FontState::Unloaded);
    assert_eq!(fonts.info(), None);
    assert_eq!(fonts.load_glyph(code(0xB0, 0xA1)), Err(FontError::NotFound));
}

#[test]
fn geometry_and_info() {
    let mut fonts = store_with(261_696);
    assert_eq!(fonts.glyph_geometry(20), (0, 0));
    assert_eq!(fonts.glyph_geometry(24), (24, 24));

    fonts.load(PATH).unwrap();
    assert_eq!(fonts.glyph_geometry(20), (16, 16));
    assert_eq!(
        fonts.info(),
        Some(FontInfo {
            pixel_size: 16,
            file_size: 261_696
        })
    );
}

#[test]
fn glyph_bitmap_rejects_mismatched_length() {
    assert!(GlyphBitmap::new(12, 12, &[0; 24]).is_some());
    assert!(GlyphBitmap::new(12, 12, &[0; 23]).is_none());
    assert!(GlyphBitmap::new(40, 40, &[0; 200]).is_none());
}

#[test]
fn cache_serves_repeats_without_reads() {
    let mut cached: CachedGlyphSource<_, 4> = CachedGlyphSource::new(store_with(261_696));
    cached.inner_mut().load(PATH).unwrap();

    let first = cached.load_glyph(code(0xBF, 0xAA)).unwrap();
    let again = cached.load_glyph(code(0xBF, 0xAA)).unwrap();

    assert_eq!(first, again);
    assert_eq!(cached.stats(), (1, 1));
    assert_eq!(cached.inner_mut().store_mut().reads.len(), 1);
}

#[test]
fn cache_evicts_least_recently_used() {
    let mut cached: CachedGlyphSource<_, 2> = CachedGlyphSource::new(CountingSource::solid(16));

    cached.load_glyph(code(0xB0, 0xA1)).unwrap();
    cached.load_glyph(code(0xB0, 0xA2)).unwrap();
    cached.load_glyph(code(0xB0, 0xA1)).unwrap();
    cached.load_glyph(code(0xB0, 0xA3)).unwrap();
    assert_eq!(cached.inner().loads, 3);

    cached.load_glyph(code(0xB0, 0xA1)).unwrap();
    assert_eq!(cached.inner().loads, 3);
    cached.load_glyph(code(0xB0, 0xA2)).unwrap();
    assert_eq!(cached.inner().loads, 4);
    assert_eq!(cached.len(), 2);
}

#[test]
fn cache_drops_entries_when_font_changes() {
    let mut cached: CachedGlyphSource<_, 4> = CachedGlyphSource::new(CountingSource::solid(16));
    cached.load_glyph(code(0xB0, 0xA1)).unwrap();

    cached.inner_mut().descriptor = CountingSource::solid(24).descriptor;
    let glyph = cached.load_glyph(code(0xB0, 0xA1)).unwrap();

    assert_eq!(glyph.width(), 24);
    assert_eq!(cached.inner().loads, 2);
}

#[test]
fn cache_follows_index_offset_changes() {
    let mut cached: CachedGlyphSource<_, 4> = CachedGlyphSource::new(store_with(261_696));
    cached.inner_mut().load(PATH).unwrap();
    let before = cached.load_glyph(code(0xB0, 0xA1)).unwrap();

    cached.inner_mut().set_index_offset(1);
    let after = cached.load_glyph(code(0xB0, 0xA1)).unwrap();
    let direct = cached.inner_mut().load_glyph(code(0xB0, 0xA1)).unwrap();

    assert_ne!(before, after);
    assert_eq!(after, direct);
    assert_eq!(cached.stats(), (0, 2));
}

#[test]
fn cache_keeps_entries_when_offset_is_unchanged() {
    let mut cached: CachedGlyphSource<_, 4> = CachedGlyphSource::new(store_with(261_696));
    cached.inner_mut().load(PATH).unwrap();
    cached.load_glyph(code(0xB0, 0xA1)).unwrap();

    cached.inner_mut().set_index_offset(0);
    cached.load_glyph(code(0xB0, 0xA1)).unwrap();

    assert_eq!(cached.stats(), (1, 1));
}

#[test]
fn cache_does_not_remember_failures() {
    let mut source = CountingSource::solid(16);
    source.fail = Some(FontError::Io);
    let mut cached: CachedGlyphSource<_, 4> = CachedGlyphSource::new(source);

    assert_eq!(cached.load_glyph(code(0xB0, 0xA1)), Err(FontError::Io));
    assert!(cached.is_empty());

    cached.inner_mut().fail = None;
    assert!(cached.load_glyph(code(0xB0, 0xA1)).is_ok());
    assert_eq!(cached.inner().loads, 2);
}

#[test]
fn missing_source_reports_no_font() {
    let mut absent: Option<CountingSource> = None;
    assert_eq!(absent.descriptor(), None);
    assert_eq!(absent.load_glyph(code(0xBF, 0xAA)), Err(FontError::NotFound));

    let mut present = Some(CountingSource::solid(16));
    assert!(present.descriptor().is_some());
    assert!(present.load_glyph(code(0xBF, 0xAA)).is_ok());
}
