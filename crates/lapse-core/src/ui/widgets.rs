//! Status icons, progress bar, and dithered preview.

use crate::canvas::PixelSink;

/// Bordered bar filled to `percent` (clamped to 0..=100).
pub fn progress_bar<S: PixelSink + ?Sized>(sink: &mut S, x: i32, y: i32, w: i32, h: i32, percent: i32) {
    let percent = percent.clamp(0, 100);
    sink.rect(x, y, w, h, true);

    let fill = (w - 4) * percent / 100;
    if fill > 0 {
        sink.fill_rect(x + 2, y + 2, fill, h - 4, true);
    }
}

/// 16x8 battery outline with a 10-step gauge and optional bolt.
pub fn battery<S: PixelSink + ?Sized>(sink: &mut S, x: i32, y: i32, percent: u8, charging: bool) {
    sink.rect(x, y + 1, 14, 6, true);
    sink.fill_rect(x + 14, y + 2, 2, 4, true);

    let fill = percent.min(100) as i32 / 10;
    if fill > 0 {
        sink.fill_rect(x + 2, y + 3, fill, 2, true);
    }

    if charging {
        const BOLT: [(i32, i32); 7] = [(7, 0), (6, 1), (5, 2), (6, 3), (7, 4), (8, 5), (9, 6)];
        for (dx, dy) in BOLT {
            sink.set_pixel(x + dx, y + dy, true);
        }
    }
}

const CROSS: [(i32, i32); 7] = [(2, 2), (6, 2), (3, 3), (5, 3), (4, 4), (3, 5), (5, 5)];

/// Signal arcs when connected, a cross otherwise.
pub fn wifi<S: PixelSink + ?Sized>(sink: &mut S, x: i32, y: i32, connected: bool) {
    if connected {
        sink.set_pixel(x + 4, y, true);
        sink.hline(x + 2, y + 2, 5, true);
        sink.hline(x, y + 4, 9, true);
        sink.set_pixel(x + 4, y + 6, true);
    } else {
        for (dx, dy) in CROSS.into_iter().chain([(1, 1), (7, 1), (2, 6), (6, 6)]) {
            sink.set_pixel(x + dx, y + dy, true);
        }
    }
}

/// Camera body; a dot to the right while recording.
pub fn camera<S: PixelSink + ?Sized>(sink: &mut S, x: i32, y: i32, recording: bool) {
    sink.rect(x, y + 2, 12, 6, true);
    sink.fill_rect(x + 3, y + 3, 4, 4, true);
    sink.fill_rect(x + 8, y, 3, 3, true);

    if recording {
        sink.fill_rect(x + 13, y + 3, 3, 3, true);
    }
}

/// SD card outline with a check mark or cross.
pub fn sd_card<S: PixelSink + ?Sized>(sink: &mut S, x: i32, y: i32, mounted: bool) {
    sink.vline(x, y + 2, 6, true);
    sink.vline(x + 8, y, 8, true);
    sink.hline(x, y + 7, 9, true);
    sink.hline(x + 2, y, 7, true);
    sink.set_pixel(x + 1, y + 1, true);
    sink.set_pixel(x, y + 2, true);

    if mounted {
        const CHECK: [(i32, i32); 5] = [(2, 4), (3, 5), (4, 4), (5, 3), (6, 2)];
        for (dx, dy) in CHECK {
            sink.set_pixel(x + dx, y + dy, true);
        }
    } else {
        for (dx, dy) in CROSS {
            sink.set_pixel(x + dx, y + dy, true);
        }
    }
}

/// Widest sink the dithering error rows can cover.
pub const DITHER_MAX_WIDTH: usize = 128;

/// Scales an 8-bit grayscale image onto the whole sink with Floyd-Steinberg
/// dithering. Lit pixels are those above mid-gray after error diffusion.
///
/// Returns `false` without drawing if the image is empty or truncated.
pub fn draw_dithered<S: PixelSink + ?Sized>(
    sink: &mut S,
    gray: &[u8],
    width: usize,
    height: usize,
) -> bool {
    let Some(pixels) = width.checked_mul(height) else {
        return false;
    };
    if pixels == 0 || gray.len() < pixels {
        return false;
    }

    let out_w = (sink.width().max(0) as usize).min(DITHER_MAX_WIDTH);
    let out_h = sink.height().max(0) as usize;
    if out_w == 0 || out_h == 0 {
        return false;
    }

    let mut curr = [0i16; DITHER_MAX_WIDTH + 2];
    let mut next = [0i16; DITHER_MAX_WIDTH + 2];

    for oy in 0..out_h {
        core::mem::swap(&mut curr, &mut next);
        next.fill(0);

        let src_y = (oy * height / out_h).min(height - 1);
        for ox in 0..out_w {
            let src_x = (ox * width / out_w).min(width - 1);
            let pixel = gray[src_y * width + src_x] as i32 + curr[ox + 1] as i32;

            let white = pixel > 127;
            sink.set_pixel(ox as i32, oy as i32, white);

            let error = pixel - if white { 255 } else { 0 };
            curr[ox + 2] = curr[ox + 2].saturating_add((error * 7 / 16) as i16);
            next[ox] = next[ox].saturating_add((error * 3 / 16) as i16);
            next[ox + 1] = next[ox + 1].saturating_add((error * 5 / 16) as i16);
            next[ox + 2] = next[ox + 2].saturating_add((error / 16) as i16);
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::mock::GridSink;

    #[test]
    fn progress_fill_tracks_percent() {
        let mut grid = GridSink::new(128, 16);
        progress_bar(&mut grid, 0, 0, 104, 10, 50);

        assert_eq!(grid.lit_in(2, 2, 50, 6), 300);
        assert_eq!(grid.lit_in(52, 2, 50, 6), 0);

        let mut full = GridSink::new(128, 16);
        progress_bar(&mut full, 0, 0, 104, 10, 250);
        assert_eq!(full.lit_in(2, 2, 100, 6), 600);
    }

    #[test]
    fn battery_gauge_has_ten_steps() {
        let mut empty = GridSink::new(16, 8);
        let mut full = GridSink::new(16, 8);
        battery(&mut empty, 0, 0, 5, false);
        battery(&mut full, 0, 0, 100, false);

        assert_eq!(full.lit() - empty.lit(), 20);
    }

    #[test]
    fn icons_stay_inside_their_cells() {
        let mut grid = GridSink::new(64, 16);
        battery(&mut grid, 0, 0, 80, true);
        wifi(&mut grid, 20, 0, false);
        sd_card(&mut grid, 36, 0, true);
        camera(&mut grid, 46, 0, true);

        assert_eq!(grid.lit_in(0, 8, 64, 8), 0);
        assert!(grid.lit_in(20, 0, 9, 8) > 0);
        assert!(grid.lit_in(36, 0, 9, 8) > 0);
    }

    #[test]
    fn dithering_preserves_average_brightness() {
        let gray = vec![128u8; 64 * 32];
        let mut grid = GridSink::new(64, 32);

        assert!(draw_dithered(&mut grid, &gray, 64, 32));

        let lit = grid.lit() as i32;
        let total = 64 * 32;
        assert!((lit - total / 2).abs() < total / 10, "lit={lit}");
    }

    #[test]
    fn dithering_extremes_are_solid() {
        let mut grid = GridSink::new(32, 16);
        assert!(draw_dithered(&mut grid, &[255u8; 16 * 8], 16, 8));
        assert_eq!(grid.lit(), 32 * 16);

        assert!(draw_dithered(&mut grid, &[0u8; 16 * 8], 16, 8));
        assert_eq!(grid.lit(), 0);
    }

    #[test]
    fn dithering_rejects_truncated_images() {
        let mut grid = GridSink::new(32, 16);
        assert!(!draw_dithered(&mut grid, &[0u8; 10], 16, 8));
        assert!(!draw_dithered(&mut grid, &[], 0, 0));
    }
}
