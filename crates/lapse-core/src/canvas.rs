//! Pixel sink seam between renderers and the panel framebuffer.

use ssd1306::{FrameBuffer, protocol};

/// A 1bpp surface. Out-of-bounds writes are ignored.
pub trait PixelSink {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn set_pixel(&mut self, x: i32, y: i32, on: bool);

    fn hline(&mut self, x: i32, y: i32, len: i32, on: bool) {
        for px in x..x.saturating_add(len) {
            self.set_pixel(px, y, on);
        }
    }

    fn vline(&mut self, x: i32, y: i32, len: i32, on: bool) {
        for py in y..y.saturating_add(len) {
            self.set_pixel(x, py, on);
        }
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, on: bool) {
        if w <= 0 || h <= 0 {
            return;
        }

        self.hline(x, y, w, on);
        self.hline(x, y + h - 1, w, on);
        self.vline(x, y, h, on);
        self.vline(x + w - 1, y, h, on);
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, on: bool) {
        for py in y..y.saturating_add(h) {
            self.hline(x, py, w, on);
        }
    }
}

impl PixelSink for FrameBuffer {
    fn width(&self) -> i32 {
        protocol::WIDTH as i32
    }

    fn height(&self) -> i32 {
        protocol::HEIGHT as i32
    }

    fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 {
            return;
        }

        let _ = FrameBuffer::set_pixel(self, x as usize, y as usize, on);
    }
}

impl<T: PixelSink + ?Sized> PixelSink for &mut T {
    fn width(&self) -> i32 {
        (**self).width()
    }

    fn height(&self) -> i32 {
        (**self).height()
    }

    fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        (**self).set_pixel(x, y, on)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::PixelSink;

    /// Arbitrary-size grid for layout tests.
    pub struct GridSink {
        pub width: i32,
        pub height: i32,
        pub pixels: Vec<bool>,
    }

    impl GridSink {
        pub fn new(width: i32, height: i32) -> Self {
            Self {
                width,
                height,
                pixels: vec![false; (width * height) as usize],
            }
        }

        pub fn get(&self, x: i32, y: i32) -> bool {
            x >= 0
                && y >= 0
                && x < self.width
                && y < self.height
                && self.pixels[(y * self.width + x) as usize]
        }

        pub fn lit(&self) -> usize {
            self.pixels.iter().filter(|p| **p).count()
        }

        /// Number of lit pixels inside the given box.
        pub fn lit_in(&self, x: i32, y: i32, w: i32, h: i32) -> usize {
            let mut n = 0;
            for py in y..y + h {
                for px in x..x + w {
                    if self.get(px, py) {
                        n += 1;
                    }
                }
            }
            n
        }

        /// Bounding box `(x0, y0, x1, y1)` of lit pixels, inclusive.
        pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
            let mut out: Option<(i32, i32, i32, i32)> = None;
            for y in 0..self.height {
                for x in 0..self.width {
                    if self.get(x, y) {
                        out = Some(match out {
                            None => (x, y, x, y),
                            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                        });
                    }
                }
            }
            out
        }
    }

    impl PixelSink for GridSink {
        fn width(&self) -> i32 {
            self.width
        }

        fn height(&self) -> i32 {
            self.height
        }

        fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
            if x < 0 || y < 0 || x >= self.width || y >= self.height {
                return;
            }
            self.pixels[(y * self.width + x) as usize] = on;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::GridSink;
    use super::*;

    #[test]
    fn framebuffer_sink_ignores_negative_coordinates() {
        let mut fb = FrameBuffer::new();
        PixelSink::set_pixel(&mut fb, -1, 0, true);
        PixelSink::set_pixel(&mut fb, 0, -1, true);
        PixelSink::set_pixel(&mut fb, 3, 9, true);

        assert_eq!(fb.lit_count(), 1);
        assert_eq!(fb.pixel(3, 9), Some(true));
    }

    #[test]
    fn rect_draws_outline_only() {
        let mut grid = GridSink::new(10, 10);
        grid.rect(1, 1, 4, 3, true);

        assert_eq!(grid.lit(), 10);
        assert!(!grid.get(2, 2));
        assert_eq!(grid.bounds(), Some((1, 1, 4, 3)));
    }

    #[test]
    fn fill_rect_clips_at_edges() {
        let mut grid = GridSink::new(4, 4);
        grid.fill_rect(2, 2, 5, 5, true);
        assert_eq!(grid.lit(), 4);

        grid.fill_rect(0, 0, 0, 3, true);
        assert_eq!(grid.lit(), 4);
    }
}
