//! In-memory framebuffer in SSD1306 page layout.

use core::convert::TryFrom;

use crate::protocol::{BUFFER_SIZE, HEIGHT, PAGES, WIDTH};

/// 1bpp framebuffer for the panel.
///
/// Each byte holds a vertical strip of 8 pixels: byte `x + (y / 8) * WIDTH`,
/// bit `y % 8` (bit 0 is the top row of the page).
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    bytes: [u8; BUFFER_SIZE],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Creates a new dark framebuffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0u8; BUFFER_SIZE],
        }
    }

    /// Returns the underlying framebuffer bytes.
    pub fn bytes(&self) -> &[u8; BUFFER_SIZE] {
        &self.bytes
    }

    /// Returns mutable framebuffer bytes.
    pub fn bytes_mut(&mut self) -> &mut [u8; BUFFER_SIZE] {
        &mut self.bytes
    }

    /// Clears all pixels off (`on = false`) or lit (`on = true`).
    pub fn clear(&mut self, on: bool) {
        self.bytes.fill(if on { 0xFF } else { 0x00 });
    }

    #[inline]
    fn locate(x: usize, y: usize) -> Option<(usize, u8)> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        Some((x + (y / 8) * WIDTH, 1u8 << (y % 8)))
    }

    /// Sets a pixel state.
    ///
    /// Returns `true` when pixel is in bounds, `false` otherwise.
    pub fn set_pixel(&mut self, x: usize, y: usize, on: bool) -> bool {
        let Some((index, mask)) = Self::locate(x, y) else {
            return false;
        };

        if on {
            self.bytes[index] |= mask;
        } else {
            self.bytes[index] &= !mask;
        }

        true
    }

    /// Reads a pixel state.
    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        let (index, mask) = Self::locate(x, y)?;
        Some(self.bytes[index] & mask != 0)
    }

    /// Returns the payload of page 0..8.
    pub fn page(&self, page: usize) -> Option<&[u8; WIDTH]> {
        if page >= PAGES {
            return None;
        }

        let start = page * WIDTH;
        <&[u8; WIDTH]>::try_from(&self.bytes[start..start + WIDTH]).ok()
    }

    /// Counts lit pixels.
    pub fn lit_count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_bit_mapping_is_lsb_top_within_page() {
        let mut fb = FrameBuffer::new();

        assert!(fb.set_pixel(0, 0, true));
        assert!(fb.set_pixel(0, 7, true));
        assert!(fb.set_pixel(1, 8, true));

        assert_eq!(fb.bytes()[0], 0b1000_0001);
        assert_eq!(fb.bytes()[WIDTH + 1], 0b0000_0001);
        assert_eq!(fb.page(1).unwrap()[1], 0x01);
    }

    #[test]
    fn out_of_bounds_pixel_is_ignored() {
        let mut fb = FrameBuffer::new();

        assert!(!fb.set_pixel(WIDTH, 0, true));
        assert!(!fb.set_pixel(0, HEIGHT, true));
        assert_eq!(fb.lit_count(), 0);
        assert!(fb.page(PAGES).is_none());
    }

    #[test]
    fn set_clear_and_read_last_pixel() {
        let mut fb = FrameBuffer::new();

        assert!(fb.set_pixel(WIDTH - 1, HEIGHT - 1, true));
        assert_eq!(fb.pixel(WIDTH - 1, HEIGHT - 1), Some(true));
        assert_eq!(fb.bytes()[BUFFER_SIZE - 1], 0x80);
        assert_eq!(fb.pixel(WIDTH, HEIGHT), None);

        assert!(fb.set_pixel(WIDTH - 1, HEIGHT - 1, false));
        assert_eq!(fb.lit_count(), 0);

        fb.clear(true);
        assert_eq!(fb.lit_count(), WIDTH * HEIGHT);
    }
}
