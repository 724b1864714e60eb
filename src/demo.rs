//! Demo module draws test patterns into a 5-6-5 framebuffer
//!
//! # Examples
//!
//! ```
//! use android_video::demo::Pattern;
//!
//! let mut pixels = vec![0u8; 320 * 240 * 2];
//! Pattern::new(320, 240).draw(&mut pixels, 320 * 2, 0);
//! ```

use crate::core::format::pack_rgb565;

/// Scrolling color bars with a marker that follows the last touch
#[derive(Debug, Clone)]
pub struct Pattern {
    width: u32,
    height: u32,
    marker: Option<(u32, u32)>,
}

const BAR_COLORS: [(u8, u8, u8); 8] = [
    (255, 255, 255),
    (255, 255, 0),
    (0, 255, 255),
    (0, 255, 0),
    (255, 0, 255),
    (255, 0, 0),
    (0, 0, 255),
    (0, 0, 0),
];

const MARKER_RADIUS: u32 = 6;

impl Pattern {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            marker: None,
        }
    }

    /// Move the marker; coordinates outside the pattern hide it
    pub fn set_marker(&mut self, x: i32, y: i32) {
        self.marker = match (u32::try_from(x), u32::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.width && y < self.height => Some((x, y)),
            _ => None,
        };
    }

    pub fn marker(&self) -> Option<(u32, u32)> {
        self.marker
    }

    /// Color of one pixel at animation step `frame`
    pub fn texel(&self, x: u32, y: u32, frame: u32) -> u16 {
        if let Some((mx, my)) = self.marker {
            if x.abs_diff(mx) <= MARKER_RADIUS && y.abs_diff(my) <= MARKER_RADIUS {
                return pack_rgb565(255, 128, 0);
            }
        }

        let bar_width = (self.width / BAR_COLORS.len() as u32).max(1);
        let bar = ((x + frame) / bar_width) as usize % BAR_COLORS.len();
        let (r, g, b) = BAR_COLORS[bar];

        // darken toward the bottom so orientation is obvious
        let shade = 255 - (y * 192 / self.height.max(1)) as u8;
        let scale = |c: u8| (u16::from(c) * u16::from(shade) / 255) as u8;
        pack_rgb565(scale(r), scale(g), scale(b))
    }

    /// Fill a row-major buffer with `pitch` bytes per row
    pub fn draw(&self, pixels: &mut [u8], pitch: usize, frame: u32) {
        for (y, row) in pixels.chunks_exact_mut(pitch).take(self.height as usize).enumerate() {
            for (x, texel) in row.chunks_exact_mut(2).take(self.width as usize).enumerate() {
                let value = self.texel(x as u32, y as u32, frame);
                texel.copy_from_slice(&value.to_ne_bytes());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_bar_is_white_at_top() {
        let pattern = Pattern::new(320, 240);
        assert_eq!(pattern.texel(0, 0, 0), 0xFFFF);
    }

    #[test]
    fn test_bars_scroll_with_frame() {
        let pattern = Pattern::new(320, 240);
        assert_ne!(pattern.texel(0, 0, 0), pattern.texel(0, 0, 40));
        assert_eq!(pattern.texel(0, 0, 40), pattern.texel(40, 0, 0));
    }

    #[test]
    fn test_marker_bounds() {
        let mut pattern = Pattern::new(320, 240);
        pattern.set_marker(10, 20);
        assert_eq!(pattern.marker(), Some((10, 20)));
        assert_eq!(pattern.texel(10, 20, 0), pack_rgb565(255, 128, 0));

        pattern.set_marker(-1, 20);
        assert_eq!(pattern.marker(), None);
        pattern.set_marker(320, 0);
        assert_eq!(pattern.marker(), None);
    }

    #[test]
    fn test_draw_fills_rows_within_pitch() {
        let pattern = Pattern::new(4, 2);
        // pitch wider than the row; padding must stay untouched
        let mut pixels = vec![0xAAu8; 10 * 2];
        pattern.draw(&mut pixels, 10, 0);
        assert_eq!(&pixels[8..10], &[0xAA, 0xAA]);
        assert_eq!(u16::from_ne_bytes([pixels[0], pixels[1]]), pattern.texel(0, 0, 0));
    }
}
