//! Test display that allows pixel overdraw.
//!
//! `MockDisplay` from embedded-graphics panics when a pixel is drawn twice,
//! which doesn't work for screens that clear backgrounds then draw on top.
//! This simple framebuffer also counts presented frames so tests can check
//! how often the browser repainted.

use std::vec;
use std::vec::Vec;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use crate::render::Screen;

/// Simple framebuffer display for tests that allows overdraw.
pub struct TestDisplay {
    pixels: Vec<BinaryColor>,
    width: u32,
    height: u32,
    presented: usize,
}

impl TestDisplay {
    /// Create a new test display with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![BinaryColor::Off; (width * height) as usize],
            width,
            height,
            presented: 0,
        }
    }

    /// Create a display matching the 128x64 OLED.
    pub fn default_size() -> Self {
        Self::new(crate::DISPLAY_WIDTH, crate::DISPLAY_HEIGHT)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[BinaryColor] {
        &self.pixels
    }

    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    pub fn black_pixel_count(&self) -> usize {
        self.pixels
            .iter()
            .filter(|&&pixel| pixel == BinaryColor::On)
            .count()
    }

    /// Number of `present` calls so far
    pub fn presented_frames(&self) -> usize {
        self.presented
    }
}

impl DrawTarget for TestDisplay {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as u32) < self.width
                && (coord.y as u32) < self.height
            {
                let idx = (coord.y as u32 * self.width + coord.x as u32) as usize;
                self.pixels[idx] = color;
            }
        }
        Ok(())
    }
}

impl OriginDimensions for TestDisplay {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Screen for TestDisplay {
    fn present(&mut self) -> Result<(), Self::Error> {
        self.presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_display_allows_overdraw() {
        let mut display = TestDisplay::new(10, 10);

        // Draw white background
        Rectangle::new(Point::new(0, 0), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut display)
            .unwrap();

        // Draw black on top - should not panic
        Rectangle::new(Point::new(0, 0), Size::new(5, 5))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut display)
            .unwrap();

        assert_eq!(display.black_pixel_count(), 25);
        assert_eq!(display.pixel(Point::new(4, 4)), Some(BinaryColor::On));
        assert_eq!(display.pixel(Point::new(5, 5)), Some(BinaryColor::Off));
        assert_eq!(display.pixel(Point::new(10, 0)), None);
    }

    #[test]
    fn test_display_default_size() {
        let display = TestDisplay::default_size();
        assert_eq!(display.size(), Size::new(128, 64));
        assert_eq!(display.presented_frames(), 0);
    }
}
