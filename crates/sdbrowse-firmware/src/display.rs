//! SSD1306 128x64 OLED behind the browser's `Screen` trait.

use display_interface::DisplayError;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use sdbrowse_ui::Screen;
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

type Panel<I2C> = Ssd1306<
    I2CInterface<I2C>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// Draws into the driver's frame buffer; `present` flushes it over I2C.
pub struct OledScreen<I2C> {
    panel: Panel<I2C>,
}

impl<I2C: embedded_hal::i2c::I2c> OledScreen<I2C> {
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        Self { panel }
    }

    /// Reset the controller and blank the panel
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.panel.init()?;
        self.panel.clear_buffer();
        self.panel.flush()
    }
}

impl<I2C: embedded_hal::i2c::I2c> DrawTarget for OledScreen<I2C> {
    type Color = BinaryColor;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.panel.draw_iter(pixels)
    }
}

impl<I2C: embedded_hal::i2c::I2c> OriginDimensions for OledScreen<I2C> {
    fn size(&self) -> Size {
        self.panel.size()
    }
}

impl<I2C: embedded_hal::i2c::I2c> Screen for OledScreen<I2C> {
    fn present(&mut self) -> Result<(), Self::Error> {
        self.panel.flush()
    }
}
