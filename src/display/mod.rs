//! The pixel rendering surface boundary.
//!
//! `Surface` is the narrow interface the screen renderers draw through;
//! `Oled` is the production adapter for a 128x64 SSD1306 on I2C. The
//! panel is built into the case upside down, hence Rotate180.

pub mod bitmaps;

use crate::prelude::*;

use embedded_graphics::{
    image::{Image, ImageRaw},
    mono_font::{ascii::FONT_5X8, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use linux_embedded_hal::I2cdev;
use ssd1306::{
    mode::BufferedGraphicsMode, prelude::*, size::DisplaySize128x64, I2CDisplayInterface, Ssd1306,
};

/// Everything a screen renderer needs from the panel. One frame is
/// always clear -> draw -> flush; power gates the whole panel for the
/// idle auto-off timer.
pub trait Surface {
    fn clear(&mut self);
    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<()>;
    /// Draws a 1-bpp bitmap; rows are MSB-first, padded to a byte.
    fn draw_bitmap(&mut self, x: i32, y: i32, width: u32, data: &[u8]) -> Result<()>;
    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()>;
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn power(&mut self, on: bool) -> Result<()>;
}

type Panel = Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

pub struct Oled {
    display: Panel,
}

impl Oled {
    /// Initializes the panel over I2C; `i2c_bus` is typically
    /// "/dev/i2c-1".
    pub fn new(i2c_bus: &str) -> Result<Self> {
        info!("initializing display on {}", i2c_bus);

        let i2c = I2cdev::new(i2c_bus)
            .map_err(|e| anyhow!("failed to open i2c bus {}: {}", i2c_bus, e))?;
        let interface = I2CDisplayInterface::new(i2c);

        let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate180)
            .into_buffered_graphics_mode();

        display
            .init()
            .map_err(|e| anyhow!("display init failed: {:?}", e))?;
        display.clear_buffer();
        display
            .flush()
            .map_err(|e| anyhow!("display flush failed: {:?}", e))?;

        info!("display initialized");

        Ok(Self { display })
    }
}

impl Surface for Oled {
    fn clear(&mut self) {
        self.display.clear_buffer();
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<()> {
        let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.display)
            .map_err(|e| anyhow!("draw_text failed: {:?}", e))?;
        Ok(())
    }

    fn draw_bitmap(&mut self, x: i32, y: i32, width: u32, data: &[u8]) -> Result<()> {
        let raw = ImageRaw::<BinaryColor>::new(data, width);
        Image::new(&raw, Point::new(x, y))
            .draw(&mut self.display)
            .map_err(|e| anyhow!("draw_bitmap failed: {:?}", e))?;
        Ok(())
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(&mut self.display)
            .map_err(|e| anyhow!("draw_rect failed: {:?}", e))?;
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        Rectangle::new(Point::new(x, y), Size::new(width, height))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut self.display)
            .map_err(|e| anyhow!("fill_rect failed: {:?}", e))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.display
            .flush()
            .map_err(|e| anyhow!("display flush failed: {:?}", e))
    }

    fn power(&mut self, on: bool) -> Result<()> {
        self.display
            .set_display_on(on)
            .map_err(|e| anyhow!("display power failed: {:?}", e))
    }
}
