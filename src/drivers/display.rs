//! Pixel display driver trait
//!
//! Models a 128x64 monochrome panel addressed the way SSD1306 controllers
//! are: `x` in pixel columns, `y` in 8-pixel pages.

use crate::error::Result;

/// Panel width in pixels
pub const DISPLAY_WIDTH: u8 = 128;

/// Panel height in 8-pixel pages
pub const DISPLAY_PAGES: u8 = 8;

/// Width of a 16x16 region/status glyph including 2px spacing
pub const GLYPH_ADVANCE: u8 = 18;

/// Text fonts available on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// 6x8 pixels, one page tall
    Font6x8,
    /// 8x16 pixels, two pages tall
    Font8x16,
}

impl Font {
    /// Character advance in pixels
    pub const fn char_width(self) -> u8 {
        match self {
            Font::Font6x8 => 6,
            Font::Font8x16 => 8,
        }
    }

    /// Character height in pages
    pub const fn pages(self) -> u8 {
        match self {
            Font::Font6x8 => 1,
            Font::Font8x16 => 2,
        }
    }

    /// How many characters fit between `x` and the right edge
    pub const fn chars_from(self, x: u8) -> usize {
        if x >= DISPLAY_WIDTH {
            return 0;
        }
        ((DISPLAY_WIDTH - x) / self.char_width()) as usize
    }
}

/// Display driver trait
///
/// Drawing only overwrites the pixels a glyph covers, so stale content stays
/// visible until [`clear`](DisplayDriver::clear) is called.
pub trait DisplayDriver: Send {
    /// Fill the whole panel with `fill` (0x00 blank, 0xFF lit)
    fn clear(&mut self, fill: u8) -> Result<()>;

    /// Draw a 16x16 glyph from the glyph table
    fn draw_glyph(&mut self, x: u8, y: u8, glyph: u8) -> Result<()>;

    /// Draw ASCII text
    fn draw_text(&mut self, x: u8, y: u8, text: &str, font: Font) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_capacity() {
        assert_eq!(Font::Font8x16.chars_from(0), 16);
        assert_eq!(Font::Font8x16.chars_from(18), 13);
        assert_eq!(Font::Font6x8.chars_from(0), 21);
        assert_eq!(Font::Font6x8.chars_from(200), 0);
    }
}
