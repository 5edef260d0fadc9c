//! Display that writes to the log
//!
//! Used on hosts without a panel. Keeps a text shadow of what is on screen,
//! one line per 8-pixel page, so the log shows whole lines rather than
//! individual draw calls.

use crate::drivers::display::{DISPLAY_PAGES, DISPLAY_WIDTH};
use crate::drivers::{DisplayDriver, Font};
use crate::error::{Error, Result};
use crate::protocol::glyphs::glyph_char;

/// Text shadow of the panel
pub struct LogDisplay {
    /// Per page: (x, content) segments in draw order
    pages: Vec<Vec<(u8, String)>>,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new(); DISPLAY_PAGES as usize],
        }
    }

    /// Current screen, one string per page that has content
    pub fn snapshot(&self) -> Vec<(u8, String)> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, segments)| !segments.is_empty())
            .map(|(page, _)| (page as u8, self.line(page)))
            .collect()
    }

    fn line(&self, page: usize) -> String {
        let mut segments = self.pages[page].clone();
        // Later draws at the same column replace earlier ones
        segments.reverse();
        segments.sort_by_key(|(x, _)| *x);
        segments.dedup_by_key(|(x, _)| *x);
        segments
            .into_iter()
            .map(|(_, s)| s)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn put(&mut self, x: u8, y: u8, content: String) -> Result<()> {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_PAGES {
            return Err(Error::Display(format!(
                "draw origin ({}, {}) is off the panel",
                x, y
            )));
        }
        self.pages[y as usize].push((x, content));
        log::info!("[display] p{}: {}", y, self.line(y as usize));
        Ok(())
    }
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayDriver for LogDisplay {
    fn clear(&mut self, fill: u8) -> Result<()> {
        self.pages.iter_mut().for_each(Vec::clear);
        log::debug!("[display] clear 0x{:02X}", fill);
        Ok(())
    }

    fn draw_glyph(&mut self, x: u8, y: u8, glyph: u8) -> Result<()> {
        let shown = match glyph_char(glyph) {
            Some(c) => c.to_string(),
            None => format!("#{}", glyph),
        };
        self.put(x, y, shown)
    }

    fn draw_text(&mut self, x: u8, y: u8, text: &str, font: Font) -> Result<()> {
        let fitted: String = text.chars().take(font.chars_from(x)).collect();
        self.put(x, y, fitted)
    }
}
