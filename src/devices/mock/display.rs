//! Mock pixel display

use super::{DeviceCall, DeviceLog};
use crate::drivers::display::{DISPLAY_PAGES, DISPLAY_WIDTH};
use crate::drivers::{DisplayDriver, Font};
use crate::error::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Records draw calls instead of driving a panel
#[derive(Clone)]
pub struct MockDisplay {
    log: DeviceLog,
    failing: Arc<AtomicBool>,
}

impl MockDisplay {
    pub fn new(log: DeviceLog) -> Self {
        Self {
            log,
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent call fail (after it is recorded)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    fn record(&self, call: DeviceCall) -> Result<()> {
        self.log.record(call);
        if self.failing.load(Ordering::Relaxed) {
            return Err(Error::Display("injected failure".to_string()));
        }
        Ok(())
    }
}

fn check_origin(x: u8, y: u8) -> Result<()> {
    if x >= DISPLAY_WIDTH || y >= DISPLAY_PAGES {
        return Err(Error::InvalidParameter(format!(
            "draw origin ({}, {}) is off the panel",
            x, y
        )));
    }
    Ok(())
}

impl DisplayDriver for MockDisplay {
    fn clear(&mut self, fill: u8) -> Result<()> {
        self.record(DeviceCall::Clear(fill))
    }

    fn draw_glyph(&mut self, x: u8, y: u8, glyph: u8) -> Result<()> {
        check_origin(x, y)?;
        self.record(DeviceCall::Glyph { x, y, glyph })
    }

    fn draw_text(&mut self, x: u8, y: u8, text: &str, font: Font) -> Result<()> {
        check_origin(x, y)?;
        self.record(DeviceCall::Text {
            x,
            y,
            text: text.to_string(),
            font,
        })
    }
}
