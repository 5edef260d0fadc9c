//! Mock devices for hardware-free runs and tests
//!
//! Both mocks append to one shared [`DeviceLog`], so the relative order of
//! actuator moves and draw calls can be checked:
//!
//! ```text
//! MockActuator ──┐
//!                ├──▶ DeviceLog [Open, Clear(0), Glyph, Text, ...]
//! MockDisplay  ──┘
//! ```
//!
//! Mocks are `Clone` and clones share state, so a test keeps one handle
//! while the controller owns the boxed other. Failure injection flips a
//! shared flag on that handle.

mod actuator;
mod display;

pub use actuator::MockActuator;
pub use display::MockDisplay;

use crate::drivers::Font;
use parking_lot::Mutex;
use std::sync::Arc;

/// One recorded device call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Open,
    Close,
    Neutral,
    Clear(u8),
    Glyph { x: u8, y: u8, glyph: u8 },
    Text { x: u8, y: u8, text: String, font: Font },
}

impl DeviceCall {
    pub fn is_actuation(&self) -> bool {
        matches!(self, DeviceCall::Open | DeviceCall::Close | DeviceCall::Neutral)
    }
}

/// Shared, ordered call log
#[derive(Debug, Clone, Default)]
pub struct DeviceLog {
    calls: Arc<Mutex<Vec<DeviceCall>>>,
}

impl DeviceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: DeviceCall) {
        self.calls.lock().push(call);
    }

    /// Every call so far, oldest first
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.lock().clone()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<DeviceCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    /// Actuator calls only
    pub fn actuations(&self) -> Vec<DeviceCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.is_actuation())
            .cloned()
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, DeviceCall::Clear(_)))
            .count()
    }

    /// Draw calls after the most recent clear
    pub fn last_frame(&self) -> Vec<DeviceCall> {
        let calls = self.calls.lock();
        let start = calls
            .iter()
            .rposition(|c| matches!(c, DeviceCall::Clear(_)))
            .map_or(0, |i| i + 1);
        calls[start..]
            .iter()
            .filter(|c| !c.is_actuation())
            .cloned()
            .collect()
    }

    /// Text drawn after the most recent clear
    pub fn last_frame_texts(&self) -> Vec<String> {
        self.last_frame()
            .into_iter()
            .filter_map(|c| match c {
                DeviceCall::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}
