//! Gate controller
//!
//! Applies decoded commands to the actuator and the display and tracks the
//! commanded barrier position.
//!
//! | Command | Actuator | Next state | Screen | ACK text |
//! |---------|----------|------------|--------|----------|
//! | Allow   | `open`   | Open       | plate + 通行 ALLOW | plate |
//! | Deny    | `close`  | Closed     | plate + 禁行 DENY  | plate |
//! | Stop    | `neutral`| Neutral    | STOP   | `STOP` |
//! | Unknown | none     | unchanged  | ERROR + raw text | none |
//!
//! The actuator always moves before the screen changes, and the screen is
//! always cleared before drawing. Driver failures are logged; the state
//! still advances because there is no position feedback to contradict it.

pub mod render;

use crate::core::types::{Command, GateState, PlateRecord};
use crate::drivers::{ActuatorDriver, DisplayDriver};
use crate::error::Result;
use crate::protocol::glyphs::glyph_char;
pub use render::{BANNER_CONNECTING, BANNER_DISCONNECTED, DrawOp, Frame};

/// Result of applying one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// State before the command
    pub previous: GateState,
    /// State after the command
    pub state: GateState,
    /// Text to acknowledge as displayed, `None` when no ACK is due
    pub ack: Option<String>,
}

/// Driver error counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub commands: u64,
    pub actuator_errors: u64,
    pub display_errors: u64,
}

/// Next commanded state; unknown commands leave it unchanged
pub fn next_state(current: GateState, command: &Command) -> GateState {
    match command {
        Command::Allow(_) => GateState::Open,
        Command::Deny(_) => GateState::Closed,
        Command::Stop => GateState::Neutral,
        Command::Unknown { .. } => current,
    }
}

/// Text reported back as displayed
///
/// Legacy commands carry no plate, so their label stands in for it.
pub fn ack_text(command: &Command) -> Option<String> {
    match command {
        Command::Allow(record) => Some(plate_or(record, "ALLOW")),
        Command::Deny(record) => Some(plate_or(record, "DENY")),
        Command::Stop => Some("STOP".to_string()),
        Command::Unknown { .. } => None,
    }
}

fn plate_or(record: &PlateRecord, label: &str) -> String {
    if record.plate.is_empty() {
        label.to_string()
    } else {
        record.plate.as_str().to_string()
    }
}

/// Owns the output devices and the commanded gate state
pub struct GateController {
    actuator: Box<dyn ActuatorDriver>,
    display: Box<dyn DisplayDriver>,
    state: GateState,
    stats: ControllerStats,
}

impl GateController {
    pub fn new(actuator: Box<dyn ActuatorDriver>, display: Box<dyn DisplayDriver>) -> Self {
        Self {
            actuator,
            display,
            state: GateState::Unknown,
            stats: ControllerStats::default(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Actuate, update state, then render
    pub fn apply(&mut self, command: &Command) -> Outcome {
        let previous = self.state;
        self.stats.commands += 1;

        let moved = match command {
            Command::Allow(_) => Some(("open", self.actuator.open())),
            Command::Deny(_) => Some(("close", self.actuator.close())),
            Command::Stop => Some(("neutral", self.actuator.neutral())),
            Command::Unknown { .. } => None,
        };
        if let Some((action, Err(e))) = moved {
            self.stats.actuator_errors += 1;
            log::error!("{} {} failed: {}", self.actuator.name(), action, e);
        }

        self.state = next_state(previous, command);
        self.render(&Frame::for_command(command));

        match command {
            Command::Unknown { raw, .. } => {
                log::warn!("Unknown command {:?}, gate stays {}", raw, self.state)
            }
            _ => log::info!(
                "{}{} -> {} (was {})",
                command.name(),
                describe_record(command.record()),
                self.state,
                previous
            ),
        }

        Outcome {
            previous,
            state: self.state,
            ack: ack_text(command),
        }
    }

    /// Replace the screen with a one-line banner
    pub fn show_banner(&mut self, text: &str) {
        self.render(&Frame::banner(text));
    }

    /// Clear the panel and draw `frame`, logging failed draw calls
    ///
    /// Returns whether every call succeeded.
    pub fn render(&mut self, frame: &Frame) -> bool {
        let cleared = self.display.clear(0x00);
        let mut ok = self.check_display(cleared);
        for op in frame.ops() {
            let result = match op {
                DrawOp::Glyph { x, y, glyph } => self.display.draw_glyph(*x, *y, *glyph),
                DrawOp::Text { x, y, text, font } => self.display.draw_text(*x, *y, text, *font),
            };
            ok &= self.check_display(result);
        }
        ok
    }

    fn check_display(&mut self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.stats.display_errors += 1;
                log::error!("Display draw failed: {}", e);
                false
            }
        }
    }
}

fn describe_record(record: Option<&PlateRecord>) -> String {
    let Some(record) = record else {
        return String::new();
    };
    let region = record
        .glyph_index
        .and_then(glyph_char)
        .map(String::from)
        .unwrap_or_else(|| record.province.clone());
    if record.plate.is_empty() && region.is_empty() {
        return String::new();
    }
    format!(" [{}{}]", region, record.plate)
}
