//! Screen layouts for each command
//!
//! A [`Frame`] is the list of draw calls for one screen. Every frame is
//! drawn on a freshly cleared panel.
//!
//! ```text
//! Allow / Deny                      Unknown
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │ [粤] AB12345             │ p0   │ ERROR                    │ p0
//! │ [通][行] ALLOW           │ p2   │ raw text (6x8, 2 lines)  │ p2
//! │                          │      │ [粤] AB12345 (if record) │ p4
//! └──────────────────────────┘      └──────────────────────────┘
//! ```

use crate::core::types::{Command, PlateRecord};
use crate::drivers::display::{DISPLAY_PAGES, GLYPH_ADVANCE};
use crate::drivers::Font;
use crate::protocol::constants::{DECISION_ALLOW, DECISION_DENY, GLYPH_ACTION};

/// Banner shown while waiting for the first decision
pub const BANNER_CONNECTING: &str = "Connecting";

/// Banner shown after the session ends
pub const BANNER_DISCONNECTED: &str = "Disconnected";

/// Stop screen text
pub const STOP_TEXT: &str = "STOP";

/// Heading of the unknown-command screen
pub const ERROR_TEXT: &str = "ERROR";

/// Column of the ALLOW/DENY label, right of the two status glyphs
const LABEL_X: u8 = 40;

/// Lines of raw text shown on the unknown-command screen
const RAW_TEXT_LINES: u8 = 2;

/// One draw call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Glyph { x: u8, y: u8, glyph: u8 },
    Text { x: u8, y: u8, text: String, font: Font },
}

/// Draw calls for one screen, applied after a clear
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    ops: Vec<DrawOp>,
}

impl Frame {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Layout for a decoded command
    pub fn for_command(command: &Command) -> Self {
        let mut frame = Frame::default();
        match command {
            Command::Allow(record) => frame.decision(record, DECISION_ALLOW, "ALLOW"),
            Command::Deny(record) => frame.decision(record, DECISION_DENY, "DENY"),
            Command::Stop => frame.text(0, 0, STOP_TEXT, Font::Font8x16),
            Command::Unknown { raw, record } => {
                frame.text(0, 0, ERROR_TEXT, Font::Font8x16);
                frame.raw_lines(raw);
                if let Some(record) = record {
                    frame.plate_line(record, 4);
                }
            }
        }
        frame
    }

    /// Single line of status text at the top of the panel
    pub fn banner(text: &str) -> Self {
        let mut frame = Frame::default();
        frame.text(0, 0, text, Font::Font8x16);
        frame
    }

    fn decision(&mut self, record: &PlateRecord, status_glyph: u8, label: &str) {
        self.plate_line(record, 0);
        self.glyph(0, 2, status_glyph);
        self.glyph(GLYPH_ADVANCE, 2, GLYPH_ACTION);
        self.text(LABEL_X, 2, label, Font::Font8x16);
    }

    /// Region glyph followed by the plate; the plate moves left when there is no glyph
    fn plate_line(&mut self, record: &PlateRecord, y: u8) {
        let plate_x = match record.glyph_index {
            Some(glyph) => {
                self.glyph(0, y, glyph);
                GLYPH_ADVANCE
            }
            None => 0,
        };
        if !record.plate.is_empty() {
            self.text(plate_x, y, record.plate.as_str(), Font::Font8x16);
        }
    }

    fn raw_lines(&mut self, raw: &str) {
        let per_line = Font::Font6x8.chars_from(0);
        let chars: Vec<char> = raw.chars().collect();
        for (i, line) in chars
            .chunks(per_line)
            .take(RAW_TEXT_LINES as usize)
            .enumerate()
        {
            let line: String = line.iter().collect();
            self.text(0, 2 + i as u8, &line, Font::Font6x8);
        }
    }

    fn glyph(&mut self, x: u8, y: u8, glyph: u8) {
        self.ops.push(DrawOp::Glyph { x, y, glyph });
    }

    /// Queue text clipped to the panel; text that cannot fit at all is skipped
    fn text(&mut self, x: u8, y: u8, text: &str, font: Font) {
        if y + font.pages() > DISPLAY_PAGES {
            return;
        }
        let text: String = text.chars().take(font.chars_from(x)).collect();
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text { x, y, text, font });
    }
}
