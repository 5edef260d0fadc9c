//! Core data types shared by the decoder and the gate controller.
//!
//! - [`GateState`]: barrier position as last commanded (open-loop)
//! - [`PlateText`]: sanitized plate string, printable ASCII only
//! - [`PlateRecord`]: one plate decision as received from the peer
//! - [`Command`]: decoded datagram, input to the gate controller

use std::fmt;

/// Maximum plate characters after the region glyph
pub const MAX_PLATE_CHARS: usize = 7;

/// Barrier position as last commanded
///
/// There is no position feedback from the actuator, so this is the state the
/// controller *asked for*, not a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// Barrier lowered
    Closed,
    /// Barrier raised
    Open,
    /// Actuator centered
    Neutral,
    /// No command applied since start
    #[default]
    Unknown,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GateState::Closed => "CLOSED",
            GateState::Open => "OPEN",
            GateState::Neutral => "NEUTRAL",
            GateState::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Plate string restricted to printable ASCII, at most [`MAX_PLATE_CHARS`] long
///
/// The only way to build one is through the sanitizing constructors, so a
/// `PlateText` can be drawn on the display or echoed in an ACK as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlateText(String);

impl PlateText {
    /// Empty plate (legacy free-text commands carry no plate)
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Build from a fixed-width wire field
    ///
    /// The field ends at the first non-printable byte (NUL padding included);
    /// trailing spaces from space-padded senders are dropped.
    pub fn from_field(field: &[u8]) -> Self {
        let text: String = field
            .iter()
            .take(MAX_PLATE_CHARS)
            .take_while(|&&b| is_printable(b))
            .map(|&b| b as char)
            .collect();
        Self(text.trim_end().to_string())
    }

    /// Build from free text, keeping printable ASCII characters only
    pub fn from_text(text: &str) -> Self {
        let text: String = text
            .trim()
            .bytes()
            .filter(|&b| is_printable(b))
            .take(MAX_PLATE_CHARS)
            .map(|b| b as char)
            .collect();
        Self(text.trim_end().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlateText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Printable ASCII (space through tilde)
#[inline]
pub fn is_printable(b: u8) -> bool {
    (0x20..=0x7E).contains(&b)
}

/// Replace anything non-printable with `?` so untrusted text can be drawn
pub fn sanitize_text(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii() && is_printable(c as u8) { c } else { '?' })
        .collect()
}

/// One plate decision received from the peer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlateRecord {
    /// Region glyph (0-35), `None` when the sender's province could not be mapped
    pub glyph_index: Option<u8>,
    /// Province field of a text record as sent (trimmed only), empty for binary records
    pub province: String,
    /// Sanitized plate remainder
    pub plate: PlateText,
    /// Decision byte as sent (31 deny, 32 allow, anything else preserved)
    pub decision_index: u8,
}

impl PlateRecord {
    /// Record with no plate, used by legacy free-text commands
    pub fn empty(decision_index: u8) -> Self {
        Self {
            glyph_index: None,
            province: String::new(),
            plate: PlateText::empty(),
            decision_index,
        }
    }
}

/// Decoded inbound datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Raise the barrier for this plate
    Allow(PlateRecord),
    /// Keep the barrier lowered for this plate
    Deny(PlateRecord),
    /// Center the actuator
    Stop,
    /// Well-formed but unrecognised, or undecodable
    ///
    /// `record` is set when a binary frame carried an unknown decision byte,
    /// so the plate can still be shown.
    Unknown {
        raw: String,
        record: Option<PlateRecord>,
    },
}

impl Command {
    /// Unknown command from text alone
    pub fn unknown(raw: impl Into<String>) -> Self {
        Command::Unknown {
            raw: raw.into(),
            record: None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Allow(_) => "Allow",
            Command::Deny(_) => "Deny",
            Command::Stop => "Stop",
            Command::Unknown { .. } => "Unknown",
        }
    }

    /// Plate record carried by this command, if any
    pub fn record(&self) -> Option<&PlateRecord> {
        match self {
            Command::Allow(record) | Command::Deny(record) => Some(record),
            Command::Unknown { record, .. } => record.as_ref(),
            Command::Stop => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_field_stops_at_padding() {
        let plate = PlateText::from_field(b"AB123\0\0");
        assert_eq!(plate.as_str(), "AB123");
    }

    #[test]
    fn test_plate_field_stops_at_first_control_byte() {
        // Garbage after the terminator must not leak into the plate
        let plate = PlateText::from_field(&[b'X', b'Y', 0x00, b'Z', 0xFF, b'Q', b'R']);
        assert_eq!(plate.as_str(), "XY");

        let plate = PlateText::from_field(&[b'A', 0x07, b'B']);
        assert_eq!(plate.as_str(), "A");
    }

    #[test]
    fn test_plate_field_drops_space_padding() {
        let plate = PlateText::from_field(b"B12345 ");
        assert_eq!(plate.as_str(), "B12345");
    }

    #[test]
    fn test_plate_field_is_bounded() {
        let plate = PlateText::from_field(b"ABCDEFGHIJ");
        assert_eq!(plate.len(), MAX_PLATE_CHARS);
        assert_eq!(plate.as_str(), "ABCDEFG");
    }

    #[test]
    fn test_plate_text_filters_non_ascii() {
        let plate = PlateText::from_text("  粤B·12345  ");
        assert_eq!(plate.as_str(), "B12345");
        assert!(plate.as_bytes().iter().all(|&b| is_printable(b)));
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("ok\x01\u{7f}é"), "ok???");
        assert_eq!(sanitize_text("hello"), "hello");
    }

    #[test]
    fn test_gate_state_default_is_unknown() {
        assert_eq!(GateState::default(), GateState::Unknown);
        assert_eq!(GateState::Open.to_string(), "OPEN");
    }

    #[test]
    fn test_command_record_access() {
        let record = PlateRecord::empty(32);
        assert_eq!(Command::Allow(record.clone()).record(), Some(&record));
        assert_eq!(Command::Stop.record(), None);
        assert_eq!(Command::unknown("x").record(), None);
        assert_eq!(Command::unknown("x").name(), "Unknown");
    }
}
