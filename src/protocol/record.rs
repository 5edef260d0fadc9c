//! Fixed-length binary plate record
//!
//! ```text
//! ┌─────────┬──────────────────────────┬──────────┐
//! │ glyph   │ plate (ASCII, NUL-padded)│ decision │
//! │ 1 byte  │ 7 bytes                  │ 1 byte   │
//! └─────────┴──────────────────────────┴──────────┘
//! ```
//!
//! The glyph byte selects a region glyph (0-35, `0xFF` when the sender had
//! none). The decision byte is 31 (deny) or 32 (allow).

use super::constants::{
    GLYPH_NONE, MAX_REGION_GLYPH, OFFSET_DECISION, OFFSET_GLYPH, OFFSET_PLATE, RECORD_LEN,
};
use crate::core::types::{MAX_PLATE_CHARS, PlateRecord, PlateText};

impl PlateRecord {
    /// Parse a complete binary frame
    pub fn from_frame(frame: &[u8; RECORD_LEN]) -> Self {
        let glyph = frame[OFFSET_GLYPH];
        Self {
            glyph_index: (glyph <= MAX_REGION_GLYPH).then_some(glyph),
            province: String::new(),
            plate: PlateText::from_field(&frame[OFFSET_PLATE..OFFSET_DECISION]),
            decision_index: frame[OFFSET_DECISION],
        }
    }

    /// Encode as a binary frame (plate NUL-padded to 7 bytes)
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut frame = [0u8; RECORD_LEN];
        frame[OFFSET_GLYPH] = self.glyph_index.unwrap_or(GLYPH_NONE);
        let plate = self.plate.as_bytes();
        let len = plate.len().min(MAX_PLATE_CHARS);
        frame[OFFSET_PLATE..OFFSET_PLATE + len].copy_from_slice(&plate[..len]);
        frame[OFFSET_DECISION] = self.decision_index;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::DECISION_ALLOW;

    #[test]
    fn test_from_frame() {
        let frame = [5, b'A', b'B', b'1', b'2', b'3', 0, 0, 32];
        let record = PlateRecord::from_frame(&frame);
        assert_eq!(record.glyph_index, Some(5));
        assert_eq!(record.plate.as_str(), "AB123");
        assert_eq!(record.decision_index, 32);
        assert!(record.province.is_empty());
    }

    #[test]
    fn test_unmapped_glyph_byte() {
        let frame = [GLYPH_NONE, b'Z', 0, 0, 0, 0, 0, 0, 31];
        let record = PlateRecord::from_frame(&frame);
        assert_eq!(record.glyph_index, None);
        assert_eq!(record.plate.as_str(), "Z");
    }

    #[test]
    fn test_to_bytes_pads_plate() {
        let record = PlateRecord {
            glyph_index: Some(19),
            province: String::new(),
            plate: PlateText::from_text("B12345"),
            decision_index: DECISION_ALLOW,
        };
        assert_eq!(
            record.to_bytes(),
            [19, b'B', b'1', b'2', b'3', b'4', b'5', 0, DECISION_ALLOW]
        );
    }
}
