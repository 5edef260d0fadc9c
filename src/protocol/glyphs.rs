//! Region glyph table
//!
//! The display firmware carries 16x16 glyphs for the 31 province
//! abbreviations (indices 0-30) and the three status characters used by
//! decisions. Senders and this client must agree on the numbering.

use super::constants::{DECISION_ALLOW, DECISION_DENY, GLYPH_ACTION, MAX_REGION_GLYPH};

/// Glyph table in index order
const GLYPHS: [char; 34] = [
    '京', '沪', '津', '渝', '冀', '晋', '蒙', '辽', // 0-7
    '吉', '黑', '苏', '浙', '皖', '闽', '赣', '鲁', // 8-15
    '豫', '鄂', '湘', '粤', '桂', '琼', '川', '贵', // 16-23
    '云', '藏', '陕', '甘', '青', '宁', '新', // 24-30
    '禁', '通', '行', // 31-33: status glyphs
];

/// Number of province glyphs at the start of the table
const PROVINCE_GLYPHS: usize = 31;

/// Glyph index for a province character
pub fn glyph_for(c: char) -> Option<u8> {
    GLYPHS[..PROVINCE_GLYPHS]
        .iter()
        .position(|&g| g == c)
        .map(|i| i as u8)
}

/// Character drawn by a glyph index, if the table has one
pub fn glyph_char(index: u8) -> Option<char> {
    GLYPHS.get(index as usize).copied()
}

/// Map a text record's province field to a glyph index
///
/// Accepts either the numeric glyph index (`"12"`) or the province
/// character itself (`"皖"`). Status glyphs are not valid provinces.
pub fn province_glyph(province: &str) -> Option<u8> {
    let province = province.trim();
    if let Ok(index) = province.parse::<u8>() {
        return (index <= MAX_REGION_GLYPH).then_some(index);
    }
    let mut chars = province.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => glyph_for(c),
        _ => None,
    }
}

/// Label for a decision byte in logs
pub fn decision_label(decision: u8) -> &'static str {
    match decision {
        DECISION_ALLOW => "ALLOW",
        DECISION_DENY => "DENY",
        GLYPH_ACTION => "ACTION",
        _ => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_glyph_positions() {
        assert_eq!(glyph_char(DECISION_DENY), Some('禁'));
        assert_eq!(glyph_char(DECISION_ALLOW), Some('通'));
        assert_eq!(glyph_char(GLYPH_ACTION), Some('行'));
        assert_eq!(glyph_char(34), None);
    }

    #[test]
    fn test_province_lookup() {
        assert_eq!(glyph_for('京'), Some(0));
        assert_eq!(glyph_for('粤'), Some(19));
        assert_eq!(glyph_for('新'), Some(30));
        // Status characters are not provinces
        assert_eq!(glyph_for('通'), None);
    }

    #[test]
    fn test_province_field_mapping() {
        assert_eq!(province_glyph("12"), Some(12));
        assert_eq!(province_glyph(" 5 "), Some(5));
        assert_eq!(province_glyph("35"), Some(35));
        assert_eq!(province_glyph("36"), None);
        assert_eq!(province_glyph("粤"), Some(19));
        assert_eq!(province_glyph("粤B"), None);
        assert_eq!(province_glyph(""), None);
    }
}
