//! Inbound datagram decoder
//!
//! Two wire formats are accepted, tried in a fixed order:
//!
//! 1. **Binary record**: exactly [`RECORD_LEN`] bytes, see [`super::record`].
//!    A 9-byte datagram is always binary, even if it happens to contain
//!    commas or digits.
//! 2. **Delimited text**: `<province>,<plate>,<command>` for senders on the
//!    older text protocol. Without any comma, the legacy free-text keywords
//!    `open` / `close` / `stop` are still honoured.
//!
//! # Command tokens
//!
//! | Token | Exact match | First-char fallback |
//! |-------|-------------|---------------------|
//! | Deny  | `1`, `close` | `1…` |
//! | Allow | `0`, `open`  | `0…` |
//! | Stop  | `2`, `stop`  | `2…` |
//!
//! Matching is case-sensitive. Exact tokens win over the first-character
//! rule, so `"10"` only reaches the fallback (and decodes to Deny).
//!
//! Decoding is pure: no I/O, no shared state.

use super::constants::{DECISION_ALLOW, DECISION_DENY, MAX_DATAGRAM_LEN, RECORD_LEN};
use super::glyphs::{decision_label, province_glyph};
use crate::core::types::{Command, PlateRecord, PlateText, sanitize_text};

/// Why a datagram could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Empty datagram (or only whitespace)
    #[error("datagram too short")]
    TooShort,

    /// Longer than the receive buffer
    #[error("datagram of {len} bytes exceeds {max} byte limit")]
    TooLong { len: usize, max: usize },

    /// Text with exactly one comma
    #[error("delimited record needs province, plate and command fields")]
    MalformedDelimited,

    /// Free text without a known keyword
    #[error("unrecognized token {0:?}")]
    UnrecognizedToken(String),
}

/// Decision named by a command token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Allow,
    Deny,
    Stop,
}

/// Decode one datagram
pub fn decode(buffer: &[u8]) -> Result<Command, DecodeError> {
    if buffer.is_empty() {
        return Err(DecodeError::TooShort);
    }
    if buffer.len() > MAX_DATAGRAM_LEN {
        return Err(DecodeError::TooLong {
            len: buffer.len(),
            max: MAX_DATAGRAM_LEN,
        });
    }

    if let Ok(frame) = <&[u8; RECORD_LEN]>::try_from(buffer) {
        return Ok(decode_binary(frame));
    }

    decode_text(buffer)
}

/// Decode, turning failures into [`Command::Unknown`]
///
/// Undecodable input still has to reach the display as an explicit error,
/// so the raw datagram text (sanitized) becomes the unknown command's text.
/// The error is returned alongside for logging.
pub fn decode_or_unknown(buffer: &[u8]) -> (Command, Option<DecodeError>) {
    match decode(buffer) {
        Ok(cmd) => (cmd, None),
        Err(e) => {
            let shown = &buffer[..buffer.len().min(MAX_DATAGRAM_LEN)];
            let raw = sanitize_text(trim_text(&String::from_utf8_lossy(shown)));
            (Command::unknown(raw), Some(e))
        }
    }
}

fn decode_binary(frame: &[u8; RECORD_LEN]) -> Command {
    let record = PlateRecord::from_frame(frame);
    match record.decision_index {
        DECISION_ALLOW => Command::Allow(record),
        DECISION_DENY => Command::Deny(record),
        other => Command::Unknown {
            raw: format!("{} decision {}", decision_label(other), other),
            record: Some(record),
        },
    }
}

fn decode_text(buffer: &[u8]) -> Result<Command, DecodeError> {
    let text = String::from_utf8_lossy(buffer);
    let text = trim_text(&text);
    if text.is_empty() {
        return Err(DecodeError::TooShort);
    }

    let fields: Vec<&str> = text.split(',').collect();
    match fields.as_slice() {
        [_] => decode_legacy(text),
        [_, _] => Err(DecodeError::MalformedDelimited),
        [province, plate, .., token] => Ok(decode_delimited(province, plate, token)),
        [] => Err(DecodeError::TooShort),
    }
}

fn decode_delimited(province: &str, plate: &str, token: &str) -> Command {
    let token = trim_text(token);
    let province = trim_text(province);
    let record = |decision_index| PlateRecord {
        glyph_index: province_glyph(province),
        province: province.to_string(),
        plate: PlateText::from_text(plate),
        decision_index,
    };

    match match_token(token) {
        Some(Verb::Allow) => Command::Allow(record(DECISION_ALLOW)),
        Some(Verb::Deny) => Command::Deny(record(DECISION_DENY)),
        Some(Verb::Stop) => Command::Stop,
        None => Command::unknown(sanitize_text(token)),
    }
}

/// Free text without commas from the earliest senders
fn decode_legacy(text: &str) -> Result<Command, DecodeError> {
    if text.contains("open") {
        Ok(Command::Allow(PlateRecord::empty(DECISION_ALLOW)))
    } else if text.contains("close") {
        Ok(Command::Deny(PlateRecord::empty(DECISION_DENY)))
    } else if text.contains("stop") {
        Ok(Command::Stop)
    } else {
        Err(DecodeError::UnrecognizedToken(sanitize_text(text)))
    }
}

fn match_token(token: &str) -> Option<Verb> {
    match token {
        "1" | "close" => return Some(Verb::Deny),
        "0" | "open" => return Some(Verb::Allow),
        "2" | "stop" => return Some(Verb::Stop),
        _ => {}
    }
    match token.as_bytes().first() {
        Some(b'1') => Some(Verb::Deny),
        Some(b'0') => Some(Verb::Allow),
        Some(b'2') => Some(Verb::Stop),
        _ => None,
    }
}

fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c.is_control())
}

/// Whether a datagram is a peer acknowledgment (`ACK:...`) rather than a command
///
/// The server answers heartbeats with `ACK:SERVER_READY`; those are control
/// traffic and must not reach the display. A [`RECORD_LEN`]-byte datagram is
/// always a binary record, even when its glyph byte happens to be `A`.
pub fn is_peer_ack(buffer: &[u8]) -> bool {
    buffer.len() != RECORD_LEN && buffer.starts_with(super::constants::ACK_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::GLYPH_ACTION;

    fn allow_record(cmd: Command) -> PlateRecord {
        match cmd {
            Command::Allow(record) => record,
            other => panic!("expected Allow, got {:?}", other),
        }
    }

    fn deny_record(cmd: Command) -> PlateRecord {
        match cmd {
            Command::Deny(record) => record,
            other => panic!("expected Deny, got {:?}", other),
        }
    }

    // ------------------------------------------------------------------
    // Binary record
    // ------------------------------------------------------------------

    #[test]
    fn test_binary_allow() {
        let buf = [5, b'A', b'B', b'1', b'2', b'3', 0, 0, 32];
        let record = allow_record(decode(&buf).unwrap());
        assert_eq!(record.glyph_index, Some(5));
        assert_eq!(record.plate.as_str(), "AB123");
        assert_eq!(record.decision_index, 32);
    }

    #[test]
    fn test_binary_deny() {
        let buf = [19, b'B', b'6', b'6', b'8', b'8', b'8', 0, 31];
        let record = deny_record(decode(&buf).unwrap());
        assert_eq!(record.glyph_index, Some(19));
        assert_eq!(record.plate.as_str(), "B66888");
    }

    #[test]
    fn test_binary_action_glyph_is_not_a_decision() {
        let buf = [0, b'A', b'1', 0, 0, 0, 0, 0, GLYPH_ACTION];
        match decode(&buf).unwrap() {
            Command::Unknown { raw, record } => {
                assert_eq!(raw, "ACTION decision 33");
                let record = record.expect("record preserved");
                assert_eq!(record.plate.as_str(), "A1");
                assert_eq!(record.decision_index, GLYPH_ACTION);
            }
            other => panic!("expected Unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_ignores_commas() {
        // Looks like a delimited "deny" record but is 9 bytes long
        let buf = b"1,AB12,01";
        assert_eq!(buf.len(), RECORD_LEN);
        match decode(buf).unwrap() {
            Command::Unknown { record, .. } => {
                let record = record.expect("binary record");
                assert_eq!(record.glyph_index, None); // '1' = 0x31 > 35
                assert_eq!(record.plate.as_str(), ",AB12,0");
                assert_eq!(record.decision_index, b'1');
            }
            other => panic!("expected binary Unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_plate_sanitized() {
        let buf = [3, b'K', b'9', 0x00, 0xFE, b'X', 0x1B, b'Y', 32];
        let record = allow_record(decode(&buf).unwrap());
        assert_eq!(record.plate.as_str(), "K9");
    }

    // ------------------------------------------------------------------
    // Delimited text
    // ------------------------------------------------------------------

    #[test]
    fn test_delimited_close() {
        let record = deny_record(decode(b"12,AB1234,close\n").unwrap());
        assert_eq!(record.province, "12");
        assert_eq!(record.glyph_index, Some(12));
        assert_eq!(record.plate.as_str(), "AB1234");
        assert_eq!(record.decision_index, DECISION_DENY);
    }

    #[test]
    fn test_delimited_exact_tokens() {
        assert!(matches!(decode(b"1,A1,0").unwrap(), Command::Allow(_)));
        assert!(matches!(decode(b"10,A1,open").unwrap(), Command::Allow(_)));
        assert!(matches!(decode(b"1,A1,1").unwrap(), Command::Deny(_)));
        assert!(matches!(decode(b"1,A1,close").unwrap(), Command::Deny(_)));
        assert!(matches!(decode(b"1,A1,2").unwrap(), Command::Stop));
        assert!(matches!(decode(b"10,A1,stop").unwrap(), Command::Stop));
    }

    #[test]
    fn test_delimited_whitespace() {
        let record = allow_record(decode(b"  \t3 , CD 99 ,  open \r\n").unwrap());
        assert_eq!(record.province, "3");
        assert_eq!(record.plate.as_str(), "CD 99");
        assert!(matches!(decode(b"\n2,X,stop\0\0\0").unwrap(), Command::Stop));
    }

    #[test]
    fn test_delimited_case_sensitive() {
        assert_eq!(decode(b"10,A1,OPEN").unwrap(), Command::unknown("OPEN"));
        assert_eq!(decode(b"1,A1,Close").unwrap(), Command::unknown("Close"));
    }

    #[test]
    fn test_delimited_first_char_fallback() {
        assert!(matches!(decode(b"1,A1,0k").unwrap(), Command::Allow(_)));
        assert!(matches!(decode(b"1,A1,1x").unwrap(), Command::Deny(_)));
        assert!(matches!(decode(b"1,A1,2nd").unwrap(), Command::Stop));
    }

    #[test]
    fn test_ambiguous_digit_token_resolves_by_first_char() {
        // "10" is not an exact token; only the first-character rule applies,
        // so it decodes to Deny. Senders relying on "10" meaning anything
        // else would break here.
        assert!(matches!(decode(b"5,AB1,10").unwrap(), Command::Deny(_)));
        assert!(matches!(decode(b"5,AB1,01").unwrap(), Command::Allow(_)));
        assert!(matches!(decode(b"5,AB1,21").unwrap(), Command::Stop));
    }

    #[test]
    fn test_delimited_unknown_token() {
        assert_eq!(decode(b"10,A1,halt").unwrap(), Command::unknown("halt"));
        assert_eq!(decode(b"1,A1,").unwrap(), Command::unknown(""));
    }

    #[test]
    fn test_delimited_uses_last_field_as_token() {
        let record = deny_record(decode(b"7,GH123,extra,close").unwrap());
        assert_eq!(record.plate.as_str(), "GH123");
    }

    #[test]
    fn test_delimited_province_character() {
        let record = allow_record(decode("粤,B12345,open".as_bytes()).unwrap());
        assert_eq!(record.glyph_index, Some(19));
        assert_eq!(record.province, "粤");
        assert_eq!(record.plate.as_str(), "B12345");
    }

    #[test]
    fn test_delimited_unmapped_province() {
        let record = allow_record(decode(b"XX,B1,0").unwrap());
        assert_eq!(record.glyph_index, None);
        assert_eq!(record.province, "XX");
    }

    #[test]
    fn test_single_comma_is_malformed() {
        assert_eq!(decode(b"AB123,open"), Err(DecodeError::MalformedDelimited));
    }

    // ------------------------------------------------------------------
    // Legacy free text
    // ------------------------------------------------------------------

    #[test]
    fn test_legacy_keywords() {
        let record = allow_record(decode(b"please open\n").unwrap());
        assert_eq!(record, PlateRecord::empty(DECISION_ALLOW));
        let record = deny_record(decode(b"close").unwrap());
        assert!(record.plate.is_empty());
        assert_eq!(decode(b"stop").unwrap(), Command::Stop);
    }

    #[test]
    fn test_legacy_keyword_priority() {
        assert!(matches!(decode(b"close-open").unwrap(), Command::Allow(_)));
        assert!(matches!(decode(b"stop close").unwrap(), Command::Deny(_)));
    }

    #[test]
    fn test_legacy_unrecognized() {
        assert_eq!(
            decode(b"hello"),
            Err(DecodeError::UnrecognizedToken("hello".to_string()))
        );
        // Uppercase keywords from old GUI builds are not accepted
        assert!(matches!(
            decode(b"OPEN"),
            Err(DecodeError::UnrecognizedToken(_))
        ));
    }

    // ------------------------------------------------------------------
    // Length limits
    // ------------------------------------------------------------------

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(decode(b""), Err(DecodeError::TooShort));
        assert_eq!(decode(b" \r\n"), Err(DecodeError::TooShort));
    }

    #[test]
    fn test_too_long() {
        let buf = vec![b'a'; MAX_DATAGRAM_LEN + 1];
        assert_eq!(
            decode(&buf),
            Err(DecodeError::TooLong {
                len: MAX_DATAGRAM_LEN + 1,
                max: MAX_DATAGRAM_LEN
            })
        );
        let buf = vec![b'a'; MAX_DATAGRAM_LEN];
        assert!(matches!(
            decode(&buf),
            Err(DecodeError::UnrecognizedToken(_))
        ));
    }

    // ------------------------------------------------------------------
    // Lossy decoding and acks
    // ------------------------------------------------------------------

    #[test]
    fn test_decode_or_unknown_keeps_text() {
        let (cmd, err) = decode_or_unknown(b"hello\n");
        assert_eq!(cmd, Command::unknown("hello"));
        assert!(matches!(err, Some(DecodeError::UnrecognizedToken(_))));

        let (cmd, err) = decode_or_unknown(b"AB,\x01x");
        assert_eq!(cmd, Command::unknown("AB,?x"));
        assert_eq!(err, Some(DecodeError::MalformedDelimited));
    }

    #[test]
    fn test_decode_or_unknown_passes_commands() {
        let (cmd, err) = decode_or_unknown(b"stop");
        assert_eq!(cmd, Command::Stop);
        assert!(err.is_none());
    }

    #[test]
    fn test_peer_ack_detection() {
        assert!(is_peer_ack(b"ACK:SERVER_READY"));
        assert!(!is_peer_ack(b"ack:server_ready"));
        assert!(!is_peer_ack(&[5, b'A', b'B', b'1', b'2', b'3', 0, 0, 32]));
    }

    #[test]
    fn test_nine_byte_ack_prefix_is_a_record() {
        let buf = b"ACK:AB12 ";
        assert_eq!(buf.len(), RECORD_LEN);
        assert!(!is_peer_ack(buf));
        let record = allow_record(decode(buf).unwrap());
        assert_eq!(record.plate.as_str(), "CK:AB12");
        assert_eq!(record.decision_index, DECISION_ALLOW);
        // One byte either side is control traffic again
        assert!(is_peer_ack(b"ACK:AB12"));
        assert!(is_peer_ack(b"ACK:AB12  "));
    }
}
