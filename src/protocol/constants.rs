//! Wire constants for the plate decision protocol

// Binary plate record: [glyph:1][plate:7][decision:1]
pub const RECORD_LEN: usize = 9;
pub const OFFSET_GLYPH: usize = 0;
pub const OFFSET_PLATE: usize = 1;
pub const OFFSET_DECISION: usize = 8;

/// Receive buffer size; anything longer is rejected
pub const MAX_DATAGRAM_LEN: usize = 128;

// Decision bytes (glyph indices of the status characters)
pub const DECISION_DENY: u8 = 31; // 禁
pub const DECISION_ALLOW: u8 = 32; // 通
pub const GLYPH_ACTION: u8 = 33; // 行, drawn after every decision, never a decision itself

/// Highest valid region glyph index
pub const MAX_REGION_GLYPH: u8 = 35;

/// Glyph byte a sender uses when it has no glyph for the region
pub const GLYPH_NONE: u8 = 0xFF;

// Heartbeat literals
pub const HEARTBEAT_CONNECTING: &str = "connecting";
pub const HEARTBEAT_READY: &str = "Barrier_Ready";

// Acknowledgments
pub const ACK_PREFIX: &[u8] = b"ACK:";
pub const ACK_DISPLAYED_PREFIX: &str = "ACK:DISPLAYED:";
pub const MAX_ACK_LEN: usize = 64;
