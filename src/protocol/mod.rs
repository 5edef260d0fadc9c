//! Plate decision wire protocol
//!
//! - [`constants`]: frame layout, decision bytes, heartbeat and ACK literals
//! - [`glyphs`]: region glyph table shared with the sender
//! - [`record`]: 9-byte binary plate record
//! - [`decoder`]: ordered two-format decoder

pub mod constants;
pub mod decoder;
pub mod glyphs;
pub mod record;

pub use decoder::{DecodeError, decode, decode_or_unknown, is_peer_ack};
