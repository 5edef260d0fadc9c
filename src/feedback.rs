//! Display acknowledgements sent back to the decision server
//!
//! After a command has been rendered the client reports what is on screen:
//!
//! ```text
//! ACK:DISPLAYED:<text>
//! ```
//!
//! The whole datagram is capped at [`MAX_ACK_LEN`] bytes. A failed send is
//! logged and counted, never retried.

use crate::protocol::constants::{ACK_DISPLAYED_PREFIX, MAX_ACK_LEN};
use crate::session::TransportSession;
use std::net::SocketAddr;

/// Build the acknowledgement payload for `text`, truncated on a char boundary
pub fn format_ack(text: &str) -> String {
    let mut ack = String::with_capacity(MAX_ACK_LEN);
    ack.push_str(ACK_DISPLAYED_PREFIX);
    for c in text.chars() {
        if ack.len() + c.len_utf8() > MAX_ACK_LEN {
            break;
        }
        ack.push(c);
    }
    ack
}

/// Sends acknowledgements and keeps delivery counters
#[derive(Debug, Default)]
pub struct FeedbackEmitter {
    sent: u64,
    failed: u64,
}

impl FeedbackEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `ACK:DISPLAYED:<text>` to `peer`
    ///
    /// Returns whether the datagram was handed to the transport.
    pub fn emit(&mut self, session: &mut TransportSession, peer: SocketAddr, text: &str) -> bool {
        let ack = format_ack(text);
        match session.send_to(peer, ack.as_bytes()) {
            Ok(_) => {
                self.sent += 1;
                log::debug!("Sent {:?} to {}", ack, peer);
                true
            }
            Err(e) => {
                self.failed += 1;
                log::warn!("Failed to send acknowledgement: {}", e);
                false
            }
        }
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }
}
