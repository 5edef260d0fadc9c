//! Client session loop
//!
//! One iteration:
//!
//! ```text
//! heartbeat ─▶ receive ─┬─ nothing ────────────────────────────▶ sleep
//!                       ├─ "ACK:..." from peer (ignored) ──────▶ sleep
//!                       └─ datagram ─▶ decode ─▶ apply ─▶ ACK ─▶ sleep
//! ```
//!
//! The loop ends when the shutdown flag is cleared (Ctrl-C) or on a hard
//! receive failure. Either way the endpoint is closed and the display shows
//! the disconnected banner; only the receive failure is returned as an error.

use crate::config::NetworkConfig;
use crate::error::{Result, TransportError};
use crate::feedback::FeedbackEmitter;
use crate::gate::{BANNER_CONNECTING, BANNER_DISCONNECTED, GateController, Outcome};
use crate::protocol::{decode_or_unknown, is_peer_ack};
use crate::session::{Received, TransportSession};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between statistics log lines
const STATS_INTERVAL: Duration = Duration::from_secs(60);

/// What one loop iteration did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing arrived
    Idle,
    /// The peer's own acknowledgement traffic, skipped
    PeerAck,
    /// A command was decoded and applied
    Handled(Outcome),
}

/// Loop timing
#[derive(Debug, Clone, Copy)]
pub struct LoopTiming {
    pub receive_timeout: Duration,
    pub loop_delay: Duration,
}

impl From<&NetworkConfig> for LoopTiming {
    fn from(network: &NetworkConfig) -> Self {
        Self {
            receive_timeout: network.receive_timeout(),
            loop_delay: network.loop_delay(),
        }
    }
}

/// Barrier gate client: session, controller and feedback wired together
pub struct GateClient {
    session: TransportSession,
    controller: GateController,
    feedback: FeedbackEmitter,
    timing: LoopTiming,
    running: Arc<AtomicBool>,
    decode_errors: u64,
}

impl GateClient {
    pub fn new(
        session: TransportSession,
        controller: GateController,
        timing: LoopTiming,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            session,
            controller,
            feedback: FeedbackEmitter::new(),
            timing,
            running,
            decode_errors: 0,
        }
    }

    pub fn controller(&self) -> &GateController {
        &self.controller
    }

    pub fn session(&self) -> &TransportSession {
        &self.session
    }

    /// Run until shutdown or a fatal transport error
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Gate client running (peer {}). Press Ctrl-C to stop.",
            self.session.peer()
        );
        self.controller.show_banner(BANNER_CONNECTING);

        let mut last_stats = Instant::now();
        while self.running.load(Ordering::Relaxed) {
            if let Err(e) = self.step() {
                log::error!("Session ended: {}", e);
                self.shutdown();
                return Err(e.into());
            }

            if last_stats.elapsed() >= STATS_INTERVAL {
                self.log_statistics();
                last_stats = Instant::now();
            }

            thread::sleep(self.timing.loop_delay);
        }

        info!("Shutdown signal received");
        self.shutdown();
        Ok(())
    }

    /// One heartbeat/receive/dispatch iteration
    ///
    /// Only fatal transport errors are returned.
    pub fn step(&mut self) -> std::result::Result<Step, TransportError> {
        if let Err(e) = self.session.send_heartbeat() {
            warn!("Heartbeat failed: {}", e);
        }

        let (command, from) = match self.session.receive(self.timing.receive_timeout)? {
            Received::NoData => return Ok(Step::Idle),
            Received::Datagram { data, from } => {
                if is_peer_ack(data) {
                    debug!(
                        "Ignoring peer acknowledgement: {}",
                        String::from_utf8_lossy(data)
                    );
                    return Ok(Step::PeerAck);
                }
                let (command, error) = decode_or_unknown(data);
                if let Some(e) = error {
                    self.decode_errors += 1;
                    warn!("Undecodable datagram from {} ({} bytes): {}", from, data.len(), e);
                }
                (command, from)
            }
        };

        let outcome = self.controller.apply(&command);
        if let Some(text) = &outcome.ack {
            self.feedback.emit(&mut self.session, from, text);
        }
        Ok(Step::Handled(outcome))
    }

    /// Close the endpoint and show the disconnected banner
    pub fn shutdown(&mut self) {
        self.session.close();
        self.controller.show_banner(BANNER_DISCONNECTED);
        self.log_statistics();
    }

    fn log_statistics(&self) {
        let session = self.session.stats();
        let gate = self.controller.stats();
        info!(
            "Gate {} | datagrams={} commands={} decode_errors={} acks={}/{} heartbeat_failures={} driver_errors={}/{}",
            self.controller.state(),
            session.datagrams_received,
            gate.commands,
            self.decode_errors,
            self.feedback.sent(),
            self.feedback.sent() + self.feedback.failed(),
            session.heartbeat_failures,
            gate.actuator_errors,
            gate.display_errors,
        );
    }
}
