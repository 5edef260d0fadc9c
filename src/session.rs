//! Transport session with the decision server
//!
//! The session is a best-effort, connectionless conversation with a single
//! peer. It owns the only handle to the datagram endpoint.
//!
//! # Lifecycle
//!
//! ```text
//! start ──▶ [heartbeat ─▶ receive ─▶ send ACK]* ──▶ close
//!   │                        │
//!   └─ EndpointUnavailable   └─ ReceiveFailed (fatal)
//! ```
//!
//! - **Heartbeat**: a fixed literal sent every loop iteration. Failures are
//!   reported to the caller and are not fatal; the next iteration retries.
//! - **Receive**: bounded wait for one datagram. A timeout is `NoData`; any
//!   other socket error ends the session.
//! - **Send**: replies go to the address a datagram came from, which is
//!   normally the configured peer.

use crate::config::{HeartbeatMode, NetworkConfig};
use crate::error::TransportError;
use crate::protocol::constants::MAX_DATAGRAM_LEN;
use crate::transport::{Transport, UdpTransport};
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

/// One byte over the datagram limit so oversized datagrams are detectable
const RECV_BUFFER_LEN: usize = MAX_DATAGRAM_LEN + 1;

/// Result of one receive call
#[derive(Debug, PartialEq, Eq)]
pub enum Received<'a> {
    /// A datagram arrived
    Datagram { data: &'a [u8], from: SocketAddr },
    /// Nothing arrived before the timeout
    NoData,
}

/// Session counters for the shutdown summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub heartbeats_sent: u64,
    pub heartbeat_failures: u64,
    pub datagrams_received: u64,
    pub receive_timeouts: u64,
}

/// Datagram session with a single peer
pub struct TransportSession {
    transport: Box<dyn Transport>,
    peer: SocketAddr,
    heartbeat: HeartbeatMode,
    buffer: [u8; RECV_BUFFER_LEN],
    closed: bool,
    stats: SessionStats,
}

impl TransportSession {
    /// Open a UDP endpoint and target the configured peer
    ///
    /// Fails with [`TransportError::EndpointUnavailable`] if the peer cannot
    /// be resolved or the local socket cannot be bound.
    pub fn start(network: &NetworkConfig) -> Result<Self, TransportError> {
        let peer = resolve_peer(&network.peer_host, network.peer_port)?;
        let transport = UdpTransport::bind(&network.bind_address).map_err(|source| {
            TransportError::EndpointUnavailable {
                address: network.bind_address.clone(),
                source,
            }
        })?;

        log::info!(
            "Session started: peer {} (heartbeat {:?})",
            peer,
            network.heartbeat.payload()
        );
        Ok(Self::with_transport(
            Box::new(transport),
            peer,
            network.heartbeat,
        ))
    }

    /// Build a session over an already opened transport
    pub fn with_transport(
        transport: Box<dyn Transport>,
        peer: SocketAddr,
        heartbeat: HeartbeatMode,
    ) -> Self {
        Self {
            transport,
            peer,
            heartbeat,
            buffer: [0u8; RECV_BUFFER_LEN],
            closed: false,
            stats: SessionStats::default(),
        }
    }

    /// Configured peer address
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Local endpoint address, if the transport has one
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.transport.local_addr().ok()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Send the heartbeat literal to the peer
    pub fn send_heartbeat(&mut self) -> Result<(), TransportError> {
        let payload = self.heartbeat.payload().as_bytes();
        match self.send_to(self.peer, payload) {
            Ok(_) => {
                self.stats.heartbeats_sent += 1;
                log::trace!("Heartbeat sent to {}", self.peer);
                Ok(())
            }
            Err(e) => {
                self.stats.heartbeat_failures += 1;
                Err(e)
            }
        }
    }

    /// Wait up to `timeout` for one datagram
    ///
    /// The returned slice borrows the session's receive buffer and is valid
    /// until the next call.
    pub fn receive(&mut self, timeout: Duration) -> Result<Received<'_>, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }

        match self.transport.recv_from(&mut self.buffer, timeout) {
            Ok(Some((len, from))) => {
                self.stats.datagrams_received += 1;
                log::debug!("Received {} bytes from {}", len, from);
                Ok(Received::Datagram {
                    data: &self.buffer[..len],
                    from,
                })
            }
            Ok(None) => {
                self.stats.receive_timeouts += 1;
                Ok(Received::NoData)
            }
            Err(e) => Err(TransportError::ReceiveFailed(e)),
        }
    }

    /// Send one datagram
    pub fn send_to(&mut self, peer: SocketAddr, data: &[u8]) -> Result<usize, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.transport
            .send_to(data, peer)
            .map_err(|source| TransportError::SendFailed { peer, source })
    }

    /// Close the endpoint (idempotent)
    pub fn close(&mut self) {
        if !self.closed {
            self.transport.close();
            self.closed = true;
            log::info!("Session closed: {:?}", self.stats);
        }
    }
}

impl Drop for TransportSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Resolve `host:port`, preferring IPv4 (the peer is normally on a LAN)
fn resolve_peer(host: &str, port: u16) -> Result<SocketAddr, TransportError> {
    let address = format!("{}:{}", host, port);
    let unavailable = |source: std::io::Error| TransportError::EndpointUnavailable {
        address: address.clone(),
        source,
    };

    let candidates: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(unavailable)?
        .collect();
    candidates
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| candidates.first())
        .copied()
        .ok_or_else(|| {
            unavailable(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "host resolved to no addresses",
            ))
        })
}
