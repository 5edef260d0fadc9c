//! Transport layer for datagram I/O abstraction

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

mod mock;
mod udp;
pub use mock::{Inbound, MockTransport};
pub use udp::UdpTransport;

/// Datagram transport trait
///
/// Implementations are owned by a single [`TransportSession`](crate::session::TransportSession);
/// nothing else reads or writes the endpoint.
pub trait Transport: Send {
    /// Send one datagram, returns number of bytes sent
    fn send_to(&mut self, data: &[u8], peer: SocketAddr) -> io::Result<usize>;

    /// Wait up to `timeout` for one datagram
    ///
    /// Returns `Ok(None)` when nothing arrived in time. Datagrams longer than
    /// `buffer` are truncated to its length.
    fn recv_from(
        &mut self,
        buffer: &mut [u8],
        timeout: Duration,
    ) -> io::Result<Option<(usize, SocketAddr)>>;

    /// Release the endpoint; further calls fail
    fn close(&mut self);

    /// Local address of the endpoint, if bound
    fn local_addr(&self) -> io::Result<SocketAddr> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "transport has no local address",
        ))
    }
}
