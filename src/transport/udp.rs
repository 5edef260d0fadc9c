//! UDP transport implementation

use super::Transport;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

/// Shortest read timeout accepted by the socket (zero means "block forever")
const MIN_READ_TIMEOUT: Duration = Duration::from_millis(1);

/// UDP transport over a std socket
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    /// Read timeout currently applied to the socket
    read_timeout: Option<Duration>,
}

impl UdpTransport {
    /// Bind a UDP socket
    ///
    /// # Arguments
    /// * `bind_address` - Local address (e.g., "0.0.0.0:0" for any port)
    pub fn bind(bind_address: &str) -> io::Result<Self> {
        let socket = UdpSocket::bind(bind_address)?;
        log::info!("Bound UDP endpoint on {}", socket.local_addr()?);
        Ok(Self {
            socket: Some(socket),
            read_timeout: None,
        })
    }

    fn socket(&self) -> io::Result<&UdpSocket> {
        self.socket
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "endpoint closed"))
    }
}

impl Transport for UdpTransport {
    fn send_to(&mut self, data: &[u8], peer: SocketAddr) -> io::Result<usize> {
        self.socket()?.send_to(data, peer)
    }

    fn recv_from(
        &mut self,
        buffer: &mut [u8],
        timeout: Duration,
    ) -> io::Result<Option<(usize, SocketAddr)>> {
        let timeout = timeout.max(MIN_READ_TIMEOUT);
        if self.read_timeout != Some(timeout) {
            self.socket()?.set_read_timeout(Some(timeout))?;
            self.read_timeout = Some(timeout);
        }

        match self.socket()?.recv_from(buffer) {
            Ok((n, from)) => Ok(Some((n, from))),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            log::debug!("UDP endpoint closed");
        }
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket()?.local_addr()
    }
}
