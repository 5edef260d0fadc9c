//! Mock transport for testing

use super::Transport;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// One scripted receive result
#[derive(Debug, Clone)]
pub enum Inbound {
    /// A datagram from `from`
    Datagram { data: Vec<u8>, from: SocketAddr },
    /// Receive times out with nothing
    Timeout,
    /// Receive fails with this error kind
    Error(io::ErrorKind),
}

/// Mock transport for unit testing
///
/// Clones share state, so a test can keep one handle while the session owns
/// another. Once the script is exhausted every receive times out.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

struct MockTransportInner {
    inbound: VecDeque<Inbound>,
    sent: Vec<(Vec<u8>, SocketAddr)>,
    fail_sends: bool,
    closed: bool,
    receive_calls: usize,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        MockTransport {
            inner: Arc::new(Mutex::new(MockTransportInner {
                inbound: VecDeque::new(),
                sent: Vec::new(),
                fail_sends: false,
                closed: false,
                receive_calls: 0,
            })),
        }
    }

    /// Queue a datagram to be received
    pub fn inject_datagram(&self, data: &[u8], from: SocketAddr) {
        self.inner.lock().inbound.push_back(Inbound::Datagram {
            data: data.to_vec(),
            from,
        });
    }

    /// Queue an arbitrary receive result
    pub fn inject(&self, inbound: Inbound) {
        self.inner.lock().inbound.push_back(inbound);
    }

    /// Make every subsequent send fail
    pub fn fail_sends(&self, fail: bool) {
        self.inner.lock().fail_sends = fail;
    }

    /// All datagrams sent so far
    pub fn sent(&self) -> Vec<(Vec<u8>, SocketAddr)> {
        self.inner.lock().sent.clone()
    }

    /// Sent payloads as text, in order
    pub fn sent_text(&self) -> Vec<String> {
        self.inner
            .lock()
            .sent
            .iter()
            .map(|(data, _)| String::from_utf8_lossy(data).into_owned())
            .collect()
    }

    /// Whether `close` was called
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    /// Number of receive calls made
    pub fn receive_calls(&self) -> usize {
        self.inner.lock().receive_calls
    }
}

impl Transport for MockTransport {
    fn send_to(&mut self, data: &[u8], peer: SocketAddr) -> io::Result<usize> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "endpoint closed"));
        }
        if inner.fail_sends {
            return Err(io::Error::new(
                io::ErrorKind::HostUnreachable,
                "injected send failure",
            ));
        }
        inner.sent.push((data.to_vec(), peer));
        Ok(data.len())
    }

    fn recv_from(
        &mut self,
        buffer: &mut [u8],
        _timeout: Duration,
    ) -> io::Result<Option<(usize, SocketAddr)>> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "endpoint closed"));
        }
        inner.receive_calls += 1;

        match inner.inbound.pop_front() {
            Some(Inbound::Datagram { data, from }) => {
                let n = data.len().min(buffer.len());
                buffer[..n].copy_from_slice(&data[..n]);
                Ok(Some((n, from)))
            }
            Some(Inbound::Error(kind)) => Err(io::Error::new(kind, "injected receive failure")),
            Some(Inbound::Timeout) | None => Ok(None),
        }
    }

    fn close(&mut self) {
        self.inner.lock().closed = true;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}
