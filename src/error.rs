//! Error types for DwaarIO
//!
//! Failures fall into three groups with different consequences for the
//! session loop:
//!
//! | Kind | Examples | Consequence |
//! |------|----------|-------------|
//! | [`TransportError`] | endpoint, send, receive | receive/endpoint fatal, send logged |
//! | [`DecodeError`](crate::protocol::DecodeError) | malformed datagram | shown as `ERROR`, no actuation |
//! | [`Error::Actuator`] / [`Error::Display`] | driver call failed | logged, state still advances |

use std::io;
use std::net::SocketAddr;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// DwaarIO error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Datagram transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Actuator driver call failed
    #[error("Actuator error: {0}")]
    Actuator(String),

    /// Display driver call failed
    #[error("Display error: {0}")]
    Display(String),

    /// Configured device type has no driver
    #[error("Unknown device type: {0}")]
    UnknownDevice(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Datagram transport failures
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Endpoint could not be opened; the session never starts
    #[error("endpoint {address} unavailable: {source}")]
    EndpointUnavailable {
        /// Address that failed to open or resolve
        address: String,
        #[source]
        source: io::Error,
    },

    /// A datagram could not be sent (non-fatal)
    #[error("send to {peer} failed: {source}")]
    SendFailed {
        peer: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Hard receive failure (fatal to the session)
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] io::Error),

    /// Operation on an endpoint that was already closed
    #[error("endpoint closed")]
    Closed,
}

impl TransportError {
    /// Whether the session loop must terminate on this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TransportError::SendFailed { .. })
    }
}
