//! DwaarIO - barrier gate client
//!
//! Receives plate decisions from a decision server over UDP, drives the
//! barrier actuator and the status display, and acknowledges what was shown.
//!
//! ## Modules
//!
//! - [`protocol`]: datagram decoding (binary plate records and delimited text)
//! - [`session`]: UDP session with the decision server
//! - [`gate`]: command application, gate state and screen layouts
//! - [`feedback`]: `ACK:DISPLAYED:` acknowledgements
//! - [`client`]: the heartbeat/receive/dispatch loop
//! - [`devices`]: actuator and display implementations

pub mod client;
pub mod config;
pub mod core;
pub mod devices;
pub mod drivers;
pub mod error;
pub mod feedback;
pub mod gate;
pub mod protocol;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
