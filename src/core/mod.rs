//! Core data types for the gate engine.
//!
//! - [`types`]: gate state, plate records and decoded commands

pub mod types;

pub use types::{Command, GateState, PlateRecord, PlateText};
