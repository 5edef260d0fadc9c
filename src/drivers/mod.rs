//! Device driver traits

pub mod actuator;
pub mod display;

pub use actuator::ActuatorDriver;
pub use display::{DisplayDriver, Font};
