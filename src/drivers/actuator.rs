//! Barrier actuator driver trait

use crate::error::Result;

/// Barrier actuator driver trait
///
/// Each call blocks until the arm has physically settled. Calls are
/// idempotent: raising an already raised barrier is harmless. There is no
/// position feedback, so callers never learn where the arm actually is.
pub trait ActuatorDriver: Send {
    /// Raise the barrier
    fn open(&mut self) -> Result<()>;

    /// Lower the barrier
    fn close(&mut self) -> Result<()>;

    /// Return the actuator to its center position
    fn neutral(&mut self) -> Result<()>;

    /// Driver name for logs
    fn name(&self) -> &str {
        "actuator"
    }
}
