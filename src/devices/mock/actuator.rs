//! Mock barrier actuator

use super::{DeviceCall, DeviceLog};
use crate::drivers::ActuatorDriver;
use crate::error::{Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Records moves instead of driving a servo
#[derive(Clone)]
pub struct MockActuator {
    log: DeviceLog,
    failing: Arc<AtomicBool>,
    settle: Duration,
}

impl MockActuator {
    pub fn new(log: DeviceLog) -> Self {
        Self {
            log,
            failing: Arc::new(AtomicBool::new(false)),
            settle: Duration::ZERO,
        }
    }

    /// Block this long per move, like a real arm settling
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Make every subsequent move fail (after it is recorded)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    fn move_to(&mut self, call: DeviceCall) -> Result<()> {
        log::debug!("[mock actuator] {:?}", call);
        self.log.record(call);
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        if self.failing.load(Ordering::Relaxed) {
            return Err(Error::Actuator("injected failure".to_string()));
        }
        Ok(())
    }
}

impl ActuatorDriver for MockActuator {
    fn open(&mut self) -> Result<()> {
        self.move_to(DeviceCall::Open)
    }

    fn close(&mut self) -> Result<()> {
        self.move_to(DeviceCall::Close)
    }

    fn neutral(&mut self) -> Result<()> {
        self.move_to(DeviceCall::Neutral)
    }

    fn name(&self) -> &str {
        "mock actuator"
    }
}
