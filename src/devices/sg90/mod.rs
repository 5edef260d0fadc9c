//! SG90 hobby servo on a GPIO line
//!
//! The servo position follows the width of a pulse repeated every 20 ms:
//!
//! | Move    | High time | Arm |
//! |---------|-----------|-----|
//! | open    | 500 µs    | raised |
//! | close   | 2500 µs   | lowered |
//! | neutral | 1500 µs   | centered |
//!
//! Each move sends 200 periods (about 4 s) so the arm reaches its end stop
//! before the call returns. The line is bit-banged from this thread: the
//! high phase busy-waits for accuracy, the low phase sleeps.

pub mod gpio;

use crate::drivers::ActuatorDriver;
use crate::error::{Error, Result};
use gpio::OutputPin;
use std::thread;
use std::time::{Duration, Instant};

/// Pulse train parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseTiming {
    pub period: Duration,
    pub raise: Duration,
    pub lower: Duration,
    pub center: Duration,
    /// Periods sent per move
    pub periods: u32,
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self {
            period: Duration::from_micros(20_000),
            raise: Duration::from_micros(500),
            lower: Duration::from_micros(2_500),
            center: Duration::from_micros(1_500),
            periods: 200,
        }
    }
}

/// SG90 servo driving the barrier arm
pub struct Sg90Servo<P: OutputPin> {
    pin: P,
    timing: PulseTiming,
}

impl<P: OutputPin> Sg90Servo<P> {
    pub fn new(pin: P) -> Self {
        Self::with_timing(pin, PulseTiming::default())
    }

    pub fn with_timing(pin: P, timing: PulseTiming) -> Self {
        Self { pin, timing }
    }

    fn pulse_train(&mut self, high: Duration) -> Result<()> {
        let low = self.timing.period.saturating_sub(high);
        for _ in 0..self.timing.periods {
            self.pin.set_high().map_err(pin_error)?;
            busy_wait(high);
            self.pin.set_low().map_err(pin_error)?;
            thread::sleep(low);
        }
        Ok(())
    }
}

fn pin_error(e: std::io::Error) -> Error {
    Error::Actuator(format!("GPIO write failed: {}", e))
}

fn busy_wait(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        std::hint::spin_loop();
    }
}

impl<P: OutputPin> ActuatorDriver for Sg90Servo<P> {
    fn open(&mut self) -> Result<()> {
        log::debug!("SG90: raising barrier");
        self.pulse_train(self.timing.raise)
    }

    fn close(&mut self) -> Result<()> {
        log::debug!("SG90: lowering barrier");
        self.pulse_train(self.timing.lower)
    }

    fn neutral(&mut self) -> Result<()> {
        log::debug!("SG90: centering");
        self.pulse_train(self.timing.center)
    }

    fn name(&self) -> &str {
        "sg90"
    }
}
