//! Device implementations
//!
//! | Config `type` | Driver | Notes |
//! |---------------|--------|-------|
//! | actuator `mock` | [`MockActuator`] | records moves, optional settle delay |
//! | actuator `sg90` | [`Sg90Servo`] over [`SysfsPin`] | needs GPIO access |
//! | display `log` | [`LogDisplay`] | screen contents go to the log |
//! | display `mock` | [`MockDisplay`] | records draw calls |

pub mod log_display;
pub mod mock;
pub mod sg90;

use crate::config::{ActuatorConfig, DisplayConfig};
use crate::drivers::{ActuatorDriver, DisplayDriver};
use crate::error::{Error, Result};
pub use log_display::LogDisplay;
pub use mock::{DeviceLog, MockActuator, MockDisplay};
pub use sg90::Sg90Servo;
pub use sg90::gpio::SysfsPin;
use std::time::Duration;

/// Create the actuator driver named in configuration
pub fn create_actuator(config: &ActuatorConfig) -> Result<Box<dyn ActuatorDriver>> {
    match config.device_type.as_str() {
        "mock" => {
            let actuator = MockActuator::new(DeviceLog::new())
                .with_settle(Duration::from_millis(config.settle_ms));
            Ok(Box::new(actuator))
        }
        "sg90" => {
            let pin = SysfsPin::export(config.gpio_pin).map_err(|e| {
                Error::Actuator(format!("GPIO{} unavailable: {}", config.gpio_pin, e))
            })?;
            Ok(Box::new(Sg90Servo::new(pin)))
        }
        _ => Err(Error::UnknownDevice(config.device_type.clone())),
    }
}

/// Create the display driver named in configuration
pub fn create_display(config: &DisplayConfig) -> Result<Box<dyn DisplayDriver>> {
    match config.device_type.as_str() {
        "log" => Ok(Box::new(LogDisplay::new())),
        "mock" => Ok(Box::new(MockDisplay::new(DeviceLog::new()))),
        _ => Err(Error::UnknownDevice(config.device_type.clone())),
    }
}
