//! GPIO output lines

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Digital output line
pub trait OutputPin: Send {
    fn set_high(&mut self) -> io::Result<()>;
    fn set_low(&mut self) -> io::Result<()>;
}

const SYSFS_GPIO: &str = "/sys/class/gpio";

/// udev creates `gpioN/` and fixes its permissions some time after export
const EXPORT_ATTEMPTS: u32 = 20;
const EXPORT_RETRY_DELAY: Duration = Duration::from_millis(10);

/// GPIO line driven through the legacy sysfs interface
///
/// The value file stays open for the lifetime of the pin so each edge is a
/// single seek + write.
pub struct SysfsPin {
    pin: u32,
    value: File,
}

impl SysfsPin {
    /// Export `pin` (if needed) and configure it as an output, driven low
    pub fn export(pin: u32) -> io::Result<Self> {
        Self::export_in(Path::new(SYSFS_GPIO), pin)
    }

    fn export_in(root: &Path, pin: u32) -> io::Result<Self> {
        let dir = root.join(format!("gpio{}", pin));
        if !dir.exists() {
            fs::write(root.join("export"), pin.to_string())?;
        }
        retry_while_settling(EXPORT_ATTEMPTS, EXPORT_RETRY_DELAY, || {
            fs::write(dir.join("direction"), "low")
        })?;
        let value = OpenOptions::new().write(true).open(dir.join("value"))?;
        log::info!("GPIO{} exported as output", pin);
        Ok(Self { pin, value })
    }

    fn write(&mut self, level: &[u8]) -> io::Result<()> {
        self.value.seek(SeekFrom::Start(0))?;
        self.value.write_all(level)
    }
}

impl OutputPin for SysfsPin {
    fn set_high(&mut self) -> io::Result<()> {
        self.write(b"1")
    }

    fn set_low(&mut self) -> io::Result<()> {
        self.write(b"0")
    }
}

impl Drop for SysfsPin {
    fn drop(&mut self) {
        if let Err(e) = self.set_low() {
            log::warn!("Failed to drive GPIO{} low: {}", self.pin, e);
        }
    }
}

/// Run `op` until it succeeds, retrying the errors a freshly exported line
/// reports while udev is still setting it up
fn retry_while_settling<T>(
    attempts: u32,
    delay: Duration,
    mut op: impl FnMut() -> io::Result<T>,
) -> io::Result<T> {
    let mut failed = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if is_settling(&e) && failed + 1 < attempts => {
                failed += 1;
                log::debug!("GPIO not ready (attempt {}): {}", failed, e);
                thread::sleep(delay);
            }
            Err(e) => return Err(e),
        }
    }
}

fn is_settling(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied() -> io::Error {
        io::Error::from(io::ErrorKind::PermissionDenied)
    }

    #[test]
    fn test_retry_succeeds_once_line_settles() {
        let mut calls = 0;
        let result = retry_while_settling(5, Duration::ZERO, || {
            calls += 1;
            if calls < 3 { Err(denied()) } else { Ok(calls) }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_retry_gives_up_after_limit() {
        let mut calls = 0;
        let err = retry_while_settling(4, Duration::ZERO, || -> io::Result<()> {
            calls += 1;
            Err(io::Error::from(io::ErrorKind::NotFound))
        })
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_retry_stops_on_other_errors() {
        let mut calls = 0;
        let err = retry_while_settling(5, Duration::ZERO, || -> io::Result<()> {
            calls += 1;
            Err(io::Error::from(io::ErrorKind::InvalidInput))
        })
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_export_configures_existing_line() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("gpio17");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("value"), "0").unwrap();

        let mut pin = SysfsPin::export_in(root.path(), 17).unwrap();
        assert_eq!(fs::read_to_string(dir.join("direction")).unwrap(), "low");
        assert!(!root.path().join("export").exists());

        pin.set_high().unwrap();
        assert_eq!(fs::read_to_string(dir.join("value")).unwrap(), "1");
        drop(pin);
        assert_eq!(fs::read_to_string(dir.join("value")).unwrap(), "0");
    }

    #[test]
    fn test_export_gives_up_when_line_never_appears() {
        let root = tempfile::tempdir().unwrap();
        let err = match SysfsPin::export_in(root.path(), 4) {
            Ok(_) => panic!("line directory was never created"),
            Err(e) => e,
        };
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs::read_to_string(root.path().join("export")).unwrap(), "4");
    }
}
