//! Receiver power gate
//!
//! Drives the wake/enable line. High powers the receiver (or takes it out
//! of its low-power state), low puts it to sleep.

use crate::platform::{
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Wake line driver
pub struct PowerGate<P: GpioInterface> {
    line: P,
}

impl<P: GpioInterface> PowerGate<P> {
    pub fn new(line: P) -> Self {
        Self { line }
    }

    /// Configure the line as a push-pull output
    ///
    /// # Errors
    ///
    /// Returns the platform error if the pin cannot be configured.
    pub fn configure(&mut self) -> Result<()> {
        self.line.set_mode(GpioMode::OutputPushPull)
    }

    /// Drive the line high (`true`) or low (`false`)
    pub fn set_line(&mut self, level: bool) -> Result<()> {
        self.line.set_level(level)
    }

    /// Deassert and return the line to its reset (input) configuration
    pub fn reset(&mut self) -> Result<()> {
        if self.line.mode().is_output() {
            self.line.set_low()?;
        }
        self.line.set_mode(GpioMode::Input)
    }

    /// Whether the line is currently driven high
    pub fn is_asserted(&self) -> bool {
        self.line.mode().is_output() && self.line.read()
    }

    /// Access the underlying pin
    pub fn line(&self) -> &P {
        &self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockGpio;

    #[test]
    fn test_configure_and_drive() {
        let mut gate = PowerGate::new(MockGpio::new());
        gate.configure().unwrap();
        assert_eq!(gate.line().mode(), GpioMode::OutputPushPull);

        gate.set_line(true).unwrap();
        assert!(gate.is_asserted());
        gate.set_line(false).unwrap();
        assert!(!gate.is_asserted());
    }

    #[test]
    fn test_drive_before_configure_fails() {
        let mut gate = PowerGate::new(MockGpio::new());
        assert!(gate.set_line(true).is_err());
    }

    #[test]
    fn test_reset_releases_line() {
        let mut gate = PowerGate::new(MockGpio::new());
        gate.configure().unwrap();
        gate.set_line(true).unwrap();

        gate.reset().unwrap();
        assert_eq!(gate.line().mode(), GpioMode::Input);
        assert!(!gate.is_asserted());
        assert!(!gate.line().read());
    }

    #[test]
    fn test_reset_on_unconfigured_line() {
        let mut gate = PowerGate::new(MockGpio::new());
        gate.reset().unwrap();
        assert_eq!(gate.line().writes(), 0);
    }
}
