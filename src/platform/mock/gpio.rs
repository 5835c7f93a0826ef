//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Mock GPIO implementation
///
/// Tracks level, mode and the number of level writes for test verification.
/// Starts in `Input` mode like a pin straight out of reset.
#[derive(Debug)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
    writes: u32,
    reject_mode_changes: bool,
}

impl MockGpio {
    /// Create a new mock GPIO in its reset (input) configuration
    pub fn new() -> Self {
        Self {
            state: false,
            mode: GpioMode::Input,
            writes: 0,
            reject_mode_changes: false,
        }
    }

    /// Create a mock GPIO whose `set_mode` always fails, as if the pin
    /// number were not routable on this board
    pub fn new_unroutable() -> Self {
        Self {
            reject_mode_changes: true,
            ..Self::new()
        }
    }

    /// Number of successful `set_high`/`set_low` calls
    pub fn writes(&self) -> u32 {
        self.writes
    }

    fn write(&mut self, high: bool) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.state = high;
        self.writes += 1;
        Ok(())
    }
}

impl Default for MockGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.write(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.write(false)
    }

    fn read(&self) -> bool {
        self.state
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        if self.reject_mode_changes {
            return Err(PlatformError::Gpio(GpioError::InvalidPin));
        }
        self.mode = mode;
        if !mode.is_output() {
            // Released pins float; with the receiver's pull-down that reads low
            self.state = false;
        }
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
