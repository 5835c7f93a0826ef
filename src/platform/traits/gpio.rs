//! GPIO interface trait
//!
//! The only pin the GNSS driver owns is the receiver's wake/enable line, so
//! this interface is limited to what that line needs: mode changes and
//! driving a level.

use crate::platform::Result;

/// GPIO pin mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioMode {
    /// Input mode (high impedance). Reset default for most MCUs.
    Input,
    /// Output mode (push-pull)
    OutputPushPull,
    /// Output mode (open-drain)
    OutputOpenDrain,
}

impl GpioMode {
    /// Whether the pin can be driven in this mode
    pub fn is_output(self) -> bool {
        matches!(self, GpioMode::OutputPushPull | GpioMode::OutputOpenDrain)
    }
}

/// GPIO interface trait
///
/// # Safety Invariants
///
/// - Only one owner per GPIO pin instance
/// - Pin number must be valid for the platform
pub trait GpioInterface {
    /// Drive the pin high
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin
    /// is not configured as an output.
    fn set_high(&mut self) -> Result<()>;

    /// Drive the pin low
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::InvalidMode)` if the pin
    /// is not configured as an output.
    fn set_low(&mut self) -> Result<()>;

    /// Returns `true` if the pin is high
    fn read(&self) -> bool;

    /// Reconfigure the pin
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio` if the platform rejects the mode.
    fn set_mode(&mut self, mode: GpioMode) -> Result<()>;

    /// Current pin mode
    fn mode(&self) -> GpioMode;

    /// Drive the pin to `high`
    fn set_level(&mut self, high: bool) -> Result<()> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }
}
