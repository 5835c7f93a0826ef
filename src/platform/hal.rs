//! `embedded-hal` adapter
//!
//! Wraps any `embedded_hal::digital::OutputPin` so it can serve as the
//! receiver's wake line on boards that have no dedicated platform layer.
//!
//! `embedded-hal` pins are typestated, so a runtime switch to `Input` cannot
//! float the pin. The adapter records the mode and parks the line low
//! instead, which keeps the receiver unpowered just like a floating enable
//! input with the module's internal pull-down.

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};
use embedded_hal::digital::OutputPin;

/// `GpioInterface` over an `embedded-hal` output pin
pub struct HalOutputPin<P: OutputPin> {
    pin: P,
    mode: GpioMode,
    level: bool,
}

impl<P: OutputPin> HalOutputPin<P> {
    /// Wrap a pin that the HAL already configured as a push-pull output
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            mode: GpioMode::OutputPushPull,
            level: false,
        }
    }

    /// Give the HAL pin back
    pub fn into_inner(self) -> P {
        self.pin
    }

    fn drive(&mut self, high: bool) -> Result<()> {
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| PlatformError::Gpio(GpioError::HardwareError))?;
        self.level = high;
        Ok(())
    }
}

impl<P: OutputPin> GpioInterface for HalOutputPin<P> {
    fn set_high(&mut self) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.drive(false)
    }

    fn read(&self) -> bool {
        self.level
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        if !mode.is_output() {
            self.drive(false)?;
        }
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
