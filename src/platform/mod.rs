//! Platform abstraction layer
//!
//! This module provides the hardware seams the GNSS driver relies on: the
//! wake line GPIO and the serial framing handed to the sentence decoder.
//! All platform-specific code must be isolated to this module.

pub mod error;
pub mod hal;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use hal::HalOutputPin;
pub use traits::{GpioInterface, GpioMode, UartConfig};
