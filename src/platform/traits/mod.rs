//! Platform abstraction traits
//!
//! This module defines the traits and configuration types that platform
//! implementations must provide.

pub mod gpio;
pub mod uart;

// Re-export trait interfaces
pub use gpio::{GpioInterface, GpioMode};
pub use uart::{UartConfig, UartParity, UartStopBits};
