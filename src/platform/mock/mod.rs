//! Mock platform implementation for testing
//!
//! This module provides mock implementations of the platform seams the GNSS
//! driver uses, so the session can be unit tested without hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use pico_gnss::platform::mock::{MockGpio, MockNmeaBus};
//!
//! let bus = MockNmeaBus::new();
//! let wake = MockGpio::new();
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod nmea;

pub use gpio::MockGpio;
pub use nmea::{MockDecoder, MockNmeaBus};
