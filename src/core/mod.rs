//! Core infrastructure
//!
//! Logging macros and the time abstractions shared by the device drivers.

pub mod logging;
pub mod traits;
