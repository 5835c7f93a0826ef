//! Device drivers
//!
//! This module contains device drivers that use platform abstraction traits.
//!
//! ## Modules
//!
//! - `gnss`: GNSS receiver session (power, decoder bridge, fix polling)

pub mod gnss;
