//! Core traits for platform-agnostic driver functionality.
//!
//! This module provides trait abstractions that decouple the GNSS session
//! from platform-specific implementations (Embassy, mock, etc.).
//!
//! # Features
//!
//! - **`embassy`**: Enables `EmbassyTime`
//! - `MockTime` is available in test builds and with the `mock` feature

pub mod time;

pub use time::{AsyncDelay, TimeSource};

#[cfg(any(test, feature = "mock"))]
pub use time::MockTime;

#[cfg(feature = "embassy")]
pub use time::EmbassyTime;
