#![cfg_attr(not(test), no_std)]

//! pico_gnss - GNSS receiver session driver for embedded targets
//!
//! This library manages the lifecycle of a satellite positioning receiver
//! attached over a serial link: the wake line, the sentence decoder
//! registration and the hand-off of location fixes from the decoder's
//! context to tasks that poll for them with a timeout.

// Platform abstraction layer (GPIO, UART framing, mocks)
pub mod platform;

// Core infrastructure (logging, time)
pub mod core;

// Device drivers using platform abstraction
pub mod devices;
