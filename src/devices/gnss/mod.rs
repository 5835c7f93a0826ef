//! GNSS receiver driver
//!
//! Manages one satellite positioning receiver attached over UART with a
//! wake/enable line. The NMEA decoder itself is external; this module
//! owns its lifecycle and turns its asynchronous location updates into a
//! last-known-good fix that tasks can poll with a timeout.
//!
//! # Architecture
//!
//! ```text
//!   decoder context            control task            consumer tasks
//!         │                         │                        │
//!   RawFixEvent              GnssSession               GnssReader
//!         │               (init/sleep/wakeup/            (get_data)
//!         ▼                  deinit)                         │
//!   FixEventHandler ──► FixStore ◄──── SessionShared ◄───────┘
//!                                          ▲
//!                          PowerGate ◄─────┘ (wake line)
//! ```
//!
//! - `FixStore`: the only state shared with the decoder's context
//! - `DecoderBridge`: decoder construction, handler registration, teardown
//! - `PowerGate`: wake line control
//! - `reader`: bounded polling with a deadline
//! - `FixMonitor`: periodic read-and-report task

pub mod bridge;
pub mod config;
pub mod decoder;
pub mod error;
pub mod fix;
pub mod monitor;
pub mod power;
pub mod reader;
pub mod session;
pub mod store;


pub use bridge::DecoderBridge;
pub use config::GnssConfig;
pub use decoder::{
    DecoderConfig, DecoderDriver, DecoderFault, DecoderInstance, FixEventHandler, LocationUpdate,
    RawFixEvent,
};
pub use error::{GnssError, Result};
pub use fix::{FixSnapshot, UtcDate, UtcTime};
pub use monitor::{FixMonitor, MonitorConfig, MonitorOutcome};
pub use power::PowerGate;
pub use reader::{FixSource, GnssReader, POLL_INTERVAL_MS};
pub use session::{GnssSession, SessionShared, SessionState};
pub use store::FixStore;
