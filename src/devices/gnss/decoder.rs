//! Sentence decoder seam
//!
//! The decoder that turns raw serial sentences into typed events lives
//! outside this crate. These traits describe what the session needs from
//! it: construction against a transport, a single handler slot, and
//! teardown.

use crate::devices::gnss::fix::{UtcDate, UtcTime};
use crate::platform::{PlatformError, UartConfig};
use core::fmt;

/// Depth of the decoder's internal event queue. Sized for the bursts a
/// receiver emits once per second (GGA, GSA, several GSV, RMC, VTG).
pub const EVENT_QUEUE_DEPTH: usize = 32;

/// Transport parameters handed to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderConfig {
    /// UART port number
    pub transport_id: u8,
    /// Receive line GPIO number
    pub rx_line: u8,
    /// Serial framing (always 8N1 for NMEA receivers)
    pub uart: UartConfig,
    /// Internal event queue depth
    pub event_queue_depth: usize,
}

/// Location update as reported by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters; 0.0 when the sentence carried no altitude
    pub altitude: f32,
    /// 0.0 when the sentence carried no HDOP
    pub horizontal_dilution: f32,
    pub satellites_in_use: u8,
    pub satellites_in_view: u8,
    pub utc_time: UtcTime,
    pub utc_date: UtcDate,
    /// Receiver's own position validity flag
    pub valid: bool,
}

/// Event delivered by the decoder. Borrowed for one handler call only.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RawFixEvent {
    LocationUpdate(LocationUpdate),
    UnknownSentence,
}

/// Decoder-side failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderFault {
    /// UART could not be set up
    Transport(PlatformError),
    /// Event queue or parser buffers could not be allocated
    OutOfMemory,
    /// The decoder refused the handler
    HandlerRejected,
}

impl fmt::Display for DecoderFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecoderFault::Transport(e) => write!(f, "transport: {}", e),
            DecoderFault::OutOfMemory => write!(f, "out of memory"),
            DecoderFault::HandlerRejected => write!(f, "handler rejected"),
        }
    }
}

/// Receiver of decoder events.
///
/// Called from the decoder's own context, one event at a time. Must not
/// block or allocate.
pub trait FixEventHandler: Sync {
    fn on_event(&self, event: &RawFixEvent);
}

/// Factory for decoder instances
pub trait DecoderDriver<'a> {
    type Decoder: DecoderInstance<'a>;

    /// Construct a decoder bound to the given transport
    ///
    /// # Errors
    ///
    /// Returns the decoder's fault if the port or its buffers cannot be set up.
    fn create(&mut self, config: &DecoderConfig) -> Result<Self::Decoder, DecoderFault>;
}

/// A running decoder
pub trait DecoderInstance<'a> {
    /// Attach the update handler
    ///
    /// # Errors
    ///
    /// Returns a fault if the handler cannot be registered. The instance is
    /// still alive and must be released by the caller.
    fn add_handler(&mut self, handler: &'a dyn FixEventHandler) -> Result<(), DecoderFault>;

    /// Detach the update handler. No events are delivered after this returns.
    fn remove_handler(&mut self);

    /// Tear the decoder down and free its transport
    fn release(self);
}
