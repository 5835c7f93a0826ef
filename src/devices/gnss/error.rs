//! GNSS session error types

use crate::devices::gnss::decoder::DecoderFault;
use crate::platform::PlatformError;
use core::fmt;

/// Result type for GNSS session operations
pub type Result<T> = core::result::Result<T, GnssError>;

/// GNSS session errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GnssError {
    /// Configuration failed validation
    InvalidConfig,
    /// Decoder could not be constructed
    DecoderInit(DecoderFault),
    /// Update handler could not be attached; the decoder was released
    HandlerRegistration(DecoderFault),
    /// Operation not allowed in the current session state
    NotReady,
    /// No valid fix arrived within the requested window
    Timeout,
    /// `init` after the session was torn down
    AlreadyDeinitialized,
    /// Wake line could not be configured or driven
    Power(PlatformError),
}

impl From<PlatformError> for GnssError {
    fn from(e: PlatformError) -> Self {
        GnssError::Power(e)
    }
}

impl fmt::Display for GnssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GnssError::InvalidConfig => write!(f, "Invalid GNSS configuration"),
            GnssError::DecoderInit(e) => write!(f, "Decoder initialization failed: {}", e),
            GnssError::HandlerRegistration(e) => {
                write!(f, "Decoder handler registration failed: {}", e)
            }
            GnssError::NotReady => write!(f, "GNSS not ready"),
            GnssError::Timeout => write!(f, "Timed out waiting for GNSS fix"),
            GnssError::AlreadyDeinitialized => write!(f, "GNSS already deinitialized"),
            GnssError::Power(e) => write!(f, "Wake line error: {}", e),
        }
    }
}
