//! GNSS session configuration

use crate::core::logging::Verbosity;
use crate::devices::gnss::decoder::{DecoderConfig, EVENT_QUEUE_DEPTH};
use crate::devices::gnss::error::{GnssError, Result};
use crate::platform::UartConfig;

/// Time the receiver needs after a wake line edge before it reacts
pub const DEFAULT_WAKE_SETTLE_MS: u32 = 100;

/// Board wiring and behaviour of one receiver
///
/// Consumed by `init`; only the decoder-facing part is kept afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GnssConfig {
    /// UART port the receiver is attached to
    pub transport_id: u8,
    /// MCU receive line (receiver TX)
    pub rx_line: u8,
    /// MCU transmit line (receiver RX)
    pub tx_line: u8,
    /// Wake/enable line
    pub wake_line: u8,
    pub baud_rate: u32,
    /// Delay after each wake line edge
    pub wake_settle_ms: u32,
    pub verbosity: Verbosity,
}

impl Default for GnssConfig {
    fn default() -> Self {
        Self {
            transport_id: 1,
            rx_line: 7,
            tx_line: 8,
            wake_line: 9,
            baud_rate: 115200,
            wake_settle_ms: DEFAULT_WAKE_SETTLE_MS,
            verbosity: Verbosity::Normal,
        }
    }
}

impl GnssConfig {
    pub fn with_transport(mut self, transport_id: u8, rx_line: u8, tx_line: u8) -> Self {
        self.transport_id = transport_id;
        self.rx_line = rx_line;
        self.tx_line = tx_line;
        self
    }

    pub fn with_wake_line(mut self, wake_line: u8) -> Self {
        self.wake_line = wake_line;
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_wake_settle_ms(mut self, wake_settle_ms: u32) -> Self {
        self.wake_settle_ms = wake_settle_ms;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Reject wiring that cannot work
    ///
    /// # Errors
    ///
    /// Returns `GnssError::InvalidConfig` if the baud rate is zero or two of
    /// the rx/tx/wake lines share a pin.
    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(GnssError::InvalidConfig);
        }
        if self.rx_line == self.tx_line
            || self.rx_line == self.wake_line
            || self.tx_line == self.wake_line
        {
            return Err(GnssError::InvalidConfig);
        }
        Ok(())
    }

    /// Parameters handed to the sentence decoder
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            transport_id: self.transport_id,
            rx_line: self.rx_line,
            uart: UartConfig::with_baud_rate(self.baud_rate),
            event_queue_depth: EVENT_QUEUE_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::traits::{UartParity, UartStopBits};

    #[test]
    fn test_default_matches_board_wiring() {
        let config = GnssConfig::default();
        assert_eq!(config.transport_id, 1);
        assert_eq!(config.rx_line, 7);
        assert_eq!(config.tx_line, 8);
        assert_eq!(config.wake_line, 9);
        assert_eq!(config.baud_rate, 115200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_baud_rejected() {
        let config = GnssConfig::default().with_baud_rate(0);
        assert_eq!(config.validate(), Err(GnssError::InvalidConfig));
    }

    #[test]
    fn test_shared_pins_rejected() {
        let rx_is_tx = GnssConfig::default().with_transport(1, 7, 7);
        assert_eq!(rx_is_tx.validate(), Err(GnssError::InvalidConfig));

        let wake_is_rx = GnssConfig::default().with_wake_line(7);
        assert_eq!(wake_is_rx.validate(), Err(GnssError::InvalidConfig));
    }

    #[test]
    fn test_decoder_config_is_8n1() {
        let decoder = GnssConfig::default()
            .with_transport(2, 16, 17)
            .with_baud_rate(9600)
            .decoder_config();
        assert_eq!(decoder.transport_id, 2);
        assert_eq!(decoder.rx_line, 16);
        assert_eq!(decoder.uart.baud_rate, 9600);
        assert_eq!(decoder.uart.data_bits, 8);
        assert_eq!(decoder.uart.parity, UartParity::None);
        assert_eq!(decoder.uart.stop_bits, UartStopBits::One);
        assert_eq!(decoder.event_queue_depth, EVENT_QUEUE_DEPTH);
    }
}
