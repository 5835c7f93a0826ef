//! UART framing configuration
//!
//! The GNSS driver never touches the UART itself; the sentence decoder owns
//! the port. These types describe the framing the decoder must apply.

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baud_rate: u32,
    /// Data bits (typically 8)
    pub data_bits: u8,
    /// Parity mode
    pub parity: UartParity,
    /// Stop bits
    pub stop_bits: UartStopBits,
}

impl UartConfig {
    /// 8N1 framing at the given baud rate
    pub const fn with_baud_rate(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: 8,
            parity: UartParity::None,
            stop_bits: UartStopBits::One,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::with_baud_rate(115200)
    }
}

/// UART parity modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartParity {
    /// No parity
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// UART stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartStopBits {
    /// One stop bit
    One,
    /// Two stop bits
    Two,
}
