//! # Hardware Abstraction Layer for the Radio Bus
//!
//! This module defines the HAL trait the driver is generic over and hosts the
//! platform-specific implementations. The CC1101 control interface is an
//! SPI-like full-duplex byte transfer plus three lines the driver owns
//! directly: chip select (output), the chip-ready handshake line (input, low
//! when the chip is ready to accept a header byte) and the data-ready line
//! (input, asserted while a received packet sits in the RX FIFO).

use thiserror::Error;

/// Errors that can occur during HAL operations
#[derive(Debug, Error)]
pub enum HalError {
    #[error("SPI communication error")]
    Spi,

    #[error("GPIO operation error")]
    Gpio,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Hardware Abstraction Layer trait for CC1101 radio control
///
/// Every bus transaction the driver performs is built from these primitives:
/// assert chip select, wait on the ready line, run one full-duplex transfer,
/// deassert chip select. Chip select is owned by the driver, not the bus
/// layer, because the reset sequence toggles it with no transfer in between.
pub trait Hal {
    /// Full-duplex transfer: `buf` is shifted out and overwritten in place
    /// with the bytes clocked back from the chip
    fn transfer(&mut self, buf: &mut [u8]) -> Result<(), HalError>;

    /// Assert (`true`) or deassert (`false`) the chip select line
    fn chip_select(&mut self, selected: bool) -> Result<(), HalError>;

    /// Whether the chip-ready handshake line reports ready
    fn bus_ready(&mut self) -> Result<bool, HalError>;

    /// Level of the data-ready line
    fn data_ready(&mut self) -> Result<bool, HalError>;

    /// Busy-delay with microsecond resolution
    fn delay_us(&mut self, us: u32);

    /// Yielding delay with millisecond resolution
    fn delay_ms(&mut self, ms: u32);
}

// Platform implementations
#[cfg(feature = "raspberry-pi")]
pub mod raspberry_pi;

#[cfg(feature = "raspberry-pi")]
pub use raspberry_pi::{GpioPins, RaspberryPiHal};
