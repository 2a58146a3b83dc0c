//! # Raspberry Pi HAL Implementation
//!
//! Hardware abstraction layer implementation for Raspberry Pi 4 and 5,
//! providing SPI communication and GPIO control for CC1101 radio modules.
//!
//! ## Hardware Setup
//!
//! ### SPI0 Pins
//! ```text
//! Pi Pin │ BCM GPIO │ CC1101 Pin │ Function
//! ───────┼──────────┼────────────┼─────────────
//! 19     │ GPIO 10  │ MOSI       │ SPI data out
//! 21     │ GPIO 9   │ MISO       │ SPI data in
//! 23     │ GPIO 11  │ SCLK       │ SPI clock
//! ```
//!
//! ### Control Pins (configurable)
//! ```text
//! Pi Pin │ BCM GPIO │ CC1101 Pin │ Function
//! ───────┼──────────┼────────────┼──────────────────────
//! 22     │ GPIO 25  │ CSn        │ Chip select (output)
//! 16     │ GPIO 23  │ GDO0       │ Data ready (input)
//! ```
//!
//! The chip select is driven in software from a plain GPIO output so the
//! driver can hold it across a multi-byte transaction and pulse it during the
//! reset sequence. The SPI clock is kept at 5 MHz or below, which per the
//! CC1101 datasheet removes the need to pause between header and data bytes;
//! the ready handshake therefore reports ready immediately (MISO is owned by
//! the SPI peripheral and cannot be sampled as a GPIO on this platform).

use crate::radio::hal::{Hal, HalError};
use crate::radio::signal::PacketSignal;
use rppal::gpio::{Gpio, InputPin, Level, OutputPin};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// SPI clock for the CC1101 control interface
const SPI_SPEED: u32 = 5_000_000;

/// GPIO pin configuration for CC1101 connections
///
/// All pin numbers use BCM GPIO numbering, not physical pin numbers.
#[derive(Debug, Clone)]
pub struct GpioPins {
    /// CSn chip select pin (output, active low)
    pub csn: u8,
    /// GDO0 data-ready pin (input)
    pub gdo0: u8,
}

impl Default for GpioPins {
    fn default() -> Self {
        Self { csn: 25, gdo0: 23 }
    }
}

/// Raspberry Pi HAL implementation for the CC1101 radio
///
/// Requires SPI enabled in `/boot/config.txt` (`dtparam=spi=on`) and the
/// `raspberry-pi` cargo feature.
pub struct RaspberryPiHal {
    spi: Spi,
    csn_pin: OutputPin,
    gdo0_pin: InputPin,
}

impl RaspberryPiHal {
    /// Create a new Raspberry Pi HAL instance
    ///
    /// # Arguments
    ///
    /// * `spi_bus` - SPI bus number (0 for primary SPI, 1 for auxiliary SPI)
    /// * `pins` - GPIO pin configuration for the CSn and GDO0 lines
    pub fn new(spi_bus: u8, pins: &GpioPins) -> Result<Self, HalError> {
        let bus = match spi_bus {
            0 => Bus::Spi0,
            1 => Bus::Spi1,
            _ => {
                return Err(HalError::InvalidConfig(format!(
                    "invalid SPI bus {spi_bus}, only 0 and 1 are supported"
                )))
            }
        };

        let spi = Spi::new(bus, SlaveSelect::Ss0, SPI_SPEED, Mode::Mode0).map_err(|e| {
            log::error!("SPI initialization failed: {e}");
            HalError::Spi
        })?;

        let gpio = Gpio::new().map_err(|e| {
            log::error!("GPIO initialization failed: {e}");
            HalError::Gpio
        })?;

        let mut csn_pin = gpio
            .get(pins.csn)
            .map_err(|e| {
                log::error!("CSn pin {} unavailable: {e}", pins.csn);
                HalError::Gpio
            })?
            .into_output();
        csn_pin.set_high();

        let gdo0_pin = gpio
            .get(pins.gdo0)
            .map_err(|e| {
                log::error!("GDO0 pin {} unavailable: {e}", pins.gdo0);
                HalError::Gpio
            })?
            .into_input_pullup();

        log::info!("Raspberry Pi HAL initialized:");
        log::info!("  SPI: SPI{spi_bus} at {} kHz", SPI_SPEED / 1000);
        log::info!("  CSn:  GPIO {}", pins.csn);
        log::info!("  GDO0: GPIO {}", pins.gdo0);

        Ok(Self {
            spi,
            csn_pin,
            gdo0_pin,
        })
    }

    /// Route GDO0 falling edges into a counting packet signal
    ///
    /// The chip deasserts GDO0 at the end of a received packet when the pin
    /// is configured in sync-detect mode, so each falling edge marks one
    /// complete frame in the RX FIFO. The interrupt context only bumps the
    /// counter; the consuming task drains it through `packet_available()`.
    #[cfg(feature = "gpio-interrupt")]
    pub fn enable_packet_interrupt(&mut self, signal: Arc<PacketSignal>) -> Result<(), HalError> {
        use rppal::gpio::Trigger;

        self.gdo0_pin
            .set_async_interrupt(Trigger::FallingEdge, move |_: Level| {
                signal.notify();
            })
            .map_err(|e| {
                log::error!("failed to install GDO0 interrupt: {e}");
                HalError::Gpio
            })?;

        log::info!("GDO0 edge interrupt armed");
        Ok(())
    }

    #[cfg(not(feature = "gpio-interrupt"))]
    pub fn enable_packet_interrupt(&mut self, _signal: Arc<PacketSignal>) -> Result<(), HalError> {
        Err(HalError::InvalidConfig(
            "gpio-interrupt feature not enabled".to_string(),
        ))
    }
}

impl Hal for RaspberryPiHal {
    fn transfer(&mut self, buf: &mut [u8]) -> Result<(), HalError> {
        let tx = buf.to_vec();
        self.spi.transfer(buf, &tx).map_err(|e| {
            log::error!("SPI transfer failed: {e}");
            HalError::Spi
        })?;
        Ok(())
    }

    fn chip_select(&mut self, selected: bool) -> Result<(), HalError> {
        if selected {
            self.csn_pin.set_low();
        } else {
            self.csn_pin.set_high();
        }
        Ok(())
    }

    fn bus_ready(&mut self) -> Result<bool, HalError> {
        // Paced by the 5 MHz clock; MISO is not sampled on this platform.
        Ok(true)
    }

    fn data_ready(&mut self) -> Result<bool, HalError> {
        Ok(self.gdo0_pin.read() == Level::High)
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
