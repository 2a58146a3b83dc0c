//! # cc1101-rs - A Rust Driver for the TI CC1100/CC1101 Transceiver
//!
//! The cc1101-rs crate drives the TI CC1100/CC1101 sub-1GHz radio
//! transceiver over its SPI-style register interface and layers an addressed
//! packet protocol with acknowledgement and retry on top of the raw link.
//!
//! ## Features
//!
//! - Register profiles for GFSK (1.2/38.4/100 kBd), MSK (250/500 kBd) and
//!   OOK (4.8 kBd) in the 315/433/868/915 MHz ISM bands
//! - Chip state machine control with bounded status polling and typed
//!   timeout errors instead of unbounded busy loops
//! - Variable-length packet codec with RSSI/LQI/CRC extraction from the
//!   appended status trailer
//! - Addressed link protocol: acknowledged unicast with a retry budget,
//!   fire-and-forget broadcast, automatic acknowledgement of received data
//! - Hardware abstraction trait with a Raspberry Pi implementation behind
//!   the `raspberry-pi` feature; any platform providing an SPI-like
//!   full-duplex transfer and three GPIO lines can host the driver
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cc1101_rs::{Cc1101Driver, LinkLayer, LinkParams, RadioConfig};
//! use cc1101_rs::radio::hal::raspberry_pi::{GpioPins, RaspberryPiHal};
//!
//! let hal = RaspberryPiHal::new(0, &GpioPins::default())?;
//! let mut driver = Cc1101Driver::new(hal, RadioConfig::default());
//! driver.initialize()?;
//!
//! let mut link = LinkLayer::new(driver, LinkParams::default());
//! link.send_packet(0x03, b"Hello World", 3)?;
//! ```

pub mod config;
pub mod error;
pub mod link;
pub mod logging;
pub mod radio;

pub use crate::error::Cc1101Error;
pub use crate::logging::init_logger;

// Core radio types
pub use config::{AppConfig, RadioConfig};
pub use radio::bus::{BusError, RegisterAccess, RegisterBus};
pub use radio::driver::{Cc1101Driver, ChipState, DriverError, Modulation};
pub use radio::hal::{Hal, HalError};
pub use radio::packet::{Packet, DEFAULT_RSSI_OFFSET, FIFO_SIZE, MAX_FRAME_LEN, MAX_LINK_PAYLOAD};
pub use radio::profiles::{Band, DataRate};
pub use radio::signal::PacketSignal;

// Addressed link protocol
pub use link::{LinkError, LinkEvent, LinkFrame, LinkLayer, LinkParams, ACK_TAG, BROADCAST_ADDRESS};
