//! # Register Bus Transport
//!
//! Primitive CC1101 bus operations built on the HAL byte-transfer primitive:
//! single register read/write, burst read/write and command strobes. Every
//! operation runs as one chip-select framed transaction: assert CSn, wait for
//! the chip-ready handshake with a bounded spin, shift the header and data
//! bytes full-duplex, deassert CSn.
//!
//! The ready handshake is capped at a fixed number of spins and surfaces a
//! typed [`BusError::Timeout`] instead of hanging when the chip never reports
//! ready (crystal not running, wiring fault, chip held in reset).

use crate::radio::hal::{Hal, HalError};
use crate::radio::registers::{READ_BURST, READ_SINGLE_BYTE, WRITE_BURST, WRITE_SINGLE_BYTE};
use thiserror::Error;

/// Spins allowed on the ready handshake before giving up
const READY_SPIN_LIMIT: u32 = 1_000;

/// Pause between ready-handshake spins in microseconds
const READY_SPIN_STEP_US: u32 = 1;

/// Errors that can occur on the register bus
#[derive(Debug, Error)]
pub enum BusError {
    /// The chip-ready handshake line never asserted
    #[error("bus ready handshake timed out")]
    Timeout,

    /// Underlying HAL failure
    #[error("HAL error: {0}")]
    Hal(#[from] HalError),
}

/// Access mode for a single register read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Configuration register (0x00-0x2E) or FIFO single byte
    Config,
    /// Status register (0x30-0x3D); read with the burst flag per the CC1101
    /// access scheme
    Status,
}

/// Chip-select framed register transport over a HAL implementation
pub struct RegisterBus<H: Hal> {
    hal: H,
}

impl<H: Hal> RegisterBus<H> {
    pub fn new(hal: H) -> Self {
        Self { hal }
    }

    /// Direct access to the HAL, used by the driver for the reset pulse
    /// sequence and the data-ready line
    pub(crate) fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    /// Run one chip-select framed full-duplex transaction
    fn transact(&mut self, buf: &mut [u8]) -> Result<(), BusError> {
        self.hal.chip_select(true)?;
        let result = self
            .wait_ready()
            .and_then(|_| self.hal.transfer(buf).map_err(BusError::from));
        self.hal.chip_select(false)?;
        result
    }

    /// Bounded spin on the chip-ready handshake line
    fn wait_ready(&mut self) -> Result<(), BusError> {
        for _ in 0..READY_SPIN_LIMIT {
            if self.hal.bus_ready()? {
                return Ok(());
            }
            self.hal.delay_us(READY_SPIN_STEP_US);
        }
        log::error!("chip ready handshake timed out");
        Err(BusError::Timeout)
    }

    /// Write a single configuration register
    pub fn write_register(&mut self, addr: u8, value: u8) -> Result<(), BusError> {
        let mut buf = [addr | WRITE_SINGLE_BYTE, value];
        self.transact(&mut buf)
    }

    /// Read a single register
    ///
    /// Status registers share their address range with the command strobes
    /// and must be read with [`RegisterAccess::Status`].
    pub fn read_register(&mut self, addr: u8, access: RegisterAccess) -> Result<u8, BusError> {
        let header = match access {
            RegisterAccess::Config => addr | READ_SINGLE_BYTE,
            RegisterAccess::Status => addr | READ_BURST,
        };
        let mut buf = [header, 0xFF];
        self.transact(&mut buf)?;
        Ok(buf[1])
    }

    /// Write several consecutive registers (or FIFO bytes) in one burst
    pub fn write_burst(&mut self, addr: u8, data: &[u8]) -> Result<(), BusError> {
        let mut buf = Vec::with_capacity(data.len() + 1);
        buf.push(addr | WRITE_BURST);
        buf.extend_from_slice(data);
        self.transact(&mut buf)
    }

    /// Read `buf.len()` consecutive registers (or FIFO bytes) in one burst
    pub fn read_burst(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), BusError> {
        let mut frame = vec![0u8; buf.len() + 1];
        frame[0] = addr | READ_BURST;
        self.transact(&mut frame)?;
        buf.copy_from_slice(&frame[1..]);
        Ok(())
    }

    /// Send a one-byte command strobe
    pub fn strobe(&mut self, cmd: u8) -> Result<(), BusError> {
        let mut buf = [cmd | WRITE_SINGLE_BYTE];
        self.transact(&mut buf)
    }
}
