//! # CC1101 Radio Driver
//!
//! High-level driver for the TI CC1100/CC1101 sub-1GHz transceiver. The
//! driver owns the mirrored chip configuration, drives the main radio control
//! state machine through command strobes with bounded status polling, and
//! moves frames through the 64-byte hardware FIFOs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │     Link protocol (link.rs)     │
//! ├─────────────────────────────────┤
//! │    Cc1101Driver (this file)     │
//! ├─────────────────────────────────┤
//! │   RegisterBus (chip-select +    │
//! │   ready handshake + transfer)   │
//! ├─────────────────────────────────┤
//! │    Platform-specific HAL impl   │
//! └─────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use cc1101_rs::config::RadioConfig;
//! use cc1101_rs::radio::driver::Cc1101Driver;
//!
//! let hal = RaspberryPiHal::new(0, &GpioPins::default())?;
//! let mut driver = Cc1101Driver::new(hal, RadioConfig::default());
//! driver.initialize()?;
//!
//! driver.send_data(b"Hello World")?;
//! if driver.wait_for_packet(100)? {
//!     let packet = driver.receive_data()?;
//!     println!("{} bytes, {} dBm", packet.length, packet.rssi_dbm(74));
//! }
//! ```

use crate::config::RadioConfig;
use crate::radio::bus::{BusError, RegisterAccess, RegisterBus};
use crate::radio::hal::{Hal, HalError};
use crate::radio::packet::{self, Packet};
use crate::radio::profiles::{pa_index_for_dbm, Band};
use crate::radio::registers as regs;
use crate::radio::signal::PacketSignal;
use log::{debug, error, info, warn};
use std::sync::Arc;
use thiserror::Error;

/// Pause between chip status polls in microseconds
const STATE_POLL_STEP_US: u32 = 10;

/// Poll budget for IDLE/RX transitions (about 100 ms)
const STATE_POLL_LIMIT: u32 = 10_000;

/// Poll budget for transmit completion; a full frame at 1.2 kBd needs
/// several hundred milliseconds on the air
const TX_POLL_LIMIT: u32 = 400_000;

/// Settle time after a FIFO flush strobe in microseconds
const FIFO_SETTLE_US: u32 = 100;

/// Errors that can occur during radio driver operations
#[derive(Debug, Error)]
pub enum DriverError {
    /// Register bus failure (handshake timeout or HAL fault)
    #[error("bus error: {0}")]
    Bus(#[from] BusError),
    /// Wrong part/version register value at initialization; fatal for this
    /// driver instance
    #[error("chip identity mismatch: PARTNUM {partnum:#04X}, VERSION {version:#04X}")]
    ChipIdentityMismatch { partnum: u8, version: u8 },
    /// A strobed state transition never reported completion
    #[error("timed out waiting for chip state {marcstate:#04X}")]
    StateTimeout { marcstate: u8 },
    /// TX FIFO drained mid-packet; the FIFO has been flushed
    #[error("TX FIFO underflow")]
    TxUnderflow,
    /// RX FIFO overflowed; the buffered frame is invalid and has been flushed
    #[error("RX FIFO overflow")]
    RxOverflow,
    /// Frame larger than the hardware FIFO
    #[error("frame of {0} bytes exceeds FIFO capacity")]
    OversizedFrame(usize),
}

impl From<HalError> for DriverError {
    fn from(err: HalError) -> Self {
        DriverError::Bus(BusError::Hal(err))
    }
}

/// Radio control states mirrored from the chip state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipState {
    /// Frequency synthesizer off, ready for configuration
    Idle,
    /// Receiver enabled
    Rx,
    /// Transmitter enabled
    Tx,
    /// Sleep or crystal-off state
    PowerDown,
    /// Transient synthesizer calibration or settling state
    Calibrating,
    /// Value not covered by the MARCSTATE table
    Unknown,
}

impl ChipState {
    /// Decode a raw MARCSTATE status value
    pub fn from_marcstate(raw: u8) -> Self {
        match raw & regs::MARCSTATE_MASK {
            regs::MARCSTATE_SLEEP | regs::MARCSTATE_XOFF => ChipState::PowerDown,
            regs::MARCSTATE_IDLE => ChipState::Idle,
            regs::MARCSTATE_CAL_FIRST..=regs::MARCSTATE_CAL_LAST => ChipState::Calibrating,
            0x0D..=0x11 => ChipState::Rx,
            0x12..=0x16 => ChipState::Tx,
            _ => ChipState::Unknown,
        }
    }
}

/// Main driver structure for the CC1101 transceiver
///
/// One instance exclusively owns the bus handle, the mirrored configuration
/// and the chip state; concurrent access from multiple threads requires
/// external mutual exclusion.
///
/// ## Type Parameters
///
/// * `H` - Hardware abstraction layer implementation providing the bus
///   transfer and GPIO access
pub struct Cc1101Driver<H: Hal> {
    /// Chip-select framed register transport
    bus: RegisterBus<H>,
    /// Mirror of the chip configuration
    config: RadioConfig,
    /// Last state the driver put the chip into
    state: ChipState,
    /// Whether GDO is configured in sync-detect mode (asserted for the whole
    /// packet instead of pulsing on completion)
    sync_detect_gdo: bool,
    /// Optional counting edge signal fed from interrupt context
    signal: Option<Arc<PacketSignal>>,
}

impl<H: Hal> Cc1101Driver<H> {
    /// Create a new driver instance
    ///
    /// The chip is untouched until [`initialize`](Self::initialize) runs.
    pub fn new(hal: H, config: RadioConfig) -> Self {
        Self {
            bus: RegisterBus::new(hal),
            config,
            state: ChipState::PowerDown,
            sync_detect_gdo: false,
            signal: None,
        }
    }

    /// Initialize the radio: reset, verify chip identity, load the full
    /// configuration and enter receive mode
    ///
    /// # Errors
    ///
    /// [`DriverError::ChipIdentityMismatch`] is fatal: the part on the bus is
    /// not a CC1101 and no registers are configured.
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        info!(
            "initializing CC1101: {} / {}",
            self.config.band.label(),
            self.config.data_rate.label()
        );

        self.power_on_reset()?;
        self.flush_fifos()?;
        self.check_identity()?;
        self.apply_config()?;
        self.to_idle()?;

        // Detect packets on GDO level: asserts on sync word, deasserts at
        // end of packet
        self.bus
            .write_register(regs::IOCFG2, regs::GDO_CFG_SYNC_DETECT)?;
        self.sync_detect_gdo = true;

        self.to_receive()?;
        info!("initialization done, receiver active");
        Ok(())
    }

    /// Reset the chip and replay the full configuration
    ///
    /// The chip does not retain its register file across reset, so the
    /// profile, sync word, device address, channel and carrier settings are
    /// all rewritten.
    pub fn reset(&mut self) -> Result<(), DriverError> {
        self.power_on_reset()?;
        self.flush_fifos()?;
        self.apply_config()
    }

    /// Datasheet power-on-reset sequence: CSn wiggle with microsecond
    /// timing, then the reset strobe
    fn power_on_reset(&mut self) -> Result<(), DriverError> {
        let hal = self.bus.hal_mut();
        hal.chip_select(false)?;
        hal.delay_us(5);
        hal.chip_select(true)?;
        hal.delay_us(10);
        hal.chip_select(false)?;
        hal.delay_us(41);

        self.bus.strobe(regs::SRES)?;
        self.bus.hal_mut().delay_ms(1);
        self.state = ChipState::Idle;
        debug!("chip reset issued");
        Ok(())
    }

    fn flush_fifos(&mut self) -> Result<(), DriverError> {
        self.bus.strobe(regs::SFTX)?;
        self.bus.hal_mut().delay_us(FIFO_SETTLE_US);
        self.bus.strobe(regs::SFRX)?;
        self.bus.hal_mut().delay_us(FIFO_SETTLE_US);
        Ok(())
    }

    fn check_identity(&mut self) -> Result<(), DriverError> {
        let partnum = self.bus.read_register(regs::PARTNUM, RegisterAccess::Status)?;
        let version = self.bus.read_register(regs::VERSION, RegisterAccess::Status)?;
        info!("chip identity: PARTNUM {partnum:#04X}, VERSION {version:#04X}");

        if partnum != regs::CHIP_PARTNUM || !regs::CHIP_VERSIONS.contains(&version) {
            error!("no CC11xx found [{partnum:#04X}/{version:#04X}]");
            return Err(DriverError::ChipIdentityMismatch { partnum, version });
        }
        Ok(())
    }

    /// Burst-write the rate profile, then write-through every mirrored field
    fn apply_config(&mut self) -> Result<(), DriverError> {
        let profile = self.config.data_rate.profile();
        self.bus.write_burst(regs::IOCFG2, profile)?;

        let cfg = self.config.clone();
        self.set_sync_word(cfg.sync_word[0], cfg.sync_word[1])?;
        self.set_device_address(cfg.device_address)?;
        self.set_channel(cfg.channel)?;
        self.set_carrier_band(cfg.band)?;
        self.set_output_power(cfg.power_dbm)?;
        Ok(())
    }

    // ====================== WRITE-THROUGH SETTERS ======================

    /// Set the synchronization word
    pub fn set_sync_word(&mut self, hi: u8, lo: u8) -> Result<(), DriverError> {
        self.bus.write_register(regs::SYNC1, hi)?;
        self.bus.write_register(regs::SYNC0, lo)?;
        self.config.sync_word = [hi, lo];
        Ok(())
    }

    /// Set the hardware packet-filter device address
    pub fn set_device_address(&mut self, addr: u8) -> Result<(), DriverError> {
        self.bus.write_register(regs::ADDR, addr)?;
        self.config.device_address = addr;
        Ok(())
    }

    /// Set the frequency channel number
    pub fn set_channel(&mut self, channel: u8) -> Result<(), DriverError> {
        self.bus.write_register(regs::CHANNR, channel)?;
        self.config.channel = channel;
        Ok(())
    }

    /// Select an ISM band: programs the frequency control words and the
    /// band's PATABLE amplitude ramp
    pub fn set_carrier_band(&mut self, band: Band) -> Result<(), DriverError> {
        let [freq2, freq1, freq0] = band.freq_word();
        self.bus.write_register(regs::FREQ2, freq2)?;
        self.bus.write_register(regs::FREQ1, freq1)?;
        self.bus.write_register(regs::FREQ0, freq0)?;
        self.bus.write_burst(regs::PATABLE, band.power_table())?;
        self.config.band = band;
        Ok(())
    }

    /// Program an arbitrary carrier frequency in Hz
    ///
    /// Overrides the band frequency words until the next reset; the mirrored
    /// band selection (and its PATABLE) is left as configured.
    pub fn set_carrier_frequency_hz(&mut self, hz: u32) -> Result<(), DriverError> {
        let word = ((hz as u64) << 16) / regs::CRYSTAL_FREQUENCY as u64;
        let freq2 = ((word >> 16) & 0x3F) as u8;
        let freq1 = (word >> 8) as u8;
        let freq0 = word as u8;
        warn!("carrier frequency set to {hz} Hz [{freq2:02X} {freq1:02X} {freq0:02X}]");

        self.to_idle()?;
        self.bus.write_register(regs::FREQ2, freq2)?;
        self.bus.write_register(regs::FREQ1, freq1)?;
        self.bus.write_register(regs::FREQ0, freq0)?;
        self.to_receive()
    }

    /// Select the output power in dBm from the band's PATABLE ramp
    pub fn set_output_power(&mut self, dbm: i8) -> Result<(), DriverError> {
        let index = pa_index_for_dbm(dbm);
        let frend0 = self.bus.read_register(regs::FREND0, RegisterAccess::Config)?;
        self.bus
            .write_register(regs::FREND0, (frend0 & 0xF8) | index)?;
        self.config.power_dbm = dbm;
        Ok(())
    }

    /// Replace the PATABLE amplitude ramp
    pub fn set_patable(&mut self, table: &[u8; 8]) -> Result<(), DriverError> {
        self.bus.write_burst(regs::PATABLE, table)
            .map_err(Into::into)
    }

    // ========================= MODEM TUNING =========================

    /// Set the modulation format field of MDMCFG2
    pub fn set_modulation(&mut self, format: Modulation) -> Result<(), DriverError> {
        let data = self.bus.read_register(regs::MDMCFG2, RegisterAccess::Config)?;
        let data = (data & 0x8F) | (((format as u8) << 4) & 0x70);
        self.bus.write_register(regs::MDMCFG2, data)?;
        Ok(())
    }

    /// Set the preamble length field of MDMCFG1
    pub fn set_preamble_length(&mut self, cfg: u8) -> Result<(), DriverError> {
        let data = self.bus.read_register(regs::MDMCFG1, RegisterAccess::Config)?;
        let data = (data & 0x8F) | ((cfg << 4) & 0x70);
        self.bus.write_register(regs::MDMCFG1, data)?;
        Ok(())
    }

    /// Set modem data rate and deviation registers directly
    pub fn set_data_rate_regs(
        &mut self,
        mdmcfg4: u8,
        mdmcfg3: u8,
        deviatn: u8,
    ) -> Result<(), DriverError> {
        self.bus.write_register(regs::MDMCFG4, mdmcfg4)?;
        self.bus.write_register(regs::MDMCFG3, mdmcfg3)?;
        self.bus.write_register(regs::DEVIATN, deviatn)?;
        Ok(())
    }

    /// Set the sync word qualifier mode field of MDMCFG2
    pub fn set_sync_mode(&mut self, cfg: u8) -> Result<(), DriverError> {
        let data = self.bus.read_register(regs::MDMCFG2, RegisterAccess::Config)?;
        let data = (data & 0xF8) | (cfg & 0x07);
        self.bus.write_register(regs::MDMCFG2, data)?;
        Ok(())
    }

    /// Enable or disable forward error correction with interleaving
    pub fn set_fec(&mut self, enable: bool) -> Result<(), DriverError> {
        let data = self.bus.read_register(regs::MDMCFG1, RegisterAccess::Config)?;
        let data = (data & 0x7F) | (u8::from(enable) << 7);
        self.bus.write_register(regs::MDMCFG1, data)?;
        Ok(())
    }

    /// Enable or disable data whitening
    pub fn set_data_whitening(&mut self, enable: bool) -> Result<(), DriverError> {
        let data = self.bus.read_register(regs::PKTCTRL0, RegisterAccess::Config)?;
        let data = (data & 0xBF) | (u8::from(enable) << 6);
        self.bus.write_register(regs::PKTCTRL0, data)?;
        Ok(())
    }

    /// Enable or disable Manchester encoding
    pub fn set_manchester_encoding(&mut self, enable: bool) -> Result<(), DriverError> {
        let data = self.bus.read_register(regs::MDMCFG2, RegisterAccess::Config)?;
        let data = (data & 0xF7) | (u8::from(enable) << 3);
        self.bus.write_register(regs::MDMCFG2, data)?;
        Ok(())
    }

    // ========================= STATE MACHINE =========================

    fn read_marcstate(&mut self) -> Result<u8, DriverError> {
        Ok(self
            .bus
            .read_register(regs::MARCSTATE, RegisterAccess::Status)?
            & regs::MARCSTATE_MASK)
    }

    /// Poll MARCSTATE until it reports `target`, bounded by `limit` polls
    fn wait_for_marcstate(&mut self, target: u8, limit: u32) -> Result<(), DriverError> {
        for _ in 0..limit {
            if self.read_marcstate()? == target {
                return Ok(());
            }
            self.bus.hal_mut().delay_us(STATE_POLL_STEP_US);
        }
        error!("timed out waiting for MARCSTATE {target:#04X}");
        Err(DriverError::StateTimeout { marcstate: target })
    }

    /// Enter IDLE
    pub fn to_idle(&mut self) -> Result<(), DriverError> {
        self.bus.strobe(regs::SIDLE)?;
        self.wait_for_marcstate(regs::MARCSTATE_IDLE, STATE_POLL_LIMIT)?;
        self.state = ChipState::Idle;
        Ok(())
    }

    /// Enter RX, forcing IDLE first; RX and TX are never entered from each
    /// other directly
    pub fn to_receive(&mut self) -> Result<(), DriverError> {
        self.to_idle()?;
        self.bus.strobe(regs::SRX)?;
        self.wait_for_marcstate(regs::MARCSTATE_RX, STATE_POLL_LIMIT)?;
        self.state = ChipState::Rx;
        Ok(())
    }

    /// Strobe TX and wait for the transmission to finish
    ///
    /// The state machine is configured to fall back to IDLE after the
    /// packet, so completion is the return to IDLE. A TX FIFO underflow
    /// aborts the attempt: the FIFO is flushed and the failure reported for
    /// the caller to retry at the link layer.
    fn to_transmit(&mut self) -> Result<(), DriverError> {
        self.bus.strobe(regs::STX)?;
        self.state = ChipState::Tx;

        for _ in 0..TX_POLL_LIMIT {
            let marcstate = self.read_marcstate()?;
            if marcstate == regs::MARCSTATE_IDLE {
                self.state = ChipState::Idle;
                return Ok(());
            }
            if marcstate == regs::MARCSTATE_TXFIFO_UNDERFLOW {
                warn!("TX FIFO underflow, flushing");
                self.bus.strobe(regs::SFTX)?;
                self.state = ChipState::Idle;
                return Err(DriverError::TxUnderflow);
            }
            self.bus.hal_mut().delay_us(STATE_POLL_STEP_US);
        }
        error!("transmission never completed");
        Err(DriverError::StateTimeout {
            marcstate: regs::MARCSTATE_IDLE,
        })
    }

    // ========================= DATA PATH =========================

    /// Load a framed packet into the TX FIFO, transmit it and return to RX
    ///
    /// The chip is back in receive mode when this returns, success or not.
    pub(crate) fn transmit_frame(&mut self, frame: &[u8]) -> Result<(), DriverError> {
        if frame.len() > packet::FIFO_SIZE {
            return Err(DriverError::OversizedFrame(frame.len()));
        }
        debug!("TX FIFO: {}", hex::encode(frame));

        if self.state == ChipState::Rx {
            self.to_idle()?;
        }
        self.bus.write_burst(regs::FIFO, frame)?;

        let sent = self.to_transmit();
        self.to_receive()?;
        sent
    }

    /// Transmit a raw payload (length-prefixed, no addressing)
    pub fn send_data(&mut self, payload: &[u8]) -> Result<(), DriverError> {
        if payload.len() > packet::MAX_FRAME_LEN {
            return Err(DriverError::OversizedFrame(payload.len()));
        }
        self.transmit_frame(&packet::encode_raw(payload))
    }

    /// Pull one frame out of the RX FIFO
    ///
    /// Always flushes the RX FIFO and re-enters receive mode before
    /// returning, so the chip is ready for the next packet even on the
    /// error paths. An oversized length byte marks a corrupt frame and
    /// yields an empty packet rather than a truncated copy.
    pub fn receive_data(&mut self) -> Result<Packet, DriverError> {
        let rx_bytes = self.bus.read_register(regs::RXBYTES, RegisterAccess::Status)?;

        let outcome = if rx_bytes & regs::FIFO_OVERFLOW_FLAG != 0 {
            warn!("RX FIFO overflow [{rx_bytes:#04X}], discarding buffer");
            Err(DriverError::RxOverflow)
        } else if rx_bytes & regs::FIFO_BYTES_MASK == 0 {
            debug!("RX FIFO empty");
            Ok(Packet::empty())
        } else {
            let length = self.bus.read_register(regs::FIFO, RegisterAccess::Config)?;
            if length as usize > packet::MAX_FRAME_LEN {
                warn!("oversized frame (length {length}), discarding");
                Ok(Packet::empty())
            } else {
                let mut body = vec![0u8; length as usize + 2];
                self.bus.read_burst(regs::FIFO, &mut body)?;
                debug!("RX FIFO: {length:02X} {}", hex::encode(&body));
                Ok(Packet::from_fifo(length, &body))
            }
        };

        // Leave the receiver armed again whatever happened above
        self.to_idle()?;
        self.bus.strobe(regs::SFRX)?;
        self.bus.hal_mut().delay_us(FIFO_SETTLE_US);
        self.to_receive()?;

        outcome
    }

    /// Whether a received packet is waiting in the RX FIFO
    ///
    /// Consumes one notification from the edge signal when one is attached;
    /// otherwise level-polls the data-ready line. In sync-detect mode the
    /// line stays asserted until the end of the packet, so the poll drains
    /// that window (bounded) before reporting.
    pub fn packet_available(&mut self) -> Result<bool, DriverError> {
        if let Some(signal) = &self.signal {
            return Ok(signal.take());
        }

        if self.bus.hal_mut().data_ready()? {
            if self.sync_detect_gdo {
                for _ in 0..STATE_POLL_LIMIT {
                    if !self.bus.hal_mut().data_ready()? {
                        break;
                    }
                    self.bus.hal_mut().delay_us(STATE_POLL_STEP_US);
                }
            }
            debug!("packet available");
            return Ok(true);
        }
        Ok(false)
    }

    /// Poll for an incoming packet for up to `timeout_ms` milliseconds
    pub fn wait_for_packet(&mut self, timeout_ms: u32) -> Result<bool, DriverError> {
        for _ in 0..timeout_ms {
            self.bus.hal_mut().delay_ms(1);
            if self.packet_available()? {
                return Ok(true);
            }
        }
        warn!("no packet received within {timeout_ms} ms");
        Ok(false)
    }

    /// Instantaneous signal strength reading in dBm
    pub fn rssi_dbm(&mut self, offset: i16) -> Result<i16, DriverError> {
        let raw = self.bus.read_register(regs::RSSI, RegisterAccess::Status)?;
        Ok(packet::rssi_to_dbm(raw, offset))
    }

    // ======================== POWER MANAGEMENT ========================

    /// Put the chip into its lowest-power sleep state
    pub fn power_down(&mut self) -> Result<(), DriverError> {
        self.to_idle()?;
        self.bus.strobe(regs::SPWD)?;
        self.state = ChipState::PowerDown;
        info!("chip powered down");
        Ok(())
    }

    /// Wake the chip from power down and re-enter receive mode
    pub fn wake_up(&mut self) -> Result<(), DriverError> {
        let hal = self.bus.hal_mut();
        hal.chip_select(true)?;
        hal.delay_us(10);
        hal.chip_select(false)?;
        hal.delay_us(10);
        self.to_receive()
    }

    // ========================== ACCESSORS ==========================

    /// Route packet-ready notifications through a counting edge signal
    /// instead of level polling
    pub fn attach_signal(&mut self, signal: Arc<PacketSignal>) {
        self.signal = Some(signal);
    }

    /// Last state the driver put the chip into
    pub fn state(&self) -> ChipState {
        self.state
    }

    /// Mirrored chip configuration
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    pub(crate) fn delay_us(&mut self, us: u32) {
        self.bus.hal_mut().delay_us(us);
    }

    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.bus.hal_mut().delay_ms(ms);
    }
}

/// Modulation format values for the MDMCFG2 register field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modulation {
    Fsk2 = 0,
    Gfsk = 1,
    AskOok = 3,
    Fsk4 = 4,
    Msk = 7,
}
