//! Mock HAL emulating the CC1101 SPI transaction protocol for tests.
//!
//! Each `transfer` call is one chip-select framed transaction: the header
//! byte selects single/burst access and read/write direction, strobes are
//! one-byte writes into the 0x30-0x3D range, and status registers are reads
//! with the burst flag set. The mock keeps enough chip model to exercise the
//! driver: a register file, both FIFOs, the MARCSTATE state byte and the
//! identity registers.

use cc1101_rs::{Hal, HalError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// Strobe and status addresses, mirrored locally so the mock stays
// independent of the crate internals it exercises
const SRES: u8 = 0x30;
const SRX: u8 = 0x34;
const STX: u8 = 0x35;
const SIDLE: u8 = 0x36;
const SPWD: u8 = 0x39;
const SFRX: u8 = 0x3A;
const SFTX: u8 = 0x3B;

const PARTNUM: u8 = 0x30;
const VERSION: u8 = 0x31;
const RSSI: u8 = 0x34;
const MARCSTATE: u8 = 0x35;
const TXBYTES: u8 = 0x3A;
const RXBYTES: u8 = 0x3B;

const MARCSTATE_IDLE: u8 = 0x01;
const MARCSTATE_RX: u8 = 0x0D;
const MARCSTATE_SLEEP: u8 = 0x00;
const MARCSTATE_TX_UNDERFLOW: u8 = 0x16;

/// Observable chip model shared between the test and the driver-owned HAL
#[derive(Debug)]
pub struct MockState {
    /// Configuration register file 0x00-0x2F
    pub registers: [u8; 0x30],
    pub patable: [u8; 8],
    pub partnum: u8,
    pub version: u8,
    pub marcstate: u8,
    pub rssi: u8,
    /// Bytes waiting in the RX FIFO
    pub rx_fifo: VecDeque<u8>,
    /// Forced RXBYTES value (e.g. with the overflow flag); computed from
    /// `rx_fifo` when unset
    pub rx_status: Option<u8>,
    /// Bytes loaded into the TX FIFO and not yet transmitted
    pub tx_fifo: Vec<u8>,
    /// Frames captured when a transmit strobe fires
    pub transmissions: Vec<Vec<u8>>,
    /// Every strobe in arrival order
    pub strobes: Vec<u8>,
    /// Make transmit strobes fail with a TX FIFO underflow
    pub underflow_on_tx: bool,
    /// Scripted data-ready line levels, default low when exhausted
    pub data_ready_levels: VecDeque<bool>,
    pub data_ready_polls: usize,
    /// Level of the chip-ready handshake line
    pub ready: bool,
    selected: bool,
}

impl MockState {
    fn new() -> Self {
        Self {
            registers: [0; 0x30],
            patable: [0; 8],
            partnum: 0x00,
            version: 0x14,
            marcstate: MARCSTATE_IDLE,
            rssi: 0x30,
            rx_fifo: VecDeque::new(),
            rx_status: None,
            tx_fifo: Vec::new(),
            transmissions: Vec::new(),
            strobes: Vec::new(),
            underflow_on_tx: false,
            data_ready_levels: VecDeque::new(),
            data_ready_polls: 0,
            ready: true,
            selected: false,
        }
    }

    /// Load a complete frame (length byte included) plus its status trailer
    /// into the RX FIFO
    pub fn load_rx_frame(&mut self, frame: &[u8], rssi: u8, lqi_crc: u8) {
        self.rx_fifo.extend(frame.iter().copied());
        self.rx_fifo.push_back(rssi);
        self.rx_fifo.push_back(lqi_crc);
    }

    pub fn script_data_ready(&mut self, levels: &[bool]) {
        self.data_ready_levels.extend(levels.iter().copied());
    }

    pub fn strobe_count(&self, cmd: u8) -> usize {
        self.strobes.iter().filter(|&&s| s == cmd).count()
    }

    fn status_value(&self, addr: u8) -> u8 {
        match addr {
            PARTNUM => self.partnum,
            VERSION => self.version,
            RSSI => self.rssi,
            MARCSTATE => self.marcstate,
            TXBYTES => self.tx_fifo.len().min(0x7F) as u8,
            RXBYTES => self
                .rx_status
                .unwrap_or_else(|| self.rx_fifo.len().min(0x7F) as u8),
            _ => 0,
        }
    }

    fn handle_strobe(&mut self, cmd: u8) {
        self.strobes.push(cmd);
        match cmd {
            SRES => {
                self.registers = [0; 0x30];
                self.marcstate = MARCSTATE_IDLE;
            }
            SRX => self.marcstate = MARCSTATE_RX,
            STX => {
                if self.underflow_on_tx {
                    self.marcstate = MARCSTATE_TX_UNDERFLOW;
                } else {
                    self.transmissions.push(self.tx_fifo.clone());
                    self.tx_fifo.clear();
                    // State machine configured to fall back to IDLE after TX
                    self.marcstate = MARCSTATE_IDLE;
                }
            }
            SIDLE => self.marcstate = MARCSTATE_IDLE,
            SPWD => self.marcstate = MARCSTATE_SLEEP,
            SFRX => {
                self.rx_fifo.clear();
                self.rx_status = None;
                if self.marcstate != MARCSTATE_RX {
                    self.marcstate = MARCSTATE_IDLE;
                }
            }
            SFTX => {
                self.tx_fifo.clear();
                if self.marcstate == MARCSTATE_TX_UNDERFLOW {
                    self.marcstate = MARCSTATE_IDLE;
                }
            }
            _ => {}
        }
    }

    fn transfer(&mut self, buf: &mut [u8]) -> Result<(), HalError> {
        assert!(self.selected, "transfer outside a chip-select frame");
        let header = buf[0];
        let addr = header & 0x3F;
        let burst = header & 0x40 != 0;
        let read = header & 0x80 != 0;

        if !read {
            if buf.len() == 1 && (0x30..=0x3D).contains(&addr) {
                self.handle_strobe(addr);
                return Ok(());
            }
            match addr {
                0x3F => self.tx_fifo.extend_from_slice(&buf[1..]),
                0x3E => {
                    for (i, &b) in buf[1..].iter().enumerate().take(8) {
                        self.patable[i] = b;
                    }
                }
                _ => {
                    if burst {
                        for (i, &b) in buf[1..].iter().enumerate() {
                            let a = addr as usize + i;
                            if a < self.registers.len() {
                                self.registers[a] = b;
                            }
                        }
                    } else {
                        self.registers[addr as usize] = buf[1];
                    }
                }
            }
        } else if burst && (0x30..=0x3D).contains(&addr) {
            // Status register access
            let value = self.status_value(addr);
            for slot in buf[1..].iter_mut() {
                *slot = value;
            }
        } else if addr == 0x3F {
            for slot in buf[1..].iter_mut() {
                *slot = self.rx_fifo.pop_front().unwrap_or(0);
            }
        } else if addr == 0x3E {
            for (i, slot) in buf[1..].iter_mut().enumerate() {
                *slot = self.patable.get(i).copied().unwrap_or(0);
            }
        } else {
            for (i, slot) in buf[1..].iter_mut().enumerate() {
                let a = addr as usize + i;
                *slot = if a < self.registers.len() {
                    self.registers[a]
                } else {
                    0
                };
            }
        }
        Ok(())
    }
}

/// HAL handed to the driver; the paired state handle stays with the test
pub struct MockHal {
    state: Arc<Mutex<MockState>>,
}

impl MockHal {
    pub fn new() -> (Self, Arc<Mutex<MockState>>) {
        let state = Arc::new(Mutex::new(MockState::new()));
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl Hal for MockHal {
    fn transfer(&mut self, buf: &mut [u8]) -> Result<(), HalError> {
        self.state.lock().unwrap().transfer(buf)
    }

    fn chip_select(&mut self, selected: bool) -> Result<(), HalError> {
        self.state.lock().unwrap().selected = selected;
        Ok(())
    }

    fn bus_ready(&mut self) -> Result<bool, HalError> {
        Ok(self.state.lock().unwrap().ready)
    }

    fn data_ready(&mut self) -> Result<bool, HalError> {
        let mut state = self.state.lock().unwrap();
        state.data_ready_polls += 1;
        Ok(state.data_ready_levels.pop_front().unwrap_or(false))
    }

    fn delay_us(&mut self, _us: u32) {}

    fn delay_ms(&mut self, _ms: u32) {}
}
