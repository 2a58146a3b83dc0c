//! # CC1101 Register Definitions and Constants
//!
//! This module contains the register addresses, command strobes, status
//! registers and bit field definitions for the TI CC1100/CC1101 transceiver.
//! These definitions follow the CC1101 datasheet register map.
//!
//! ## Register Map
//!
//! - 0x00-0x2E: Configuration registers (readable and writable)
//! - 0x30-0x3D: Command strobes when written, status registers when read
//!   with the burst flag set (CC1101 access quirk)
//! - 0x3E: Power amplifier table (PATABLE, 8 bytes via burst access)
//! - 0x3F: TX FIFO on write, RX FIFO on read

// =============================================================================
// SPI Header Access Modes
// =============================================================================

/// Single register write (header bit pattern 0b00xxxxxx)
pub const WRITE_SINGLE_BYTE: u8 = 0x00;

/// Burst register write (header bit pattern 0b01xxxxxx)
pub const WRITE_BURST: u8 = 0x40;

/// Single register read (header bit pattern 0b10xxxxxx)
pub const READ_SINGLE_BYTE: u8 = 0x80;

/// Burst register read; also selects status register access for 0x30-0x3D
pub const READ_BURST: u8 = 0xC0;

// =============================================================================
// Configuration Registers (0x00 - 0x2E)
// =============================================================================

/// GDO2 output pin configuration
pub const IOCFG2: u8 = 0x00;

/// GDO1 output pin configuration
pub const IOCFG1: u8 = 0x01;

/// GDO0 output pin configuration
pub const IOCFG0: u8 = 0x02;

/// RX FIFO and TX FIFO thresholds
pub const FIFOTHR: u8 = 0x03;

/// Sync word, high byte
pub const SYNC1: u8 = 0x04;

/// Sync word, low byte
pub const SYNC0: u8 = 0x05;

/// Packet length
pub const PKTLEN: u8 = 0x06;

/// Packet automation control
pub const PKTCTRL1: u8 = 0x07;

/// Packet automation control
pub const PKTCTRL0: u8 = 0x08;

/// Device address
pub const ADDR: u8 = 0x09;

/// Channel number
pub const CHANNR: u8 = 0x0A;

/// Frequency synthesizer control
pub const FSCTRL1: u8 = 0x0B;

/// Frequency synthesizer control
pub const FSCTRL0: u8 = 0x0C;

/// Frequency control word, high byte
pub const FREQ2: u8 = 0x0D;

/// Frequency control word, middle byte
pub const FREQ1: u8 = 0x0E;

/// Frequency control word, low byte
pub const FREQ0: u8 = 0x0F;

/// Modem configuration (channel bandwidth and data rate exponent)
pub const MDMCFG4: u8 = 0x10;

/// Modem configuration (data rate mantissa)
pub const MDMCFG3: u8 = 0x11;

/// Modem configuration (modulation format, sync mode)
pub const MDMCFG2: u8 = 0x12;

/// Modem configuration (FEC, preamble length, channel spacing exponent)
pub const MDMCFG1: u8 = 0x13;

/// Modem configuration (channel spacing mantissa)
pub const MDMCFG0: u8 = 0x14;

/// Modem deviation setting
pub const DEVIATN: u8 = 0x15;

/// Main radio control state machine configuration
pub const MCSM2: u8 = 0x16;

/// Main radio control state machine configuration
pub const MCSM1: u8 = 0x17;

/// Main radio control state machine configuration
pub const MCSM0: u8 = 0x18;

/// Frequency offset compensation configuration
pub const FOCCFG: u8 = 0x19;

/// Bit synchronization configuration
pub const BSCFG: u8 = 0x1A;

/// AGC control
pub const AGCCTRL2: u8 = 0x1B;

/// AGC control
pub const AGCCTRL1: u8 = 0x1C;

/// AGC control
pub const AGCCTRL0: u8 = 0x1D;

/// High byte Event0 timeout
pub const WOREVT1: u8 = 0x1E;

/// Low byte Event0 timeout
pub const WOREVT0: u8 = 0x1F;

/// Wake On Radio control
pub const WORCTRL: u8 = 0x20;

/// Front end RX configuration
pub const FREND1: u8 = 0x21;

/// Front end TX configuration (lower 3 bits select the PATABLE index)
pub const FREND0: u8 = 0x22;

/// Frequency synthesizer calibration
pub const FSCAL3: u8 = 0x23;

/// Frequency synthesizer calibration
pub const FSCAL2: u8 = 0x24;

/// Frequency synthesizer calibration
pub const FSCAL1: u8 = 0x25;

/// Frequency synthesizer calibration
pub const FSCAL0: u8 = 0x26;

/// RC oscillator configuration
pub const RCCTRL1: u8 = 0x27;

/// RC oscillator configuration
pub const RCCTRL0: u8 = 0x28;

/// Frequency synthesizer calibration control
pub const FSTEST: u8 = 0x29;

/// Production test
pub const PTEST: u8 = 0x2A;

/// AGC test
pub const AGCTEST: u8 = 0x2B;

/// Various test settings
pub const TEST2: u8 = 0x2C;

/// Various test settings
pub const TEST1: u8 = 0x2D;

/// Various test settings
pub const TEST0: u8 = 0x2E;

/// Number of configuration registers covered by a full profile burst
pub const CONFIG_REGISTER_COUNT: usize = 0x2F;

// =============================================================================
// Multi-byte Registers
// =============================================================================

/// Power amplifier output table, 8 bytes via burst access
pub const PATABLE: u8 = 0x3E;

/// TX FIFO (write access) / RX FIFO (read access)
pub const FIFO: u8 = 0x3F;

// =============================================================================
// Command Strobes (0x30 - 0x3D)
// =============================================================================

/// Reset chip
pub const SRES: u8 = 0x30;

/// Enable and calibrate frequency synthesizer
pub const SFSTXON: u8 = 0x31;

/// Turn off crystal oscillator
pub const SXOFF: u8 = 0x32;

/// Calibrate frequency synthesizer and turn it off
pub const SCAL: u8 = 0x33;

/// Enable RX
pub const SRX: u8 = 0x34;

/// Enable TX (in IDLE with CCA enabled: go to TX if channel is clear)
pub const STX: u8 = 0x35;

/// Exit RX/TX, turn off frequency synthesizer
pub const SIDLE: u8 = 0x36;

/// Start automatic RX polling sequence (Wake On Radio)
pub const SWOR: u8 = 0x38;

/// Enter power down mode when CSn goes high
pub const SPWD: u8 = 0x39;

/// Flush the RX FIFO buffer
pub const SFRX: u8 = 0x3A;

/// Flush the TX FIFO buffer
pub const SFTX: u8 = 0x3B;

/// Reset real time clock to Event1 value
pub const SWORRST: u8 = 0x3C;

/// No operation, returns the chip status byte
pub const SNOP: u8 = 0x3D;

// =============================================================================
// Status Registers (read with the burst flag set)
// =============================================================================

/// Part number
pub const PARTNUM: u8 = 0x30;

/// Current version number
pub const VERSION: u8 = 0x31;

/// Frequency offset estimate
pub const FREQEST: u8 = 0x32;

/// Demodulator estimate for link quality
pub const LQI: u8 = 0x33;

/// Received signal strength indication
pub const RSSI: u8 = 0x34;

/// Main radio control state machine state
pub const MARCSTATE: u8 = 0x35;

/// High byte of WOR timer
pub const WORTIME1: u8 = 0x36;

/// Low byte of WOR timer
pub const WORTIME0: u8 = 0x37;

/// Current GDOx status and packet status
pub const PKTSTATUS: u8 = 0x38;

/// Current setting from PLL calibration module
pub const VCO_VC_DAC: u8 = 0x39;

/// Underflow flag and number of bytes in the TX FIFO
pub const TXBYTES: u8 = 0x3A;

/// Overflow flag and number of bytes in the RX FIFO
pub const RXBYTES: u8 = 0x3B;

// =============================================================================
// Status Register Bit Fields
// =============================================================================

/// Mask for the state bits of MARCSTATE
pub const MARCSTATE_MASK: u8 = 0x1F;

/// Mask for the byte-count field of RXBYTES/TXBYTES
pub const FIFO_BYTES_MASK: u8 = 0x7F;

/// Overflow flag in RXBYTES (underflow flag in TXBYTES)
pub const FIFO_OVERFLOW_FLAG: u8 = 0x80;

// =============================================================================
// MARCSTATE Values
// =============================================================================

/// Chip is asleep
pub const MARCSTATE_SLEEP: u8 = 0x00;

/// Chip is idle
pub const MARCSTATE_IDLE: u8 = 0x01;

/// Crystal oscillator is off
pub const MARCSTATE_XOFF: u8 = 0x02;

/// First of the synthesizer calibration and settling states (0x03-0x0C)
pub const MARCSTATE_CAL_FIRST: u8 = 0x03;

/// Last of the synthesizer calibration and settling states
pub const MARCSTATE_CAL_LAST: u8 = 0x0C;

/// Chip is receiving
pub const MARCSTATE_RX: u8 = 0x0D;

/// RX FIFO has overflowed
pub const MARCSTATE_RXFIFO_OVERFLOW: u8 = 0x11;

/// Chip is transmitting
pub const MARCSTATE_TX: u8 = 0x13;

/// End of transmission
pub const MARCSTATE_TX_END: u8 = 0x14;

/// RX/TX front end switching
pub const MARCSTATE_RXTX_SWITCH: u8 = 0x15;

/// TX FIFO has underflowed
pub const MARCSTATE_TXFIFO_UNDERFLOW: u8 = 0x16;

// =============================================================================
// Chip Identity and Pin Modes
// =============================================================================

/// Expected PARTNUM value for the CC1100/CC1101 family
pub const CHIP_PARTNUM: u8 = 0x00;

/// VERSION values accepted as a CC1101 (0x04 for early silicon, 0x14 current)
pub const CHIP_VERSIONS: [u8; 2] = [0x04, 0x14];

/// GDO pin mode: asserts on sync word, deasserts at end of packet
pub const GDO_CFG_SYNC_DETECT: u8 = 0x06;

/// GDO pin mode: asserts when a packet with valid CRC sits in the RX FIFO
pub const GDO_CFG_CRC_OK: u8 = 0x07;

/// Crystal oscillator frequency in Hz
pub const CRYSTAL_FREQUENCY: u32 = 26_000_000;
