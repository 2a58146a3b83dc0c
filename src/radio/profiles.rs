//! # Modulation Profiles and Power Tables
//!
//! Fixed per-rate register profiles and per-band power amplifier ramps for
//! the CC1101. A profile is a 47-byte ordered image of the configuration
//! register file (0x00-0x2E) that is burst-written verbatim once at
//! initialization; a power table is an 8-byte PATABLE amplitude ramp from
//! which one entry is live-selected as the current output power.
//!
//! The register values are the silicon vendor's reference settings for each
//! modulation/rate combination at 868 MHz; the carrier band is re-programmed
//! separately through the FREQ2/FREQ1/FREQ0 control words.

use serde::{Deserialize, Serialize};

use crate::radio::registers::CONFIG_REGISTER_COUNT;

/// ISM frequency band selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    /// 315 MHz
    Mhz315,
    /// 433.92 MHz
    Mhz433,
    /// 868.3 MHz
    Mhz868,
    /// 915 MHz
    Mhz915,
}

impl Band {
    /// FREQ2/FREQ1/FREQ0 frequency control words for the band center
    pub fn freq_word(self) -> [u8; 3] {
        match self {
            Band::Mhz315 => [0x0C, 0x1D, 0x89],
            Band::Mhz433 => [0x10, 0xB0, 0x71],
            Band::Mhz868 => [0x21, 0x65, 0x6A],
            Band::Mhz915 => [0x23, 0x31, 0x3B],
        }
    }

    /// PATABLE amplitude ramp for the band
    pub fn power_table(self) -> &'static [u8; 8] {
        match self {
            Band::Mhz315 => &PATABLE_315,
            Band::Mhz433 => &PATABLE_433,
            Band::Mhz868 => &PATABLE_868,
            Band::Mhz915 => &PATABLE_915,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Mhz315 => "315 MHz",
            Band::Mhz433 => "433 MHz",
            Band::Mhz868 => "868 MHz",
            Band::Mhz915 => "915 MHz",
        }
    }
}

/// Modulation and data rate selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataRate {
    /// GFSK at 1.2 kBd
    Gfsk1_2,
    /// GFSK at 38.4 kBd
    Gfsk38_4,
    /// GFSK at 100 kBd
    Gfsk100,
    /// MSK at 250 kBd
    Msk250,
    /// MSK at 500 kBd
    Msk500,
    /// OOK at 4.8 kBd
    Ook4_8,
}

impl DataRate {
    /// Full configuration register image for this rate
    pub fn profile(self) -> &'static [u8; CONFIG_REGISTER_COUNT] {
        match self {
            DataRate::Gfsk1_2 => &GFSK_1_2_KB,
            DataRate::Gfsk38_4 => &GFSK_38_4_KB,
            DataRate::Gfsk100 => &GFSK_100_KB,
            DataRate::Msk250 => &MSK_250_KB,
            DataRate::Msk500 => &MSK_500_KB,
            DataRate::Ook4_8 => &OOK_4_8_KB,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DataRate::Gfsk1_2 => "GFSK 1.2 kBd",
            DataRate::Gfsk38_4 => "GFSK 38.4 kBd",
            DataRate::Gfsk100 => "GFSK 100 kBd",
            DataRate::Msk250 => "MSK 250 kBd",
            DataRate::Msk500 => "MSK 500 kBd",
            DataRate::Ook4_8 => "OOK 4.8 kBd",
        }
    }
}

// =============================================================================
// Configuration Register Profiles
// =============================================================================
//
// Register order within each table is the register file order 0x00..0x2E:
// IOCFG2, IOCFG1, IOCFG0, FIFOTHR, SYNC1, SYNC0, PKTLEN, PKTCTRL1, PKTCTRL0,
// ADDR, CHANNR, FSCTRL1, FSCTRL0, FREQ2, FREQ1, FREQ0, MDMCFG4, MDMCFG3,
// MDMCFG2, MDMCFG1, MDMCFG0, DEVIATN, MCSM2, MCSM1, MCSM0, FOCCFG, BSCFG,
// AGCCTRL2, AGCCTRL1, AGCCTRL0, WOREVT1, WOREVT0, WORCTRL, FREND1, FREND0,
// FSCAL3, FSCAL2, FSCAL1, FSCAL0, RCCTRL1, RCCTRL0, FSTEST, PTEST, AGCTEST,
// TEST2, TEST1, TEST0.

static GFSK_1_2_KB: [u8; CONFIG_REGISTER_COUNT] = [
    0x07, // IOCFG2: asserts on packet with CRC OK in RX FIFO
    0x2E, // IOCFG1: high impedance
    0x80, // IOCFG0: analog temperature sensor
    0x07, // FIFOTHR: 33 in TX FIFO, 32 in RX FIFO
    0x57, // SYNC1
    0x43, // SYNC0
    0x3E, // PKTLEN
    0x0E, // PKTCTRL1: CRC autoflush, append status, address check with broadcast
    0x45, // PKTCTRL0: whitening, CRC, variable packet length
    0xFF, // ADDR
    0x00, // CHANNR
    0x08, // FSCTRL1
    0x00, // FSCTRL0
    0x21, // FREQ2
    0x65, // FREQ1
    0x6A, // FREQ0
    0xF5, // MDMCFG4
    0x83, // MDMCFG3
    0x13, // MDMCFG2
    0xA0, // MDMCFG1
    0xF8, // MDMCFG0
    0x15, // DEVIATN
    0x07, // MCSM2
    0x0C, // MCSM1
    0x19, // MCSM0
    0x16, // FOCCFG
    0x6C, // BSCFG
    0x03, // AGCCTRL2
    0x40, // AGCCTRL1
    0x91, // AGCCTRL0
    0x02, // WOREVT1
    0x26, // WOREVT0
    0x09, // WORCTRL
    0x56, // FREND1
    0x17, // FREND0
    0xA9, // FSCAL3
    0x0A, // FSCAL2
    0x00, // FSCAL1
    0x11, // FSCAL0
    0x41, // RCCTRL1
    0x00, // RCCTRL0
    0x59, // FSTEST
    0x7F, // PTEST
    0x3F, // AGCTEST
    0x81, // TEST2
    0x3F, // TEST1
    0x0B, // TEST0
];

static GFSK_38_4_KB: [u8; CONFIG_REGISTER_COUNT] = [
    0x07, // IOCFG2
    0x2E, // IOCFG1
    0x80, // IOCFG0
    0x07, // FIFOTHR
    0x57, // SYNC1
    0x43, // SYNC0
    0x3E, // PKTLEN
    0x0E, // PKTCTRL1
    0x45, // PKTCTRL0
    0xFF, // ADDR
    0x00, // CHANNR
    0x06, // FSCTRL1
    0x00, // FSCTRL0
    0x21, // FREQ2
    0x65, // FREQ1
    0x6A, // FREQ0
    0xCA, // MDMCFG4
    0x83, // MDMCFG3
    0x13, // MDMCFG2
    0xA0, // MDMCFG1
    0xF8, // MDMCFG0
    0x34, // DEVIATN
    0x07, // MCSM2
    0x0C, // MCSM1
    0x19, // MCSM0
    0x16, // FOCCFG
    0x6C, // BSCFG
    0x43, // AGCCTRL2
    0x40, // AGCCTRL1
    0x91, // AGCCTRL0
    0x02, // WOREVT1
    0x26, // WOREVT0
    0x09, // WORCTRL
    0x56, // FREND1
    0x17, // FREND0
    0xA9, // FSCAL3
    0x0A, // FSCAL2
    0x00, // FSCAL1
    0x11, // FSCAL0
    0x41, // RCCTRL1
    0x00, // RCCTRL0
    0x59, // FSTEST
    0x7F, // PTEST
    0x3F, // AGCTEST
    0x81, // TEST2
    0x3F, // TEST1
    0x0B, // TEST0
];

static GFSK_100_KB: [u8; CONFIG_REGISTER_COUNT] = [
    0x07, // IOCFG2
    0x2E, // IOCFG1
    0x80, // IOCFG0
    0x07, // FIFOTHR
    0x57, // SYNC1
    0x43, // SYNC0
    0x3E, // PKTLEN
    0x0E, // PKTCTRL1
    0x45, // PKTCTRL0
    0xFF, // ADDR
    0x00, // CHANNR
    0x08, // FSCTRL1
    0x00, // FSCTRL0
    0x21, // FREQ2
    0x65, // FREQ1
    0x6A, // FREQ0
    0x5B, // MDMCFG4
    0xF8, // MDMCFG3
    0x13, // MDMCFG2
    0xA0, // MDMCFG1
    0xF8, // MDMCFG0
    0x47, // DEVIATN
    0x07, // MCSM2
    0x0C, // MCSM1
    0x18, // MCSM0
    0x1D, // FOCCFG
    0x1C, // BSCFG
    0xC7, // AGCCTRL2
    0x00, // AGCCTRL1
    0xB2, // AGCCTRL0
    0x02, // WOREVT1
    0x26, // WOREVT0
    0x09, // WORCTRL
    0xB6, // FREND1
    0x17, // FREND0
    0xEA, // FSCAL3
    0x0A, // FSCAL2
    0x00, // FSCAL1
    0x11, // FSCAL0
    0x41, // RCCTRL1
    0x00, // RCCTRL0
    0x59, // FSTEST
    0x7F, // PTEST
    0x3F, // AGCTEST
    0x81, // TEST2
    0x3F, // TEST1
    0x0B, // TEST0
];

static MSK_250_KB: [u8; CONFIG_REGISTER_COUNT] = [
    0x07, // IOCFG2
    0x2E, // IOCFG1
    0x80, // IOCFG0
    0x07, // FIFOTHR
    0x57, // SYNC1
    0x43, // SYNC0
    0x3E, // PKTLEN
    0x0E, // PKTCTRL1
    0x45, // PKTCTRL0
    0xFF, // ADDR
    0x00, // CHANNR
    0x0B, // FSCTRL1
    0x00, // FSCTRL0
    0x21, // FREQ2
    0x65, // FREQ1
    0x6A, // FREQ0
    0x2D, // MDMCFG4
    0x3B, // MDMCFG3
    0x73, // MDMCFG2
    0xA0, // MDMCFG1
    0xF8, // MDMCFG0
    0x00, // DEVIATN
    0x07, // MCSM2
    0x0C, // MCSM1
    0x18, // MCSM0
    0x1D, // FOCCFG
    0x1C, // BSCFG
    0xC7, // AGCCTRL2
    0x00, // AGCCTRL1
    0xB2, // AGCCTRL0
    0x02, // WOREVT1
    0x26, // WOREVT0
    0x09, // WORCTRL
    0xB6, // FREND1
    0x17, // FREND0
    0xEA, // FSCAL3
    0x0A, // FSCAL2
    0x00, // FSCAL1
    0x11, // FSCAL0
    0x41, // RCCTRL1
    0x00, // RCCTRL0
    0x59, // FSTEST
    0x7F, // PTEST
    0x3F, // AGCTEST
    0x81, // TEST2
    0x3F, // TEST1
    0x0B, // TEST0
];

static MSK_500_KB: [u8; CONFIG_REGISTER_COUNT] = [
    0x07, // IOCFG2
    0x2E, // IOCFG1
    0x80, // IOCFG0
    0x07, // FIFOTHR
    0x57, // SYNC1
    0x43, // SYNC0
    0x3E, // PKTLEN
    0x0E, // PKTCTRL1
    0x45, // PKTCTRL0
    0xFF, // ADDR
    0x00, // CHANNR
    0x0C, // FSCTRL1
    0x00, // FSCTRL0
    0x21, // FREQ2
    0x65, // FREQ1
    0x6A, // FREQ0
    0x0E, // MDMCFG4
    0x3B, // MDMCFG3
    0x73, // MDMCFG2
    0xA0, // MDMCFG1
    0xF8, // MDMCFG0
    0x00, // DEVIATN
    0x07, // MCSM2
    0x0C, // MCSM1
    0x18, // MCSM0
    0x1D, // FOCCFG
    0x1C, // BSCFG
    0xC7, // AGCCTRL2
    0x40, // AGCCTRL1
    0xB2, // AGCCTRL0
    0x02, // WOREVT1
    0x26, // WOREVT0
    0x09, // WORCTRL
    0xB6, // FREND1
    0x17, // FREND0
    0xEA, // FSCAL3
    0x0A, // FSCAL2
    0x00, // FSCAL1
    0x19, // FSCAL0
    0x41, // RCCTRL1
    0x00, // RCCTRL0
    0x59, // FSTEST
    0x7F, // PTEST
    0x3F, // AGCTEST
    0x81, // TEST2
    0x3F, // TEST1
    0x0B, // TEST0
];

static OOK_4_8_KB: [u8; CONFIG_REGISTER_COUNT] = [
    0x06, // IOCFG2: asserts on sync word
    0x2E, // IOCFG1
    0x06, // IOCFG0
    0x47, // FIFOTHR
    0x57, // SYNC1
    0x43, // SYNC0
    0xFF, // PKTLEN
    0x04, // PKTCTRL1: append status, no address check
    0x05, // PKTCTRL0: CRC, variable packet length, no whitening
    0x00, // ADDR
    0x00, // CHANNR
    0x06, // FSCTRL1
    0x00, // FSCTRL0
    0x21, // FREQ2
    0x65, // FREQ1
    0x6A, // FREQ0
    0x87, // MDMCFG4
    0x83, // MDMCFG3
    0x3B, // MDMCFG2
    0x22, // MDMCFG1
    0xF8, // MDMCFG0
    0x15, // DEVIATN
    0x07, // MCSM2
    0x30, // MCSM1
    0x18, // MCSM0
    0x14, // FOCCFG
    0x6C, // BSCFG
    0x07, // AGCCTRL2
    0x00, // AGCCTRL1
    0x92, // AGCCTRL0
    0x87, // WOREVT1
    0x6B, // WOREVT0
    0xFB, // WORCTRL
    0x56, // FREND1
    0x17, // FREND0
    0xE9, // FSCAL3
    0x2A, // FSCAL2
    0x00, // FSCAL1
    0x1F, // FSCAL0
    0x41, // RCCTRL1
    0x00, // RCCTRL0
    0x59, // FSTEST
    0x7F, // PTEST
    0x3F, // AGCTEST
    0x81, // TEST2
    0x35, // TEST1
    0x09, // TEST0
];

// =============================================================================
// Power Amplifier Tables
// =============================================================================
//
// Ramp index:          0     1     2     3     4     5     6     7
// Approximate output: -30   -20   -15   -10    0     5     7    10  dBm

static PATABLE_315: [u8; 8] = [0x17, 0x1D, 0x26, 0x69, 0x51, 0x86, 0xCC, 0xC3];
static PATABLE_433: [u8; 8] = [0x6C, 0x1C, 0x06, 0x3A, 0x51, 0x85, 0xC8, 0xC0];
static PATABLE_868: [u8; 8] = [0x03, 0x17, 0x1D, 0x26, 0x50, 0x86, 0xCD, 0xC0];
static PATABLE_915: [u8; 8] = [0x0B, 0x1B, 0x6D, 0x67, 0x50, 0x85, 0xC9, 0xC1];

/// Map a requested output power in dBm onto a PATABLE ramp index
pub fn pa_index_for_dbm(dbm: i8) -> u8 {
    if dbm <= -30 {
        0
    } else if dbm <= -20 {
        1
    } else if dbm <= -15 {
        2
    } else if dbm <= -10 {
        3
    } else if dbm <= 0 {
        4
    } else if dbm <= 5 {
        5
    } else if dbm <= 7 {
        6
    } else {
        7
    }
}
