//! # Radio and Harness Configuration
//!
//! Mirrored radio settings plus the JSON-backed configuration consumed by
//! the CLI harness. The driver holds a [`RadioConfig`] as the authoritative
//! mirror of the chip registers: every field changes only through a driver
//! setter that writes the corresponding register in the same call, so mirror
//! and chip never diverge.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Cc1101Error;
use crate::link::LinkParams;
use crate::radio::profiles::{Band, DataRate};

/// Mirrored CC1101 configuration
///
/// Immutable after initialization except through the driver's write-through
/// setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    /// ISM band selecting carrier frequency words and power table
    pub band: Band,
    /// Modulation/rate register profile
    pub data_rate: DataRate,
    /// Channel number
    pub channel: u8,
    /// Sync word, high byte first
    pub sync_word: [u8; 2],
    /// Hardware packet filter address
    pub device_address: u8,
    /// Output power in dBm, mapped onto the band's PATABLE ramp
    pub power_dbm: i8,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            band: Band::Mhz868,
            data_rate: DataRate::Gfsk38_4,
            channel: 0,
            sync_word: [0x57, 0x43],
            device_address: 0xFF,
            power_dbm: 0,
        }
    }
}

/// Configuration for the CLI harness
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SPI bus number (0 or 1)
    pub spi_bus: u8,
    /// BCM GPIO for the chip select line
    pub csn_pin: u8,
    /// BCM GPIO for the data-ready line
    pub gdo0_pin: u8,
    /// Default peer address for the demos
    pub peer_address: u8,
    /// Radio settings
    pub radio: RadioConfig,
    /// Link protocol tuning
    pub link: LinkParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            spi_bus: 0,
            csn_pin: 25,
            gdo0_pin: 23,
            peer_address: 0x03,
            radio: RadioConfig::default(),
            link: LinkParams::default(),
        }
    }
}

impl AppConfig {
    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, Cc1101Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_json() {
        let config = AppConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.radio.device_address, config.radio.device_address);
        assert_eq!(back.radio.sync_word, config.radio.sync_word);
        assert_eq!(back.gdo0_pin, config.gdo0_pin);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"radio": {"device_address": 3, "channel": 5}}"#).unwrap();
        assert_eq!(config.radio.device_address, 3);
        assert_eq!(config.radio.channel, 5);
        assert_eq!(config.radio.sync_word, [0x57, 0x43]);
        assert_eq!(config.spi_bus, 0);
    }
}
