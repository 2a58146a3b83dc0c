//! # Crate-Level Error Handling
//!
//! This module defines the Cc1101Error enum, which aggregates the error
//! types of the bus, driver and link layers for callers that work across
//! layer boundaries (the CLI harness in particular).

use thiserror::Error;

use crate::link::LinkError;
use crate::radio::bus::BusError;
use crate::radio::driver::DriverError;
use crate::radio::hal::HalError;

/// Any error the crate can produce
#[derive(Debug, Error)]
pub enum Cc1101Error {
    /// Hardware abstraction layer failure
    #[error("HAL error: {0}")]
    Hal(#[from] HalError),

    /// Register bus failure
    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    /// Radio driver failure
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    /// Link protocol failure
    #[error("link error: {0}")]
    Link(#[from] LinkError),

    /// Configuration file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parse failure
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
