//! # CC1101 Radio Stack
//!
//! The radio side of the crate: register map and modulation profiles, the
//! chip-select framed register bus, the packet codec, and the driver that
//! ties them to the chip state machine. The addressed link protocol in
//! [`crate::link`] composes on top of this module.

pub mod bus;
pub mod driver;
pub mod hal;
pub mod packet;
pub mod profiles;
pub mod registers;
pub mod signal;
