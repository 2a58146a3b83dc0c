//! # Addressed Link Protocol
//!
//! Point-to-point/broadcast link layer composed on top of the radio driver:
//! addressed frames with a destination and source byte at the front of the
//! payload, acknowledgement of unicast traffic, and a bounded retry budget
//! per send.
//!
//! ## Frame layout
//!
//! ```text
//! ┌────────┬──────┬─────┬──────────────┐          ┌──────┬─────────┐
//! │ length │ dest │ src │ payload ...  │  +rx →   │ RSSI │ LQI/CRC │
//! └────────┴──────┴─────┴──────────────┘          └──────┴─────────┘
//! ```
//!
//! An acknowledgement is a fixed frame whose payload is the two-byte tag
//! [`ACK_TAG`]; it is recognized only when its destination matches the local
//! address and its source matches the peer of the running exchange. Sends to
//! the broadcast address are fire-and-forget: nothing acknowledges them and
//! no acknowledgement is awaited.

use crate::radio::driver::{Cc1101Driver, DriverError};
use crate::radio::hal::Hal;
use crate::radio::packet::{self, Packet, MAX_LINK_PAYLOAD};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Destination address that every receiver accepts; never acknowledged
pub const BROADCAST_ADDRESS: u8 = 0x00;

/// Fixed two-byte content of an acknowledgement frame
pub const ACK_TAG: [u8; 2] = *b"Ak";

/// Errors that can occur in the link protocol
#[derive(Debug, Error)]
pub enum LinkError {
    /// Radio driver failure underneath the protocol
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),
    /// No valid acknowledgement after the full retry budget; terminal for
    /// one send call, not for the link
    #[error("no acknowledgement after {attempts} attempts")]
    RetriesExhausted { attempts: u8 },
    /// Payload larger than an addressed frame can carry
    #[error("payload of {0} bytes exceeds the addressed frame capacity")]
    PayloadTooLarge(usize),
}

/// Link protocol tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkParams {
    /// How long to wait for an acknowledgement per attempt, in milliseconds
    pub ack_timeout_ms: u32,
    /// Poll step inside the acknowledgement wait, in microseconds
    pub ack_poll_step_us: u32,
    /// Pause between retries, in milliseconds
    pub retry_backoff_ms: u32,
    /// RSSI conversion offset for the configured rate and band
    pub rssi_offset: i16,
    /// Bound on data frames parked while waiting for an acknowledgement
    pub pending_capacity: usize,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            ack_timeout_ms: 30,
            ack_poll_step_us: 10,
            retry_backoff_ms: 100,
            rssi_offset: packet::DEFAULT_RSSI_OFFSET,
            pending_capacity: 4,
        }
    }
}

/// A decoded addressed frame with its link metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFrame {
    /// Destination address carried by the frame
    pub dest: u8,
    /// Sender address carried by the frame
    pub src: u8,
    /// Payload after the two address bytes
    pub data: Vec<u8>,
    /// Signal strength of the reception in dBm
    pub rssi_dbm: i16,
    /// Link quality indicator
    pub lqi: u8,
    /// Whether the chip validated the frame CRC
    pub crc_ok: bool,
}

impl LinkFrame {
    /// Interpret a raw packet as an addressed frame; needs at least the two
    /// address bytes
    fn from_packet(packet: &Packet, rssi_offset: i16) -> Option<Self> {
        if packet.payload.len() < packet::LINK_OVERHEAD {
            return None;
        }
        Some(Self {
            dest: packet.payload[0],
            src: packet.payload[1],
            data: packet.payload[packet::LINK_OVERHEAD..].to_vec(),
            rssi_dbm: packet.rssi_dbm(rssi_offset),
            lqi: packet.lqi(),
            crc_ok: packet.crc_ok(),
        })
    }
}

/// What one received frame turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// An acknowledgement; never auto-replied to
    Ack {
        peer: u8,
        rssi_dbm: i16,
        lqi: u8,
        crc_ok: bool,
    },
    /// An addressed data frame, already acknowledged when it was unicast
    Data(LinkFrame),
    /// Empty or unparseable reception
    BadFrame,
}

/// Outcome of one acknowledgement wait window
enum AckWait {
    Acknowledged,
    /// A tag frame arrived with the wrong signature; counts as a failed
    /// attempt like a timeout does
    BadAck,
    TimedOut,
}

/// Check a received packet against the acknowledgement signature of an
/// exchange between `self_addr` and `peer`
///
/// A broadcast destination is itself rejected as an invalid acknowledgement.
pub fn is_acknowledge(packet: &Packet, peer: u8, self_addr: u8) -> bool {
    packet.length as usize == packet::LINK_OVERHEAD + ACK_TAG.len()
        && packet.payload.len() == packet::LINK_OVERHEAD + ACK_TAG.len()
        && packet.payload[0] == self_addr
        && packet.payload[0] != BROADCAST_ADDRESS
        && packet.payload[1] == peer
        && packet.payload[2..] == ACK_TAG
}

/// Whether a frame carries the acknowledgement tag as its entire payload
fn carries_ack_tag(packet: &Packet) -> bool {
    packet.payload.len() == packet::LINK_OVERHEAD + ACK_TAG.len()
        && packet.payload[2..] == ACK_TAG
}

/// Addressed link layer over a radio driver
pub struct LinkLayer<H: Hal> {
    driver: Cc1101Driver<H>,
    params: LinkParams,
    /// Data frames heard while waiting for an acknowledgement, delivered by
    /// the next `receive()` call instead of being dropped
    pending: VecDeque<LinkFrame>,
}

impl<H: Hal> LinkLayer<H> {
    pub fn new(driver: Cc1101Driver<H>, params: LinkParams) -> Self {
        Self {
            driver,
            params,
            pending: VecDeque::new(),
        }
    }

    /// The local link address (the driver's mirrored device address)
    pub fn address(&self) -> u8 {
        self.driver.config().device_address
    }

    /// Access to the underlying driver
    pub fn driver_mut(&mut self) -> &mut Cc1101Driver<H> {
        &mut self.driver
    }

    /// Send an addressed payload with acknowledgement and retry
    ///
    /// Broadcast sends return after the first transmission; nothing
    /// acknowledges a broadcast. Unicast sends wait for a matching
    /// acknowledgement per attempt and retry up to `max_retries`
    /// transmissions (at least one) with a fixed backoff in between.
    ///
    /// # Errors
    ///
    /// [`LinkError::RetriesExhausted`] when every attempt went
    /// unacknowledged. The radio is left in receive mode.
    pub fn send_packet(
        &mut self,
        dest: u8,
        payload: &[u8],
        max_retries: u8,
    ) -> Result<(), LinkError> {
        if payload.len() > MAX_LINK_PAYLOAD {
            return Err(LinkError::PayloadTooLarge(payload.len()));
        }

        let self_addr = self.address();
        let frame = packet::encode_addressed(dest, self_addr, payload);
        let mut attempts: u8 = 0;

        loop {
            attempts += 1;
            match self.driver.transmit_frame(&frame) {
                Ok(()) => {
                    if dest == BROADCAST_ADDRESS {
                        info!("broadcast send complete");
                        return Ok(());
                    }
                    match self.wait_for_ack(self_addr, dest)? {
                        AckWait::Acknowledged => {
                            debug!("send OK after {attempts} attempt(s)");
                            return Ok(());
                        }
                        AckWait::BadAck => warn!("bad acknowledgement (attempt {attempts})"),
                        AckWait::TimedOut => debug!("no acknowledgement (attempt {attempts})"),
                    }
                }
                // A drained TX FIFO spoils only this attempt
                Err(DriverError::TxUnderflow) => {
                    warn!("TX underflow (attempt {attempts})");
                }
                Err(e) => return Err(e.into()),
            }

            if attempts >= max_retries.max(1) {
                break;
            }
            self.driver.delay_ms(self.params.retry_backoff_ms);
        }

        error!("send to {dest:#04X} failed after {attempts} attempts");
        Err(LinkError::RetriesExhausted { attempts })
    }

    /// Poll for a matching acknowledgement until the timeout elapses
    fn wait_for_ack(&mut self, self_addr: u8, peer: u8) -> Result<AckWait, LinkError> {
        let budget_us = self.params.ack_timeout_ms.saturating_mul(1000);
        let step_us = self.params.ack_poll_step_us.max(1);
        let mut waited_us: u32 = 0;

        while waited_us < budget_us {
            if self.driver.packet_available()? {
                match self.driver.receive_data() {
                    Ok(packet) if is_acknowledge(&packet, peer, self_addr) => {
                        debug!(
                            "[ACK] RSSI: {} LQI: {:#04X} CRC: {}",
                            packet.rssi_dbm(self.params.rssi_offset),
                            packet.lqi(),
                            if packet.crc_ok() { "OK" } else { "BAD" }
                        );
                        return Ok(AckWait::Acknowledged);
                    }
                    Ok(packet) if carries_ack_tag(&packet) => {
                        // Tag content but wrong signature: a stray or
                        // misdirected acknowledgement ends this attempt
                        return Ok(AckWait::BadAck);
                    }
                    Ok(packet) => {
                        self.park_frame(&packet);
                    }
                    Err(DriverError::RxOverflow) => {
                        warn!("RX overflow during acknowledgement wait");
                    }
                    Err(e) => return Err(e.into()),
                }
            } else {
                self.driver.delay_us(step_us);
                waited_us = waited_us.saturating_add(step_us);
            }
        }
        Ok(AckWait::TimedOut)
    }

    /// Keep a data frame heard during an acknowledgement wait for later
    /// delivery through `receive()`
    fn park_frame(&mut self, packet: &Packet) {
        if packet.is_empty() {
            return;
        }
        match LinkFrame::from_packet(packet, self.params.rssi_offset) {
            Some(frame) if self.pending.len() < self.params.pending_capacity => {
                debug!("parking data frame from {:#04X}", frame.src);
                self.pending.push_back(frame);
            }
            Some(frame) => {
                warn!("pending queue full, dropping frame from {:#04X}", frame.src);
            }
            None => {}
        }
    }

    /// Transmit the fixed acknowledgement frame to `peer`
    ///
    /// No retry and no wait: an acknowledgement is never acknowledged.
    pub fn send_acknowledge(&mut self, peer: u8) -> Result<(), LinkError> {
        let frame = packet::encode_addressed(peer, self.address(), &ACK_TAG);
        self.driver.transmit_frame(&frame)?;
        debug!("ACK sent to {peer:#04X}");
        Ok(())
    }

    /// Read one frame and classify it
    ///
    /// Data frames parked during an earlier acknowledgement wait are
    /// delivered first. A unicast data frame is acknowledged synchronously
    /// before it is returned; broadcast frames are not.
    pub fn receive(&mut self) -> Result<LinkEvent, LinkError> {
        if let Some(frame) = self.pending.pop_front() {
            return Ok(LinkEvent::Data(frame));
        }

        let packet = match self.driver.receive_data() {
            Ok(packet) => packet,
            Err(DriverError::RxOverflow) => return Ok(LinkEvent::BadFrame),
            Err(e) => return Err(e.into()),
        };

        if packet.is_empty() {
            warn!("bad packet");
            return Ok(LinkEvent::BadFrame);
        }

        let Some(frame) = LinkFrame::from_packet(&packet, self.params.rssi_offset) else {
            warn!("frame too short for addressing");
            return Ok(LinkEvent::BadFrame);
        };

        if carries_ack_tag(&packet) && frame.dest != BROADCAST_ADDRESS {
            debug!(
                "[ACK] RSSI: {} LQI: {:#04X} CRC: {}",
                frame.rssi_dbm,
                frame.lqi,
                if frame.crc_ok { "OK" } else { "BAD" }
            );
            return Ok(LinkEvent::Ack {
                peer: frame.src,
                rssi_dbm: frame.rssi_dbm,
                lqi: frame.lqi,
                crc_ok: frame.crc_ok,
            });
        }

        debug!(
            "RSSI: {} LQI: {:#04X} CRC: {}",
            frame.rssi_dbm,
            frame.lqi,
            if frame.crc_ok { "OK" } else { "BAD" }
        );

        if frame.dest == BROADCAST_ADDRESS {
            warn!("broadcast message");
        } else {
            self.send_acknowledge(frame.src)?;
        }
        Ok(LinkEvent::Data(frame))
    }

    /// Take the next parked frame, if any, without touching the radio
    pub fn poll_pending(&mut self) -> Option<LinkFrame> {
        self.pending.pop_front()
    }
}
