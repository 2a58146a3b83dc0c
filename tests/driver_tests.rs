//! Driver-level tests against the scripted mock bus: initialization and
//! identity checking, state machine discipline, FIFO data paths and the
//! recoverable error conditions.

mod mock_hal;

use cc1101_rs::radio::registers as regs;
use cc1101_rs::{Band, BusError, Cc1101Driver, ChipState, DriverError, PacketSignal, RadioConfig};
use mock_hal::MockHal;
use std::sync::Arc;

fn driver_under_test() -> (
    Cc1101Driver<MockHal>,
    Arc<std::sync::Mutex<mock_hal::MockState>>,
) {
    let (hal, state) = MockHal::new();
    let driver = Cc1101Driver::new(hal, RadioConfig::default());
    (driver, state)
}

#[test]
fn initialize_configures_chip_and_enters_rx() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();

    assert_eq!(driver.state(), ChipState::Rx);

    let state = state.lock().unwrap();
    assert_eq!(state.marcstate, 0x0D);
    assert!(state.strobe_count(regs::SRES) >= 1);
    // Profile burst plus write-through of the mirrored fields
    assert_eq!(state.registers[regs::SYNC1 as usize], 0x57);
    assert_eq!(state.registers[regs::SYNC0 as usize], 0x43);
    assert_eq!(state.registers[regs::ADDR as usize], 0xFF);
    assert_eq!(state.registers[regs::CHANNR as usize], 0);
    // 868 MHz band words and power table
    assert_eq!(state.registers[regs::FREQ2 as usize], 0x21);
    assert_eq!(state.registers[regs::FREQ1 as usize], 0x65);
    assert_eq!(state.registers[regs::FREQ0 as usize], 0x6A);
    assert_eq!(state.patable, *Band::Mhz868.power_table());
    // GDO repurposed for sync-detect packet signaling
    assert_eq!(
        state.registers[regs::IOCFG2 as usize],
        regs::GDO_CFG_SYNC_DETECT
    );
}

#[test]
fn identity_mismatch_is_fatal_and_leaves_chip_unconfigured() {
    let (mut driver, state) = driver_under_test();
    state.lock().unwrap().version = 0x00;

    let err = driver.initialize().unwrap_err();
    assert!(matches!(
        err,
        DriverError::ChipIdentityMismatch {
            partnum: 0x00,
            version: 0x00
        }
    ));

    let state = state.lock().unwrap();
    // No register configuration happened after the failed identity check
    assert_eq!(state.registers[regs::SYNC1 as usize], 0x00);
    assert_eq!(state.strobe_count(regs::SRX), 0);
}

#[test]
fn stuck_ready_handshake_reports_bus_timeout() {
    let (mut driver, state) = driver_under_test();
    state.lock().unwrap().ready = false;

    let err = driver.initialize().unwrap_err();
    assert!(matches!(err, DriverError::Bus(BusError::Timeout)));
}

#[test]
fn send_data_passes_through_idle_and_returns_to_rx() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();
    state.lock().unwrap().strobes.clear();

    driver.send_data(b"hi").unwrap();

    assert_eq!(driver.state(), ChipState::Rx);
    let state = state.lock().unwrap();
    // RX -> IDLE -> TX, then back through IDLE into RX; exactly one
    // intermediate strobe before the transmit strobe
    assert_eq!(
        state.strobes,
        vec![regs::SIDLE, regs::STX, regs::SIDLE, regs::SRX]
    );
    assert_eq!(state.transmissions.len(), 1);
    assert_eq!(state.transmissions[0], vec![2, b'h', b'i']);
}

#[test]
fn send_data_rejects_oversized_payload() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();

    let payload = [0u8; 64];
    let err = driver.send_data(&payload).unwrap_err();
    assert!(matches!(err, DriverError::OversizedFrame(64)));
    assert!(state.lock().unwrap().transmissions.is_empty());
}

#[test]
fn tx_underflow_flushes_and_recovers_to_rx() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();
    state.lock().unwrap().underflow_on_tx = true;

    let err = driver.send_data(b"payload").unwrap_err();
    assert!(matches!(err, DriverError::TxUnderflow));
    assert_eq!(driver.state(), ChipState::Rx);

    let state = state.lock().unwrap();
    assert!(state.strobe_count(regs::SFTX) >= 1);
    assert!(state.transmissions.is_empty());
    assert!(state.tx_fifo.is_empty());
}

#[test]
fn receive_data_extracts_payload_and_link_metrics() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();
    state
        .lock()
        .unwrap()
        .load_rx_frame(&[3, b'a', b'b', b'c'], 0x80, 0x80 | 0x30);

    let packet = driver.receive_data().unwrap();
    assert_eq!(packet.length, 3);
    assert_eq!(packet.payload, b"abc");
    assert!(packet.crc_ok());
    assert_eq!(packet.lqi(), 0x30);
    assert_eq!(packet.rssi_dbm(74), -138); // (0x80 - 256) / 2 - 74

    // The FIFO is flushed and the receiver re-armed
    assert_eq!(driver.state(), ChipState::Rx);
    let state = state.lock().unwrap();
    assert!(state.rx_fifo.is_empty());
    assert!(state.strobe_count(regs::SFRX) >= 1);
}

#[test]
fn oversized_incoming_length_yields_empty_packet() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();
    {
        let mut state = state.lock().unwrap();
        state.rx_fifo.push_back(200);
        state.rx_fifo.extend([0u8; 10]);
    }

    let packet = driver.receive_data().unwrap();
    assert!(packet.is_empty());
    assert_eq!(packet.length, 0);
    assert_eq!(driver.state(), ChipState::Rx);
}

#[test]
fn rx_overflow_is_reported_and_receiver_recovers() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();
    {
        let mut state = state.lock().unwrap();
        state.rx_status = Some(0x80 | 0x05);
        state.rx_fifo.extend([1, 2, 3, 4, 5]);
    }

    let err = driver.receive_data().unwrap_err();
    assert!(matches!(err, DriverError::RxOverflow));
    // Recoverable: the chip ends up receiving again with a clean FIFO
    assert_eq!(driver.state(), ChipState::Rx);
    assert!(state.lock().unwrap().rx_fifo.is_empty());
}

#[test]
fn setters_write_through_and_update_the_mirror() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();

    driver.set_channel(5).unwrap();
    driver.set_device_address(0x42).unwrap();
    driver.set_sync_word(0xB5, 0x47).unwrap();
    driver.set_carrier_band(Band::Mhz433).unwrap();
    driver.set_output_power(10).unwrap();

    assert_eq!(driver.config().channel, 5);
    assert_eq!(driver.config().device_address, 0x42);
    assert_eq!(driver.config().sync_word, [0xB5, 0x47]);
    assert_eq!(driver.config().band, Band::Mhz433);
    assert_eq!(driver.config().power_dbm, 10);

    let state = state.lock().unwrap();
    assert_eq!(state.registers[regs::CHANNR as usize], 5);
    assert_eq!(state.registers[regs::ADDR as usize], 0x42);
    assert_eq!(state.registers[regs::SYNC1 as usize], 0xB5);
    assert_eq!(state.registers[regs::SYNC0 as usize], 0x47);
    assert_eq!(state.registers[regs::FREQ2 as usize], 0x10);
    assert_eq!(state.registers[regs::FREQ1 as usize], 0xB0);
    assert_eq!(state.registers[regs::FREQ0 as usize], 0x71);
    assert_eq!(state.patable, *Band::Mhz433.power_table());
    // 10 dBm selects the top of the PATABLE ramp
    assert_eq!(state.registers[regs::FREND0 as usize] & 0x07, 7);
}

#[test]
fn power_down_and_wake_up() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();

    driver.power_down().unwrap();
    assert_eq!(driver.state(), ChipState::PowerDown);
    assert_eq!(state.lock().unwrap().marcstate, 0x00);

    driver.wake_up().unwrap();
    assert_eq!(driver.state(), ChipState::Rx);
}

#[test]
fn packet_signal_bypasses_level_polling() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();

    let signal = Arc::new(PacketSignal::new());
    driver.attach_signal(signal.clone());

    signal.notify();
    signal.notify();
    assert!(driver.packet_available().unwrap());
    assert!(driver.packet_available().unwrap());
    assert!(!driver.packet_available().unwrap());

    // The data-ready line was never sampled
    assert_eq!(state.lock().unwrap().data_ready_polls, 0);
}

#[test]
fn wait_for_packet_sees_scripted_level() {
    let (mut driver, state) = driver_under_test();
    driver.initialize().unwrap();
    state
        .lock()
        .unwrap()
        .script_data_ready(&[false, false, true]);

    assert!(driver.wait_for_packet(10).unwrap());
}

#[test]
fn wait_for_packet_times_out_quietly() {
    let (mut driver, _state) = driver_under_test();
    driver.initialize().unwrap();

    assert!(!driver.wait_for_packet(5).unwrap());
}
