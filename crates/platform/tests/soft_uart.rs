//! Bit-level tests for the software-emulated UART.
//!
//! Pin traffic is checked against embedded-hal-mock expectations; the delay
//! is a recorder so bit timing can be asserted too.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as Level, Transaction as PinTransaction,
};
use platform::serial::IDLE_TIMEOUT_BITS;
use platform::{PinAssignment, Parity, SoftUart, UartConfig, UartError, UartPeripheral};

/// Async delay that only adds up the requested time.
#[derive(Default)]
struct RecordingDelay {
    total_ns: u64,
    calls: usize,
}

impl embedded_hal_async::delay::DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }
}

fn levels_lsb_first(byte: u8) -> impl Iterator<Item = Level> {
    (0..8).map(move |bit| {
        if (byte >> bit) & 1 == 1 {
            Level::High
        } else {
            Level::Low
        }
    })
}

fn uart(
    rx: &[PinTransaction],
    tx: &[PinTransaction],
) -> SoftUart<PinMock, PinMock, RecordingDelay> {
    SoftUart::new(
        PinMock::new(rx),
        PinMock::new(tx),
        RecordingDelay::default(),
        PinAssignment::default(),
    )
}

fn finish(uart: SoftUart<PinMock, PinMock, RecordingDelay>) -> RecordingDelay {
    let (mut rx, mut tx, delay) = uart.release();
    rx.done();
    tx.done();
    delay
}

#[test]
fn configure_drives_tx_idle_high_and_sets_bit_time() {
    let mut uart = uart(&[], &[PinTransaction::set(Level::High)]);
    uart.configure(UartConfig::dfplayer()).unwrap();

    // 1 s / 9600 baud
    assert_eq!(uart.bit_ns(), 104_166);
    assert_eq!(uart.pins(), PinAssignment::default());
    finish(uart);
}

#[test]
fn configure_rejects_parity() {
    let mut uart = uart(&[], &[]);
    let config = UartConfig {
        parity: Parity::Even,
        ..UartConfig::dfplayer()
    };
    assert_eq!(uart.configure(config), Err(UartError::UnsupportedConfig));
    finish(uart);
}

#[test]
fn configure_rejects_zero_baud() {
    let mut uart = uart(&[], &[]);
    let config = UartConfig {
        baud_rate: 0,
        ..UartConfig::dfplayer()
    };
    assert_eq!(uart.configure(config), Err(UartError::UnsupportedConfig));
    finish(uart);
}

#[tokio::test]
async fn io_before_configure_is_rejected() {
    let mut uart = uart(&[], &[]);
    assert_eq!(uart.write(&[0x55]).await, Err(UartError::NotOpen));
    assert_eq!(uart.read_ready(), Err(UartError::NotOpen));
    finish(uart);
}

#[tokio::test]
async fn write_emits_start_data_lsb_first_then_stop() {
    let byte = 0xA5;
    let mut tx = vec![
        PinTransaction::set(Level::High), // idle on configure
        PinTransaction::set(Level::Low),  // start bit
    ];
    tx.extend(levels_lsb_first(byte).map(PinTransaction::set));
    tx.push(PinTransaction::set(Level::High)); // stop bit

    let mut uart = uart(&[], &tx);
    uart.configure(UartConfig::dfplayer()).unwrap();
    uart.write(&[byte]).await.unwrap();

    let bit_ns = uart.bit_ns();
    let delay = finish(uart);
    // start + 8 data + stop
    assert_eq!(delay.calls, 10);
    assert_eq!(delay.total_ns, u64::from(bit_ns) * 10);
}

#[tokio::test]
async fn read_samples_frame_after_start_bit() {
    let byte = 0x3C;
    let mut rx = vec![
        PinTransaction::get(Level::Low), // read_ready sees start bit
        PinTransaction::get(Level::Low), // start detected
        PinTransaction::get(Level::Low), // mid-bit confirmation
    ];
    rx.extend(levels_lsb_first(byte).map(PinTransaction::get));
    rx.push(PinTransaction::get(Level::High)); // stop bit

    let mut uart = uart(&rx, &[PinTransaction::set(Level::High)]);
    uart.configure(UartConfig::dfplayer()).unwrap();

    assert!(uart.read_ready().unwrap());
    let received = uart.read_byte().await.unwrap();
    assert_eq!(received, byte);
    finish(uart);
}

#[tokio::test]
async fn read_ready_is_false_on_idle_line() {
    let mut uart = uart(
        &[PinTransaction::get(Level::High)],
        &[PinTransaction::set(Level::High)],
    );
    uart.configure(UartConfig::dfplayer()).unwrap();
    assert!(!uart.read_ready().unwrap());
    finish(uart);
}

#[tokio::test]
async fn low_stop_bit_is_a_framing_error() {
    let mut rx = vec![PinTransaction::get(Level::Low), PinTransaction::get(Level::Low)];
    rx.extend(levels_lsb_first(0xFF).map(PinTransaction::get));
    rx.push(PinTransaction::get(Level::Low)); // broken stop bit

    let mut uart = uart(&rx, &[PinTransaction::set(Level::High)]);
    uart.configure(UartConfig::dfplayer()).unwrap();

    assert_eq!(uart.read_byte().await, Err(UartError::Framing));
    finish(uart);
}

#[tokio::test]
async fn start_glitch_is_a_framing_error() {
    let rx = [
        PinTransaction::get(Level::Low),  // looks like a start bit
        PinTransaction::get(Level::High), // gone by mid-bit
    ];
    let mut uart = uart(&rx, &[PinTransaction::set(Level::High)]);
    uart.configure(UartConfig::dfplayer()).unwrap();

    assert_eq!(uart.read_byte().await, Err(UartError::Framing));
    finish(uart);
}

#[tokio::test]
async fn idle_line_times_out() {
    let polls = (IDLE_TIMEOUT_BITS * 2) as usize;
    let rx = vec![PinTransaction::get(Level::High); polls];

    let mut uart = uart(&rx, &[PinTransaction::set(Level::High)]);
    uart.configure(UartConfig::dfplayer()).unwrap();

    assert_eq!(uart.read_byte().await, Err(UartError::Timeout));
    finish(uart);
}
