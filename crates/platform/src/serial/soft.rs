//! Software-emulated UART
//!
//! Bit-bangs 8N1 frames on a GPIO pair. The RX pin is polled, not interrupt
//! driven: [`UartPeripheral::read_ready`] reports a pending start bit, and a
//! read waits at most [`IDLE_TIMEOUT_BITS`] bit periods for one to appear.
//!
//! ```text
//!  idle  start  d0  d1  d2  d3  d4  d5  d6  d7  stop  idle
//!  ‾‾‾‾‾|_____|‾‾‾|___|...                     |‾‾‾‾‾‾‾‾‾‾
//!         1 bit each, LSB first
//! ```

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::gpio::{PinAssignment, PinState};
use crate::peripheral::{UartConfig, UartError, UartPeripheral};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Bit periods a read waits for a start bit before giving up.
pub const IDLE_TIMEOUT_BITS: u32 = 20;

/// Data bits per frame (8N1 only).
const DATA_BITS: u32 = 8;

/// Bit-banged UART on an input pin (RX) and an output pin (TX).
pub struct SoftUart<RX, TX, D> {
    rx: RX,
    tx: TX,
    delay: D,
    pins: PinAssignment,
    bit_ns: u32,
    open: bool,
}

impl<RX, TX, D> SoftUart<RX, TX, D>
where
    RX: InputPin,
    TX: OutputPin,
    D: DelayNs,
{
    /// Create an emulated UART. The line is not driven until `configure`.
    pub fn new(rx: RX, tx: TX, delay: D, pins: PinAssignment) -> Self {
        Self {
            rx,
            tx,
            delay,
            pins,
            bit_ns: 0,
            open: false,
        }
    }

    /// Board pins this channel runs on.
    pub fn pins(&self) -> PinAssignment {
        self.pins
    }

    /// Length of one bit in nanoseconds (zero before `configure`).
    pub fn bit_ns(&self) -> u32 {
        self.bit_ns
    }

    /// Give the pins and delay back.
    pub fn release(self) -> (RX, TX, D) {
        (self.rx, self.tx, self.delay)
    }

    fn ensure_open(&self) -> Result<(), UartError> {
        if self.open {
            Ok(())
        } else {
            Err(UartError::NotOpen)
        }
    }

    fn drive(&mut self, state: PinState) -> Result<(), UartError> {
        match state {
            PinState::High => self.tx.set_high(),
            PinState::Low => self.tx.set_low(),
        }
        .map_err(|_| UartError::Pin)
    }

    fn sample(&mut self) -> Result<PinState, UartError> {
        self.rx
            .is_high()
            .map(PinState::from)
            .map_err(|_| UartError::Pin)
    }

    async fn write_frame(&mut self, byte: u8) -> Result<(), UartError> {
        self.drive(PinState::Low)?;
        self.delay.delay_ns(self.bit_ns).await;

        for bit in 0..DATA_BITS {
            let level = byte.wrapping_shr(bit) & 1 == 1;
            self.drive(PinState::from(level))?;
            self.delay.delay_ns(self.bit_ns).await;
        }

        self.drive(PinState::High)?;
        self.delay.delay_ns(self.bit_ns).await;
        Ok(())
    }

    async fn wait_for_start_bit(&mut self) -> Result<(), UartError> {
        let half_bit = self.bit_ns / 2;
        // Polled twice per bit period.
        for _ in 0..IDLE_TIMEOUT_BITS.saturating_mul(2) {
            if self.sample()? == PinState::Low {
                return Ok(());
            }
            self.delay.delay_ns(half_bit).await;
        }
        Err(UartError::Timeout)
    }

    async fn read_frame(&mut self) -> Result<u8, UartError> {
        self.wait_for_start_bit().await?;

        // Re-check in the middle of the start bit to reject glitches.
        self.delay.delay_ns(self.bit_ns / 2).await;
        if self.sample()? != PinState::Low {
            return Err(UartError::Framing);
        }

        let mut byte = 0u8;
        for bit in 0..DATA_BITS {
            self.delay.delay_ns(self.bit_ns).await;
            if self.sample()? == PinState::High {
                byte |= 1u8.wrapping_shl(bit);
            }
        }

        self.delay.delay_ns(self.bit_ns).await;
        if self.sample()? != PinState::High {
            return Err(UartError::Framing);
        }
        Ok(byte)
    }
}

impl<RX, TX, D> UartPeripheral for SoftUart<RX, TX, D>
where
    RX: InputPin,
    TX: OutputPin,
    D: DelayNs,
{
    type Error = UartError;

    fn configure(&mut self, config: UartConfig) -> Result<(), Self::Error> {
        if !config.is_8n1() {
            return Err(UartError::UnsupportedConfig);
        }
        let bit_ns = NANOS_PER_SECOND
            .checked_div(config.baud_rate)
            .filter(|ns| *ns > 0)
            .ok_or(UartError::UnsupportedConfig)?;

        self.drive(PinState::IDLE)?;
        self.bit_ns = bit_ns;
        self.open = true;
        Ok(())
    }

    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        self.ensure_open()?;
        Ok(self.sample()? == PinState::Low)
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.ensure_open()?;
        for byte in data {
            self.write_frame(*byte).await?;
        }
        Ok(())
    }

    async fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.ensure_open()?;
        for slot in buffer.iter_mut() {
            *slot = self.read_frame().await?;
        }
        Ok(())
    }
}
