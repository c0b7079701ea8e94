//! Hardware UART wrapper
//!
//! Embassy HALs fix baud rate and framing when the UART is constructed, so
//! [`HardwareUart`] records the framing the HAL was built with and
//! `configure` only checks that the requested framing matches it.

use embedded_io::ReadReady;
use embedded_io_async::{Read, ReadExactError, Write};

use crate::peripheral::{UartConfig, UartError, UartPeripheral};

/// UART backed by a HAL peripheral implementing `embedded-io-async`.
pub struct HardwareUart<U> {
    uart: U,
    applied: UartConfig,
    open: bool,
}

impl<U> HardwareUart<U> {
    /// Wrap a HAL UART that was constructed with `applied` framing.
    pub fn new(uart: U, applied: UartConfig) -> Self {
        Self {
            uart,
            applied,
            open: false,
        }
    }

    /// Framing the HAL peripheral runs with.
    pub fn applied_config(&self) -> UartConfig {
        self.applied
    }

    /// Returns `true` once `configure` has succeeded.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Give the HAL peripheral back.
    pub fn release(self) -> U {
        self.uart
    }

    fn ensure_open(&self) -> Result<(), UartError> {
        if self.open {
            Ok(())
        } else {
            Err(UartError::NotOpen)
        }
    }
}

impl<U> UartPeripheral for HardwareUart<U>
where
    U: Read + Write + ReadReady,
{
    type Error = UartError;

    fn configure(&mut self, config: UartConfig) -> Result<(), Self::Error> {
        if config != self.applied {
            return Err(UartError::UnsupportedConfig);
        }
        self.open = true;
        Ok(())
    }

    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        self.ensure_open()?;
        self.uart.read_ready().map_err(|_| UartError::Io)
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.ensure_open()?;
        self.uart.write_all(data).await.map_err(|_| UartError::Io)?;
        self.uart.flush().await.map_err(|_| UartError::Io)
    }

    async fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.ensure_open()?;
        self.uart.read_exact(buffer).await.map_err(|e| match e {
            ReadExactError::UnexpectedEof => UartError::Timeout,
            ReadExactError::Other(_) => UartError::Io,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::peripheral::Parity;

    /// In-memory stand-in for a HAL UART.
    #[derive(Default)]
    struct FakeHalUart {
        rx: heapless::Deque<u8, 32>,
        tx: heapless::Vec<u8, 32>,
        flushes: usize,
    }

    impl embedded_io::ErrorType for FakeHalUart {
        type Error = core::convert::Infallible;
    }

    impl Read for FakeHalUart {
        async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut n = 0;
            for slot in buf.iter_mut() {
                match self.rx.pop_front() {
                    Some(b) => {
                        *slot = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl Write for FakeHalUart {
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            for b in buf {
                self.tx.push(*b).unwrap();
            }
            Ok(buf.len())
        }

        async fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    impl ReadReady for FakeHalUart {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty())
        }
    }

    #[tokio::test]
    async fn test_io_before_configure_is_rejected() {
        let mut uart = HardwareUart::new(FakeHalUart::default(), UartConfig::dfplayer());
        assert_eq!(uart.write(&[1]).await, Err(UartError::NotOpen));
        assert_eq!(uart.read_ready(), Err(UartError::NotOpen));
        assert!(!uart.is_open());
    }

    #[test]
    fn test_configure_rejects_mismatched_framing() {
        let mut uart = HardwareUart::new(FakeHalUart::default(), UartConfig::dfplayer());
        let odd = UartConfig {
            parity: Parity::Odd,
            ..UartConfig::dfplayer()
        };
        assert_eq!(uart.configure(odd), Err(UartError::UnsupportedConfig));
        assert!(!uart.is_open());
    }

    #[test]
    fn test_applied_config_is_the_accepted_framing() {
        let even = UartConfig {
            parity: Parity::Even,
            ..UartConfig::dfplayer()
        };
        let mut uart = HardwareUart::new(FakeHalUart::default(), even);
        assert_eq!(uart.applied_config(), even);

        assert_eq!(
            uart.configure(UartConfig::dfplayer()),
            Err(UartError::UnsupportedConfig)
        );
        let applied = uart.applied_config();
        uart.configure(applied).unwrap();
        assert!(uart.is_open());
    }

    #[tokio::test]
    async fn test_write_then_flush() {
        let mut uart = HardwareUart::new(FakeHalUart::default(), UartConfig::dfplayer());
        uart.configure(UartConfig::dfplayer()).unwrap();
        uart.write(&[0x7E, 0xFF, 0x06]).await.unwrap();

        let hal = uart.release();
        assert_eq!(&hal.tx[..], &[0x7E, 0xFF, 0x06]);
        assert_eq!(hal.flushes, 1);
    }

    #[tokio::test]
    async fn test_read_ready_and_read() {
        let mut hal = FakeHalUart::default();
        hal.rx.push_back(0x41).unwrap();
        hal.rx.push_back(0x42).unwrap();
        let mut uart = HardwareUart::new(hal, UartConfig::dfplayer());
        uart.configure(UartConfig::dfplayer()).unwrap();

        assert!(uart.read_ready().unwrap());
        let mut buf = [0u8; 2];
        uart.read(&mut buf).await.unwrap();
        assert_eq!(buf, [0x41, 0x42]);
        assert!(!uart.read_ready().unwrap());
    }

    #[tokio::test]
    async fn test_short_read_maps_to_timeout() {
        let mut hal = FakeHalUart::default();
        hal.rx.push_back(0x01).unwrap();
        let mut uart = HardwareUart::new(hal, UartConfig::dfplayer());
        uart.configure(UartConfig::dfplayer()).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(uart.read(&mut buf).await, Err(UartError::Timeout));
    }
}
