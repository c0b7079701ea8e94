//! Mock implementations for testing
//!
//! [`MockUart`] implements [`UartPeripheral`] in memory so the player driver
//! and the application layer can be tested without hardware. Always
//! compiled (heapless-backed) so integration tests in other crates can use it.

use crate::peripheral::{UartConfig, UartError, UartPeripheral};

/// Bytes a [`MockUart`] can hold in each direction.
pub const MOCK_UART_CAPACITY: usize = 256;

/// In-memory UART: records written bytes, serves queued bytes to reads.
pub struct MockUart {
    config: Option<UartConfig>,
    configure_count: usize,
    reject_config: bool,
    written: heapless::Vec<u8, MOCK_UART_CAPACITY>,
    incoming: heapless::Deque<u8, MOCK_UART_CAPACITY>,
}

impl MockUart {
    /// Create a closed mock UART with nothing queued.
    pub fn new() -> Self {
        Self {
            config: None,
            configure_count: 0,
            reject_config: false,
            written: heapless::Vec::new(),
            incoming: heapless::Deque::new(),
        }
    }

    /// Create a mock whose `configure` always fails, as a channel that cannot
    /// provide the requested framing would.
    pub fn rejecting() -> Self {
        Self {
            reject_config: true,
            ..Self::new()
        }
    }

    /// Queue bytes for later reads.
    pub fn push_incoming(&mut self, bytes: &[u8]) -> Result<(), UartError> {
        for byte in bytes {
            self.incoming
                .push_back(*byte)
                .map_err(|_| UartError::BufferFull)?;
        }
        Ok(())
    }

    /// Framing from the last successful `configure`.
    pub fn config(&self) -> Option<UartConfig> {
        self.config
    }

    /// Number of `configure` calls, successful or not.
    pub fn configure_count(&self) -> usize {
        self.configure_count
    }

    /// Everything written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}

impl Default for MockUart {
    fn default() -> Self {
        Self::new()
    }
}

impl UartPeripheral for MockUart {
    type Error = UartError;

    fn configure(&mut self, config: UartConfig) -> Result<(), Self::Error> {
        self.configure_count = self.configure_count.saturating_add(1);
        if self.reject_config {
            return Err(UartError::UnsupportedConfig);
        }
        self.config = Some(config);
        Ok(())
    }

    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        if self.config.is_none() {
            return Err(UartError::NotOpen);
        }
        Ok(!self.incoming.is_empty())
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.config.is_none() {
            return Err(UartError::NotOpen);
        }
        self.written
            .extend_from_slice(data)
            .map_err(|_| UartError::BufferFull)
    }

    async fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        if self.config.is_none() {
            return Err(UartError::NotOpen);
        }
        for slot in buffer.iter_mut() {
            *slot = self.incoming.pop_front().ok_or(UartError::Timeout)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_uart_requires_configure() {
        let mut uart = MockUart::new();
        assert_eq!(uart.read_ready(), Err(UartError::NotOpen));
        assert_eq!(uart.write(&[1]).await, Err(UartError::NotOpen));
    }

    #[tokio::test]
    async fn test_mock_uart_round_trip() {
        let mut uart = MockUart::new();
        uart.configure(UartConfig::dfplayer()).unwrap();
        uart.push_incoming(&[0x10, 0x20]).unwrap();

        assert!(uart.read_ready().unwrap());
        assert_eq!(uart.read_byte().await.unwrap(), 0x10);
        assert_eq!(uart.read_byte().await.unwrap(), 0x20);
        assert!(!uart.read_ready().unwrap());
        assert_eq!(uart.read_byte().await, Err(UartError::Timeout));

        uart.write_byte(0x55).await.unwrap();
        assert_eq!(uart.written(), &[0x55]);
    }

    #[test]
    fn test_rejecting_mock_counts_attempts() {
        let mut uart = MockUart::rejecting();
        assert_eq!(
            uart.configure(UartConfig::dfplayer()),
            Err(UartError::UnsupportedConfig)
        );
        assert_eq!(uart.configure_count(), 1);
        assert_eq!(uart.config(), None);
    }
}
