//! Serial peripheral abstraction layer
//!
//! Provides the trait-based abstraction for the UART-like byte channel that
//! connects the MCU to the player module, plus its framing configuration.

/// UART peripheral abstraction
///
/// Implemented by both the hardware UART wrapper and the bit-banged software
/// UART so the player driver never knows which one it talks through.
pub trait UartPeripheral {
    /// Error type
    type Error: core::fmt::Debug;

    /// Open the channel with the given framing.
    ///
    /// Must be called before any read or write.
    fn configure(&mut self, config: UartConfig) -> Result<(), Self::Error>;

    /// Returns `true` if at least one byte can be read without waiting.
    fn read_ready(&mut self) -> Result<bool, Self::Error>;

    /// Write data
    fn write(&mut self, data: &[u8])
        -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Read exactly `buffer.len()` bytes
    fn read(
        &mut self,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Write single byte
    fn write_byte(
        &mut self,
        byte: u8,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>> {
        async move { self.write(&[byte]).await }
    }

    /// Read single byte
    fn read_byte(&mut self) -> impl core::future::Future<Output = Result<u8, Self::Error>> {
        async move {
            let mut buf = [0u8];
            self.read(&mut buf).await?;
            Ok(buf[0])
        }
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate
    pub baud_rate: u32,
    /// Data bits
    pub data_bits: DataBits,
    /// Parity
    pub parity: Parity,
    /// Stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// Baud rate the DFPlayer module listens at.
    pub const DFPLAYER_BAUD: u32 = 9600;

    /// 9600 baud, 8 data bits, no parity, 1 stop bit.
    pub const fn dfplayer() -> Self {
        Self {
            baud_rate: Self::DFPLAYER_BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }

    /// Returns `true` for plain 8N1 framing.
    pub fn is_8n1(&self) -> bool {
        self.data_bits == DataBits::Eight
            && self.parity == Parity::None
            && self.stop_bits == StopBits::One
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::dfplayer()
    }
}

/// Data bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    /// 7 data bits
    Seven,
    /// 8 data bits
    Eight,
    /// 9 data bits
    Nine,
}

/// Parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// Stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// 1 stop bit
    One,
    /// 2 stop bits
    Two,
}

/// Errors shared by every [`UartPeripheral`] implementation in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Read or write attempted before [`UartPeripheral::configure`].
    NotOpen,
    /// The requested framing cannot be provided by this channel.
    UnsupportedConfig,
    /// Start or stop bit had the wrong level.
    Framing,
    /// No start bit arrived within the allowed idle time.
    Timeout,
    /// A GPIO pin reported an error.
    Pin,
    /// The underlying HAL UART reported an error.
    Io,
    /// A fixed-capacity buffer is full.
    BufferFull,
}

#[cfg(feature = "std")]
impl std::error::Error for UartError {}

impl core::fmt::Display for UartError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotOpen => f.write_str("UART channel not open"),
            Self::UnsupportedConfig => f.write_str("UART framing not supported by this channel"),
            Self::Framing => f.write_str("UART framing error"),
            Self::Timeout => f.write_str("UART receive timeout"),
            Self::Pin => f.write_str("UART pin error"),
            Self::Io => f.write_str("UART I/O error"),
            Self::BufferFull => f.write_str("UART buffer full"),
        }
    }
}
