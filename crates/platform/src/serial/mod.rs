//! Serial channel selection
//!
//! Boards with a spare hardware UART talk to the player module through it;
//! boards whose only UART is taken by the console fall back to a
//! software-emulated UART on two GPIO pins. The choice is made once, at
//! startup, from a [`TransportKind`] and both paths are exposed through the
//! same [`UartPeripheral`] capability.

mod hardware;
mod soft;

pub use hardware::HardwareUart;
pub use soft::{SoftUart, IDLE_TIMEOUT_BITS};

use crate::gpio::PinAssignment;
use crate::peripheral::{UartConfig, UartError, UartPeripheral};

/// Which serial channel the board routes to the player module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportKind {
    /// Primary hardware UART.
    Hardware,
    /// Bit-banged UART on the given pins.
    Emulated(PinAssignment),
}

impl TransportKind {
    /// Short name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hardware => "hardware UART",
            Self::Emulated(_) => "emulated UART",
        }
    }
}

/// A serial channel that is either a hardware or an emulated UART.
pub enum SerialTransport<H, S> {
    /// Hardware UART path.
    Hardware(H),
    /// Software UART path.
    Emulated(S),
}

impl<H, S> SerialTransport<H, S> {
    /// Build the transport selected by `kind`.
    ///
    /// Only the constructor for the selected path is invoked, so the unused
    /// peripheral is never touched.
    pub fn select(
        kind: TransportKind,
        hardware: impl FnOnce() -> H,
        emulated: impl FnOnce(PinAssignment) -> S,
    ) -> Self {
        match kind {
            TransportKind::Hardware => Self::Hardware(hardware()),
            TransportKind::Emulated(pins) => Self::Emulated(emulated(pins)),
        }
    }

    /// Returns `true` for the software path.
    pub fn is_emulated(&self) -> bool {
        matches!(self, Self::Emulated(_))
    }
}

impl<H, S> UartPeripheral for SerialTransport<H, S>
where
    H: UartPeripheral<Error = UartError>,
    S: UartPeripheral<Error = UartError>,
{
    type Error = UartError;

    fn configure(&mut self, config: UartConfig) -> Result<(), Self::Error> {
        match self {
            Self::Hardware(uart) => uart.configure(config),
            Self::Emulated(uart) => uart.configure(config),
        }
    }

    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        match self {
            Self::Hardware(uart) => uart.read_ready(),
            Self::Emulated(uart) => uart.read_ready(),
        }
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        match self {
            Self::Hardware(uart) => uart.write(data).await,
            Self::Emulated(uart) => uart.write(data).await,
        }
    }

    async fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        match self {
            Self::Hardware(uart) => uart.read(buffer).await,
            Self::Emulated(uart) => uart.read(buffer).await,
        }
    }
}
