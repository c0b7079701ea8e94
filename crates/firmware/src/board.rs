//! Board configuration
//!
//! One [`BoardConfig`] per wiring variant. The transport is chosen here once;
//! nothing else in the firmware branches on it.

use mp3_player::{Console, DfPlayerModule, Mp3Player, PlayerConfig};
use platform::{PinAssignment, SerialTransport, TransportKind, UartError, UartPeripheral};

/// Player driving a DFPlayer Mini over this board's serial channel.
pub type DfPlayer<H, S, C> = Mp3Player<SerialTransport<H, S>, DfPlayerModule, C>;

/// Application name shown in the startup banner.
pub const APP_NAME: &str = "DFPlayer Loop";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wiring and player settings for one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Serial channel to the module.
    pub transport: TransportKind,
    /// Settings applied by `Mp3Player::setup`.
    pub player: PlayerConfig,
}

impl BoardConfig {
    /// Module wired to the primary hardware UART.
    pub fn hardware_uart() -> Self {
        Self {
            transport: TransportKind::Hardware,
            player: PlayerConfig::default(),
        }
    }

    /// Module wired to two GPIO pins driven as a software UART.
    pub fn emulated_uart(pins: PinAssignment) -> Self {
        Self {
            transport: TransportKind::Emulated(pins),
            player: PlayerConfig::default(),
        }
    }

    /// Build the serial channel for this board.
    ///
    /// Only the constructor matching [`transport`](Self::transport) is called.
    pub fn open_transport<H, S>(
        &self,
        hardware: impl FnOnce() -> H,
        emulated: impl FnOnce(PinAssignment) -> S,
    ) -> SerialTransport<H, S>
    where
        H: UartPeripheral<Error = UartError>,
        S: UartPeripheral<Error = UartError>,
    {
        SerialTransport::select(self.transport, hardware, emulated)
    }

    /// Player for a DFPlayer Mini wired to this board.
    ///
    /// Call `setup` on the result before the host loop.
    pub fn dfplayer<H, S, C>(
        &self,
        hardware: impl FnOnce() -> H,
        emulated: impl FnOnce(PinAssignment) -> S,
        console: C,
    ) -> DfPlayer<H, S, C>
    where
        H: UartPeripheral<Error = UartError>,
        S: UartPeripheral<Error = UartError>,
        C: Console,
    {
        let uart = self.open_transport(hardware, emulated);
        Mp3Player::new(uart, DfPlayerModule::new(), console, self.player)
    }
}

/// Software UART on RX 12 / TX 11.
impl Default for BoardConfig {
    fn default() -> Self {
        Self::emulated_uart(PinAssignment::DEFAULT)
    }
}
