//! Player module capability.
//!
//! The player only needs the handful of operations below; the frame protocol
//! lives in the implementation (`DfPlayerModule` for real hardware).
//! Implementations borrow the serial channel per call so the player can own it.

use embassy_time::Duration;
use platform::UartPeripheral;

use crate::types::{TrackIndex, Volume};

/// Handshake options passed to [`Mp3Module::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeginOptions {
    /// Require the module to acknowledge every command.
    pub ack: bool,
    /// Reset the module before the handshake.
    pub reset: bool,
}

impl Default for BeginOptions {
    fn default() -> Self {
        Self {
            ack: true,
            reset: true,
        }
    }
}

/// Operations the playback driver needs from the vendor module.
pub trait Mp3Module<U: UartPeripheral> {
    /// Error type returned by module operations.
    type Error: core::fmt::Debug;

    /// Handshake: confirms the module answers and its storage is present.
    async fn begin(&mut self, uart: &mut U, options: BeginOptions) -> Result<(), Self::Error>;

    /// Communication timeout for replies.
    fn set_timeout(&mut self, timeout: Duration);

    /// Set output volume.
    async fn volume(&mut self, uart: &mut U, volume: Volume) -> Result<(), Self::Error>;

    /// Play `track` repeatedly.
    async fn loop_track(&mut self, uart: &mut U, track: TrackIndex) -> Result<(), Self::Error>;

    /// Returns `true` if a status notification has been received and
    /// latched for [`read_type`](Self::read_type)/[`read`](Self::read).
    ///
    /// Must not wait for data that has not arrived yet.
    async fn available(&mut self, uart: &mut U) -> Result<bool, Self::Error>;

    /// Type code of the latched notification.
    fn read_type(&self) -> u8;

    /// Value of the latched notification.
    fn read(&self) -> u16;
}
