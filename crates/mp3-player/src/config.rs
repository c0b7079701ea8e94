//! Player configuration
//!
//! Compile-time defaults for the link and the module; boards override fields
//! with struct-update syntax.

use embassy_time::Duration;
use platform::UartConfig;

use crate::module::BeginOptions;
use crate::types::{TrackIndex, Volume};

/// Reply timeout set on the module after a successful handshake.
pub const DEFAULT_TIMEOUT_MS: u64 = 500;

/// Volume set after a successful handshake (scale 0–30).
pub const DEFAULT_VOLUME: u8 = 25;

/// Everything `Mp3Player::setup` applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayerConfig {
    /// Serial framing (9600 8N1).
    pub uart: UartConfig,
    /// Module reply timeout.
    pub timeout: Duration,
    /// Initial volume.
    pub volume: Volume,
    /// Track looped right after setup.
    pub initial_track: TrackIndex,
    /// Handshake options.
    pub begin: BeginOptions,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            uart: UartConfig::dfplayer(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            volume: Volume::new(DEFAULT_VOLUME),
            initial_track: TrackIndex::FIRST,
            begin: BeginOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.uart.baud_rate, 9600);
        assert!(config.uart.is_8n1());
        assert_eq!(config.timeout.as_millis(), 500);
        assert_eq!(config.volume.get(), 25);
        assert_eq!(config.initial_track, TrackIndex::FIRST);
        assert!(config.begin.ack);
        assert!(config.begin.reset);
    }
}
