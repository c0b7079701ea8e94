//! GPIO pin roles for the emulated serial channel
//!
//! Pin direction itself is encoded by the embedded-hal traits the pins
//! implement (`InputPin` for RX, `OutputPin` for TX). This module only names
//! which physical pins fill those roles so the board configuration can say so
//! once.

/// Board-level GPIO number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

/// RX/TX pin pair for a software-emulated UART.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// Receive pin, configured as input.
    pub rx: PinId,
    /// Transmit pin, configured as output.
    pub tx: PinId,
}

impl PinAssignment {
    /// RX on GPIO 12, TX on GPIO 11.
    pub const DEFAULT: Self = Self {
        rx: PinId(12),
        tx: PinId(11),
    };
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl PinState {
    /// UART line idle level.
    pub const IDLE: Self = Self::High;
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}
