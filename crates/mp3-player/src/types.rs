//! Player domain newtypes.
//!
//! - `Volume`: module volume, clamped to 0–30
//! - `TrackIndex`: 1-based track number as the module counts tracks

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "value {} outside {}..={}",
            self.value, self.min, self.max
        )
    }
}

// ── Volume ───────────────────────────────────────────────────────────────────

/// Module volume, clamped to `0..=30`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Volume(u8);

impl Volume {
    /// Loudest setting the module accepts.
    pub const MAX: u8 = 30;

    /// Create a `Volume`, clamping values above 30 to 30.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Create a `Volume`, returning an error if `value > 30`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > Self::MAX {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: u32::from(Self::MAX),
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner volume value (0–30).
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

// ── TrackIndex ───────────────────────────────────────────────────────────────

/// 1-based track number. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct TrackIndex(u16);

impl TrackIndex {
    /// Track 1, where the module starts looping after setup.
    pub const FIRST: Self = Self(1);

    /// Create a `TrackIndex` from a 1-based number.
    pub fn new(index: u16) -> Result<Self, OutOfRangeError> {
        if index == 0 {
            Err(OutOfRangeError {
                value: 0,
                min: 1,
                max: u32::from(u16::MAX),
            })
        } else {
            Ok(Self(index))
        }
    }

    /// Convert a zero-based host track number to the module's 1-based index.
    pub fn from_zero_based(track: u16) -> Result<Self, OutOfRangeError> {
        track.checked_add(1).map(Self).ok_or(OutOfRangeError {
            value: u32::from(track),
            min: 0,
            max: u32::from(u16::MAX).saturating_sub(1),
        })
    }

    /// Return the 1-based index.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl Default for TrackIndex {
    fn default() -> Self {
        Self::FIRST
    }
}
