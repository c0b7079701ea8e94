//! Status events reported by the player module.
//!
//! The module pushes `(type, value)` notifications on its own: media
//! inserted or removed, a track finished, or an error code. The numbering
//! below is the vendor's.

/// Kind of status notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// No reply within the communication timeout (0).
    TimeOut,
    /// Malformed frame received (1).
    WrongStack,
    /// SD card inserted (2).
    CardInserted,
    /// SD card removed (3).
    CardRemoved,
    /// SD card online after reset (4).
    CardOnline,
    /// A track finished playing; value is the track number (5).
    PlayFinished,
    /// Module error; value is an [`ErrorCode`] (6).
    Error,
    /// USB drive inserted (7).
    UsbInserted,
    /// USB drive removed (8).
    UsbRemoved,
    /// USB drive online after reset (9).
    UsbOnline,
    /// SD card and USB drive both online (10).
    CardUsbOnline,
    /// Acknowledgement frame (11).
    FeedBack,
    /// Code outside the vendor table.
    Unknown(u8),
}

impl EventKind {
    /// Vendor type code.
    pub const fn code(self) -> u8 {
        match self {
            Self::TimeOut => 0,
            Self::WrongStack => 1,
            Self::CardInserted => 2,
            Self::CardRemoved => 3,
            Self::CardOnline => 4,
            Self::PlayFinished => 5,
            Self::Error => 6,
            Self::UsbInserted => 7,
            Self::UsbRemoved => 8,
            Self::UsbOnline => 9,
            Self::CardUsbOnline => 10,
            Self::FeedBack => 11,
            Self::Unknown(code) => code,
        }
    }
}

impl From<u8> for EventKind {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::TimeOut,
            1 => Self::WrongStack,
            2 => Self::CardInserted,
            3 => Self::CardRemoved,
            4 => Self::CardOnline,
            5 => Self::PlayFinished,
            6 => Self::Error,
            7 => Self::UsbInserted,
            8 => Self::UsbRemoved,
            9 => Self::UsbOnline,
            10 => Self::CardUsbOnline,
            11 => Self::FeedBack,
            other => Self::Unknown(other),
        }
    }
}

/// Value carried by an [`EventKind::Error`] notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// Module busy; reported when no storage is found (1).
    Busy,
    /// Module is sleeping (2).
    Sleeping,
    /// Module received a malformed frame (3).
    SerialWrongStack,
    /// Frame checksum mismatch (4).
    CheckSumNotMatch,
    /// Track index beyond the files on the medium (5).
    FileIndexOut,
    /// Requested file not found (6).
    FileMismatch,
    /// Advertisement insert in progress (7).
    Advertise,
}

impl ErrorCode {
    /// Map a raw error value, `None` for values outside the vendor table.
    pub const fn from_value(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::Busy),
            2 => Some(Self::Sleeping),
            3 => Some(Self::SerialWrongStack),
            4 => Some(Self::CheckSumNotMatch),
            5 => Some(Self::FileIndexOut),
            6 => Some(Self::FileMismatch),
            7 => Some(Self::Advertise),
            _ => None,
        }
    }

    /// Console text for this error.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Busy => "Card not found",
            Self::Sleeping => "Sleeping",
            Self::SerialWrongStack => "Get Wrong Stack",
            Self::CheckSumNotMatch => "Check Sum Not Match",
            Self::FileIndexOut => "File Index Out of Bound",
            Self::FileMismatch => "Cannot Find File",
            Self::Advertise => "In Advertise",
        }
    }
}

/// One `(type, value)` notification read from the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusEvent {
    /// Notification kind.
    pub kind: EventKind,
    /// Kind-specific value (track number, error code, ...).
    pub detail: u16,
}

impl StatusEvent {
    /// Build from the raw pair the module reports.
    pub fn from_raw(code: u8, detail: u16) -> Self {
        Self {
            kind: EventKind::from(code),
            detail,
        }
    }

    /// `Some(track)` when this reports a finished track.
    pub fn finished_track(&self) -> Option<u16> {
        match self.kind {
            EventKind::PlayFinished => Some(self.detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_codes_round_trip() {
        for code in 0..=11u8 {
            let kind = EventKind::from(code);
            assert!(!matches!(kind, EventKind::Unknown(_)), "code {code} is known");
            assert_eq!(kind.code(), code);
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        assert_eq!(EventKind::from(42), EventKind::Unknown(42));
        assert_eq!(EventKind::Unknown(42).code(), 42);
    }

    #[test]
    fn test_error_code_table() {
        assert_eq!(ErrorCode::from_value(1), Some(ErrorCode::Busy));
        assert_eq!(ErrorCode::from_value(7), Some(ErrorCode::Advertise));
        assert_eq!(ErrorCode::from_value(0), None);
        assert_eq!(ErrorCode::from_value(255), None);
    }

    #[test]
    fn test_busy_means_card_not_found() {
        assert_eq!(ErrorCode::Busy.message(), "Card not found");
    }

    #[test]
    fn test_finished_track() {
        assert_eq!(StatusEvent::from_raw(5, 7).finished_track(), Some(7));
        assert_eq!(StatusEvent::from_raw(2, 0).finished_track(), None);
    }
}
