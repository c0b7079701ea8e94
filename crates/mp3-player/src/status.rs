//! Status decoder: maps a [`StatusEvent`] to the console line it produces.
//!
//! | type         | line                              |
//! |--------------|-----------------------------------|
//! | TimeOut      | `Time Out!`                       |
//! | WrongStack   | `Stack Wrong!`                    |
//! | CardInserted | `Card Inserted!`                  |
//! | CardRemoved  | `Card Removed!`                   |
//! | CardOnline   | `Card Online!`                    |
//! | UsbInserted  | `USB Inserted!`                   |
//! | UsbRemoved   | `USB Removed!`                    |
//! | PlayFinished | `Number:<value> Play Finished!`   |
//! | Error        | `DFPlayerError:<message>`         |
//!
//! Every other type produces no line. An error value outside the error
//! table produces the bare `DFPlayerError:` prefix.

use core::fmt::Write as _;

use crate::event::{ErrorCode, EventKind, StatusEvent};

/// Prefix of every module error line.
pub const ERROR_PREFIX: &str = "DFPlayerError:";

/// Longest line the decoder or the driver ever renders, with headroom.
pub const LINE_CAPACITY: usize = 48;

/// Fixed-capacity buffer holding one rendered console line.
pub type LineBuffer = heapless::String<LINE_CAPACITY>;

/// A decoded, printable status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusLine {
    /// `Time Out!`
    TimeOut,
    /// `Stack Wrong!`
    StackWrong,
    /// `Card Inserted!`
    CardInserted,
    /// `Card Removed!`
    CardRemoved,
    /// `Card Online!`
    CardOnline,
    /// `USB Inserted!`
    UsbInserted,
    /// `USB Removed!`
    UsbRemoved,
    /// `Number:<track> Play Finished!`
    PlayFinished {
        /// Track number reported by the module.
        track: u16,
    },
    /// `DFPlayerError:` plus the message for a known code.
    ModuleError(Option<ErrorCode>),
}

/// Decode one event. `None` means the event prints nothing.
pub fn decode(event: StatusEvent) -> Option<StatusLine> {
    let line = match event.kind {
        EventKind::TimeOut => StatusLine::TimeOut,
        EventKind::WrongStack => StatusLine::StackWrong,
        EventKind::CardInserted => StatusLine::CardInserted,
        EventKind::CardRemoved => StatusLine::CardRemoved,
        EventKind::CardOnline => StatusLine::CardOnline,
        EventKind::UsbInserted => StatusLine::UsbInserted,
        EventKind::UsbRemoved => StatusLine::UsbRemoved,
        EventKind::PlayFinished => StatusLine::PlayFinished {
            track: event.detail,
        },
        EventKind::Error => StatusLine::ModuleError(ErrorCode::from_value(event.detail)),
        EventKind::UsbOnline
        | EventKind::CardUsbOnline
        | EventKind::FeedBack
        | EventKind::Unknown(_) => return None,
    };
    Some(line)
}

impl StatusLine {
    /// Render into a fixed-capacity buffer.
    pub fn render(&self) -> Result<LineBuffer, core::fmt::Error> {
        let mut out = LineBuffer::new();
        write!(out, "{self}")?;
        Ok(out)
    }
}

impl core::fmt::Display for StatusLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::TimeOut => f.write_str("Time Out!"),
            Self::StackWrong => f.write_str("Stack Wrong!"),
            Self::CardInserted => f.write_str("Card Inserted!"),
            Self::CardRemoved => f.write_str("Card Removed!"),
            Self::CardOnline => f.write_str("Card Online!"),
            Self::UsbInserted => f.write_str("USB Inserted!"),
            Self::UsbRemoved => f.write_str("USB Removed!"),
            Self::PlayFinished { track } => write!(f, "Number:{track} Play Finished!"),
            Self::ModuleError(code) => {
                f.write_str(ERROR_PREFIX)?;
                match code {
                    Some(code) => f.write_str(code.message()),
                    None => Ok(()),
                }
            }
        }
    }
}
