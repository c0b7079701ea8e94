//! DFPlayer serial frames.
//!
//! Commands and replies share one fixed ten-byte layout:
//!
//! ```text
//! 0x7E 0xFF 0x06 CMD FEEDBACK PARAM_HI PARAM_LO SUM_HI SUM_LO 0xEF
//! ```
//!
//! The checksum is the two's complement of the sum of the six bytes between
//! the start marker and the checksum itself.

use crate::event::{EventKind, StatusEvent};

/// Bytes in every frame.
pub const FRAME_LEN: usize = 10;

/// First byte of every frame.
pub const START: u8 = 0x7E;
const VERSION: u8 = 0xFF;
const LENGTH: u8 = 0x06;
const END: u8 = 0xEF;

/// Command bytes the host sends.
pub mod command {
    /// Set volume; parameter 0..=30.
    pub const VOLUME: u8 = 0x06;
    /// Repeat one track; parameter is the 1-based file number.
    pub const LOOP_TRACK: u8 = 0x08;
    /// Reset the module.
    pub const RESET: u8 = 0x0C;
}

/// Command bytes the module sends on its own or in reply.
pub mod reply {
    /// Medium inserted; parameter bit 0 = USB, bit 1 = SD.
    pub const INSERTED: u8 = 0x3A;
    /// Medium removed; same parameter bits as [`INSERTED`].
    pub const REMOVED: u8 = 0x3B;
    /// Track on the USB drive finished.
    pub const USB_FINISHED: u8 = 0x3C;
    /// Track on the SD card finished.
    pub const CARD_FINISHED: u8 = 0x3D;
    /// Track in on-board flash finished.
    pub const FLASH_FINISHED: u8 = 0x3E;
    /// Module online after power-up or reset; parameter is the storage mask.
    pub const ONLINE: u8 = 0x3F;
    /// Error; parameter is the error code.
    pub const ERROR: u8 = 0x40;
    /// Command acknowledged.
    pub const ACK: u8 = 0x41;
}

const STORAGE_USB: u16 = 0x01;
const STORAGE_CARD: u16 = 0x02;

/// Reasons a received frame is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Start or end marker missing.
    Delimiter,
    /// Version or length byte not the fixed value.
    Header,
    /// Checksum does not match the frame body.
    Checksum,
}

/// One decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Command or reply byte.
    pub command: u8,
    /// Ask the module to acknowledge.
    pub feedback: bool,
    /// Command parameter.
    pub param: u16,
}

impl Frame {
    /// Build a frame.
    pub const fn new(command: u8, feedback: bool, param: u16) -> Self {
        Self {
            command,
            feedback,
            param,
        }
    }

    /// Serialise to the wire layout.
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let [param_hi, param_lo] = self.param.to_be_bytes();
        let feedback = u8::from(self.feedback);
        let [sum_hi, sum_lo] =
            checksum([VERSION, LENGTH, self.command, feedback, param_hi, param_lo]).to_be_bytes();
        [
            START,
            VERSION,
            LENGTH,
            self.command,
            feedback,
            param_hi,
            param_lo,
            sum_hi,
            sum_lo,
            END,
        ]
    }

    /// Parse ten received bytes.
    pub fn decode(bytes: &[u8; FRAME_LEN]) -> Result<Self, FrameError> {
        let [start, version, length, command, feedback, param_hi, param_lo, sum_hi, sum_lo, end] =
            *bytes;
        if start != START || end != END {
            return Err(FrameError::Delimiter);
        }
        if version != VERSION || length != LENGTH {
            return Err(FrameError::Header);
        }
        let body = [version, length, command, feedback, param_hi, param_lo];
        if checksum(body) != u16::from_be_bytes([sum_hi, sum_lo]) {
            return Err(FrameError::Checksum);
        }
        Ok(Self {
            command,
            feedback: feedback != 0,
            param: u16::from_be_bytes([param_hi, param_lo]),
        })
    }

    /// `true` for the frame the module sends once its storage is mounted.
    pub fn is_online(&self) -> bool {
        self.command == reply::ONLINE
    }

    /// Status notification carried by a module frame.
    ///
    /// `None` for query replies and for an online report with no storage.
    pub fn notification(&self) -> Option<StatusEvent> {
        let storage = self.param & (STORAGE_USB | STORAGE_CARD);
        let kind = match self.command {
            reply::USB_FINISHED | reply::CARD_FINISHED | reply::FLASH_FINISHED => {
                return Some(StatusEvent {
                    kind: EventKind::PlayFinished,
                    detail: self.param,
                })
            }
            reply::ERROR => {
                return Some(StatusEvent {
                    kind: EventKind::Error,
                    detail: self.param,
                })
            }
            reply::ACK => EventKind::FeedBack,
            reply::INSERTED if storage & STORAGE_USB != 0 => EventKind::UsbInserted,
            reply::INSERTED => EventKind::CardInserted,
            reply::REMOVED if storage & STORAGE_USB != 0 => EventKind::UsbRemoved,
            reply::REMOVED => EventKind::CardRemoved,
            reply::ONLINE => match storage {
                STORAGE_USB => EventKind::UsbOnline,
                STORAGE_CARD => EventKind::CardOnline,
                0 => return None,
                _ => EventKind::CardUsbOnline,
            },
            _ => return None,
        };
        Some(StatusEvent { kind, detail: 0 })
    }
}

fn checksum(body: [u8; 6]) -> u16 {
    let sum = body
        .iter()
        .fold(0u16, |acc, byte| acc.wrapping_add(u16::from(*byte)));
    0u16.wrapping_sub(sum)
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)] // Tests corrupt known offsets of a fixed-size frame
mod tests {
    use super::*;

    #[test]
    fn test_reset_frame_matches_datasheet() {
        let frame = Frame::new(command::RESET, false, 0).encode();
        assert_eq!(
            frame,
            [0x7E, 0xFF, 0x06, 0x0C, 0x00, 0x00, 0x00, 0xFE, 0xEF, 0xEF]
        );
    }

    #[test]
    fn test_volume_frame_with_feedback() {
        let frame = Frame::new(command::VOLUME, true, 25).encode();
        assert_eq!(
            frame,
            [0x7E, 0xFF, 0x06, 0x06, 0x01, 0x00, 0x19, 0xFE, 0xDB, 0xEF]
        );
    }

    #[test]
    fn test_decode_ack() {
        let raw = [0x7E, 0xFF, 0x06, 0x41, 0x00, 0x00, 0x00, 0xFE, 0xBA, 0xEF];
        let frame = Frame::decode(&raw);
        assert_eq!(frame, Ok(Frame::new(reply::ACK, false, 0)));
    }

    #[test]
    fn test_decode_rejects_corrupt_frames() {
        let good = Frame::new(reply::CARD_FINISHED, false, 7).encode();

        let mut bad_sum = good;
        bad_sum[8] ^= 0x01;
        assert_eq!(Frame::decode(&bad_sum), Err(FrameError::Checksum));

        let mut bad_end = good;
        bad_end[9] = 0x00;
        assert_eq!(Frame::decode(&bad_end), Err(FrameError::Delimiter));

        let mut bad_len = good;
        bad_len[2] = 0x08;
        assert_eq!(Frame::decode(&bad_len), Err(FrameError::Header));
    }

    #[test]
    fn test_notifications() {
        let cases = [
            (reply::CARD_FINISHED, 7, Some((EventKind::PlayFinished, 7))),
            (reply::USB_FINISHED, 3, Some((EventKind::PlayFinished, 3))),
            (reply::ERROR, 5, Some((EventKind::Error, 5))),
            (reply::ACK, 0, Some((EventKind::FeedBack, 0))),
            (reply::INSERTED, 0x02, Some((EventKind::CardInserted, 0))),
            (reply::INSERTED, 0x01, Some((EventKind::UsbInserted, 0))),
            (reply::REMOVED, 0x02, Some((EventKind::CardRemoved, 0))),
            (reply::ONLINE, 0x02, Some((EventKind::CardOnline, 0))),
            (reply::ONLINE, 0x01, Some((EventKind::UsbOnline, 0))),
            (reply::ONLINE, 0x03, Some((EventKind::CardUsbOnline, 0))),
            (reply::ONLINE, 0x00, None),
            (0x48, 12, None),
        ];
        for (command, param, expected) in cases {
            let event = Frame::new(command, false, param).notification();
            assert_eq!(
                event.map(|e| (e.kind, e.detail)),
                expected,
                "command {command:#04x} param {param}"
            );
        }
    }
}
