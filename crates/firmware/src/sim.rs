//! Simulated DFPlayer module for the desktop emulator.
//!
//! Behaves like a module with a card of `track_count` files: the handshake
//! reports the card online, a looping track reports `PlayFinished` every
//! `polls_per_track` polls, and a loop request past the last file reports
//! `FileIndexOut`. Card removal and insertion can be triggered by hand.

use embassy_time::Duration;
use mp3_player::{BeginOptions, EventKind, Mp3Module, TrackIndex, Volume};
use platform::UartPeripheral;

/// Notifications the simulated module can queue.
pub const SIM_EVENT_CAPACITY: usize = 8;

/// Raw error value for a track index past the last file.
const FILE_INDEX_OUT: u16 = 5;

/// Errors produced by [`SimulatedModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimError {
    /// Serial channel not usable.
    LinkDown,
    /// No card in the slot.
    NoCard,
    /// Too many notifications pending.
    QueueFull,
}

impl core::fmt::Display for SimError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LinkDown => f.write_str("serial link down"),
            Self::NoCard => f.write_str("no card inserted"),
            Self::QueueFull => f.write_str("notification queue full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SimError {}

/// In-memory stand-in for a DFPlayer module.
pub struct SimulatedModule {
    track_count: u16,
    polls_per_track: u32,
    card_present: bool,
    playing: Option<TrackIndex>,
    polls: u32,
    volume: Volume,
    timeout: Duration,
    pending: heapless::Deque<(u8, u16), SIM_EVENT_CAPACITY>,
    latched: (u8, u16),
}

impl SimulatedModule {
    /// Card with `track_count` files; each play lasts `polls_per_track` polls.
    pub fn new(track_count: u16, polls_per_track: u32) -> Self {
        Self {
            track_count,
            polls_per_track: polls_per_track.max(1),
            card_present: true,
            playing: None,
            polls: 0,
            volume: Volume::new(0),
            timeout: Duration::from_millis(0),
            pending: heapless::Deque::new(),
            latched: (0, 0),
        }
    }

    /// Module with an empty card slot; the handshake fails.
    pub fn without_card(track_count: u16, polls_per_track: u32) -> Self {
        Self {
            card_present: false,
            ..Self::new(track_count, polls_per_track)
        }
    }

    /// Pull the card: playback stops and `CardRemoved` is reported.
    pub fn remove_card(&mut self) -> Result<(), SimError> {
        self.card_present = false;
        self.playing = None;
        self.notify(EventKind::CardRemoved, 0)
    }

    /// Insert the card: `CardInserted` is reported, playback stays stopped.
    pub fn insert_card(&mut self) -> Result<(), SimError> {
        self.card_present = true;
        self.notify(EventKind::CardInserted, 0)
    }

    /// Track currently looping, if any.
    pub fn playing(&self) -> Option<TrackIndex> {
        self.playing
    }

    /// Last volume set.
    pub fn current_volume(&self) -> Volume {
        self.volume
    }

    /// Last reply timeout set.
    pub fn current_timeout(&self) -> Duration {
        self.timeout
    }

    /// Files on the simulated card.
    pub fn track_count(&self) -> u16 {
        self.track_count
    }

    fn notify(&mut self, kind: EventKind, detail: u16) -> Result<(), SimError> {
        self.pending
            .push_back((kind.code(), detail))
            .map_err(|_| SimError::QueueFull)
    }

    fn tick(&mut self) -> Option<(u8, u16)> {
        let track = self.playing?;
        self.polls = self.polls.saturating_add(1);
        if self.polls < self.polls_per_track {
            return None;
        }
        self.polls = 0;
        Some((EventKind::PlayFinished.code(), track.get()))
    }
}

impl<U: UartPeripheral> Mp3Module<U> for SimulatedModule {
    type Error = SimError;

    async fn begin(&mut self, uart: &mut U, options: BeginOptions) -> Result<(), Self::Error> {
        uart.read_ready().map_err(|_| SimError::LinkDown)?;
        if options.reset {
            self.playing = None;
            self.pending.clear();
        }
        if !self.card_present {
            return Err(SimError::NoCard);
        }
        self.notify(EventKind::CardOnline, 0)
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    async fn volume(&mut self, uart: &mut U, volume: Volume) -> Result<(), Self::Error> {
        uart.read_ready().map_err(|_| SimError::LinkDown)?;
        self.volume = volume;
        Ok(())
    }

    async fn loop_track(&mut self, uart: &mut U, track: TrackIndex) -> Result<(), Self::Error> {
        uart.read_ready().map_err(|_| SimError::LinkDown)?;
        if !self.card_present || track.get() > self.track_count {
            self.playing = None;
            return self.notify(EventKind::Error, FILE_INDEX_OUT);
        }
        self.playing = Some(track);
        self.polls = 0;
        debug!("sim: looping track {}", track.get());
        Ok(())
    }

    async fn available(&mut self, uart: &mut U) -> Result<bool, Self::Error> {
        uart.read_ready().map_err(|_| SimError::LinkDown)?;
        let next = match self.pending.pop_front() {
            Some(event) => Some(event),
            None => self.tick(),
        };
        match next {
            Some(event) => {
                self.latched = event;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn read_type(&self) -> u8 {
        self.latched.0
    }

    fn read(&self) -> u16 {
        self.latched.1
    }
}
