//! Mock module and console for host-side testing
//!
//! [`MockModule`] implements [`Mp3Module`] without any hardware dependency and
//! records every call for assertion in tests. [`RecordingConsole`] keeps the
//! lines written to it.

use embassy_time::Duration;
use platform::UartPeripheral;

use crate::console::Console;
use crate::module::{BeginOptions, Mp3Module};
use crate::status::LineBuffer;
use crate::types::{TrackIndex, Volume};

/// Calls a [`MockModule`] can record.
pub const MOCK_CALL_CAPACITY: usize = 64;

/// Notifications a [`MockModule`] can hold.
pub const MOCK_EVENT_CAPACITY: usize = 16;

/// One recorded module call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    /// `begin`
    Begin(BeginOptions),
    /// `set_timeout`
    SetTimeout(Duration),
    /// `volume`
    Volume(Volume),
    /// `loop_track`
    LoopTrack(TrackIndex),
}

/// Errors produced by [`MockModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockModuleError {
    /// Handshake configured to fail.
    NoResponse,
    /// Commands configured to fail.
    CommandRejected,
    /// Call log is full.
    CallLogFull,
}

impl core::fmt::Display for MockModuleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoResponse => f.write_str("mock module did not answer"),
            Self::CommandRejected => f.write_str("mock module rejected the command"),
            Self::CallLogFull => f.write_str("mock module call log full"),
        }
    }
}

/// Mock player module. Records all calls for test assertions.
pub struct MockModule {
    calls: heapless::Vec<MockCall, MOCK_CALL_CAPACITY>,
    events: heapless::Deque<(u8, u16), MOCK_EVENT_CAPACITY>,
    latched: (u8, u16),
    answers_handshake: bool,
    rejects_commands: bool,
    available_polls: usize,
}

impl MockModule {
    /// Create a mock that completes the handshake and accepts every command.
    pub fn new() -> Self {
        Self {
            calls: heapless::Vec::new(),
            events: heapless::Deque::new(),
            latched: (0, 0),
            answers_handshake: true,
            rejects_commands: false,
            available_polls: 0,
        }
    }

    /// Create a mock whose handshake always fails (no SD card, bad wiring).
    pub fn unresponsive() -> Self {
        Self {
            answers_handshake: false,
            ..Self::new()
        }
    }

    /// Make every later volume/loop command fail (or succeed again).
    pub fn reject_commands(&mut self, reject: bool) {
        self.rejects_commands = reject;
    }

    /// Queue a raw `(type, value)` notification.
    pub fn push_event(&mut self, code: u8, value: u16) -> Result<(), (u8, u16)> {
        self.events.push_back((code, value))
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// Tracks passed to `loop_track`, in order.
    pub fn looped_tracks(&self) -> impl Iterator<Item = TrackIndex> + '_ {
        self.calls.iter().filter_map(|call| match call {
            MockCall::LoopTrack(track) => Some(*track),
            _ => None,
        })
    }

    /// Number of `loop_track` calls.
    pub fn loop_count(&self) -> usize {
        self.looped_tracks().count()
    }

    /// Number of `volume` calls.
    pub fn volume_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, MockCall::Volume(_)))
            .count()
    }

    /// Number of `available` calls.
    pub fn available_polls(&self) -> usize {
        self.available_polls
    }

    /// Notifications still queued.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn record(&mut self, call: MockCall) -> Result<(), MockModuleError> {
        self.calls
            .push(call)
            .map_err(|_| MockModuleError::CallLogFull)
    }

    fn command(&mut self, call: MockCall) -> Result<(), MockModuleError> {
        self.record(call)?;
        if self.rejects_commands {
            Err(MockModuleError::CommandRejected)
        } else {
            Ok(())
        }
    }
}

impl Default for MockModule {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: UartPeripheral> Mp3Module<U> for MockModule {
    type Error = MockModuleError;

    async fn begin(&mut self, _uart: &mut U, options: BeginOptions) -> Result<(), Self::Error> {
        self.record(MockCall::Begin(options))?;
        if self.answers_handshake {
            Ok(())
        } else {
            Err(MockModuleError::NoResponse)
        }
    }

    fn set_timeout(&mut self, timeout: Duration) {
        // Log overflow is reported by the next command.
        let _ = self.record(MockCall::SetTimeout(timeout));
    }

    async fn volume(&mut self, _uart: &mut U, volume: Volume) -> Result<(), Self::Error> {
        self.command(MockCall::Volume(volume))
    }

    async fn loop_track(&mut self, _uart: &mut U, track: TrackIndex) -> Result<(), Self::Error> {
        self.command(MockCall::LoopTrack(track))
    }

    async fn available(&mut self, _uart: &mut U) -> Result<bool, Self::Error> {
        self.available_polls = self.available_polls.saturating_add(1);
        match self.events.pop_front() {
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

/// Lines a [`RecordingConsole`] keeps before dropping new ones.
pub const RECORDING_CAPACITY: usize = 32;

/// Console that stores lines for assertions.
#[derive(Default)]
pub struct RecordingConsole {
    lines: heapless::Vec<LineBuffer, RECORDING_CAPACITY>,
    dropped: usize,
}

impl RecordingConsole {
    /// Create an empty console.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(LineBuffer::as_str)
    }

    /// Most recent line.
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(LineBuffer::as_str)
    }

    /// Number of recorded lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines that did not fit (buffer full or longer than a line buffer).
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Forget everything recorded.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.dropped = 0;
    }
}

impl Console for RecordingConsole {
    fn write_line(&mut self, line: &str) {
        let stored = LineBuffer::try_from(line)
            .ok()
            .and_then(|buf| self.lines.push(buf).ok());
        if stored.is_none() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }
}
