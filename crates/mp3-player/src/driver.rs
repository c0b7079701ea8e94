//! Playback driver.
//!
//! `Mp3Player` owns the serial channel, the module driver, the console and
//! the [`PlayerState`]. The host calls [`setup`](Mp3Player::setup) once,
//! then [`poll`](Mp3Player::poll) every loop iteration and
//! [`request_track`](Mp3Player::request_track) whenever it wants a different
//! track looping. Every call after setup is refused until setup succeeded.

use platform::UartPeripheral;

use crate::config::PlayerConfig;
use crate::console::Console;
use crate::error::PlayerError;
use crate::event::StatusEvent;
use crate::module::Mp3Module;
use crate::state::PlayerState;
use crate::status::{self, StatusLine};
use crate::types::TrackIndex;

/// Console line emitted when the handshake fails.
pub const RECHECK_CONNECTION: &str = "1.Please recheck the connection!";

/// Console line emitted when the handshake fails.
pub const INSERT_SD_CARD: &str = "2.Please insert the SD card!";

/// Error type of an `Mp3Player<U, M, _>`.
pub type DriverError<U, M> =
    PlayerError<<M as Mp3Module<U>>::Error, <U as UartPeripheral>::Error>;

/// DFPlayer playback driver.
pub struct Mp3Player<U, M, C> {
    uart: U,
    module: M,
    console: C,
    config: PlayerConfig,
    state: PlayerState,
}

impl<U, M, C> Mp3Player<U, M, C>
where
    U: UartPeripheral,
    M: Mp3Module<U>,
    C: Console,
{
    /// Create an uninitialised player. Nothing is sent until `setup`.
    pub fn new(uart: U, module: M, console: C, config: PlayerConfig) -> Self {
        Self {
            uart,
            module,
            console,
            config,
            state: PlayerState::new(),
        }
    }

    /// Open the serial channel, handshake with the module, then apply the
    /// timeout and volume and start looping the initial track.
    ///
    /// On a failed handshake the two recovery hints are written to the
    /// console and no further command is sent.
    pub async fn setup(&mut self) -> Result<(), DriverError<U, M>> {
        self.state.mark_failed();

        info!("Initializing DFPlayer ... (May take 3~5 seconds)");
        self.uart
            .configure(self.config.uart)
            .map_err(PlayerError::Transport)?;

        if let Err(e) = self.module.begin(&mut self.uart, self.config.begin).await {
            warn!("Unable to begin:");
            self.console.write_line(RECHECK_CONNECTION);
            self.console.write_line(INSERT_SD_CARD);
            return Err(PlayerError::HandshakeFailed(e));
        }

        self.module.set_timeout(self.config.timeout);
        self.module
            .volume(&mut self.uart, self.config.volume)
            .await
            .map_err(PlayerError::Module)?;
        self.module
            .loop_track(&mut self.uart, self.config.initial_track)
            .await
            .map_err(PlayerError::Module)?;

        self.state.mark_ready(self.config.initial_track);
        info!(
            "DFPlayer online: volume {} looping track {}",
            self.config.volume.get(),
            self.config.initial_track.get()
        );
        Ok(())
    }

    /// Check for one status notification and print it.
    ///
    /// Returns `Ok(None)` straight away when the module has nothing pending.
    /// The event is returned even when it prints nothing, so the host can
    /// react to it (e.g. advance on a finished track).
    pub async fn poll(&mut self) -> Result<Option<StatusEvent>, DriverError<U, M>> {
        self.ensure_initialized()?;

        let pending = self
            .module
            .available(&mut self.uart)
            .await
            .map_err(PlayerError::Module)?;
        if !pending {
            return Ok(None);
        }

        let event = StatusEvent::from_raw(self.module.read_type(), self.module.read());
        match status::decode(event) {
            Some(line) => self.print(line),
            None => debug!("status type {} ignored", event.kind.code()),
        }
        Ok(Some(event))
    }

    /// Loop zero-based track `track` (module track `track + 1`).
    ///
    /// Returns `Ok(true)` when a loop command was sent and `Ok(false)` when
    /// that track is already looping.
    pub async fn request_track(&mut self, track: u16) -> Result<bool, DriverError<U, M>> {
        self.ensure_initialized()?;

        let candidate =
            TrackIndex::from_zero_based(track).map_err(|_| PlayerError::TrackOutOfRange(track))?;
        if candidate == self.state.current_track() {
            return Ok(false);
        }

        self.module
            .loop_track(&mut self.uart, candidate)
            .await
            .map_err(PlayerError::Module)?;
        self.state.set_current_track(candidate);
        debug!("looping track {}", candidate.get());
        Ok(true)
    }

    /// Snapshot of the player state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Returns `true` after a successful setup.
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Track currently looping.
    pub fn current_track(&self) -> TrackIndex {
        self.state.current_track()
    }

    /// Configuration applied by `setup`.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Serial channel.
    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// Module driver.
    pub fn module(&self) -> &M {
        &self.module
    }

    /// Module driver, mutably (fault injection in tests, vendor extras).
    pub fn module_mut(&mut self) -> &mut M {
        &mut self.module
    }

    /// Console sink.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Tear down and return the owned parts.
    pub fn release(self) -> (U, M, C) {
        (self.uart, self.module, self.console)
    }

    fn ensure_initialized(&self) -> Result<(), DriverError<U, M>> {
        if self.state.is_initialized() {
            Ok(())
        } else {
            Err(PlayerError::NotInitialized)
        }
    }

    fn print(&mut self, line: StatusLine) {
        match line.render() {
            Ok(text) => self.console.write_line(&text),
            Err(_) => warn!("status line exceeds console buffer"),
        }
    }
}
