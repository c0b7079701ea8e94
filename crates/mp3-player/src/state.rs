//! Player state: initialisation flag and the track currently looping.

use crate::types::TrackIndex;

/// State owned by one `Mp3Player`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayerState {
    initialized: bool,
    current_track: TrackIndex,
}

impl PlayerState {
    /// Not initialised, track 1.
    pub const fn new() -> Self {
        Self {
            initialized: false,
            current_track: TrackIndex::FIRST,
        }
    }

    /// Returns `true` after a successful setup.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Track the module was last told to loop.
    pub fn current_track(&self) -> TrackIndex {
        self.current_track
    }

    pub(crate) fn mark_ready(&mut self, track: TrackIndex) {
        self.initialized = true;
        self.current_track = track;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.initialized = false;
    }

    pub(crate) fn set_current_track(&mut self, track: TrackIndex) {
        self.current_track = track;
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_uninitialised_on_track_one() {
        let state = PlayerState::new();
        assert!(!state.is_initialized());
        assert_eq!(state.current_track(), TrackIndex::FIRST);
    }

    #[test]
    fn test_failed_setup_keeps_track() {
        let mut state = PlayerState::new();
        let three = TrackIndex::new(3).unwrap();
        state.mark_ready(three);
        state.mark_failed();
        assert!(!state.is_initialized());
        assert_eq!(state.current_track(), three);
    }
}
