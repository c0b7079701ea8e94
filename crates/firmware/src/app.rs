//! Host loop
//!
//! One iteration polls the player once and, when a track finished, asks for
//! the next one. Wraps to the first track after the last.

use mp3_player::{Console, DriverError, Mp3Module, Mp3Player, StatusEvent};
use platform::UartPeripheral;

/// Playlist policy: every file on the card in order, forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Playlist {
    track_count: u16,
}

impl Playlist {
    /// Playlist over files `1..=track_count`. An empty card is treated as one file.
    pub fn new(track_count: u16) -> Self {
        Self {
            track_count: track_count.max(1),
        }
    }

    /// Files in the playlist.
    pub fn track_count(&self) -> u16 {
        self.track_count
    }

    /// Zero-based track to request after 1-based `finished`.
    ///
    /// The zero-based index of the following file is `finished` itself; past
    /// the last file this wraps to 0.
    pub fn next_after(&self, finished: u16) -> u16 {
        finished.checked_rem(self.track_count).unwrap_or(0)
    }
}

/// Run one host loop iteration.
///
/// Returns the event seen this iteration, if any.
pub async fn service<U, M, C>(
    player: &mut Mp3Player<U, M, C>,
    playlist: Playlist,
) -> Result<Option<StatusEvent>, DriverError<U, M>>
where
    U: UartPeripheral,
    M: Mp3Module<U>,
    C: Console,
{
    let event = player.poll().await?;
    if let Some(finished) = event.and_then(|e| e.finished_track()) {
        let next = playlist.next_after(finished);
        if player.request_track(next).await? {
            info!("track {} finished, next {}", finished, next);
        }
    }
    Ok(event)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mp3_player::{EventKind, MockModule, PlayerConfig, RecordingConsole};
    use platform::mocks::MockUart;

    #[tokio::test]
    async fn test_service_advances_on_finished_track() {
        let mut player = Mp3Player::new(
            MockUart::new(),
            MockModule::new(),
            RecordingConsole::new(),
            PlayerConfig::default(),
        );
        player.setup().await.unwrap();
        player
            .module_mut()
            .push_event(EventKind::PlayFinished.code(), 1)
            .unwrap();

        let event = service(&mut player, Playlist::new(3)).await.unwrap();

        assert_eq!(event.and_then(|e| e.finished_track()), Some(1));
        assert_eq!(player.current_track().get(), 2);
        assert_eq!(player.module().loop_count(), 2);
    }

    #[test]
    fn test_next_after_advances() {
        let playlist = Playlist::new(3);
        assert_eq!(playlist.next_after(1), 1);
        assert_eq!(playlist.next_after(2), 2);
    }

    #[test]
    fn test_next_after_wraps() {
        let playlist = Playlist::new(3);
        assert_eq!(playlist.next_after(3), 0);
        assert_eq!(playlist.next_after(7), 1);
    }

    #[test]
    fn test_empty_card_is_one_track() {
        let playlist = Playlist::new(0);
        assert_eq!(playlist.track_count(), 1);
        assert_eq!(playlist.next_after(1), 0);
    }
}
