//! Property-based tests for track selection and status decoding.
//! Verifies the looping rules hold for all track sequences, not just fixed examples.
// Test file: unwrap/expect/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use embassy_futures::block_on;
use mp3_player::{
    decode, MockModule, Mp3Player, PlayerConfig, RecordingConsole, StatusEvent, TrackIndex,
};
use platform::mocks::MockUart;

type Player = Mp3Player<MockUart, MockModule, RecordingConsole>;

fn ready_player() -> Player {
    let mut player = Mp3Player::new(
        MockUart::new(),
        MockModule::new(),
        RecordingConsole::new(),
        PlayerConfig::default(),
    );
    block_on(player.setup()).unwrap();
    player
}

proptest::proptest! {
    /// Requesting the same track twice sends exactly one loop command.
    #[test]
    fn repeated_request_is_idempotent(track in 1u16..u16::MAX) {
        let mut player = ready_player();
        let before = player.module().loop_count();

        assert_eq!(block_on(player.request_track(track)), Ok(true));
        assert_eq!(block_on(player.request_track(track)), Ok(false));

        assert_eq!(player.module().loop_count(), before + 1);
        assert_eq!(player.current_track().get(), track + 1);
    }

    /// Every change of track sends one loop command for the new 1-based index;
    /// every repeat sends nothing.
    #[test]
    fn loop_commands_follow_track_changes(tracks in proptest::collection::vec(0u16..8, 0..24)) {
        let mut player = ready_player();
        let mut expected = vec![TrackIndex::FIRST];
        let mut current = 0u16;

        for track in tracks {
            let changed = block_on(player.request_track(track)).unwrap();
            assert_eq!(changed, track != current, "request {} while on {}", track, current);
            if changed {
                expected.push(TrackIndex::new(track + 1).unwrap());
                current = track;
            }
        }

        let looped: Vec<TrackIndex> = player.module().looped_tracks().collect();
        assert_eq!(looped, expected);
        assert_eq!(player.current_track().get(), current + 1);
    }

    /// Decoding never fails to render, for any raw notification.
    #[test]
    fn decoded_lines_always_fit(code in 0u8..=255u8, value in 0u16..=u16::MAX) {
        if let Some(line) = decode(StatusEvent::from_raw(code, value)) {
            assert!(line.render().is_ok(), "{:?} did not fit", line);
        }
    }

    /// Only the nine printable types ever produce a line.
    #[test]
    fn silent_types_print_nothing(code in 9u8..=255u8, value in 0u16..=u16::MAX) {
        assert_eq!(decode(StatusEvent::from_raw(code, value)), None);
    }
}
