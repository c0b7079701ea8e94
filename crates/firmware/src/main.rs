//! DFPlayer Loop - Desktop Emulator
//!
//! Runs setup and the host loop against a simulated module over an in-memory
//! UART. Status lines go to the log; filter with `RUST_LOG`.
//!
//! Run with: cargo run -p firmware --features emulator

use std::time::Duration;

use firmware::{service, BoardConfig, Playlist, SimulatedModule, APP_NAME, APP_VERSION};
use mp3_player::{LogConsole, Mp3Player};
use platform::mocks::MockUart;

/// Files on the simulated card.
const TRACK_COUNT: u16 = 3;

/// Polls one simulated play lasts.
const POLLS_PER_TRACK: u32 = 20;

/// Host loop period.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Iterations before the emulator pulls the card.
const CARD_REMOVAL_AT: u32 = 150;

/// Iterations before the emulator puts the card back.
const CARD_INSERTION_AT: u32 = 175;

/// Iterations before the emulator exits.
const RUN_ITERATIONS: u32 = 200;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("{} v{} - Emulator", APP_NAME, APP_VERSION);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    rt.block_on(run())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let board = BoardConfig::default();
    tracing::info!(transport = board.transport.label(), "opening serial channel");
    let uart = board.open_transport(MockUart::new, |pins| {
        tracing::debug!(rx = pins.rx.0, tx = pins.tx.0, "software UART pins");
        MockUart::new()
    });

    let module = SimulatedModule::new(TRACK_COUNT, POLLS_PER_TRACK);
    let playlist = Playlist::new(module.track_count());
    let mut player = Mp3Player::new(uart, module, LogConsole, board.player);

    player.setup().await?;

    let mut interval = tokio::time::interval(POLL_INTERVAL);
    for iteration in 0..RUN_ITERATIONS {
        interval.tick().await;
        if iteration == CARD_REMOVAL_AT {
            player.module_mut().remove_card()?;
        } else if iteration == CARD_INSERTION_AT {
            player.module_mut().insert_card()?;
        }
        service(&mut player, playlist).await?;
    }

    tracing::info!(
        track = player.current_track().get(),
        "emulator finished"
    );
    Ok(())
}
