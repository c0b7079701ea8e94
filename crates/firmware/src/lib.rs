//! DFPlayer Loop Firmware
//!
//! Application layer on top of the `mp3-player` driver: board wiring, the
//! host loop that keeps a playlist going, and a simulated module so the whole
//! stack runs on a desktop.
//!
//! # Architecture
//!
//! ```text
//! Application Layer (main.rs, app)
//!         ↓
//! Player Driver (mp3-player)
//!         ↓
//! Serial Transport (platform: hardware or emulated UART)
//! ```
//!
//! # Features
//!
//! - `emulator` - Build the desktop emulator (tokio, tracing)
//! - `defmt` - defmt logging for hardware builds
//! - `tracing` - tracing logging (enabled by `emulator`)
//! - `std` - Enable standard library (for emulator and testing)
//!
//! # Emulator
//!
//! ```bash
//! RUST_LOG=debug cargo run -p firmware --features emulator
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)]
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(async_fn_in_trait)]

// Must come first so the logging macros are visible to every other module.
#[macro_use]
mod fmt;

pub mod app;
pub mod board;
pub mod sim;

pub use app::{service, Playlist};
pub use board::{BoardConfig, DfPlayer, APP_NAME, APP_VERSION};
pub use sim::{SimError, SimulatedModule};
