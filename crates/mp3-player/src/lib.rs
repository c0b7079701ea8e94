//! DFPlayer Mini playback driver
//!
//! Brings up a DFPlayer-style serial MP3 module, keeps one track looping and
//! turns the module's status notifications into console lines.
//!
//! ```text
//! Host loop ──poll()──────────► Mp3Player ──available/read──► Mp3Module
//!           ──request_track()─►           ──loop_track──────►    │
//!                                   │                            │
//!                                Console                  UartPeripheral
//! ```
//!
//! The module's framed protocol is behind the [`Mp3Module`] trait, the
//! serial channel behind [`platform::UartPeripheral`]. [`DfPlayerModule`]
//! speaks the protocol to real hardware; [`MockModule`] and
//! [`RecordingConsole`] let everything run on the host.
//!
//! # Features
//!
//! - `std`: Enable standard library support (`std::error::Error` impls)
//! - `defmt`: defmt logging and `defmt::Format` derives
//! - `tracing`: tracing logging for desktop builds

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)]

// Must come first so the logging macros are visible to every other module.
#[macro_use]
mod fmt;

pub mod config;
pub mod console;
pub mod dfplayer;
pub mod driver;
pub mod error;
pub mod event;
pub mod mock;
pub mod module;
pub mod state;
pub mod status;
pub mod types;

pub use config::PlayerConfig;
pub use console::{Console, LogConsole};
pub use dfplayer::{DfPlayerError, DfPlayerModule};
pub use driver::{DriverError, Mp3Player};
pub use error::PlayerError;
pub use event::{ErrorCode, EventKind, StatusEvent};
pub use mock::{MockCall, MockModule, MockModuleError, RecordingConsole};
pub use module::{BeginOptions, Mp3Module};
pub use state::PlayerState;
pub use status::{decode, StatusLine};
pub use types::{OutOfRangeError, TrackIndex, Volume};
