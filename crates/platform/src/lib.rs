//! Hardware Abstraction Layer for the DFPlayer serial link
//!
//! This crate provides trait-based abstractions for the byte channel that
//! carries the player module's command protocol, enabling development and
//! testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate)
//!         ↓
//! Player Driver (mp3-player crate)
//!         ↓
//! Platform HAL (this crate - UART capability + implementations)
//!         ↓
//! Hardware Layer (Embassy HAL / embedded-hal pins)
//! ```
//!
//! # Transports
//!
//! - [`HardwareUart`] - wraps a HAL UART implementing `embedded-io-async`
//! - [`SoftUart`] - bit-banged 8N1 UART on two GPIO pins
//! - [`SerialTransport`] - one of the two, chosen once from a [`TransportKind`]
//!
//! # Features
//!
//! - `std`: Enable standard library support (for testing)
//! - `defmt`: Enable defmt::Format derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod gpio;
pub mod mocks;
pub mod peripheral;
pub mod serial;

pub use gpio::{PinAssignment, PinId, PinState};
pub use peripheral::{DataBits, Parity, StopBits, UartConfig, UartError, UartPeripheral};
pub use serial::{HardwareUart, SerialTransport, SoftUart, TransportKind};
