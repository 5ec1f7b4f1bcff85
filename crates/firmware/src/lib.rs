//! Benchwatch Node Firmware
//!
//! Firmware for a single-board workbench monitor: a hardware-timed square
//! wave on a test pin, a chase animation on an addressable LED strip, and a
//! periodic climate readout — three independent periodic activities sharing
//! one STM32H7 with the idle/watchdog context.
//!
//! # Architecture
//!
//! ```text
//! Application Layer (main.rs: scheduler glue, watchdog heartbeat)
//!         ↓
//! Activity Modules (wave, chase, sensor)
//!         ↓
//! Platform HAL (platform crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy, STM32 PAC)
//! ```
//!
//! Each activity owns its hardware resource outright: the waveform generator
//! owns its output pin and alarm timer, the chase task owns the LED strip,
//! the sampling task owns the sensor bus. Nothing is shared across task
//! boundaries; the only value leaving an interrupt context does so through
//! an atomic handoff (`wave::isr::toggle_count`).
//!
//! # Features
//!
//! - `hardware` - Build for the STM32H7 target (Embassy, defmt, IWDG)
//!
//! # Examples
//!
//! ## Hardware Target
//!
//! ```bash
//! cargo build --release --target thumbv7em-none-eabihf --features hardware
//! ```
//!
//! ## Host tests
//!
//! ```bash
//! cargo test -p firmware
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
// Upgrade relevant warns to deny; keep pedantic as warn (too noisy for firmware)
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
#![warn(clippy::dbg_macro)]
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // most errors are self-explanatory
// Pedantic lints too noisy for firmware application code:
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]

pub mod boot;
pub mod chase;
pub mod sensor;
pub mod strip;
pub mod wave;

#[cfg(feature = "hardware")]
mod exception_handlers;

// Re-export key types
pub use chase::{ChaseConfig, ChaseError, ChaseState, Direction};
pub use sensor::Htu21d;
pub use strip::Ws2812Spi;
pub use wave::{WaveError, WaveformConfig, WaveformMethod, WaveformState};
