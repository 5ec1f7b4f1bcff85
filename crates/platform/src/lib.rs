//! Hardware Abstraction Layer (HAL) for the Benchwatch node
//!
//! This crate provides trait-based abstractions for every hardware
//! collaborator of the firmware, enabling development and testing without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: wave, chase, sensor, scheduler glue)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (Embassy HAL + PAC)
//! ```
//!
//! # Abstractions
//!
//! - [`MonotonicClock`] - Free-running microsecond counter (read-only)
//! - [`OutputPort`] - Logic-level output on a configured pin
//! - [`AlarmTimer`] - Hardware timer with periodic alarm callback
//! - [`LedStrip`] - Addressable LED strip (set / refresh / clear)
//! - [`ClimateSensor`] - Temperature + humidity readings over a shared bus
//!
//! Each trait has a call-recording mock in [`mocks`] for host-side tests.
//!
//! # Features
//!
//! - `std`: Enable standard library support (for testing)
//! - `hardware`: Physical hardware implementations
//! - `defmt`: Enable defmt logging derives

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // register names and part numbers in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod alarm;
pub mod clock;
pub mod gpio;
pub mod mocks;
pub mod sensor;
pub mod strip;

// Re-export main traits
pub use alarm::{AlarmConfig, AlarmError, AlarmTimer, CountDirection, TimerConfig};
pub use clock::MonotonicClock;
pub use gpio::{OutputPort, PinId, PinState, Pull};
pub use sensor::{ClimateSensor, SensorBusConfig, SensorReading};
pub use strip::{LedStrip, Rgb, StripConfig, StripError};
