//! Climate sensor abstraction
//!
//! Temperature + relative-humidity sensor on a shared two-wire bus. The bus
//! is exclusively owned by the sampling task; no other component touches it.

use crate::gpio::{PinId, Pull};

/// Bus wiring for the sensor, applied once at init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorBusConfig {
    /// Data line.
    pub sda: PinId,
    /// Clock line.
    pub scl: PinId,
    /// Pull resistor applied to both lines. Boards without external pull-ups
    /// need [`Pull::Up`] here.
    pub pull: Pull,
}

/// One measurement cycle's result. Produced fresh each cycle; nothing is
/// retained between cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// Temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Relative humidity in percent, 0.0 to 100.0.
    pub humidity_pct: f32,
}

/// Temperature + humidity sensor driver.
pub trait ClimateSensor {
    /// Error type
    type Error: core::fmt::Debug;

    /// One-time sensor initialization (reset, bus probe).
    ///
    /// A failure here is reported once by the caller; the sensor may still
    /// be retried on subsequent reads (the device may simply have been
    /// powering up).
    async fn init(&mut self) -> Result<(), Self::Error>;

    /// Measure temperature in degrees Celsius.
    async fn read_temperature(&mut self) -> Result<f32, Self::Error>;

    /// Measure relative humidity in percent.
    async fn read_humidity(&mut self) -> Result<f32, Self::Error>;
}
