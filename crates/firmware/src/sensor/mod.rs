//! Climate sampling: one sensor, one bus owner, one reading per cycle.
//!
//! The HTU21D driver lives in [`htu21d`]; the sampling task initializes the
//! sensor once and then reads temperature and humidity at a fixed interval.
//! A failed read is that cycle's loss only — the next cycle starts fresh,
//! because the surrounding firmware has no recovery action beyond
//! reporting.

pub mod htu21d;

pub use htu21d::{Htu21d, Htu21dError};

#[cfg(feature = "hardware")]
pub mod task;

use platform::sensor::{ClimateSensor, SensorReading};

/// One measurement cycle: temperature then humidity, as a fresh
/// [`SensorReading`]. Nothing is retained between cycles.
pub async fn sample_cycle<S: ClimateSensor>(sensor: &mut S) -> Result<SensorReading, S::Error> {
    let temperature_c = sensor.read_temperature().await?;
    let humidity_pct = sensor.read_humidity().await?;
    Ok(SensorReading {
        temperature_c,
        humidity_pct,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use platform::mocks::{MockSensor, MockSensorError};

    #[tokio::test]
    async fn cycle_produces_fresh_reading() {
        let mut sensor = MockSensor::new(21.5, 40.0);
        let reading = sample_cycle(&mut sensor).await.unwrap();
        assert_eq!(reading.temperature_c, 21.5);
        assert_eq!(reading.humidity_pct, 40.0);
    }

    /// A transient fault on one cycle must not prevent a successful read on
    /// the next cycle.
    #[tokio::test]
    async fn transient_fault_does_not_poison_next_cycle() {
        let mut sensor = MockSensor::new(21.5, 40.0);
        sensor.fail_reads = 1;
        assert_eq!(
            sample_cycle(&mut sensor).await,
            Err(MockSensorError::Read)
        );
        let reading = sample_cycle(&mut sensor).await.unwrap();
        assert_eq!(reading.temperature_c, 21.5);
    }

    /// Init failure is non-fatal: the task reports it once and keeps
    /// attempting reads.
    #[tokio::test]
    async fn init_failure_does_not_block_reads() {
        let mut sensor = MockSensor::new(18.0, 55.0);
        sensor.fail_init = true;
        assert!(sensor.init().await.is_err());
        assert_eq!(sensor.init_count, 1);
        let reading = sample_cycle(&mut sensor).await.unwrap();
        assert_eq!(reading.humidity_pct, 55.0);
    }
}
