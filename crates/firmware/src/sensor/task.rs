//! Embassy task for the climate sampling loop.

use embassy_executor::Spawner;
use embassy_time::Timer;

use platform::sensor::ClimateSensor as _;

use super::htu21d::registers::SOFT_RESET_SETTLE_MS;
use super::{sample_cycle, Htu21d};

/// Concrete sensor wiring on the bench: HTU21D on I2C1 (PB6 SCL / PB7 SDA,
/// internal pull-ups per `boot::SENSOR_BUS`).
pub type BenchSensor = Htu21d<
    embassy_stm32::i2c::I2c<
        'static,
        embassy_stm32::peripherals::I2C1,
        embassy_stm32::peripherals::DMA1_CH2,
        embassy_stm32::peripherals::DMA1_CH3,
    >,
>;

/// Spawn the sampling task. The sensor bus is owned by the task for the
/// lifetime of the firmware.
pub fn spawn_sensor_task(spawner: &Spawner, sensor: BenchSensor, interval_ms: u64) {
    spawner.must_spawn(sensor_task(sensor, interval_ms));
}

/// Climate sampling task: init once, then one reading per interval.
#[embassy_executor::task]
async fn sensor_task(mut sensor: BenchSensor, interval_ms: u64) {
    // Init failure is reported once and is non-fatal: the sensor may just
    // be powering up, and reads carry their own error status per cycle.
    match sensor.init().await {
        Ok(()) => defmt::info!("sensor: HTU21D reset, settling"),
        Err(e) => defmt::warn!("sensor: init failed ({}), will keep sampling", e),
    }
    Timer::after_millis(SOFT_RESET_SETTLE_MS).await;

    loop {
        match sample_cycle(&mut sensor).await {
            Ok(reading) => defmt::info!(
                "sensor: {=f32} C  {=f32} %RH",
                reading.temperature_c,
                reading.humidity_pct
            ),
            Err(e) => defmt::warn!("sensor: read fault this cycle: {}", e),
        }
        Timer::after_millis(interval_ms).await;
    }
}
