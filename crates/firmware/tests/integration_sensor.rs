//! Sensor sampling integration tests
//!
//! Exercises the HTU21D driver through the mock I²C bus across multiple
//! cycles, including bus faults and CRC corruption, plus the task-level
//! fault-tolerance contract against the platform mock sensor.
//!
//! Run with: cargo test -p firmware --test integration_sensor

// Test assertions may panic by design.
#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::arithmetic_side_effects)]

use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
use firmware::sensor::htu21d::registers::{
    CMD_SOFT_RESET, CMD_TRIGGER_HUM_HOLD, CMD_TRIGGER_TEMP_HOLD, I2C_ADDR,
};
use firmware::sensor::{sample_cycle, Htu21d, Htu21dError};
use platform::mocks::{MockSensor, MockSensorError};
use platform::sensor::ClimateSensor as _;

/// Datasheet example measurements: 0x683A → ~24.7 °C, 0x4E85 → ~32.3 %RH.
const TEMP_RAW: [u8; 3] = [0x68, 0x3A, 0x7C];
const HUM_RAW: [u8; 3] = [0x4E, 0x85, 0x6B];

fn temp_read() -> Transaction {
    Transaction::write_read(I2C_ADDR, vec![CMD_TRIGGER_TEMP_HOLD], TEMP_RAW.to_vec())
}

fn hum_read() -> Transaction {
    Transaction::write_read(I2C_ADDR, vec![CMD_TRIGGER_HUM_HOLD], HUM_RAW.to_vec())
}

/// Init, then two full cycles: the wire protocol is reset → (temp, hum) ×2
/// and each cycle produces a fresh reading.
#[tokio::test]
async fn two_clean_cycles_over_the_wire() {
    let expectations = [
        Transaction::write(I2C_ADDR, vec![CMD_SOFT_RESET]),
        temp_read(),
        hum_read(),
        temp_read(),
        hum_read(),
    ];
    let i2c = I2cMock::new(&expectations);
    let mut i2c_handle = i2c.clone();

    let mut sensor = Htu21d::new(i2c);
    sensor.init().await.expect("soft reset");

    for _ in 0..2 {
        let reading = sample_cycle(&mut sensor).await.expect("clean cycle");
        assert!((reading.temperature_c - 24.69).abs() < 0.01);
        assert!((reading.humidity_pct - 32.33).abs() < 0.01);
    }

    i2c_handle.done();
}

/// A CRC-corrupted measurement fails that cycle only; the next cycle reads
/// clean data from the same bus.
#[tokio::test]
async fn corrupted_cycle_then_clean_cycle() {
    let expectations = [
        Transaction::write_read(
            I2C_ADDR,
            vec![CMD_TRIGGER_TEMP_HOLD],
            vec![0x68, 0x3A, 0xFF], // bad CRC
        ),
        temp_read(),
        hum_read(),
    ];
    let i2c = I2cMock::new(&expectations);
    let mut i2c_handle = i2c.clone();

    let mut sensor = Htu21d::new(i2c);
    assert_eq!(
        sample_cycle(&mut sensor).await,
        Err(Htu21dError::CrcMismatch)
    );
    let reading = sample_cycle(&mut sensor).await.expect("recovered");
    assert!((reading.temperature_c - 24.69).abs() < 0.01);

    i2c_handle.done();
}

/// A NACKed bus transaction surfaces as a transient bus fault, not a
/// panic or a poisoned driver.
#[tokio::test]
async fn bus_fault_is_transient() {
    let expectations = [
        Transaction::write_read(
            I2C_ADDR,
            vec![CMD_TRIGGER_TEMP_HOLD],
            vec![0x00, 0x00, 0x00],
        )
        .with_error(embedded_hal::i2c::ErrorKind::Other),
        temp_read(),
        hum_read(),
    ];
    let i2c = I2cMock::new(&expectations);
    let mut i2c_handle = i2c.clone();

    let mut sensor = Htu21d::new(i2c);
    assert_eq!(sample_cycle(&mut sensor).await, Err(Htu21dError::Bus));
    let reading = sample_cycle(&mut sensor).await.expect("recovered");
    assert!((reading.humidity_pct - 32.33).abs() < 0.01);

    i2c_handle.done();
}

/// Task-level contract: a failed init is reported once and does not stop
/// the sampling loop from producing readings later.
#[tokio::test]
async fn failed_init_does_not_end_sampling() {
    let mut sensor = MockSensor::new(20.0, 45.0);
    sensor.fail_init = true;

    assert_eq!(sensor.init().await, Err(MockSensorError::Init));
    assert_eq!(sensor.init_count, 1, "init attempted exactly once");

    for _ in 0..3 {
        let reading = sample_cycle(&mut sensor).await.expect("reads continue");
        assert_eq!(reading.temperature_c, 20.0);
    }
}

/// Task-level contract: each cycle is independent; a run of transient
/// faults ends the moment the hardware recovers.
#[tokio::test]
async fn sampling_recovers_after_transient_faults() {
    let mut sensor = MockSensor::new(22.0, 38.0);
    sensor.fail_reads = 3;

    let mut failures = 0;
    for _ in 0..5 {
        if sample_cycle(&mut sensor).await.is_err() {
            failures += 1;
        }
    }
    assert!(failures >= 2, "the injected faults were observed");
    let reading = sample_cycle(&mut sensor).await.expect("recovered");
    assert_eq!(reading.humidity_pct, 38.0);
}
