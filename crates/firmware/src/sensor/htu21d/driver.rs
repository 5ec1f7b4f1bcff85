//! HTU21D driver implementation.
//!
//! Communicates with the sensor via I²C using the
//! `embedded_hal_async::i2c::I2c` trait, so it is HAL-agnostic while
//! remaining async. Each measurement returns 3 bytes: the 14-bit (masked)
//! result MSB-first, then a CRC-8 over the two data bytes.

use embedded_hal_async::i2c::I2c;
use thiserror_no_std::Error;

use platform::sensor::ClimateSensor;

use super::registers::*;

/// HTU21D driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Htu21dError {
    /// I²C transaction failed (NACK, arbitration loss, bus fault).
    #[error("sensor bus transaction failed")]
    Bus,
    /// Measurement arrived with a bad checksum.
    #[error("sensor data failed CRC check")]
    CrcMismatch,
}

/// CRC-8 over `data`, polynomial [`CRC8_POLY`], init 0x00, MSB first.
// Shift-and-xor over u8; wrapping shifts cannot overflow.
#[allow(clippy::arithmetic_side_effects)]
pub(crate) fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Temperature in °C from a raw measurement (datasheet formula,
/// status bits masked): `-46.85 + 175.72 × S / 2¹⁶`.
pub(crate) fn convert_temperature(raw: u16) -> f32 {
    let s = f32::from(raw & STATUS_MASK);
    -46.85 + 175.72 * s / 65536.0
}

/// Relative humidity in % from a raw measurement:
/// `-6 + 125 × S / 2¹⁶`, clamped to the physical 0–100 range.
pub(crate) fn convert_humidity(raw: u16) -> f32 {
    let s = f32::from(raw & STATUS_MASK);
    (-6.0 + 125.0 * s / 65536.0).clamp(0.0, 100.0)
}

/// HTU21D on an I²C bus.
pub struct Htu21d<I> {
    i2c: I,
}

impl<I: I2c> Htu21d<I> {
    /// Driver over a configured I²C peripheral wired to the sensor.
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Run one hold-master measurement command and return the raw 16-bit
    /// result after CRC validation.
    async fn measure(&mut self, command: u8) -> Result<u16, Htu21dError> {
        let mut buf = [0u8; 3];
        self.i2c
            .write_read(I2C_ADDR, &[command], &mut buf)
            .await
            .map_err(|_| Htu21dError::Bus)?;
        let [msb, lsb, crc] = buf;
        if crc8(&[msb, lsb]) != crc {
            return Err(Htu21dError::CrcMismatch);
        }
        Ok(u16::from_be_bytes([msb, lsb]))
    }
}

impl<I: I2c> ClimateSensor for Htu21d<I> {
    type Error = Htu21dError;

    async fn init(&mut self) -> Result<(), Self::Error> {
        // Soft reset; the caller waits SOFT_RESET_SETTLE_MS before the
        // first measurement.
        self.i2c
            .write(I2C_ADDR, &[CMD_SOFT_RESET])
            .await
            .map_err(|_| Htu21dError::Bus)
    }

    async fn read_temperature(&mut self) -> Result<f32, Self::Error> {
        let raw = self.measure(CMD_TRIGGER_TEMP_HOLD).await?;
        Ok(convert_temperature(raw))
    }

    async fn read_humidity(&mut self) -> Result<f32, Self::Error> {
        let raw = self.measure(CMD_TRIGGER_HUM_HOLD).await?;
        Ok(convert_humidity(raw))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
    use platform::sensor::ClimateSensor as _;

    /// Datasheet CRC example: 0x683A checksums to 0x7C.
    #[test]
    fn crc8_matches_datasheet_vector() {
        assert_eq!(crc8(&[0x68, 0x3A]), 0x7C);
        assert_eq!(crc8(&[]), 0x00);
    }

    /// Datasheet conversion example: raw temperature 0x683A ≈ 24.7 °C.
    #[test]
    fn temperature_conversion_matches_datasheet() {
        let t = convert_temperature(0x683A);
        assert!((t - 24.69).abs() < 0.01, "got {t}");
    }

    /// Datasheet conversion example: raw humidity 0x4E85 ≈ 32.3 %RH.
    #[test]
    fn humidity_conversion_matches_datasheet() {
        let h = convert_humidity(0x4E85);
        assert!((h - 32.33).abs() < 0.01, "got {h}");
    }

    /// The two status bits must not leak into the converted value.
    #[test]
    fn status_bits_are_masked() {
        assert_eq!(
            convert_temperature(0x683A).to_bits(),
            convert_temperature(0x683A | 0x0003).to_bits()
        );
    }

    /// Raw values below the formula's zero intercept clamp to 0 %RH.
    #[test]
    fn humidity_clamps_to_physical_range() {
        assert_eq!(convert_humidity(0x0000), 0.0);
        assert_eq!(convert_humidity(0xFFFC), 100.0);
    }

    #[tokio::test]
    async fn read_temperature_round_trip() {
        let expectations = [Transaction::write_read(
            I2C_ADDR,
            vec![CMD_TRIGGER_TEMP_HOLD],
            vec![0x68, 0x3A, 0x7C],
        )];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_handle = i2c.clone();

        let mut sensor = Htu21d::new(i2c);
        let t = sensor.read_temperature().await.unwrap();
        assert!((t - 24.69).abs() < 0.01);

        i2c_handle.done();
    }

    #[tokio::test]
    async fn corrupted_measurement_is_rejected() {
        let expectations = [Transaction::write_read(
            I2C_ADDR,
            vec![CMD_TRIGGER_HUM_HOLD],
            vec![0x4E, 0x85, 0x00], // bad CRC
        )];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_handle = i2c.clone();

        let mut sensor = Htu21d::new(i2c);
        assert_eq!(
            sensor.read_humidity().await,
            Err(Htu21dError::CrcMismatch)
        );

        i2c_handle.done();
    }

    #[tokio::test]
    async fn init_sends_soft_reset() {
        let expectations = [Transaction::write(I2C_ADDR, vec![CMD_SOFT_RESET])];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_handle = i2c.clone();

        let mut sensor = Htu21d::new(i2c);
        sensor.init().await.unwrap();

        i2c_handle.done();
    }
}
