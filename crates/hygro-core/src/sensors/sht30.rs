//! SHT30 temperature/humidity driver over I2C.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use log::error;

use super::{Sensor, SensorError, WallClock};
use crate::measurement::Measurement;

/// Fixed I2C address of the SHT30 (ADDR pin low).
const SHT30_ADDR: u8 = 0x44;

/// Single-shot measurement, high repeatability, no clock stretching.
const CMD_MEASURE: [u8; 2] = [0x24, 0x16];

/// Worst-case conversion time for a high-repeatability measurement.
const MEASURE_DELAY_MS: u32 = 30;

/// SHT30 driver, generic over the I2C bus and delay provider so the same
/// code runs against real hardware and against mocks in tests.
pub struct Sht30<I, D, C> {
    i2c: I,
    delay: D,
    clock: C,
}

impl<I, D, C> Sht30<I, D, C>
where
    I: I2c,
    D: DelayNs,
    C: WallClock,
{
    pub fn new(i2c: I, delay: D, clock: C) -> Self {
        Self { i2c, delay, clock }
    }
}

impl<I, D, C> Sensor for Sht30<I, D, C>
where
    I: I2c,
    D: DelayNs,
    C: WallClock,
{
    async fn read(&mut self) -> Result<Measurement, SensorError> {
        let mut data = [0u8; 6];

        self.i2c
            .write(SHT30_ADDR, &CMD_MEASURE)
            .await
            .map_err(|e| {
                error!("SHT30 measure command failed: {e:?}");
                SensorError::ReadFailed {
                    sensor: "SHT30",
                    operation: "issue measure command",
                    details: "I2C write error or sensor not responding",
                }
            })?;

        self.delay.delay_ms(MEASURE_DELAY_MS).await;

        self.i2c.read(SHT30_ADDR, &mut data).await.map_err(|e| {
            error!("SHT30 result read failed: {e:?}");
            SensorError::ReadFailed {
                sensor: "SHT30",
                operation: "read measurement result",
                details: "I2C read error or conversion not finished",
            }
        })?;

        // Words are [temp MSB, temp LSB, CRC, hum MSB, hum LSB, CRC].
        let raw_temp = u16::from_be_bytes([data[0], data[1]]) as f32;
        let raw_hum = u16::from_be_bytes([data[3], data[4]]) as f32;

        Ok(Measurement {
            temperature: raw_temp * 175.0 / 65535.0 - 45.0,
            humidity: raw_hum * 100.0 / 65535.0,
            timestamp: self.clock.now(),
        })
    }
}
