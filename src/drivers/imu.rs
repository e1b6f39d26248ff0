// GestureWatch - MPU9250 IMU Driver
//
// Register-level accel + gyro access over I2C. The on-chip magnetometer
// (AK8963) is not used.

use esp_idf_hal::i2c::I2cDriver;

use crate::config::*;
use crate::events::ImuSample;
use crate::sensor::ImuReader;

// MPU9250 register addresses
const REG_SMPLRT_DIV: u8 = 0x19;
const REG_CONFIG: u8 = 0x1A;
const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_CONFIG2: u8 = 0x1D;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of 14-byte sensor burst
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_MPU9250: u8 = 0x71;
const WHO_AM_I_MPU9255: u8 = 0x73;

/// Units of the values handed to the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleUnits {
    /// Raw signed counts, as the models are trained on.
    Raw,
    /// g and °/s.
    Physical,
}

pub struct Mpu9250<'d> {
    i2c: I2cDriver<'d>,
    units: SampleUnits,
}

impl<'d> Mpu9250<'d> {
    pub fn new(i2c: I2cDriver<'d>, units: SampleUnits) -> Self {
        Self { i2c, units }
    }

    pub fn who_am_i(&mut self) -> anyhow::Result<u8> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(I2C_ADDR_MPU9250, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS)?;
        Ok(buf[0])
    }

    /// Wake the sensor and configure ~166 Hz output, ±2 g, ±250 °/s.
    pub fn init(&mut self) -> anyhow::Result<()> {
        let id = self.who_am_i()?;
        if id != WHO_AM_I_MPU9250 && id != WHO_AM_I_MPU9255 {
            anyhow::bail!("unexpected WHO_AM_I 0x{:02X}", id);
        }

        let setup = [
            (REG_PWR_MGMT_1, 0x01), // wake, PLL clock
            (REG_SMPLRT_DIV, SAMPLE_RATE_DIVIDER),
            (REG_CONFIG, DLPF_CONFIG),
            (REG_GYRO_CONFIG, 0x00),   // ±250 °/s
            (REG_ACCEL_CONFIG, 0x00),  // ±2 g
            (REG_ACCEL_CONFIG2, DLPF_CONFIG),
        ];
        for (reg, value) in setup {
            self.i2c
                .write(I2C_ADDR_MPU9250, &[reg, value], I2C_TIMEOUT_TICKS)?;
        }

        log::info!(
            "MPU9250 initialised (±2g, ±250°/s, {} Hz)",
            1000 / (1 + SAMPLE_RATE_DIVIDER as u32)
        );
        Ok(())
    }

    /// Burst-read all 6 axes.
    pub fn read_data(&mut self) -> anyhow::Result<ImuSample> {
        let mut raw = [0u8; 14];
        self.i2c.write_read(
            I2C_ADDR_MPU9250,
            &[REG_ACCEL_XOUT_H],
            &mut raw,
            I2C_TIMEOUT_TICKS,
        )?;

        let word = |i: usize| i16::from_be_bytes([raw[i], raw[i + 1]]) as f32;
        let (accel_div, gyro_div) = match self.units {
            SampleUnits::Raw => (1.0, 1.0),
            SampleUnits::Physical => (ACCEL_SCALE_2G, GYRO_SCALE_250),
        };

        Ok(ImuSample {
            ax: word(0) / accel_div,
            ay: word(2) / accel_div,
            az: word(4) / accel_div,
            // raw[6..8] = temperature - skipped
            gx: word(8) / gyro_div,
            gy: word(10) / gyro_div,
            gz: word(12) / gyro_div,
        })
    }
}

impl ImuReader for Mpu9250<'_> {
    fn read_imu(&mut self) -> anyhow::Result<ImuSample> {
        self.read_data()
    }
}
