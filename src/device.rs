//! Register-level driver API for the QMC5883L
//!
//! This module turns logical operations (configure, poll data-ready, read a
//! sample) into transactions against the fixed QMC5883L register map.
//!
//! The driver has two states. It starts out unconfigured, where only
//! [`Qmc5883l::configure`] (and the identification/reset helpers) are valid,
//! and becomes configured once a configuration has been written successfully.
//! Reconfiguring is allowed at any time.

use crate::Error;
use crate::config::{DeviceConfiguration, Mode};
use crate::registers::Qmc5883l as RegisterDevice;
use crate::registers::{
    AXIS_BURST_LEN, REG_STATUS, REG_TOUT_LSB, REG_XOUT_LSB, SAMPLE_BURST_LEN,
    SET_RESET_PERIOD_RECOMMENDED, STATUS_DOR, STATUS_DRDY, STATUS_OVL,
};

// Only import RegisterInterface when not using async feature
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;

/// Time for the device to reload its defaults after a soft reset
const SOFT_RESET_DELAY_MS: u32 = 100;

/// Magnetometer data (raw 16-bit values)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// X-axis magnetic field (raw)
    pub x: i16,
    /// Y-axis magnetic field (raw)
    pub y: i16,
    /// Z-axis magnetic field (raw)
    pub z: i16,
}

/// Decoded STATUS register
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// A new, complete sample is available
    pub data_ready: bool,
    /// An axis exceeded the configured full-scale range
    pub overflow: bool,
    /// A sample was overwritten before it was read
    pub data_skipped: bool,
}

impl Status {
    /// Decode a raw STATUS byte
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            data_ready: bits & STATUS_DRDY != 0,
            overflow: bits & STATUS_OVL != 0,
            data_skipped: bits & STATUS_DOR != 0,
        }
    }
}

/// One burst read: the axis sample and the status captured with it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawReading {
    /// Raw axis values
    pub sample: RawSample,
    /// STATUS byte read in the same transaction
    pub status: Status,
}

impl RawReading {
    /// Whether the sensor flagged this reading as out of range
    #[must_use]
    pub const fn is_overflow(&self) -> bool {
        self.status.overflow
    }

    /// Decode a `X_L X_H Y_L Y_H Z_L Z_H STATUS` burst
    fn from_burst(buffer: &[u8; SAMPLE_BURST_LEN]) -> Self {
        let x = i16::from_le_bytes([buffer[0], buffer[1]]);
        let y = i16::from_le_bytes([buffer[2], buffer[3]]);
        let z = i16::from_le_bytes([buffer[4], buffer[5]]);

        Self {
            sample: RawSample { x, y, z },
            status: Status::from_bits(buffer[AXIS_BURST_LEN]),
        }
    }
}

/// Main driver for the QMC5883L
pub struct Qmc5883l<I> {
    device: RegisterDevice<I>,
    configuration: Option<DeviceConfiguration>,
}

impl<I> Qmc5883l<I> {
    /// The configuration currently applied, or `None` while unconfigured
    #[must_use]
    pub const fn configuration(&self) -> Option<DeviceConfiguration> {
        self.configuration
    }

    /// Whether a configuration has been written successfully
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.configuration.is_some()
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.device.interface
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I> {
        &self.device
    }

    /// Get a mutable reference to the underlying register device (for advanced usage)
    ///
    /// Writes made through this handle bypass the driver's state tracking.
    pub const fn device_mut(&mut self) -> &mut RegisterDevice<I> {
        &mut self.device
    }
}

#[cfg(not(feature = "async"))]
impl<I> Qmc5883l<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new QMC5883L driver instance
    ///
    /// No bus traffic happens here; the driver starts unconfigured. Call
    /// [`configure()`](Self::configure) before reading samples.
    pub fn new(interface: I) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            configuration: None,
        }
    }

    /// Read the chip ID register
    ///
    /// Should return 0xFF for a genuine QMC5883L. Valid in any state.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_chip_id(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.chip_id().read()?;
        Ok(reg.chip_id())
    }

    /// Perform a soft reset
    ///
    /// All registers return to their power-on defaults (standby), so the
    /// driver goes back to the unconfigured state.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay provider implementing `embedded_hal::delay::DelayNs`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn soft_reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.configuration = None;

        self.device.control_2().write(|w| {
            w.set_soft_rst(true);
        })?;

        delay.delay_ms(SOFT_RESET_DELAY_MS);

        #[cfg(feature = "defmt")]
        defmt::debug!("QMC5883L soft reset complete");

        Ok(())
    }

    /// Apply a measurement configuration
    ///
    /// Writes the SET/RESET period register and then the whole CONTROL1 byte
    /// in a single register write. If the device is currently in continuous
    /// mode, it is first put in standby so the new rate and oversampling
    /// start from a fresh conversion cycle. While unconfigured the driver
    /// does not know the device mode, so CONTROL1 is read back first.
    ///
    /// On failure the driver's state is the last CONTROL1 setting that was
    /// written successfully.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn configure(&mut self, config: DeviceConfiguration) -> Result<(), Error<I::Error>> {
        let standby = match self.configuration {
            Some(current) => (current.mode == Mode::Continuous).then_some(current.standby()),
            // State unknown (e.g. MCU restarted without power-cycling the part)
            None => {
                let control = self.device.control_1().read()?;
                (control.mode() == Mode::Continuous as u8).then_some(config.standby())
            }
        };

        if let Some(standby) = standby {
            self.device.control_1().write(|w| {
                w.set_mode(standby.mode as u8);
                w.set_odr(standby.output_data_rate as u8);
                w.set_rng(standby.full_scale as u8);
                w.set_osr(standby.oversampling as u8);
            })?;
            self.configuration = Some(standby);
        }

        self.device.set_reset_period().write(|w| {
            w.set_fbr(SET_RESET_PERIOD_RECOMMENDED);
        })?;

        self.device.control_1().write(|w| {
            w.set_mode(config.mode as u8);
            w.set_odr(config.output_data_rate as u8);
            w.set_rng(config.full_scale as u8);
            w.set_osr(config.oversampling as u8);
        })?;

        self.configuration = Some(config);

        #[cfg(feature = "defmt")]
        defmt::debug!("QMC5883L configured: CONTROL1={=u8:#x}", config.control_byte());

        Ok(())
    }

    /// Enable or disable the DRDY interrupt pin
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_data_ready_interrupt(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        // INT_ENB is active low
        self.device.control_2().modify(|w| {
            w.set_int_enb(!enable);
        })?;
        Ok(())
    }

    /// Enable or disable register pointer roll-over
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_pointer_rollover(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.device.control_2().modify(|w| {
            w.set_rol_pnt(enable);
        })?;
        Ok(())
    }

    /// Read the STATUS register
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not configured or communication fails.
    pub fn read_status(&mut self) -> Result<Status, Error<I::Error>> {
        if !self.is_configured() {
            return Err(Error::NotConfigured);
        }

        let mut buffer = [0u8; 1];
        self.device
            .interface
            .read_register(REG_STATUS, 8, &mut buffer)?;

        Ok(Status::from_bits(buffer[0]))
    }

    /// Check if a new sample is available
    ///
    /// Reads only the STATUS register; the sample itself is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not configured or communication fails.
    pub fn is_data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.read_status()?.data_ready)
    }

    /// Read one raw sample together with its status
    ///
    /// X, Y and Z plus the STATUS byte that follows them are fetched in a
    /// single burst, so the sample cannot tear across an internal update and
    /// the overflow flag belongs to the same measurement.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not configured or communication fails.
    pub fn read_raw_sample(&mut self) -> Result<RawReading, Error<I::Error>> {
        if !self.is_configured() {
            return Err(Error::NotConfigured);
        }

        let mut buffer = [0u8; SAMPLE_BURST_LEN];
        self.device
            .interface
            .read_register(REG_XOUT_LSB, (SAMPLE_BURST_LEN * 8) as u32, &mut buffer)?;

        let reading = RawReading::from_burst(&buffer);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "QMC5883L sample x={} y={} z={} ovl={}",
            reading.sample.x,
            reading.sample.y,
            reading.sample.z,
            reading.status.overflow
        );

        Ok(reading)
    }

    /// Read the raw temperature output
    ///
    /// The temperature sensor is only offset-trimmed at the factory, so the
    /// value is useful for relative changes (100 LSB/°C).
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not configured or communication fails.
    pub fn read_temperature_raw(&mut self) -> Result<i16, Error<I::Error>> {
        if !self.is_configured() {
            return Err(Error::NotConfigured);
        }

        // Read both bytes atomically to prevent torn reads
        let mut buffer = [0u8; 2];
        self.device
            .interface
            .read_register(REG_TOUT_LSB, 16, &mut buffer)?;

        Ok(i16::from_le_bytes(buffer))
    }
}

#[cfg(feature = "async")]
impl<I> Qmc5883l<I>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    /// Create a new QMC5883L driver instance
    ///
    /// No bus traffic happens here; the driver starts unconfigured. Call
    /// [`configure()`](Self::configure) before reading samples.
    pub fn new(interface: I) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            configuration: None,
        }
    }

    /// Read the chip ID register
    ///
    /// Should return 0xFF for a genuine QMC5883L. Valid in any state.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn read_chip_id(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.device.chip_id().read_async().await?;
        Ok(reg.chip_id())
    }

    /// Perform a soft reset
    ///
    /// All registers return to their power-on defaults (standby), so the
    /// driver goes back to the unconfigured state.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay provider implementing `embedded_hal_async::delay::DelayNs`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn soft_reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        self.configuration = None;

        self.device
            .control_2()
            .write_async(|w| {
                w.set_soft_rst(true);
            })
            .await?;

        delay.delay_ms(SOFT_RESET_DELAY_MS).await;

        #[cfg(feature = "defmt")]
        defmt::debug!("QMC5883L soft reset complete");

        Ok(())
    }

    /// Apply a measurement configuration
    ///
    /// See the blocking variant for the write sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn configure(&mut self, config: DeviceConfiguration) -> Result<(), Error<I::Error>> {
        let standby = match self.configuration {
            Some(current) => (current.mode == Mode::Continuous).then_some(current.standby()),
            None => {
                let control = self.device.control_1().read_async().await?;
                (control.mode() == Mode::Continuous as u8).then_some(config.standby())
            }
        };

        if let Some(standby) = standby {
            self.device
                .control_1()
                .write_async(|w| {
                    w.set_mode(standby.mode as u8);
                    w.set_odr(standby.output_data_rate as u8);
                    w.set_rng(standby.full_scale as u8);
                    w.set_osr(standby.oversampling as u8);
                })
                .await?;
            self.configuration = Some(standby);
        }

        self.device
            .set_reset_period()
            .write_async(|w| {
                w.set_fbr(SET_RESET_PERIOD_RECOMMENDED);
            })
            .await?;

        self.device
            .control_1()
            .write_async(|w| {
                w.set_mode(config.mode as u8);
                w.set_odr(config.output_data_rate as u8);
                w.set_rng(config.full_scale as u8);
                w.set_osr(config.oversampling as u8);
            })
            .await?;

        self.configuration = Some(config);

        #[cfg(feature = "defmt")]
        defmt::debug!("QMC5883L configured: CONTROL1={=u8:#x}", config.control_byte());

        Ok(())
    }

    /// Enable or disable the DRDY interrupt pin
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_data_ready_interrupt(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        // INT_ENB is active low
        self.device
            .control_2()
            .modify_async(|w| {
                w.set_int_enb(!enable);
            })
            .await?;
        Ok(())
    }

    /// Enable or disable register pointer roll-over
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub async fn set_pointer_rollover(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.device
            .control_2()
            .modify_async(|w| {
                w.set_rol_pnt(enable);
            })
            .await?;
        Ok(())
    }

    /// Read the STATUS register
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not configured or communication fails.
    pub async fn read_status(&mut self) -> Result<Status, Error<I::Error>> {
        if !self.is_configured() {
            return Err(Error::NotConfigured);
        }

        let mut buffer = [0u8; 1];
        self.device
            .interface
            .read_register(REG_STATUS, 8, &mut buffer)
            .await?;

        Ok(Status::from_bits(buffer[0]))
    }

    /// Check if a new sample is available
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not configured or communication fails.
    pub async fn is_data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.read_status().await?.data_ready)
    }

    /// Read one raw sample together with its status
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not configured or communication fails.
    pub async fn read_raw_sample(&mut self) -> Result<RawReading, Error<I::Error>> {
        if !self.is_configured() {
            return Err(Error::NotConfigured);
        }

        let mut buffer = [0u8; SAMPLE_BURST_LEN];
        self.device
            .interface
            .read_register(REG_XOUT_LSB, (SAMPLE_BURST_LEN * 8) as u32, &mut buffer)
            .await?;

        let reading = RawReading::from_burst(&buffer);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "QMC5883L sample x={} y={} z={} ovl={}",
            reading.sample.x,
            reading.sample.y,
            reading.sample.z,
            reading.status.overflow
        );

        Ok(reading)
    }

    /// Read the raw temperature output
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not configured or communication fails.
    pub async fn read_temperature_raw(&mut self) -> Result<i16, Error<I::Error>> {
        if !self.is_configured() {
            return Err(Error::NotConfigured);
        }

        let mut buffer = [0u8; 2];
        self.device
            .interface
            .read_register(REG_TOUT_LSB, 16, &mut buffer)
            .await?;

        Ok(i16::from_le_bytes(buffer))
    }
}
