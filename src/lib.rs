#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod calibration;
pub mod config;
pub mod device;
pub mod heading;
pub mod interface;
pub mod registers;

// Re-export main types
pub use calibration::{CalibratedSample, CalibrationProfile};
pub use config::{DeviceConfiguration, FullScale, Mode, OutputDataRate, Oversampling, PollConfig};
pub use device::{Qmc5883l, RawReading, RawSample, Status};
pub use heading::{
    AxisMapping, AxisSource, CardinalDirection, GY271_AXES, Heading, HeadingEngine,
    HeadingOptions,
};
pub use interface::I2cInterface;

/// QMC5883L fixed 7-bit I2C address (0x0D)
///
/// The part has no address-select pin; use [`I2cInterface::default()`] unless
/// the device sits behind an address translator.
pub const I2C_ADDRESS: u8 = 0x0D;

/// Expected value of the chip ID register
pub const CHIP_ID_VALUE: u8 = 0xFF;

/// Driver errors
///
/// `Bus` carries the transport's own error type untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device (NACK, bus timeout, device absent)
    Bus(E),
    /// Sample access attempted before a successful `configure()`
    NotConfigured,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

/// Errors raised while building a [`HeadingEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A calibration scale is zero or non-finite, or an offset is non-finite
    InvalidCalibration,
    /// The data-ready poll budget allows no polls at all
    InvalidPollConfig,
    /// The magnetic declination is not a finite angle
    InvalidDeclination,
}

/// Errors raised by a single heading request
///
/// None of these leave the engine in a bad state; the caller may simply
/// retry the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError<E> {
    /// Data-ready was never observed within the poll budget
    Timeout,
    /// The sensor flagged an axis reading outside the configured range
    Overflow,
    /// The driver has not been configured yet
    NotConfigured,
    /// Transport failure during the read
    Bus(E),
}

impl<E> From<Error<E>> for ReadError<E> {
    fn from(error: Error<E>) -> Self {
        match error {
            Error::Bus(e) => Self::Bus(e),
            Error::NotConfigured => Self::NotConfigured,
        }
    }
}
