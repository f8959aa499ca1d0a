//! Compass heading computation
//!
//! [`HeadingEngine`] owns a validated [`CalibrationProfile`] and turns raw
//! QMC5883L samples into a heading in degrees, clockwise from the board's
//! forward axis.
//!
//! # Axis convention
//!
//! On the GY-271 breakout the silkscreen arrow labelled Y points forward and
//! X points to the right, so the heading is measured from the raw Y channel
//! toward the raw X channel (see [`GY271_AXES`]). Boards mounted differently
//! can supply their own [`AxisMapping`] through [`HeadingOptions`].
//!
//! # Example
//!
//! ```ignore
//! let mut compass = Qmc5883l::new(I2cInterface::default(i2c));
//! compass.configure(DeviceConfiguration::default())?;
//!
//! let calibration = CalibrationProfile::new(162.0, 1.04, -211.0, 0.97);
//! let engine = HeadingEngine::new(calibration)?;
//!
//! let heading = engine.get_heading(&mut compass, &mut delay)?;
//! if !heading.is_degenerate() {
//!     info!("heading {}° ({})", heading.degrees, heading.cardinal());
//! }
//! ```

use crate::calibration::{CalibratedSample, CalibrationProfile};
use crate::config::PollConfig;
use crate::device::{Qmc5883l, RawSample};
use crate::{ConfigError, ReadError};

#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;

/// Source of one heading-frame axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisSource {
    /// Calibrated X channel
    X,
    /// Calibrated Y channel
    Y,
    /// Calibrated X channel, inverted
    NegX,
    /// Calibrated Y channel, inverted
    NegY,
}

impl AxisSource {
    /// Pick this axis out of a calibrated sample
    #[must_use]
    pub fn select(self, sample: &CalibratedSample) -> f32 {
        match self {
            Self::X => sample.x,
            Self::Y => sample.y,
            Self::NegX => -sample.x,
            Self::NegY => -sample.y,
        }
    }
}

/// Which calibrated channels feed the forward and rightward heading axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMapping {
    /// Axis pointing toward 0°
    pub forward: AxisSource,
    /// Axis pointing toward 90°
    pub right: AxisSource,
}

/// GY-271 silkscreen convention: forward is raw Y, right is raw X
pub const GY271_AXES: AxisMapping = AxisMapping {
    forward: AxisSource::Y,
    right: AxisSource::X,
};

impl Default for AxisMapping {
    fn default() -> Self {
        GY271_AXES
    }
}

/// 8-point compass rose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CardinalDirection {
    /// North (337.5°–22.5°)
    N,
    /// North-east
    NE,
    /// East
    E,
    /// South-east
    SE,
    /// South
    S,
    /// South-west
    SW,
    /// West
    W,
    /// North-west
    NW,
}

impl CardinalDirection {
    const ROSE: [Self; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// Nearest compass point for a heading in degrees
    #[must_use]
    pub fn from_degrees(degrees: f32) -> Self {
        let sector = libm::roundf(normalize_degrees(degrees) / 45.0) as usize;
        Self::ROSE[sector % Self::ROSE.len()]
    }

    /// Short label ("N", "NE", ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl core::fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed heading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Heading {
    /// Heading in degrees, in `[0, 360)`
    pub degrees: f32,
    /// Length of the calibrated horizontal field vector the heading came from
    ///
    /// Callers should apply their own confidence threshold; a tiny magnitude
    /// means the angle carries little information.
    pub magnitude: f32,
    degenerate: bool,
}

impl Heading {
    /// Both calibrated components were exactly zero, so `degrees` is only the
    /// atan2(0, 0) convention and not a real bearing
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Nearest point on the 8-point compass rose
    #[must_use]
    pub fn cardinal(&self) -> CardinalDirection {
        CardinalDirection::from_degrees(self.degrees)
    }
}

/// Tunables for a [`HeadingEngine`]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeadingOptions {
    /// Data-ready poll budget
    pub poll: PollConfig,
    /// Axis convention of the board
    pub axes: AxisMapping,
    /// Magnetic declination in radians, added to turn magnetic into true north
    pub declination_rad: f32,
}

/// Calibrated heading computation on top of the register driver
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeadingEngine {
    calibration: CalibrationProfile,
    options: HeadingOptions,
}

impl HeadingEngine {
    /// Create a heading engine with default options
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCalibration`] if a scale is zero or
    /// non-finite.
    pub fn new(calibration: CalibrationProfile) -> Result<Self, ConfigError> {
        Self::with_options(calibration, HeadingOptions::default())
    }

    /// Create a heading engine with custom options
    ///
    /// # Errors
    ///
    /// Returns an error if the calibration is invalid, the poll budget allows
    /// no polls, or the declination is not finite.
    pub fn with_options(
        calibration: CalibrationProfile,
        options: HeadingOptions,
    ) -> Result<Self, ConfigError> {
        calibration.validate()?;

        if options.poll.retries == 0 {
            return Err(ConfigError::InvalidPollConfig);
        }

        if !options.declination_rad.is_finite() {
            return Err(ConfigError::InvalidDeclination);
        }

        Ok(Self {
            calibration,
            options,
        })
    }

    /// Get the calibration applied to every reading
    #[must_use]
    pub const fn calibration(&self) -> &CalibrationProfile {
        &self.calibration
    }

    /// Get the engine options
    #[must_use]
    pub const fn options(&self) -> &HeadingOptions {
        &self.options
    }

    /// Apply the calibration to a raw sample
    #[must_use]
    pub fn calibrate(&self, sample: &RawSample) -> CalibratedSample {
        self.calibration.apply(sample)
    }

    /// Compute the heading for a raw sample without touching the bus
    #[must_use]
    pub fn heading_from_raw(&self, sample: &RawSample) -> Heading {
        let calibrated = self.calibrate(sample);
        let forward = self.options.axes.forward.select(&calibrated);
        let right = self.options.axes.right.select(&calibrated);

        // Clockwise from forward toward right; atan2(0, 0) is 0
        let heading_rad = libm::atan2f(right, forward) + self.options.declination_rad;

        Heading {
            degrees: normalize_degrees(heading_rad.to_degrees()),
            magnitude: libm::hypotf(forward, right),
            degenerate: forward == 0.0 && right == 0.0,
        }
    }
}

#[cfg(not(feature = "async"))]
impl HeadingEngine {
    /// Wait for a fresh sample and compute its heading
    ///
    /// Polls data-ready up to `poll.retries` times with `poll.delay_ms`
    /// between polls, then burst-reads the sample. Overflowed samples are
    /// rejected rather than turned into a misleading angle.
    ///
    /// # Errors
    ///
    /// - [`ReadError::Timeout`] if data-ready was never seen
    /// - [`ReadError::Overflow`] if the sample was out of range
    /// - [`ReadError::NotConfigured`] if the driver was never configured
    /// - [`ReadError::Bus`] on transport failure
    pub fn get_heading<I, D>(
        &self,
        compass: &mut Qmc5883l<I>,
        delay: &mut D,
    ) -> Result<Heading, ReadError<I::Error>>
    where
        I: RegisterInterface<AddressType = u8>,
        D: embedded_hal::delay::DelayNs,
    {
        let retries = self.options.poll.retries;
        let mut ready = false;

        for attempt in 0..retries {
            if compass.is_data_ready()? {
                ready = true;
                break;
            }
            if attempt + 1 < retries {
                delay.delay_ms(self.options.poll.delay_ms);
            }
        }

        if !ready {
            #[cfg(feature = "defmt")]
            defmt::debug!("QMC5883L data not ready after {} polls", retries);
            return Err(ReadError::Timeout);
        }

        let reading = compass.read_raw_sample()?;
        if reading.is_overflow() {
            return Err(ReadError::Overflow);
        }

        Ok(self.heading_from_raw(&reading.sample))
    }
}

#[cfg(feature = "async")]
impl HeadingEngine {
    /// Wait for a fresh sample and compute its heading
    ///
    /// See the blocking variant for the polling and error semantics.
    ///
    /// # Errors
    ///
    /// - [`ReadError::Timeout`] if data-ready was never seen
    /// - [`ReadError::Overflow`] if the sample was out of range
    /// - [`ReadError::NotConfigured`] if the driver was never configured
    /// - [`ReadError::Bus`] on transport failure
    pub async fn get_heading<I, D>(
        &self,
        compass: &mut Qmc5883l<I>,
        delay: &mut D,
    ) -> Result<Heading, ReadError<I::Error>>
    where
        I: AsyncRegisterInterface<AddressType = u8>,
        D: embedded_hal_async::delay::DelayNs,
    {
        let retries = self.options.poll.retries;
        let mut ready = false;

        for attempt in 0..retries {
            if compass.is_data_ready().await? {
                ready = true;
                break;
            }
            if attempt + 1 < retries {
                delay.delay_ms(self.options.poll.delay_ms).await;
            }
        }

        if !ready {
            #[cfg(feature = "defmt")]
            defmt::debug!("QMC5883L data not ready after {} polls", retries);
            return Err(ReadError::Timeout);
        }

        let reading = compass.read_raw_sample().await?;
        if reading.is_overflow() {
            return Err(ReadError::Overflow);
        }

        Ok(self.heading_from_raw(&reading.sample))
    }
}

/// Wrap an angle in degrees into `[0, 360)`
///
/// Tiny negative inputs that would round to exactly 360.0 and negative zero
/// both map to 0.0.
#[must_use]
pub fn normalize_degrees(degrees: f32) -> f32 {
    let mut wrapped = libm::fmodf(degrees, 360.0);
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    if wrapped >= 360.0 {
        wrapped = 0.0;
    }
    // Fold -0.0 into +0.0
    wrapped + 0.0
}
