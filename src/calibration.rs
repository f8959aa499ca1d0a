//! Calibration types
//!
//! Applies externally derived hard-iron (offset) and soft-iron (scale)
//! corrections to the X and Y channels. Deriving the values is left to the
//! caller; only application happens here.

use crate::ConfigError;
use crate::config::FullScale;
use crate::device::RawSample;

/// Per-axis calibration for the horizontal channels
///
/// Offsets are raw-count biases removed first; scales are gain corrections
/// applied after offset removal. Z is not corrected since only a 2D heading is
/// produced.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationProfile {
    /// Offset for X-axis in raw counts (hard-iron bias)
    pub x_offset: f32,
    /// Scale factor for X-axis (soft-iron correction)
    pub x_scale: f32,
    /// Offset for Y-axis in raw counts (hard-iron bias)
    pub y_offset: f32,
    /// Scale factor for Y-axis (soft-iron correction)
    pub y_scale: f32,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            x_offset: 0.0,
            x_scale: 1.0,
            y_offset: 0.0,
            y_scale: 1.0,
        }
    }
}

impl CalibrationProfile {
    /// Create a calibration profile
    #[must_use]
    pub const fn new(x_offset: f32, x_scale: f32, y_offset: f32, y_scale: f32) -> Self {
        Self {
            x_offset,
            x_scale,
            y_offset,
            y_scale,
        }
    }

    /// Check that the profile produces defined output
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCalibration`] if a scale is zero or
    /// non-finite, or an offset is non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scale_ok = |scale: f32| scale.is_finite() && scale != 0.0;

        if !scale_ok(self.x_scale)
            || !scale_ok(self.y_scale)
            || !self.x_offset.is_finite()
            || !self.y_offset.is_finite()
        {
            return Err(ConfigError::InvalidCalibration);
        }

        Ok(())
    }

    /// Apply calibration to a raw sample
    #[must_use]
    pub fn apply(&self, sample: &RawSample) -> CalibratedSample {
        CalibratedSample {
            x: (f32::from(sample.x) - self.x_offset) * self.x_scale,
            y: (f32::from(sample.y) - self.y_offset) * self.y_scale,
        }
    }
}

/// Calibrated horizontal field in corrected counts
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibratedSample {
    /// Corrected X-axis value
    pub x: f32,
    /// Corrected Y-axis value
    pub y: f32,
}

impl CalibratedSample {
    /// Length of the horizontal field vector
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::hypotf(self.x, self.y)
    }

    /// Convert to Gauss for the range the samples were taken at
    #[must_use]
    pub fn to_gauss(&self, full_scale: FullScale) -> Self {
        let sensitivity = full_scale.sensitivity();
        Self {
            x: self.x / sensitivity,
            y: self.y / sensitivity,
        }
    }
}
