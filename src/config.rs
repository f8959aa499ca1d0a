//! Measurement configuration types
//!
//! Provides the enums that make up the QMC5883L CONTROL1 register and the
//! data-ready poll budget used by the heading engine.
//!
//! Every field of [`DeviceConfiguration`] is an enum whose discriminant is the
//! raw bit pattern of its CONTROL1 field, so an out-of-range setting cannot be
//! expressed.

/// Output data rate (CONTROL1 bits 3:2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDataRate {
    /// 10 Hz
    Hz10 = 0b00,
    /// 50 Hz
    Hz50 = 0b01,
    /// 100 Hz
    Hz100 = 0b10,
    /// 200 Hz
    Hz200 = 0b11,
}

impl OutputDataRate {
    /// Get the sample rate in Hz
    #[must_use]
    pub const fn hz(self) -> u16 {
        match self {
            Self::Hz10 => 10,
            Self::Hz50 => 50,
            Self::Hz100 => 100,
            Self::Hz200 => 200,
        }
    }

    /// Get the sample period in milliseconds
    #[must_use]
    pub const fn period_ms(self) -> u32 {
        1000 / self.hz() as u32
    }
}

/// Operating mode (CONTROL1 bits 1:0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Standby, no conversions
    Standby = 0b00,
    /// Continuous measurement at the configured output data rate
    Continuous = 0b01,
}

/// Full-scale field range (CONTROL1 bits 5:4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FullScale {
    /// ±2 Gauss (most sensitive)
    G2 = 0b00,
    /// ±8 Gauss
    G8 = 0b01,
}

impl FullScale {
    /// Get the sensitivity in LSB/Gauss
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::G2 => 12000.0,
            Self::G8 => 3000.0,
        }
    }

    /// Get the maximum field in Gauss
    #[must_use]
    pub const fn max_value(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G8 => 8,
        }
    }
}

/// Over sample ratio (CONTROL1 bits 7:6)
///
/// Larger ratios give lower noise at the cost of power and response time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    /// 512 samples
    Osr512 = 0b00,
    /// 256 samples
    Osr256 = 0b01,
    /// 128 samples
    Osr128 = 0b10,
    /// 64 samples
    Osr64 = 0b11,
}

impl Oversampling {
    /// Get the over sample ratio as a number
    #[must_use]
    pub const fn ratio(self) -> u16 {
        match self {
            Self::Osr512 => 512,
            Self::Osr256 => 256,
            Self::Osr128 => 128,
            Self::Osr64 => 64,
        }
    }
}

/// Device measurement configuration
///
/// Applied with [`Qmc5883l::configure`](crate::Qmc5883l::configure), which
/// writes all four fields in one CONTROL1 write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfiguration {
    /// Output data rate
    pub output_data_rate: OutputDataRate,
    /// Operating mode
    pub mode: Mode,
    /// Full-scale range
    pub full_scale: FullScale,
    /// Over sample ratio
    pub oversampling: Oversampling,
}

impl Default for DeviceConfiguration {
    /// Continuous, 50 Hz, ±8 G, OSR 512 (CONTROL1 = 0x15)
    fn default() -> Self {
        Self {
            output_data_rate: OutputDataRate::Hz50,
            mode: Mode::Continuous,
            full_scale: FullScale::G8,
            oversampling: Oversampling::Osr512,
        }
    }
}

impl DeviceConfiguration {
    /// Same configuration in standby mode
    #[must_use]
    pub const fn standby(self) -> Self {
        Self {
            mode: Mode::Standby,
            ..self
        }
    }

    /// Encode into the CONTROL1 register byte
    ///
    /// Layout: `OSR[7:6] RNG[5:4] ODR[3:2] MODE[1:0]`
    #[must_use]
    pub const fn control_byte(&self) -> u8 {
        ((self.oversampling as u8) << 6)
            | ((self.full_scale as u8) << 4)
            | ((self.output_data_rate as u8) << 2)
            | (self.mode as u8)
    }

    /// Decode a CONTROL1 register byte
    ///
    /// Returns `None` for the reserved mode and range encodings.
    #[must_use]
    pub const fn from_control_byte(byte: u8) -> Option<Self> {
        let mode = match byte & 0b11 {
            0b00 => Mode::Standby,
            0b01 => Mode::Continuous,
            _ => return None,
        };
        let output_data_rate = match (byte >> 2) & 0b11 {
            0b00 => OutputDataRate::Hz10,
            0b01 => OutputDataRate::Hz50,
            0b10 => OutputDataRate::Hz100,
            _ => OutputDataRate::Hz200,
        };
        let full_scale = match (byte >> 4) & 0b11 {
            0b00 => FullScale::G2,
            0b01 => FullScale::G8,
            _ => return None,
        };
        let oversampling = match (byte >> 6) & 0b11 {
            0b00 => Oversampling::Osr512,
            0b01 => Oversampling::Osr256,
            0b10 => Oversampling::Osr128,
            _ => Oversampling::Osr64,
        };

        Some(Self {
            output_data_rate,
            mode,
            full_scale,
            oversampling,
        })
    }
}

/// Default number of data-ready polls per heading request
pub const DEFAULT_POLL_RETRIES: u16 = 10;

/// Default delay between data-ready polls in milliseconds
pub const DEFAULT_POLL_DELAY_MS: u32 = 5;

/// Data-ready poll budget
///
/// A heading request issues at most `retries` status reads, sleeping
/// `delay_ms` between consecutive reads, so the worst-case wait is
/// `(retries - 1) * delay_ms` plus bus time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Maximum number of data-ready polls (must be non-zero)
    pub retries: u16,
    /// Delay between polls in milliseconds
    pub delay_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            retries: DEFAULT_POLL_RETRIES,
            delay_ms: DEFAULT_POLL_DELAY_MS,
        }
    }
}

impl PollConfig {
    /// Poll budget sized for an output data rate
    ///
    /// Polls every quarter sample period with the default retry count, which
    /// covers a little over two sample periods.
    #[must_use]
    pub const fn for_rate(rate: OutputDataRate) -> Self {
        let delay_ms = rate.period_ms() / 4;
        Self {
            retries: DEFAULT_POLL_RETRIES,
            delay_ms: if delay_ms == 0 { 1 } else { delay_ms },
        }
    }

    /// Worst-case time spent sleeping in one request, in milliseconds
    #[must_use]
    pub const fn budget_ms(&self) -> u32 {
        self.retries.saturating_sub(1) as u32 * self.delay_ms
    }
}
