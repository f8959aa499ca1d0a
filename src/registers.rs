//! Register definitions for the QMC5883L
//!
//! The QMC5883L exposes a flat 8-bit register space with no banking. Axis and
//! temperature outputs are little-endian 16-bit pairs; everything else is a
//! single byte.
//!
//! ## Register Map
//! - `0x00..=0x05`: X/Y/Z output (LSB first)
//! - `0x06`: STATUS (data ready, overflow, data skipped)
//! - `0x07..=0x08`: temperature output
//! - `0x09`: CONTROL1 (mode, output data rate, range, oversampling)
//! - `0x0A`: CONTROL2 (interrupt, pointer roll-over, soft reset)
//! - `0x0B`: SET/RESET period
//! - `0x0D`: chip ID
//!
//! The output pairs and STATUS are read as raw bursts by the driver (STATUS
//! trails the axis data), so they are described by the constants below and
//! only the control registers are modelled in the typed map.

/// First axis output register (`XOUT_LSB`)
pub const REG_XOUT_LSB: u8 = 0x00;

/// Status register
pub const REG_STATUS: u8 = 0x06;

/// STATUS bit: a complete new sample is in the output registers
pub const STATUS_DRDY: u8 = 0x01;
/// STATUS bit: an axis exceeded the configured full-scale range
pub const STATUS_OVL: u8 = 0x02;
/// STATUS bit: a sample was overwritten before being read
pub const STATUS_DOR: u8 = 0x04;

/// Temperature output register (`TOUT_LSB`)
pub const REG_TOUT_LSB: u8 = 0x07;

/// Length of one axis burst (X/Y/Z LSB/MSB pairs)
pub const AXIS_BURST_LEN: usize = 6;

/// Length of the axis burst extended with the trailing STATUS byte
pub const SAMPLE_BURST_LEN: usize = AXIS_BURST_LEN + 1;

/// SET/RESET period value recommended by the datasheet
pub const SET_RESET_PERIOD_RECOMMENDED: u8 = 0x01;

device_driver::create_device!(
    device_name: Qmc5883l,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = LE;
        }

        /// CONTROL1 - Measurement Configuration (0x09)
        register Control1 {
            const ADDRESS = 0x09;
            const SIZE_BITS = 8;

            /// Operating mode (0=standby, 1=continuous)
            mode: uint = 0..2,
            /// Output data rate (0=10Hz, 1=50Hz, 2=100Hz, 3=200Hz)
            odr: uint = 2..4,
            /// Full-scale range (0=2G, 1=8G)
            rng: uint = 4..6,
            /// Over sample ratio (0=512, 1=256, 2=128, 3=64)
            osr: uint = 6..8,
        },

        /// CONTROL2 - Interrupt and Reset Control (0x0A)
        register Control2 {
            const ADDRESS = 0x0A;
            const SIZE_BITS = 8;

            /// Interrupt pin disable (active low: 0 enables the DRDY pin)
            int_enb: bool = 0,
            reserved_5_1: uint = 1..6,
            /// Pointer roll-over across the output registers
            rol_pnt: bool = 6,
            /// Soft reset, restores all registers to their defaults
            soft_rst: bool = 7,
        },

        /// SET/RESET Period (0x0B)
        register SetResetPeriod {
            const ADDRESS = 0x0B;
            const SIZE_BITS = 8;

            /// Period FBR value
            fbr: uint = 0..8,
        },

        /// Chip ID (0x0D)
        /// Expected value: 0xFF
        register ChipId {
            const ADDRESS = 0x0D;
            const SIZE_BITS = 8;

            /// Chip identification (should read 0xFF)
            chip_id: uint = 0..8,
        }
    }
);

// Re-export commonly used types for convenience
pub use Qmc5883l as RegisterDevice;
