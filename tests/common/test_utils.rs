//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use qmc5883l::{CalibrationProfile, DeviceConfiguration, HeadingEngine, Qmc5883l};

/// Mock delay implementation for testing
///
/// Does not sleep; records how often and how long the driver asked to wait.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockDelay {
    /// Number of `delay_ms` calls
    pub calls: u32,
    /// Sum of all requested milliseconds
    pub total_ms: u32,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {
        // No-op for testing
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls += 1;
        self.total_ms += ms;
    }
}

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
pub fn create_mock_driver() -> (Qmc5883l<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = Qmc5883l::new(interface);
    (driver, interface_clone)
}

/// Create a mock driver that has already been configured with defaults
pub fn create_configured_driver() -> (Qmc5883l<MockInterface>, MockInterface) {
    let (mut driver, interface) = create_mock_driver();
    driver
        .configure(DeviceConfiguration::default())
        .expect("Failed to configure mock driver");
    interface.clear_operations();
    (driver, interface)
}

/// Heading engine with identity calibration
pub fn identity_engine() -> HeadingEngine {
    HeadingEngine::new(CalibrationProfile::default()).expect("identity calibration is valid")
}

/// Assert that two floating point values are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
