//! Unit tests for calibration profiles

use crate::common::create_configured_driver;
use crate::common::test_utils::{MockDelay, assert_float_eq};
use qmc5883l::{CalibrationProfile, ConfigError, FullScale, HeadingEngine, RawSample};

#[test]
fn test_valid_profiles_accepted() {
    let profiles = [
        CalibrationProfile::default(),
        CalibrationProfile::new(162.0, 1.04, -211.0, 0.97),
        CalibrationProfile::new(-5000.0, -1.0, 5000.0, 0.001),
    ];

    for profile in profiles {
        assert!(HeadingEngine::new(profile).is_ok(), "{:?}", profile);
    }
}

#[test]
fn test_invalid_profiles_rejected() {
    let profiles = [
        CalibrationProfile::new(0.0, 0.0, 0.0, 1.0),
        CalibrationProfile::new(0.0, 1.0, 0.0, 0.0),
        CalibrationProfile::new(0.0, f32::NAN, 0.0, 1.0),
        CalibrationProfile::new(0.0, 1.0, 0.0, f32::INFINITY),
        CalibrationProfile::new(f32::NAN, 1.0, 0.0, 1.0),
        CalibrationProfile::new(0.0, 1.0, f32::NEG_INFINITY, 1.0),
    ];

    for profile in profiles {
        assert_eq!(
            HeadingEngine::new(profile).unwrap_err(),
            ConfigError::InvalidCalibration,
            "{:?}",
            profile
        );
    }
}

#[test]
fn test_engine_keeps_profile() {
    let profile = CalibrationProfile::new(10.0, 2.0, -10.0, 0.5);
    let engine = HeadingEngine::new(profile).unwrap();
    assert_eq!(*engine.calibration(), profile);

    let calibrated = engine.calibrate(&RawSample { x: 20, y: 10, z: 0 });
    assert_float_eq(calibrated.x, 20.0, 1e-6);
    assert_float_eq(calibrated.y, 10.0, 1e-6);
}

#[test]
fn test_calibrated_diagonal() {
    // Soft-iron ellipse squashed on X; calibration restores a 45° vector
    let profile = CalibrationProfile::new(0.0, 2.0, 0.0, 1.0);
    let engine = HeadingEngine::new(profile).unwrap();
    let (mut driver, interface) = create_configured_driver();
    let mut delay = MockDelay::default();
    interface.set_sample(500, 1000, 0);

    let heading = engine.get_heading(&mut driver, &mut delay).unwrap();

    assert_float_eq(heading.degrees, 45.0, 1e-3);
    assert_float_eq(heading.magnitude, 1414.2136, 1e-2);
}

#[test]
fn test_calibrated_sample_in_gauss() {
    let calibrated = CalibrationProfile::default().apply(&RawSample {
        x: 3000,
        y: -12000,
        z: 0,
    });

    let gauss = calibrated.to_gauss(FullScale::G8);
    assert_float_eq(gauss.x, 1.0, 1e-6);
    assert_float_eq(gauss.y, -4.0, 1e-6);

    let gauss = calibrated.to_gauss(FullScale::G2);
    assert_float_eq(gauss.x, 0.25, 1e-6);
    assert_float_eq(gauss.y, -1.0, 1e-6);
}
