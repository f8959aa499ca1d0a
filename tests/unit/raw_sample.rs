//! Unit tests for raw sample and temperature reads

use crate::common::mock_interface::{REG_STATUS, STATUS_DOR, STATUS_DRDY};
use crate::common::{Operation, create_configured_driver, create_mock_driver};
use qmc5883l::{Error, RawSample};

#[test]
fn test_sample_is_one_burst() {
    let (mut driver, interface) = create_configured_driver();
    interface.set_sample(100, -200, 300);

    let reading = driver.read_raw_sample().unwrap();

    assert_eq!(
        reading.sample,
        RawSample {
            x: 100,
            y: -200,
            z: 300
        }
    );
    // Axes and STATUS in a single transaction
    assert_eq!(
        interface.operations(),
        vec![Operation::ReadRegister {
            address: 0x00,
            len: 7
        }]
    );
}

#[test]
fn test_sample_little_endian_extremes() {
    let (mut driver, interface) = create_configured_driver();

    interface.set_sample(i16::MIN, i16::MAX, -1);
    let sample = driver.read_raw_sample().unwrap().sample;
    assert_eq!(sample.x, i16::MIN);
    assert_eq!(sample.y, i16::MAX);
    assert_eq!(sample.z, -1);

    // Low byte at the lower address
    interface.set_register(0x00, 0x34);
    interface.set_register(0x01, 0x12);
    assert_eq!(driver.read_raw_sample().unwrap().sample.x, 0x1234);
}

#[test]
fn test_sample_carries_status() {
    let (mut driver, interface) = create_configured_driver();

    interface.set_sample(1, 1, 1);
    let reading = driver.read_raw_sample().unwrap();
    assert!(reading.status.data_ready);
    assert!(!reading.is_overflow());

    interface.set_overflow_sample(1, 1, 1);
    let reading = driver.read_raw_sample().unwrap();
    assert!(reading.is_overflow());

    interface.set_sample_with_status(1, 1, 1, STATUS_DRDY | STATUS_DOR);
    let reading = driver.read_raw_sample().unwrap();
    assert!(reading.status.data_skipped);
    assert!(!reading.is_overflow());
}

#[test]
fn test_sample_read_clears_ready_flag() {
    let (mut driver, interface) = create_configured_driver();
    interface.set_sample(5, 5, 5);

    driver.read_raw_sample().unwrap();
    assert_eq!(interface.get_register(REG_STATUS) & STATUS_DRDY, 0);
}

#[test]
fn test_sample_requires_configuration() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_sample(1, 2, 3);

    assert_eq!(driver.read_raw_sample(), Err(Error::NotConfigured));
    assert_eq!(driver.read_temperature_raw(), Err(Error::NotConfigured));
    assert!(interface.operations().is_empty());
}

#[test]
fn test_temperature_burst() {
    let (mut driver, interface) = create_configured_driver();
    let [lsb, msb] = (-2500i16).to_le_bytes();
    interface.set_register(0x07, lsb);
    interface.set_register(0x08, msb);

    assert_eq!(driver.read_temperature_raw().unwrap(), -2500);
    assert_eq!(
        interface.operations(),
        vec![Operation::ReadRegister {
            address: 0x07,
            len: 2
        }]
    );
}
