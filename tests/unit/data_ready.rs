//! Unit tests for data-ready polling and status decoding

use crate::common::mock_interface::{STATUS_DOR, STATUS_DRDY, STATUS_OVL};
use crate::common::{create_configured_driver, create_mock_driver};
use qmc5883l::{Error, Status};

#[test]
fn test_data_ready_requires_configuration() {
    let (mut driver, interface) = create_mock_driver();

    assert_eq!(driver.is_data_ready(), Err(Error::NotConfigured));
    assert_eq!(driver.read_status(), Err(Error::NotConfigured));

    // Rejected before touching the bus
    assert!(interface.operations().is_empty());
}

#[test]
fn test_data_ready_reflects_status() {
    let (mut driver, interface) = create_configured_driver();

    assert!(!driver.is_data_ready().unwrap());

    interface.set_sample(1, 2, 3);
    assert!(driver.is_data_ready().unwrap());
}

#[test]
fn test_data_ready_is_non_destructive() {
    let (mut driver, interface) = create_configured_driver();
    interface.set_sample(10, 20, 30);

    assert!(driver.is_data_ready().unwrap());
    assert!(driver.is_data_ready().unwrap());
    assert_eq!(interface.sample_read_count(), 0);
    assert_eq!(interface.status_poll_count(), 2);

    // The sample read is what consumes DRDY
    driver.read_raw_sample().unwrap();
    assert!(!driver.is_data_ready().unwrap());
}

#[test]
fn test_read_status_decodes_all_flags() {
    let (mut driver, interface) = create_configured_driver();

    interface.script_status(&[STATUS_DRDY | STATUS_OVL | STATUS_DOR, STATUS_DOR]);

    assert_eq!(
        driver.read_status().unwrap(),
        Status {
            data_ready: true,
            overflow: true,
            data_skipped: true,
        }
    );
    assert_eq!(
        driver.read_status().unwrap(),
        Status {
            data_ready: false,
            overflow: false,
            data_skipped: true,
        }
    );
}

#[test]
fn test_reserved_status_bits_ignored() {
    let (mut driver, interface) = create_configured_driver();

    interface.script_status(&[0xF8]);
    assert_eq!(driver.read_status().unwrap(), Status::default());
}

#[test]
fn test_status_decoded_same_way_in_burst() {
    let (mut driver, interface) = create_configured_driver();

    for bits in 0u8..8 {
        let status = bits | 0xF8;
        interface.set_sample_with_status(7, 8, 9, status);

        let polled = driver.read_status().unwrap();
        let reading = driver.read_raw_sample().unwrap();

        assert_eq!(polled, reading.status, "STATUS {:#04x}", status);
        assert_eq!(polled, Status::from_bits(bits));
    }
}
