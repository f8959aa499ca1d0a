//! Common test utilities and mock implementations

pub mod test_utils;

pub use mock_interface::Operation;
pub use test_utils::{create_configured_driver, create_mock_driver, identity_engine};
