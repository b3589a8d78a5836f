//! Test support utilities for gwt integration tests
//!
//! This crate provides shared test helpers and utilities for integration tests.
//! It's designed to be used only during development and testing, not published.

pub mod patterns;
pub mod test_env;

// Re-export commonly used items for convenience
pub use patterns::{assert_env_files_copied, create_gwt_config, create_sample_env_files};
pub use test_env::CliTestEnvironment;
