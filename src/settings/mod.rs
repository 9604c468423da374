//! Credentials and run configuration

pub mod file_credentials;
pub mod run_config;
