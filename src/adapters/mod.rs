//! Concrete adapter implementations for ports.

pub mod json_file_store;
pub mod log_notifier;
pub mod file_config_adapter;
