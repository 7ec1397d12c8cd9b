//! Port traits decoupling the domain from storage, notification delivery,
//! and configuration sources.

pub mod store_port;
pub mod notify_port;
pub mod config_port;
