//! Core domain types and logic.

pub mod snapshot;
pub mod feed;
pub mod calc;
pub mod format;
pub mod ident;
pub mod alert;
pub mod portfolio;
pub mod store;
pub mod config;
pub mod error;
