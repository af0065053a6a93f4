//! Reqres Application - Ports, configuration and the scenario catalog
//!
//! This crate describes what the conformance suite checks. It depends on
//! abstract ports only; concrete HTTP lives in the infrastructure crate.

pub mod catalog;
pub mod config;
pub mod error;
pub mod ports;

pub use config::{ConfigEnv, ConfigError, ConformanceConfig};
pub use error::{ApplicationError, ApplicationResult};
