//! Reqres Infrastructure - Adapters and runners
//!
//! This crate provides the reqwest implementation of the HTTP port and the
//! runners that evaluate scenarios against live responses.

pub mod adapters;
pub mod testing;

pub use adapters::ReqwestHttpClient;
pub use testing::{ConformanceRunner, TestRunner, query_json_path};
