//! Shared helpers for the integration test binaries.

#![allow(dead_code)]

pub mod reqres_stub;
