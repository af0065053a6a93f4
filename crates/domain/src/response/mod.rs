//! HTTP Response domain types

mod spec;

pub use spec::{ResponseSpec, millis, reason_phrase};
