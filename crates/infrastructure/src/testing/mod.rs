//! Response testing infrastructure.
//!
//! The assertion runner, its JSON path helper, and the conformance runner
//! that drives whole scenarios over HTTP.

mod conformance;
mod json_path;
mod runner;

pub use conformance::ConformanceRunner;
pub use json_path::query_json_path;
pub use runner::TestRunner;
