//! Reqres Domain - Core types for the conformance suite
//!
//! This crate defines requests, responses, assertions, scenarios and the
//! record shapes served by the mock API.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod records;
pub mod request;
pub mod response;
pub mod scenario;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use records::{ListPage, Resource, Single, Support, User, UserEcho};
pub use scenario::{ConformanceReport, Expectation, Scenario, ScenarioOutcome, ScenarioResult};
pub use testing::{
    Assertion, AssertionResult, ComparisonOperator, StatusExpectation, TestResults, TestSuite,
};
