//! Test runner implementation.
//!
//! Executes assertions against HTTP responses and produces test results.

use regex::Regex;
use reqres_domain::response::{ResponseSpec, millis};
use reqres_domain::testing::{
    Assertion, AssertionResult, ComparisonOperator, StatusExpectation, TestResults, TestSuite,
};
use serde_json::Value;

use super::json_path::query_json_path;

/// Test runner that executes assertions against responses.
///
/// Every assertion in a suite is evaluated so a report lists all failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestRunner;

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run a test suite against a response.
    #[must_use]
    pub fn run(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let results = suite
            .assertions
            .iter()
            .map(|assertion| self.run_assertion(assertion, response))
            .collect();

        TestResults::new(&suite.name, results)
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => check_status_code(assertion, response, expected),
            Assertion::ResponseTime { max_ms } => {
                check_response_time(assertion, response, |ms| ms <= *max_ms, || {
                    format!("expected <= {max_ms}ms")
                })
            }
            Assertion::MinResponseTime { min_ms } => {
                check_response_time(assertion, response, |ms| ms >= *min_ms, || {
                    format!("expected >= {min_ms}ms")
                })
            }
            Assertion::ContentType { expected } => check_content_type(assertion, response, expected),
            Assertion::IsJson => match response.json() {
                Ok(_) => AssertionResult::pass(assertion.clone()),
                Err(e) => AssertionResult::fail_with_value(
                    assertion.clone(),
                    response.body_preview(),
                    format!("Body is not valid JSON: {e}"),
                ),
            },
            Assertion::BodyEquals { expected } => check_body_equals(assertion, response, expected),
            Assertion::JsonBodyEquals { expected } => with_json(assertion, response, |json| {
                if &json == expected {
                    AssertionResult::pass_with_value(assertion.clone(), json.to_string())
                } else {
                    AssertionResult::fail_with_value(
                        assertion.clone(),
                        json.to_string(),
                        format!("Expected JSON body {expected}, got {json}"),
                    )
                }
            }),
            Assertion::JsonPath { path, expected } => {
                with_path(assertion, response, path, |value| match (value, expected) {
                    (None, _) => AssertionResult::fail(
                        assertion.clone(),
                        format!("JSON path '{path}' not found"),
                    ),
                    (Some(value), Some(expected)) if &value != expected => {
                        AssertionResult::fail_with_value(
                            assertion.clone(),
                            value.to_string(),
                            format!(
                                "JSON path '{path}' value mismatch: expected {expected}, got {value}"
                            ),
                        )
                    }
                    (Some(value), _) => {
                        AssertionResult::pass_with_value(assertion.clone(), value.to_string())
                    }
                })
            }
            Assertion::JsonPathMatches {
                path,
                operator,
                value: expected,
            } => with_path(assertion, response, path, |value| match value {
                None => AssertionResult::fail(
                    assertion.clone(),
                    format!("JSON path '{path}' not found"),
                ),
                Some(value) => match compare_json_values(&value, *operator, expected) {
                    Ok(true) => {
                        AssertionResult::pass_with_value(assertion.clone(), value.to_string())
                    }
                    Ok(false) => AssertionResult::fail_with_value(
                        assertion.clone(),
                        value.to_string(),
                        format!(
                            "JSON path '{path}' comparison failed: {value} {} {expected}",
                            operator.symbol()
                        ),
                    ),
                    Err(e) => AssertionResult::fail(assertion.clone(), e),
                },
            }),
            Assertion::JsonPathAbsentOrNull { path } => {
                with_path(assertion, response, path, |value| match value {
                    None | Some(Value::Null) => AssertionResult::pass(assertion.clone()),
                    Some(value) => AssertionResult::fail_with_value(
                        assertion.clone(),
                        value.to_string(),
                        format!("JSON path '{path}' should be absent or null, got {value}"),
                    ),
                })
            }
            Assertion::ArrayLength { path, length } => {
                with_array(assertion, response, path, |items| {
                    if items.len() == *length {
                        AssertionResult::pass_with_value(assertion.clone(), items.len().to_string())
                    } else {
                        AssertionResult::fail_with_value(
                            assertion.clone(),
                            items.len().to_string(),
                            format!(
                                "JSON path '{path}' has {} items, expected {length}",
                                items.len()
                            ),
                        )
                    }
                })
            }
            Assertion::EachItemHasFields { path, fields } => {
                with_array(assertion, response, path, |items| {
                    let missing: Vec<String> = items
                        .iter()
                        .enumerate()
                        .flat_map(|(index, item)| {
                            fields
                                .iter()
                                .filter(move |field| item.get(field.as_str()).is_none())
                                .map(move |field| format!("{path}[{index}].{field}"))
                        })
                        .collect();
                    if missing.is_empty() {
                        AssertionResult::pass(assertion.clone())
                    } else {
                        AssertionResult::fail(
                            assertion.clone(),
                            format!("Missing fields: {}", missing.join(", ")),
                        )
                    }
                })
            }
        }
    }
}

fn check_status_code(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &StatusExpectation,
) -> AssertionResult {
    let actual = response.status;
    if expected.matches(actual) {
        AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Expected status {}, got {}", expected.description(), actual),
        )
    }
}

fn check_response_time(
    assertion: &Assertion,
    response: &ResponseSpec,
    within: impl Fn(u64) -> bool,
    bound: impl Fn() -> String,
) -> AssertionResult {
    let actual_ms = millis(response.duration);
    if within(actual_ms) {
        AssertionResult::pass_with_value(assertion.clone(), format!("{actual_ms}ms"))
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            format!("{actual_ms}ms"),
            format!("Response took {actual_ms}ms, {}", bound()),
        )
    }
}

fn check_content_type(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &str,
) -> AssertionResult {
    match &response.content_type {
        Some(actual) if actual.contains(expected) => {
            AssertionResult::pass_with_value(assertion.clone(), actual.clone())
        }
        Some(actual) => AssertionResult::fail_with_value(
            assertion.clone(),
            actual.clone(),
            format!("Content-Type '{actual}' does not contain '{expected}'"),
        ),
        None => AssertionResult::fail(
            assertion.clone(),
            "No Content-Type header present".to_string(),
        ),
    }
}

fn check_body_equals(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &str,
) -> AssertionResult {
    if response.body == expected {
        AssertionResult::pass(assertion.clone())
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            response.body_preview(),
            format!(
                "Body does not match expected value ({} bytes, expected {})",
                response.body.len(),
                expected.len()
            ),
        )
    }
}

/// Parses the body and hands it to `check`, failing the assertion on
/// invalid JSON.
fn with_json(
    assertion: &Assertion,
    response: &ResponseSpec,
    check: impl FnOnce(Value) -> AssertionResult,
) -> AssertionResult {
    match response.json() {
        Ok(json) => check(json),
        Err(e) => AssertionResult::fail_with_value(
            assertion.clone(),
            response.body_preview(),
            format!("Failed to parse body as JSON: {e}"),
        ),
    }
}

fn with_path(
    assertion: &Assertion,
    response: &ResponseSpec,
    path: &str,
    check: impl FnOnce(Option<Value>) -> AssertionResult,
) -> AssertionResult {
    with_json(assertion, response, |json| match query_json_path(&json, path) {
        Ok(value) => check(value),
        Err(e) => AssertionResult::fail(assertion.clone(), format!("Invalid JSON path '{path}': {e}")),
    })
}

fn with_array(
    assertion: &Assertion,
    response: &ResponseSpec,
    path: &str,
    check: impl FnOnce(&[Value]) -> AssertionResult,
) -> AssertionResult {
    with_path(assertion, response, path, |value| match value {
        Some(Value::Array(items)) => check(&items),
        Some(other) => AssertionResult::fail_with_value(
            assertion.clone(),
            other.to_string(),
            format!("JSON path '{path}' is not an array"),
        ),
        None => AssertionResult::fail(assertion.clone(), format!("JSON path '{path}' not found")),
    })
}

/// Compare two JSON values using the given operator.
fn compare_json_values(
    actual: &Value,
    operator: ComparisonOperator,
    expected: &Value,
) -> Result<bool, String> {
    Ok(match operator {
        ComparisonOperator::Equals => actual == expected,
        ComparisonOperator::NotEquals => actual != expected,
        ComparisonOperator::GreaterThan => compare_numeric(actual, expected, |a, b| a > b),
        ComparisonOperator::GreaterThanOrEqual => compare_numeric(actual, expected, |a, b| a >= b),
        ComparisonOperator::LessThan => compare_numeric(actual, expected, |a, b| a < b),
        ComparisonOperator::LessThanOrEqual => compare_numeric(actual, expected, |a, b| a <= b),
        ComparisonOperator::Contains => match (actual, expected) {
            (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
            (Value::Array(arr), _) => arr.contains(expected),
            _ => false,
        },
        ComparisonOperator::Matches => match (actual, expected) {
            (Value::String(s), Value::String(pattern)) => Regex::new(pattern)
                .map_err(|e| format!("Invalid regex pattern '{pattern}': {e}"))?
                .is_match(s),
            _ => false,
        },
    })
}

fn compare_numeric(actual: &Value, expected: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}
