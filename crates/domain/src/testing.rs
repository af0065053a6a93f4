//! Response testing and assertions.
//!
//! This module provides types for defining assertions on HTTP responses and
//! collecting their results.

use serde::{Deserialize, Serialize};

/// A test assertion to run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or set of codes.
        expected: StatusExpectation,
    },
    /// Response must take at most `max_ms`.
    ResponseTime {
        /// Maximum allowed time in milliseconds.
        max_ms: u64,
    },
    /// Response must take at least `min_ms` (induced server-side delay).
    MinResponseTime {
        /// Minimum time in milliseconds.
        min_ms: u64,
    },
    /// Check content type.
    ContentType {
        /// Expected content type (partial match).
        expected: String,
    },
    /// Check body is valid JSON.
    IsJson,
    /// Check the raw body equals a string exactly.
    BodyEquals {
        /// Expected body content.
        expected: String,
    },
    /// Check the body parses to exactly this JSON value.
    JsonBodyEquals {
        /// Expected JSON document.
        expected: serde_json::Value,
    },
    /// Check JSON path exists and optionally its value.
    JsonPath {
        /// Path expression (e.g., "$.data.id").
        path: String,
        /// Expected value (as JSON).
        expected: Option<serde_json::Value>,
    },
    /// Check JSON path value matches condition.
    JsonPathMatches {
        /// Path expression.
        path: String,
        /// Comparison operator.
        operator: ComparisonOperator,
        /// Value to compare against.
        value: serde_json::Value,
    },
    /// Check JSON path is missing or `null`.
    JsonPathAbsentOrNull {
        /// Path expression.
        path: String,
    },
    /// Check the array at a path has an exact length.
    ArrayLength {
        /// Path expression pointing at an array.
        path: String,
        /// Expected number of elements.
        length: usize,
    },
    /// Check every object in the array at a path has the given fields.
    EachItemHasFields {
        /// Path expression pointing at an array of objects.
        path: String,
        /// Field names each element must carry.
        fields: Vec<String>,
    },
}

impl Assertion {
    /// Shorthand for an exact status assertion.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Shorthand for a path-exists assertion.
    #[must_use]
    pub fn has(path: impl Into<String>) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: None,
        }
    }

    /// Shorthand for a path-equals assertion.
    #[must_use]
    pub fn equals(path: impl Into<String>, expected: impl Into<serde_json::Value>) -> Self {
        Self::JsonPath {
            path: path.into(),
            expected: Some(expected.into()),
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::ResponseTime { max_ms } => format!("Response time <= {max_ms}ms"),
            Self::MinResponseTime { min_ms } => format!("Response time >= {min_ms}ms"),
            Self::ContentType { expected } => format!("Content-Type contains '{expected}'"),
            Self::IsJson => "Body is valid JSON".to_string(),
            Self::BodyEquals { expected } if expected.is_empty() => "Body is empty".to_string(),
            Self::BodyEquals { .. } => "Body equals expected".to_string(),
            Self::JsonBodyEquals { expected } => format!("JSON body equals {expected}"),
            Self::JsonPath {
                path,
                expected: Some(v),
            } => format!("JSON {path} equals {v}"),
            Self::JsonPath {
                path,
                expected: None,
            } => format!("JSON {path} exists"),
            Self::JsonPathMatches {
                path,
                operator,
                value,
            } => format!("JSON {path} {} {value}", operator.symbol()),
            Self::JsonPathAbsentOrNull { path } => format!("JSON {path} is absent or null"),
            Self::ArrayLength { path, length } => format!("JSON {path} has {length} items"),
            Self::EachItemHasFields { path, fields } => {
                format!("Each item of {path} has [{}]", fields.join(", "))
            }
        }
    }
}

/// Expected status code value or set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }
}

/// Comparison operators for value assertions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// Equal to.
    Equals,
    /// Not equal to.
    NotEquals,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal to.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal to.
    LessThanOrEqual,
    /// Contains (for strings/arrays).
    Contains,
    /// Matches regex pattern (strings only).
    Matches,
}

impl ComparisonOperator {
    /// Get the symbol for this operator.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::Contains => "contains",
            Self::Matches => "matches",
        }
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }
}

/// An ordered list of assertions evaluated against one response.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TestSuite {
    /// Suite name.
    pub name: String,
    /// Assertions to run.
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
        }
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with_assertion(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Add several assertions (builder pattern).
    #[must_use]
    pub fn with_assertions(mut self, assertions: impl IntoIterator<Item = Assertion>) -> Self {
        self.assertions.extend(assertions);
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Get the number of assertions.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestResults {
    /// Test suite that was run.
    pub suite_name: String,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Total number of assertions run.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(suite_name: impl Into<String>, results: Vec<AssertionResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();

        Self {
            suite_name: suite_name.into(),
            results,
            total,
            passed,
            failed: total - passed,
        }
    }

    /// Check if all assertions passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Returns the failed assertion results.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}
