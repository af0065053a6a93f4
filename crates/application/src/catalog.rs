//! The conformance scenario catalog.
//!
//! One scenario per documented API behaviour. Each builds its own request
//! and assertion list; nothing is shared between scenarios except the
//! constants below.

use reqres_domain::request::{RequestBody, RequestSpec};
use reqres_domain::{Assertion, ComparisonOperator, Scenario, StatusExpectation, TestSuite};
use serde_json::json;

use crate::error::{ApplicationError, ApplicationResult};

/// Users collection path.
pub const USERS_PATH: &str = "/users";
/// Colour resources collection path.
pub const RESOURCES_PATH: &str = "/unknown";
/// Records per page served by the API.
pub const PAGE_SIZE: usize = 6;
/// A page number past the end of every collection.
pub const OUT_OF_RANGE_PAGE: &str = "999";
/// Id that exists in both collections.
pub const EXISTING_ID: u32 = 2;
/// Id that exists in neither collection.
pub const MISSING_ID: u32 = 23;
/// Id that is not numeric.
pub const INVALID_ID: &str = "abc";
/// Server-side delay requested by the delay scenario, in seconds.
pub const DELAY_SECS: u64 = 3;

const USER_FIELDS: [&str; 5] = ["id", "email", "first_name", "last_name", "avatar"];
const RESOURCE_FIELDS: [&str; 5] = ["id", "name", "year", "color", "pantone_value"];

const NAME: &str = "morpheus";
const CREATE_JOB: &str = "leader";
const UPDATE_JOB: &str = "zion resident";
const PATCH_JOB: &str = "matrix operator";

/// Known-failure reason for the missing-credential scenario.
pub const MISSING_CREDENTIAL_REASON: &str =
    "the public service answers 200 without the credential header";

/// Returns every scenario, in execution order.
#[must_use]
pub fn catalog() -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    scenarios.extend(list_users());
    scenarios.extend(single_user());
    scenarios.extend(list_resources());
    scenarios.extend(single_resource());
    scenarios.extend(mutations());
    scenarios
}

/// Returns the scenario with the given id.
#[must_use]
pub fn find(id: &str) -> Option<Scenario> {
    catalog().into_iter().find(|s| s.id == id)
}

/// Returns the scenarios named in `ids`, in the order given, or the whole
/// catalog when `ids` is empty.
///
/// # Errors
///
/// Returns [`ApplicationError::UnknownScenario`] for the first id the
/// catalog does not contain.
pub fn select<S: AsRef<str>>(ids: &[S]) -> ApplicationResult<Vec<Scenario>> {
    if ids.is_empty() {
        return Ok(catalog());
    }
    ids.iter()
        .map(|id| {
            find(id.as_ref()).ok_or_else(|| ApplicationError::UnknownScenario(id.as_ref().into()))
        })
        .collect()
}

/// Status check plus, for anything but 204, a JSON content type.
fn suite(id: &str, status: u16) -> TestSuite {
    let suite = TestSuite::new(id).with_assertion(Assertion::status(status));
    if status == 204 {
        return suite;
    }
    suite.with_assertions([
        Assertion::ContentType {
            expected: "application/json".to_string(),
        },
        Assertion::IsJson,
    ])
}

fn page_length(length: usize) -> Assertion {
    Assertion::ArrayLength {
        path: "$.data".to_string(),
        length,
    }
}

fn each_has(fields: &[&str]) -> Assertion {
    Assertion::EachItemHasFields {
        path: "$.data".to_string(),
        fields: fields.iter().map(ToString::to_string).collect(),
    }
}

fn record_has<'a>(fields: &'a [&'a str]) -> impl Iterator<Item = Assertion> + 'a {
    fields.iter().map(|f| Assertion::has(format!("$.data.{f}")))
}

fn support_block() -> [Assertion; 2] {
    [Assertion::has("$.support.url"), Assertion::has("$.support.text")]
}

fn empty_object() -> Assertion {
    Assertion::JsonBodyEquals { expected: json!({}) }
}

fn list_users() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "list_users_page_1",
            "page 1 of users holds a full page",
            RequestSpec::get(USERS_PATH).with_query("page", "1"),
        )
        .with_suite(suite("list_users_page_1", 200).with_assertion(page_length(PAGE_SIZE))),
        Scenario::new(
            "list_users_out_of_range_page",
            "a page past the end is an empty list",
            RequestSpec::get(USERS_PATH).with_query("page", OUT_OF_RANGE_PAGE),
        )
        .with_suite(suite("list_users_out_of_range_page", 200).with_assertion(page_length(0))),
        Scenario::new(
            "list_users_no_page_param",
            "omitting page serves page 1",
            RequestSpec::get(USERS_PATH),
        )
        .with_suite(
            suite("list_users_no_page_param", 200)
                .with_assertion(Assertion::equals("$.page", 1))
                .with_assertion(page_length(PAGE_SIZE)),
        ),
        Scenario::new(
            "list_users_record_shape",
            "every listed user carries the documented fields",
            RequestSpec::get(USERS_PATH),
        )
        .with_suite(
            suite("list_users_record_shape", 200)
                .with_assertion(page_length(PAGE_SIZE))
                .with_assertion(each_has(&USER_FIELDS))
                .with_assertions(support_block()),
        ),
        Scenario::new(
            "list_users_missing_credential",
            "listing without the credential header is rejected",
            RequestSpec::get(USERS_PATH).with_query("page", "1"),
        )
        .without_credential()
        .known_failure(MISSING_CREDENTIAL_REASON)
        .with_suite(TestSuite::new("list_users_missing_credential").with_assertion(
            Assertion::StatusCode {
                expected: StatusExpectation::OneOf(vec![401, 403]),
            },
        )),
        Scenario::new(
            "list_users_with_delay",
            "the delay parameter holds the response back",
            RequestSpec::get(USERS_PATH)
                .with_query("page", "1")
                .with_query("delay", DELAY_SECS.to_string()),
        )
        .with_suite(suite("list_users_with_delay", 200).with_assertion(
            Assertion::MinResponseTime {
                min_ms: DELAY_SECS * 1000,
            },
        )),
    ]
}

fn single_user() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "single_user_exists",
            "an existing user is returned with its support block",
            RequestSpec::get(format!("{USERS_PATH}/{EXISTING_ID}")),
        )
        .with_suite(
            suite("single_user_exists", 200)
                .with_assertion(Assertion::equals("$.data.id", EXISTING_ID))
                .with_assertions(record_has(&USER_FIELDS[1..]))
                .with_assertion(Assertion::JsonPathMatches {
                    path: "$.data.email".to_string(),
                    operator: ComparisonOperator::Matches,
                    value: json!(r"^\S+$"),
                })
                .with_assertions(support_block()),
        ),
        Scenario::new(
            "single_user_not_found",
            "an unknown user id is 404 with an empty object",
            RequestSpec::get(format!("{USERS_PATH}/{MISSING_ID}")),
        )
        .with_suite(suite("single_user_not_found", 404).with_assertion(empty_object())),
        Scenario::new(
            "single_user_invalid_id",
            "a non-numeric user id is 404 with an empty object",
            RequestSpec::get(format!("{USERS_PATH}/{INVALID_ID}")),
        )
        .with_suite(suite("single_user_invalid_id", 404).with_assertion(empty_object())),
    ]
}

fn list_resources() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "list_resources",
            "the resource list holds a full page of complete records",
            RequestSpec::get(RESOURCES_PATH),
        )
        .with_suite(
            suite("list_resources", 200)
                .with_assertion(page_length(PAGE_SIZE))
                .with_assertion(each_has(&RESOURCE_FIELDS))
                .with_assertions(support_block()),
        ),
        Scenario::new(
            "list_resources_out_of_range_page",
            "a resource page past the end is an empty list",
            RequestSpec::get(RESOURCES_PATH).with_query("page", OUT_OF_RANGE_PAGE),
        )
        .with_suite(suite("list_resources_out_of_range_page", 200).with_assertion(page_length(0))),
        Scenario::new(
            "list_resources_no_page_param",
            "omitting page serves resource page 1",
            RequestSpec::get(RESOURCES_PATH),
        )
        .with_suite(
            suite("list_resources_no_page_param", 200)
                .with_assertion(Assertion::equals("$.page", 1))
                .with_assertion(page_length(PAGE_SIZE)),
        ),
    ]
}

fn single_resource() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "single_resource_exists",
            "an existing resource is returned with its support block",
            RequestSpec::get(format!("{RESOURCES_PATH}/{EXISTING_ID}")),
        )
        .with_suite(
            suite("single_resource_exists", 200)
                .with_assertion(Assertion::equals("$.data.id", EXISTING_ID))
                .with_assertions(record_has(&RESOURCE_FIELDS[1..]))
                .with_assertions(support_block()),
        ),
        Scenario::new(
            "single_resource_not_found",
            "an unknown resource id is 404 with an empty object",
            RequestSpec::get(format!("{RESOURCES_PATH}/{MISSING_ID}")),
        )
        .with_suite(suite("single_resource_not_found", 404).with_assertion(empty_object())),
        Scenario::new(
            "single_resource_invalid_id",
            "a non-numeric resource id is 404 with an empty object",
            RequestSpec::get(format!("{RESOURCES_PATH}/{INVALID_ID}")),
        )
        .with_suite(suite("single_resource_invalid_id", 404).with_assertion(empty_object())),
    ]
}

fn mutations() -> Vec<Scenario> {
    let user_path = format!("{USERS_PATH}/{EXISTING_ID}");
    let job_absent = || Assertion::JsonPathAbsentOrNull {
        path: "$.job".to_string(),
    };

    vec![
        Scenario::new(
            "create_user",
            "creating a user echoes the payload with id and createdAt",
            RequestSpec::post(USERS_PATH)
                .with_body(RequestBody::json([("name", NAME), ("job", CREATE_JOB)])),
        )
        .with_suite(suite("create_user", 201).with_assertions([
            Assertion::equals("$.name", NAME),
            Assertion::equals("$.job", CREATE_JOB),
            Assertion::has("$.id"),
            Assertion::has("$.createdAt"),
        ])),
        Scenario::new(
            "create_user_missing_job",
            "creating a user without job does not invent one",
            RequestSpec::post(USERS_PATH).with_body(RequestBody::json([("name", NAME)])),
        )
        .with_suite(suite("create_user_missing_job", 201).with_assertions([
            Assertion::equals("$.name", NAME),
            job_absent(),
            Assertion::has("$.id"),
            Assertion::has("$.createdAt"),
        ])),
        Scenario::new(
            "update_user",
            "replacing a user echoes the payload with updatedAt",
            RequestSpec::put(user_path.clone())
                .with_body(RequestBody::json([("name", NAME), ("job", UPDATE_JOB)])),
        )
        .with_suite(suite("update_user", 200).with_assertions([
            Assertion::equals("$.name", NAME),
            Assertion::equals("$.job", UPDATE_JOB),
            Assertion::has("$.updatedAt"),
        ])),
        Scenario::new(
            "update_user_missing_job",
            "replacing a user without job does not invent one",
            RequestSpec::put(user_path.clone()).with_body(RequestBody::json([("name", NAME)])),
        )
        .with_suite(suite("update_user_missing_job", 200).with_assertions([
            Assertion::equals("$.name", NAME),
            job_absent(),
            Assertion::has("$.updatedAt"),
        ])),
        Scenario::new(
            "patch_user",
            "patching a user echoes the changed field",
            RequestSpec::patch(user_path.clone())
                .with_body(RequestBody::json([("job", PATCH_JOB)])),
        )
        .with_suite(suite("patch_user", 200).with_assertions([
            Assertion::equals("$.job", PATCH_JOB),
            Assertion::has("$.updatedAt"),
        ])),
        Scenario::new(
            "patch_user_empty_body",
            "patching with an empty object still stamps updatedAt",
            RequestSpec::patch(user_path.clone()).with_body(RequestBody::empty_object()),
        )
        .with_suite(
            suite("patch_user_empty_body", 200).with_assertion(Assertion::has("$.updatedAt")),
        ),
        Scenario::new(
            "delete_user",
            "deleting a user is 204 with an empty body",
            RequestSpec::delete(user_path),
        )
        .with_suite(suite("delete_user", 204).with_assertion(Assertion::BodyEquals {
            expected: String::new(),
        })),
    ]
}
