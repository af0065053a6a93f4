//! Runs the scenario catalog against an in-process stand-in of the API.
//!
//! These tests need no network access. The stub reproduces the public
//! service's documented behaviour, including not enforcing the credential
//! header, so the catalog's known failure shows up as an expected failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod helpers;

use std::time::Duration;

use pretty_assertions::assert_eq;
use reqres_application::ConformanceConfig;
use reqres_application::catalog;
use reqres_application::ports::HttpClient;
use reqres_domain::request::{RequestBody, RequestSpec};
use reqres_domain::{ListPage, Resource, ScenarioOutcome, Single, User, UserEcho};
use reqres_infrastructure::{ConformanceRunner, ReqwestHttpClient};

use helpers::reqres_stub::{ReqresStub, StubOptions};

fn runner_for(stub: &ReqresStub) -> ConformanceRunner<ReqwestHttpClient> {
    let config = ConformanceConfig::with_base_url(stub.base_url().clone());
    let client = ReqwestHttpClient::new(Duration::from_secs(10)).expect("client");
    ConformanceRunner::new(client, config)
}

fn client() -> ReqwestHttpClient {
    ReqwestHttpClient::new(Duration::from_secs(10)).expect("client")
}

fn keyed(request: RequestSpec) -> RequestSpec {
    request.with_header("x-api-key", "reqres-free-v1")
}

#[tokio::test]
async fn full_catalog_matches_documented_behaviour() {
    let stub = ReqresStub::spawn(StubOptions::default()).await.expect("stub");
    let runner = runner_for(&stub);

    let report = runner.run_all(&catalog::catalog()).await;

    for result in &report.scenarios {
        let expected = if result.scenario_id == "list_users_missing_credential" {
            ScenarioOutcome::ExpectedFailure
        } else {
            ScenarioOutcome::Passed
        };
        assert_eq!(
            result.outcome, expected,
            "{}: {:?}",
            result.scenario_id,
            result.failure_lines()
        );
    }
    assert!(report.is_success(), "{}", report.summary());
    assert_eq!(report.count(ScenarioOutcome::ExpectedFailure), 1);
    assert_eq!(report.scenarios.len(), catalog::catalog().len());
}

#[tokio::test]
async fn delay_scenario_waits_at_least_the_requested_time() {
    let stub = ReqresStub::spawn(StubOptions::default()).await.expect("stub");
    let runner = runner_for(&stub);

    let result = runner
        .run_scenario(&catalog::find("list_users_with_delay").expect("scenario"))
        .await;

    assert_eq!(result.outcome, ScenarioOutcome::Passed);
    assert!(result.duration_ms >= catalog::DELAY_SECS * 1000);
}

#[tokio::test]
async fn enforced_credential_turns_known_failure_into_unexpected_pass() {
    let stub = ReqresStub::spawn(StubOptions::enforce_key()).await.expect("stub");
    let runner = runner_for(&stub);
    let scenarios = catalog::select(&["list_users_missing_credential", "list_users_page_1"]).unwrap();

    let report = runner.run_all(&scenarios).await;

    let missing = report.get("list_users_missing_credential").unwrap();
    assert_eq!(missing.outcome, ScenarioOutcome::UnexpectedPass);
    assert_eq!(missing.status, Some(401));
    assert_eq!(
        report.get("list_users_page_1").unwrap().outcome,
        ScenarioOutcome::Passed
    );
    assert!(!report.is_success());
}

#[tokio::test]
async fn wrong_credential_fails_only_that_run() {
    let stub = ReqresStub::spawn(StubOptions::enforce_key()).await.expect("stub");
    let mut config = ConformanceConfig::with_base_url(stub.base_url().clone());
    config.api_key = "not-the-key".to_string();
    let runner = ConformanceRunner::new(client(), config);

    let result = runner
        .run_scenario(&catalog::find("single_user_exists").unwrap())
        .await;

    assert_eq!(result.outcome, ScenarioOutcome::Failed);
    assert_eq!(result.status, Some(401));
}

#[tokio::test]
async fn single_user_has_typed_shape() {
    let stub = ReqresStub::spawn(StubOptions::default()).await.expect("stub");
    let response = client()
        .execute(stub.base_url(), &keyed(RequestSpec::get("/users/2")))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let user: Single<User> = serde_json::from_str(&response.body).unwrap();
    assert_eq!(user.data.id, 2);
    assert!(!user.data.email.is_empty());
    assert!(!user.support.url.is_empty());
}

#[tokio::test]
async fn omitted_page_equals_page_one() {
    let stub = ReqresStub::spawn(StubOptions::default()).await.expect("stub");
    let client = client();

    for path in ["/users", "/unknown"] {
        let first = client
            .execute(stub.base_url(), &keyed(RequestSpec::get(path).with_query("page", "1")))
            .await
            .unwrap();
        let omitted = client
            .execute(stub.base_url(), &keyed(RequestSpec::get(path)))
            .await
            .unwrap();

        assert_eq!(first.status, omitted.status);
        assert_eq!(first.json().unwrap(), omitted.json().unwrap(), "{path}");
    }
}

#[tokio::test]
async fn out_of_range_page_is_empty() {
    let stub = ReqresStub::spawn(StubOptions::default()).await.expect("stub");
    let response = client()
        .execute(
            stub.base_url(),
            &keyed(RequestSpec::get("/unknown").with_query("page", "999")),
        )
        .await
        .unwrap();

    let page: ListPage<Resource> = serde_json::from_str(&response.body).unwrap();
    assert_eq!(page.page, 999);
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn repeated_lookup_is_idempotent() {
    let stub = ReqresStub::spawn(StubOptions::default()).await.expect("stub");
    let client = client();
    let request = keyed(RequestSpec::get("/unknown/2"));

    let first = client.execute(stub.base_url(), &request).await.unwrap();
    let second = client.execute(stub.base_url(), &request).await.unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn create_echoes_payload_verbatim() {
    let stub = ReqresStub::spawn(StubOptions::default()).await.expect("stub");
    let request = keyed(
        RequestSpec::post("/users")
            .with_body(RequestBody::json([("name", "morpheus"), ("job", "leader")])),
    );

    let response = client().execute(stub.base_url(), &request).await.unwrap();

    assert_eq!(response.status, 201);
    let echo: UserEcho = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echo.name.as_deref(), Some("morpheus"));
    assert_eq!(echo.job.as_deref(), Some("leader"));
    assert!(echo.id.is_some());
    assert!(echo.created_at.is_some());
    assert!(echo.updated_at.is_none());
}

#[tokio::test]
async fn delete_has_empty_body() {
    let stub = ReqresStub::spawn(StubOptions::default()).await.expect("stub");
    let response = client()
        .execute(stub.base_url(), &keyed(RequestSpec::delete("/users/2")))
        .await
        .unwrap();

    assert_eq!(response.status, 204);
    assert_eq!(response.body, "");
}
