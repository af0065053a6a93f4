//! In-process stand-in for the reqres mock API.
//!
//! Serves the documented behaviour of `/users` and `/unknown` from fixture
//! records so the whole catalog can run without network access. Like the
//! public service, it does not check the credential header unless built
//! with [`StubOptions::enforce_key`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, extract::Request};
use chrono::{SecondsFormat, Utc};
use reqres_domain::{ListPage, Resource, Single, Support, User};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

const PER_PAGE: usize = 6;

/// Stub behaviour switches.
#[derive(Debug, Clone, Default)]
pub struct StubOptions {
    /// When set, requests without this `(header, value)` pair get 401.
    pub enforce_key: Option<(String, String)>,
}

impl StubOptions {
    /// Rejects requests lacking the default reqres credential.
    #[must_use]
    pub fn enforce_key() -> Self {
        Self {
            enforce_key: Some(("x-api-key".to_string(), "reqres-free-v1".to_string())),
        }
    }
}

#[derive(Clone)]
struct StubState {
    users: Arc<Vec<User>>,
    resources: Arc<Vec<Resource>>,
    options: StubOptions,
}

/// Handle for a running stub. The server stops when the handle drops.
pub struct ReqresStub {
    base_url: Url,
    task: JoinHandle<()>,
}

impl ReqresStub {
    /// Starts the stub on an ephemeral loopback port.
    pub async fn spawn(options: StubOptions) -> std::io::Result<Self> {
        let state = StubState {
            users: Arc::new(users()),
            resources: Arc::new(resources()),
            options,
        };
        let api = Router::new()
            .route("/users", get(list_users).post(create_user))
            .route(
                "/users/{id}",
                get(single_user)
                    .put(update_user)
                    .patch(update_user)
                    .delete(delete_user),
            )
            .route("/unknown", get(list_resources))
            .route("/unknown/{id}", get(single_resource))
            .layer(middleware::from_fn_with_state(state.clone(), check_key))
            .with_state(state);
        let app = Router::new().nest("/api", api);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        let base_url = Url::parse(&format!("http://{addr}/api"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        Ok(Self { base_url, task })
    }

    /// Returns the API base URL, e.g. `http://127.0.0.1:41234/api`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Drop for ReqresStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn check_key(
    State(state): State<StubState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    if let Some((name, value)) = &state.options.enforce_key {
        let presented = headers.get(name.as_str()).and_then(|v| v.to_str().ok());
        if presented != Some(value.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Missing API key"})),
            )
                .into_response();
        }
    }
    next.run(request).await
}

fn support() -> Support {
    Support {
        url: "https://contentcaddy.io?utm_source=reqres&utm_medium=json&utm_campaign=referral"
            .to_string(),
        text: "Tired of writing endless social media content? Let Content Caddy generate it for you."
            .to_string(),
    }
}

fn users() -> Vec<User> {
    let names = [
        ("George", "Bluth"),
        ("Janet", "Weaver"),
        ("Emma", "Wong"),
        ("Eve", "Holt"),
        ("Charles", "Morris"),
        ("Tracey", "Ramos"),
        ("Michael", "Lawson"),
        ("Lindsay", "Ferguson"),
        ("Tobias", "Funke"),
        ("Byron", "Fields"),
        ("George", "Edwards"),
        ("Rachel", "Howell"),
    ];
    (1u32..)
        .zip(names)
        .map(|(id, (first, last))| User {
            id,
            email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
            first_name: first.to_string(),
            last_name: last.to_string(),
            avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
        })
        .collect()
}

fn resources() -> Vec<Resource> {
    let colours = [
        ("cerulean", "#98B2D1", "15-4020"),
        ("fuchsia rose", "#C74375", "17-2031"),
        ("true red", "#BF1932", "19-1664"),
        ("aqua sky", "#7BC4C4", "14-4811"),
        ("tigerlily", "#E2583E", "17-1456"),
        ("blue turquoise", "#53B0AE", "15-5217"),
        ("sand dollar", "#DECDBE", "13-1106"),
        ("chili pepper", "#9B1B30", "19-1557"),
        ("blue iris", "#5A5B9F", "18-3943"),
        ("mimosa", "#F0C05A", "14-0848"),
        ("turquoise", "#45B5AA", "15-5519"),
        ("honeysuckle", "#D94F70", "18-2120"),
    ];
    (1u32..)
        .zip(colours)
        .map(|(id, (name, color, pantone))| Resource {
            id,
            name: name.to_string(),
            year: 1999 + u16::try_from(id).unwrap_or(0),
            color: color.to_string(),
            pantone_value: pantone.to_string(),
        })
        .collect()
}

fn page_of<T: Clone + Serialize>(records: &[T], params: &HashMap<String, String>) -> Json<ListPage<T>> {
    let page = params
        .get("page")
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let start = (page as usize - 1) * PER_PAGE;
    let data = records.iter().skip(start).take(PER_PAGE).cloned().collect();
    let total = records.len();

    Json(ListPage {
        page,
        per_page: PER_PAGE as u32,
        total: total as u32,
        total_pages: total.div_ceil(PER_PAGE) as u32,
        data,
        support: support(),
    })
}

async fn apply_delay(params: &HashMap<String, String>) {
    if let Some(secs) = params.get("delay").and_then(|d| d.parse::<u64>().ok()) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
}

fn single_of<T: Clone + Serialize>(records: &[T], id: &str, id_of: impl Fn(&T) -> u32) -> Response {
    let Ok(id) = id.parse::<u32>() else {
        return not_found();
    };
    match records.iter().find(|r| id_of(r) == id) {
        Some(record) => Json(Single {
            data: record.clone(),
            support: support(),
        })
        .into_response(),
        None => not_found(),
    }
}

async fn list_users(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<ListPage<User>> {
    apply_delay(&params).await;
    page_of(&state.users, &params)
}

async fn single_user(State(state): State<StubState>, Path(id): Path<String>) -> Response {
    single_of(&state.users, &id, |u| u.id)
}

async fn list_resources(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<ListPage<Resource>> {
    apply_delay(&params).await;
    page_of(&state.resources, &params)
}

async fn single_resource(State(state): State<StubState>, Path(id): Path<String>) -> Response {
    single_of(&state.resources, &id, |r| r.id)
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn create_user(Json(mut body): Json<Map<String, Value>>) -> (StatusCode, Json<Map<String, Value>>) {
    body.insert("id".to_string(), Value::from("713"));
    body.insert("createdAt".to_string(), Value::from(now()));
    (StatusCode::CREATED, Json(body))
}

async fn update_user(
    Path(_id): Path<String>,
    Json(mut body): Json<Map<String, Value>>,
) -> Json<Map<String, Value>> {
    body.insert("updatedAt".to_string(), Value::from(now()));
    Json(body)
}

async fn delete_user(Path(_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}
