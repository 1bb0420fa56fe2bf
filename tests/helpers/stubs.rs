// ABOUTME: In-process stand-ins for the model endpoint and the hosted PostgREST table
// ABOUTME: Each stub binds 127.0.0.1:0 and records what it received

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub server failed");
    });
    format!("http://{addr}")
}

/// How the model stub answers
#[derive(Clone)]
pub enum ModelReply {
    /// 200 with this assistant message content
    Content(String),
    /// Non-success status with a raw body
    Failure(u16, String),
}

/// Stub chat-completions endpoint
#[derive(Clone)]
pub struct ModelStub {
    reply: ModelReply,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl ModelStub {
    /// Stub answering every call with `reply`
    pub fn new(reply: ModelReply) -> Self {
        Self {
            reply,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Stub answering with `workout` serialized as the message content
    pub fn workout(workout: &Value) -> Self {
        Self::new(ModelReply::Content(workout.to_string()))
    }

    /// Wait this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of completion requests received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Bodies of the completion requests received
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    /// Serve the stub and return the base URL to use as `OPENAI_BASE_URL`
    pub async fn start(&self) -> String {
        let router = Router::new()
            .route("/chat/completions", post(handle_completion))
            .with_state(self.clone());
        spawn(router).await
    }
}

async fn handle_completion(State(stub): State<ModelStub>, Json(body): Json<Value>) -> Response {
    stub.calls.fetch_add(1, Ordering::SeqCst);
    stub.requests.lock().unwrap().push(body);

    if !stub.delay.is_zero() {
        tokio::time::sleep(stub.delay).await;
    }

    match stub.reply {
        ModelReply::Content(content) => Json(json!({
            "id": "chatcmpl-test",
            "model": "gpt-4",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 100, "completion_tokens": 200, "total_tokens": 300}
        }))
        .into_response(),
        ModelReply::Failure(status, body) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
    }
}

/// Stub PostgREST table with a unique `date` column
#[derive(Clone, Default)]
pub struct PostgrestStub {
    rows: Arc<Mutex<Vec<Value>>>,
    api_keys: Arc<Mutex<Vec<String>>>,
}

impl PostgrestStub {
    /// Stored rows, including the server-assigned `id`
    pub fn rows(&self) -> Vec<Value> {
        self.rows.lock().unwrap().clone()
    }

    /// `apikey` header of every request received
    pub fn api_keys(&self) -> Vec<String> {
        self.api_keys.lock().unwrap().clone()
    }

    /// Seed a row directly, bypassing the duplicate check
    pub fn seed(&self, mut row: Value) {
        let mut rows = self.rows.lock().unwrap();
        row["id"] = json!(rows.len() + 1);
        rows.push(row);
    }

    /// Serve `/rest/v1/{table}` and return the project base URL
    pub async fn start(&self, table: &str) -> String {
        let router = Router::new()
            .route(
                &format!("/rest/v1/{table}"),
                get(handle_select).post(handle_insert),
            )
            .with_state(self.clone());
        spawn(router).await
    }

    fn record_key(&self, headers: &HeaderMap) {
        let key = headers
            .get("apikey")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        self.api_keys.lock().unwrap().push(key);
    }
}

async fn handle_select(
    State(stub): State<PostgrestStub>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    stub.record_key(&headers);

    let mut rows = stub.rows();
    if let Some(date) = params.get("date").and_then(|d| d.strip_prefix("eq.")) {
        rows.retain(|row| row["date"] == date);
    }
    if params.get("order").map(String::as_str) == Some("date.asc") {
        rows.sort_by(|a, b| a["date"].as_str().cmp(&b["date"].as_str()));
    }
    if let Some(limit) = params.get("limit").and_then(|l| l.parse().ok()) {
        rows.truncate(limit);
    }
    Json(rows)
}

async fn handle_insert(
    State(stub): State<PostgrestStub>,
    headers: HeaderMap,
    Json(body): Json<Vec<Value>>,
) -> Response {
    stub.record_key(&headers);

    let mut inserted = Vec::new();
    {
        let mut rows = stub.rows.lock().unwrap();
        for mut row in body {
            if rows.iter().any(|r| r["date"] == row["date"]) {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "code": "23505",
                        "message": "duplicate key value violates unique constraint \"workouts_date_key\""
                    })),
                )
                    .into_response();
            }
            row["id"] = json!(rows.len() + 1);
            rows.push(row.clone());
            inserted.push(row);
        }
    }

    (StatusCode::CREATED, Json(inserted)).into_response()
}
