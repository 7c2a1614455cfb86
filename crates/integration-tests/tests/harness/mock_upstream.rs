//! Mock generation service for integration tests
//!
//! Answers `/v1/generate` and `/v1/edit` with one scripted reply and
//! records what it was sent

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::{Router, routing};
use tokio_util::sync::CancellationToken;

/// Reply used when none is scripted
pub const DEFAULT_REPLY: &str = r#"{"images":[{"url":"https://x/img.jpg"}],"description":"a cat"}"#;

/// Mock generation service with a fixed reply
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockUpstreamState>,
}

/// One request as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

struct MockUpstreamState {
    generate_count: AtomicU32,
    edit_count: AtomicU32,
    status: StatusCode,
    body: String,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockUpstream {
    /// Start a mock that answers with [`DEFAULT_REPLY`]
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(200, DEFAULT_REPLY).await
    }

    /// Start a mock that answers every call with `status` and `body`
    pub async fn start_with(status: u16, body: &str) -> anyhow::Result<Self> {
        let state = Arc::new(MockUpstreamState {
            generate_count: AtomicU32::new(0),
            edit_count: AtomicU32::new(0),
            status: StatusCode::from_u16(status)?,
            body: body.to_owned(),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/generate", routing::post(handle))
            .route("/v1/edit", routing::post(handle))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the generation service
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of `/v1/generate` calls received
    pub fn generate_count(&self) -> u32 {
        self.state.generate_count.load(Ordering::Relaxed)
    }

    /// Number of `/v1/edit` calls received
    pub fn edit_count(&self) -> u32 {
        self.state.edit_count.load(Ordering::Relaxed)
    }

    /// Total calls received
    pub fn call_count(&self) -> u32 {
        self.generate_count() + self.edit_count()
    }

    /// Most recent request, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.requests.lock().unwrap().last().cloned()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle(
    State(state): State<Arc<MockUpstreamState>>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    match uri.path() {
        "/v1/generate" => state.generate_count.fetch_add(1, Ordering::Relaxed),
        _ => state.edit_count.fetch_add(1, Ordering::Relaxed),
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_owned(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
    });

    (state.status, state.body.clone())
}
