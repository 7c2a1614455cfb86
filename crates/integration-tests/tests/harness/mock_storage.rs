//! Mock blob storage for the upload editing strategy

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;

/// Public host returned for stored objects
pub const CDN_BASE: &str = "https://cdn.test";

/// One upload as seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub name: String,
    pub content_type: Option<String>,
    pub access: Option<String>,
    pub authorization: Option<String>,
    pub len: usize,
}

/// Mock storage service accepting `PUT /uploads/{name}`
pub struct MockStorage {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockStorageState>,
}

struct MockStorageState {
    uploads: Mutex<Vec<RecordedUpload>>,
    /// Uploads whose name contains this string fail with 503
    fail_matching: Option<String>,
    /// When set, each upload waits here until the other one arrives
    rendezvous: Option<Barrier>,
}

impl MockStorage {
    /// Start a storage mock that accepts every upload
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(None, None).await
    }

    /// Start a storage mock that fails uploads whose name contains `pattern`
    pub async fn start_failing(pattern: &str) -> anyhow::Result<Self> {
        Self::start_inner(Some(pattern.to_owned()), None).await
    }

    /// Start a storage mock that only succeeds if two uploads are in flight together
    pub async fn start_requiring_concurrency() -> anyhow::Result<Self> {
        Self::start_inner(None, Some(Barrier::new(2))).await
    }

    async fn start_inner(fail_matching: Option<String>, rendezvous: Option<Barrier>) -> anyhow::Result<Self> {
        let state = Arc::new(MockStorageState {
            uploads: Mutex::new(Vec::new()),
            fail_matching,
            rendezvous,
        });

        let app = Router::new()
            .route("/uploads/{*name}", routing::put(handle_put))
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

    /// Base URL for configuring the mock as object storage
    pub fn base_url(&self) -> String {
        format!("http://{}/uploads", self.addr)
    }

    /// Successful uploads in arrival order
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.uploads.lock().unwrap().clone()
    }
}

impl Drop for MockStorage {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn header_value(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

async fn handle_put(
    State(state): State<Arc<MockStorageState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Response {
    if let Some(ref rendezvous) = state.rendezvous
        && tokio::time::timeout(Duration::from_secs(2), rendezvous.wait()).await.is_err()
    {
        return (StatusCode::INTERNAL_SERVER_ERROR, "uploads were not concurrent").into_response();
    }

    if state.fail_matching.as_deref().is_some_and(|pattern| name.contains(pattern)) {
        return (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable").into_response();
    }

    state.uploads.lock().unwrap().push(RecordedUpload {
        name: name.clone(),
        content_type: header_value(&headers, header::CONTENT_TYPE),
        access: header_value(&headers, "x-access"),
        authorization: header_value(&headers, header::AUTHORIZATION),
        len: body.len(),
    });

    Json(serde_json::json!({
        "url": format!("{CDN_BASE}/{name}"),
        "pathname": name,
    }))
    .into_response()
}
