use std::time::Duration;

use axum::http;
use reqwest::Client;

use crate::error::{ImageGenError, Result};

/// Build the outbound client shared by the generation and storage calls
///
/// Without a timeout a call waits for the full upstream round trip.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    let mut builder = Client::builder()
        .pool_idle_timeout(Some(Duration::from_secs(5)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers);

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .map_err(|e| ImageGenError::ConfigError(format!("failed to build HTTP client: {e}")))
}
