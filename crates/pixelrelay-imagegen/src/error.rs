use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Top-level message for every failure past validation
pub const GENERATION_FAILED: &str = "Failed to generate image";

/// Image request errors
///
/// Validation variants map to 400 and carry only an `error` message.
/// Everything else, including an unreadable form body, maps to 500 with
/// the cause in `details`.
#[derive(Debug, Error)]
pub enum ImageGenError {
    /// `mode` or `prompt` missing or empty
    #[error("Mode and prompt are required")]
    MissingFields,

    /// `mode` is not a recognized value
    #[error("Invalid mode. Must be 'text-to-image' or 'image-editing'")]
    InvalidMode(String),

    /// Editing mode without both source images
    #[error("Two images are required for editing mode")]
    MissingImages,

    /// Body could not be read as multipart form data
    #[error("Invalid form submission: {0}")]
    InvalidForm(String),

    /// Body exceeded the configured limit
    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    /// Generation service answered with a non-success status
    #[error("API request failed: {status} - {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Generation service answered with something other than the expected JSON
    #[error("Invalid JSON response from API: {0}")]
    InvalidResponse(String),

    /// Generation service returned no images
    #[error("No images generated")]
    NoImages,

    /// Network or connection error talking to an upstream
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Object storage rejected or failed an upload
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Handler could not be built from configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ImageGenError {
    /// Whether this error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFields
                | Self::InvalidMode(_)
                | Self::MissingImages
                | Self::PayloadTooLarge(_)
        )
    }

    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body returned to callers
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ImageGenError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = if self.is_client_error() {
            ErrorResponse {
                error: self.to_string(),
                details: None,
            }
        } else {
            ErrorResponse {
                error: GENERATION_FAILED.to_string(),
                details: Some(self.to_string()),
            }
        };

        (status, Json(body)).into_response()
    }
}
