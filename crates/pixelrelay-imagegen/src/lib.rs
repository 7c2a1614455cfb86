#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod client;
mod error;
mod http_client;
mod referencer;
mod request;
mod server;
mod storage;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use tracing::Instrument;

pub use error::{GENERATION_FAILED, ImageGenError, Result};
pub use request::{ExtractImageForm, ImageForm};
pub use server::{ImageGenServerBuilder, Server};
pub use types::{GenerateImageResponse, GeneratedImage, GenerationRequest, GenerationResult, ImageUpload, Mode};

/// Path of the image generation endpoint
pub const GENERATE_IMAGE_PATH: &str = "/api/generate-image";

/// Build the image handler from configuration
///
/// # Errors
///
/// Returns an error if the handler fails to initialize
pub fn build_server(config: &pixelrelay_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        ImageGenServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize image handler: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for image generation
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new().route(GENERATE_IMAGE_PATH, post(generate_image))
}

/// Handle one image form submission
async fn generate_image(
    State(server): State<Arc<Server>>,
    ExtractImageForm(form): ExtractImageForm,
) -> Result<Json<GenerateImageResponse>> {
    let span = tracing::info_span!(
        "image_request",
        request_id = %uuid::Uuid::new_v4(),
        mode = tracing::field::Empty,
    );

    process(&server, form).instrument(span).await.map(Json)
}

/// Validate the form and run it, logging the outcome inside the request span
async fn process(server: &Server, form: ImageForm) -> Result<GenerateImageResponse> {
    let request = form.validate().inspect_err(|e| {
        tracing::debug!(error = %e, "rejected image request");
    })?;

    tracing::Span::current().record("mode", request.mode().as_str());
    tracing::debug!(prompt = %request.prompt(), "image request accepted");

    server.generate(request).await.inspect_err(|e| {
        tracing::error!(error = %e, "image generation failed");
    })
}
