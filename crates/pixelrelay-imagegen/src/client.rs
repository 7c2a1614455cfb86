use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use url::Url;

use crate::{
    error::{ImageGenError, Result},
    types::{EditBody, GenerateBody, GenerationResult},
};

/// Images requested per text-to-image call
const NUM_IMAGES: u32 = 1;

/// Output format requested per text-to-image call
const OUTPUT_FORMAT: &str = "jpeg";

/// Client for the upstream generation service
pub(crate) struct GenerationClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl GenerationClient {
    pub fn new(client: Client, base_url: &Url, api_key: SecretString) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Generate an image from a prompt alone
    pub async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let body = GenerateBody {
            prompt,
            num_images: NUM_IMAGES,
            output_format: OUTPUT_FORMAT,
        };

        self.post("/v1/generate", &body).await
    }

    /// Edit using a prompt and two image references (data URIs or URLs)
    pub async fn edit(&self, prompt: &str, image_urls: &[String; 2]) -> Result<GenerationResult> {
        let body = EditBody { prompt, image_urls };

        self.post("/v1/edit", &body).await
    }

    /// POST a JSON body, read the reply as text, then parse it
    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<GenerationResult> {
        let url = format!("{}{path}", self.base_url);

        tracing::debug!(%url, "sending generation request");

        let response = self
            .client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%url, error = %e, "generation request failed");
                ImageGenError::ConnectionError(format!("Failed to send request to generation service: {e}"))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::error!(%url, %status, error = %e, "failed to read generation response body");
            ImageGenError::ConnectionError(format!("Failed to read generation service response: {e}"))
        })?;

        tracing::debug!(%status, body = %text, "generation service responded");

        if !status.is_success() {
            tracing::error!(%status, body = %text, "generation service returned an error");
            return Err(ImageGenError::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        GenerationResult::from_body(&text).map_err(|e| {
            tracing::error!(error = %e, body = %text, "failed to parse generation response");
            ImageGenError::InvalidResponse(text)
        })
    }
}
