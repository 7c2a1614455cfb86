use std::time::Duration;

use pixelrelay_config::{Config, EditingStrategy, PLACEHOLDER_API_KEY};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    client::GenerationClient,
    error::{ImageGenError, Result},
    http_client::build_http_client,
    referencer::{ImageReferencer, inline::InlineEncoder, upload::UploadReferencer},
    storage::BlobStorage,
    types::{GenerateImageResponse, GenerationRequest},
};

/// Image request handler state: the upstream client and the editing strategy
pub struct Server {
    client: GenerationClient,
    referencer: Box<dyn ImageReferencer>,
}

impl Server {
    /// Run a validated request against the generation service
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerateImageResponse> {
        let result = match &request {
            GenerationRequest::TextToImage { prompt } => self.client.generate(prompt).await?,
            GenerationRequest::ImageEditing { prompt, images } => {
                tracing::debug!(strategy = self.referencer.name(), "preparing source images");

                let image_urls = self.referencer.reference(images).await?;
                self.client.edit(prompt, &image_urls).await?
            }
        };

        let prompt = match request {
            GenerationRequest::TextToImage { prompt } | GenerationRequest::ImageEditing { prompt, .. } => prompt,
        };

        let response = result.into_response(prompt)?;

        tracing::info!(url = %response.url, "image generated");

        Ok(response)
    }

    /// Name of the configured image-editing strategy
    pub fn editing_strategy(&self) -> &'static str {
        self.referencer.name()
    }
}

/// Builder for constructing the image handler from configuration
pub struct ImageGenServerBuilder<'a> {
    config: &'a Config,
}

impl<'a> ImageGenServerBuilder<'a> {
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<Server> {
        let generation = &self.config.generation;
        let http = build_http_client(generation.timeout_secs.map(Duration::from_secs))?;

        let api_key = resolve_api_key(generation.api_key.as_ref(), generation.require_api_key)?;
        let client = GenerationClient::new(http.clone(), &generation.base_url, api_key);

        let referencer: Box<dyn ImageReferencer> = match self.config.editing.strategy {
            EditingStrategy::Inline => {
                if self.config.editing.storage.is_some() {
                    tracing::warn!("[editing.storage] is ignored with the inline editing strategy");
                }

                Box::new(InlineEncoder)
            }
            EditingStrategy::Upload => {
                let storage = self.config.editing.storage.as_ref().ok_or_else(|| {
                    ImageGenError::ConfigError("upload strategy requires [editing.storage]".to_string())
                })?;

                Box::new(UploadReferencer::new(BlobStorage::new(
                    http,
                    &storage.base_url,
                    storage.token.clone(),
                )))
            }
        };

        tracing::debug!(
            base_url = %generation.base_url,
            strategy = referencer.name(),
            "image handler initialized"
        );

        Ok(Server { client, referencer })
    }
}

/// Pick the configured key, or the placeholder when none is set and none is required
fn resolve_api_key(configured: Option<&SecretString>, required: bool) -> Result<SecretString> {
    match configured.filter(|key| !key.expose_secret().is_empty()) {
        Some(key) => Ok(key.clone()),
        None if required => Err(ImageGenError::ConfigError(
            "generation API key is required but not configured".to_string(),
        )),
        None => {
            tracing::warn!("no generation API key configured, sending placeholder credential");
            Ok(SecretString::from(PLACEHOLDER_API_KEY))
        }
    }
}
