use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::{
    error::{ImageGenError, Result},
    types::ImageUpload,
};

/// Header marking an uploaded object as publicly readable
const ACCESS_HEADER: &str = "x-access";

/// Client for the blob storage service used by the upload strategy
pub(crate) struct BlobStorage {
    client: Client,
    base_url: String,
    token: SecretString,
}

/// Reply to a successful upload
#[derive(Deserialize)]
struct PutBlobResponse {
    url: String,
}

impl BlobStorage {
    pub fn new(client: Client, base_url: &Url, token: SecretString) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Upload one file under `pathname` and return its public URL
    pub async fn put(&self, pathname: &str, image: &ImageUpload) -> Result<String> {
        let url = format!("{}/{pathname}", self.base_url);

        tracing::debug!(%pathname, bytes = image.bytes.len(), "uploading source image");

        let response = self
            .client
            .put(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header(reqwest::header::CONTENT_TYPE, &image.content_type)
            .header(ACCESS_HEADER, "public")
            .body(image.bytes.clone())
            .send()
            .await
            .map_err(|e| {
                tracing::error!(%pathname, error = %e, "upload request failed");
                ImageGenError::UploadFailed(format!("{pathname}: {e}"))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(%pathname, %status, "storage service rejected upload");

            return Err(ImageGenError::UploadFailed(format!(
                "{pathname}: {} - {error_text}",
                status.as_u16()
            )));
        }

        let uploaded: PutBlobResponse = response.json().await.map_err(|e| {
            tracing::error!(%pathname, error = %e, "failed to parse storage response");
            ImageGenError::UploadFailed(format!("{pathname}: unexpected storage response: {e}"))
        })?;

        tracing::debug!(%pathname, url = %uploaded.url, "source image uploaded");

        Ok(uploaded.url)
    }
}
