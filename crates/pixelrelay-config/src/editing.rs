use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Image-editing configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditingConfig {
    /// How source images are handed to the generation service
    #[serde(default)]
    pub strategy: EditingStrategy,
    /// Object storage used by the `upload` strategy
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

/// Transmission strategy for image-editing payloads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditingStrategy {
    /// Inline each file as a base64 data URI
    #[default]
    Inline,
    /// Upload each file to object storage and pass the public URL
    Upload,
}

/// Blob storage service configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Base URL objects are uploaded under
    pub base_url: Url,
    /// Bearer token for the storage service
    pub token: SecretString,
}
