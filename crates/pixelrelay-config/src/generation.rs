use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default generation service host
pub const DEFAULT_GENERATION_URL: &str = "https://api.nano-banana.com";

/// Credential sent when no API key is configured
pub const PLACEHOLDER_API_KEY: &str = "demo-key";

/// Upstream image generation service configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Base URL; `/v1/generate` and `/v1/edit` are appended
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Bearer credential for the generation service
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Refuse to start without an API key instead of sending the placeholder
    #[serde(default)]
    pub require_api_key: bool,
    /// Per-request timeout in seconds; unset means the call may take as long as it takes
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            require_api_key: false,
            timeout_secs: None,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_GENERATION_URL).expect("default generation URL must be valid")
}
