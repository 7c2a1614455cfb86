use std::path::Path;

use secrecy::ExposeSecret;
use url::Url;

use crate::{Config, EditingStrategy};

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a required credential or the storage
    /// section for the upload strategy is missing
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_generation()?;
        self.validate_editing()?;
        Ok(())
    }

    fn validate_generation(&self) -> anyhow::Result<()> {
        ensure_http_url("generation.base_url", &self.generation.base_url)?;

        let has_key = self
            .generation
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty());

        if self.generation.require_api_key && !has_key {
            anyhow::bail!("generation.api_key must be set when generation.require_api_key is enabled");
        }

        if self.generation.timeout_secs == Some(0) {
            anyhow::bail!("generation.timeout_secs must be greater than 0");
        }

        Ok(())
    }

    fn validate_editing(&self) -> anyhow::Result<()> {
        match (&self.editing.strategy, &self.editing.storage) {
            (EditingStrategy::Upload, None) => {
                anyhow::bail!("editing.strategy = \"upload\" requires an [editing.storage] section");
            }
            (EditingStrategy::Upload, Some(storage)) => {
                ensure_http_url("editing.storage.base_url", &storage.base_url)?;
                if storage.token.expose_secret().is_empty() {
                    anyhow::bail!("editing.storage.token must not be empty");
                }
            }
            (EditingStrategy::Inline, _) => {}
        }

        Ok(())
    }
}

fn ensure_http_url(field: &str, url: &Url) -> anyhow::Result<()> {
    if matches!(url.scheme(), "http" | "https") {
        Ok(())
    } else {
        anyhow::bail!("{field} must be an http or https URL, got `{url}`")
    }
}
