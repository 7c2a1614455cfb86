//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use pixelrelay_config::{
    Config, EditingConfig, EditingStrategy, GenerationConfig, HealthConfig, ServerConfig, StorageConfig,
};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config pointed at a mock generation service
    pub fn new(generation_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                    ..ServerConfig::default()
                },
                generation: GenerationConfig {
                    base_url: generation_url.parse().expect("valid URL"),
                    api_key: Some(SecretString::from("test-key")),
                    ..GenerationConfig::default()
                },
                editing: EditingConfig::default(),
                telemetry: pixelrelay_config::TelemetryConfig::default(),
            },
        }
    }

    /// Send no API key so the placeholder is used
    pub fn without_api_key(mut self) -> Self {
        self.config.generation.api_key = None;
        self
    }

    /// Upload source images to a mock storage service
    pub fn with_upload_storage(mut self, storage_url: &str) -> Self {
        self.config.editing = EditingConfig {
            strategy: EditingStrategy::Upload,
            storage: Some(StorageConfig {
                base_url: storage_url.parse().expect("valid URL"),
                token: SecretString::from("storage-token"),
            }),
        };
        self
    }

    /// Limit the accepted body size
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.config.server.body_limit = limit;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
