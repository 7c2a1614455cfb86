#![allow(clippy::must_use_candidate)]

pub mod editing;
mod env;
pub mod generation;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use editing::*;
pub use generation::*;
pub use health::*;
pub use server::*;
pub use telemetry::*;

/// Top-level PixelRelay configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream generation service configuration
    #[serde(default)]
    pub generation: GenerationConfig,
    /// How image-editing payloads reach the generation service
    #[serde(default)]
    pub editing: EditingConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
