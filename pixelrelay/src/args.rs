use std::path::PathBuf;

use clap::Parser;

/// PixelRelay image generation relay
#[derive(Debug, Parser)]
#[command(name = "pixelrelay", about = "Relays image form submissions to an image generation service")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "pixelrelay.toml", env = "PIXELRELAY_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PIXELRELAY_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
