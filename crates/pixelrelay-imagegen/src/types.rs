use std::{fmt, str::FromStr};

use axum::body::Bytes;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::{ImageGenError, Result};

/// Generation mode selected by the `mode` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Prompt only
    TextToImage,
    /// Prompt plus two source images
    ImageEditing,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextToImage => "text-to-image",
            Self::ImageEditing => "image-editing",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ImageGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text-to-image" => Ok(Self::TextToImage),
            "image-editing" => Ok(Self::ImageEditing),
            other => Err(ImageGenError::InvalidMode(other.to_string())),
        }
    }
}

/// One uploaded source image
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Raw file contents
    pub bytes: Bytes,
    /// MIME type reported by the client
    pub content_type: String,
    /// Original filename
    pub filename: String,
}

impl ImageUpload {
    /// File extension used when naming stored objects
    ///
    /// Taken from the filename, then the MIME subtype, then `bin`.
    pub fn extension(&self) -> &str {
        fn usable(ext: &&str) -> bool {
            !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }

        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(usable)
            .or_else(|| {
                self.content_type
                    .split_once('/')
                    .map(|(_, subtype)| subtype)
                    .filter(usable)
            })
            .unwrap_or("bin")
    }

    /// Encode the file as a `data:` URI
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

/// A validated image request
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    TextToImage {
        prompt: String,
    },
    ImageEditing {
        prompt: String,
        images: Box<[ImageUpload; 2]>,
    },
}

impl GenerationRequest {
    pub const fn mode(&self) -> Mode {
        match self {
            Self::TextToImage { .. } => Mode::TextToImage,
            Self::ImageEditing { .. } => Mode::ImageEditing,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Self::TextToImage { prompt } | Self::ImageEditing { prompt, .. } => prompt,
        }
    }
}

/// Wire format for `POST /v1/generate`
#[derive(Debug, Serialize)]
pub(crate) struct GenerateBody<'a> {
    pub prompt: &'a str,
    pub num_images: u32,
    pub output_format: &'a str,
}

/// Wire format for `POST /v1/edit`
#[derive(Debug, Serialize)]
pub(crate) struct EditBody<'a> {
    pub prompt: &'a str,
    pub image_urls: &'a [String; 2],
}

/// Parsed reply from the generation service
///
/// Extra fields are ignored; a wrong type for a known field is a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationResult {
    /// Generated images, best first
    #[serde(default)]
    pub images: Option<Vec<GeneratedImage>>,
    /// Model commentary on the result
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}

impl GenerationResult {
    /// Parse a raw reply body; a bare `null` is a result with no images
    pub fn from_body(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Option<Self>>(text).map(Option::unwrap_or_default)
    }

    /// Shape the caller-facing response from the first generated image
    pub fn into_response(self, prompt: String) -> Result<GenerateImageResponse> {
        let first = self
            .images
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(ImageGenError::NoImages)?;

        Ok(GenerateImageResponse {
            url: first.url,
            prompt,
            description: self.description.unwrap_or_default(),
        })
    }
}

/// Successful response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateImageResponse {
    pub url: String,
    pub prompt: String,
    pub description: String,
}
