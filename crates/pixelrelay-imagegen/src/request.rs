use axum::{
    extract::{FromRequest, Multipart, Request, multipart::Field},
    http::StatusCode,
};

use crate::{
    error::{ImageGenError, Result},
    types::{GenerationRequest, ImageUpload, Mode},
};

/// Content type assumed for file parts that do not declare one
const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Form fields as submitted, before validation
#[derive(Debug, Default)]
pub struct ImageForm {
    pub mode: Option<String>,
    pub prompt: Option<String>,
    pub image1: Option<ImageUpload>,
    pub image2: Option<ImageUpload>,
}

impl ImageForm {
    /// Check the submitted fields and build a request
    ///
    /// Checks run in order: mode and prompt present, mode recognized,
    /// both images present for editing.
    pub fn validate(self) -> Result<GenerationRequest> {
        let (Some(mode), Some(prompt)) = (
            self.mode.filter(|m| !m.is_empty()),
            self.prompt.filter(|p| !p.is_empty()),
        ) else {
            return Err(ImageGenError::MissingFields);
        };

        match mode.parse::<Mode>()? {
            Mode::TextToImage => Ok(GenerationRequest::TextToImage { prompt }),
            Mode::ImageEditing => {
                let (Some(image1), Some(image2)) = (self.image1, self.image2) else {
                    return Err(ImageGenError::MissingImages);
                };

                Ok(GenerationRequest::ImageEditing {
                    prompt,
                    images: Box::new([image1, image2]),
                })
            }
        }
    }
}

/// Extractor for the multipart image form
pub struct ExtractImageForm(pub ImageForm);

impl<S> FromRequest<S> for ExtractImageForm
where
    S: Send + Sync,
{
    type Rejection = ImageGenError;

    async fn from_request(request: Request, state: &S) -> Result<Self> {
        let mut multipart = Multipart::from_request(request, state).await.map_err(|e| {
            tracing::debug!(error = %e, "image request body is not multipart form data");
            ImageGenError::InvalidForm(e.body_text())
        })?;

        let mut form = ImageForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            // The first occurrence of a field wins; repeats are skipped
            match name.as_str() {
                "mode" if form.mode.is_none() => {
                    form.mode = Some(field.text().await.map_err(multipart_error)?);
                }
                "prompt" if form.prompt.is_none() => {
                    form.prompt = Some(field.text().await.map_err(multipart_error)?);
                }
                "image1" if form.image1.is_none() => form.image1 = read_file(field).await?,
                "image2" if form.image2.is_none() => form.image2 = read_file(field).await?,
                "mode" | "prompt" | "image1" | "image2" => {
                    tracing::trace!(field = %name, "skipping repeated form field");
                }
                _ => {
                    tracing::trace!(field = %name, "skipping unknown form field");
                }
            }
        }

        Ok(Self(form))
    }
}

/// Read a file part; parts without a filename are plain text, not files
async fn read_file(field: Field<'_>) -> Result<Option<ImageUpload>> {
    let Some(filename) = field.file_name().map(str::to_string) else {
        return Ok(None);
    };

    let content_type = field
        .content_type()
        .unwrap_or(DEFAULT_FILE_CONTENT_TYPE)
        .to_string();

    let bytes = field.bytes().await.map_err(multipart_error)?;

    Ok(Some(ImageUpload {
        bytes,
        content_type,
        filename,
    }))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ImageGenError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ImageGenError::PayloadTooLarge(e.body_text())
    } else {
        ImageGenError::InvalidForm(e.body_text())
    }
}
