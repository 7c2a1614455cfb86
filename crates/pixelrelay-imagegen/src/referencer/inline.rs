use async_trait::async_trait;

use super::ImageReferencer;
use crate::{error::Result, types::ImageUpload};

/// Inlines each image as a base64 `data:` URI
pub(crate) struct InlineEncoder;

#[async_trait]
impl ImageReferencer for InlineEncoder {
    async fn reference(&self, images: &[ImageUpload; 2]) -> Result<[String; 2]> {
        let encoded = images.each_ref().map(ImageUpload::to_data_uri);

        tracing::debug!(
            image1_len = encoded[0].len(),
            image2_len = encoded[1].len(),
            "encoded source images as data URIs"
        );

        Ok(encoded)
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}
