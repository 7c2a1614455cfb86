pub(crate) mod inline;
pub(crate) mod upload;

use async_trait::async_trait;

use crate::{error::Result, types::ImageUpload};

/// Turns the two source images into the strings sent as `image_urls`
#[async_trait]
pub(crate) trait ImageReferencer: Send + Sync {
    /// Produce one reference per image, in order
    async fn reference(&self, images: &[ImageUpload; 2]) -> Result<[String; 2]>;

    /// Strategy name for logs
    fn name(&self) -> &'static str;
}
