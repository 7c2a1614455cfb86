use async_trait::async_trait;

use super::ImageReferencer;
use crate::{error::Result, storage::BlobStorage, types::ImageUpload};

/// Uploads both images to blob storage and references their public URLs
pub(crate) struct UploadReferencer {
    storage: BlobStorage,
}

impl UploadReferencer {
    pub const fn new(storage: BlobStorage) -> Self {
        Self { storage }
    }
}

/// Object name for the `index`-th image (1-based) uploaded at `millis`
fn object_name(millis: i64, index: usize, image: &ImageUpload) -> String {
    format!("{millis}-image{index}.{}", image.extension())
}

#[async_trait]
impl ImageReferencer for UploadReferencer {
    async fn reference(&self, images: &[ImageUpload; 2]) -> Result<[String; 2]> {
        let millis = jiff::Timestamp::now().as_millisecond();
        let [first, second] = images;

        let first_name = object_name(millis, 1, first);
        let second_name = object_name(millis, 2, second);

        // Both uploads run concurrently; the first failure wins and the
        // other upload is dropped.
        let (first_url, second_url) = tokio::try_join!(
            self.storage.put(&first_name, first),
            self.storage.put(&second_name, second),
        )?;

        Ok([first_url, second_url])
    }

    fn name(&self) -> &'static str {
        "upload"
    }
}
