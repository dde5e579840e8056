//! Caption provider trait.

use crate::error::CaptionError;
use crate::image::SourceImage;
use async_trait::async_trait;

/// Anything that can turn an image and a prompt into a caption.
///
/// Uses `async_trait` so providers can live behind `Arc<dyn CaptionProvider>`.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Produce a caption for `image` following `prompt`.
    ///
    /// The returned text is passed through exactly as the service produced it.
    async fn caption(&self, image: &SourceImage, prompt: &str) -> Result<String, CaptionError>;
}
