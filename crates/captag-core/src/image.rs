//! Source images and their JPEG/base64 payload for the captioning request.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::path::Path;

use crate::config::ImageConfig;
use crate::error::CaptionError;

/// Raw image bytes as supplied by the caller, in any format `image` can decode.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Undecoded file contents
    pub bytes: Vec<u8>,
    /// Display name (file name or "upload")
    pub name: String,
}

impl SourceImage {
    pub fn from_bytes(bytes: Vec<u8>, name: impl Into<String>) -> Self {
        Self {
            bytes,
            name: name.into(),
        }
    }

    /// Read an image file from disk.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { bytes, name })
    }

    /// Decode and re-encode as a JPEG payload on a blocking thread.
    pub async fn to_jpeg(&self, options: &ImageConfig) -> Result<JpegPayload, CaptionError> {
        let bytes = self.bytes.clone();
        let options = options.clone();
        tokio::task::spawn_blocking(move || JpegPayload::encode(&bytes, &options))
            .await
            .map_err(|e| CaptionError::Image(format!("Task join error: {e}")))?
    }
}

/// Base64-encoded JPEG ready to embed in a chat completion request.
#[derive(Debug, Clone)]
pub struct JpegPayload {
    /// Base64 of the JPEG bytes
    pub data: String,
    /// Pixel dimensions after any downscaling
    pub width: u32,
    pub height: u32,
}

impl JpegPayload {
    /// Decode `bytes`, flatten to RGB, downscale if needed and encode as JPEG.
    pub fn encode(bytes: &[u8], options: &ImageConfig) -> Result<Self, CaptionError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| CaptionError::Image(format!("decode failed: {e}")))?;

        let max = options.max_dimension;
        let resized = if decoded.width() > max || decoded.height() > max {
            tracing::debug!(
                "Downscaling {}x{} image to fit {max}px",
                decoded.width(),
                decoded.height()
            );
            decoded.thumbnail(max, max)
        } else {
            decoded
        };

        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

        let mut jpeg = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(
            &mut jpeg,
            options.jpeg_quality,
        ))
        .map_err(|e| CaptionError::Image(format!("JPEG encode failed: {e}")))?;

        Ok(Self {
            data: BASE64.encode(&jpeg),
            width: rgb.width(),
            height: rgb.height(),
        })
    }

    /// Data URI for OpenAI-style `image_url` content parts.
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 128]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_png_with_alpha_encodes_as_jpeg() {
        let payload = JpegPayload::encode(&png_bytes(16, 8), &ImageConfig::default()).unwrap();
        let jpeg = BASE64.decode(&payload.data).unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!((payload.width, payload.height), (16, 8));
    }

    #[test]
    fn test_data_url_prefix() {
        let payload = JpegPayload::encode(&png_bytes(4, 4), &ImageConfig::default()).unwrap();
        assert!(payload.data_url().starts_with("data:image/jpeg;base64,/9j/"));
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let options = ImageConfig {
            max_dimension: 50,
            jpeg_quality: 80,
        };
        let payload = JpegPayload::encode(&png_bytes(200, 100), &options).unwrap();
        assert_eq!(payload.width, 50);
        assert_eq!(payload.height, 25);
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let err = JpegPayload::encode(b"definitely not an image", &ImageConfig::default())
            .unwrap_err();
        assert!(matches!(err, CaptionError::Image(_)));
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harbour.png");
        std::fs::write(&path, png_bytes(2, 2)).unwrap();

        let image = SourceImage::from_path(&path).await.unwrap();
        assert_eq!(image.name, "harbour.png");
        let payload = image.to_jpeg(&ImageConfig::default()).await.unwrap();
        assert_eq!(payload.width, 2);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let result = SourceImage::from_path(Path::new("/nonexistent/photo.jpg")).await;
        assert!(result.is_err());
    }
}
