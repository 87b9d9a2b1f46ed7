use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;

use crate::error::CaptionError;

/// Label used when the bytes do not match a known image signature.
pub const FALLBACK_MIME: &str = "image/jpeg";

/// Sniffs the image MIME type from its magic bytes.
pub fn guess_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::Tiff) => "image/tiff",
        _ => FALLBACK_MIME,
    }
}

/// Wraps image bytes as a `data:<mime>;base64,<payload>` URL.
pub fn to_data_url(bytes: &[u8]) -> Result<String, CaptionError> {
    if bytes.is_empty() {
        return Err(CaptionError::EmptyImage);
    }
    let encoded = general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", guess_mime(bytes), encoded))
}

/// Reads an image file in full. No size limit is applied here.
pub async fn read_image(path: impl AsRef<Path>) -> Result<Vec<u8>, CaptionError> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    if bytes.is_empty() {
        return Err(CaptionError::EmptyImage);
    }
    Ok(bytes)
}
