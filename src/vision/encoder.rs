use crate::error::AnalysisError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageOutputFormat};
use std::io::Cursor;

/// JPEG quality used for every recognition upload.
pub const JPEG_QUALITY: u8 = 85;

/// A base64 image payload ready to be embedded in a recognition request
/// as a `data:` URL.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub payload: String,
    pub media_type: &'static str,
}

impl EncodedImage {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.payload)
    }
}

/// Re-encodes a decoded image as JPEG at the fixed quality and wraps the
/// bytes in base64. Deterministic for a given image.
pub fn encode_image(image: &DynamicImage) -> Result<EncodedImage, AnalysisError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(|_| AnalysisError::EncodingFailed)?;

    if bytes.is_empty() {
        return Err(AnalysisError::EncodingFailed);
    }

    Ok(EncodedImage {
        payload: STANDARD.encode(&bytes),
        media_type: "image/jpeg",
    })
}
