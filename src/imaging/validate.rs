//! Upload validation and image decoding.

use crate::constants::{IMAGE_MEDIA_PREFIX, detail};
use image::{DynamicImage, ImageReader, RgbImage};
use std::io::Cursor;

/// Reason an upload was rejected before reaching the model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageRejection {
    /// Declared content type is missing or not an image media type.
    #[error("declared content type is not an image: {declared:?}")]
    InvalidContentType {
        /// Content type the client declared, if any.
        declared: Option<String>,
    },

    /// Bytes could not be decoded as a raster image.
    #[error("image could not be decoded: {reason}")]
    InvalidImageData {
        /// Decoder failure description.
        reason: String,
    },
}

impl ImageRejection {
    /// Human-readable reason returned to the client.
    pub const fn detail(&self) -> &'static str {
        match self {
            Self::InvalidContentType { .. } => detail::NOT_AN_IMAGE,
            Self::InvalidImageData { .. } => detail::INVALID_IMAGE,
        }
    }
}

/// Decoded upload in canonical 8-bit RGB form.
///
/// Whatever the source color mode, pixels are stored as three channels.
/// An alpha channel, if present, is dropped without compositing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pixels: RgbImage,
}

impl DecodedImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGB pixel buffer.
    pub const fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

impl From<DynamicImage> for DecodedImage {
    fn from(image: DynamicImage) -> Self {
        let pixels = match image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        };
        Self { pixels }
    }
}

impl From<RgbImage> for DecodedImage {
    fn from(pixels: RgbImage) -> Self {
        Self { pixels }
    }
}

/// Check that the declared content type names an image media type.
pub fn check_content_type(declared: Option<&str>) -> Result<(), ImageRejection> {
    match declared {
        Some(content_type) if content_type.starts_with(IMAGE_MEDIA_PREFIX) => Ok(()),
        other => Err(ImageRejection::InvalidContentType {
            declared: other.map(str::to_string),
        }),
    }
}

/// Decode raw bytes into an RGB image.
///
/// The format is sniffed from the bytes rather than trusted from the
/// declared type. No dimension limits are applied.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, ImageRejection> {
    if bytes.is_empty() {
        return Err(ImageRejection::InvalidImageData {
            reason: "empty payload".to_string(),
        });
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ImageRejection::InvalidImageData {
            reason: e.to_string(),
        })?;
    reader.no_limits();

    let image = reader
        .decode()
        .map_err(|e| ImageRejection::InvalidImageData {
            reason: e.to_string(),
        })?;

    Ok(DecodedImage::from(image))
}

/// Validate the declared content type, then decode the bytes.
pub fn validate_and_decode(
    bytes: &[u8],
    declared_content_type: Option<&str>,
) -> Result<DecodedImage, ImageRejection> {
    check_content_type(declared_content_type)?;
    decode_image(bytes)
}
