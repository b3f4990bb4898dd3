//! Final-raster encoding for crop exports.
//!
//! Circular crops encode as PNG so the area outside the disc stays
//! transparent; rectangular crops encode as JPEG at a fixed quality.
//! [`encode_for_shape`] is the single place that dispatch lives.
//!
//! All operations are synchronous and single-threaded, designed to run
//! inside a Web Worker via the WASM bindings.

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use thiserror::Error;

use crate::{CropShape, JPEG_QUALITY};

/// Errors that can occur while encoding an export.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match the expected dimensions.
    #[error("invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Quality is outside the valid 1-100 range.
    #[error("quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    /// The underlying codec failed.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),
}

/// Validate a raster buffer against its claimed dimensions.
///
/// `channels` is 3 for RGB input and 4 for RGBA input.
pub(crate) fn check_raster(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize * channels;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// MIME type of an encoded export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    /// `image/png`, used for circular exports.
    Png,
    /// `image/jpeg`, used for rectangular exports.
    Jpeg,
}

impl MimeType {
    /// The IANA media type string.
    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::Png => "image/png",
            MimeType::Jpeg => "image/jpeg",
        }
    }
}

/// An encoded export: file bytes plus the metadata an upload needs.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
    /// Content type of `bytes`.
    pub mime: MimeType,
    /// Pixel width of the encoded raster.
    pub width: u32,
    /// Pixel height of the encoded raster.
    pub height: u32,
}

/// Encode a final raster with the codec its shape calls for.
///
/// Circular crops expect RGBA input (the disc mask is carried in the
/// alpha channel) and produce PNG. Rectangular crops expect RGB input
/// and produce JPEG at [`JPEG_QUALITY`]. A buffer with the wrong channel
/// count for the shape fails validation.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidPixelData`] or
/// [`EncodeError::InvalidDimensions`] for malformed input, and
/// [`EncodeError::EncodingFailed`] when the codec itself errors.
pub fn encode_for_shape(
    shape: CropShape,
    pixels: &[u8],
    width: u32,
    height: u32,
) -> Result<EncodedImage, EncodeError> {
    match shape {
        CropShape::Circle => Ok(EncodedImage {
            bytes: encode_png(pixels, width, height)?,
            mime: MimeType::Png,
            width,
            height,
        }),
        CropShape::Rect { .. } => Ok(EncodedImage {
            bytes: encode_jpeg(pixels, width, height, JPEG_QUALITY)?,
            mime: MimeType::Jpeg,
            width,
            height,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_strings() {
        assert_eq!(MimeType::Png.as_str(), "image/png");
        assert_eq!(MimeType::Jpeg.as_str(), "image/jpeg");
    }

    #[test]
    fn test_circle_dispatches_to_png() {
        let pixels = vec![200u8; 16 * 16 * 4];
        let encoded = encode_for_shape(CropShape::Circle, &pixels, 16, 16).unwrap();
        assert_eq!(encoded.mime, MimeType::Png);
        assert_eq!(&encoded.bytes[..4], &[0x89, b'P', b'N', b'G']);
        assert_eq!((encoded.width, encoded.height), (16, 16));
    }

    #[test]
    fn test_rect_dispatches_to_jpeg() {
        let pixels = vec![200u8; 30 * 10 * 3];
        let encoded = encode_for_shape(CropShape::Rect { aspect: 3.0 }, &pixels, 30, 10).unwrap();
        assert_eq!(encoded.mime, MimeType::Jpeg);
        assert_eq!(&encoded.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_wrong_channel_count_rejected() {
        // RGB-sized buffer offered for a circular (RGBA) export.
        let pixels = vec![200u8; 16 * 16 * 3];
        let result = encode_for_shape(CropShape::Circle, &pixels, 16, 16);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_check_raster_zero_dims() {
        assert!(matches!(
            check_raster(&[], 0, 10, 3),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            check_raster(&[], 10, 0, 4),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }
}
