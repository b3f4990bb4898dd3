//! JPEG encoding for rectangular exports.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{check_raster, EncodeError};

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100)
///
/// # Errors
///
/// Rejects malformed buffers and out-of-range quality before touching
/// the codec; codec failures surface as `EncodingFailed`.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    check_raster(pixels, width, height, 3)?;
    if quality == 0 || quality > 100 {
        return Err(EncodeError::InvalidQuality(quality));
    }

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_basic() {
        let pixels = vec![128u8; 100 * 100 * 3];
        let jpeg = encode_jpeg(&pixels, 100, 100, 95).unwrap();

        // SOI marker at the front, EOI at the back.
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_quality_affects_size() {
        let mut pixels = Vec::with_capacity(64 * 64 * 3);
        for y in 0..64u32 {
            for x in 0..64u32 {
                pixels.extend_from_slice(&[(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8]);
            }
        }
        let low = encode_jpeg(&pixels, 64, 64, 20).unwrap();
        let high = encode_jpeg(&pixels, 64, 64, 95).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(matches!(
            encode_jpeg(&pixels, 10, 10, 0),
            Err(EncodeError::InvalidQuality(0))
        ));
        assert!(matches!(
            encode_jpeg(&pixels, 10, 10, 101),
            Err(EncodeError::InvalidQuality(101))
        ));
    }

    #[test]
    fn test_rejects_short_buffer() {
        let pixels = vec![128u8; 99 * 100 * 3];
        let result = encode_jpeg(&pixels, 100, 100, 95);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 100, 95),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_banner_aspect_encodes() {
        let pixels = vec![90u8; 300 * 100 * 3];
        let jpeg = encode_jpeg(&pixels, 300, 100, 95).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 100));
    }

    #[test]
    fn test_deterministic_output() {
        let pixels: Vec<u8> = (0..(40 * 40 * 3)).map(|i| (i * 31 % 256) as u8).collect();
        let a = encode_jpeg(&pixels, 40, 40, 95).unwrap();
        let b = encode_jpeg(&pixels, 40, 40, 95).unwrap();
        assert_eq!(a, b);
    }
}
