//! Decoding uploads into crop-ready rasters.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use crate::MIN_SOURCE_DIM;

use super::{LoadError, Orientation, SourceImage};

/// Decode an uploaded file into an upright RGB source image.
///
/// The container format is sniffed from the bytes themselves (JPEG, PNG,
/// GIF, WebP and BMP are supported; animated formats contribute their
/// first frame). EXIF orientation is applied before the size check, so
/// the minimum is enforced against the dimensions the user will see.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes as picked by the user
///
/// # Errors
///
/// Returns `LoadError::Undecodable` if the bytes are not a supported
/// raster. Returns `LoadError::TooSmall` if either upright dimension is
/// under [`MIN_SOURCE_DIM`] pixels.
pub fn load_source(bytes: &[u8]) -> Result<SourceImage, LoadError> {
    // Orientation comes from EXIF, which lives outside the pixel stream.
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LoadError::Undecodable(e.to_string()))?;
    let decoded = reader
        .decode()
        .map_err(|e| LoadError::Undecodable(e.to_string()))?;

    let upright = apply_orientation(decoded, orientation);
    let rgb = upright.into_rgb8();
    let (width, height) = rgb.dimensions();

    if width < MIN_SOURCE_DIM || height < MIN_SOURCE_DIM {
        return Err(LoadError::TooSmall {
            width,
            height,
            min: MIN_SOURCE_DIM,
        });
    }

    Ok(SourceImage::from_rgb_image(rgb))
}

/// Extract the EXIF orientation, defaulting to normal when absent.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply an EXIF orientation transformation to a decoded image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90 => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270 => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    /// Encode a gradient test image in the given container format.
    fn fixture_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
        });
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, format)
            .unwrap();
        buffer.into_inner()
    }

    /// Splice a minimal EXIF APP1 segment carrying an orientation tag
    /// into a baseline JPEG, right after the SOI marker.
    fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
        let jpeg = fixture_bytes(width, height, ImageFormat::Jpeg);

        let mut app1 = vec![0xFF, 0xE1, 0x00, 0x22];
        app1.extend_from_slice(b"Exif\0\0");
        // Little-endian TIFF header, IFD0 at offset 8.
        app1.extend_from_slice(&[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]);
        // One entry: tag 0x0112 (Orientation), type SHORT, count 1.
        app1.extend_from_slice(&[0x01, 0x00]);
        app1.extend_from_slice(&[0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00]);
        app1.extend_from_slice(&orientation.to_le_bytes());
        app1.extend_from_slice(&[0x00, 0x00]);
        // No next IFD.
        app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut bytes = jpeg[..2].to_vec();
        bytes.extend_from_slice(&app1);
        bytes.extend_from_slice(&jpeg[2..]);
        bytes
    }

    #[test]
    fn test_loads_png() {
        let img = load_source(&fixture_bytes(640, 480, ImageFormat::Png)).unwrap();
        assert_eq!((img.width, img.height), (640, 480));
        assert_eq!(img.pixels.len(), 640 * 480 * 3);
    }

    #[test]
    fn test_loads_jpeg() {
        let img = load_source(&fixture_bytes(300, 300, ImageFormat::Jpeg)).unwrap();
        assert_eq!((img.width, img.height), (300, 300));
    }

    #[test]
    fn test_loads_bmp() {
        let img = load_source(&fixture_bytes(256, 256, ImageFormat::Bmp)).unwrap();
        assert_eq!((img.width, img.height), (256, 256));
    }

    #[test]
    fn test_loads_gif() {
        let img = load_source(&fixture_bytes(250, 210, ImageFormat::Gif)).unwrap();
        assert_eq!((img.width, img.height), (250, 210));
    }

    #[test]
    fn test_png_pixels_survive() {
        // PNG is lossless, so the gradient must come back exactly.
        let img = load_source(&fixture_bytes(256, 200, ImageFormat::Png)).unwrap();
        let idx = (10 * 256 + 37) * 3;
        assert_eq!(&img.pixels[idx..idx + 3], &[37, 10, 64]);
    }

    #[test]
    fn test_rejects_garbage() {
        let result = load_source(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(LoadError::Undecodable(_))));
    }

    #[test]
    fn test_rejects_empty_input() {
        let result = load_source(&[]);
        assert!(matches!(result, Err(LoadError::Undecodable(_))));
    }

    #[test]
    fn test_rejects_small_image() {
        let result = load_source(&fixture_bytes(100, 100, ImageFormat::Png));
        match result {
            Err(LoadError::TooSmall { width, height, min }) => {
                assert_eq!((width, height), (100, 100));
                assert_eq!(min, MIN_SOURCE_DIM);
            }
            other => panic!("expected TooSmall, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_one_short_axis() {
        // A wide strip fails even though one axis is generous.
        let result = load_source(&fixture_bytes(4000, 120, ImageFormat::Png));
        assert!(matches!(
            result,
            Err(LoadError::TooSmall {
                width: 4000,
                height: 120,
                ..
            })
        ));
    }

    #[test]
    fn test_accepts_exact_minimum() {
        let img = load_source(&fixture_bytes(200, 200, ImageFormat::Png)).unwrap();
        assert_eq!(img.min_dimension(), 200);
    }

    #[test]
    fn test_no_exif_reads_normal() {
        let orientation = extract_orientation(&fixture_bytes(300, 300, ImageFormat::Png));
        assert_eq!(orientation, Orientation::Normal);
    }

    #[test]
    fn test_exif_orientation_extracted() {
        let bytes = jpeg_with_orientation(300, 240, 6);
        assert_eq!(extract_orientation(&bytes), Orientation::Rotate90);
    }

    #[test]
    fn test_exif_rotation_swaps_dimensions() {
        // Orientation 6 stores the raster sideways; upright it is taller
        // than wide, and the minimum-size check sees the upright size.
        let bytes = jpeg_with_orientation(300, 240, 6);
        let img = load_source(&bytes).unwrap();
        assert_eq!((img.width, img.height), (240, 300));
        assert!(Orientation::Rotate90.swaps_dimensions());
    }

    #[test]
    fn test_exif_normal_keeps_dimensions() {
        let bytes = jpeg_with_orientation(300, 240, 1);
        let img = load_source(&bytes).unwrap();
        assert_eq!((img.width, img.height), (300, 240));
    }

    #[test]
    fn test_apply_orientation_rotate180() {
        let pixels = vec![
            255, 0, 0, // red (left)
            0, 255, 0, // green (right)
        ];
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_raw(2, 1, pixels).unwrap());
        let rgb = apply_orientation(img, Orientation::Rotate180).into_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let pixels = vec![255, 0, 0, 0, 255, 0];
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_raw(2, 1, pixels).unwrap());
        let rgb = apply_orientation(img, Orientation::FlipHorizontal).into_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_apply_orientation_transpose() {
        // 2x2 quadrants: transpose mirrors across the main diagonal.
        let pixels = vec![
            255, 0, 0, // red
            0, 255, 0, // green
            0, 0, 255, // blue
            255, 255, 0, // yellow
        ];
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_raw(2, 2, pixels).unwrap());
        let rgb = apply_orientation(img, Orientation::Transpose).into_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(rgb.get_pixel(1, 0).0, [0, 0, 255]);
        assert_eq!(rgb.get_pixel(0, 1).0, [0, 255, 0]);
        assert_eq!(rgb.get_pixel(1, 1).0, [255, 255, 0]);
    }
}
