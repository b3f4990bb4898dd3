//! Core types for source-image loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MIN_SOURCE_DIM;

/// Error types for loading an upload into a crop session.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The bytes are not a decodable raster in a supported format.
    #[error("could not decode image: {0}")]
    Undecodable(String),

    /// The image decoded but is too small to crop at export quality.
    #[error("image must be at least {min}x{min} pixels, got {width}x{height}")]
    TooSmall {
        /// Upright width of the rejected image.
        width: u32,
        /// Upright height of the rejected image.
        height: u32,
        /// The enforced minimum, [`MIN_SOURCE_DIM`].
        min: u32,
    },
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal,
    /// Horizontal flip.
    FlipHorizontal,
    /// Rotate 180 degrees.
    Rotate180,
    /// Vertical flip.
    FlipVertical,
    /// Transpose (flip along the top-left/bottom-right diagonal).
    Transpose,
    /// Rotate 90 degrees clockwise.
    Rotate90,
    /// Transverse (flip along the top-right/bottom-left diagonal).
    Transverse,
    /// Rotate 270 degrees clockwise.
    Rotate270,
}

impl Orientation {
    /// Whether applying this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90
                | Orientation::Transverse
                | Orientation::Rotate270
        )
    }
}

impl From<u32> for Orientation {
    /// Map a raw EXIF tag value; out-of-range values read as normal.
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded, upright source image with RGB pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length is width * height * 3.
    pub pixels: Vec<u8>,
}

impl SourceImage {
    /// Create a `SourceImage` from raw RGB8 pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a `SourceImage` from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Smaller of the two dimensions.
    pub fn min_dimension(&self) -> u32 {
        self.width.min(self.height)
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}
