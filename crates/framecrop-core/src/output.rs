//! Final export pipeline.
//!
//! Committing reuses the preview math at export resolution: the source
//! window comes from [`Viewport::source_crop_rect`], the pixels go
//! through one resample pass straight to output size, the disc mask uses
//! the same coverage predicate as the preview, and the shape picks the
//! codec. There is no intermediate raster between source and export.

use crate::decode::SourceImage;
use crate::encode::{encode_for_shape, EncodeError, EncodedImage};
use crate::render::Pixmap;
use crate::resample::resample_region;
use crate::viewport::Viewport;
use crate::{CropShape, ResolvedOutput};

/// Produce the final export for the current viewport.
///
/// # Errors
///
/// Propagates encoder failures. The caller's state is untouched on
/// error, so a failed commit can simply be retried.
pub fn commit_crop(
    source: &SourceImage,
    viewport: &Viewport,
    output: &ResolvedOutput,
) -> Result<EncodedImage, EncodeError> {
    let window = viewport.source_crop_rect();
    let rgb = resample_region(source, window, output.width, output.height);

    match output.shape {
        CropShape::Circle => {
            let masked =
                Pixmap::from_rgb_masked(CropShape::Circle, &rgb, output.width, output.height);
            encode_for_shape(output.shape, &masked.pixels, output.width, output.height)
        }
        CropShape::Rect { .. } => {
            encode_for_shape(output.shape, &rgb, output.width, output.height)
        }
    }
}
