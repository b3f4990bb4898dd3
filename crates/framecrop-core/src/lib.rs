//! Framecrop Core - interactive crop engine
//!
//! This crate implements the geometry and raster pipeline behind the
//! avatar/banner crop dialog: loading an uploaded image, maintaining the
//! zoom/pan viewport over a fixed crop region, composing the live preview,
//! and producing the final fixed-size export (PNG for circular crops,
//! JPEG for rectangular ones).

pub mod decode;
pub mod encode;
pub mod output;
pub mod render;
pub mod resample;
pub mod session;
pub mod viewport;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use decode::{load_source, LoadError, SourceImage};
pub use encode::{EncodeError, EncodedImage, MimeType};
pub use render::{render_preview, Pixmap, PreviewFrame};
pub use session::{CommitError, CropSession, SessionError, SessionStage};
pub use viewport::{Viewport, ViewportState};

/// Edge length of the square working canvas the preview is composed on.
pub const CANVAS_SIZE: f64 = 500.0;

/// On-canvas diameter of the circular crop region.
pub const CIRCLE_DIAMETER: f64 = 300.0;

/// On-canvas span of the rectangular crop region along its longer axis.
pub const RECT_SPAN: f64 = 450.0;

/// Nominal zoom ceiling. When a source is so elongated that the minimum
/// zoom needed to cover the crop region exceeds this, the effective ceiling
/// rises to that minimum and the zoom range collapses to a single value.
pub const MAX_ZOOM: f64 = 4.0;

/// Smallest acceptable source dimension on either axis, in pixels.
pub const MIN_SOURCE_DIM: u32 = 200;

/// JPEG quality used for rectangular exports.
pub const JPEG_QUALITY: u8 = 95;

/// Default export width when the caller does not request a minimum size.
pub const DEFAULT_OUTPUT_WIDTH: u32 = 1200;

/// Width of the small crop preview for rectangular sessions.
pub const RECT_THUMB_WIDTH: u32 = 150;

/// Edge length of the small crop preview for circular sessions.
pub const CIRCLE_THUMB_SIZE: u32 = 100;

/// Shape of the crop region.
///
/// The shape never changes within a session. All zoom/pan coordinate math
/// is shape-independent; only [`CropShape::contains`] (region coverage) and
/// the final encode dispatch branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CropShape {
    /// Fixed-aspect rectangle; `aspect` is width divided by height.
    Rect { aspect: f64 },
    /// Unit-aspect circle, exported with transparency outside the disc.
    Circle,
}

impl CropShape {
    /// On-canvas size of the crop region for this shape.
    ///
    /// Circles use a fixed diameter. Rectangles span [`RECT_SPAN`] along
    /// their longer axis and derive the other axis from the aspect, so the
    /// region always fits the working canvas with a margin around it.
    pub fn region_size(&self) -> (f64, f64) {
        match *self {
            CropShape::Circle => (CIRCLE_DIAMETER, CIRCLE_DIAMETER),
            CropShape::Rect { aspect } => {
                if aspect >= 1.0 {
                    (RECT_SPAN, RECT_SPAN / aspect)
                } else {
                    (RECT_SPAN * aspect, RECT_SPAN)
                }
            }
        }
    }

    /// Test whether a point lies inside the crop region.
    ///
    /// Coordinates are normalized to the region size: `(0, 0)` is the
    /// region center and `(±0.5, ±0.5)` are its corners. Both the preview
    /// overlay and the final-raster mask go through this one predicate so
    /// the two paths cannot disagree on shape coverage.
    #[inline]
    pub fn contains(&self, nx: f64, ny: f64) -> bool {
        match self {
            CropShape::Rect { .. } => nx.abs() <= 0.5 && ny.abs() <= 0.5,
            CropShape::Circle => nx * nx + ny * ny <= 0.25,
        }
    }

    /// Returns true for circular sessions.
    pub fn is_circle(&self) -> bool {
        matches!(self, CropShape::Circle)
    }
}

/// Errors raised when an [`OutputSpec`] cannot be resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutputSpecError {
    /// The aspect ratio is not a positive finite number.
    #[error("aspect ratio must be a positive finite number, got {0}")]
    InvalidAspectRatio(f64),

    /// A requested output dimension resolved to zero pixels.
    #[error("output size must be non-zero")]
    ZeroOutputSize,
}

/// Caller-facing export configuration.
///
/// Omitting `aspect_ratio` selects circular mode. `min_width` and
/// `min_height` set the export resolution and default to
/// [`DEFAULT_OUTPUT_WIDTH`]. Field names are camelCase across the
/// serialization boundary so a plain `{ aspectRatio: 3, minWidth: 1200 }`
/// object works from the host page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSpec {
    /// Width/height ratio of the rectangular crop; `None` selects a circle.
    pub aspect_ratio: Option<f64>,
    /// Minimum export width in pixels.
    pub min_width: Option<u32>,
    /// Minimum export height in pixels.
    pub min_height: Option<u32>,
}

impl OutputSpec {
    /// Spec for a circular crop at the default export size.
    pub fn circular() -> Self {
        Self::default()
    }

    /// Spec for a rectangular crop with the given width/height ratio.
    pub fn rectangular(aspect: f64) -> Self {
        Self {
            aspect_ratio: Some(aspect),
            ..Self::default()
        }
    }

    /// Resolve the spec into concrete export parameters.
    ///
    /// Rectangular exports are sized width-first and derive the height
    /// from the aspect, so the output ratio is exact. A `min_height` that
    /// implies a larger width than `min_width` wins, which keeps both
    /// requested minimums honored. Circular exports are square, sized by
    /// the larger of the requested minimums.
    ///
    /// # Errors
    ///
    /// Returns [`OutputSpecError::InvalidAspectRatio`] for a non-finite or
    /// non-positive aspect, and [`OutputSpecError::ZeroOutputSize`] when a
    /// requested dimension is zero.
    pub fn resolve(&self) -> Result<ResolvedOutput, OutputSpecError> {
        match self.aspect_ratio {
            None => {
                let side = match (self.min_width, self.min_height) {
                    (None, None) => DEFAULT_OUTPUT_WIDTH,
                    (Some(w), None) => w,
                    (None, Some(h)) => h,
                    (Some(w), Some(h)) => w.max(h),
                };
                if side == 0 {
                    return Err(OutputSpecError::ZeroOutputSize);
                }
                Ok(ResolvedOutput {
                    shape: CropShape::Circle,
                    width: side,
                    height: side,
                })
            }
            Some(aspect) => {
                if !aspect.is_finite() || aspect <= 0.0 {
                    return Err(OutputSpecError::InvalidAspectRatio(aspect));
                }
                let from_height = self.min_height.map(|h| (h as f64 * aspect).round() as u32);
                let width = match (self.min_width, from_height) {
                    (None, None) => DEFAULT_OUTPUT_WIDTH,
                    (Some(w), None) => w,
                    (None, Some(h)) => h,
                    (Some(w), Some(h)) => w.max(h),
                };
                if width == 0 {
                    return Err(OutputSpecError::ZeroOutputSize);
                }
                let height = ((width as f64 / aspect).round() as u32).max(1);
                Ok(ResolvedOutput {
                    shape: CropShape::Rect { aspect },
                    width,
                    height,
                })
            }
        }
    }
}

/// Fully-resolved export parameters derived from an [`OutputSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOutput {
    /// Crop region shape for the session.
    pub shape: CropShape,
    /// Export width in pixels.
    pub width: u32,
    /// Export height in pixels.
    pub height: u32,
}
