//! Viewport geometry for the crop canvas.
//!
//! The source image is fitted to a fixed 500x500 working canvas, then the
//! user zooms and pans it underneath a centered, fixed-size crop region.
//! This module owns all of that coordinate math: the fit scale, the legal
//! zoom range, offset clamping, on-canvas placement, and the mapping from
//! the crop region back into source pixel coordinates.
//!
//! Canvas coordinates have their origin at the top-left corner with `+x`
//! right and `+y` down. A positive offset pans the view toward the
//! right/bottom of the source, which shifts the drawn image left/up.
//!
//! [`Viewport::source_crop_rect`] is the single place where canvas space
//! is converted back into source space. The preview renderer and the final
//! export both consume it, so what the user sees inside the region is what
//! gets exported.

use serde::{Deserialize, Serialize};

use crate::{CropShape, CANVAS_SIZE, MAX_ZOOM};

/// Scale that fits a source image inside the working canvas.
///
/// This is the zoom-1.0 baseline: the whole image visible, preserving
/// aspect, with at least one axis spanning the full canvas.
pub fn fit_scale(source_w: u32, source_h: u32) -> f64 {
    (CANVAS_SIZE / source_w as f64).min(CANVAS_SIZE / source_h as f64)
}

/// Snapshot of the interactive viewport state.
///
/// This is what the host UI needs to drive its controls: the current zoom,
/// the legal zoom range for the slider, and the pan offsets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    /// Current zoom factor relative to the fitted baseline.
    pub zoom: f64,
    /// Smallest zoom at which the image still covers the crop region.
    pub min_zoom: f64,
    /// Largest permitted zoom.
    pub max_zoom: f64,
    /// Horizontal pan offset in canvas pixels.
    pub offset_x: f64,
    /// Vertical pan offset in canvas pixels.
    pub offset_y: f64,
}

/// A crop window in source-image pixel coordinates.
///
/// Coordinates are continuous: `x` may be fractional and `x + width` never
/// exceeds the source width by more than floating-point noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Zoom/pan state of one crop session.
///
/// Constructed fresh for every loaded image. All mutating operations keep
/// the invariant that the crop region is fully covered by the scaled
/// image: zoom is clamped to `[min_zoom, max_zoom]` and offsets are
/// re-clamped after every zoom change.
#[derive(Debug, Clone)]
pub struct Viewport {
    source_w: u32,
    source_h: u32,
    display_w: f64,
    display_h: f64,
    crop_w: f64,
    crop_h: f64,
    min_zoom: f64,
    max_zoom: f64,
    zoom: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    /// Create a viewport for a source image and crop shape.
    ///
    /// The initial zoom is the midpoint of the legal range, which starts
    /// the user with some slack in both directions. Offsets start at zero
    /// (image centered under the region).
    ///
    /// For extremely elongated sources the coverage minimum can exceed the
    /// nominal [`MAX_ZOOM`]; the ceiling then rises to meet it and the
    /// zoom is pinned to that single legal value.
    pub fn new(source_w: u32, source_h: u32, shape: CropShape) -> Self {
        debug_assert!(source_w > 0 && source_h > 0);
        let (crop_w, crop_h) = shape.region_size();
        let scale = fit_scale(source_w, source_h);
        let display_w = source_w as f64 * scale;
        let display_h = source_h as f64 * scale;
        let min_zoom = (crop_w / display_w).max(crop_h / display_h);
        let max_zoom = MAX_ZOOM.max(min_zoom);
        let zoom = (min_zoom + max_zoom) / 2.0;
        Self {
            source_w,
            source_h,
            display_w,
            display_h,
            crop_w,
            crop_h,
            min_zoom,
            max_zoom,
            zoom,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Current zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Legal zoom range as `(min, max)`.
    pub fn zoom_range(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Current pan offset in canvas pixels.
    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Size of the fitted image at zoom 1.0, in canvas pixels.
    pub fn display_size(&self) -> (f64, f64) {
        (self.display_w, self.display_h)
    }

    /// Size of the crop region in canvas pixels.
    pub fn crop_size(&self) -> (f64, f64) {
        (self.crop_w, self.crop_h)
    }

    /// Canvas position of the crop region's top-left corner.
    pub fn crop_origin(&self) -> (f64, f64) {
        (
            (CANVAS_SIZE - self.crop_w) / 2.0,
            (CANVAS_SIZE - self.crop_h) / 2.0,
        )
    }

    /// Size of the drawn image at the current zoom, in canvas pixels.
    pub fn scaled_size(&self) -> (f64, f64) {
        (self.display_w * self.zoom, self.display_h * self.zoom)
    }

    /// Canvas position of the drawn image's top-left corner.
    ///
    /// The image is centered on the canvas, then displaced by the pan
    /// offset. Every consumer of image placement goes through this.
    pub fn image_origin(&self) -> (f64, f64) {
        let (scaled_w, scaled_h) = self.scaled_size();
        (
            (CANVAS_SIZE - scaled_w) / 2.0 - self.offset_x,
            (CANVAS_SIZE - scaled_h) / 2.0 - self.offset_y,
        )
    }

    /// Largest legal offset magnitude per axis at the current zoom.
    ///
    /// Zero whenever the scaled image does not exceed the crop region on
    /// that axis, which forces the image centered there.
    pub fn max_offset(&self) -> (f64, f64) {
        let (scaled_w, scaled_h) = self.scaled_size();
        (
            ((scaled_w - self.crop_w) / 2.0).max(0.0),
            ((scaled_h - self.crop_h) / 2.0).max(0.0),
        )
    }

    /// Snapshot the interactive state for the host UI.
    pub fn state(&self) -> ViewportState {
        ViewportState {
            zoom: self.zoom,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }

    /// Set the zoom factor, clamped to the legal range.
    ///
    /// Offsets are re-clamped afterwards: zooming out shrinks the legal
    /// pan range, and an image panned hard against one edge must slide
    /// back so the crop region stays covered.
    pub fn set_zoom(&mut self, zoom: f64) -> ViewportState {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let (x, y) = self.clamp_offset(self.offset_x, self.offset_y);
        self.offset_x = x;
        self.offset_y = y;
        self.state()
    }

    /// Set the pan offset directly, clamped to the legal range.
    pub fn set_offset(&mut self, x: f64, y: f64) -> ViewportState {
        let (x, y) = self.clamp_offset(x, y);
        self.offset_x = x;
        self.offset_y = y;
        self.state()
    }

    /// Pan relative to a drag anchor.
    ///
    /// `anchor` is the offset captured when the drag began; `dx`/`dy` is
    /// the total pointer displacement since then. Applying the full delta
    /// against the anchor (rather than accumulating per-event deltas)
    /// keeps a clamped drag from drifting.
    pub fn pan_from(&mut self, anchor: (f64, f64), dx: f64, dy: f64) -> ViewportState {
        self.set_offset(anchor.0 + dx, anchor.1 + dy)
    }

    fn clamp_offset(&self, x: f64, y: f64) -> (f64, f64) {
        let (max_x, max_y) = self.max_offset();
        (x.clamp(-max_x, max_x), y.clamp(-max_y, max_y))
    }

    /// The crop region mapped into source pixel coordinates.
    ///
    /// This is the one canvas-to-source conversion in the engine. The
    /// preview thumbnail and the final export both crop exactly this
    /// rectangle, so they can never drift apart.
    pub fn source_crop_rect(&self) -> SourceRect {
        let (image_x, image_y) = self.image_origin();
        let (crop_x, crop_y) = self.crop_origin();
        let scale_x = self.source_w as f64 / (self.display_w * self.zoom);
        let scale_y = self.source_h as f64 / (self.display_h * self.zoom);
        let width = (self.crop_w * scale_x).min(self.source_w as f64);
        let height = (self.crop_h * scale_y).min(self.source_h as f64);
        // Exact-coverage zoom can land a hair outside the source bounds.
        let x = ((crop_x - image_x) * scale_x)
            .max(0.0)
            .min(self.source_w as f64 - width);
        let y = ((crop_y - image_y) * scale_y)
            .max(0.0)
            .min(self.source_h as f64 - height);
        SourceRect {
            x,
            y,
            width,
            height,
        }
    }
}
