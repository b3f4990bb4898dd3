//! Crop session bindings.
//!
//! This module exposes the interactive crop session to JavaScript: one
//! `JsCropSession` per open dialog, fed by pointer and slider events,
//! rendered to a canvas, and committed into upload-ready bytes.

use framecrop_core::{CropSession, OutputSpec};
use wasm_bindgen::prelude::*;

use crate::types::{JsEncodedImage, JsPreviewFrame, JsViewport};

/// An interactive crop session for JavaScript.
///
/// The session owns the decoded source image and the zoom/pan viewport in
/// WASM memory; JavaScript only shuttles gesture deltas in and rendered
/// frames out. Create one session per dialog and drop it (or call `free()`)
/// when the dialog closes.
///
/// # Example (TypeScript)
/// ```typescript
/// // Circular avatar crop. Pass { aspectRatio: 3 } for a banner.
/// const session = new JsCropSession(undefined);
///
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const viewport = session.load(bytes);
/// slider.min = viewport.min_zoom;
/// slider.max = viewport.max_zoom;
/// slider.value = viewport.zoom;
///
/// canvas.onpointerdown = () => session.begin_pan();
/// canvas.onpointermove = (e) => {
///   session.pan(e.clientX - downX, e.clientY - downY);
///   draw(session.render_preview());
/// };
///
/// const output = session.commit();
/// const blob = new Blob([output.bytes()], { type: output.mime_type() });
/// ```
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Create a session from an output spec object.
    ///
    /// The spec is a plain object with optional camelCase fields:
    /// `{ aspectRatio?, minWidth?, minHeight? }`. Omitting `aspectRatio`
    /// (or passing `undefined`/`null` for the whole spec) selects the
    /// circular crop at the default export size.
    ///
    /// # Errors
    /// Throws when the spec is malformed or resolves to an unusable
    /// output, for example a zero or non-finite aspect ratio.
    #[wasm_bindgen(constructor)]
    pub fn new(spec: JsValue) -> Result<JsCropSession, JsValue> {
        let spec: OutputSpec = if spec.is_undefined() || spec.is_null() {
            OutputSpec::default()
        } else {
            serde_wasm_bindgen::from_value(spec)
                .map_err(|e| JsValue::from_str(&format!("Invalid output spec: {}", e)))?
        };
        let inner = CropSession::new(spec).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsCropSession { inner })
    }

    /// Check whether this session crops to a circle
    pub fn is_circular(&self) -> bool {
        self.inner.shape().is_circle()
    }

    /// Get the resolved export width in pixels
    #[wasm_bindgen(getter)]
    pub fn output_width(&self) -> u32 {
        self.inner.output_size().0
    }

    /// Get the resolved export height in pixels
    #[wasm_bindgen(getter)]
    pub fn output_height(&self) -> u32 {
        self.inner.output_size().1
    }

    /// Load an image file, replacing any previously loaded one.
    ///
    /// Accepts the raw bytes of the picked file (PNG, JPEG, GIF, WebP or
    /// BMP). EXIF orientation is applied during decode, so phone photos
    /// come out upright. Returns the reset viewport so the UI can
    /// configure its zoom slider.
    ///
    /// # Errors
    /// Throws when the bytes cannot be decoded or the image is smaller
    /// than 200 px on either side. The session stays open; the user can
    /// pick another file.
    pub fn load(&mut self, bytes: &[u8]) -> Result<JsViewport, JsValue> {
        self.inner
            .load(bytes)
            .map(JsViewport::from_state)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Snapshot the current viewport state.
    pub fn viewport(&self) -> Result<JsViewport, JsValue> {
        self.inner
            .viewport()
            .map(JsViewport::from_state)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Set the zoom factor.
    ///
    /// Values outside the allowed range are clamped, and the pan offset is
    /// re-clamped so the image keeps covering the crop region. Returns the
    /// viewport after clamping.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<JsViewport, JsValue> {
        self.inner
            .set_zoom(zoom)
            .map(JsViewport::from_state)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Start a drag gesture at the current offset.
    pub fn begin_pan(&mut self) -> Result<(), JsValue> {
        self.inner
            .begin_pan()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Pan by the total pointer displacement since the drag began.
    ///
    /// `dx` and `dy` are canvas pixels. Without a preceding `begin_pan()`
    /// each call is treated as incremental from the current offset.
    /// Returns the viewport after clamping.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<JsViewport, JsValue> {
        self.inner
            .pan(dx, dy)
            .map(JsViewport::from_state)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Finish a drag gesture.
    pub fn end_pan(&mut self) -> Result<(), JsValue> {
        self.inner
            .end_pan()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render the live preview for the current state.
    ///
    /// Returns the 500x500 composite plus the small thumbnail, both as
    /// RGBA buffers ready for `putImageData`.
    pub fn render_preview(&self) -> Result<JsPreviewFrame, JsValue> {
        self.inner
            .render_preview()
            .map(JsPreviewFrame::from_core)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Produce the final export and finish the session.
    ///
    /// Circular sessions export PNG with transparency outside the disc;
    /// rectangular sessions export JPEG. After a successful commit the
    /// session rejects further edits until a new file is loaded.
    ///
    /// # Errors
    /// Throws when no image is loaded, when the crop was already
    /// committed, or when encoding fails. An encoder failure leaves the
    /// session interactive so the user can retry.
    pub fn commit(&mut self) -> Result<JsEncodedImage, JsValue> {
        self.inner
            .commit()
            .map(JsEncodedImage::from_core)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup
    /// automatically. Call this when the dialog closes to release the
    /// decoded source image immediately.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

/// Note: The constructor and all error paths produce `JsValue`, which can
/// only be exercised on wasm targets. These tests build sessions directly
/// and stay on success paths; see `wasm_tests` for the rest.
#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;
    use std::io::Cursor;

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buffer = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn session_with(spec: OutputSpec) -> JsCropSession {
        JsCropSession {
            inner: CropSession::new(spec).unwrap(),
        }
    }

    #[test]
    fn test_circular_session_accessors() {
        let session = session_with(OutputSpec::circular());
        assert!(session.is_circular());
        assert_eq!(session.output_width(), 1200);
        assert_eq!(session.output_height(), 1200);
    }

    #[test]
    fn test_rect_session_accessors() {
        let session = session_with(OutputSpec::rectangular(3.0));
        assert!(!session.is_circular());
        assert_eq!(session.output_width(), 1200);
        assert_eq!(session.output_height(), 400);
    }

    #[test]
    fn test_load_reports_viewport() {
        let mut session = session_with(OutputSpec::circular());
        let vp = session.load(&png_fixture(1000, 1000)).unwrap();
        assert!((vp.zoom() - 2.3).abs() < 1e-9);
        assert!((vp.min_zoom() - 0.6).abs() < 1e-9);
        assert_eq!(vp.max_zoom(), 4.0);
        assert_eq!((vp.offset_x(), vp.offset_y()), (0.0, 0.0));
    }

    #[test]
    fn test_zoom_and_pan_flow() {
        let mut session = session_with(OutputSpec::circular());
        session.load(&png_fixture(1000, 1000)).unwrap();

        let vp = session.set_zoom(4.0).unwrap();
        assert_eq!(vp.zoom(), 4.0);

        session.begin_pan().unwrap();
        session.pan(30.0, 10.0).unwrap();
        let vp = session.pan(50.0, 20.0).unwrap();
        assert!((vp.offset_x() - 50.0).abs() < 1e-9);
        assert!((vp.offset_y() - 20.0).abs() < 1e-9);
        session.end_pan().unwrap();
    }

    #[test]
    fn test_render_preview_buffers() {
        let mut session = session_with(OutputSpec::circular());
        session.load(&png_fixture(1000, 1000)).unwrap();

        let frame = session.render_preview().unwrap();
        assert_eq!(frame.composite_width(), 500);
        assert_eq!(frame.composite_height(), 500);
        assert_eq!(frame.composite_pixels().len(), 500 * 500 * 4);
        assert_eq!(frame.thumb_width(), 100);
        assert_eq!(frame.thumb_height(), 100);
    }

    #[test]
    fn test_commit_produces_png() {
        let mut session = session_with(OutputSpec::circular());
        session.load(&png_fixture(1000, 1000)).unwrap();

        let output = session.commit().unwrap();
        assert_eq!(output.mime_type(), "image/png");
        assert_eq!(output.width(), 1200);
        assert_eq!(output.height(), 1200);
        assert_eq!(&output.bytes()[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_commit_produces_jpeg_for_rect() {
        let mut session = session_with(OutputSpec::rectangular(3.0));
        session.load(&png_fixture(600, 300)).unwrap();

        let output = session.commit().unwrap();
        assert_eq!(output.mime_type(), "image/jpeg");
        assert_eq!(output.width(), 1200);
        assert_eq!(output.height(), 400);
        assert_eq!(&output.bytes()[..2], &[0xFF, 0xD8]);
    }
}
