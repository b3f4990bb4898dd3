//! WASM-compatible wrapper types for crop engine data.
//!
//! This module provides JavaScript-friendly types that wrap the core Framecrop
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use framecrop_core::{EncodedImage, PreviewFrame, ViewportState};
use wasm_bindgen::prelude::*;

/// An encoded output image wrapper for JavaScript.
///
/// This type wraps the core `EncodedImage` type and provides a
/// JavaScript-friendly interface for accessing the compressed bytes and
/// the metadata needed to upload or display them.
///
/// # Memory Management
///
/// The encoded bytes are stored in WASM memory. When you call `bytes()`, a
/// copy is made to JavaScript memory as a `Uint8Array`. The `free()` method
/// can be called to explicitly release WASM memory, but this is optional as
/// wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
pub struct JsEncodedImage {
    inner: EncodedImage,
}

#[wasm_bindgen]
impl JsEncodedImage {
    /// Get the output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of bytes in the encoded file
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }

    /// Get the MIME type of the encoded file ("image/png" or "image/jpeg")
    pub fn mime_type(&self) -> String {
        self.inner.mime.as_str().to_string()
    }

    /// Returns the encoded file as a Uint8Array.
    ///
    /// Note: This creates a copy of the byte data. The copy is what you hand
    /// to `new Blob([...])` or an upload request.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup
    /// automatically. Call this if you want to immediately release memory
    /// for a large output.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsEncodedImage {
    /// Wrap a core EncodedImage.
    ///
    /// This is an internal constructor used by the session bindings.
    pub(crate) fn from_core(inner: EncodedImage) -> Self {
        Self { inner }
    }
}

/// A preview frame wrapper for JavaScript.
///
/// Holds the 500x500 composite and the small thumbnail produced by a render
/// pass. Both buffers are RGBA and sized to be written straight into an
/// `ImageData` for a canvas `putImageData` call.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `composite_pixels()` and
/// `thumb_pixels()` each copy their buffer to JavaScript memory as a
/// `Uint8Array`; call them once per rendered frame.
#[wasm_bindgen]
pub struct JsPreviewFrame {
    inner: PreviewFrame,
}

#[wasm_bindgen]
impl JsPreviewFrame {
    /// Get the composite width in pixels (always 500)
    #[wasm_bindgen(getter)]
    pub fn composite_width(&self) -> u32 {
        self.inner.composite.width
    }

    /// Get the composite height in pixels (always 500)
    #[wasm_bindgen(getter)]
    pub fn composite_height(&self) -> u32 {
        self.inner.composite.height
    }

    /// Returns the composite RGBA pixels as a Uint8Array
    pub fn composite_pixels(&self) -> Vec<u8> {
        self.inner.composite.pixels.clone()
    }

    /// Get the thumbnail width in pixels
    #[wasm_bindgen(getter)]
    pub fn thumb_width(&self) -> u32 {
        self.inner.thumb.width
    }

    /// Get the thumbnail height in pixels
    #[wasm_bindgen(getter)]
    pub fn thumb_height(&self) -> u32 {
        self.inner.thumb.height
    }

    /// Returns the thumbnail RGBA pixels as a Uint8Array
    pub fn thumb_pixels(&self) -> Vec<u8> {
        self.inner.thumb.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup
    /// automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsPreviewFrame {
    /// Wrap a core PreviewFrame.
    ///
    /// This is an internal constructor used by the session bindings.
    pub(crate) fn from_core(inner: PreviewFrame) -> Self {
        Self { inner }
    }
}

/// A viewport snapshot for JavaScript.
///
/// Reports the current zoom, the allowed zoom range, and the pan offset so
/// the UI can position its slider and keep its own state in sync after the
/// engine clamps a gesture.
#[wasm_bindgen]
pub struct JsViewport {
    inner: ViewportState,
}

#[wasm_bindgen]
impl JsViewport {
    /// Get the current zoom factor
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.zoom
    }

    /// Get the smallest zoom that still covers the crop region
    #[wasm_bindgen(getter)]
    pub fn min_zoom(&self) -> f64 {
        self.inner.min_zoom
    }

    /// Get the largest zoom the slider should offer
    #[wasm_bindgen(getter)]
    pub fn max_zoom(&self) -> f64 {
        self.inner.max_zoom
    }

    /// Get the horizontal pan offset in canvas pixels
    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> f64 {
        self.inner.offset_x
    }

    /// Get the vertical pan offset in canvas pixels
    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> f64 {
        self.inner.offset_y
    }
}

impl JsViewport {
    /// Wrap a core ViewportState.
    ///
    /// This is an internal constructor used by the session bindings.
    pub(crate) fn from_state(inner: ViewportState) -> Self {
        Self { inner }
    }
}
