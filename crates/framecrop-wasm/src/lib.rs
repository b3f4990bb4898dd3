//! Framecrop WASM - WebAssembly bindings for Framecrop
//!
//! This crate provides WASM bindings to expose the framecrop-core crop
//! engine to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - The interactive crop session (load, zoom, pan, preview, commit)
//! - `types` - WASM-compatible wrapper types for viewport, preview and output data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession } from '@framecrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! // Circular avatar crop; pass { aspectRatio: 3 } for a banner
//! const session = new JsCropSession(undefined);
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const viewport = session.load(bytes);
//!
//! session.set_zoom(viewport.zoom * 1.2);
//! const frame = session.render_preview();
//! ctx.putImageData(
//!   new ImageData(new Uint8ClampedArray(frame.composite_pixels()), 500, 500),
//!   0, 0);
//!
//! const output = session.commit();
//! const blob = new Blob([output.bytes()], { type: output.mime_type() });
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod types;

// Re-export public types
pub use session::JsCropSession;
pub use types::{JsEncodedImage, JsPreviewFrame, JsViewport};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
