//! Source-image loading.
//!
//! Uploads arrive as raw bytes in whatever container the user picked.
//! This module sniffs the format, decodes the first frame, applies EXIF
//! orientation so the rest of the engine only ever sees upright rasters,
//! and enforces the minimum source size.
//!
//! All operations are synchronous; the engine is designed to run inside
//! a Web Worker via the WASM bindings.

mod load;
mod types;

pub use load::load_source;
pub use types::{LoadError, Orientation, SourceImage};
