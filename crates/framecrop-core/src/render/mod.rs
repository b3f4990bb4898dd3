//! Preview composition.
//!
//! The live preview is rendered entirely on the CPU into plain RGBA
//! buffers that the host blits to a canvas. Rendering is deterministic:
//! identical source, viewport and shape produce byte-identical output,
//! so hosts can cache frames keyed on viewport state.

mod overlay;
mod preview;

pub use preview::{render_preview, PreviewFrame};

use crate::CropShape;

/// An RGBA8 raster produced for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGBA bytes, `width * height * 4` long.
    pub pixels: Vec<u8>,
}

impl Pixmap {
    /// Allocate a pixmap filled with an opaque color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert packed RGB to RGBA, masking alpha by shape coverage.
    ///
    /// Alpha is binary: pixels whose center lies inside the shape are
    /// fully opaque, everything outside fully transparent. The hard edge
    /// means a fully-covered circular export contains no translucent
    /// pixels inside the disc.
    pub fn from_rgb_masked(shape: CropShape, rgb: &[u8], width: u32, height: u32) -> Self {
        debug_assert_eq!(rgb.len(), width as usize * height as usize * 3);
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            let ny = (y as f64 + 0.5) / height as f64 - 0.5;
            for x in 0..width {
                let nx = (x as f64 + 0.5) / width as f64 - 0.5;
                let idx = (y as usize * width as usize + x as usize) * 3;
                let alpha = if shape.contains(nx, ny) { 255 } else { 0 };
                pixels.extend_from_slice(&[rgb[idx], rgb[idx + 1], rgb[idx + 2], alpha]);
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Overwrite one pixel with an opaque color.
    #[inline]
    pub(crate) fn put(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = self.index(x, y);
        self.pixels[idx] = rgb[0];
        self.pixels[idx + 1] = rgb[1];
        self.pixels[idx + 2] = rgb[2];
        self.pixels[idx + 3] = 255;
    }

    /// Read one pixel as RGBA.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Blend an `alpha`-weighted color over one pixel, integer-exact.
    #[inline]
    pub(crate) fn blend(&mut self, x: u32, y: u32, rgb: [u8; 3], alpha: u8) {
        let idx = self.index(x, y);
        for c in 0..3 {
            let base = self.pixels[idx + c] as u32;
            let over = rgb[c] as u32;
            let a = alpha as u32;
            self.pixels[idx + c] = ((over * a + base * (255 - a) + 127) / 255) as u8;
        }
        self.pixels[idx + 3] = 255;
    }
}
