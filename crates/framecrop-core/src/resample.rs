//! Bilinear resampling from source rasters.
//!
//! Both the preview canvas and the final export are produced by sampling
//! the source at fractional positions. Sampling is edge-clamped: windows
//! that touch the image border repeat the border pixel instead of mixing
//! in a background color, so exports at exact-coverage zoom have no dark
//! fringe.

use crate::decode::SourceImage;
use crate::viewport::SourceRect;

/// Read one pixel as floating-point RGB.
#[inline]
fn pixel_at(image: &SourceImage, x: u32, y: u32) -> [f64; 3] {
    let idx = (y as usize * image.width as usize + x as usize) * 3;
    [
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ]
}

/// Sample the source at a fractional position with bilinear filtering.
///
/// `x` and `y` are in pixel-index space: integer coordinates land exactly
/// on pixel centers. Positions outside the grid clamp to the edge pixel.
pub fn sample_bilinear(image: &SourceImage, x: f64, y: f64) -> [u8; 3] {
    let max_x = (image.width - 1) as f64;
    let max_y = (image.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = pixel_at(image, x0, y0);
    let p10 = pixel_at(image, x1, y0);
    let p01 = pixel_at(image, x0, y1);
    let p11 = pixel_at(image, x1, y1);

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] * (1.0 - fx) + p10[c] * fx;
        let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
        let value = top * (1.0 - fy) + bottom * fy;
        out[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Resample a fractional source window into a `dst_w` x `dst_h` RGB buffer.
///
/// Destination pixel centers are spread evenly across the window with a
/// half-pixel inset on each side, so a window that matches the source
/// pixel grid reproduces it exactly.
pub fn resample_region(
    image: &SourceImage,
    window: SourceRect,
    dst_w: u32,
    dst_h: u32,
) -> Vec<u8> {
    let step_x = window.width / dst_w as f64;
    let step_y = window.height / dst_h as f64;

    let mut pixels = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);
    for dy in 0..dst_h {
        let src_y = window.y + (dy as f64 + 0.5) * step_y - 0.5;
        for dx in 0..dst_w {
            let src_x = window.x + (dx as f64 + 0.5) * step_x - 0.5;
            pixels.extend_from_slice(&sample_bilinear(image, src_x, src_y));
        }
    }
    pixels
}
