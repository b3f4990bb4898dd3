//! Crop-region overlay drawing.
//!
//! Everything painted on top of the image: the dim veil outside the
//! region, the region border, and the drag affordances (corner marks for
//! rectangles, cardinal dots for circles). All drawing uses pixel-center
//! coverage tests and integer blending, keeping frames reproducible.

use super::Pixmap;
use crate::CropShape;

/// Opacity of the black veil over everything outside the crop region.
pub(crate) const DIM_ALPHA: u8 = 150;

/// Border and affordance color.
const STROKE_RGB: [u8; 3] = [255, 255, 255];

/// Stroke width of the region border.
const BORDER_THICKNESS: f64 = 2.0;

/// Length of each rectangular corner mark arm.
const MARK_LENGTH: f64 = 18.0;

/// Thickness of the rectangular corner marks.
const MARK_THICKNESS: f64 = 3.0;

/// Radius of the circular cardinal dots.
const DOT_RADIUS: f64 = 4.0;

/// Darken every pixel whose center falls outside the crop region.
pub(crate) fn dim_outside(
    pix: &mut Pixmap,
    shape: CropShape,
    origin: (f64, f64),
    size: (f64, f64),
) {
    let center_x = origin.0 + size.0 / 2.0;
    let center_y = origin.1 + size.1 / 2.0;
    for y in 0..pix.height {
        let ny = (y as f64 + 0.5 - center_y) / size.1;
        for x in 0..pix.width {
            let nx = (x as f64 + 0.5 - center_x) / size.0;
            if !shape.contains(nx, ny) {
                pix.blend(x, y, [0, 0, 0], DIM_ALPHA);
            }
        }
    }
}

/// Stroke the crop region outline.
pub(crate) fn stroke_region(
    pix: &mut Pixmap,
    shape: CropShape,
    origin: (f64, f64),
    size: (f64, f64),
) {
    let half = BORDER_THICKNESS / 2.0;
    match shape {
        CropShape::Rect { .. } => {
            let (x0, y0) = origin;
            let (x1, y1) = (origin.0 + size.0, origin.1 + size.1);
            for_each_pixel_in(pix, x0 - half, y0 - half, x1 + half, y1 + half, |px, x, y| {
                let inside_inner =
                    x > x0 + half && x < x1 - half && y > y0 + half && y < y1 - half;
                if !inside_inner {
                    px.put(x as u32, y as u32, STROKE_RGB);
                }
            });
        }
        CropShape::Circle => {
            let radius = size.0 / 2.0;
            let cx = origin.0 + radius;
            let cy = origin.1 + radius;
            let outer = radius + half;
            for_each_pixel_in(pix, cx - outer, cy - outer, cx + outer, cy + outer, |px, x, y| {
                let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                if (dist - radius).abs() <= half {
                    px.put(x as u32, y as u32, STROKE_RGB);
                }
            });
        }
    }
}

/// Paint the drag affordances for the region.
pub(crate) fn draw_markers(
    pix: &mut Pixmap,
    shape: CropShape,
    origin: (f64, f64),
    size: (f64, f64),
) {
    match shape {
        CropShape::Rect { .. } => {
            let (x0, y0) = origin;
            let (x1, y1) = (origin.0 + size.0, origin.1 + size.1);
            let len = MARK_LENGTH;
            let t = MARK_THICKNESS;
            // One L per corner, drawn flush with the inside of the edge.
            fill_rect(pix, x0, y0, x0 + len, y0 + t);
            fill_rect(pix, x0, y0, x0 + t, y0 + len);
            fill_rect(pix, x1 - len, y0, x1, y0 + t);
            fill_rect(pix, x1 - t, y0, x1, y0 + len);
            fill_rect(pix, x0, y1 - t, x0 + len, y1);
            fill_rect(pix, x0, y1 - len, x0 + t, y1);
            fill_rect(pix, x1 - len, y1 - t, x1, y1);
            fill_rect(pix, x1 - t, y1 - len, x1, y1);
        }
        CropShape::Circle => {
            let radius = size.0 / 2.0;
            let cx = origin.0 + radius;
            let cy = origin.1 + radius;
            // Dots at the four cardinal points of the rim.
            fill_disc(pix, cx, cy - radius, DOT_RADIUS);
            fill_disc(pix, cx + radius, cy, DOT_RADIUS);
            fill_disc(pix, cx, cy + radius, DOT_RADIUS);
            fill_disc(pix, cx - radius, cy, DOT_RADIUS);
        }
    }
}

/// Run `f` for every pixel whose center lies inside the given box,
/// clipped to the pixmap. `f` receives the center coordinates.
fn for_each_pixel_in<F>(pix: &mut Pixmap, x0: f64, y0: f64, x1: f64, y1: f64, mut f: F)
where
    F: FnMut(&mut Pixmap, f64, f64),
{
    let first_x = x0.floor().max(0.0) as u32;
    let first_y = y0.floor().max(0.0) as u32;
    let last_x = (x1.ceil().max(0.0) as u32).min(pix.width);
    let last_y = (y1.ceil().max(0.0) as u32).min(pix.height);
    for y in first_y..last_y {
        let cy = y as f64 + 0.5;
        if cy < y0 || cy >= y1 {
            continue;
        }
        for x in first_x..last_x {
            let cx = x as f64 + 0.5;
            if cx < x0 || cx >= x1 {
                continue;
            }
            f(pix, cx, cy);
        }
    }
}

/// Fill an axis-aligned box with the stroke color.
fn fill_rect(pix: &mut Pixmap, x0: f64, y0: f64, x1: f64, y1: f64) {
    for_each_pixel_in(pix, x0, y0, x1, y1, |px, cx, cy| {
        px.put(cx as u32, cy as u32, STROKE_RGB);
    });
}

/// Fill a disc with the stroke color.
fn fill_disc(pix: &mut Pixmap, cx: f64, cy: f64, radius: f64) {
    for_each_pixel_in(
        pix,
        cx - radius,
        cy - radius,
        cx + radius,
        cy + radius,
        |px, x, y| {
            if (x - cx).powi(2) + (y - cy).powi(2) <= radius * radius {
                px.put(x as u32, y as u32, STROKE_RGB);
            }
        },
    );
}
