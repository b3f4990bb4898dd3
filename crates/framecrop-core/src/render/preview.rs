//! Live preview composition.

use super::{overlay, Pixmap};
use crate::decode::SourceImage;
use crate::resample::{resample_region, sample_bilinear};
use crate::viewport::Viewport;
use crate::{CropShape, CANVAS_SIZE, CIRCLE_THUMB_SIZE, RECT_THUMB_WIDTH};

/// Dialog backdrop behind the letterboxed image.
const BACKDROP_RGB: [u8; 3] = [18, 18, 18];

/// One rendered preview frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    /// The 500x500 interactive canvas: image, veil, border, markers.
    pub composite: Pixmap,
    /// Small preview of exactly the region that would be committed.
    pub thumb: Pixmap,
}

/// Compose the preview for the current viewport.
///
/// The composite shows the scaled source under the crop overlay; the
/// thumb resamples [`Viewport::source_crop_rect`], the same window the
/// export uses, so it always agrees with what a commit would produce.
pub fn render_preview(
    source: &SourceImage,
    viewport: &Viewport,
    shape: CropShape,
) -> PreviewFrame {
    let side = CANVAS_SIZE as u32;
    let mut composite = Pixmap::filled(side, side, BACKDROP_RGB);
    draw_source(&mut composite, source, viewport);

    let origin = viewport.crop_origin();
    let size = viewport.crop_size();
    overlay::dim_outside(&mut composite, shape, origin, size);
    overlay::stroke_region(&mut composite, shape, origin, size);
    overlay::draw_markers(&mut composite, shape, origin, size);

    PreviewFrame {
        composite,
        thumb: render_thumb(source, viewport, shape),
    }
}

/// Draw the zoomed, panned source onto the canvas.
fn draw_source(target: &mut Pixmap, source: &SourceImage, viewport: &Viewport) {
    let (origin_x, origin_y) = viewport.image_origin();
    let (scaled_w, scaled_h) = viewport.scaled_size();
    let scale_x = source.width as f64 / scaled_w;
    let scale_y = source.height as f64 / scaled_h;

    let first_x = origin_x.floor().max(0.0) as u32;
    let first_y = origin_y.floor().max(0.0) as u32;
    let last_x = ((origin_x + scaled_w).ceil().max(0.0) as u32).min(target.width);
    let last_y = ((origin_y + scaled_h).ceil().max(0.0) as u32).min(target.height);

    for y in first_y..last_y {
        let cy = y as f64 + 0.5;
        if cy < origin_y || cy >= origin_y + scaled_h {
            continue;
        }
        let src_y = (cy - origin_y) * scale_y - 0.5;
        for x in first_x..last_x {
            let cx = x as f64 + 0.5;
            if cx < origin_x || cx >= origin_x + scaled_w {
                continue;
            }
            let src_x = (cx - origin_x) * scale_x - 0.5;
            target.put(x, y, sample_bilinear(source, src_x, src_y));
        }
    }
}

/// Resample the committed region at summary size.
fn render_thumb(source: &SourceImage, viewport: &Viewport, shape: CropShape) -> Pixmap {
    let window = viewport.source_crop_rect();
    let (width, height) = match shape {
        CropShape::Circle => (CIRCLE_THUMB_SIZE, CIRCLE_THUMB_SIZE),
        CropShape::Rect { aspect } => {
            let height = ((RECT_THUMB_WIDTH as f64 / aspect).round() as u32).max(1);
            (RECT_THUMB_WIDTH, height)
        }
    };
    let rgb = resample_region(source, window, width, height);
    Pixmap::from_rgb_masked(shape, &rgb, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::SourceImage;

    fn solid_source(width: u32, height: u32, rgb: [u8; 3]) -> SourceImage {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        SourceImage::new(width, height, pixels)
    }

    #[test]
    fn test_composite_dimensions() {
        let source = solid_source(1000, 1000, [120, 60, 30]);
        let viewport = Viewport::new(1000, 1000, CropShape::Circle);
        let frame = render_preview(&source, &viewport, CropShape::Circle);
        assert_eq!((frame.composite.width, frame.composite.height), (500, 500));
        assert_eq!(frame.composite.pixels.len(), 500 * 500 * 4);
    }

    #[test]
    fn test_region_center_shows_source() {
        let source = solid_source(1000, 1000, [200, 40, 40]);
        let viewport = Viewport::new(1000, 1000, CropShape::Circle);
        let frame = render_preview(&source, &viewport, CropShape::Circle);
        assert_eq!(frame.composite.get(250, 250), [200, 40, 40, 255]);
    }

    #[test]
    fn test_backdrop_outside_small_image() {
        // At minimum zoom a square source scales to 300x300, leaving the
        // canvas corners on the backdrop. They are veiled but not black.
        let source = solid_source(1000, 1000, [250, 250, 250]);
        let mut viewport = Viewport::new(1000, 1000, CropShape::Circle);
        viewport.set_zoom(0.0);
        let frame = render_preview(&source, &viewport, CropShape::Circle);

        let mut expected = Pixmap::filled(1, 1, BACKDROP_RGB);
        expected.blend(0, 0, [0, 0, 0], overlay::DIM_ALPHA);
        assert_eq!(frame.composite.get(0, 0), expected.get(0, 0));
    }

    #[test]
    fn test_outside_region_is_dimmer_than_inside() {
        let source = solid_source(1000, 1000, [250, 250, 250]);
        let viewport = Viewport::new(1000, 1000, CropShape::Circle);
        let frame = render_preview(&source, &viewport, CropShape::Circle);
        let inside = frame.composite.get(250, 250);
        let outside = frame.composite.get(20, 250);
        assert!(outside[0] < inside[0]);
    }

    #[test]
    fn test_render_is_deterministic() {
        let source = SourceImage::new(
            400,
            400,
            (0..(400 * 400 * 3)).map(|i| (i * 7 % 256) as u8).collect(),
        );
        let mut viewport = Viewport::new(400, 400, CropShape::Circle);
        viewport.set_zoom(1.3);
        viewport.set_offset(40.0, -25.0);

        let a = render_preview(&source, &viewport, CropShape::Circle);
        let b = render_preview(&source, &viewport, CropShape::Circle);
        assert_eq!(a.composite.pixels, b.composite.pixels);
        assert_eq!(a.thumb.pixels, b.thumb.pixels);
    }

    #[test]
    fn test_circle_thumb_shape() {
        let source = solid_source(1000, 1000, [9, 9, 9]);
        let viewport = Viewport::new(1000, 1000, CropShape::Circle);
        let frame = render_preview(&source, &viewport, CropShape::Circle);
        assert_eq!((frame.thumb.width, frame.thumb.height), (100, 100));
        assert_eq!(frame.thumb.get(0, 0)[3], 0);
        assert_eq!(frame.thumb.get(50, 50)[3], 255);
    }

    #[test]
    fn test_rect_thumb_shape() {
        let shape = CropShape::Rect { aspect: 3.0 };
        let source = solid_source(2000, 1000, [9, 9, 9]);
        let viewport = Viewport::new(2000, 1000, shape);
        let frame = render_preview(&source, &viewport, shape);
        assert_eq!((frame.thumb.width, frame.thumb.height), (150, 50));
        assert!(frame.thumb.pixels.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_thumb_tracks_pan() {
        // A source split into a red left half and green right half: pan
        // left/right and the thumb follows.
        let mut pixels = Vec::with_capacity(1000 * 1000 * 3);
        for _y in 0..1000u32 {
            for x in 0..1000u32 {
                if x < 500 {
                    pixels.extend_from_slice(&[220, 0, 0]);
                } else {
                    pixels.extend_from_slice(&[0, 220, 0]);
                }
            }
        }
        let source = SourceImage::new(1000, 1000, pixels);
        let mut viewport = Viewport::new(1000, 1000, CropShape::Circle);
        viewport.set_zoom(4.0);

        viewport.set_offset(-850.0, 0.0);
        let left = render_preview(&source, &viewport, CropShape::Circle);
        assert_eq!(&left.thumb.get(50, 50)[..3], &[220, 0, 0]);

        viewport.set_offset(850.0, 0.0);
        let right = render_preview(&source, &viewport, CropShape::Circle);
        assert_eq!(&right.thumb.get(50, 50)[..3], &[0, 220, 0]);
    }
}
