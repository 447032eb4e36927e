use crate::projection::{CanvasSpec, Projection};
use crate::track::{GeoPoint, MIN_RENDERABLE_POINTS};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use itertools::Itertools;
use std::io::Cursor;
use std::path::Path;

pub const DEFAULT_BG_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// RGBA raster every track is drawn onto.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(spec: CanvasSpec, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(spec.width_px, spec.height_px, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Draws a 1px polyline through the projected `points`, in order.
    ///
    /// Segments are clipped to the canvas first, so points far outside the
    /// visible window are fine. Each joint is painted once, so translucent
    /// colors do not get darker where two segments meet.
    pub fn draw_polyline(
        &mut self,
        points: &[GeoPoint],
        projection: &Projection,
        color: Rgba<u8>,
    ) {
        if points.len() < MIN_RENDERABLE_POINTS {
            return;
        }
        let last_segment = points.len() - 2;
        for (i, (from, to)) in points
            .iter()
            .map(|point| projection.project(point))
            .tuple_windows()
            .enumerate()
        {
            self.draw_segment(from, to, color, i == last_segment);
        }
    }

    fn draw_segment(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        color: Rgba<u8>,
        is_last_segment: bool,
    ) {
        let (width, height) = (self.width(), self.height());
        let Some(clipped) = clip_segment(from, to, width as f64, height as f64) else {
            return;
        };
        // The end pixel belongs to the next segment, unless there is none or
        // the next segment starts somewhere else because of clipping.
        let include_end = is_last_segment || clipped.end_clipped;

        let to_pixel = |(x, y): (f64, f64)| {
            (
                (x.floor() as i64).clamp(0, width as i64 - 1),
                (y.floor() as i64).clamp(0, height as i64 - 1),
            )
        };
        let (mut x, mut y) = to_pixel(clipped.from);
        let (x1, y1) = to_pixel(clipped.to);

        // Bresenham, all octants.
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if x == x1 && y == y1 {
                if include_end {
                    self.blend_pixel(x, y, color);
                }
                break;
            }
            self.blend_pixel(x, y, color);
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(pixel) = self.image.get_pixel_mut_checked(x as u32, y as u32) {
            *pixel = blend_source_over(*pixel, color);
        }
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut image_png: Vec<u8> = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut image_png), ImageFormat::Png)
            .context("failed to encode png")?;
        Ok(image_png)
    }

    pub fn save_png(&self, file_path: &Path) -> Result<()> {
        self.image
            .save_with_format(file_path, ImageFormat::Png)
            .with_context(|| format!("failed to write {}", file_path.display()))
    }
}

/// Standard (non-premultiplied) "source over" compositing of `src` onto `dst`.
pub fn blend_source_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }
    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let channel = |i: usize| {
        let c = (src[i] as f32 * src_a + dst[i] as f32 * dst_a * (1.0 - src_a)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

struct ClippedSegment {
    from: (f64, f64),
    to: (f64, f64),
    end_clipped: bool,
}

// Liang-Barsky against the `[0, width] x [0, height]` rectangle.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    width: f64,
    height: f64,
) -> Option<ClippedSegment> {
    let (x0, y0) = from;
    let dx = to.0 - x0;
    let dy = to.1 - y0;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [(-dx, x0), (dx, width - x0), (-dy, y0), (dy, height - y0)] {
        if p == 0.0 {
            // parallel to this edge
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    Some(ClippedSegment {
        from: (x0 + t0 * dx, y0 + t0 * dy),
        to: (x0 + t1 * dx, y0 + t1 * dy),
        end_clipped: t1 < 1.0,
    })
}
