//! Pixel buffer the signature is drawn into.

use image::{Rgba, RgbaImage};

use crate::session::StrokePoint;

/// Transparent RGBA raster. Strokes are drawn in solid black.
#[derive(Debug, Clone)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Reallocates the pixel buffer. Like any raster surface, the previous
    /// contents are lost.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|pixel| pixel[3] == 0)
    }

    /// Draws a line segment of the given width with round caps.
    ///
    /// The segment is rasterized as a capsule: every pixel whose center lies
    /// within `width / 2` of the segment is inked, with a one-pixel
    /// coverage ramp at the edge. Parts outside the raster are clipped.
    pub fn draw_segment(&mut self, from: StrokePoint, to: StrokePoint, width: f32) {
        let radius = width / 2.0;
        let reach = radius + 0.5;

        let min_x = (from.x.min(to.x) - reach).floor().max(0.0);
        let min_y = (from.y.min(to.y) - reach).floor().max(0.0);
        let max_x = (from.x.max(to.x) + reach).ceil().min(self.width() as f32);
        let max_y = (from.y.max(to.y) + reach).ceil().min(self.height() as f32);
        if min_x >= max_x || min_y >= max_y {
            return;
        }

        for py in min_y as u32..max_y as u32 {
            for px in min_x as u32..max_x as u32 {
                let center = StrokePoint::new(px as f32 + 0.5, py as f32 + 0.5);
                let distance = distance_to_segment(center, from, to);
                let coverage = (reach - distance).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let alpha = (coverage * 255.0).round() as u8;
                let pixel = self.image.get_pixel_mut(px, py);
                if alpha > pixel[3] {
                    *pixel = Rgba([0, 0, 0, alpha]);
                }
            }
        }
    }
}

fn distance_to_segment(p: StrokePoint, a: StrokePoint, b: StrokePoint) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}
