#[cfg(feature = "image")]
pub mod image_surface;

use crate::glyph::{GlyphPointCloud, Point};
use crate::grid::Size;
use crate::settings::Color;

#[cfg(feature = "image")]
pub use image_surface::ImageSurface;

/// One motif instance: where and how a point cloud is stamped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphDraw {
    pub origin: Point,
    pub scale: f64,
    /// Radians.
    pub rotation: f64,
    pub color: Color,
    pub alpha: f64,
}

impl GlyphDraw {
    /// Side of the square each point is drawn as.
    pub fn dot_size(&self) -> f64 {
        (2.0 * self.scale).max(1.0)
    }

    /// Canvas position of a cloud point under this placement.
    pub fn place(&self, point: &Point) -> Point {
        let scaled = Point::new(point.x * self.scale, point.y * self.scale).rotate(self.rotation);

        Point::new(self.origin.x + scaled.x, self.origin.y + scaled.y)
    }
}

/// Drawing target provided by the host.
///
/// Draws happen synchronously from inside a generation unit and must not
/// defer work of their own.
pub trait Surface {
    fn size(&self) -> Size;

    fn draw_glyph_at(&mut self, cloud: &GlyphPointCloud, draw: &GlyphDraw);
}

/// Surface that keeps the ordered list of draws instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Size,
    pub draws: Vec<GlyphDraw>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            draws: Vec::new(),
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn draw_glyph_at(&mut self, _cloud: &GlyphPointCloud, draw: &GlyphDraw) {
        self.draws.push(*draw);
    }
}
