use super::{GlyphDraw, Surface};
use crate::glyph::GlyphPointCloud;
use crate::grid::Size;
use crate::settings::Color;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, Blend};
use imageproc::rect::Rect;
use num_traits::cast::ToPrimitive;
use std::path::Path;

/// Raster surface that alpha blends every dot onto an RGBA image.
pub struct ImageSurface {
    canvas: Blend<RgbaImage>,
}

impl ImageSurface {
    pub fn new(size: Size, background: Color) -> Self {
        let image = RgbaImage::from_pixel(
            size.width as u32,
            size.height as u32,
            Rgba([background.r, background.g, background.b, 255]),
        );

        Self {
            canvas: Blend(image),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas.0
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas.0
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        self.canvas
            .0
            .save(path)
            .map_err(|e| format!("Failed to save image: {}", e))
    }
}

impl Surface for ImageSurface {
    fn size(&self) -> Size {
        let (width, height) = self.canvas.0.dimensions();

        Size::new(width as usize, height as usize)
    }

    fn draw_glyph_at(&mut self, cloud: &GlyphPointCloud, draw: &GlyphDraw) {
        let alpha = (draw.alpha.clamp(0.0, 1.0) * 255.0).round().to_u8().unwrap_or(255);
        let color = Rgba([draw.color.r, draw.color.g, draw.color.b, alpha]);
        let side = draw.dot_size().round().to_u32().unwrap_or(1).max(1);
        let half = draw.dot_size() / 2.0;

        for point in cloud.iter() {
            let placed = draw.place(point);
            let (Some(x), Some(y)) = ((placed.x - half).round().to_i32(), (placed.y - half).round().to_i32()) else {
                continue;
            };

            draw_filled_rect_mut(&mut self.canvas, Rect::at(x, y).of_size(side, side), color);
        }
    }
}
