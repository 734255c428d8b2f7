use crate::error::GenerationError;
use crate::glyph::Rasterizer;
use crate::grid::Grid;

use log::{debug, warn};
use num_traits::cast::ToPrimitive;
use rusttype::{point, Font, Scale};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Registry of TrueType faces keyed by family name and weight.
#[derive(Default)]
pub struct FontRasterizer {
    families: HashMap<String, Vec<(u16, Font<'static>)>>,
}

impl FontRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, family: &str, weight: u16, data: Vec<u8>) -> Result<(), GenerationError> {
        let font = Font::try_from_vec(data)
            .ok_or_else(|| GenerationError::Font(format!("{} {} is not a valid font", family, weight)))?;

        debug!("Registered font {} {}", family, weight);

        self.families
            .entry(family.to_string())
            .or_default()
            .push((weight, font));

        Ok(())
    }

    pub fn register_file(&mut self, family: &str, weight: u16, path: &Path) -> Result<(), GenerationError> {
        let data = fs::read(path)
            .map_err(|e| GenerationError::Font(format!("{}: {}", path.display(), e)))?;

        self.register(family, weight, data)
    }

    /// Face of `family` whose weight is closest to `weight`.
    fn face(&self, family: &str, weight: u16) -> Option<&Font<'static>> {
        self.families
            .get(family)?
            .iter()
            .min_by_key(|(face_weight, _)| face_weight.abs_diff(weight))
            .map(|(_, font)| font)
    }
}

impl Rasterizer for FontRasterizer {
    fn rasterize(&self, text: &str, family: &str, weight: u16, size: u32) -> Grid<u8> {
        let side = 2 * size as usize;
        let mut raster = Grid::new(side, side, &mut |_, _| 0u8);

        let font = match self.face(family, weight) {
            Some(font) => font,
            None => {
                warn!("No font registered for family {:?}", family);
                return raster;
            }
        };

        let scale = Scale::uniform(size as f32);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<_> = font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();

        let width = glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        let height = v_metrics.ascent - v_metrics.descent;

        // center the text block on the raster midpoint
        let offset_x = (side as f32 - width) / 2.0;
        let offset_y = (side as f32 - height) / 2.0;

        for glyph in &glyphs {
            let bounds = match glyph.pixel_bounding_box() {
                Some(bounds) => bounds,
                None => continue,
            };

            glyph.draw(|x, y, coverage| {
                let px = (x as i32 + bounds.min.x) as f32 + offset_x;
                let py = (y as i32 + bounds.min.y) as f32 + offset_y;

                let (Some(px), Some(py)) = (px.round().to_usize(), py.round().to_usize()) else {
                    return;
                };
                let value = (coverage * 255.0).round().to_u8().unwrap_or(u8::MAX);

                if let Some(cell) = raster.get_mut(px, py) {
                    *cell = (*cell).max(value);
                }
            });
        }

        raster
    }
}
