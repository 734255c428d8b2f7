use std::f64::consts::PI;
use std::time::Duration;

use log::debug;

use super::{Flow, Unit, UnitContext, Variant};
use crate::glyph::Point;
use crate::grid::{Grid, Size};
use crate::render::GlyphDraw;

/// A grid of independently scaled and rotated copies covering the canvas.
pub struct GeometricTiling {
    tiles: Grid<Point>,
    stagger: Duration,
}

impl GeometricTiling {
    pub fn new(canvas: Size, iterations: u32, stagger: Duration) -> Self {
        let tile_size = tile_size(canvas, iterations);
        let (cols, rows) = if tile_size > 0.0 {
            (
                (canvas.width as f64 / tile_size + 1.0).ceil() as usize,
                (canvas.height as f64 / tile_size + 1.0).ceil() as usize,
            )
        } else {
            (0, 0)
        };

        debug!("Tiling {}x{} tiles of {:.1}px", cols, rows, tile_size);

        Self {
            tiles: Grid::new(cols, rows, &mut |x, y| {
                Point::new(x as f64 * tile_size, y as f64 * tile_size)
            }),
            stagger,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.size()
    }
}

pub fn tile_size(canvas: Size, iterations: u32) -> f64 {
    canvas.min_side() as f64 / (iterations as f64 + 2.0)
}

impl Variant for GeometricTiling {
    fn seed(&mut self) -> Vec<(Duration, Unit)> {
        (0..self.tiles.size())
            .map(|index| (self.stagger * index as u32, Unit::Step(index)))
            .collect()
    }

    fn run(&mut self, unit: Unit, ctx: &mut UnitContext<'_>) -> Flow {
        let (index, origin) = match unit {
            Unit::Step(index) => match self.tiles.get_index(index) {
                Some(origin) => (index, *origin),
                None => return Flow::Continue,
            },
            _ => return Flow::Continue,
        };

        let color = ctx.pick_color();
        let scale = ctx.rng.next_span(0.5, 0.5);
        let rotation = ctx.rng.next_span(0.0, 2.0 * PI);
        let alpha = ctx.rng.next_span(0.3, 0.4);

        ctx.draw(GlyphDraw {
            origin,
            scale,
            rotation,
            color,
            alpha,
        });

        if index + 1 == self.tiles.size() {
            Flow::Complete
        } else {
            Flow::Continue
        }
    }
}
