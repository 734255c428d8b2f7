use std::f64::consts::PI;
use std::time::Duration;

use super::{Flow, Unit, UnitContext, Variant};
use crate::glyph::Point;
use crate::grid::Size;
use crate::render::GlyphDraw;

pub const STEPS_PER_ITERATION: usize = 20;

const GOLDEN_ANGLE: f64 = PI * 0.618;

/// Placements along a golden angle spiral, shrinking and fading outwards.
pub struct SpiralTransform {
    center: Point,
    max_radius: f64,
    total: usize,
    delay: Duration,
}

impl SpiralTransform {
    pub fn new(canvas: Size, iterations: u32, delay: Duration) -> Self {
        let (cx, cy) = canvas.center();

        Self {
            center: Point::new(cx, cy),
            max_radius: canvas.min_side() as f64 * 0.45,
            total: iterations as usize * STEPS_PER_ITERATION,
            delay,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

impl Variant for SpiralTransform {
    fn seed(&mut self) -> Vec<(Duration, Unit)> {
        if self.total == 0 {
            return Vec::new();
        }

        vec![(Duration::ZERO, Unit::Step(0))]
    }

    fn run(&mut self, unit: Unit, ctx: &mut UnitContext<'_>) -> Flow {
        let index = match unit {
            Unit::Step(index) if index < self.total => index,
            _ => return Flow::Continue,
        };

        let progress = index as f64 / self.total as f64;
        let angle = index as f64 * GOLDEN_ANGLE;
        let color = ctx.pick_color();

        ctx.draw(GlyphDraw {
            origin: self.center.project(angle, progress * self.max_radius),
            scale: 1.0 - 0.9 * progress,
            rotation: angle,
            color,
            alpha: 1.0 - 0.7 * progress,
        });

        if index + 1 == self.total {
            return Flow::Complete;
        }

        ctx.schedule(self.delay, Unit::Step(index + 1));

        Flow::Continue
    }
}
