use std::f64::consts::PI;
use std::time::Duration;

use super::{draw_branch, Branch, Flow, Unit, UnitContext, Variant};
use crate::glyph::Point;
use crate::grid::Size;

/// Radial subdivision from the canvas center: every node spawns three to five
/// smaller copies of itself spread around a full turn.
pub struct RecursiveDivision {
    root: Branch,
    delay: Duration,
    completion: Duration,
}

impl RecursiveDivision {
    pub fn new(canvas: Size, iterations: u32, delay: Duration, completion: Duration) -> Self {
        let (cx, cy) = canvas.center();

        Self {
            root: Branch::root(Point::new(cx, cy), 0.0, iterations),
            delay,
            completion,
        }
    }
}

impl Variant for RecursiveDivision {
    fn seed(&mut self) -> Vec<(Duration, Unit)> {
        vec![
            (Duration::ZERO, Unit::Branch(self.root.clone())),
            (self.completion, Unit::Complete),
        ]
    }

    fn run(&mut self, unit: Unit, ctx: &mut UnitContext<'_>) -> Flow {
        let node = match unit {
            Unit::Branch(node) if !node.is_exhausted() => node,
            _ => return Flow::Continue,
        };

        draw_branch(&node, ctx);

        let count = 3 + (ctx.rng.next_f64() * 3.0).floor() as usize;

        for i in 0..count {
            let angle = (i as f64 / count as f64) * 2.0 * PI + ctx.rng.next_f64() * 0.5 * PI;
            let distance = node.scale * (50.0 + ctx.rng.next_f64() * 100.0);
            let scale = node.scale * (0.4 + ctx.rng.next_f64() * 0.3);

            let child = node.child(node.position.project(angle, distance), scale, angle);
            ctx.spawn(self.delay, child);
        }

        Flow::Continue
    }
}
