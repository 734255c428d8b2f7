use std::f64::consts::{FRAC_PI_2, PI};
use std::time::Duration;

use super::{draw_branch, Branch, Flow, Unit, UnitContext, Variant};
use crate::glyph::Point;
use crate::grid::Size;

pub struct TreeBranching {
    root: Branch,
    delay: Duration,
    completion: Duration,
}

impl TreeBranching {
    pub fn new(canvas: Size, iterations: u32, delay: Duration, completion: Duration) -> Self {
        let (cx, cy) = canvas.center();
        let anchor = Point::new(cx, cy - canvas.height as f64 / 4.0);

        Self {
            // grows upwards
            root: Branch::root(anchor, -FRAC_PI_2, iterations),
            delay,
            completion,
        }
    }
}

impl Variant for TreeBranching {
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

        let count = 2 + (ctx.rng.next_f64() * 2.0).floor() as usize;

        for _ in 0..count {
            let angle = node.rotation + (ctx.rng.next_f64() - 0.5) * 0.8 * PI;
            let length = node.scale * (60.0 + ctx.rng.next_f64() * 40.0);
            let scale = node.scale * (0.4 + ctx.rng.next_f64() * 0.3);

            let child = node.child(node.position.project(angle, length), scale, angle);
            ctx.spawn(self.delay, child);
        }

        Flow::Continue
    }
}
