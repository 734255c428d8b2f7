//! The four placement algorithms.
//!
//! A run is a worklist: every pending piece of work is a [`Unit`] record in the
//! session's scheduler. Running a unit draws zero or more glyphs and may
//! schedule successor units; a variant reports the end of a run either by
//! returning [`Flow::Complete`] or by seeding a [`Unit::Complete`] timer.

mod division;
mod spiral;
mod tiling;
mod tree;

pub use division::RecursiveDivision;
pub use spiral::SpiralTransform;
pub use tiling::GeometricTiling;
pub use tree::TreeBranching;

use std::collections::HashSet;
use std::time::Duration;

use log::trace;

use crate::glyph::{GlyphPointCloud, Point};
use crate::grid::Size;
use crate::render::{GlyphDraw, Surface};
use crate::rng::Lcg;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::settings::{Algorithm, Color, ColorPalette, Timings, PALETTE_SIZE};

/// Branches stop once their scale decays below this.
pub const MIN_SCALE: f64 = 0.01;

/// Placements further than this outside the canvas are skipped.
pub const PLACEMENT_MARGIN: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub position: Point,
    pub scale: f64,
    pub rotation: f64,
    pub depth: u32,
    pub remaining: u32,
}

impl Branch {
    pub fn root(position: Point, rotation: f64, iterations: u32) -> Self {
        Self {
            position,
            scale: 1.0,
            rotation,
            depth: 0,
            remaining: iterations,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0 || self.scale < MIN_SCALE
    }

    pub fn child(&self, position: Point, scale: f64, rotation: f64) -> Self {
        Self {
            position,
            scale,
            rotation,
            depth: self.depth + 1,
            remaining: self.remaining - 1,
        }
    }

    pub fn alpha(&self) -> f64 {
        (1.0 - self.depth as f64 * 0.15).max(0.1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    Branch(Branch),
    Step(usize),
    /// Timer that ends the run regardless of outstanding units.
    Complete,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Complete,
}

pub trait Variant {
    /// Units to schedule when the run starts, with their delays. An empty list
    /// completes the run immediately.
    fn seed(&mut self) -> Vec<(Duration, Unit)>;

    fn run(&mut self, unit: Unit, ctx: &mut UnitContext<'_>) -> Flow;
}

pub fn for_algorithm(algorithm: Algorithm, iterations: u32, canvas: Size, timings: &Timings) -> Box<dyn Variant> {
    let delay = timings.unit_delay[algorithm];
    let completion = timings.completion_per_iteration * iterations;

    match algorithm {
        Algorithm::RecursiveDivision => Box::new(RecursiveDivision::new(canvas, iterations, delay, completion)),
        Algorithm::SpiralTransform => Box::new(SpiralTransform::new(canvas, iterations, delay)),
        Algorithm::TreeBranching => Box::new(TreeBranching::new(canvas, iterations, delay, completion)),
        Algorithm::GeometricTiling => Box::new(GeometricTiling::new(canvas, iterations, delay)),
    }
}

pub struct UnitContext<'a> {
    pub rng: &'a mut Lcg,
    pub canvas: Size,
    pub(crate) cloud: &'a GlyphPointCloud,
    pub(crate) palette: &'a ColorPalette,
    pub(crate) surface: &'a mut dyn Surface,
    pub(crate) scheduler: &'a mut Scheduler<Unit>,
    pub(crate) pending: &'a mut HashSet<TaskHandle>,
    pub(crate) draws: &'a mut usize,
}

impl<'a> UnitContext<'a> {
    pub fn pick_color(&mut self) -> Color {
        self.palette.colors[self.rng.next_index(PALETTE_SIZE)]
    }

    pub fn draw(&mut self, draw: GlyphDraw) {
        *self.draws += 1;
        self.surface.draw_glyph_at(self.cloud, &draw);
    }

    pub fn schedule(&mut self, delay: Duration, unit: Unit) -> TaskHandle {
        let handle = self.scheduler.schedule(delay, unit);

        self.pending.insert(handle);

        handle
    }

    pub fn spawn(&mut self, delay: Duration, child: Branch) -> Option<TaskHandle> {
        let Point { x, y } = child.position;

        if !self.canvas.contains_with_margin(x, y, PLACEMENT_MARGIN) {
            trace!("Skipping out of bounds placement at ({:.1}, {:.1})", x, y);
            return None;
        }

        Some(self.schedule(delay, Unit::Branch(child)))
    }
}

pub(crate) fn draw_branch(branch: &Branch, ctx: &mut UnitContext<'_>) {
    let color = ctx.pick_color();

    ctx.draw(GlyphDraw {
        origin: branch.position,
        scale: branch.scale,
        rotation: branch.rotation,
        color,
        alpha: branch.alpha(),
    });
}
