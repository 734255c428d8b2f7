use std::ops::Deref;
use std::rc::Rc;

use log::debug;

use crate::grid::Grid;

/// Substituted when the requested text is empty.
pub const DEFAULT_GLYPH: &str = "A";

/// Coverage values above this are part of the shape.
pub const ALPHA_THRESHOLD: u8 = 128;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `distance` from `self` in direction `angle` (radians).
    pub fn project(&self, angle: f64, distance: f64) -> Self {
        Self::new(
            self.x + angle.cos() * distance,
            self.y + angle.sin() * distance,
        )
    }

    pub fn rotate(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();

        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

/// Renders text into an alpha coverage raster.
///
/// The returned grid is `2 * size` on each side with the text centered in it;
/// every cell holds coverage in `0..=255`.
pub trait Rasterizer {
    fn rasterize(&self, text: &str, family: &str, weight: u16, size: u32) -> Grid<u8>;
}

/// Immutable offsets of a rendered shape relative to its center.
///
/// Cheap to clone; all clones share the same points.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPointCloud {
    points: Rc<[Point]>,
}

impl GlyphPointCloud {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points: points.into(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Deref for GlyphPointCloud {
    type Target = [Point];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

pub fn sample<R>(rasterizer: &R, text: &str, family: &str, weight: u16, size: u32) -> GlyphPointCloud
where
    R: Rasterizer + ?Sized,
{
    let text = if text.is_empty() { DEFAULT_GLYPH } else { text };
    let raster = rasterizer.rasterize(text, family, weight, size);
    let center = size as f64;

    let points: Vec<Point> = raster
        .iter()
        .filter(|&(_, _, &alpha)| alpha > ALPHA_THRESHOLD)
        .map(|(x, y, _)| Point::new(x as f64 - center, y as f64 - center))
        .collect();

    debug!(
        "Sampled {} points from {:?} ({} {}, {}px)",
        points.len(),
        text,
        family,
        weight,
        size
    );

    GlyphPointCloud::new(points)
}
