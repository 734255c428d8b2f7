//! Deterministic, cancelable fractal compositions built from a sampled glyph.
//!
//! An [`Engine`] samples the glyph once per run, picks one of four placement
//! algorithms and feeds its units through a cooperative [`Scheduler`]. The host
//! advances the engine in time slices and receives draw calls on its
//! [`Surface`].

pub mod engine;
pub mod error;
pub mod glyph;
pub mod grid;
pub mod render;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod variant;

#[cfg(feature = "image")]
pub mod font;

pub use engine::{Engine, StartOutcome};
pub use error::GenerationError;
pub use glyph::{GlyphPointCloud, Point, Rasterizer};
pub use grid::{Grid, Size};
pub use render::{GlyphDraw, RecordingSurface, Surface};
pub use rng::Lcg;
pub use scheduler::{Scheduler, TaskHandle};
pub use session::GenerationSession;
pub use settings::{Algorithm, Color, ColorPalette, EngineConfig, GenerationSettings, PaletteName, Timings};

#[cfg(feature = "image")]
pub use font::FontRasterizer;

#[cfg(feature = "image")]
pub use render::ImageSurface;
