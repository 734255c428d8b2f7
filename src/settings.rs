use core::str::FromStr;
use std::fmt;
use std::time::Duration;

use enum_map::{enum_map, Enum, EnumMap};

#[cfg(feature = "image")]
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::grid::Size;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Enum)]
#[cfg_attr(feature = "image", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "image", serde(rename_all = "kebab-case"))]
pub enum Algorithm {
    #[cfg_attr(feature = "image", serde(alias = "division"))]
    RecursiveDivision,
    #[cfg_attr(feature = "image", serde(alias = "spiral"))]
    SpiralTransform,
    #[cfg_attr(feature = "image", serde(alias = "tree"))]
    TreeBranching,
    #[cfg_attr(feature = "image", serde(alias = "tiling"))]
    GeometricTiling,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::RecursiveDivision,
        Algorithm::SpiralTransform,
        Algorithm::TreeBranching,
        Algorithm::GeometricTiling,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::RecursiveDivision => "recursive-division",
            Algorithm::SpiralTransform => "spiral-transform",
            Algorithm::TreeBranching => "tree-branching",
            Algorithm::GeometricTiling => "geometric-tiling",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recursive-division" | "recursive" | "division" => Ok(Algorithm::RecursiveDivision),
            "spiral-transform" | "spiral" => Ok(Algorithm::SpiralTransform),
            "tree-branching" | "tree" => Ok(Algorithm::TreeBranching),
            "geometric-tiling" | "tiling" | "geometric" => Ok(Algorithm::GeometricTiling),
            _ => Err(GenerationError::UnknownAlgorithm(s.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "image", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "image", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "image", serde(rename_all = "kebab-case"))]
pub enum PaletteName {
    Neon,
    Sunset,
    Ocean,
    Forest,
    Monochrome,
}

impl FromStr for PaletteName {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "neon" => Ok(PaletteName::Neon),
            "sunset" => Ok(PaletteName::Sunset),
            "ocean" => Ok(PaletteName::Ocean),
            "forest" => Ok(PaletteName::Forest),
            "monochrome" | "mono" => Ok(PaletteName::Monochrome),
            _ => Err(GenerationError::UnknownPalette(s.to_string())),
        }
    }
}

pub const PALETTE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    pub name: PaletteName,
    pub colors: [Color; PALETTE_SIZE],
}

impl ColorPalette {
    pub fn named(name: PaletteName) -> Self {
        let colors = match name {
            PaletteName::Neon => [
                Color::rgb(0xff, 0x00, 0x6e),
                Color::rgb(0xfb, 0x56, 0x07),
                Color::rgb(0xff, 0xbe, 0x0b),
                Color::rgb(0x83, 0x38, 0xec),
                Color::rgb(0x3a, 0x86, 0xff),
            ],
            PaletteName::Sunset => [
                Color::rgb(0xf7, 0x25, 0x85),
                Color::rgb(0xb5, 0x17, 0x9e),
                Color::rgb(0x72, 0x09, 0xb7),
                Color::rgb(0xf4, 0xa2, 0x61),
                Color::rgb(0xe7, 0x6f, 0x51),
            ],
            PaletteName::Ocean => [
                Color::rgb(0x03, 0x04, 0x5e),
                Color::rgb(0x02, 0x3e, 0x8a),
                Color::rgb(0x00, 0x77, 0xb6),
                Color::rgb(0x00, 0xb4, 0xd8),
                Color::rgb(0x90, 0xe0, 0xef),
            ],
            PaletteName::Forest => [
                Color::rgb(0x2d, 0x6a, 0x4f),
                Color::rgb(0x40, 0x91, 0x6c),
                Color::rgb(0x52, 0xb7, 0x88),
                Color::rgb(0x74, 0xc6, 0x9d),
                Color::rgb(0xb7, 0xe4, 0xc7),
            ],
            PaletteName::Monochrome => [
                Color::rgb(0xff, 0xff, 0xff),
                Color::rgb(0xcc, 0xcc, 0xcc),
                Color::rgb(0x99, 0x99, 0x99),
                Color::rgb(0x66, 0x66, 0x66),
                Color::rgb(0x33, 0x33, 0x33),
            ],
        };

        Self { name, colors }
    }
}

/// Inputs of one run. The engine takes a snapshot by value and never changes it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "image", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "image", serde(rename_all = "camelCase", default))]
pub struct GenerationSettings {
    pub text: String,
    pub font_family: String,
    pub font_weight: u16,
    pub algorithm: Algorithm,
    pub iterations: u32,
    pub seed: u64,
    pub palette: PaletteName,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            text: "A".to_string(),
            font_family: "sans-serif".to_string(),
            font_weight: 400,
            algorithm: Algorithm::RecursiveDivision,
            iterations: 5,
            seed: 12345,
            palette: PaletteName::Neon,
        }
    }
}

/// Delays between units, per algorithm.
#[derive(Debug, Clone)]
pub struct Timings {
    /// Branch children for division/tree, next index for spiral, per-index
    /// stagger for tiling.
    pub unit_delay: EnumMap<Algorithm, Duration>,
    /// Completion estimate per iteration for the branching algorithms.
    pub completion_per_iteration: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            unit_delay: enum_map! {
                Algorithm::RecursiveDivision => Duration::from_millis(100),
                Algorithm::SpiralTransform => Duration::from_millis(10),
                Algorithm::TreeBranching => Duration::from_millis(100),
                Algorithm::GeometricTiling => Duration::from_millis(10),
            },
            completion_per_iteration: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub canvas: Size,
    /// Half the side of the raster glyphs are sampled from, in pixels.
    pub glyph_size: u32,
    pub timings: Timings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: Size::new(800, 600),
            glyph_size: 60,
            timings: Timings::default(),
        }
    }
}
