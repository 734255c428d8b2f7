#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glyph_fractal::{
    Algorithm, Engine, EngineConfig, GenerationSettings, Grid, PaletteName, Rasterizer, Size,
};

// Fixed seed for deterministic tests
pub const TEST_SEED: u64 = 42;

/// Filled disk of radius `size / 2` centered in the raster.
pub struct DiskRasterizer;

impl Rasterizer for DiskRasterizer {
    fn rasterize(&self, _text: &str, _family: &str, _weight: u16, size: u32) -> Grid<u8> {
        let side = 2 * size as usize;
        let center = size as f64;
        let radius = size as f64 / 2.0;

        Grid::new(side, side, &mut |x, y| {
            let dx = x as f64 + 0.5 - center;
            let dy = y as f64 + 0.5 - center;

            if dx * dx + dy * dy <= radius * radius {
                255
            } else {
                0
            }
        })
    }
}

/// Renders nothing, whatever the text.
pub struct BlankRasterizer;

impl Rasterizer for BlankRasterizer {
    fn rasterize(&self, _text: &str, _family: &str, _weight: u16, size: u32) -> Grid<u8> {
        let side = 2 * size as usize;

        Grid::new(side, side, &mut |_, _| 0)
    }
}

/// Remembers the text of every request.
#[derive(Default)]
pub struct SpyRasterizer {
    pub requests: RefCell<Vec<String>>,
}

impl Rasterizer for SpyRasterizer {
    fn rasterize(&self, text: &str, family: &str, weight: u16, size: u32) -> Grid<u8> {
        self.requests.borrow_mut().push(text.to_string());

        DiskRasterizer.rasterize(text, family, weight, size)
    }
}

pub fn test_config(canvas: Size) -> EngineConfig {
    EngineConfig {
        canvas,
        glyph_size: 4,
        ..Default::default()
    }
}

pub fn test_settings(algorithm: Algorithm, iterations: u32, seed: u64) -> GenerationSettings {
    GenerationSettings {
        text: "G".to_string(),
        font_family: "test".to_string(),
        font_weight: 400,
        algorithm,
        iterations,
        seed,
        palette: PaletteName::Ocean,
    }
}

pub fn test_engine<R: Rasterizer>(rasterizer: R) -> Engine<R> {
    Engine::new(rasterizer, test_config(Size::new(200, 200)))
}

/// Completion callback that counts its invocations.
pub fn completion_counter() -> (Rc<Cell<usize>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let callback = {
        let count = count.clone();
        move || count.set(count.get() + 1)
    };

    (count, callback)
}
