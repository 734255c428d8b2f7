use crate::cli::AppConfig;

use glyph_fractal::{
    Color, Engine, EngineConfig, FontRasterizer, ImageSurface, StartOutcome, Timings,
};

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::cell::Cell;
use std::fs::File;
use std::rc::Rc;
use std::time::Duration;

const BACKGROUND: Color = Color::rgb(0x0a, 0x0a, 0x12);

/// Virtual time handed to the engine per slice.
const FRAME: Duration = Duration::from_millis(16);

/// Most units run in a single slice.
const FRAME_BUDGET: usize = 256;

pub struct FractalApp {
    config: AppConfig,
}

impl FractalApp {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = &self.config.settings;

        // Load font
        let mut rasterizer = FontRasterizer::new();

        match &self.config.font_path {
            Some(path) => rasterizer.register_file(&settings.font_family, settings.font_weight, path)?,
            None => warn!("No font file given, the glyph will be empty"),
        }

        let mut engine = Engine::new(
            rasterizer,
            EngineConfig {
                canvas: self.config.canvas,
                glyph_size: self.config.glyph_size,
                timings: Timings::default(),
            },
        );
        let mut surface = ImageSurface::new(self.config.canvas, BACKGROUND);

        info!("Using seed: {}", settings.seed);

        let completed = Rc::new(Cell::new(false));
        let on_complete = {
            let completed = completed.clone();
            move || completed.set(true)
        };

        if engine.start(settings.clone(), on_complete)? == StartOutcome::EmptyGlyphPath {
            warn!("Nothing to draw for {:?}", settings.text);
        }

        // Progress spinner
        let progress = ProgressBar::new_spinner();
        progress.enable_steady_tick(Duration::from_millis(200));
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos:>7} units {per_sec:>12}")
                .unwrap(),
        );

        // Main generation loop
        while engine.is_active() {
            let ran = engine.advance(FRAME, FRAME_BUDGET, &mut surface);
            progress.inc(ran as u64);
        }

        progress.finish();

        if !completed.get() {
            warn!("Generation ended without completing");
        }

        // Export image and settings sidecar
        surface.save(&self.config.output_path)?;

        let metadata_path = self.config.output_path.with_extension("json");
        serde_json::to_writer_pretty(File::create(&metadata_path)?, settings)?;

        info!(
            "Saved {} and {}",
            self.config.output_path.display(),
            metadata_path.display()
        );

        Ok(())
    }
}
