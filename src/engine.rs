use std::time::Duration;

use log::{info, warn};

use crate::error::GenerationError;
use crate::glyph::{self, Rasterizer};
use crate::render::Surface;
use crate::session::GenerationSession;
use crate::settings::{EngineConfig, GenerationSettings};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Units are scheduled; advance the engine to run them.
    Started,
    /// The glyph sampled to zero points. `on_complete` already ran and nothing
    /// was scheduled.
    EmptyGlyphPath,
}

/// Host entry point: owns the rasterizer, the canvas configuration and at most
/// one active [`GenerationSession`].
pub struct Engine<R>
where
    R: Rasterizer,
{
    rasterizer: R,
    config: EngineConfig,
    session: Option<GenerationSession>,
}

impl<R> Engine<R>
where
    R: Rasterizer,
{
    pub fn new(rasterizer: R, config: EngineConfig) -> Self {
        Self {
            rasterizer,
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn start<F>(&mut self, settings: GenerationSettings, on_complete: F) -> Result<StartOutcome, GenerationError>
    where
        F: FnOnce() + 'static,
    {
        if self.is_active() {
            return Err(GenerationError::SessionAlreadyActive);
        }

        let cloud = glyph::sample(
            &self.rasterizer,
            &settings.text,
            &settings.font_family,
            settings.font_weight,
            self.config.glyph_size,
        );

        if cloud.is_empty() {
            warn!("Glyph {:?} has no visible pixels, nothing to draw", settings.text);
            on_complete();
            return Ok(StartOutcome::EmptyGlyphPath);
        }

        info!(
            "Starting {} with {} iterations, seed {}",
            settings.algorithm, settings.iterations, settings.seed
        );

        let mut session = GenerationSession::new(settings, cloud, &self.config, Box::new(on_complete));
        session.begin();

        if session.is_generating() {
            self.session = Some(session);
        }

        Ok(StartOutcome::Started)
    }

    /// Cancels the active run, if any. `on_complete` is not called.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.stop();
        }
    }

    pub fn is_active(&self) -> bool {
        self.session
            .as_ref()
            .map(|session| session.is_generating())
            .unwrap_or(false)
    }

    pub fn session(&self) -> Option<&GenerationSession> {
        self.session.as_ref()
    }

    /// One time slice: lets `elapsed` pass and runs at most `budget` due units.
    pub fn advance(&mut self, elapsed: Duration, budget: usize, surface: &mut dyn Surface) -> usize {
        self.check_surface(surface);

        let ran = match self.session.as_mut() {
            Some(session) => session.advance(elapsed, budget, surface),
            None => 0,
        };

        self.release_finished();

        ran
    }

    pub fn run_to_completion(&mut self, surface: &mut dyn Surface) -> usize {
        self.check_surface(surface);

        let ran = match self.session.as_mut() {
            Some(session) => session.drain(surface),
            None => 0,
        };

        self.release_finished();

        ran
    }

    // Placement margins and the tile layout are computed from the configured
    // canvas, not from the surface.
    fn check_surface(&self, surface: &dyn Surface) {
        debug_assert_eq!(
            surface.size(),
            self.config.canvas,
            "surface size does not match the configured canvas"
        );
    }

    fn release_finished(&mut self) {
        if !self.is_active() {
            self.session = None;
        }
    }
}
