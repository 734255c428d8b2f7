use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use log::{debug, info, trace};

use crate::glyph::GlyphPointCloud;
use crate::grid::Size;
use crate::render::Surface;
use crate::rng::Lcg;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::settings::{ColorPalette, EngineConfig, GenerationSettings};
use crate::variant::{self, Flow, Unit, UnitContext, Variant};

pub type OnComplete = Box<dyn FnOnce()>;

/// Bookkeeping for one run: the variant, its pending units and the
/// completion continuation.
///
/// A session ends either by completing, which runs `on_complete` once, or by
/// [`GenerationSession::stop`]. Both clear the pending set.
pub struct GenerationSession {
    settings: GenerationSettings,
    canvas: Size,
    cloud: GlyphPointCloud,
    palette: ColorPalette,
    rng: Lcg,
    variant: Box<dyn Variant>,
    scheduler: Scheduler<Unit>,
    pending: HashSet<TaskHandle>,
    is_generating: bool,
    on_complete: Option<OnComplete>,
    draws: usize,
    units_run: usize,
}

impl GenerationSession {
    pub fn new(
        settings: GenerationSettings,
        cloud: GlyphPointCloud,
        config: &EngineConfig,
        on_complete: OnComplete,
    ) -> Self {
        let variant = variant::for_algorithm(
            settings.algorithm,
            settings.iterations,
            config.canvas,
            &config.timings,
        );

        Self {
            canvas: config.canvas,
            palette: ColorPalette::named(settings.palette),
            rng: Lcg::new(settings.seed),
            settings,
            cloud,
            variant,
            scheduler: Scheduler::new(),
            pending: HashSet::new(),
            is_generating: false,
            on_complete: Some(on_complete),
            draws: 0,
            units_run: 0,
        }
    }

    /// Schedules the variant's first units. A variant with nothing to do
    /// completes on the spot.
    pub fn begin(&mut self) {
        if self.is_generating || self.on_complete.is_none() {
            return;
        }

        self.is_generating = true;

        let seeds = self.variant.seed();

        debug!("Seeding {} units for {}", seeds.len(), self.settings.algorithm);

        if seeds.is_empty() {
            self.complete();
            return;
        }

        for (delay, unit) in seeds {
            let handle = self.scheduler.schedule(delay, unit);
            self.pending.insert(handle);
        }
    }

    /// Lets `elapsed` virtual time pass and runs at most `budget` due units.
    pub fn advance(&mut self, elapsed: Duration, budget: usize, surface: &mut dyn Surface) -> usize {
        if !self.is_generating {
            return 0;
        }

        self.scheduler.advance(elapsed);

        let mut ran = 0;

        while ran < budget && self.is_generating {
            let (handle, unit) = match self.scheduler.pop_due() {
                Some(task) => task,
                None => break,
            };

            self.pending.remove(&handle);
            self.units_run += 1;
            ran += 1;

            trace!("Running {:?}", unit);

            let flow = match unit {
                Unit::Complete => Flow::Complete,
                unit => {
                    let mut ctx = UnitContext {
                        rng: &mut self.rng,
                        canvas: self.canvas,
                        cloud: &self.cloud,
                        palette: &self.palette,
                        surface: &mut *surface,
                        scheduler: &mut self.scheduler,
                        pending: &mut self.pending,
                        draws: &mut self.draws,
                    };

                    self.variant.run(unit, &mut ctx)
                }
            };

            if flow == Flow::Complete {
                self.complete();
            }
        }

        ran
    }

    pub fn drain(&mut self, surface: &mut dyn Surface) -> usize {
        let mut ran = 0;

        while self.is_generating && self.scheduler.skip_to_next() {
            ran += self.advance(Duration::ZERO, usize::MAX, surface);
        }

        ran
    }

    /// Cancels every pending unit and goes idle without calling `on_complete`.
    pub fn stop(&mut self) {
        let cancelled = self.scheduler.cancel_all(self.pending.iter());

        self.pending.clear();
        self.is_generating = false;

        debug!("Stopped session, {} units cancelled", cancelled);
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn pending_units(&self) -> impl Iterator<Item = &Unit> {
        self.scheduler.units().map(|(_, unit)| unit)
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn units_run(&self) -> usize {
        self.units_run
    }

    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn cloud(&self) -> &GlyphPointCloud {
        &self.cloud
    }

    fn complete(&mut self) {
        let cancelled = self.scheduler.cancel_all(self.pending.iter());

        self.pending.clear();
        self.is_generating = false;

        if cancelled > 0 {
            debug!("{} units still pending at completion were dropped", cancelled);
        }

        info!(
            "Generation completed: {} draws in {} units over {:?}",
            self.draws,
            self.units_run,
            self.scheduler.now()
        );

        if let Some(on_complete) = self.on_complete.take() {
            on_complete();
        }
    }
}

impl fmt::Debug for GenerationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationSession")
            .field("settings", &self.settings)
            .field("is_generating", &self.is_generating)
            .field("pending", &self.pending.len())
            .field("draws", &self.draws)
            .finish()
    }
}
