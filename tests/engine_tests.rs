mod common;

use std::time::Duration;

use glyph_fractal::glyph::sample;
use glyph_fractal::variant::{Unit, MIN_SCALE};
use glyph_fractal::{
    Algorithm, Engine, GenerationError, GenerationSession, GlyphDraw, RecordingSurface, Size,
    StartOutcome,
};

use common::{
    completion_counter, test_config, test_engine, test_settings, BlankRasterizer, DiskRasterizer,
    TEST_SEED,
};

const FOREVER: Duration = Duration::from_secs(3600);

fn record_run(algorithm: Algorithm, iterations: u32, seed: u64) -> Vec<GlyphDraw> {
    let mut engine = test_engine(DiskRasterizer);
    let mut surface = RecordingSurface::new(engine.config().canvas);
    let (completed, on_complete) = completion_counter();

    engine
        .start(test_settings(algorithm, iterations, seed), on_complete)
        .unwrap();
    engine.run_to_completion(&mut surface);

    assert_eq!(completed.get(), 1);
    assert!(!engine.is_active());

    surface.draws
}

fn max_pending_depth<R: glyph_fractal::Rasterizer>(engine: &Engine<R>) -> u32 {
    engine
        .session()
        .map(|session| {
            session
                .pending_units()
                .filter_map(|unit| match unit {
                    Unit::Branch(branch) => Some(branch.depth),
                    _ => None,
                })
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0)
}

#[test]
fn test_runs_are_deterministic() {
    for algorithm in Algorithm::ALL {
        let first = record_run(algorithm, 3, TEST_SEED);
        let second = record_run(algorithm, 3, TEST_SEED);

        assert!(!first.is_empty(), "{} drew nothing", algorithm);
        assert_eq!(first, second, "{} is not deterministic", algorithm);
    }
}

#[test]
fn test_seed_changes_the_composition() {
    let first = record_run(Algorithm::RecursiveDivision, 3, 1);
    let second = record_run(Algorithm::RecursiveDivision, 3, 2);

    assert_ne!(first, second);
}

#[test]
fn test_branch_depth_never_exceeds_iterations() {
    for algorithm in [Algorithm::RecursiveDivision, Algorithm::TreeBranching] {
        for iterations in 0..4 {
            let mut engine = test_engine(DiskRasterizer);
            let mut surface = RecordingSurface::new(engine.config().canvas);
            let (_, on_complete) = completion_counter();

            engine
                .start(test_settings(algorithm, iterations, TEST_SEED), on_complete)
                .unwrap();

            while engine.is_active() {
                assert!(max_pending_depth(&engine) <= iterations);
                engine.advance(FOREVER, 1, &mut surface);
            }
        }
    }
}

#[test]
fn test_branches_stop_once_scale_decays() {
    // 0.7^13 < MIN_SCALE, so no branch gets deeper than 13 whatever the budget
    for algorithm in [Algorithm::RecursiveDivision, Algorithm::TreeBranching] {
        let mut engine = test_engine(DiskRasterizer);
        let mut surface = RecordingSurface::new(engine.config().canvas);
        let (completed, on_complete) = completion_counter();
        let mut deepest = 0;

        engine
            .start(test_settings(algorithm, 40, TEST_SEED), on_complete)
            .unwrap();

        while engine.is_active() {
            deepest = deepest.max(max_pending_depth(&engine));
            engine.advance(Duration::from_millis(100), usize::MAX, &mut surface);
        }

        assert_eq!(completed.get(), 1, "{} never completed", algorithm);
        assert!(deepest > 4, "{} stopped at depth {}", algorithm, deepest);
        assert!(deepest <= 13, "{} reached depth {}", algorithm, deepest);
        assert!(surface.draws.iter().all(|d| d.scale >= MIN_SCALE));
        assert!(surface.draws.iter().any(|d| d.scale < 0.05));
    }
}

#[test]
fn test_branch_alpha_follows_depth() {
    let draws = record_run(Algorithm::RecursiveDivision, 3, TEST_SEED);

    assert_eq!(draws[0].alpha, 1.0);
    assert_eq!(draws[0].scale, 1.0);
    assert!(draws.iter().all(|d| d.alpha >= 0.1 && d.alpha <= 1.0));
    assert!(draws.iter().skip(1).all(|d| d.scale <= 0.7));
}

#[test]
fn test_tile_count_matches_grid() {
    let canvas = Size::new(200, 150);
    let iterations = 3;

    let tile = canvas.min_side() as f64 / (iterations as f64 + 2.0);
    let expected = ((canvas.width as f64 / tile + 1.0).ceil() * (canvas.height as f64 / tile + 1.0).ceil()) as usize;
    assert_eq!(expected, 8 * 6);

    let mut engine = Engine::new(DiskRasterizer, test_config(canvas));
    let mut surface = RecordingSurface::new(canvas);
    let (completed, on_complete) = completion_counter();

    engine
        .start(test_settings(Algorithm::GeometricTiling, iterations, TEST_SEED), on_complete)
        .unwrap();

    assert_eq!(engine.session().unwrap().pending(), expected);

    engine.run_to_completion(&mut surface);

    assert_eq!(surface.draws.len(), expected);
    assert_eq!(completed.get(), 1);

    for draw in &surface.draws {
        assert!(draw.scale >= 0.5 && draw.scale <= 1.0);
        assert!(draw.alpha >= 0.3 && draw.alpha <= 0.7);
    }
}

#[test]
fn test_tiling_completes_on_last_tile() {
    let mut engine = test_engine(DiskRasterizer);
    let mut surface = RecordingSurface::new(engine.config().canvas);
    let (completed, on_complete) = completion_counter();

    engine
        .start(test_settings(Algorithm::GeometricTiling, 2, TEST_SEED), on_complete)
        .unwrap();

    let total = engine.session().unwrap().pending();

    for _ in 0..total - 1 {
        engine.advance(FOREVER, 1, &mut surface);
    }

    assert_eq!(completed.get(), 0);
    assert!(engine.is_active());

    engine.advance(FOREVER, 1, &mut surface);

    assert_eq!(completed.get(), 1);
    assert!(!engine.is_active());
    assert_eq!(surface.draws.len(), total);
}

#[test]
fn test_spiral_joins_exactly_after_last_unit() {
    let k = 3;
    let mut engine = test_engine(DiskRasterizer);
    let mut surface = RecordingSurface::new(engine.config().canvas);
    let (completed, on_complete) = completion_counter();

    engine
        .start(test_settings(Algorithm::SpiralTransform, k, TEST_SEED), on_complete)
        .unwrap();

    let mut units = 0;

    while units < 20 * k as usize - 1 {
        units += engine.advance(FOREVER, 1, &mut surface);
    }

    assert_eq!(completed.get(), 0);
    assert!(engine.is_active());

    units += engine.advance(FOREVER, 1, &mut surface);

    assert_eq!(units, 60);
    assert_eq!(surface.draws.len(), 60);
    assert_eq!(completed.get(), 1);
    assert!(!engine.is_active());
    assert_eq!(engine.advance(FOREVER, usize::MAX, &mut surface), 0);
}

#[test]
fn test_spiral_decays_outwards() {
    let draws = record_run(Algorithm::SpiralTransform, 2, TEST_SEED);

    assert!(draws.windows(2).all(|w| w[1].scale < w[0].scale && w[1].alpha < w[0].alpha));
    assert!(draws.iter().all(|d| d.scale >= 0.01));
}

#[test]
fn test_spiral_without_iterations_completes_at_start() {
    let mut engine = test_engine(DiskRasterizer);
    let (completed, on_complete) = completion_counter();

    let outcome = engine
        .start(test_settings(Algorithm::SpiralTransform, 0, TEST_SEED), on_complete)
        .unwrap();

    assert_eq!(outcome, StartOutcome::Started);
    assert_eq!(completed.get(), 1);
    assert!(!engine.is_active());
}

#[test]
fn test_division_completes_on_timer_estimate() {
    let mut engine = test_engine(DiskRasterizer);
    let mut surface = RecordingSurface::new(engine.config().canvas);
    let (completed, on_complete) = completion_counter();

    engine
        .start(test_settings(Algorithm::RecursiveDivision, 2, TEST_SEED), on_complete)
        .unwrap();

    // branches are done long before the 2 x 500ms estimate
    engine.advance(Duration::from_millis(999), usize::MAX, &mut surface);

    assert_eq!(completed.get(), 0);
    assert!(engine.is_active());
    assert_eq!(engine.session().unwrap().pending(), 1);

    let draws = surface.draws.len();
    engine.advance(Duration::from_millis(1), usize::MAX, &mut surface);

    assert_eq!(completed.get(), 1);
    assert_eq!(surface.draws.len(), draws);
    assert!(!engine.is_active());
}

#[test]
fn test_empty_glyph_short_circuits_every_algorithm() {
    for algorithm in Algorithm::ALL {
        let mut engine = test_engine(BlankRasterizer);
        let mut surface = RecordingSurface::new(engine.config().canvas);
        let (completed, on_complete) = completion_counter();

        let outcome = engine
            .start(test_settings(algorithm, 4, TEST_SEED), on_complete)
            .unwrap();

        assert_eq!(outcome, StartOutcome::EmptyGlyphPath);
        assert_eq!(completed.get(), 1);
        assert!(!engine.is_active());
        assert!(engine.session().is_none());

        assert_eq!(engine.run_to_completion(&mut surface), 0);
        assert!(surface.draws.is_empty());
    }
}

#[test]
fn test_start_while_active_is_rejected() {
    let mut engine = test_engine(DiskRasterizer);
    let (first, on_first) = completion_counter();
    let (second, on_second) = completion_counter();

    engine
        .start(test_settings(Algorithm::TreeBranching, 3, TEST_SEED), on_first)
        .unwrap();

    let result = engine.start(test_settings(Algorithm::SpiralTransform, 3, TEST_SEED), on_second);

    assert_eq!(result, Err(GenerationError::SessionAlreadyActive));
    assert_eq!(second.get(), 0);

    engine.stop();

    let (third, on_third) = completion_counter();
    engine
        .start(test_settings(Algorithm::SpiralTransform, 1, TEST_SEED), on_third)
        .unwrap();

    let mut surface = RecordingSurface::new(engine.config().canvas);
    engine.run_to_completion(&mut surface);

    assert_eq!(first.get(), 0);
    assert_eq!(third.get(), 1);
}

#[test]
fn test_stop_cancels_everything_silently() {
    let mut engine = test_engine(DiskRasterizer);
    let mut surface = RecordingSurface::new(engine.config().canvas);
    let (completed, on_complete) = completion_counter();

    engine
        .start(test_settings(Algorithm::RecursiveDivision, 4, TEST_SEED), on_complete)
        .unwrap();

    engine.advance(FOREVER, 3, &mut surface);
    assert!(engine.session().unwrap().pending() > 0);

    engine.stop();

    let draws = surface.draws.len();

    assert!(!engine.is_active());
    assert!(engine.session().is_none());
    assert_eq!(engine.advance(FOREVER, usize::MAX, &mut surface), 0);
    assert_eq!(engine.run_to_completion(&mut surface), 0);
    assert_eq!(surface.draws.len(), draws);
    assert_eq!(completed.get(), 0);

    // stopping twice is harmless
    engine.stop();
}

#[test]
fn test_session_stop_clears_pending_tasks() {
    let config = test_config(Size::new(200, 200));
    let settings = test_settings(Algorithm::TreeBranching, 4, TEST_SEED);
    let cloud = sample(&DiskRasterizer, &settings.text, &settings.font_family, settings.font_weight, config.glyph_size);
    let (completed, on_complete) = completion_counter();
    let mut surface = RecordingSurface::new(config.canvas);

    let mut session = GenerationSession::new(settings, cloud, &config, Box::new(on_complete));
    session.begin();
    session.advance(FOREVER, 2, &mut surface);

    assert!(session.is_generating());
    assert!(session.pending() > 0);

    session.stop();

    assert!(!session.is_generating());
    assert_eq!(session.pending(), 0);
    assert_eq!(session.pending_units().count(), 0);
    assert_eq!(session.advance(FOREVER, usize::MAX, &mut surface), 0);
    assert_eq!(completed.get(), 0);
}

#[test]
fn test_independent_sessions_do_not_interfere() {
    let config = test_config(Size::new(200, 200));
    let settings = test_settings(Algorithm::SpiralTransform, 1, TEST_SEED);
    let cloud = sample(&DiskRasterizer, "G", "test", 400, config.glyph_size);

    let (first_done, on_first) = completion_counter();
    let (second_done, on_second) = completion_counter();
    let mut first = GenerationSession::new(settings.clone(), cloud.clone(), &config, Box::new(on_first));
    let mut second = GenerationSession::new(settings, cloud, &config, Box::new(on_second));
    let mut first_surface = RecordingSurface::new(config.canvas);
    let mut second_surface = RecordingSurface::new(config.canvas);

    first.begin();
    second.begin();

    first.drain(&mut first_surface);
    second.advance(FOREVER, 5, &mut second_surface);
    second.stop();

    assert_eq!(first_done.get(), 1);
    assert_eq!(second_done.get(), 0);
    assert_eq!(first_surface.draws.len(), 20);
    assert_eq!(second_surface.draws[..], first_surface.draws[..5]);
}

#[test]
fn test_branches_stay_near_the_canvas() {
    for algorithm in [Algorithm::RecursiveDivision, Algorithm::TreeBranching] {
        let draws = record_run(algorithm, 4, TEST_SEED);

        for draw in draws {
            assert!(draw.origin.x >= -100.0 && draw.origin.x <= 300.0);
            assert!(draw.origin.y >= -100.0 && draw.origin.y <= 300.0);
        }
    }
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "surface size does not match the configured canvas")]
fn test_surface_must_match_canvas() {
    let mut engine = test_engine(DiskRasterizer);
    let mut surface = RecordingSurface::new(Size::new(640, 480));

    engine.advance(FOREVER, 1, &mut surface);
}
