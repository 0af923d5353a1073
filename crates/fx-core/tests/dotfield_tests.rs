// Host-side tests for the point-field engine: grid construction, pointer
// tracking and the per-frame physics step.

use fx_core::{DotField, DotFieldConfig, FrameClock, PointerInput, PointerTracker};
use glam::Vec2;

fn make_config(gap: f32) -> DotFieldConfig {
    DotFieldConfig {
        dot_gap: gap,
        dot_color: "#0369a1".into(),
        glow_color: "#0369a1".into(),
        ..Default::default()
    }
}

fn make_field(gap: f32, width: f32, height: f32) -> DotField {
    DotField::new(make_config(gap), width, height, 42).expect("valid config")
}

fn moving_pointer(pos: Vec2, vel: Vec2) -> PointerInput {
    PointerInput {
        pos,
        vel,
        active: true,
    }
}

#[test]
fn grid_dimensions_match_surface() {
    // ceil(280/14)+2 = 22 cols, ceil(140/14)+2 = 12 rows.
    let field = make_field(14.0, 280.0, 140.0);
    assert_eq!(field.cols(), 22);
    assert_eq!(field.rows(), 12);
    assert_eq!(field.dots().len(), 22 * 12);
}

#[test]
fn grid_always_covers_the_surface() {
    for (gap, w, h) in [
        (14.0f32, 280.0f32, 140.0f32),
        (16.0, 1280.0, 720.0),
        (10.0, 333.0, 217.0),
        (7.0, 95.0, 61.0),
    ] {
        let field = make_field(gap, w, h);
        assert!(field.cols() as f32 >= w / gap, "cols too few for {w}x{h}");
        assert!(field.rows() as f32 >= h / gap, "rows too few for {w}x{h}");
    }
}

#[test]
fn rest_positions_stay_within_margin() {
    // Surfaces that are whole multiples of the gap, where the one-cell
    // margin bound is exact.
    for (gap, w, h) in [
        (14.0f32, 280.0f32, 140.0f32),
        (16.0, 320.0, 160.0),
        (20.0, 640.0, 480.0),
    ] {
        let field = make_field(gap, w, h);
        for dot in field.dots() {
            assert!(dot.base.x >= -gap && dot.base.x <= w + gap, "x {}", dot.base.x);
            assert!(dot.base.y >= -gap && dot.base.y <= h + gap, "y {}", dot.base.y);
        }
    }
}

#[test]
fn initial_brightness_is_within_bounds() {
    let field = make_field(14.0, 280.0, 140.0);
    for dot in field.dots() {
        assert!(dot.brightness >= 0.1 && dot.brightness <= 1.0);
    }
}

#[test]
fn displayed_brightness_stays_clamped_under_arbitrary_deltas() {
    let mut field = make_field(14.0, 280.0, 140.0);
    // Erratic frame deltas including stalls (pre-capped by FrameClock in
    // production, but the clamp must hold regardless).
    let deltas = [1.0f32, 0.1, 1.5, 0.0, 0.7, 1.5, 1.2, 0.3];
    let mut time = 0.0f64;
    for (frame, dt) in deltas.iter().cycle().take(400).enumerate() {
        time += *dt as f64 * 16.67 / 1000.0;
        let pointer = moving_pointer(
            Vec2::new((frame % 280) as f32, (frame % 140) as f32),
            Vec2::new(30.0, -20.0),
        );
        field.step(*dt, time, pointer);
        for dot in field.dots() {
            let b = field.displayed_brightness(dot, time);
            assert!((0.05..=1.0).contains(&b), "brightness {b} out of range");
        }
    }
}

#[test]
fn no_displacement_outside_mouse_radius() {
    let mut field = make_field(14.0, 280.0, 140.0);
    // Fast pointer far outside every dot's influence radius.
    let pointer = moving_pointer(Vec2::new(10_000.0, 10_000.0), Vec2::new(50.0, 0.0));
    for _ in 0..60 {
        field.step(1.0, 1.0, pointer);
    }
    for dot in field.dots() {
        assert_eq!(dot.pos, dot.base);
        assert_eq!(dot.vel, Vec2::ZERO);
    }
}

#[test]
fn displacement_applies_inside_mouse_radius() {
    let mut field = make_field(14.0, 280.0, 140.0);
    let pointer = moving_pointer(Vec2::new(140.0, 70.0), Vec2::new(20.0, 0.0));
    field.step(1.0, 1.0, pointer);
    let displaced = field
        .dots()
        .iter()
        .filter(|d| d.pos != d.base)
        .count();
    assert!(displaced > 0, "expected dots near the pointer to move");
}

#[test]
fn zero_dt_leaves_position_and_brightness_unchanged() {
    let mut field = make_field(14.0, 280.0, 140.0);
    let pointer = moving_pointer(Vec2::new(140.0, 70.0), Vec2::new(20.0, 0.0));
    // Warm up with real frames first so dots are displaced and glowing.
    for frame in 0..120 {
        field.step(1.0, frame as f64 / 60.0, pointer);
    }
    let time = 2.0f64;
    let before: Vec<(Vec2, f32)> = field
        .dots()
        .iter()
        .map(|d| (d.pos, field.displayed_brightness(d, time)))
        .collect();
    for _ in 0..10 {
        field.step(0.0, time, pointer);
    }
    for (dot, (pos, brightness)) in field.dots().iter().zip(&before) {
        assert_eq!(dot.pos, *pos);
        let b = field.displayed_brightness(dot, time);
        assert!((b - brightness).abs() < 1e-6);
    }
}

#[test]
fn displaced_dots_return_to_rest() {
    let mut field = make_field(14.0, 280.0, 140.0);
    let pointer = moving_pointer(Vec2::new(140.0, 70.0), Vec2::new(40.0, 10.0));
    field.step(1.0, 0.0, pointer);
    let peak: f32 = field
        .dots()
        .iter()
        .map(|d| d.pos.distance(d.base))
        .fold(0.0, f32::max);
    assert!(peak > 0.0);

    // Let the spring settle with the pointer gone.
    let idle = PointerInput::default();
    for frame in 1..600 {
        field.step(1.0, frame as f64 / 60.0, idle);
    }
    let settled: f32 = field
        .dots()
        .iter()
        .map(|d| d.pos.distance(d.base))
        .fold(0.0, f32::max);
    assert!(settled < 0.1, "residual displacement {settled}");
}

#[test]
fn visibility_reset_snaps_everything_to_rest() {
    let mut field = make_field(14.0, 280.0, 140.0);
    let pointer = moving_pointer(Vec2::new(140.0, 70.0), Vec2::new(40.0, 10.0));
    for frame in 0..240 {
        field.step(1.0, frame as f64 / 60.0, pointer);
    }
    assert!(field.dots().iter().any(|d| d.pos != d.base));

    field.reset_after_hidden();
    for dot in field.dots() {
        assert_eq!(dot.pos, dot.base);
        assert_eq!(dot.vel, Vec2::ZERO);
        assert_eq!(dot.glow, 0.0);
        assert_eq!(dot.glow_target, 0.0);
        // Re-staggered into the short post-resume window.
        assert!(dot.next_glow_time >= 0.0 && dot.next_glow_time <= 2.0);
    }
}

#[test]
fn first_pointer_entry_produces_no_velocity() {
    let mut tracker = PointerTracker::new();
    tracker.sample(Vec2::new(50.0, 50.0));
    assert_eq!(tracker.velocity(), Vec2::ZERO);

    tracker.sample(Vec2::new(60.0, 50.0));
    assert_eq!(tracker.velocity(), Vec2::new(10.0, 0.0));
}

#[test]
fn pointer_reentry_guards_velocity_again() {
    let mut tracker = PointerTracker::new();
    tracker.sample(Vec2::new(50.0, 50.0));
    tracker.sample(Vec2::new(60.0, 50.0));
    tracker.leave();
    assert!(!tracker.is_active());
    assert_eq!(tracker.velocity(), Vec2::ZERO);

    // Far away re-entry must not synthesize a huge velocity.
    tracker.sample(Vec2::new(500.0, 500.0));
    assert_eq!(tracker.velocity(), Vec2::ZERO);
}

#[test]
fn pointer_velocity_decays_per_frame() {
    let mut tracker = PointerTracker::new();
    tracker.sample(Vec2::new(0.0, 0.0));
    tracker.sample(Vec2::new(10.0, 0.0));
    tracker.decay();
    assert!((tracker.velocity().x - 9.0).abs() < 1e-6);
}

#[test]
fn frame_clock_arms_then_normalizes_and_caps() {
    let mut clock = FrameClock::new();
    assert_eq!(clock.tick(1000.0), None);

    let dt = clock.tick(1016.67).expect("armed");
    assert!((dt - 1.0).abs() < 1e-3);

    // A long stall is capped so it cannot integrate into a jump.
    let dt = clock.tick(6000.0).expect("armed");
    assert_eq!(dt, 1.5);

    clock.reset();
    assert_eq!(clock.tick(6016.0), None);
}

#[test]
fn resize_rebuilds_the_grid() {
    let mut field = make_field(14.0, 280.0, 140.0);
    field.rebuild(560.0, 280.0);
    assert_eq!(field.cols(), 42);
    assert_eq!(field.rows(), 22);
    for dot in field.dots() {
        assert_eq!(dot.pos, dot.base);
        assert_eq!(dot.vel, Vec2::ZERO);
    }
}

#[test]
fn sprite_alpha_honors_global_opacity() {
    let mut cfg = make_config(14.0);
    cfg.opacity = 0.5;
    let field = DotField::new(cfg, 280.0, 140.0, 42).expect("valid config");
    let mut sprites = Vec::new();
    field.sprites(0.0, &mut sprites);
    assert_eq!(sprites.len(), field.dots().len());
    for sprite in &sprites {
        assert!(sprite.alpha <= 0.5 + 1e-6);
        assert!(sprite.blur == 0.0 || sprite.blur >= 10.0);
    }
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = make_config(0.0);
    assert!(DotField::new(cfg.clone(), 100.0, 100.0, 1).is_err());

    cfg.dot_gap = 14.0;
    cfg.opacity = 1.5;
    assert!(DotField::new(cfg.clone(), 100.0, 100.0, 1).is_err());

    cfg.opacity = 1.0;
    cfg.return_speed = 0.0;
    assert!(DotField::new(cfg, 100.0, 100.0, 1).is_err());
}
