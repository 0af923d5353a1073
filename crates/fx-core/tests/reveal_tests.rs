// Host-side tests for the reveal engine: timeline easing, lifecycle events,
// scroll gating, pointer glow smoothing and frame throttling.

use fx_core::{
    ease_out_cubic, Direction, FrameThrottle, PointerGlow, RevealConfig, RevealEngine,
    RevealEvent, RevealEvents, RevealTimeline,
};
use glam::Vec2;

fn make_config() -> RevealConfig {
    RevealConfig {
        reveal_delay_ms: 0.0,
        reveal_duration_ms: 2000.0,
        ..Default::default()
    }
}

#[test]
fn progress_holds_zero_through_delay() {
    let mut timeline = RevealTimeline::new(500.0, 2000.0, false);
    let mut events = RevealEvents::new();
    assert_eq!(timeline.tick(0.0, &mut events), 0.0);
    assert_eq!(timeline.tick(250.0, &mut events), 0.0);
    assert_eq!(timeline.tick(499.9, &mut events), 0.0);
    assert!(events.is_empty());
    assert!(!timeline.has_started());
}

#[test]
fn progress_matches_cubic_ease_at_midpoint() {
    // 1 - (1 - 0.5)^3 = 0.875 halfway through a 2000ms reveal.
    let mut timeline = RevealTimeline::new(0.0, 2000.0, false);
    let mut events = RevealEvents::new();
    timeline.tick(0.0, &mut events);
    let p = timeline.tick(1000.0, &mut events);
    assert!((p - 0.875).abs() < 1e-6);
}

#[test]
fn progress_is_monotonic_and_reaches_exactly_one() {
    let mut timeline = RevealTimeline::new(300.0, 2000.0, false);
    let mut events = RevealEvents::new();
    timeline.tick(0.0, &mut events);

    let mut prev = 0.0f32;
    let mut t = 0.0f64;
    while t <= 2300.0 {
        let p = timeline.tick(t, &mut events);
        assert!(p >= prev, "progress regressed at t={t}");
        // Continuity: 50ms of a 2000ms cubic can never jump more than ~8%.
        assert!(p - prev < 0.08, "progress jumped at t={t}");
        prev = p;
        t += 50.0;
    }
    assert_eq!(timeline.tick(2300.0, &mut events), 1.0);
    assert_eq!(timeline.tick(10_000.0, &mut events), 1.0);
}

#[test]
fn started_fires_once_when_delay_elapses() {
    let mut timeline = RevealTimeline::new(500.0, 2000.0, false);
    let mut events = RevealEvents::new();
    timeline.tick(0.0, &mut events);
    timeline.tick(499.0, &mut events);
    assert!(events.is_empty());

    timeline.tick(500.0, &mut events);
    assert_eq!(events.as_slice(), [RevealEvent::Started]);

    events.clear();
    timeline.tick(600.0, &mut events);
    assert!(events.is_empty());
}

#[test]
fn started_fires_immediately_with_zero_delay() {
    let mut timeline = RevealTimeline::new(0.0, 2000.0, false);
    let mut events = RevealEvents::new();
    timeline.tick(1234.0, &mut events);
    assert_eq!(events.as_slice(), [RevealEvent::Started]);
}

#[test]
fn completed_fires_once_when_progress_reaches_one() {
    let mut timeline = RevealTimeline::new(0.0, 1000.0, false);
    let mut events = RevealEvents::new();
    timeline.tick(0.0, &mut events);
    events.clear();

    timeline.tick(999.0, &mut events);
    assert!(events.is_empty());

    timeline.tick(1000.0, &mut events);
    assert_eq!(events.as_slice(), [RevealEvent::Completed]);

    events.clear();
    timeline.tick(2000.0, &mut events);
    assert!(events.is_empty());
    assert!(timeline.has_completed());
}

#[test]
fn gate_freezes_the_timeline_until_released() {
    let mut timeline = RevealTimeline::new(0.0, 2000.0, true);
    let mut events = RevealEvents::new();
    for t in [0.0, 1000.0, 5000.0] {
        assert_eq!(timeline.tick(t, &mut events), 0.0);
    }
    assert!(events.is_empty());

    // Release long after mount: the curve starts at 0 from the release
    // instant instead of jumping mid-animation.
    timeline.release_gate();
    assert!(!timeline.is_gated());
    timeline.tick(5000.0, &mut events);
    assert_eq!(events.as_slice(), [RevealEvent::Started]);
    let p = timeline.tick(6000.0, &mut events);
    assert!((p - 0.875).abs() < 1e-6);
}

#[test]
fn pointer_glow_smooths_position_and_alpha() {
    let mut glow = PointerGlow::default();
    glow.point_to(Vec2::new(1.0, 1.0));
    glow.step();
    assert!((glow.position().x - 0.1).abs() < 1e-6);
    assert!((glow.alpha() - 0.08).abs() < 1e-6);

    for _ in 0..200 {
        glow.step();
    }
    assert!(glow.position().distance(Vec2::new(1.0, 1.0)) < 1e-3);
    assert!((glow.alpha() - 1.0).abs() < 1e-3);

    glow.clear();
    for _ in 0..200 {
        glow.step();
    }
    assert!(glow.alpha() < 1e-3);
}

#[test]
fn throttle_skips_subframe_checks() {
    let mut throttle = FrameThrottle::target_60fps();
    assert!(throttle.should_run(1003.0));
    assert!(!throttle.should_run(1010.0));
    assert!(!throttle.should_run(1015.0));
    assert!(throttle.should_run(1025.0));
}

#[test]
fn engine_skips_throttled_frames_but_keeps_time() {
    let mut engine = RevealEngine::new(make_config()).expect("valid config");
    let mut events = RevealEvents::new();

    let first = engine.frame(0.0, &mut events);
    assert!(first.is_some());
    assert!(engine.frame(5.0, &mut events).is_none());

    let frame = engine.frame(1000.0, &mut events).expect("frame due");
    assert!((frame.progress - 0.875).abs() < 1e-6);
    assert!((frame.time_sec - 1.0).abs() < 1e-3);
}

#[test]
fn engine_emits_each_event_exactly_once() {
    let mut engine = RevealEngine::new(RevealConfig {
        reveal_delay_ms: 100.0,
        reveal_duration_ms: 500.0,
        ..Default::default()
    })
    .expect("valid config");

    let mut started = 0;
    let mut completed = 0;
    let mut t = 0.0f64;
    while t < 2000.0 {
        let mut events = RevealEvents::new();
        engine.frame(t, &mut events);
        for ev in &events {
            match ev {
                RevealEvent::Started => started += 1,
                RevealEvent::Completed => completed += 1,
            }
        }
        t += 17.0;
    }
    assert_eq!(started, 1);
    assert_eq!(completed, 1);
}

#[test]
fn engine_inverts_pointer_y_for_the_shader() {
    let mut engine = RevealEngine::new(RevealConfig {
        follow_cursor: true,
        ..make_config()
    })
    .expect("valid config");

    // Pointer near the top of the surface in client coordinates.
    engine.pointer_moved(Vec2::new(0.25, 0.1));
    let mut events = RevealEvents::new();
    let mut frame = engine.frame(0.0, &mut events).expect("frame due");
    let mut t = 0.0f64;
    for _ in 0..400 {
        t += 17.0;
        if let Some(f) = engine.frame(t, &mut events) {
            frame = f;
        }
    }
    assert!(frame.mouse_pos.distance(Vec2::new(0.25, 0.9)) < 1e-2);
    assert!((frame.mouse_alpha - 1.0).abs() < 1e-2);
}

#[test]
fn uniforms_pack_configuration_and_frame_state() {
    let engine = RevealEngine::new(RevealConfig {
        direction: Direction::Vertical,
        mirrored: true,
        bar_width: 0.8,
        bar_height: 0.05,
        glow_spread: 2.0,
        intensity: 1.5,
        ..make_config()
    })
    .expect("valid config");

    let frame = fx_core::RevealFrame {
        time_sec: 1.25,
        progress: 0.5,
        mouse_pos: Vec2::new(0.3, 0.7),
        mouse_alpha: 0.4,
    };
    let u = engine.uniforms([640.0, 480.0], &frame);
    assert_eq!(u.resolution, [640.0, 480.0]);
    assert_eq!(u.progress, 0.5);
    assert_eq!(u.geometry, [0.8, 0.05, 2.0, 1.5]);
    assert_eq!(u.mode[0], 1.0);
    assert_eq!(u.mode[1], 1.0);
    assert_eq!(u.mouse_pos, [0.3, 0.7]);
}

#[test]
fn ease_out_cubic_endpoints_and_shape() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    // Ease-out front-loads progress.
    assert!(ease_out_cubic(0.5) > 0.5);
}

#[test]
fn invalid_reveal_config_is_rejected() {
    let mut cfg = make_config();
    cfg.reveal_duration_ms = 0.0;
    assert!(RevealEngine::new(cfg).is_err());

    let mut cfg = make_config();
    cfg.vertical_offset = 1.4;
    assert!(RevealEngine::new(cfg).is_err());

    let mut cfg = make_config();
    cfg.bar_width = -0.1;
    assert!(RevealEngine::new(cfg).is_err());
}
