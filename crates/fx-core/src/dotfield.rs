//! Point-field distortion engine: a pointer-reactive dot grid with spring
//! return physics, breathing brightness, and a stochastic glow scheduler.
//!
//! The engine is platform-free. A frontend owns one [`DotField`] per mounted
//! surface, feeds it a [`PointerInput`] snapshot and a frame delta each
//! frame, and rasterizes the resulting [`DotSprite`] list however it likes
//! (2D canvas, instanced quads, ...).

use glam::Vec2;
use rand::prelude::*;

use crate::config::DotFieldConfig;
use crate::constants::*;
use crate::error::FxResult;

/// One grid cell. `base` is the rest position the spring pulls back to.
#[derive(Clone, Debug)]
pub struct Dot {
    pub base: Vec2,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rest brightness in [0.1, 1], fixed at grid build time.
    pub brightness: f32,
    pub phase: f32,
    pub breathing_speed: f32,
    /// Current glow intensity in [0, 1].
    pub glow: f32,
    /// Either 0 (dimming) or a value in [0.6, 1] (glowing).
    pub glow_target: f32,
    pub glow_speed: f32,
    /// Simulation time (seconds) of the next scheduled glow toggle.
    pub next_glow_time: f64,
}

/// Pointer snapshot read by [`DotField::step`] at the top of a frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerInput {
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
}

/// Window-level pointer tracking with a first-entry guard: the first sample
/// after the pointer was absent records position only, so re-entry never
/// produces a spurious velocity spike.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    pos: Vec2,
    prev: Vec2,
    vel: Vec2,
    active: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer position inside the surface.
    pub fn sample(&mut self, pos: Vec2) {
        if !self.active {
            self.pos = pos;
            self.prev = pos;
            self.vel = Vec2::ZERO;
            self.active = true;
        } else {
            self.prev = self.pos;
            self.pos = pos;
            self.vel = self.pos - self.prev;
        }
    }

    /// The pointer left the surface (or the window).
    pub fn leave(&mut self) {
        self.active = false;
        self.vel = Vec2::ZERO;
    }

    /// Per-frame velocity decay, applied after the simulation step.
    pub fn decay(&mut self) {
        self.vel *= POINTER_VELOCITY_DECAY;
    }

    /// Zero the velocity without losing the tracked position.
    pub fn reset_velocity(&mut self) {
        self.vel = Vec2::ZERO;
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn input(&self) -> PointerInput {
        PointerInput {
            pos: self.pos,
            vel: self.vel,
            active: self.active,
        }
    }
}

/// Wall-clock driven frame delta, normalized to 1/60s units and capped so a
/// stall cannot integrate into a visible jump. The first tick after
/// construction or [`FrameClock::reset`] only records the timestamp.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the reference timestamp (used on visibility-change resume).
    pub fn reset(&mut self) {
        self.last_ms = 0.0;
    }

    /// Normalized frame delta, or `None` when this tick only (re)arms the
    /// clock.
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        if self.last_ms == 0.0 {
            self.last_ms = now_ms;
            return None;
        }
        let dt = ((now_ms - self.last_ms) / FRAME_UNIT_MS) as f32;
        self.last_ms = now_ms;
        Some(dt.clamp(0.0, DT_CAP))
    }
}

/// Per-frame render output for one dot. `blur` is 0 for a plain fill or the
/// soft shadow radius in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub blur: f32,
}

pub struct DotField {
    cfg: DotFieldConfig,
    dots: Vec<Dot>,
    cols: u32,
    rows: u32,
    rng: StdRng,
}

impl DotField {
    pub fn new(cfg: DotFieldConfig, width: f32, height: f32, seed: u64) -> FxResult<Self> {
        cfg.validate()?;
        let mut field = Self {
            cfg,
            dots: Vec::new(),
            cols: 0,
            rows: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        field.rebuild(width, height);
        Ok(field)
    }

    pub fn config(&self) -> &DotFieldConfig {
        &self.cfg
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    /// Rebuild the grid for a resized surface. Dots are re-created from
    /// scratch; positions are not carried across a resize.
    pub fn rebuild(&mut self, width: f32, height: f32) {
        let gap = self.cfg.dot_gap;
        let cols = (width / gap).ceil() as u32 + GRID_MARGIN;
        let rows = (height / gap).ceil() as u32 + GRID_MARGIN;
        let offset = Vec2::new(width % gap, height % gap) * 0.5;

        self.dots.clear();
        self.dots.reserve((cols * rows) as usize);
        for i in 0..cols {
            for j in 0..rows {
                let base = Vec2::new(i as f32 * gap, j as f32 * gap) + offset;

                // Low-frequency sinusoid mix plus a bounded random term:
                // spatial variety without per-frame static.
                let (fi, fj) = (i as f32, j as f32);
                let noise = (fi * 0.3 + fj * 0.2).sin() * 0.3
                    + (fi * 0.7 - fj * 0.5).sin() * 0.2
                    + ((fi + fj) * 0.4).sin() * 0.2
                    + self.rng.gen::<f32>() * 0.3;
                let brightness = (BASE_BRIGHTNESS + noise).clamp(BRIGHTNESS_MIN, 1.0);

                self.dots.push(Dot {
                    base,
                    pos: base,
                    vel: Vec2::ZERO,
                    brightness,
                    phase: self.rng.gen::<f32>() * std::f32::consts::TAU,
                    breathing_speed: DOT_BREATHING_SPEED_MIN
                        + self.rng.gen::<f32>() * DOT_BREATHING_SPEED_SPAN,
                    glow: 0.0,
                    glow_target: 0.0,
                    glow_speed: GLOW_INIT_SPEED_MIN + self.rng.gen::<f32>() * GLOW_INIT_SPEED_SPAN,
                    // Stagger first activations so the grid never flashes in sync.
                    next_glow_time: self.rng.gen::<f64>() * GLOW_STAGGER_MAX_SEC,
                });
            }
        }
        self.cols = cols;
        self.rows = rows;
        log::debug!("[grid] rebuilt {cols}x{rows} dots for {width}x{height}px");
    }

    /// Snap every dot back to rest and clear glow state. Called when the tab
    /// becomes visible again so no stale velocities play out as a jump.
    pub fn reset_after_hidden(&mut self) {
        for dot in &mut self.dots {
            dot.pos = dot.base;
            dot.vel = Vec2::ZERO;
            dot.glow = 0.0;
            dot.glow_target = 0.0;
            dot.next_glow_time = self.rng.gen::<f64>() * GLOW_RESTAGGER_MAX_SEC;
        }
        log::debug!("[visibility] field snapped to rest");
    }

    /// Advance the simulation by `dt` normalized frames at simulation time
    /// `time_sec`, reading one pointer snapshot.
    pub fn step(&mut self, dt: f32, time_sec: f64, pointer: PointerInput) {
        let pointer_speed = pointer.vel.length();
        let interact = self.cfg.enable_mouse_interaction
            && pointer.active
            && pointer_speed > POINTER_SPEED_MIN;

        for dot in &mut self.dots {
            // Glow scheduler: toggle between dim and a random bright target,
            // re-arming 1-4s ahead on every toggle.
            if time_sec >= dot.next_glow_time {
                if dot.glow_target == 0.0 {
                    dot.glow_target = GLOW_TARGET_MIN + self.rng.gen::<f32>() * GLOW_TARGET_SPAN;
                    dot.glow_speed =
                        GLOW_RISE_SPEED_MIN + self.rng.gen::<f32>() * GLOW_RISE_SPEED_SPAN;
                } else {
                    dot.glow_target = 0.0;
                    dot.glow_speed =
                        GLOW_FALL_SPEED_MIN + self.rng.gen::<f32>() * GLOW_FALL_SPEED_SPAN;
                }
                dot.next_glow_time =
                    time_sec + GLOW_REARM_MIN_SEC + self.rng.gen::<f64>() * GLOW_REARM_SPAN_SEC;
            }

            let glow_diff = dot.glow_target - dot.glow;
            dot.glow = (dot.glow + glow_diff * dot.glow_speed * dt * 60.0).clamp(0.0, 1.0);

            // Once a glowing dot has effectively reached its target, hold it
            // bright for 2-5s before the scheduler dims it again.
            if dot.glow_target > 0.0 && glow_diff.abs() < GLOW_SETTLE_EPSILON {
                dot.next_glow_time =
                    time_sec + GLOW_HOLD_MIN_SEC + self.rng.gen::<f64>() * GLOW_HOLD_SPAN_SEC;
            }

            // Pointer displacement: quadratic falloff of distance from the
            // rest position, driven by pointer velocity.
            if interact {
                let dist = (pointer.pos - dot.base).length();
                if dist < self.cfg.mouse_radius {
                    let falloff = 1.0 - dist / self.cfg.mouse_radius;
                    let strength = falloff * falloff * self.cfg.distortion_strength;
                    dot.vel += pointer.vel * strength * DISPLACEMENT_GAIN;
                }
            }

            // Integrate, spring back toward rest, damp.
            dot.pos += dot.vel * dt;
            dot.pos += (dot.base - dot.pos) * self.cfg.return_speed * dt;
            dot.vel *= VELOCITY_DAMPING;
            dot.vel += (dot.base - dot.pos) * VELOCITY_SPRING * dt;
        }
    }

    /// Brightness actually drawn this frame: rest brightness plus breathing,
    /// displacement boost and glow, clamped to [0.05, 1].
    pub fn displayed_brightness(&self, dot: &Dot, time_sec: f64) -> f32 {
        let t = time_sec as f32 * self.cfg.breathing_speed;
        let breathing = (t * dot.breathing_speed + dot.phase).sin() * BREATHING_AMPLITUDE;
        let animated = (dot.brightness + breathing).clamp(BRIGHTNESS_FLOOR, 1.0);

        let displacement = (dot.pos - dot.base).length();
        let boost = (displacement * DISPLACEMENT_BRIGHTNESS_GAIN).min(DISPLACEMENT_BRIGHTNESS_MAX);

        (animated + boost + dot.glow * GLOW_BRIGHTNESS_GAIN).min(1.0)
    }

    /// Emit one sprite per dot into `out` (cleared first). Bright or glowing
    /// dots get a soft blur radius; the rest draw as plain fills.
    pub fn sprites(&self, time_sec: f64, out: &mut Vec<DotSprite>) {
        out.clear();
        out.reserve(self.dots.len());
        for dot in &self.dots {
            let brightness = self.displayed_brightness(dot, time_sec);
            let blur = if brightness > BLUR_BRIGHTNESS_THRESHOLD || dot.glow > BLUR_GLOW_THRESHOLD {
                let base_glow = (brightness - BLUR_BRIGHTNESS_THRESHOLD)
                    / (1.0 - BLUR_BRIGHTNESS_THRESHOLD);
                BLUR_BASE_PX + BLUR_SPAN_PX * base_glow.max(dot.glow)
            } else {
                0.0
            };
            out.push(DotSprite {
                pos: dot.pos,
                radius: self.cfg.dot_size,
                alpha: brightness * self.cfg.opacity,
                blur,
            });
        }
    }
}
