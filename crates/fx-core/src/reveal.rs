//! Shader reveal engine: a time-eased neon bar reveal with optional scroll
//! gating and a pointer-following glow. The shading itself runs in
//! `shaders/reveal.wgsl` (or the CPU reference in [`crate::shading`]); this
//! module owns everything that advances per frame.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::color::reveal_palette;
use crate::config::RevealConfig;
use crate::constants::*;
use crate::error::FxResult;

/// Lifecycle notifications, emitted at most once each per mounted engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealEvent {
    Started,
    Completed,
}

pub type RevealEvents = SmallVec<[RevealEvent; 2]>;

/// Cubic ease-out, the only easing the reveal uses.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Monotonic reveal progress: 0 through the delay window, cubic-eased over
/// the duration, then pinned at 1. When gated, the timeline does not even
/// begin accumulating time, so a late gate release starts the curve at 0.
#[derive(Clone, Debug)]
pub struct RevealTimeline {
    delay_ms: f64,
    duration_ms: f64,
    gated: bool,
    origin_ms: Option<f64>,
    started: bool,
    completed: bool,
}

impl RevealTimeline {
    pub fn new(delay_ms: f64, duration_ms: f64, gated: bool) -> Self {
        Self {
            delay_ms,
            duration_ms,
            gated,
            origin_ms: None,
            started: false,
            completed: false,
        }
    }

    pub fn is_gated(&self) -> bool {
        self.gated
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn has_completed(&self) -> bool {
        self.completed
    }

    /// Release the scroll gate. Permanent for the life of the timeline.
    pub fn release_gate(&mut self) {
        if self.gated {
            self.gated = false;
            log::debug!("[gate] released");
        }
    }

    /// Advance to `now_ms`, returning eased progress and pushing `Started` /
    /// `Completed` the first time each boundary is crossed.
    pub fn tick(&mut self, now_ms: f64, events: &mut RevealEvents) -> f32 {
        if self.gated {
            return 0.0;
        }
        let origin = *self.origin_ms.get_or_insert(now_ms);
        let elapsed = now_ms - origin;
        if elapsed < self.delay_ms {
            return 0.0;
        }
        if !self.started {
            self.started = true;
            events.push(RevealEvent::Started);
        }
        let raw = (((elapsed - self.delay_ms) / self.duration_ms).min(1.0)).max(0.0) as f32;
        if raw >= 1.0 && !self.completed {
            self.completed = true;
            events.push(RevealEvent::Completed);
        }
        ease_out_cubic(raw)
    }
}

/// Pointer-following glow state in normalized surface coordinates (y up).
/// Both position and visibility are exponentially smoothed toward their
/// targets each frame so the glow never snaps.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerGlow {
    pos: Vec2,
    alpha: f32,
    target_pos: Vec2,
    target_alpha: f32,
}

impl PointerGlow {
    pub fn point_to(&mut self, uv: Vec2) {
        self.target_pos = uv;
        self.target_alpha = 1.0;
    }

    pub fn clear(&mut self) {
        self.target_alpha = 0.0;
    }

    pub fn step(&mut self) {
        self.pos += (self.target_pos - self.pos) * GLOW_POSITION_LERP;
        self.alpha += (self.target_alpha - self.alpha) * GLOW_ALPHA_LERP;
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// 60fps self-throttle: work is skipped while less than one frame interval
/// has elapsed, and the reference realigns to the frame grid on every
/// executed frame so skips do not accumulate drift.
#[derive(Clone, Copy, Debug)]
pub struct FrameThrottle {
    last_ms: f64,
    interval_ms: f64,
}

impl FrameThrottle {
    pub fn new(interval_ms: f64) -> Self {
        // Start one interval in the past so the first frame always runs.
        Self {
            last_ms: -interval_ms,
            interval_ms,
        }
    }

    pub fn target_60fps() -> Self {
        Self::new(TARGET_FRAME_INTERVAL_MS)
    }

    pub fn should_run(&mut self, now_ms: f64) -> bool {
        let delta = now_ms - self.last_ms;
        if delta < self.interval_ms {
            return false;
        }
        self.last_ms = now_ms - (delta % self.interval_ms);
        true
    }
}

/// Uniform block shared with `shaders/reveal.wgsl`. Field order and padding
/// must match the WGSL struct exactly.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RevealUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub progress: f32,
    pub mouse_pos: [f32; 2],
    pub mouse_alpha: f32,
    pub vertical_offset: f32,
    pub color_base: [f32; 4],
    pub color_accent: [f32; 4],
    pub color_highlight: [f32; 4],
    /// bar_width, bar_height, glow_spread, intensity
    pub geometry: [f32; 4],
    /// direction, mirrored, expand_from, unused
    pub mode: [f32; 4],
}

/// Values produced by one executed frame, ready to upload as uniforms.
#[derive(Clone, Copy, Debug)]
pub struct RevealFrame {
    pub time_sec: f32,
    pub progress: f32,
    pub mouse_pos: Vec2,
    pub mouse_alpha: f32,
}

/// Everything a frontend needs to drive one mounted reveal surface.
pub struct RevealEngine {
    cfg: RevealConfig,
    timeline: RevealTimeline,
    glow: PointerGlow,
    throttle: FrameThrottle,
    palette: [Vec3; 3],
    start_ms: Option<f64>,
}

impl RevealEngine {
    pub fn new(cfg: RevealConfig) -> FxResult<Self> {
        cfg.validate()?;
        let palette = reveal_palette(cfg.color_hue);
        let timeline = RevealTimeline::new(
            cfg.reveal_delay_ms,
            cfg.reveal_duration_ms,
            cfg.animate_on_scroll,
        );
        Ok(Self {
            cfg,
            timeline,
            glow: PointerGlow::default(),
            throttle: FrameThrottle::target_60fps(),
            palette,
            start_ms: None,
        })
    }

    pub fn config(&self) -> &RevealConfig {
        &self.cfg
    }

    pub fn timeline(&self) -> &RevealTimeline {
        &self.timeline
    }

    pub fn palette(&self) -> [Vec3; 3] {
        self.palette
    }

    pub fn release_gate(&mut self) {
        self.timeline.release_gate();
    }

    /// Raw pointer position in normalized surface coordinates with y
    /// pointing down (the usual client-rect convention); inverted here so
    /// the shader sees 0 at the bottom.
    pub fn pointer_moved(&mut self, uv: Vec2) {
        if self.cfg.follow_cursor {
            self.glow.point_to(Vec2::new(uv.x, 1.0 - uv.y));
        }
    }

    pub fn pointer_left(&mut self) {
        if self.cfg.follow_cursor {
            self.glow.clear();
        }
    }

    /// Run one frame if the throttle allows it. `None` means skip the
    /// render entirely; the next check is still scheduled by the caller.
    pub fn frame(&mut self, now_ms: f64, events: &mut RevealEvents) -> Option<RevealFrame> {
        if !self.throttle.should_run(now_ms) {
            return None;
        }
        if self.cfg.follow_cursor {
            self.glow.step();
        }
        let start = *self.start_ms.get_or_insert(now_ms);
        let progress = self.timeline.tick(now_ms, events);
        Some(RevealFrame {
            time_sec: ((now_ms - start) / 1000.0) as f32,
            progress,
            mouse_pos: self.glow.position(),
            mouse_alpha: self.glow.alpha(),
        })
    }

    /// Pack one frame into the uniform block for upload.
    pub fn uniforms(&self, resolution: [f32; 2], frame: &RevealFrame) -> RevealUniforms {
        let [base, accent, highlight] = self.palette;
        RevealUniforms {
            resolution,
            time: frame.time_sec,
            progress: frame.progress,
            mouse_pos: frame.mouse_pos.to_array(),
            mouse_alpha: frame.mouse_alpha,
            vertical_offset: self.cfg.vertical_offset,
            color_base: [base.x, base.y, base.z, 1.0],
            color_accent: [accent.x, accent.y, accent.z, 1.0],
            color_highlight: [highlight.x, highlight.y, highlight.z, 1.0],
            geometry: [
                self.cfg.bar_width,
                self.cfg.bar_height,
                self.cfg.glow_spread,
                self.cfg.intensity,
            ],
            mode: [
                self.cfg.direction.as_uniform(),
                if self.cfg.mirrored { 1.0 } else { 0.0 },
                self.cfg.expand_from.as_uniform(),
                0.0,
            ],
        }
    }
}
