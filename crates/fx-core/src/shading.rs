//! CPU reference of the reveal shading model. The WGSL program in
//! `shaders/reveal.wgsl` implements the same math on the GPU; this version
//! keeps the ray-march contract testable without a device, and doubles as a
//! software fallback for surfaces without one.

use glam::{Vec2, Vec3};

use crate::config::{Direction, ExpandFrom};
use crate::constants::{CORE_SPREAD_SCALE, CURSOR_BOOST, CURSOR_RANGE, HALO_DECAY, RAY_COUNT, RAY_MISS};

/// Shading inputs for one frame, in normalized surface coordinates (y up).
#[derive(Clone, Copy, Debug)]
pub struct ShadeParams {
    pub progress: f32,
    pub vertical_offset: f32,
    pub direction: Direction,
    /// base, accent, highlight
    pub colors: [Vec3; 3],
    pub bar_width: f32,
    pub mirrored: bool,
    pub expand_from: ExpandFrom,
    pub intensity: f32,
    pub glow_spread: f32,
    pub mouse_pos: Vec2,
    pub mouse_alpha: f32,
}

#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GLSL-style fract: always in [0, 1).
#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Per-pixel pseudo-random rotation seed.
#[inline]
pub fn hash21(p: Vec2) -> f32 {
    fract(p.dot(Vec2::new(12.9898, 78.233)).sin() * 43758.5453)
}

/// Distance along the ray `o + s*d` to the segment [a, b], or [`RAY_MISS`]
/// when the ray misses or approaches from the segment's back side.
pub fn ray_segment(o: Vec2, d: Vec2, a: Vec2, b: Vec2) -> f32 {
    let e = a - b;
    let f = a - o;
    if f.y * e.x < f.x * e.y {
        return RAY_MISS;
    }
    let det = d.x * e.y - d.y * e.x;
    if det == 0.0 {
        return RAY_MISS;
    }
    let s = (f.x * e.y - f.y * e.x) / det;
    let t = (d.x * f.y - d.y * f.x) / det;
    if t >= 0.0 && t <= 1.0 && s > 0.0 {
        s
    } else {
        RAY_MISS
    }
}

/// Bar extent along the travel axis for the current progress.
pub fn bar_edges(progress: f32, bar_width: f32, expand_from: ExpandFrom) -> (f32, f32) {
    let center = 0.5;
    let span = progress * bar_width;
    match expand_from {
        ExpandFrom::Center => (center - span * 0.5, center + span * 0.5),
        ExpandFrom::Left => (0.0, span),
        ExpandFrom::Right => (1.0 - span, 1.0),
    }
}

fn cursor_boost(uv: Vec2, p: &ShadeParams) -> f32 {
    if p.mouse_alpha <= 0.01 {
        return 1.0;
    }
    let d = uv.distance(p.mouse_pos);
    1.0 + (1.0 - smoothstep(0.0, CURSOR_RANGE, d)) * CURSOR_BOOST * p.mouse_alpha
}

/// Glow contribution of one bar for one ray. `a` -> `b` is the front edge
/// orientation; the reversed segment lights the back side with the
/// highlight color.
fn bar_contribution(uv: Vec2, dir: Vec2, a: Vec2, b: Vec2, p: &ShadeParams) -> Vec3 {
    let boost = cursor_boost(uv, p);
    let spread = p.glow_spread * CORE_SPREAD_SCALE;
    let t = ray_segment(uv, dir, a, b);
    if t < RAY_MISS {
        return (p.colors[0] * (-spread * t).exp() + p.colors[1] * 1.3 * (-HALO_DECAY * t).exp())
            * 1.1
            * p.intensity
            * boost;
    }
    let t = ray_segment(uv, dir, b, a);
    if t < RAY_MISS {
        return p.colors[2] * 2.7 * (-spread * t).exp() * p.intensity * boost;
    }
    Vec3::ZERO
}

/// Accumulated color along one ray direction.
fn sample_ray(uv: Vec2, dir: Vec2, p: &ShadeParams) -> Vec3 {
    let mut col = Vec3::ZERO;
    let bar = p.vertical_offset;
    let mirror = 1.0 - p.vertical_offset;

    match p.direction {
        Direction::Horizontal => {
            let (lo, hi) = bar_edges(p.progress, p.bar_width, p.expand_from);
            if uv.y <= bar {
                col += bar_contribution(uv, dir, Vec2::new(lo, bar), Vec2::new(hi, bar), p);
            }
            if p.mirrored && uv.y >= mirror {
                col += bar_contribution(uv, dir, Vec2::new(lo, mirror), Vec2::new(hi, mirror), p);
            }
        }
        Direction::Vertical => {
            // Vertical bars always grow from the midpoint.
            let (lo, hi) = bar_edges(p.progress, p.bar_width, ExpandFrom::Center);
            if uv.x >= bar {
                col += bar_contribution(uv, dir, Vec2::new(bar, lo), Vec2::new(bar, hi), p);
            }
            if p.mirrored && uv.x <= mirror {
                col += bar_contribution(uv, dir, Vec2::new(mirror, lo), Vec2::new(mirror, hi), p);
            }
        }
    }
    col
}

/// Shade one pixel: 16 evenly spaced rays, randomly rotated per pixel to
/// break up banding, averaged.
pub fn shade(uv: Vec2, time: f32, p: &ShadeParams) -> Vec3 {
    let n = hash21(uv + Vec2::splat(time)) * 3.0;
    let mut acc = Vec3::ZERO;
    for i in 0..RAY_COUNT {
        let angle = n + i as f32 * std::f32::consts::TAU / RAY_COUNT as f32;
        acc += sample_ray(uv, Vec2::new(angle.sin(), angle.cos()), p);
    }
    acc / RAY_COUNT as f32
}

/// Output alpha: the magnitude of the accumulated color, so the glow fades
/// to transparent away from the bar.
#[inline]
pub fn shade_alpha(rgb: Vec3) -> f32 {
    rgb.length()
}
