// Shared tuning constants for both effect engines. These mirror the
// production tuning; changing them changes the look, not a correctness
// property.

// Frame pacing
pub const FRAME_UNIT_MS: f64 = 16.67; // one 60fps frame, dt normalization base
pub const DT_CAP: f32 = 1.5; // max normalized frame step after a stall
pub const TARGET_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

// Dot grid
pub const GRID_MARGIN: u32 = 2; // extra cols/rows so edges stay populated after centering
pub const BASE_BRIGHTNESS: f32 = 0.3;
pub const BRIGHTNESS_MIN: f32 = 0.1; // rest brightness lower clamp
pub const BRIGHTNESS_FLOOR: f32 = 0.05; // displayed brightness lower clamp

// Pointer
pub const POINTER_VELOCITY_DECAY: f32 = 0.9; // per frame
pub const POINTER_SPEED_MIN: f32 = 0.5; // below this, no displacement is applied
pub const DISPLACEMENT_GAIN: f32 = 0.3;

// Spring return physics (per-frame factors, tuned assuming ~60fps)
pub const VELOCITY_DAMPING: f32 = 0.92;
pub const VELOCITY_SPRING: f32 = 0.02; // extra spring term fed into velocity

// Breathing / brightness
pub const BREATHING_AMPLITUDE: f32 = 0.15;
pub const DOT_BREATHING_SPEED_MIN: f32 = 0.5;
pub const DOT_BREATHING_SPEED_SPAN: f32 = 0.5;
pub const DISPLACEMENT_BRIGHTNESS_GAIN: f32 = 0.05;
pub const DISPLACEMENT_BRIGHTNESS_MAX: f32 = 0.5;
pub const GLOW_BRIGHTNESS_GAIN: f32 = 0.7;

// Glow scheduler (times in seconds)
pub const GLOW_STAGGER_MAX_SEC: f64 = 3.0; // initial decorrelation window
pub const GLOW_RESTAGGER_MAX_SEC: f64 = 2.0; // after a visibility reset
pub const GLOW_TARGET_MIN: f32 = 0.6;
pub const GLOW_TARGET_SPAN: f32 = 0.4;
pub const GLOW_INIT_SPEED_MIN: f32 = 0.002;
pub const GLOW_INIT_SPEED_SPAN: f32 = 0.003;
pub const GLOW_RISE_SPEED_MIN: f32 = 0.001;
pub const GLOW_RISE_SPEED_SPAN: f32 = 0.002;
pub const GLOW_FALL_SPEED_MIN: f32 = 0.0005;
pub const GLOW_FALL_SPEED_SPAN: f32 = 0.001;
pub const GLOW_REARM_MIN_SEC: f64 = 1.0;
pub const GLOW_REARM_SPAN_SEC: f64 = 3.0;
pub const GLOW_HOLD_MIN_SEC: f64 = 2.0;
pub const GLOW_HOLD_SPAN_SEC: f64 = 3.0;
pub const GLOW_SETTLE_EPSILON: f32 = 0.05;

// Dot rendering
pub const BLUR_BRIGHTNESS_THRESHOLD: f32 = 0.4;
pub const BLUR_GLOW_THRESHOLD: f32 = 0.1;
pub const BLUR_BASE_PX: f32 = 10.0;
pub const BLUR_SPAN_PX: f32 = 20.0;

// Reveal pointer glow smoothing (per-frame lerp factors)
pub const GLOW_POSITION_LERP: f32 = 0.1;
pub const GLOW_ALPHA_LERP: f32 = 0.08;

// Reveal shading
pub const RAY_COUNT: u32 = 16;
pub const RAY_MISS: f32 = 2.0; // sentinel distance for "no hit"
pub const HALO_DECAY: f32 = 0.01; // slow halo falloff rate
pub const CORE_SPREAD_SCALE: f32 = 3.0; // glow_spread multiplier for the fast core term
pub const CURSOR_BOOST: f32 = 0.5;
pub const CURSOR_RANGE: f32 = 0.5; // normalized distance over which the cursor boost fades
