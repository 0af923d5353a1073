use crate::error::{FxError, FxResult};

/// Options recognized by the point-field engine. Color fields are tokens
/// resolved through a [`crate::color::ColorResolver`] at mount/resize time.
#[derive(Clone, Debug)]
pub struct DotFieldConfig {
    /// Grid spacing in pixels.
    pub dot_gap: f32,
    /// Dot radius in pixels.
    pub dot_size: f32,
    pub dot_color: String,
    pub glow_color: String,
    /// Optional surface background; `None` leaves the host background alone.
    pub background_color: Option<String>,
    /// Pointer influence radius in pixels.
    pub mouse_radius: f32,
    pub distortion_strength: f32,
    pub breathing_speed: f32,
    pub enable_mouse_interaction: bool,
    pub opacity: f32,
    /// Spring constant pulling displaced dots back to rest (0-1).
    pub return_speed: f32,
}

impl Default for DotFieldConfig {
    fn default() -> Self {
        Self {
            dot_gap: 16.0,
            dot_size: 1.0,
            dot_color: "var(--color-sky-700)".into(),
            glow_color: "var(--color-sky-700)".into(),
            background_color: None,
            mouse_radius: 100.0,
            distortion_strength: 1.0,
            breathing_speed: 1.0,
            enable_mouse_interaction: true,
            opacity: 1.0,
            return_speed: 0.08,
        }
    }
}

impl DotFieldConfig {
    pub fn validate(&self) -> FxResult<()> {
        if !(self.dot_gap > 0.0) {
            return Err(FxError::config(format!(
                "dot_gap must be positive, got {}",
                self.dot_gap
            )));
        }
        if !(self.dot_size > 0.0) {
            return Err(FxError::config(format!(
                "dot_size must be positive, got {}",
                self.dot_size
            )));
        }
        if self.mouse_radius < 0.0 {
            return Err(FxError::config(format!(
                "mouse_radius must be non-negative, got {}",
                self.mouse_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(FxError::config(format!(
                "opacity must be in 0..=1, got {}",
                self.opacity
            )));
        }
        if !(self.return_speed > 0.0 && self.return_speed <= 1.0) {
            return Err(FxError::config(format!(
                "return_speed must be in (0, 1], got {}",
                self.return_speed
            )));
        }
        if self.distortion_strength < 0.0 {
            return Err(FxError::config(format!(
                "distortion_strength must be non-negative, got {}",
                self.distortion_strength
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Encoding used by the shader uniforms (0 = horizontal, 1 = vertical).
    #[inline]
    pub fn as_uniform(self) -> f32 {
        match self {
            Self::Horizontal => 0.0,
            Self::Vertical => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandFrom {
    Center,
    Left,
    Right,
}

impl ExpandFrom {
    /// Encoding used by the shader uniforms.
    #[inline]
    pub fn as_uniform(self) -> f32 {
        match self {
            Self::Center => 0.0,
            Self::Left => 1.0,
            Self::Right => 2.0,
        }
    }
}

/// Options recognized by the reveal engine. The lifecycle callbacks
/// (`on_start`/`on_complete`) live in the frontends, which map
/// [`crate::reveal::RevealEvent`]s onto them.
#[derive(Clone, Debug)]
pub struct RevealConfig {
    pub reveal_delay_ms: f64,
    pub reveal_duration_ms: f64,
    /// Bar position along the perpendicular axis (0 = bottom, 1 = top).
    pub vertical_offset: f32,
    pub direction: Direction,
    /// Hue in degrees; the full palette is derived from this single value.
    pub color_hue: f32,
    /// Bar length as a fraction of the surface (0-1).
    pub bar_width: f32,
    /// Bar thickness as a fraction of the surface (0-1).
    pub bar_height: f32,
    /// Render a second bar mirrored across the surface midline.
    pub mirrored: bool,
    pub expand_from: ExpandFrom,
    /// Freeze progress at 0 until the surface first enters the viewport.
    pub animate_on_scroll: bool,
    pub scroll_threshold: f32,
    pub intensity: f32,
    pub glow_spread: f32,
    pub follow_cursor: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 0.0,
            reveal_duration_ms: 2000.0,
            vertical_offset: 0.7,
            direction: Direction::Horizontal,
            color_hue: 200.0,
            bar_width: 1.0,
            bar_height: 0.02,
            mirrored: false,
            expand_from: ExpandFrom::Center,
            animate_on_scroll: false,
            scroll_threshold: 0.3,
            intensity: 1.0,
            glow_spread: 1.0,
            follow_cursor: false,
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> FxResult<()> {
        if self.reveal_delay_ms < 0.0 {
            return Err(FxError::config(format!(
                "reveal_delay_ms must be non-negative, got {}",
                self.reveal_delay_ms
            )));
        }
        if !(self.reveal_duration_ms > 0.0) {
            return Err(FxError::config(format!(
                "reveal_duration_ms must be positive, got {}",
                self.reveal_duration_ms
            )));
        }
        for (name, value) in [
            ("vertical_offset", self.vertical_offset),
            ("bar_width", self.bar_width),
            ("bar_height", self.bar_height),
            ("scroll_threshold", self.scroll_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FxError::config(format!(
                    "{name} must be in 0..=1, got {value}"
                )));
            }
        }
        if self.intensity < 0.0 || self.glow_spread < 0.0 {
            return Err(FxError::config(
                "intensity and glow_spread must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
