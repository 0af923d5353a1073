//! Color handling shared by both engines: literal parsing, the reveal
//! palette derivation, and the resolver seam that lets frontends follow
//! theme-variable indirection.

use glam::Vec3;

use crate::error::{FxError, FxResult};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// CSS serialization used by the canvas raster path.
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }

    /// Parse a literal color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)` or
    /// `rgba(...)`.
    pub fn parse(token: &str) -> FxResult<Self> {
        let token = token.trim();
        if let Some(hex) = token.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if token.starts_with("rgb") {
            return Self::parse_rgb_call(token);
        }
        Err(FxError::color(format!("unrecognized color '{token}'")))
    }

    fn parse_hex(hex: &str) -> FxResult<Self> {
        let nibble = |c: u8| -> FxResult<u32> {
            (c as char)
                .to_digit(16)
                .ok_or_else(|| FxError::color(format!("invalid hex digit '{}'", c as char)))
        };
        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let mut ch = [0.0f32; 3];
                for (i, out) in ch.iter_mut().enumerate() {
                    let n = nibble(bytes[i])?;
                    *out = (n * 17) as f32 / 255.0;
                }
                Ok(Self::opaque(ch[0], ch[1], ch[2]))
            }
            6 | 8 => {
                let mut ch = [0.0f32; 4];
                ch[3] = 1.0;
                for i in 0..bytes.len() / 2 {
                    let hi = nibble(bytes[i * 2])?;
                    let lo = nibble(bytes[i * 2 + 1])?;
                    ch[i] = (hi * 16 + lo) as f32 / 255.0;
                }
                Ok(Self::new(ch[0], ch[1], ch[2], ch[3]))
            }
            n => Err(FxError::color(format!("hex color with {n} digits"))),
        }
    }

    fn parse_rgb_call(token: &str) -> FxResult<Self> {
        let open = token
            .find('(')
            .ok_or_else(|| FxError::color(format!("malformed '{token}'")))?;
        let close = token
            .rfind(')')
            .ok_or_else(|| FxError::color(format!("malformed '{token}'")))?;
        let parts: Vec<&str> = token[open + 1..close]
            .split([',', ' ', '/'])
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(FxError::color(format!(
                "expected 3 or 4 components in '{token}'"
            )));
        }
        let channel = |s: &str| -> FxResult<f32> {
            let v: f32 = s
                .parse()
                .map_err(|_| FxError::color(format!("invalid component '{s}'")))?;
            Ok((v / 255.0).clamp(0.0, 1.0))
        };
        let alpha = |s: &str| -> FxResult<f32> {
            let v: f32 = s
                .parse()
                .map_err(|_| FxError::color(format!("invalid alpha '{s}'")))?;
            Ok(v.clamp(0.0, 1.0))
        };
        Ok(Self::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            if parts.len() == 4 { alpha(parts[3])? } else { 1.0 },
        ))
    }
}

/// Capability for turning a configured color token into a concrete color.
/// Frontends with access to computed styles follow `var(--...)` indirection;
/// the default resolver only understands literals.
pub trait ColorResolver {
    fn resolve(&self, token: &str) -> Option<Rgba>;
}

/// Passthrough resolver for literal color strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiteralResolver;

impl ColorResolver for LiteralResolver {
    fn resolve(&self, token: &str) -> Option<Rgba> {
        Rgba::parse(token).ok()
    }
}

/// Resolve a token, falling back to opaque white when it cannot be resolved.
/// An unresolvable token is a styling defect, not a crash.
pub fn resolve_or_fallback(resolver: &dyn ColorResolver, token: &str) -> Rgba {
    resolver.resolve(token).unwrap_or_else(|| {
        log::warn!("[color] unresolved token '{token}', using fallback");
        Rgba::WHITE
    })
}

/// HSL to linear-ish RGB, hue in degrees, saturation/lightness in percent.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = (h.rem_euclid(360.0)) / 360.0;
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);
    if s == 0.0 {
        return Vec3::splat(l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Vec3::new(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Derive the three-color bar palette from a single hue: base, accent
/// (+30 degrees), highlight (+15 degrees).
pub fn reveal_palette(hue: f32) -> [Vec3; 3] {
    [
        hsl_to_rgb(hue, 80.0, 60.0),
        hsl_to_rgb((hue + 30.0) % 360.0, 70.0, 50.0),
        hsl_to_rgb((hue + 15.0) % 360.0, 75.0, 65.0),
    ]
}
