// Host-side tests for color parsing, palette derivation and the resolver
// fallback path.

use fx_core::color::{
    hsl_to_rgb, resolve_or_fallback, reveal_palette, ColorResolver, LiteralResolver, Rgba,
};
use glam::Vec3;

#[test]
fn parses_six_digit_hex() {
    let c = Rgba::parse("#0369a1").expect("valid hex");
    assert!((c.r - 3.0 / 255.0).abs() < 1e-6);
    assert!((c.g - 105.0 / 255.0).abs() < 1e-6);
    assert!((c.b - 161.0 / 255.0).abs() < 1e-6);
    assert_eq!(c.a, 1.0);
}

#[test]
fn parses_short_and_alpha_hex() {
    let c = Rgba::parse("#fff").expect("valid hex");
    assert_eq!(c, Rgba::WHITE);

    let c = Rgba::parse("#00000080").expect("valid hex");
    assert_eq!((c.r, c.g, c.b), (0.0, 0.0, 0.0));
    assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
}

#[test]
fn parses_rgb_function_forms() {
    let c = Rgba::parse("rgb(255, 0, 0)").expect("valid rgb");
    assert_eq!((c.r, c.g, c.b, c.a), (1.0, 0.0, 0.0, 1.0));

    let c = Rgba::parse("rgba(0, 255, 0, 0.5)").expect("valid rgba");
    assert_eq!((c.r, c.g, c.b, c.a), (0.0, 1.0, 0.0, 0.5));
}

#[test]
fn rejects_garbage_and_theme_tokens() {
    assert!(Rgba::parse("").is_err());
    assert!(Rgba::parse("#12").is_err());
    assert!(Rgba::parse("#xyzxyz").is_err());
    assert!(Rgba::parse("var(--color-sky-700)").is_err());
    assert!(Rgba::parse("rgb(1, 2)").is_err());
}

#[test]
fn css_serialization_round_trips() {
    let c = Rgba::opaque(1.0, 0.5, 0.0);
    assert_eq!(c.to_css(), "rgba(255, 128, 0, 1)");
}

#[test]
fn literal_resolver_passes_literals_and_skips_vars() {
    let resolver = LiteralResolver;
    assert!(resolver.resolve("#0369a1").is_some());
    assert!(resolver.resolve("var(--color-sky-700)").is_none());
}

#[test]
fn unresolved_tokens_fall_back_without_failing() {
    let resolver = LiteralResolver;
    let c = resolve_or_fallback(&resolver, "var(--does-not-exist)");
    assert_eq!(c, Rgba::WHITE);
}

#[test]
fn hsl_grayscale_and_primaries() {
    assert_eq!(hsl_to_rgb(0.0, 0.0, 50.0), Vec3::splat(0.5));

    let red = hsl_to_rgb(0.0, 100.0, 50.0);
    assert!((red - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);

    let green = hsl_to_rgb(120.0, 100.0, 50.0);
    assert!((green - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
}

#[test]
fn hue_wraps_past_360() {
    let a = hsl_to_rgb(30.0, 80.0, 60.0);
    let b = hsl_to_rgb(390.0, 80.0, 60.0);
    assert!((a - b).length() < 1e-6);
}

#[test]
fn palette_derives_three_distinct_in_range_colors() {
    let [base, accent, highlight] = reveal_palette(200.0);
    for c in [base, accent, highlight] {
        assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
    }
    assert_ne!(base, accent);
    assert_ne!(base, highlight);
    assert_ne!(accent, highlight);
}
