//! Logo recoloring.
//!
//! Every bounce gives the logo a new color. Two algorithms are available:
//!
//! - [`TintMode::Multiply`] (default): multiply each RGB channel by a fully
//!   saturated overlay color. One pass, no per-pixel color space math. On a
//!   whitened logo this yields exactly the overlay hue; on a colored logo the
//!   result's brightness still depends on the source pixel, so it is not a
//!   true hue rotation.
//! - [`TintMode::Rotate`]: convert each visible pixel to HSL and rotate its
//!   hue. Exact, but much slower.
//!
//! Both leave alpha untouched and never modify the source image.

use crate::Color;
use image::{Rgba, RgbaImage};
use std::ops::Range;

/// The decoded logo. Loaded once and shared read-only by every instance.
#[derive(Clone, Debug, PartialEq)]
pub struct LogoImage {
    pixels: RgbaImage,
}

impl LogoImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// A recolored copy of the logo, owned by one bouncing instance.
#[derive(Clone, Debug, PartialEq)]
pub struct TintedImage {
    pixels: RgbaImage,
    hue: u16,
}

impl TintedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// The hue (degrees) this image was tinted with.
    pub fn hue(&self) -> u16 {
        self.hue
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TintMode {
    /// Multiply by a solid overlay color.
    #[default]
    Multiply,
    /// Rotate each pixel's hue.
    Rotate,
}

// ── Randomness ─────────────────────────────────────────────────────

/// Where hues and velocity signs come from.
///
/// Any `rand` RNG works; tests plug in [`FixedSource`] to get exact colors.
pub trait RandomSource {
    /// A hue drawn uniformly from `range`.
    fn hue_in(&mut self, range: Range<u16>) -> u16;

    /// `1.0` or `-1.0` with equal probability.
    fn sign(&mut self) -> f64;
}

/// Every `rand` generator is a [`RandomSource`].
///
/// # Rust concept: blanket implementations
/// `impl<R: Rng> RandomSource for R` implements the trait for every type
/// that already implements `Rng`, so `StdRng`, `ThreadRng` and friends can
/// be boxed as `dyn RandomSource` without a wrapper type.
impl<R: rand::Rng> RandomSource for R {
    fn hue_in(&mut self, range: Range<u16>) -> u16 {
        if range.is_empty() {
            return range.start;
        }
        self.gen_range(range)
    }

    fn sign(&mut self) -> f64 {
        if self.gen_bool(0.5) { 1.0 } else { -1.0 }
    }
}

/// Replays a fixed list of hues (cycling) and always returns the same sign.
#[derive(Clone, Debug)]
pub struct FixedSource {
    hues: Vec<u16>,
    next: usize,
    sign: f64,
}

impl FixedSource {
    pub fn new(hues: Vec<u16>, sign: f64) -> Self {
        Self { hues, next: 0, sign }
    }
}

impl RandomSource for FixedSource {
    fn hue_in(&mut self, range: Range<u16>) -> u16 {
        if self.hues.is_empty() {
            return range.start;
        }
        let hue = self.hues[self.next % self.hues.len()];
        self.next += 1;
        hue
    }

    fn sign(&mut self) -> f64 {
        self.sign
    }
}

// ── Tinting ────────────────────────────────────────────────────────

/// Recolor `source` with `hue` using `mode`.
pub fn tint(source: &LogoImage, hue: u16, mode: TintMode) -> TintedImage {
    let pixels = match mode {
        TintMode::Multiply => multiply(&source.pixels, Color::from_hue(hue)),
        TintMode::Rotate => rotate(&source.pixels, hue),
    };
    TintedImage { pixels, hue }
}

/// Recolor `source` with a hue freshly drawn from `range`.
pub fn random_tint(
    source: &LogoImage,
    mode: TintMode,
    range: Range<u16>,
    rng: &mut dyn RandomSource,
) -> TintedImage {
    let hue = rng.hue_in(range);
    tint(source, hue, mode)
}

fn multiply(source: &RgbaImage, overlay: Color) -> RgbaImage {
    let mul = |s: u8, o: u8| ((s as u16 * o as u16) / 255) as u8;

    let mut out = source.clone();
    for pixel in out.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        *pixel = Rgba([mul(r, overlay.r), mul(g, overlay.g), mul(b, overlay.b), a]);
    }
    out
}

fn rotate(source: &RgbaImage, degrees: u16) -> RgbaImage {
    let mut out = source.clone();
    for pixel in out.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        if a == 0 {
            continue;
        }
        let (h, s, l) = Color::new(r, g, b).to_hsl();
        let c = Color::from_hsl(h + degrees as f64, s, l);
        *pixel = Rgba([c.r, c.g, c.b, a]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn logo_with_alpha_ramp() -> LogoImage {
        // Column x has alpha x * 85: 0, 85, 170, 255.
        let img = RgbaImage::from_fn(4, 3, |x, y| {
            Rgba([200, (y * 60) as u8, 255, (x * 85) as u8])
        });
        LogoImage::new(img)
    }

    fn white_logo(w: u32, h: u32) -> LogoImage {
        LogoImage::new(RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])))
    }

    #[rstest]
    #[case(TintMode::Multiply)]
    #[case(TintMode::Rotate)]
    fn tint_preserves_alpha_and_size(#[case] mode: TintMode) {
        let logo = logo_with_alpha_ramp();
        let tinted = tint(&logo, 200, mode);

        assert_eq!(tinted.width(), logo.width());
        assert_eq!(tinted.height(), logo.height());
        for (src, out) in logo.pixels().pixels().zip(tinted.pixels().pixels()) {
            assert_eq!(src[3], out[3]);
        }
    }

    #[rstest]
    #[case(TintMode::Multiply)]
    #[case(TintMode::Rotate)]
    fn tint_does_not_touch_source(#[case] mode: TintMode) {
        let logo = logo_with_alpha_ramp();
        let before = logo.clone();
        let _ = tint(&logo, 150, mode);
        assert_eq!(logo, before);
    }

    #[rstest]
    #[case(120, [0, 255, 0])]
    #[case(180, [0, 255, 255])]
    #[case(150, [0, 255, 128])]
    fn multiply_on_white_gives_overlay(#[case] hue: u16, #[case] rgb: [u8; 3]) {
        let tinted = tint(&white_logo(2, 2), hue, TintMode::Multiply);
        for px in tinted.pixels().pixels() {
            assert_eq!([px[0], px[1], px[2]], rgb);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn multiply_scales_by_overlay_over_255() {
        // Overlay at hue 150 is (0, 255, 128).
        let logo = LogoImage::new(RgbaImage::from_pixel(1, 1, Rgba([100, 100, 100, 42])));
        let tinted = tint(&logo, 150, TintMode::Multiply);
        assert_eq!(*tinted.pixels().get_pixel(0, 0), Rgba([0, 100, 50, 42]));
    }

    #[test]
    fn multiply_keeps_black_black() {
        let logo = LogoImage::new(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255])));
        let tinted = tint(&logo, 200, TintMode::Multiply);
        assert_eq!(*tinted.pixels().get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn rotate_shifts_hue() {
        // Pure red rotated by 120 degrees is pure green.
        let logo = LogoImage::new(RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 200])));
        let tinted = tint(&logo, 120, TintMode::Rotate);
        assert_eq!(*tinted.pixels().get_pixel(0, 0), Rgba([0, 255, 0, 200]));
    }

    #[test]
    fn rotate_skips_transparent_pixels() {
        let logo = LogoImage::new(RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 0])));
        let tinted = tint(&logo, 120, TintMode::Rotate);
        assert_eq!(*tinted.pixels().get_pixel(0, 0), Rgba([255, 0, 0, 0]));
    }

    #[test]
    fn random_tint_records_drawn_hue() {
        let mut source = FixedSource::new(vec![133, 222], 1.0);
        let logo = white_logo(1, 1);

        let first = random_tint(&logo, TintMode::Multiply, 120..240, &mut source);
        let second = random_tint(&logo, TintMode::Multiply, 120..240, &mut source);
        let third = random_tint(&logo, TintMode::Multiply, 120..240, &mut source);

        assert_eq!(first.hue(), 133);
        assert_eq!(second.hue(), 222);
        assert_eq!(third.hue(), 133);
    }

    #[test]
    fn rng_hues_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let hue = rng.hue_in(120..240);
            assert!((120..240).contains(&hue), "hue {hue} out of range");
        }
    }

    #[test]
    fn rng_signs_are_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        let signs: Vec<f64> = (0..200).map(|_| rng.sign()).collect();
        assert!(signs.iter().all(|s| *s == 1.0 || *s == -1.0));
        assert!(signs.contains(&1.0));
        assert!(signs.contains(&-1.0));
    }

    #[test]
    fn empty_range_returns_start() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(rng.hue_in(200..200), 200);
    }
}
