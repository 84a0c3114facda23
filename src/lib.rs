//! Bouncing-logo idle screen.
//!
//! A logo bounces around every monitor at constant speed, picking a new tint
//! each time it hits a wall, until the user touches the keyboard or mouse.
//!
//! The crate is split so the interesting parts run without a display:
//! - [`tint`] recolors the logo
//! - [`bounce`] moves one logo inside one monitor
//! - [`session`] runs the frame loop and decides when to quit, fed by [`input`]
//! - [`topology`], [`logo`], [`surface`], [`clock`] and (with the `window`
//!   feature) [`window`] connect that core to a real machine
//!
//! This root module holds the shared [`Color`] type, the [`SaverConfig`]
//! defaults and the Ctrl+C helper used by the binary.

pub mod bounce;
pub mod cli;
pub mod clock;
pub mod error;
pub mod input;
pub mod logo;
pub mod session;
pub mod surface;
pub mod tint;
pub mod topology;
#[cfg(feature = "window")]
pub mod window;

pub use error::{Error, Result};

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tint::TintMode;

/// Logo speed along each axis, in pixels per second.
pub const SPEED: f64 = 150.0;

/// Hues (in degrees) a fresh tint is drawn from. Upper bound excluded.
pub const HUE_RANGE: Range<u16> = 120..240;

// ── Configuration ──────────────────────────────────────────────────

/// Tunables for one run of the screensaver.
///
/// `Default` carries the design values; the binary overrides fields from
/// its command line.
#[derive(Clone, Debug, PartialEq)]
pub struct SaverConfig {
    /// Pixels per second on each axis. Only the sign ever changes.
    pub speed: f64,
    /// Upper bound on the tick rate.
    pub target_fps: u32,
    /// Input arriving before this much time has passed is ignored.
    pub grace_period: Duration,
    /// Logo width is the primary monitor width divided by this.
    pub scale_divisor: u32,
    pub hue_range: Range<u16>,
    pub tint_mode: TintMode,
    /// Paint the logo white (keeping alpha) before tinting.
    pub whiten: bool,
}

impl SaverConfig {
    /// Length of one frame at the target rate.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }
}

impl Default for SaverConfig {
    fn default() -> Self {
        Self {
            speed: SPEED,
            target_fps: 60,
            grace_period: Duration::from_millis(100),
            scale_divisor: 6,
            hue_range: HUE_RANGE,
            tint_mode: TintMode::Multiply,
            whiten: true,
        }
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from hue (degrees, wraps at 360), saturation and
    /// lightness (both 0.0..=1.0).
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
        Self::new(r, g, b)
    }

    /// Fully saturated, mid-lightness color at `hue`.
    pub fn from_hue(hue: u16) -> Self {
        Self::from_hsl(hue as f64, 1.0, 0.5)
    }

    /// Hue, saturation and lightness of this color. Hue in `[0, 360)`.
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;
        let delta = max - min;

        if delta == 0.0 {
            return (0.0, 0.0, lightness);
        }

        let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
        let hue = if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        (hue.rem_euclid(360.0), saturation, lightness)
    }

    /// Packed `0x00RRGGBB`, the layout the framebuffer uses.
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let hue = hue.rem_euclid(360.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r1), channel(g1), channel(b1))
}

// ── Signal handling ────────────────────────────────────────────────

/// Install a Ctrl+C handler and return the flag it raises.
///
/// The flag starts `false` and becomes `true` once the user interrupts;
/// the input pump turns it into a quit event.
///
/// # Rust concept: Arc and AtomicBool
/// The handler runs on its own thread, so it needs an owned handle to the
/// flag. `Arc` gives it one (cloning the `Arc` clones the pointer, not the
/// bool) and `AtomicBool` lets both threads touch it without a mutex.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();

    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| Error::Platform(format!("failed to install Ctrl+C handler: {e}")))?;

    Ok(interrupted)
}

/// Whether Ctrl+C has been pressed.
pub fn is_interrupted(flag: &AtomicBool) -> bool {
    flag.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn default_config_uses_design_values() {
        let config = SaverConfig::default();
        assert_eq!(config.speed, 150.0);
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.grace_period, Duration::from_millis(100));
        assert_eq!(config.scale_divisor, 6);
        assert_eq!(config.hue_range, 120..240);
        assert_eq!(config.tint_mode, TintMode::Multiply);
        assert!(config.whiten);
    }

    #[rstest]
    #[case(60, 16_666)]
    #[case(30, 33_333)]
    #[case(0, 1_000_000)]
    fn frame_period_follows_fps(#[case] fps: u32, #[case] micros: u128) {
        let config = SaverConfig {
            target_fps: fps,
            ..SaverConfig::default()
        };
        assert_eq!(config.frame_period().as_micros(), micros);
    }

    #[rstest]
    #[case(0, 255, 0, 0)] // Red
    #[case(60, 255, 255, 0)] // Yellow
    #[case(120, 0, 255, 0)] // Green
    #[case(180, 0, 255, 255)] // Cyan
    #[case(240, 0, 0, 255)] // Blue
    #[case(300, 255, 0, 255)] // Magenta
    fn from_hue_primaries(#[case] hue: u16, #[case] r: u8, #[case] g: u8, #[case] b: u8) {
        assert_eq!(Color::from_hue(hue), Color::new(r, g, b));
    }

    #[test]
    fn from_hue_wraps_at_360() {
        assert_eq!(Color::from_hue(0), Color::from_hue(360));
        assert_eq!(Color::from_hue(150), Color::from_hue(510));
    }

    #[test]
    fn from_hsl_lightness_extremes() {
        assert_eq!(Color::from_hsl(200.0, 1.0, 0.0), Color::BLACK);
        assert_eq!(Color::from_hsl(200.0, 1.0, 1.0), Color::new(255, 255, 255));
    }

    #[test]
    fn from_hsl_zero_saturation_is_grey() {
        assert_eq!(Color::from_hsl(90.0, 0.0, 0.5), Color::new(128, 128, 128));
    }

    #[rstest]
    #[case(Color::new(255, 0, 0))]
    #[case(Color::new(12, 200, 99))]
    #[case(Color::new(80, 80, 200))]
    #[case(Color::new(255, 255, 255))]
    fn hsl_conversion_is_stable(#[case] color: Color) {
        let (h, s, l) = color.to_hsl();
        assert_eq!(Color::from_hsl(h, s, l), color);
    }

    #[test]
    fn to_hsl_of_grey_has_no_saturation() {
        let (h, s, l) = Color::new(100, 100, 100).to_hsl();
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((l - 100.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn to_u32_packs_rgb() {
        assert_eq!(Color::new(0x12, 0x34, 0x56).to_u32(), 0x0012_3456);
    }

    #[test]
    fn interrupted_flag_reads_through() {
        let flag = AtomicBool::new(false);
        assert!(!is_interrupted(&flag));
        flag.store(true, Ordering::SeqCst);
        assert!(is_interrupted(&flag));
    }
}
