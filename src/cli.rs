//! Command line of the `bonk` binary.
//!
//! Windows launches screensavers with a single slash flag (`/s` to run,
//! `/c` to configure, `/p <hwnd>` to preview in the control panel). Those
//! are peeled off by [`ScreensaverMode::detect`] before clap sees the rest.

use crate::tint::TintMode;
use crate::topology::Region;
use crate::{SaverConfig, error::Result, topology::parse_size};
use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the host asked us to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreensaverMode {
    Run,
    Configure,
    Preview,
}

impl ScreensaverMode {
    /// Look at the first argument after the program name.
    pub fn detect(first_arg: Option<&str>) -> Self {
        let Some(arg) = first_arg else {
            return Self::Run;
        };
        let flag = arg.to_lowercase();
        if flag.starts_with("/c") {
            Self::Configure
        } else if flag.starts_with("/p") {
            Self::Preview
        } else {
            Self::Run
        }
    }
}

/// Logo used when `--logo` is not given, relative to the install directory.
pub const DEFAULT_LOGO: &str = "assets/dvd_logo.png";

/// Where to load the logo from.
///
/// An explicit path is used as given. Otherwise the default asset next to
/// the executable wins when it exists (Windows starts screensavers with
/// `System32` as the working directory). Falls back to the
/// working-directory path.
pub fn resolve_logo(explicit: Option<&Path>, exe_dir: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    exe_dir
        .map(|dir| dir.join(DEFAULT_LOGO))
        .filter(|candidate| candidate.is_file())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGO))
}

/// Drop a leading `/s` so clap only sees regular flags.
pub fn strip_screensaver_flag(args: Vec<OsString>) -> Vec<OsString> {
    let mut args = args;
    let is_run_flag = args
        .get(1)
        .and_then(|a| a.to_str())
        .is_some_and(|a| a.to_lowercase().starts_with("/s"));
    if is_run_flag {
        args.remove(1);
    }
    args
}

/// Bouncing logo idle screen
#[derive(Parser, Debug)]
#[command(name = "bonk")]
#[command(about = "Turns your PC into a 2004 DVD player on standby")]
#[command(version)]
pub struct Args {
    /// Logo image (PNG or JPEG) [default: assets/dvd_logo.png next to the binary]
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Speed in pixels per second along each axis
    #[arg(long, default_value_t = crate::SPEED)]
    pub speed: f64,

    /// Maximum frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Ignore input for this many milliseconds after start
    #[arg(long, default_value_t = 100)]
    pub grace_ms: u64,

    /// Logo width is the primary monitor width divided by this
    #[arg(long, default_value_t = 6)]
    pub scale_divisor: u32,

    /// How bounces recolor the logo
    #[arg(long, value_enum, default_value_t = TintMode::Multiply)]
    pub tint: TintMode,

    /// Keep the logo's own colors instead of painting it white first
    #[arg(long)]
    pub keep_colors: bool,

    /// Monitor rectangle `x,y,WxH`; repeat for several monitors
    #[arg(long = "monitor", value_name = "X,Y,WxH", allow_hyphen_values = true)]
    pub monitors: Vec<Region>,

    /// Screen size used when monitors cannot be detected
    #[arg(long, default_value = "1920x1080")]
    pub size: String,

    /// Seed for hues and starting directions
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Args {
    pub fn config(&self) -> SaverConfig {
        SaverConfig {
            speed: self.speed.abs(),
            target_fps: self.fps.max(1),
            grace_period: Duration::from_millis(self.grace_ms),
            scale_divisor: self.scale_divisor.max(1),
            tint_mode: self.tint,
            whiten: !self.keep_colors,
            ..SaverConfig::default()
        }
    }

    /// The logo path, resolving the default against the executable's
    /// directory.
    pub fn logo_path(&self) -> PathBuf {
        let exe = std::env::current_exe().ok();
        resolve_logo(self.logo.as_deref(), exe.as_deref().and_then(Path::parent))
    }

    /// The `--size` fallback as `(width, height)`.
    pub fn fallback_size(&self) -> Result<(u32, u32)> {
        parse_size(&self.size)
    }
}
