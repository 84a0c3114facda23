//! bonk: turning your PC into a 2004 DVD player on standby.
//!
//! Opens a borderless window over every monitor and bounces a logo in each
//! one until the user presses a key, clicks, scrolls, or moves the mouse.
//!
//! ## Usage
//! ```sh
//! bonk --logo assets/dvd_logo.png
//! bonk --monitor -1920,0,1920x1080 --monitor 0,0,2560x1440
//! RUST_LOG=debug bonk --seed 7   # log every bounce
//! ```
//!
//! On Windows the binary can be renamed to `bonk.scr` and installed as a
//! screensaver; `/s` runs it, `/c` and `/p` are acknowledged and ignored.

use std::process::ExitCode;

#[cfg(not(feature = "window"))]
fn main() -> ExitCode {
    eprintln!("This binary requires the 'window' feature (minifb).");
    eprintln!("Build with: cargo build --release");
    eprintln!("Tests can run without it: cargo test --no-default-features");
    ExitCode::FAILURE
}

#[cfg(feature = "window")]
fn main() -> ExitCode {
    use bonk::cli::{ScreensaverMode, strip_screensaver_flag};

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let raw: Vec<std::ffi::OsString> = std::env::args_os().collect();
    let first = raw.get(1).and_then(|a| a.to_str());
    match ScreensaverMode::detect(first) {
        ScreensaverMode::Configure | ScreensaverMode::Preview => {
            println!("Configuration menu and in-window preview are not implemented");
            return ExitCode::SUCCESS;
        }
        ScreensaverMode::Run => {}
    }

    let args = <bonk::cli::Args as clap::Parser>::parse_from(strip_screensaver_flag(raw));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "window")]
fn run(args: bonk::cli::Args) -> bonk::Result<()> {
    use bonk::clock::SystemClock;
    use bonk::logo::{LogoOptions, load_logo};
    use bonk::session::Session;
    use bonk::tint::RandomSource;
    use bonk::topology::{self, FixedTopology, TopologyProvider, to_surface_space};
    use bonk::window::ScreenWindow;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    let config = args.config();
    tracing::info!("bonk v{}", env!("CARGO_PKG_VERSION"));

    let provider: Box<dyn TopologyProvider> = if !args.monitors.is_empty() {
        Box::new(FixedTopology::new(args.monitors.clone()))
    } else {
        match topology::detect().and_then(|p| p.regions().map(|_| p)) {
            Ok(p) => p,
            Err(e) => {
                let (w, h) = args.fallback_size()?;
                tracing::warn!("Monitor detection failed ({}), using {}x{}", e, w, h);
                Box::new(FixedTopology::single(w, h))
            }
        }
    };

    let regions = provider.regions()?;
    let bounds = provider.virtual_bounds()?;
    for (i, region) in regions.iter().enumerate() {
        tracing::info!("Monitor {}: {}", i, region);
    }

    let logo = load_logo(
        &args.logo_path(),
        LogoOptions {
            primary_width: provider.primary_width()?,
            scale_divisor: config.scale_divisor,
            whiten: config.whiten,
        },
    )?;
    tracing::info!(
        "Logo scaled to {}x{}, tint mode {:?}",
        logo.width(),
        logo.height(),
        config.tint_mode
    );

    let rng: Box<dyn RandomSource> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_entropy()),
    };

    let interrupted = bonk::setup_signal_handler()?;
    let mut window = ScreenWindow::open("bonk", bounds, interrupted)?;
    let mut clock = SystemClock::new(config.frame_period());
    let mut session = Session::new(logo, &to_surface_space(&regions, bounds), config, rng)?;

    let reason = session.run(&mut clock, &mut window)?;
    tracing::info!("Stopped: {:?}", reason);

    // Window closes on drop.
    drop(window);
    Ok(())
}
