//! The animation loop.
//!
//! A [`Session`] owns one [`BounceInstance`] per monitor and the shared
//! logo. Each tick it drains input, moves every logo, and draws the frame.
//! Deciding when to stop is the job of [`QuitDetector`], a small state
//! machine that ignores input during a short startup grace period and
//! treats the first pointer position seen after it as a baseline, so
//! synthetic cursor jiggle at launch does not end the session.

use crate::bounce::BounceInstance;
use crate::clock::FrameClock;
use crate::error::{Error, Result};
use crate::input::{EventSource, InputEvent};
use crate::surface::{FrameBuffer, Surface};
use crate::tint::{LogoImage, RandomSource, TintedImage};
use crate::topology::Region;
use crate::{Color, SaverConfig};
use std::time::Duration;

// ── Termination ──────────────────────────────────────────────────────

/// Why the session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuitReason {
    QuitRequested,
    KeyPressed,
    ButtonPressed,
    Scrolled,
    PointerMoved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated(QuitReason),
}

/// Pointer tracking after the grace period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuitState {
    /// No pointer movement seen since the grace period ended.
    AwaitingBaseline,
    /// First post-grace pointer position; moving away from it quits.
    Baseline(i32, i32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuitDetector {
    grace_period: Duration,
    state: QuitState,
}

impl QuitDetector {
    pub fn new(grace_period: Duration) -> Self {
        Self {
            grace_period,
            state: QuitState::AwaitingBaseline,
        }
    }

    pub fn state(&self) -> QuitState {
        self.state
    }

    /// Feed one event seen `elapsed` after session start.
    pub fn observe(&mut self, event: InputEvent, elapsed: Duration) -> Option<QuitReason> {
        match event {
            InputEvent::Quit => Some(QuitReason::QuitRequested),
            _ if elapsed <= self.grace_period => None,
            InputEvent::KeyDown => Some(QuitReason::KeyPressed),
            InputEvent::ButtonDown => Some(QuitReason::ButtonPressed),
            InputEvent::Scroll => Some(QuitReason::Scrolled),
            InputEvent::PointerMove(x, y) => match self.state {
                QuitState::AwaitingBaseline => {
                    self.state = QuitState::Baseline(x, y);
                    None
                }
                QuitState::Baseline(bx, by) if (bx, by) != (x, y) => {
                    Some(QuitReason::PointerMoved)
                }
                QuitState::Baseline(..) => None,
            },
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────

pub struct Session {
    logo: LogoImage,
    instances: Vec<BounceInstance>,
    config: SaverConfig,
    rng: Box<dyn RandomSource>,
    quit: QuitDetector,
    state: LoopState,
}

impl Session {
    /// Spawn one centered, tinted logo per region.
    pub fn new(
        logo: LogoImage,
        regions: &[Region],
        config: SaverConfig,
        mut rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        if regions.is_empty() {
            return Err(Error::NoMonitors);
        }

        let instances = regions
            .iter()
            .map(|region| BounceInstance::spawn(*region, &logo, &config, rng.as_mut()))
            .collect();
        let quit = QuitDetector::new(config.grace_period);

        Ok(Self {
            logo,
            instances,
            config,
            rng,
            quit,
            state: LoopState::Running,
        })
    }

    pub fn instances(&self) -> &[BounceInstance] {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut [BounceInstance] {
        &mut self.instances
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn quit_state(&self) -> QuitState {
        self.quit.state()
    }

    /// Apply a batch of events. Once terminated, further events are ignored.
    pub fn handle_events(&mut self, events: &[InputEvent], elapsed: Duration) -> LoopState {
        for event in events {
            if self.state != LoopState::Running {
                break;
            }
            if let Some(reason) = self.quit.observe(*event, elapsed) {
                tracing::info!("Quitting: {:?} after {:?}", reason, elapsed);
                self.state = LoopState::Terminated(reason);
            }
        }
        self.state
    }

    /// Move every logo by `dt` seconds. Returns how many bounced.
    pub fn update(&mut self, dt: f64) -> usize {
        let mut bounces = 0;
        for instance in &mut self.instances {
            if instance.advance(dt, &self.logo, &self.config, self.rng.as_mut()) {
                bounces += 1;
            }
        }
        bounces
    }

    /// Draw every logo on black and present.
    pub fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.clear(Color::BLACK);
        for instance in &self.instances {
            let (x, y) = instance.draw_position();
            surface.composite(&instance.image, x, y);
        }
        surface.present()
    }

    /// One full tick: input, motion, frame. No motion or frame once the
    /// input has ended the session.
    pub fn tick(
        &mut self,
        dt: f64,
        elapsed: Duration,
        events: &[InputEvent],
        surface: &mut dyn Surface,
    ) -> Result<LoopState> {
        if let LoopState::Terminated(_) = self.handle_events(events, elapsed) {
            return Ok(self.state);
        }
        self.update(dt);
        self.render(surface)?;
        Ok(self.state)
    }

    /// Run until input ends the session.
    ///
    /// `frontend` is both where frames go and where input comes from; a
    /// window is usually both.
    ///
    /// # Rust concept: multiple trait bounds
    /// `F: Surface + EventSource` asks for one value that implements both
    /// traits. Two `&mut dyn` parameters could not point at the same window,
    /// since Rust allows only one mutable borrow at a time. A generic with
    /// both bounds borrows it once and is monomorphized per frontend.
    pub fn run<F>(&mut self, clock: &mut dyn FrameClock, frontend: &mut F) -> Result<QuitReason>
    where
        F: Surface + EventSource,
    {
        let period = self.config.frame_period();
        let mut slow_frames = 0u32;

        tracing::info!(
            "Animating {} logo(s) at {} px/s, {} fps target",
            self.instances.len(),
            self.config.speed,
            self.config.target_fps
        );

        let (width, height) = frontend.size();
        for region in self.instances.iter().map(|i| i.region) {
            if region.x < 0
                || region.y < 0
                || region.right() > width as i64
                || region.bottom() > height as i64
            {
                tracing::warn!("Monitor {} extends past the {}x{} surface", region, width, height);
            }
        }

        loop {
            let dt = clock.tick();
            if dt > period.as_secs_f64() * 2.0 {
                slow_frames += 1;
                if slow_frames <= 5 {
                    tracing::warn!(
                        "Frame took {:.1}ms (target: {:.1}ms)",
                        dt * 1000.0,
                        period.as_secs_f64() * 1000.0
                    );
                }
            }

            let batch = frontend.poll();
            if let LoopState::Terminated(reason) =
                self.tick(dt, clock.elapsed(), &batch, frontend)?
            {
                if slow_frames > 0 {
                    tracing::warn!("Session had {} slow frames", slow_frames);
                }
                return Ok(reason);
            }
        }
    }
}

// ── Headless frontend ────────────────────────────────────────────────

/// An in-memory framebuffer fed by any event source. Runs the full loop
/// with no window.
pub struct Headless<E> {
    pub frame: FrameBuffer,
    pub events: E,
}

impl<E: EventSource> Headless<E> {
    pub fn new(width: usize, height: usize, events: E) -> Self {
        Self {
            frame: FrameBuffer::new(width, height),
            events,
        }
    }
}

impl<E> Surface for Headless<E> {
    fn size(&self) -> (usize, usize) {
        self.frame.size()
    }

    fn clear(&mut self, color: Color) {
        self.frame.clear(color);
    }

    fn composite(&mut self, image: &TintedImage, x: i32, y: i32) {
        self.frame.composite(image, x, y);
    }

    fn present(&mut self) -> Result<()> {
        self.frame.present()
    }
}

impl<E: EventSource> EventSource for Headless<E> {
    fn poll(&mut self) -> Vec<InputEvent> {
        self.events.poll()
    }
}
