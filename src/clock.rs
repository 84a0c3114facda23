//! Frame pacing.
//!
//! The loop asks the clock for `dt` once per tick. [`SystemClock`] sleeps
//! away whatever is left of the target frame period first, so the loop
//! never runs faster than the target rate, and then reports the real time
//! since the previous tick (longer than the period when frames drop).

use std::thread;
use std::time::{Duration, Instant};

pub trait FrameClock {
    /// Wait for the next frame and return seconds since the previous one.
    fn tick(&mut self) -> f64;

    /// Time since the clock was created.
    fn elapsed(&self) -> Duration;
}

pub struct SystemClock {
    start: Instant,
    last_tick: Instant,
    period: Duration,
}

impl SystemClock {
    pub fn new(period: Duration) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            period,
        }
    }
}

impl FrameClock for SystemClock {
    fn tick(&mut self) -> f64 {
        let since_last = self.last_tick.elapsed();
        if since_last < self.period {
            thread::sleep(self.period - since_last);
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        dt.as_secs_f64()
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that advances by a fixed step per tick and never sleeps.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Duration,
    step: Duration,
}

impl ManualClock {
    pub fn new(step: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            step,
        }
    }
}

impl FrameClock for ManualClock {
    fn tick(&mut self) -> f64 {
        self.now += self.step;
        self.step.as_secs_f64()
    }

    fn elapsed(&self) -> Duration {
        self.now
    }
}
