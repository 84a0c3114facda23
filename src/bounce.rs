//! One logo bouncing inside one monitor.
//!
//! Motion is plain constant-velocity integration. Each axis is checked
//! against its two walls independently every tick; on contact the position
//! is clamped back inside in the same tick and the velocity sign flips
//! toward the interior. The speed never changes.

use crate::SaverConfig;
use crate::tint::{LogoImage, RandomSource, TintedImage, random_tint};
use crate::topology::Region;

#[derive(Clone, Debug, PartialEq)]
pub struct BounceInstance {
    /// The monitor this logo is confined to.
    pub region: Region,
    /// Top-left corner of the logo, in surface coordinates.
    pub position: (f64, f64),
    /// Pixels per second. Each component is `±speed`.
    pub velocity: (f64, f64),
    pub image: TintedImage,
}

impl BounceInstance {
    /// Center a freshly tinted logo in `region`, heading in a random diagonal.
    pub fn spawn(
        region: Region,
        logo: &LogoImage,
        config: &SaverConfig,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let x = region.x as i64 + (region.width as i64 - logo.width() as i64).div_euclid(2);
        let y = region.y as i64 + (region.height as i64 - logo.height() as i64).div_euclid(2);
        let velocity = (config.speed * rng.sign(), config.speed * rng.sign());
        let image = random_tint(logo, config.tint_mode, config.hue_range.clone(), rng);

        Self {
            region,
            position: (x as f64, y as f64),
            velocity,
            image,
        }
    }

    /// Move by `dt` seconds and resolve wall contact. Returns whether any
    /// wall was hit. Does not retint; see [`advance`](Self::advance).
    pub fn step(&mut self, dt: f64) -> bool {
        self.position.0 += self.velocity.0 * dt;
        self.position.1 += self.velocity.1 * dt;

        let hit_x = resolve_axis(
            &mut self.position.0,
            &mut self.velocity.0,
            self.region.x as f64,
            self.region.width as f64,
            self.image.width() as f64,
        );
        let hit_y = resolve_axis(
            &mut self.position.1,
            &mut self.velocity.1,
            self.region.y as f64,
            self.region.height as f64,
            self.image.height() as f64,
        );
        hit_x || hit_y
    }

    /// Move by `dt` seconds; on any wall contact swap in a newly tinted logo.
    pub fn advance(
        &mut self,
        dt: f64,
        logo: &LogoImage,
        config: &SaverConfig,
        rng: &mut dyn RandomSource,
    ) -> bool {
        let bounced = self.step(dt);
        if bounced {
            self.image = random_tint(logo, config.tint_mode, config.hue_range.clone(), rng);
            tracing::debug!(
                "Bounce at ({:.1}, {:.1}), new hue {}",
                self.position.0,
                self.position.1,
                self.image.hue()
            );
        }
        bounced
    }

    /// Where to draw the logo: position rounded to whole pixels.
    pub fn draw_position(&self) -> (i32, i32) {
        (
            self.position.0.round() as i32,
            self.position.1.round() as i32,
        )
    }
}

/// Clamp one axis against `[origin, origin + extent]`.
///
/// The lower wall is tested first and the upper wall second, so when the
/// logo is larger than the region the upper clamp is the one that sticks.
fn resolve_axis(pos: &mut f64, vel: &mut f64, origin: f64, extent: f64, size: f64) -> bool {
    let mut hit = false;
    if *pos <= origin {
        *pos = origin;
        *vel = vel.abs();
        hit = true;
    }
    if *pos + size >= origin + extent {
        *pos = origin + extent - size;
        *vel = -vel.abs();
        hit = true;
    }
    hit
}
