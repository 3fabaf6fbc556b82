use rand::rngs::StdRng;

use crate::effects::draw::{alpha_byte, fill_disc};
use crate::effects::particles::{wrap_coord, Particle};
use crate::effects::traits::{EffectContext, ParticleEffect};
use crate::video::RasterSurface;

const FIREFLY_COLOR: [u8; 3] = [255, 240, 80];

/// Warm glowing specks wandering on slow orbits
pub struct FireflyEffect;

impl FireflyEffect {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FireflyEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleEffect for FireflyEffect {
    fn name(&self) -> &str {
        "firefly"
    }

    fn description(&self) -> &str {
        "Pulsing warm-yellow fireflies with a faint halo"
    }

    fn particle_count(&self) -> usize {
        25
    }

    fn draw(
        &self,
        overlay: &mut RasterSurface,
        particles: &[Particle],
        _rng: &mut StdRng,
        ctx: &EffectContext,
    ) {
        let t = ctx.t;

        for p in particles {
            let px = wrap_coord(p.x + 40.0 * (t * 0.7 + p.phase).sin(), ctx.width);
            let py = wrap_coord(p.y + 30.0 * (t * 0.5 + p.phase).cos(), ctx.height);
            let glow = 0.5 + 0.5 * (t * 4.0 + p.phase).sin();
            let alpha = (180.0 * glow) as i64;
            let radius = ((p.size * 0.8) as i64).max(1);

            // halo first so the core stays bright on top of it
            fill_disc(overlay, px, py, radius * 3, FIREFLY_COLOR, alpha_byte(alpha as f64 * 0.15));
            fill_disc(overlay, px, py, radius, FIREFLY_COLOR, alpha_byte(alpha as f64));
        }
    }
}
