use rand::rngs::StdRng;

use crate::effects::draw::{alpha_byte, fill_disc};
use crate::effects::particles::{wrap_coord, Particle};
use crate::effects::traits::{EffectContext, ParticleEffect};
use crate::video::RasterSurface;

/// White flakes falling with a gentle sideways sway
pub struct SnowfallEffect;

impl SnowfallEffect {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SnowfallEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleEffect for SnowfallEffect {
    fn name(&self) -> &str {
        "snowfall"
    }

    fn description(&self) -> &str {
        "Soft white snowflakes drifting down the frame"
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
            let py = wrap_coord(p.y + t * p.speed * 60.0, ctx.height);
            let px = wrap_coord(p.x + 20.0 * (t * 2.0 + p.phase).sin(), ctx.width);
            let size = (p.size as i64).max(1);
            let alpha = alpha_byte(180.0 + 60.0 * (t * 3.0 + p.phase).sin());

            fill_disc(overlay, px, py, size, [255, 255, 255], alpha);
        }
    }
}
