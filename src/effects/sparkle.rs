use rand::rngs::StdRng;
use rand::Rng;

use crate::effects::draw::{alpha_byte, axis_line, fill_disc};
use crate::effects::particles::{wrap_coord, Particle};
use crate::effects::traits::{EffectContext, ParticleEffect};
use crate::video::RasterSurface;

const STAR_COLOR: [u8; 3] = [255, 230, 120];

/// Flickering gold dust drifting slowly downward
///
/// Bright particles grow a four-point star cross.
pub struct SparkleEffect;

impl SparkleEffect {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SparkleEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleEffect for SparkleEffect {
    fn name(&self) -> &str {
        "sparkle"
    }

    fn description(&self) -> &str {
        "Flickering gold dust with star glints on the brightest specks"
    }

    fn draw(
        &self,
        overlay: &mut RasterSurface,
        particles: &[Particle],
        rng: &mut StdRng,
        ctx: &EffectContext,
    ) {
        let t = ctx.t;

        for p in particles {
            let flicker = 0.5 + 0.5 * (t * 8.0 + p.phase).sin();
            let alpha = (200.0 * flicker) as i64;
            if alpha < 30 {
                continue;
            }

            let px = wrap_coord(p.x + p.drift * (t * 1.5 + p.phase).sin(), ctx.width);
            let py = wrap_coord(p.y + t * p.speed * 80.0, ctx.height);
            let size = ((p.size * (0.6 + 0.4 * flicker)) as i64).max(1);

            let color = [
                rng.gen_range(220..=255u8),
                rng.gen_range(180..=220u8),
                rng.gen_range(50..=100u8),
            ];
            fill_disc(overlay, px, py, size, color, alpha_byte(alpha as f64));

            if size > 3 && flicker > 0.7 {
                let arm = size * 2;
                let star_alpha = alpha_byte(alpha as f64 * 0.6);
                for (dx, dy) in [(arm, 0), (-arm, 0), (0, arm), (0, -arm)] {
                    axis_line(overlay, px, py, dx, dy, STAR_COLOR, star_alpha);
                }
            }
        }
    }
}
