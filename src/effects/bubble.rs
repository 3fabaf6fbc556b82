use rand::rngs::StdRng;

use crate::effects::draw::{alpha_byte, fill_disc};
use crate::effects::particles::{wrap_coord, Particle};
use crate::effects::traits::{EffectContext, ParticleEffect};
use crate::video::RasterSurface;

const BUBBLE_COLOR: [u8; 3] = [200, 230, 255];

/// Translucent bubbles rising with a small specular highlight
pub struct BubbleEffect;

impl BubbleEffect {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BubbleEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleEffect for BubbleEffect {
    fn name(&self) -> &str {
        "bubble"
    }

    fn description(&self) -> &str {
        "Pale cyan bubbles floating upward"
    }

    fn particle_count(&self) -> usize {
        20
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
            let py = wrap_coord(p.y - t * p.speed * 50.0, ctx.height);
            let px = wrap_coord(p.x + 15.0 * (t * 1.2 + p.phase).sin(), ctx.width);
            let radius = (p.size * 3.0 + 6.0) as i64;
            let alpha = (60.0 + 30.0 * (t * 2.0 + p.phase).sin()) as i64;

            fill_disc(overlay, px, py, radius, BUBBLE_COLOR, alpha_byte(alpha as f64));

            let hx = px - radius.div_euclid(3);
            let hy = py - radius.div_euclid(3);
            let highlight = (radius / 4).max(1);
            fill_disc(overlay, hx, hy, highlight, [255, 255, 255], alpha_byte(alpha as f64 * 1.5));
        }
    }
}
