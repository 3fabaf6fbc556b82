//! Helpers shared by the per-effect unit tests

use crate::effects::particles::{seeded_rng, Particle};
use crate::effects::traits::{EffectContext, ParticleEffect};
use crate::video::RasterSurface;

/// A slow particle with no sideways drift
pub fn particle(x: f64, y: f64, size: f64, phase: f64) -> Particle {
    Particle {
        x,
        y,
        speed: 1.0,
        size,
        phase,
        drift: 0.0,
    }
}

/// Draw `particles` onto a fresh transparent overlay at clip time `t`
pub fn draw_at(
    effect: &dyn ParticleEffect,
    particles: &[Particle],
    t: f64,
    (width, height): (u32, u32),
) -> RasterSurface {
    let mut overlay = RasterSurface::new_transparent(width, height);
    let ctx = EffectContext {
        t,
        width,
        height,
        clip_duration: 2.7,
    };
    effect.draw(&mut overlay, particles, &mut seeded_rng(7), &ctx);
    overlay
}

/// Every pixel with non-zero alpha, as `(x, y, rgba)`
pub fn painted(overlay: &RasterSurface) -> Vec<(u32, u32, [u8; 4])> {
    overlay
        .as_image()
        .enumerate_pixels()
        .filter(|(_, _, px)| px[3] > 0)
        .map(|(x, y, px)| (x, y, px.0))
        .collect()
}

/// Bounding box `[x0, y0, x1, y1]` of the painted pixels
pub fn ink_bounds(overlay: &RasterSurface) -> Option<[i64; 4]> {
    painted(overlay).iter().fold(None, |bounds, &(x, y, _)| {
        let (x, y) = (x as i64, y as i64);
        Some(match bounds {
            None => [x, y, x, y],
            Some([x0, y0, x1, y1]) => [x0.min(x), y0.min(y), x1.max(x), y1.max(y)],
        })
    })
}

/// Centre of the painted bounding box
pub fn ink_centre(overlay: &RasterSurface) -> Option<(i64, i64)> {
    ink_bounds(overlay).map(|[x0, y0, x1, y1]| ((x0 + x1) / 2, (y0 + y1) / 2))
}
