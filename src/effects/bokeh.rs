use rand::rngs::StdRng;

use crate::effects::draw::{alpha_byte, fill_disc};
use crate::effects::particles::{wrap_coord, Particle};
use crate::effects::traits::{EffectContext, ParticleEffect};
use crate::video::RasterSurface;

const PALETTE: [[u8; 3]; 4] = [
    [255, 200, 100],
    [200, 150, 255],
    [150, 220, 255],
    [255, 180, 200],
];

/// Large, faint out-of-focus light spots looping in place
pub struct BokehEffect;

impl BokehEffect {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BokehEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleEffect for BokehEffect {
    fn name(&self) -> &str {
        "bokeh"
    }

    fn description(&self) -> &str {
        "Soft pastel light spots breathing in the background"
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

        for (i, p) in particles.iter().enumerate() {
            let px = wrap_coord(p.x + 15.0 * (t * 0.8 + p.phase).sin(), ctx.width);
            let py = wrap_coord(p.y + 10.0 * (t * 0.6 + p.phase).cos(), ctx.height);
            let radius = (p.size * 4.0 + 8.0) as i64;
            let flicker = 0.4 + 0.6 * (t * 2.0 + p.phase).sin();
            let alpha = alpha_byte(50.0 * flicker);

            fill_disc(overlay, px, py, radius, PALETTE[i % PALETTE.len()], alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::test_support::{draw_at, ink_centre, painted, particle};
    use std::f64::consts::FRAC_PI_4;

    const CANVAS: (u32, u32) = (200, 200);

    #[test]
    fn test_spots_take_palette_colors_in_order() {
        let spots = [
            particle(50.0, 50.0, 4.0, FRAC_PI_4),
            particle(150.0, 150.0, 4.0, FRAC_PI_4),
        ];
        let overlay = draw_at(&BokehEffect::new(), &spots, 0.0, CANVAS);

        let pixels = painted(&overlay);
        assert!(pixels.iter().any(|&(x, _, _)| x < 100));
        assert!(pixels.iter().any(|&(x, _, _)| x >= 100));
        for (x, _, px) in pixels {
            let expected = if x < 100 { PALETTE[0] } else { PALETTE[1] };
            assert_eq!(&px[..3], &expected);
            assert!(px[3] > 0 && px[3] <= 50, "alpha {}", px[3]);
        }
    }

    #[test]
    fn test_spots_hover_near_home() {
        let spot = [particle(100.0, 100.0, 4.0, 0.0)];
        for step in 0..200 {
            let overlay = draw_at(&BokehEffect::new(), &spot, step as f64 * 0.1, CANVAS);
            if let Some((cx, cy)) = ink_centre(&overlay) {
                assert!((cx - 100).abs() <= 15 && (cy - 100).abs() <= 10, "({}, {})", cx, cy);
            }
        }
    }

    #[test]
    fn test_spot_wraps_to_the_left_edge() {
        // home x 195 plus 15 sin(π/4) lands at 205, which is x 5
        let spot = [particle(195.0, 50.0, 4.0, FRAC_PI_4)];
        let overlay = draw_at(&BokehEffect::new(), &spot, 0.0, CANVAS);
        assert!(overlay.get_pixel(5, 57)[3] > 0);
        assert!(painted(&overlay).iter().all(|&(x, _, _)| x <= 29));
    }

    #[test]
    fn test_draws_twenty_spots() {
        assert_eq!(BokehEffect::new().particle_count(), 20);
    }
}
