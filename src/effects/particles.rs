use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Size of the shared particle pool every effect draws from
pub const POOL_SIZE: usize = 60;

/// One seeded particle; all motion is derived from these fields and `t`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// Vertical speed factor in [0.3, 1.0)
    pub speed: f64,
    /// Base radius in [2, 8)
    pub size: f64,
    /// Phase offset in [0, 2π)
    pub phase: f64,
    /// Horizontal sway amplitude in [-30, 30)
    pub drift: f64,
}

/// The generator every effect pass starts from
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generate `count` particles spread over a `width`×`height` canvas
///
/// Fields are drawn in a fixed order so the same seed always yields the
/// same field, which keeps preview frames identical to the video frames.
pub fn generate_pool(rng: &mut StdRng, count: usize, width: u32, height: u32) -> Vec<Particle> {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;

    (0..count)
        .map(|_| Particle {
            x: rng.gen_range(0.0..w),
            y: rng.gen_range(0.0..h),
            speed: rng.gen_range(0.3..1.0),
            size: rng.gen_range(2.0..8.0),
            phase: rng.gen_range(0.0..TAU),
            drift: rng.gen_range(-30.0..30.0),
        })
        .collect()
}

/// Wrap a coordinate into `[0, extent)` so particles re-enter from the opposite edge
pub fn wrap_coord(value: f64, extent: u32) -> i64 {
    value.rem_euclid(extent.max(1) as f64) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_pool() {
        let a = generate_pool(&mut seeded_rng(7), POOL_SIZE, 1080, 1920);
        let b = generate_pool(&mut seeded_rng(7), POOL_SIZE, 1080, 1920);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_pool() {
        let a = generate_pool(&mut seeded_rng(7), POOL_SIZE, 1080, 1920);
        let b = generate_pool(&mut seeded_rng(8), POOL_SIZE, 1080, 1920);
        assert_ne!(a, b);
    }

    #[test]
    fn test_pool_ranges() {
        for p in generate_pool(&mut seeded_rng(1), 200, 300, 400) {
            assert!((0.0..300.0).contains(&p.x));
            assert!((0.0..400.0).contains(&p.y));
            assert!((0.3..1.0).contains(&p.speed));
            assert!((2.0..8.0).contains(&p.size));
            assert!((0.0..TAU).contains(&p.phase));
            assert!((-30.0..30.0).contains(&p.drift));
        }
    }

    #[test]
    fn test_wrap_coord() {
        assert_eq!(wrap_coord(-10.0, 100), 90);
        assert_eq!(wrap_coord(250.5, 100), 50);
        assert_eq!(wrap_coord(42.9, 100), 42);
    }
}
