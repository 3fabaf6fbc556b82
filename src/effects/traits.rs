use rand::rngs::StdRng;

use crate::effects::particles::{Particle, POOL_SIZE};
use crate::video::RasterSurface;

/// Frame-level inputs every particle effect sees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectContext {
    /// Seconds since the start of the clip
    pub t: f64,
    pub width: u32,
    pub height: u32,
    /// Full length of the clip the frame belongs to
    pub clip_duration: f64,
}

/// Core trait that all particle overlays implement
///
/// Effects are stateless: the overlay for a given `(seed, t)` is a pure
/// function of the particle pool and the context, so any frame can be
/// rendered in any order on any thread.
pub trait ParticleEffect: Send + Sync {
    /// Returns the unique name of this effect
    fn name(&self) -> &str;

    /// Returns a human-readable description of this effect
    fn description(&self) -> &str;

    /// How many particles of the shared pool this effect draws
    fn particle_count(&self) -> usize {
        POOL_SIZE
    }

    /// Draw this frame's particles onto a transparent `overlay`
    ///
    /// `rng` is the generator the pool was drawn from, positioned right after
    /// the pool. Effects that need extra randomness per frame (like colour
    /// jitter) draw from it so the result stays reproducible.
    fn draw(
        &self,
        overlay: &mut RasterSurface,
        particles: &[Particle],
        rng: &mut StdRng,
        ctx: &EffectContext,
    );
}
