use std::sync::Arc;

use tracing::debug;

use crate::composition::paste::paste;
use crate::effects::particles::{generate_pool, seeded_rng, POOL_SIZE};
use crate::effects::registry::{canonical_name, EffectRegistry, NO_EFFECT};
use crate::effects::traits::{EffectContext, ParticleEffect};
use crate::error::{Result, TimelineError};
use crate::video::RasterSurface;

/// Draws seeded particle overlays on finished frames
#[derive(Clone)]
pub struct ParticleCompositor {
    registry: Arc<EffectRegistry>,
    max_particles: usize,
}

impl ParticleCompositor {
    pub fn new(registry: Arc<EffectRegistry>, max_particles: usize) -> Self {
        Self {
            registry,
            max_particles,
        }
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Pool size actually generated for each frame
    pub fn pool_size(&self) -> usize {
        POOL_SIZE.min(self.max_particles)
    }

    /// Reject unknown effect names before any frame is rendered
    pub fn validate_effect(&self, name: &str) -> Result<()> {
        if self.registry.is_known(name) {
            Ok(())
        } else {
            Err(TimelineError::InvalidParameters {
                details: format!(
                    "unknown effect '{}', expected none or one of {:?}",
                    name,
                    self.registry.available_effects()
                ),
            }
            .into())
        }
    }

    /// Composite `effect` over `frame` at clip time `t`
    ///
    /// `"none"` (and any name that slipped past validation) returns the frame
    /// untouched. The overlay depends only on `(seed, t)` and the frame size.
    pub fn apply(
        &self,
        frame: RasterSurface,
        t: f64,
        effect: &str,
        clip_duration: f64,
        seed: u64,
    ) -> RasterSurface {
        let Some(effect) = self.resolve(effect) else {
            return frame;
        };

        let (width, height) = frame.dimensions();
        let overlay = self.render_overlay(effect.as_ref(), width, height, t, clip_duration, seed);

        let mut frame = frame;
        paste(&mut frame, &overlay, 0, 0);
        frame
    }

    fn resolve(&self, name: &str) -> Option<Arc<dyn ParticleEffect>> {
        let canonical = canonical_name(name);
        if canonical == NO_EFFECT {
            return None;
        }
        let effect = self.registry.get_effect(&canonical);
        if effect.is_none() {
            debug!("Unknown effect '{}' treated as none", name);
        }
        effect
    }

    fn render_overlay(
        &self,
        effect: &dyn ParticleEffect,
        width: u32,
        height: u32,
        t: f64,
        clip_duration: f64,
        seed: u64,
    ) -> RasterSurface {
        let mut rng = seeded_rng(seed);
        let pool = generate_pool(&mut rng, self.pool_size(), width, height);
        let count = effect.particle_count().min(pool.len());

        let ctx = EffectContext {
            t,
            width,
            height,
            clip_duration,
        };

        let mut overlay = RasterSurface::new_transparent(width, height);
        effect.draw(&mut overlay, &pool[..count], &mut rng, &ctx);
        overlay
    }
}
