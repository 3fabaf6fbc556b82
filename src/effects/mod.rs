//! # Particle Effects
//!
//! Procedural overlays drawn from a seeded particle pool. Every effect is a
//! closed-form function of time, so a frame can be rendered without knowing
//! any previous frame.
//!
//! ## Built-in Effects
//!
//! - **sparkle** (alias `gold_sparkle`): flickering gold dust with star glints
//! - **snowfall**: white flakes falling and swaying
//! - **bokeh**: large faint pastel light spots
//! - **firefly**: warm pulsing specks with a halo
//! - **bubble**: pale cyan bubbles rising
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reel_compositor::effects::{EffectRegistry, ParticleCompositor};
//! use reel_compositor::video::RasterSurface;
//!
//! let compositor = ParticleCompositor::new(Arc::new(EffectRegistry::new()), 60);
//! let frame = RasterSurface::new_filled(1080, 1920, [0, 0, 0]);
//! let frame = compositor.apply(frame, 1.25, "sparkle", 2.7, 7);
//! ```

pub mod compositor;
pub mod draw;
pub mod particles;
pub mod registry;
pub mod traits;

pub mod bokeh;
pub mod bubble;
pub mod firefly;
pub mod snowfall;
pub mod sparkle;

#[cfg(test)]
pub(crate) mod test_support;

pub use compositor::ParticleCompositor;
pub use particles::{generate_pool, Particle, POOL_SIZE};
pub use registry::{canonical_name, EffectRegistry, NO_EFFECT};
pub use traits::{EffectContext, ParticleEffect};

pub use bokeh::BokehEffect;
pub use bubble::BubbleEffect;
pub use firefly::FireflyEffect;
pub use snowfall::SnowfallEffect;
pub use sparkle::SparkleEffect;
