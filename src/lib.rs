//! # Reel-Compositor
//!
//! Turn a handful of images into a short animated vertical promo video.
//!
//! Each image becomes a fixed-length segment: it slides, zooms or wipes in
//! over a background card, settles under a title and summary, and can carry
//! a procedural particle overlay. Segments are concatenated, rendered in
//! parallel and muxed with background music fitted to the video length.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use reel_compositor::{
//!     composition::{CompositionEngine, PageContent, RenderRequest},
//!     config::Config,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut engine = CompositionEngine::new(Config::default())?;
//! let summary = engine.compose(&RenderRequest {
//!     sources: vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()],
//!     content: PageContent {
//!         title: "Launch week|Day 3".to_string(),
//!         summary: "Everything we shipped today".to_string(),
//!         effect: "bokeh".to_string(),
//!     },
//!     audio: Some(PathBuf::from("bgm.mp3")),
//!     output: PathBuf::from("reel.mp4"),
//! }).await?;
//! println!("{} segments", summary.segments);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`animation`] - Entrance animation variants and easing
//! - [`text`] - Font loading, word wrapping and layered text overlays
//! - [`effects`] - Seeded particle overlays
//! - [`composition`] - Page layout, frame rendering, timeline and pipeline
//! - [`video`] - Raster surfaces, source loading and encoding
//! - [`audio`] - Background track probing and fitting
//! - [`config`] - Configuration management
//!
//! ## Creating Custom Effects
//!
//! You can add particle effects by implementing the
//! [`ParticleEffect`](effects::ParticleEffect) trait and registering it:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rand::rngs::StdRng;
//! use reel_compositor::effects::{EffectContext, EffectRegistry, Particle, ParticleEffect};
//! use reel_compositor::video::RasterSurface;
//!
//! struct Rain;
//!
//! impl ParticleEffect for Rain {
//!     fn name(&self) -> &str {
//!         "rain"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Thin blue streaks"
//!     }
//!
//!     fn draw(
//!         &self,
//!         overlay: &mut RasterSurface,
//!         particles: &[Particle],
//!         rng: &mut StdRng,
//!         ctx: &EffectContext,
//!     ) {
//!         // Your drawing code
//!     }
//! }
//!
//! let mut registry = EffectRegistry::new();
//! registry.register(Arc::new(Rain));
//! ```

pub mod animation;
pub mod audio;
pub mod composition;
pub mod config;
pub mod effects;
pub mod error;
pub mod text;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{CompositionEngine, RenderRequest},
    config::Config,
    effects::{EffectRegistry, ParticleEffect},
    error::{CompositorError, Result},
};
