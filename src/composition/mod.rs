//! # Composition Engine
//!
//! Lays sources out as timed segments and drives a request from source
//! references to an encoded video. Each frame is a pure function of its
//! segment and local time, so frames render in any order and in parallel.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use reel_compositor::composition::{CompositionEngine, PageContent, RenderRequest};
//! use reel_compositor::config::Config;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut engine = CompositionEngine::new(Config::default())?;
//! let request = RenderRequest {
//!     sources: vec![PathBuf::from("01.jpg"), PathBuf::from("02.jpg")],
//!     content: PageContent {
//!         title: "Weekly digest|Issue 12".to_string(),
//!         summary: "Three stories worth your time".to_string(),
//!         effect: "sparkle".to_string(),
//!     },
//!     audio: Some(PathBuf::from("bgm.mp3")),
//!     output: PathBuf::from("out/reel.mp4"),
//! };
//! engine.compose(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod frame;
pub mod layout;
pub mod paste;
pub mod timeline;

// Re-exports for convenience
pub use engine::{CompositionEngine, PipelineStage, RenderRequest, RenderSummary};
pub use frame::render_frame;
pub use layout::{gradient_background, split_title, LayoutMode, PageLayout, TextLayer};
pub use paste::{paste, paste_with_opacity};
pub use timeline::{assign_variants, PageContent, Segment, Timeline, TimelineAssembler};
