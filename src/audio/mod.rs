//! # Background Audio
//!
//! Probes the background track and plans how it is fitted to the video:
//! speed change first, then looping, then an exact trim to the video length.
//! The samples themselves are never decoded here; the encoder reads the file.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reel_compositor::audio::{AudioLoader, AudioPlan};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let info = AudioLoader::probe("bgm.mp3").await?;
//! let plan = AudioPlan::new(info.path, info.duration, 1.1, 8.1);
//! println!("{} loop(s)", plan.loops());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod types;

pub use loader::AudioLoader;
pub use types::{AudioFormat, AudioInfo, AudioPlan};
