//! # Video Module
//!
//! Raster surfaces, media sources (stills and frame sequences) and the
//! ffmpeg-backed encoder that turns rendered frames into a video file.

pub mod encoder;
pub mod loader;
pub mod types;

pub use encoder::{EncodedVideo, FrameEncoder};
pub use loader::{FileSourceResolver, ResolvedSource, SourceResolver};
pub use types::{MediaSource, RasterSurface, VideoParams};
