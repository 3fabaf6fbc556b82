//! # Text Layout and Overlay
//!
//! Word-aware wrapping against real font metrics, and the layered (glow,
//! shadow, fill) text blocks drawn over a soft-edged backdrop band.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use reel_compositor::text::{draw_text_block, FontFace, TextBlock, TextColumn, TextStyle};
//! use reel_compositor::video::RasterSurface;
//!
//! let font = FontFace::embedded(66.0);
//! let column = TextColumn::with_margin_ratio(1080, 0.08);
//! let block = TextBlock::layout("Weekly AI digest", &font, column.text_width, TextStyle::TITLE);
//!
//! let mut frame = RasterSurface::new_filled(1080, 1920, [102, 126, 234]);
//! let height = draw_text_block(&mut frame, &block, 192, &column);
//! ```

pub mod font;
pub mod layout;
pub mod overlay;

pub use font::{FontFace, FontSet, GlyphMask};
pub use layout::{tokenize, wrap, RenderedLine, TextBlock, TextMeasure, TextStyle};
pub use overlay::{draw_text_block, TextColumn};
