use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use fontdue::{Font, FontSettings};
use tracing::{debug, warn};

use crate::config::TextConfig;
use crate::error::FontError;
use crate::text::layout::TextMeasure;

/// Built-in fallback face, used whenever a configured font can't be loaded
static DEFAULT_FONT: OnceLock<Arc<Font>> = OnceLock::new();

fn default_font() -> Arc<Font> {
    DEFAULT_FONT
        .get_or_init(|| {
            let font = Font::from_bytes(
                include_bytes!("../../assets/fonts/DejaVuSans.ttf") as &[u8],
                FontSettings::default(),
            )
            .expect("embedded DejaVuSans.ttf must be a valid font");
            Arc::new(font)
        })
        .clone()
}

fn read_font(path: &Path) -> Result<Font, FontError> {
    let data = std::fs::read(path).map_err(|_| FontError::Unavailable {
        path: path.display().to_string(),
    })?;
    Font::from_bytes(data, FontSettings::default()).map_err(|reason| FontError::ParseFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    })
}

/// A font at a fixed pixel size, with optional fallback faces
///
/// Each character is drawn from the first face that has a glyph for it,
/// starting with the primary font. Cloning is cheap: parsed fonts are
/// shared behind an `Arc` and are read-only for the lifetime of a render.
#[derive(Clone)]
pub struct FontFace {
    font: Arc<Font>,
    fallbacks: Vec<Arc<Font>>,
    size: f32,
    name: String,
    coverage_warned: Arc<AtomicBool>,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("fallbacks", &self.fallbacks.len())
            .finish()
    }
}

impl FontFace {
    /// The embedded DejaVu Sans face at `size` pixels
    pub fn embedded(size: f32) -> Self {
        assert!(size > 0.0, "font size must be positive, got {}", size);
        Self::with_font(default_font(), size, "DejaVuSans (embedded)".to_string())
    }

    fn with_font(font: Arc<Font>, size: f32, name: String) -> Self {
        Self {
            font,
            fallbacks: Vec::new(),
            size,
            name,
            coverage_warned: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Load a TrueType/OpenType font from disk
    pub fn from_file<P: AsRef<Path>>(path: P, size: f32) -> Result<Self, FontError> {
        assert!(size > 0.0, "font size must be positive, got {}", size);
        let path = path.as_ref();
        let font = read_font(path)?;
        Ok(Self::with_font(Arc::new(font), size, path.display().to_string()))
    }

    /// Append the fonts of `faces` as fallbacks, tried in order
    pub fn with_fallbacks(mut self, faces: &[FontFace]) -> Self {
        self.fallbacks.extend(faces.iter().map(|face| face.font.clone()));
        self
    }

    fn with_fallback_fonts(mut self, fonts: &[Arc<Font>]) -> Self {
        self.fallbacks.extend(fonts.iter().cloned());
        self
    }

    /// Whether any loaded face has a glyph for `ch`
    ///
    /// Whitespace and control characters never need one.
    pub fn covers(&self, ch: char) -> bool {
        ch.is_whitespace()
            || ch.is_control()
            || std::iter::once(&self.font)
                .chain(&self.fallbacks)
                .any(|font| font.lookup_glyph_index(ch) != 0)
    }

    /// Characters of `text` no loaded face can draw, in first-seen order
    pub fn missing_glyphs(&self, text: &str) -> Vec<char> {
        let mut missing: Vec<char> = Vec::new();
        for ch in text.chars() {
            if !self.covers(ch) && !missing.contains(&ch) {
                missing.push(ch);
            }
        }
        missing
    }

    /// The face a character is drawn from; the primary when none covers it
    fn face_for(&self, ch: char) -> &Arc<Font> {
        if self.font.lookup_glyph_index(ch) != 0 {
            return &self.font;
        }
        self.fallbacks
            .iter()
            .find(|font| font.lookup_glyph_index(ch) != 0)
            .unwrap_or(&self.font)
    }

    /// Load `path` if given, otherwise (or on failure) use the embedded face
    pub fn load_or_default(path: Option<&Path>, size: f32) -> Self {
        match path {
            Some(path) => match Self::from_file(path, size) {
                Ok(face) => {
                    debug!("Loaded font {} at {}px", face.name, size);
                    face
                }
                Err(e) => {
                    warn!("{}; falling back to embedded font", e);
                    Self::embedded(size)
                }
            },
            None => Self::embedded(size),
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ascent above the baseline, in pixels
    fn ascent(&self) -> f32 {
        self.font
            .horizontal_line_metrics(self.size)
            .map(|m| m.ascent)
            .unwrap_or(self.size * 0.8)
    }

    /// Rasterize one line of text into a coverage mask
    ///
    /// The mask's origin is expressed relative to the line's top-left pen
    /// position so glyph overhang on either side is kept. Characters no face
    /// covers come out as the primary font's missing-glyph box.
    pub fn rasterize_line(&self, text: &str) -> GlyphMask {
        let missing = self.missing_glyphs(text);
        if !missing.is_empty() && !self.coverage_warned.swap(true, Ordering::Relaxed) {
            warn!(
                "Font {} has no glyph for {:?} in {:?}; add a covering face to text.fallback_fonts",
                self.name, missing, text
            );
        }

        let baseline = self.ascent().round() as i64;
        let mut glyphs = Vec::new();
        let mut pen_x = 0.0f32;

        for ch in text.chars() {
            let (metrics, bitmap) = self.face_for(ch).rasterize(ch, self.size);
            if metrics.width > 0 && metrics.height > 0 {
                let gx = pen_x.round() as i64 + metrics.xmin as i64;
                let gy = baseline - (metrics.height as i64 + metrics.ymin as i64);
                glyphs.push((gx, gy, metrics.width, metrics.height, bitmap));
            }
            pen_x += metrics.advance_width;
        }

        if glyphs.is_empty() {
            return GlyphMask::empty();
        }

        let min_x = glyphs.iter().map(|g| g.0).min().unwrap_or(0);
        let min_y = glyphs.iter().map(|g| g.1).min().unwrap_or(0);
        let max_x = glyphs.iter().map(|g| g.0 + g.2 as i64).max().unwrap_or(0);
        let max_y = glyphs.iter().map(|g| g.1 + g.3 as i64).max().unwrap_or(0);

        let width = (max_x - min_x) as u32;
        let height = (max_y - min_y) as u32;
        let mut coverage = vec![0u8; width as usize * height as usize];

        for (gx, gy, gw, gh, bitmap) in &glyphs {
            for row in 0..*gh {
                for col in 0..*gw {
                    let value = bitmap[row * gw + col];
                    if value == 0 {
                        continue;
                    }
                    let mx = (gx - min_x) as usize + col;
                    let my = (gy - min_y) as usize + row;
                    let idx = my * width as usize + mx;
                    coverage[idx] = coverage[idx].max(value);
                }
            }
        }

        GlyphMask {
            offset_x: min_x,
            offset_y: min_y,
            width,
            height,
            coverage,
        }
    }
}

impl TextMeasure for FontFace {
    fn text_width(&self, text: &str) -> f32 {
        text.chars()
            .map(|ch| self.face_for(ch).metrics(ch, self.size).advance_width)
            .sum()
    }

    fn line_height(&self) -> f32 {
        match self.font.horizontal_line_metrics(self.size) {
            Some(m) => m.ascent - m.descent,
            None => self.size * 1.2,
        }
    }
}

/// Anti-aliased coverage of a rasterized line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMask {
    /// Offset of the mask's top-left corner from the line's pen origin
    pub offset_x: i64,
    pub offset_y: i64,
    pub width: u32,
    pub height: u32,
    pub coverage: Vec<u8>,
}

impl GlyphMask {
    pub fn empty() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            width: 0,
            height: 0,
            coverage: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.coverage.iter().all(|&c| c == 0)
    }

    /// Iterate `(x, y, coverage)` for every covered pixel, relative to the pen origin
    pub fn covered(&self) -> impl Iterator<Item = (i64, i64, u8)> + '_ {
        let width = self.width.max(1) as usize;
        self.coverage
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(move |(i, &c)| {
                (
                    self.offset_x + (i % width) as i64,
                    self.offset_y + (i / width) as i64,
                    c,
                )
            })
    }
}

/// The three faces a page uses
#[derive(Debug, Clone)]
pub struct FontSet {
    pub title: FontFace,
    pub subtitle: FontFace,
    pub summary: FontFace,
}

impl FontSet {
    /// Load the configured faces, falling back per role to the embedded font
    ///
    /// Every role shares the `fallback_fonts` that could be loaded.
    pub fn load(config: &TextConfig) -> Self {
        let fallbacks = load_fallbacks(&config.fallback_fonts);
        let role = |path: Option<&Path>, size: f32| {
            FontFace::load_or_default(path, size).with_fallback_fonts(&fallbacks)
        };

        Self {
            title: role(config.title_font.as_deref(), config.title_size),
            subtitle: role(
                config.subtitle_font.as_deref().or(config.title_font.as_deref()),
                config.subtitle_size,
            ),
            summary: role(config.summary_font.as_deref(), config.summary_size),
        }
    }
}

/// Parse the fallback list, skipping entries that are absent on this system
fn load_fallbacks(paths: &[PathBuf]) -> Vec<Arc<Font>> {
    paths
        .iter()
        .filter_map(|path| match read_font(path) {
            Ok(font) => {
                debug!("Loaded fallback font {}", path.display());
                Some(Arc::new(font))
            }
            Err(FontError::Unavailable { .. }) => {
                debug!("Fallback font {} not present", path.display());
                None
            }
            Err(e) => {
                warn!("{}; skipping fallback font", e);
                None
            }
        })
        .collect()
}
