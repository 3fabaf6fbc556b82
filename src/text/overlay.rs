use crate::text::font::GlyphMask;
use crate::text::layout::TextBlock;
use crate::video::RasterSurface;

/// Backdrop band color behind every text block
pub const BACKDROP_COLOR: [u8; 3] = [20, 20, 40];
/// Peak backdrop alpha (~86% opacity)
pub const BACKDROP_ALPHA: f32 = 220.0;
/// Fraction of the band height over which each edge fades in
const BACKDROP_FADE: f32 = 0.1;
/// Band starts this far above the first line
const BAND_TOP_PAD: i64 = 25;
/// Band is this much taller than the text it holds
const BAND_EXTRA_HEIGHT: i64 = 40;

const GLOW_RADIUS: i64 = 3;
const GLOW_PEAK_ALPHA: f32 = 50.0;

const SHADOW_FAR: (i64, i64, [u8; 3]) = (3, 3, [0, 0, 0]);
const SHADOW_NEAR: (i64, i64, [u8; 3]) = (1, 1, [10, 10, 30]);

/// Left end of the accent underline gradient
pub const ACCENT_START: [u8; 3] = [255, 244, 214];
const ACCENT_ROW_ALPHAS: [f32; 3] = [180.0, 130.0, 80.0];

/// Horizontal frame the text is laid out in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextColumn {
    pub canvas_width: u32,
    pub margin: u32,
    pub text_width: u32,
}

impl TextColumn {
    /// A column with `margin_ratio` of the canvas width as margin on each side
    pub fn with_margin_ratio(canvas_width: u32, margin_ratio: f64) -> Self {
        let margin = (canvas_width as f64 * margin_ratio) as u32;
        Self {
            canvas_width,
            margin,
            text_width: canvas_width.saturating_sub(2 * margin),
        }
    }
}

/// Draw a text block with its translucent backdrop starting at `start_y`
///
/// Returns the block height so callers can stack title, subtitle and
/// summary without overlap.
pub fn draw_text_block(
    surface: &mut RasterSurface,
    block: &TextBlock,
    start_y: i64,
    column: &TextColumn,
) -> u32 {
    let block_height = block.height();
    let band_y = start_y - BAND_TOP_PAD;
    let band_height = block_height as i64 + BAND_EXTRA_HEIGHT;

    draw_backdrop(surface, band_y, band_height, column.canvas_width);

    let style = block.style();
    let mut line_y = start_y;

    for line in block.lines() {
        let x = column.margin as i64 + (column.text_width as i64 - line.width as i64).div_euclid(2);

        if let Some(glow) = style.glow {
            for dx in -GLOW_RADIUS..=GLOW_RADIUS {
                for dy in -GLOW_RADIUS..=GLOW_RADIUS {
                    let d2 = (dx * dx + dy * dy) as f32;
                    let r2 = (GLOW_RADIUS * GLOW_RADIUS) as f32;
                    if d2 > r2 {
                        continue;
                    }
                    let alpha = GLOW_PEAK_ALPHA * (1.0 - d2 / r2) / 255.0;
                    stamp(surface, &line.mask, x + dx, line_y + dy, glow, alpha);
                }
            }
        }

        for (dx, dy, color) in [SHADOW_FAR, SHADOW_NEAR] {
            stamp(surface, &line.mask, x + dx, line_y + dy, color, 1.0);
        }
        stamp(surface, &line.mask, x, line_y, style.fill, 1.0);

        line_y += (block.line_height() + style.line_spacing) as i64;
    }

    if let Some(glow) = style.glow {
        draw_accent_bar(surface, band_y + band_height - 4, column, glow);
    }

    block_height
}

/// Alpha profile of the backdrop at row `i` of a band `height` rows tall
pub fn backdrop_alpha(i: i64, height: i64) -> f32 {
    if height <= 0 {
        return 0.0;
    }
    let p = i as f32 / height as f32;
    let edge = p.min(1.0 - p);
    if edge < BACKDROP_FADE {
        BACKDROP_ALPHA * (edge / BACKDROP_FADE)
    } else {
        BACKDROP_ALPHA
    }
}

fn draw_backdrop(surface: &mut RasterSurface, band_y: i64, band_height: i64, canvas_width: u32) {
    let width = (canvas_width as i64).min(surface.width() as i64);
    for i in 0..band_height {
        let y = band_y + i;
        if y < 0 || y >= surface.height() as i64 {
            continue;
        }
        let alpha = backdrop_alpha(i, band_height) / 255.0;
        for x in 0..width {
            surface.blend_pixel(x, y, BACKDROP_COLOR, alpha);
        }
    }
}

fn draw_accent_bar(surface: &mut RasterSurface, accent_y: i64, column: &TextColumn, glow: [u8; 3]) {
    let start = column.margin as i64;
    let end = column.canvas_width as i64 - column.margin as i64;
    let span = (column.canvas_width as i64 - 2 * column.margin as i64).max(1) as f32;

    for (row, row_alpha) in ACCENT_ROW_ALPHAS.iter().enumerate() {
        for px in start..end {
            let progress = (px - start) as f32 / span;
            let color = lerp_color(ACCENT_START, glow, progress);
            surface.blend_pixel(px, accent_y + row as i64, color, row_alpha / 255.0);
        }
    }
}

fn lerp_color(from: [u8; 3], to: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = (from[c] as f32 * (1.0 - t) + to[c] as f32 * t) as u8;
    }
    out
}

/// Stamp a glyph mask at pen origin `(x, y)` in a solid color
fn stamp(
    surface: &mut RasterSurface,
    mask: &GlyphMask,
    x: i64,
    y: i64,
    color: [u8; 3],
    alpha: f32,
) {
    for (mx, my, coverage) in mask.covered() {
        surface.blend_pixel(x + mx, y + my, color, coverage as f32 / 255.0 * alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FontFace, TextStyle};

    fn column() -> TextColumn {
        TextColumn::with_margin_ratio(400, 0.08)
    }

    #[test]
    fn test_backdrop_tapers_at_edges() {
        assert_eq!(backdrop_alpha(0, 100), 0.0);
        assert!((backdrop_alpha(5, 100) - 110.0).abs() < 1e-3);
        assert_eq!(backdrop_alpha(50, 100), BACKDROP_ALPHA);
        assert!(backdrop_alpha(97, 100) < BACKDROP_ALPHA);
    }

    #[test]
    fn test_column_margins() {
        let col = column();
        assert_eq!(col.margin, 32);
        assert_eq!(col.text_width, 336);
    }

    #[test]
    fn test_draw_returns_block_height_and_darkens_band() {
        let face = FontFace::embedded(32.0);
        let block = TextBlock::layout("Hello", &face, 336, TextStyle::SUMMARY);
        let mut surface = RasterSurface::new_filled(400, 300, [200, 200, 200]);

        let height = draw_text_block(&mut surface, &block, 100, &column());
        assert_eq!(height, block.height());

        // middle of the band, far left: only the backdrop is there
        let mid_y = (100 - 25 + (height as i64 + 40) / 2) as u32;
        let px = surface.get_pixel(0, mid_y);
        assert!(px[0] < 60, "backdrop should darken the background, got {:?}", px);

        // well above the band is untouched
        assert_eq!(surface.get_pixel(0, 10), [200, 200, 200, 255]);
    }

    #[test]
    fn test_text_is_drawn_in_fill_color() {
        let face = FontFace::embedded(40.0);
        let block = TextBlock::layout("I", &face, 336, TextStyle::SUMMARY);
        let mut surface = RasterSurface::new_filled(400, 300, [0, 0, 0]);

        draw_text_block(&mut surface, &block, 100, &column());

        let brightest = surface
            .as_image()
            .pixels()
            .map(|p| p[0])
            .max()
            .unwrap();
        assert!(brightest >= 250, "brightest channel was {}", brightest);
    }

    #[test]
    fn test_glow_adds_accent_bar() {
        let face = FontFace::embedded(32.0);
        let block = TextBlock::layout("Title", &face, 336, TextStyle::TITLE);
        let mut surface = RasterSurface::new_filled(400, 300, [0, 0, 0]);

        let height = draw_text_block(&mut surface, &block, 100, &column()) as i64;
        let accent_y = (100 - 25 + height + 40 - 4) as u32;

        let left = surface.get_pixel(33, accent_y);
        let right = surface.get_pixel(366, accent_y);
        // warm white on the left, shading toward the blue glow on the right
        assert!(left[0] > right[0]);
        assert!(right[2] > 100);
    }
}
