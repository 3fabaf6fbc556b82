//! Page layout: where the text blocks sit and where each foreground settles.
//!
//! Two layouts are supported. `Article` is a portrait news card with a title
//! stack at the top, a summary at the bottom and the image scaled to fit
//! between them. `Showcase` sizes the canvas to the largest source and shows
//! every image at native size on black, with an optional title.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::animation::Placement;
use crate::text::{draw_text_block, FontSet, TextBlock, TextColumn, TextStyle};
use crate::video::RasterSurface;

/// Gap between the main title and the subtitle
pub const SUBTITLE_GAP: i64 = 12;
/// Clearance between the title stack and the image
const IMAGE_TOP_GAP: i64 = 30;
/// Clearance between the image and the summary
const IMAGE_BOTTOM_GAP: i64 = 40;

const ARTICLE_TITLE_TOP: f64 = 0.10;
const ARTICLE_SUMMARY_BOTTOM: f64 = 0.90;
const ARTICLE_MAX_IMAGE_HEIGHT: f64 = 0.60;
const SHOWCASE_TITLE_TOP: f64 = 0.03;

/// Default background gradient endpoints, top to bottom
pub const GRADIENT_TOP: [u8; 3] = [102, 126, 234];
pub const GRADIENT_BOTTOM: [u8; 3] = [118, 75, 162];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Article,
    Showcase,
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Article => write!(f, "article"),
            LayoutMode::Showcase => write!(f, "showcase"),
        }
    }
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" => Ok(LayoutMode::Article),
            "showcase" => Ok(LayoutMode::Showcase),
            other => Err(format!("unknown layout '{}', expected article or showcase", other)),
        }
    }
}

/// Split `"main|sub"` into its trimmed halves; only the first `|` counts
pub fn split_title(title: &str) -> (String, String) {
    match title.split_once('|') {
        Some((main, sub)) => (main.trim().to_string(), sub.trim().to_string()),
        None => (title.trim().to_string(), String::new()),
    }
}

/// The pre-laid-out text of a page, shared by every frame of every segment
#[derive(Debug, Clone)]
pub struct TextLayer {
    pub title: Option<TextBlock>,
    pub subtitle: Option<TextBlock>,
    pub summary: Option<TextBlock>,
    pub title_y: i64,
    pub summary_y: i64,
    pub column: TextColumn,
}

impl TextLayer {
    /// A layer that draws nothing
    pub fn empty(canvas_width: u32) -> Self {
        Self {
            title: None,
            subtitle: None,
            summary: None,
            title_y: 0,
            summary_y: 0,
            column: TextColumn::with_margin_ratio(canvas_width, 0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.subtitle.is_none() && self.summary.is_none()
    }

    fn main_height(&self) -> i64 {
        self.title.as_ref().map_or(0, |b| b.height() as i64)
    }

    /// Height of the main title plus, when present, the gap and the subtitle
    pub fn title_height(&self) -> i64 {
        let sub = self.subtitle.as_ref().map_or(0, |b| b.height() as i64);
        if sub > 0 {
            self.main_height() + sub + SUBTITLE_GAP
        } else {
            self.main_height()
        }
    }

    /// The subtitle stacks directly below the main title
    pub fn subtitle_y(&self) -> i64 {
        self.title_y + self.main_height() + SUBTITLE_GAP
    }

    /// Draw title, subtitle and summary in that order
    pub fn draw(&self, surface: &mut RasterSurface) {
        if let Some(title) = &self.title {
            draw_text_block(surface, title, self.title_y, &self.column);
        }
        if let Some(subtitle) = &self.subtitle {
            draw_text_block(surface, subtitle, self.subtitle_y(), &self.column);
        }
        if let Some(summary) = &self.summary {
            draw_text_block(surface, summary, self.summary_y, &self.column);
        }
    }
}

fn block(
    text: &str,
    face: &crate::text::FontFace,
    width: u32,
    style: TextStyle,
) -> Option<TextBlock> {
    if text.trim().is_empty() {
        return None;
    }
    let block = TextBlock::layout(text, face, width, style);
    (!block.is_empty()).then_some(block)
}

/// Canvas geometry plus text positions for one render request
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub mode: LayoutMode,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub text: TextLayer,
}

impl PageLayout {
    /// Portrait article card: title near the top, summary ending at 90 %
    ///
    /// # Panics
    ///
    /// Panics on a zero-sized canvas.
    pub fn article(
        canvas: (u32, u32),
        title: &str,
        summary: &str,
        fonts: &FontSet,
        margin_ratio: f64,
    ) -> Self {
        let (width, height) = canvas;
        assert!(width > 0 && height > 0, "canvas must not be empty");

        let column = TextColumn::with_margin_ratio(width, margin_ratio);
        let text_width = column.text_width.max(1);
        let (main, sub) = split_title(title);

        let summary = block(summary, &fonts.summary, text_width, TextStyle::SUMMARY);
        let summary_height = summary.as_ref().map_or(0, |b| b.height() as i64);

        let text = TextLayer {
            title: block(&main, &fonts.title, text_width, TextStyle::TITLE),
            subtitle: block(&sub, &fonts.subtitle, text_width, TextStyle::SUBTITLE),
            summary,
            title_y: (height as f64 * ARTICLE_TITLE_TOP) as i64,
            summary_y: (height as f64 * ARTICLE_SUMMARY_BOTTOM) as i64 - summary_height,
            column,
        };

        Self {
            mode: LayoutMode::Article,
            canvas_width: width,
            canvas_height: height,
            text,
        }
    }

    /// Black canvas sized to the sources, title near the top, no summary
    ///
    /// # Panics
    ///
    /// Panics on a zero-sized canvas.
    pub fn showcase(canvas: (u32, u32), title: &str, fonts: &FontSet, margin_ratio: f64) -> Self {
        let (width, height) = canvas;
        assert!(width > 0 && height > 0, "canvas must not be empty");

        let column = TextColumn::with_margin_ratio(width, margin_ratio);
        let text_width = column.text_width.max(1);
        let (main, sub) = split_title(title);

        let text = TextLayer {
            title: block(&main, &fonts.title, text_width, TextStyle::TITLE),
            subtitle: block(&sub, &fonts.subtitle, text_width, TextStyle::SUBTITLE),
            summary: None,
            title_y: (height as f64 * SHOWCASE_TITLE_TOP) as i64,
            summary_y: height as i64,
            column,
        };

        Self {
            mode: LayoutMode::Showcase,
            canvas_width: width,
            canvas_height: height,
            text,
        }
    }

    /// Showcase canvas: the largest source extent, rounded up to even sizes
    pub fn showcase_canvas<I>(sizes: I) -> Option<(u32, u32)>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let (w, h) = sizes
            .into_iter()
            .fold((0u32, 0u32), |(mw, mh), (w, h)| (mw.max(w), mh.max(h)));
        if w == 0 || h == 0 {
            return None;
        }
        Some((w + w % 2, h + h % 2))
    }

    pub fn canvas(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Size a source of `source` pixels will be scaled to before animating
    pub fn target_size(&self, source: (u32, u32)) -> (u32, u32) {
        let (sw, sh) = (source.0.max(1), source.1.max(1));
        match self.mode {
            LayoutMode::Showcase => (sw, sh),
            LayoutMode::Article => {
                let mut tw = self.canvas_width;
                let mut th = (sh as f64 * tw as f64 / sw as f64) as u32;
                let max_h = (self.canvas_height as f64 * ARTICLE_MAX_IMAGE_HEIGHT) as u32;
                if th > max_h {
                    th = max_h;
                    tw = (sw as f64 * th as f64 / sh as f64) as u32;
                }
                (tw.max(1), th.max(1))
            }
        }
    }

    /// Final resting place of a foreground already scaled to `target`
    pub fn place(&self, target: (u32, u32)) -> Placement {
        let (tw, th) = target;
        let (cw, ch) = (self.canvas_width as i64, self.canvas_height as i64);
        let x = (cw - tw as i64).div_euclid(2);

        let y = match self.mode {
            LayoutMode::Showcase => (ch - th as i64).div_euclid(2),
            LayoutMode::Article => {
                let top = self.text.title_y + self.text.title_height() + IMAGE_TOP_GAP;
                let available = self.text.summary_y - IMAGE_BOTTOM_GAP - top;
                (top + (available - th as i64).div_euclid(2)).max(top)
            }
        };

        Placement {
            x,
            y,
            target_width: tw,
            target_height: th,
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
        }
    }

    /// Background used when no template is configured
    pub fn default_background(&self) -> RasterSurface {
        match self.mode {
            LayoutMode::Showcase => {
                RasterSurface::new_filled(self.canvas_width, self.canvas_height, [0, 0, 0])
            }
            LayoutMode::Article => gradient_background(self.canvas_width, self.canvas_height),
        }
    }
}

/// Vertical violet gradient used as the article background
pub fn gradient_background(width: u32, height: u32) -> RasterSurface {
    let mut surface = RasterSurface::new_filled(width, height, GRADIENT_TOP);
    let h = height.max(1) as f64;
    for y in 0..height {
        let p = y as f64 / h;
        let mut color = [0u8; 4];
        for c in 0..3 {
            let from = GRADIENT_TOP[c] as f64;
            let to = GRADIENT_BOTTOM[c] as f64;
            color[c] = (from + (to - from) * p) as u8;
        }
        color[3] = 255;
        for x in 0..width {
            surface.set_pixel(x, y, color);
        }
    }
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FontFace;

    fn fonts() -> FontSet {
        FontSet {
            title: FontFace::embedded(66.0),
            subtitle: FontFace::embedded(58.0),
            summary: FontFace::embedded(48.0),
        }
    }

    #[test]
    fn test_split_title() {
        assert_eq!(split_title("A|B"), ("A".to_string(), "B".to_string()));
        assert_eq!(
            split_title(" Main | Sub | more "),
            ("Main".to_string(), "Sub | more".to_string())
        );
        assert_eq!(split_title("Only"), ("Only".to_string(), String::new()));
    }

    #[test]
    fn test_layout_mode_parse() {
        assert_eq!("Showcase".parse::<LayoutMode>().unwrap(), LayoutMode::Showcase);
        assert!("grid".parse::<LayoutMode>().is_err());
    }

    #[test]
    fn test_article_text_positions() {
        let page = PageLayout::article((1080, 1920), "A|B", "C", &fonts(), 0.08);
        let text = &page.text;

        assert_eq!(text.title_y, 192);
        assert_eq!(text.column.margin, 86);
        let main_h = text.title.as_ref().unwrap().height() as i64;
        assert_eq!(text.subtitle_y(), 192 + main_h + 12);

        let summary_h = text.summary.as_ref().unwrap().height() as i64;
        assert_eq!(text.summary_y, 1728 - summary_h);
    }

    #[test]
    fn test_article_image_is_capped_and_centred_between_text() {
        let page = PageLayout::article((1080, 1920), "A|B", "C", &fonts(), 0.08);

        // a tall portrait source is capped at 60 % of the canvas height
        let target = page.target_size((1000, 2000));
        assert_eq!(target, (576, 1152));

        // a wide source spans the canvas
        let wide = page.target_size((2000, 1000));
        assert_eq!(wide, (1080, 540));

        let placement = page.place(wide);
        let top = page.text.title_y + page.text.title_height() + 30;
        let bottom = page.text.summary_y - 40;
        assert_eq!(placement.x, 0);
        assert!(placement.y >= top);
        let above = placement.y - top;
        let below = bottom - (placement.y + 540);
        assert!((above - below).abs() <= 1);
    }

    #[test]
    fn test_article_image_never_above_title_stack() {
        let long_summary = "word ".repeat(200);
        let page = PageLayout::article((1080, 1920), "Title", &long_summary, &fonts(), 0.08);
        let placement = page.place((1080, 1152));
        let top = page.text.title_y + page.text.title_height() + 30;
        assert_eq!(placement.y, top);
    }

    #[test]
    fn test_empty_text_has_no_blocks() {
        let page = PageLayout::article((1080, 1920), "", "  ", &fonts(), 0.08);
        assert!(page.text.is_empty());
        assert_eq!(page.text.title_height(), 0);
    }

    #[test]
    fn test_showcase_canvas_rounds_up_to_even() {
        assert_eq!(
            PageLayout::showcase_canvas(vec![(301, 200), (100, 455)]),
            Some((302, 456))
        );
        assert_eq!(PageLayout::showcase_canvas(Vec::new()), None);
    }

    #[test]
    fn test_showcase_keeps_native_size_centred() {
        let page = PageLayout::showcase((302, 456), "Title", &fonts(), 0.06);
        assert_eq!(page.text.title_y, 13);
        assert!(page.text.summary.is_none());

        let target = page.target_size((100, 50));
        assert_eq!(target, (100, 50));
        let placement = page.place(target);
        assert_eq!((placement.x, placement.y), (101, 203));
    }

    #[test]
    fn test_gradient_background_endpoints() {
        let bg = gradient_background(4, 100);
        assert_eq!(bg.get_pixel(0, 0), [102, 126, 234, 255]);
        let last = bg.get_pixel(3, 99);
        assert!(last[0] >= 117 && last[1] <= 76 && last[2] <= 163);
    }
}
