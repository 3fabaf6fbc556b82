use std::sync::OnceLock;

use regex::Regex;

use crate::text::font::{FontFace, GlyphMask};

/// Anything that can tell how wide a run of text is
pub trait TextMeasure {
    /// Advance width of `text` in pixels
    fn text_width(&self, text: &str) -> f32;

    /// Height of one line box in pixels
    fn line_height(&self) -> f32;
}

static TOKEN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn token_pattern() -> &'static Regex {
    TOKEN_PATTERN.get_or_init(|| {
        // An ASCII word (letters/digits, optionally joined by an apostrophe or
        // hyphen between runs) is one token; every other character stands alone.
        Regex::new(r"(?s)[A-Za-z0-9]+(?:['\u{2019}\-][A-Za-z0-9]+)*|.")
            .expect("token pattern is valid")
    })
}

/// Split text into wrap tokens
pub fn tokenize(text: &str) -> Vec<&str> {
    token_pattern().find_iter(text).map(|m| m.as_str()).collect()
}

/// Greedy word-aware line wrapping
///
/// A word token is only ever split when it can't fit on an empty line by
/// itself. Explicit `\n` forces a break.
pub fn wrap<M: TextMeasure + ?Sized>(text: &str, measure: &M, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in tokenize(text) {
        if token == "\n" {
            lines.push(current.trim_end().to_string());
            current.clear();
            continue;
        }

        let candidate = format!("{}{}", current, token);
        if measure.text_width(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.trim().is_empty() {
            lines.push(current.trim_end().to_string());
        }
        current.clear();

        // whitespace that caused the break never starts a line
        if token.chars().all(char::is_whitespace) {
            continue;
        }

        if measure.text_width(token) <= max_width {
            current.push_str(token);
            continue;
        }

        for ch in token.chars() {
            let mut candidate = current.clone();
            candidate.push(ch);
            if current.is_empty() || measure.text_width(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }

    if !current.trim().is_empty() {
        lines.push(current.trim_end().to_string());
    }

    lines
}

/// Colors and spacing of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub fill: [u8; 3],
    pub glow: Option<[u8; 3]>,
    pub line_spacing: u32,
}

impl TextStyle {
    /// White main title with the brand-blue glow
    pub const TITLE: TextStyle = TextStyle {
        fill: [255, 255, 255],
        glow: Some([102, 126, 234]),
        line_spacing: 18,
    };

    /// Yellow subtitle with an amber glow
    pub const SUBTITLE: TextStyle = TextStyle {
        fill: [255, 255, 0],
        glow: Some([180, 140, 30]),
        line_spacing: 14,
    };

    /// Plain white summary
    pub const SUMMARY: TextStyle = TextStyle {
        fill: [255, 255, 255],
        glow: None,
        line_spacing: 12,
    };
}

/// One rasterized line, ready to stamp
#[derive(Debug, Clone)]
pub struct RenderedLine {
    pub text: String,
    pub width: f32,
    pub mask: GlyphMask,
}

/// Wrapped, pre-rasterized text with its style
///
/// Built once per (text, font, width) and shared read-only by every frame.
#[derive(Debug, Clone)]
pub struct TextBlock {
    lines: Vec<RenderedLine>,
    font: FontFace,
    style: TextStyle,
    line_height: u32,
}

impl TextBlock {
    /// # Panics
    ///
    /// Panics when `max_width` is not positive: a zero-width text column is a
    /// layout bug, not a runtime condition.
    pub fn layout(text: &str, font: &FontFace, max_width: u32, style: TextStyle) -> Self {
        assert!(max_width > 0, "text width must be positive");

        let lines = wrap(text, font, max_width as f32)
            .into_iter()
            .map(|line| RenderedLine {
                width: font.text_width(&line),
                mask: font.rasterize_line(&line),
                text: line,
            })
            .collect();

        Self {
            lines,
            font: font.clone(),
            style,
            line_height: font.line_height().ceil() as u32,
        }
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    pub fn line_texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    pub fn font(&self) -> &FontFace {
        &self.font
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total stacked height: every line plus its trailing spacing
    pub fn height(&self) -> u32 {
        self.lines.len() as u32 * (self.line_height + self.style.line_spacing)
    }
}
