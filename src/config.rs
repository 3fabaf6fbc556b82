use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    composition::layout::LayoutMode,
    error::{ConfigError, Result},
    video::VideoParams,
};

/// Main configuration for the Reel-Compositor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output video and rendering settings
    pub render: RenderConfig,

    /// Entrance and text timing
    pub animation: AnimationConfig,

    /// Segment sequencing
    pub timeline: TimelineConfig,

    /// Fonts and text geometry
    pub text: TextConfig,

    /// Background music handling
    pub audio: AudioConfig,

    /// Particle overlay
    pub effect: EffectConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.render.validate()?;
        self.animation.validate()?;
        self.timeline.validate()?;
        self.text.validate()?;
        self.audio.validate()?;
        self.effect.validate()?;
        Ok(())
    }

    /// Length of every segment, in seconds
    pub fn clip_duration(&self) -> f64 {
        self.timeline
            .clip_duration
            .unwrap_or_else(|| self.animation.clip_duration())
    }
}

fn invalid<V: ToString>(key: &str, value: V) -> crate::error::CompositorError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}

/// Output and rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output video parameters; `resolution` is the article-mode canvas
    pub params: VideoParams,

    /// Number of parallel frame rendering threads
    pub processing_threads: usize,

    /// Background template image; a violet gradient is generated when unset
    pub background: Option<PathBuf>,

    /// Save one settled PNG per segment next to the output video
    pub preview_frames: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            params: VideoParams::default(),
            processing_threads: num_cpus::get(),
            background: None,
            preview_frames: true,
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<()> {
        if !(self.params.fps > 0.0) {
            return Err(invalid("render.params.fps", self.params.fps));
        }

        let (w, h) = self.params.resolution;
        if w == 0 || h == 0 {
            return Err(invalid("render.params.resolution", format!("{}x{}", w, h)));
        }

        if self.processing_threads == 0 {
            return Err(invalid("render.processing_threads", self.processing_threads));
        }

        Ok(())
    }
}

/// Entrance and text timing, in seconds
///
/// A clip is `hold_no_text + text_fade_in + hold_with_text` long; the
/// entrance plays during the opening hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub entrance_duration: f64,
    pub hold_no_text: f64,
    pub text_fade_in: f64,
    pub hold_with_text: f64,

    /// Keep the text hidden for `hold_no_text` and fade it in over
    /// `text_fade_in`; when off, text is visible from the first frame
    pub fade_text: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            entrance_duration: 0.6,
            hold_no_text: 0.8,
            text_fade_in: 0.4,
            hold_with_text: 1.5,
            fade_text: false,
        }
    }
}

impl AnimationConfig {
    pub fn clip_duration(&self) -> f64 {
        self.hold_no_text + self.text_fade_in + self.hold_with_text
    }

    fn validate(&self) -> Result<()> {
        if !(self.entrance_duration > 0.0) {
            return Err(invalid("animation.entrance_duration", self.entrance_duration));
        }

        for (key, value) in [
            ("animation.hold_no_text", self.hold_no_text),
            ("animation.text_fade_in", self.text_fade_in),
            ("animation.hold_with_text", self.hold_with_text),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(key, value));
            }
        }

        if !(self.clip_duration() > 0.0) {
            return Err(invalid("animation.clip_duration", self.clip_duration()));
        }

        Ok(())
    }
}

/// Segment sequencing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Page layout used for every segment
    pub layout: LayoutMode,

    /// Override the segment length derived from the animation timing
    pub clip_duration: Option<f64>,

    /// Seed for the entrance-variant shuffle; random when unset
    pub shuffle_seed: Option<u64>,

    /// Playback rate of frame-directory (picture-in-picture) sources
    pub frame_sequence_fps: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutMode::Article,
            clip_duration: None,
            shuffle_seed: None,
            frame_sequence_fps: 24.0,
        }
    }
}

impl TimelineConfig {
    fn validate(&self) -> Result<()> {
        if let Some(duration) = self.clip_duration {
            if !(duration > 0.0) {
                return Err(invalid("timeline.clip_duration", duration));
            }
        }

        if !(self.frame_sequence_fps > 0.0) {
            return Err(invalid("timeline.frame_sequence_fps", self.frame_sequence_fps));
        }

        Ok(())
    }
}

const DEFAULT_FALLBACK_FONTS: [&str; 6] = [
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "C:/Windows/Fonts/msyh.ttc",
    "C:/Windows/Fonts/simhei.ttf",
];

/// Fonts and text geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Font files per role; the embedded face is used when unset or unreadable
    pub title_font: Option<PathBuf>,
    pub subtitle_font: Option<PathBuf>,
    pub summary_font: Option<PathBuf>,

    /// Faces searched, in order, for characters the role font lacks
    ///
    /// Entries missing on this system are skipped, so the defaults can
    /// name the usual CJK system fonts of several platforms.
    pub fallback_fonts: Vec<PathBuf>,

    /// Pixel sizes per role
    pub title_size: f32,
    pub subtitle_size: f32,
    pub summary_size: f32,

    /// Horizontal margin as a fraction of the canvas width
    pub article_margin_ratio: f64,
    pub showcase_margin_ratio: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            title_font: None,
            subtitle_font: None,
            summary_font: None,
            fallback_fonts: DEFAULT_FALLBACK_FONTS.iter().map(PathBuf::from).collect(),
            title_size: 66.0,
            subtitle_size: 58.0,
            summary_size: 48.0,
            article_margin_ratio: 0.08,
            showcase_margin_ratio: 0.06,
        }
    }
}

impl TextConfig {
    fn validate(&self) -> Result<()> {
        for (key, size) in [
            ("text.title_size", self.title_size),
            ("text.subtitle_size", self.subtitle_size),
            ("text.summary_size", self.summary_size),
        ] {
            if !(size > 0.0) {
                return Err(invalid(key, size));
            }
        }

        for (key, ratio) in [
            ("text.article_margin_ratio", self.article_margin_ratio),
            ("text.showcase_margin_ratio", self.showcase_margin_ratio),
        ] {
            if !(0.0..0.5).contains(&ratio) {
                return Err(invalid(key, ratio));
            }
        }

        Ok(())
    }
}

/// Background music configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Playback speed multiplier applied before looping and trimming
    pub speed: f64,

    /// Encoder audio codec
    pub codec: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            speed: 1.1,
            codec: "aac".to_string(),
        }
    }
}

impl AudioConfig {
    fn validate(&self) -> Result<()> {
        // ffmpeg's atempo filter accepts 0.5..=100
        if !(0.5..=100.0).contains(&self.speed) {
            return Err(invalid("audio.speed", self.speed));
        }
        Ok(())
    }
}

/// Particle overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// `none`, `sparkle` (or `gold_sparkle`), `snowfall`, `bokeh`, `firefly` or `bubble`
    pub name: String,

    /// Upper bound on the particle pool
    pub max_particles: usize,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            name: "none".to_string(),
            max_particles: 60,
        }
    }
}

impl EffectConfig {
    fn validate(&self) -> Result<()> {
        if !crate::effects::EffectRegistry::new().is_known(&self.name) {
            return Err(invalid("effect.name", &self.name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_timing_matches_clip_length() {
        let config = Config::default();
        assert!((config.clip_duration() - 2.7).abs() < 1e-9);
        assert_eq!(config.render.params.fps, 24.0);
        assert_eq!(config.effect.max_particles, 60);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.timeline.shuffle_seed = Some(42);
        original_config.effect.name = "bokeh".to_string();

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config.timeline.shuffle_seed, Some(42));
        assert_eq!(loaded_config.effect.name, "bokeh");
        assert_eq!(original_config.render.params.fps, loaded_config.render.params.fps);
        assert_eq!(loaded_config.timeline.layout, LayoutMode::Article);
    }

    #[test]
    fn test_fallback_fonts_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("fonts.toml");
        let text = "[text]\nfallback_fonts = [\"/fonts/a.ttc\", \"/fonts/b.ttf\"]\n";
        std::fs::write(&file_path, text).unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(
            config.text.fallback_fonts,
            vec![PathBuf::from("/fonts/a.ttc"), PathBuf::from("/fonts/b.ttf")]
        );
        assert!(!Config::default().text.fallback_fonts.is_empty());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        let partial = "[timeline]\nlayout = \"showcase\"\nclip_duration = 3.0\n";
        std::fs::write(&file_path, partial).unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.timeline.layout, LayoutMode::Showcase);
        assert_eq!(config.clip_duration(), 3.0);
        assert_eq!(config.text.title_size, 66.0);
    }

    #[test]
    fn test_invalid_entrance_duration() {
        let mut config = Config::default();
        config.animation.entrance_duration = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_effect_name_names_key() {
        let mut config = Config::default();
        config.effect.name = "confetti".to_string();
        match config.validate() {
            Err(crate::error::CompositorError::Config(ConfigError::InvalidValue { key, .. })) => {
                assert_eq!(key, "effect.name");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::from_file("/no/such/config.toml").is_err());
    }
}
