use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What probing an audio reference tells us
#[derive(Debug, Clone)]
pub struct AudioInfo {
    /// Original file path
    pub path: PathBuf,

    /// Duration in seconds at normal speed
    pub duration: f64,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Audio format information
    pub format: AudioFormat,
}

/// Audio file format information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFormat {
    /// File extension (wav, mp3, flac, etc.)
    pub extension: String,

    /// Bit depth (16, 24, 32, etc.)
    pub bit_depth: Option<u16>,
}

/// How the background track is fitted to the finished video
///
/// The speed change is applied first, so the playable length is
/// `source_duration / speed`. A track shorter than the video is repeated
/// `loops` times, and the result is cut to exactly the video duration.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPlan {
    pub path: PathBuf,
    pub source_duration: f64,
    pub speed: f64,
    pub video_duration: f64,
}

impl AudioPlan {
    pub fn new(path: PathBuf, source_duration: f64, speed: f64, video_duration: f64) -> Self {
        Self {
            path,
            source_duration,
            speed,
            video_duration,
        }
    }

    /// Track length after the speed change
    pub fn sped_duration(&self) -> f64 {
        self.source_duration / self.speed
    }

    /// Number of back-to-back copies needed to cover the video
    pub fn loops(&self) -> u32 {
        let sped = self.sped_duration();
        if sped <= 0.0 || sped >= self.video_duration {
            1
        } else {
            (self.video_duration / sped) as u32 + 1
        }
    }

    /// Final audio length; always the video length
    pub fn duration(&self) -> f64 {
        self.video_duration
    }
}
