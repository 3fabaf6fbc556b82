use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Local;
use tokio::task;
use tracing::{debug, info, warn};

use crate::audio::AudioPlan;
use crate::error::{EncodeError, Result};
use crate::video::types::{RasterSurface, VideoParams};

/// Numbered frame file pattern handed to ffmpeg's image2 demuxer
const FRAME_PATTERN: &str = "frame_%06d.png";

static WORK_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Represents an encoded video output
#[derive(Debug, Clone)]
pub struct EncodedVideo {
    pub path: PathBuf,
    pub duration: f64,
    pub frame_count: usize,
    pub file_size: u64,
}

/// Sequential frame sink backed by an external `ffmpeg`
///
/// Frames are written as a numbered PNG sequence into a private working
/// directory, then muxed with the planned audio in one ffmpeg invocation.
/// The working directory is removed when the encoder is dropped.
pub struct FrameEncoder {
    params: VideoParams,
    audio_codec: String,
    work_dir: Option<PathBuf>,
    frames_written: usize,
}

impl FrameEncoder {
    pub fn new(params: VideoParams, audio_codec: impl Into<String>) -> Self {
        Self {
            params,
            audio_codec: audio_codec.into(),
            work_dir: None,
            frames_written: 0,
        }
    }

    pub fn check_ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    fn ensure_work_dir(&mut self) -> Result<PathBuf> {
        if let Some(ref dir) = self.work_dir {
            return Ok(dir.clone());
        }

        let dir = std::env::temp_dir().join(format!(
            "reel_compositor_{}_{}_{}",
            std::process::id(),
            Local::now().format("%Y%m%d_%H%M%S"),
            WORK_DIR_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir)?;
        debug!("Encoder working directory: {:?}", dir);

        self.work_dir = Some(dir.clone());
        Ok(dir)
    }

    /// Append the next frame of the video
    pub fn write_frame(&mut self, frame: &RasterSurface) -> Result<()> {
        let dir = self.ensure_work_dir()?;
        let frame_path = dir.join(format!("frame_{:06}.png", self.frames_written));

        frame.save_png(&frame_path).map_err(|e| EncodeError::FrameWriteFailed {
            path: frame_path.display().to_string(),
            reason: e.to_string(),
        })?;

        self.frames_written += 1;
        Ok(())
    }

    /// Length of the written frames at the output frame rate
    pub fn video_duration(&self) -> f64 {
        self.frames_written as f64 / self.params.fps
    }

    fn quality_to_crf(&self) -> u8 {
        (51 - ((self.params.quality.min(100) as f32 / 100.0) * 51.0) as u8).clamp(0, 51)
    }

    /// ffmpeg arguments for muxing the frame sequence with an optional track
    ///
    /// The audio input is repeated `loops - 1` extra times and sped up with
    /// `atempo`. The output is cut to the written frames, so the track ends
    /// on the last video frame.
    pub fn ffmpeg_args(
        &self,
        frame_dir: &Path,
        output: &Path,
        audio: Option<&AudioPlan>,
    ) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-y".into(),
            "-framerate".into(),
            self.params.fps.to_string(),
            "-i".into(),
            frame_dir.join(FRAME_PATTERN).display().to_string(),
        ];

        if let Some(plan) = audio {
            args.extend([
                "-stream_loop".into(),
                plan.loops().saturating_sub(1).to_string(),
                "-i".into(),
                plan.path.display().to_string(),
            ]);
        }

        args.extend([
            "-c:v".into(),
            self.params.codec.clone(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-crf".into(),
            self.quality_to_crf().to_string(),
        ]);

        if let Some(plan) = audio {
            args.extend([
                "-map".into(),
                "0:v:0".into(),
                "-map".into(),
                "1:a:0".into(),
                "-filter:a".into(),
                format!("atempo={}", plan.speed),
                "-c:a".into(),
                self.audio_codec.clone(),
            ]);
            if (plan.duration() - self.video_duration()).abs() * self.params.fps >= 1.0 {
                warn!(
                    "Audio plan covers {:.3}s but {} frames last {:.3}s, cutting to the frames",
                    plan.duration(),
                    self.frames_written,
                    self.video_duration()
                );
            }
        }

        args.extend([
            "-t".into(),
            format!("{:.3}", self.video_duration()),
            output.display().to_string(),
        ]);
        args
    }

    /// Run ffmpeg over the written frames and return the output summary
    pub async fn finish(
        &mut self,
        output: &Path,
        audio: Option<&AudioPlan>,
    ) -> Result<EncodedVideo> {
        if self.frames_written == 0 {
            return Err(EncodeError::EncodingFailed {
                reason: "no frames were written".to_string(),
            }
            .into());
        }

        if !Self::check_ffmpeg_available() {
            return Err(EncodeError::FfmpegMissing.into());
        }

        let frame_dir = self.ensure_work_dir()?;
        let args = self.ffmpeg_args(&frame_dir, output, audio);
        info!("Encoding {} frames -> {:?}", self.frames_written, output);
        debug!("ffmpeg {}", args.join(" "));

        let mut cmd = Command::new("ffmpeg");
        cmd.args(&args);

        let result = task::spawn_blocking(move || cmd.output())
            .await
            .map_err(|e| EncodeError::EncodingFailed {
                reason: format!("Failed to spawn FFmpeg process: {}", e),
            })?;

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EncodeError::FfmpegMissing.into());
            }
            Err(e) => {
                return Err(EncodeError::EncodingFailed {
                    reason: format!("FFmpeg execution failed: {}", e),
                }
                .into());
            }
        };

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(EncodeError::EncodingFailed {
                reason: format!("FFmpeg failed: {}", stderr.trim()),
            }
            .into());
        }

        let file_size = std::fs::metadata(output)?.len();
        Ok(EncodedVideo {
            path: output.to_path_buf(),
            duration: self.video_duration(),
            frame_count: self.frames_written,
            file_size,
        })
    }

    pub fn cleanup(&mut self) {
        if let Some(dir) = self.work_dir.take() {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                warn!("Failed to remove temporary directory {:?}: {}", dir, e);
            }
        }
        self.frames_written = 0;
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        self.cleanup();
    }
}
