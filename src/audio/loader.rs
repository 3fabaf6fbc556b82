use std::fs::File;
use std::path::Path;

use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::audio::types::{AudioFormat, AudioInfo};
use crate::error::{AudioError, CompositorError, Result};

/// Audio file prober supporting multiple formats
///
/// Only the stream parameters and duration are read; the samples themselves
/// go straight from the file to the encoder.
pub struct AudioLoader;

impl AudioLoader {
    /// Probe an audio file on the blocking pool
    pub async fn probe<P: AsRef<Path>>(path: P) -> Result<AudioInfo> {
        let path = path.as_ref().to_path_buf();
        tokio::task::spawn_blocking(move || Self::probe_blocking(&path))
            .await
            .map_err(|e| CompositorError::generic(format!("audio probe task failed: {}", e)))?
    }

    /// Probe an audio file on the current thread
    pub fn probe_blocking<P: AsRef<Path>>(path: P) -> Result<AudioInfo> {
        let path = path.as_ref();
        let extension = Self::detect_format(path).unwrap_or_default();

        match extension.as_str() {
            "wav" => Self::probe_wav(path),
            "mp3" | "flac" | "ogg" | "m4a" | "aac" => Self::probe_with_symphonia(path, &extension),
            _ => Err(AudioError::UnsupportedFormat {
                format: extension
            }.into()),
        }
    }

    /// WAV headers carry the exact frame count, so hound answers directly
    fn probe_wav(path: &Path) -> Result<AudioInfo> {
        let reader = hound::WavReader::open(path)
            .map_err(|_| AudioError::LoadFailed {
                path: path.display().to_string()
            })?;

        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(AudioError::InvalidParameters {
                details: "WAV header has a zero sample rate".to_string()
            }.into());
        }

        Ok(AudioInfo {
            path: path.to_path_buf(),
            duration: reader.duration() as f64 / spec.sample_rate as f64,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            format: AudioFormat {
                extension: "wav".to_string(),
                bit_depth: Some(spec.bits_per_sample),
            },
        })
    }

    fn probe_with_symphonia(path: &Path, extension: &str) -> Result<AudioInfo> {
        let load_failed = || AudioError::LoadFailed {
            path: path.display().to_string()
        };

        let file = File::open(path).map_err(|_| load_failed())?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        hint.with_extension(extension);

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .map_err(|_| load_failed())?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(load_failed)?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params.sample_rate
            .ok_or_else(|| AudioError::InvalidParameters {
                details: "No sample rate found".to_string()
            })?;
        let channels = codec_params.channels.map(|c| c.count() as u16).unwrap_or(2);

        let frames = match codec_params.n_frames {
            Some(n) => n,
            None => {
                // No frame count in the container: decode and count
                debug!("No frame count in {:?}, decoding to measure", path);
                let dec_opts: DecoderOptions = Default::default();
                let mut decoder = symphonia::default::get_codecs()
                    .make(&codec_params, &dec_opts)
                    .map_err(|_| load_failed())?;

                let mut counted = 0u64;
                loop {
                    let packet = match format.next_packet() {
                        Ok(packet) => packet,
                        Err(SymphoniaError::ResetRequired) => {
                            decoder.reset();
                            continue;
                        }
                        Err(_) => break,
                    };
                    if packet.track_id() != track_id {
                        continue;
                    }
                    match decoder.decode(&packet) {
                        Ok(decoded) => counted += decoded.frames() as u64,
                        Err(SymphoniaError::DecodeError(_)) => continue,
                        Err(_) => break,
                    }
                }
                counted
            }
        };

        Ok(AudioInfo {
            path: path.to_path_buf(),
            duration: frames as f64 / sample_rate as f64,
            sample_rate,
            channels,
            format: AudioFormat {
                extension: extension.to_string(),
                bit_depth: codec_params.bits_per_sample.map(|b| b as u16),
            },
        })
    }

    /// Detect audio format from file extension
    pub fn detect_format<P: AsRef<Path>>(path: P) -> Option<String> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Check if a file format is supported
    pub fn is_format_supported(extension: &str) -> bool {
        matches!(
            extension.to_lowercase().as_str(),
            "wav" | "mp3" | "flac" | "ogg" | "m4a" | "aac"
        )
    }
}
