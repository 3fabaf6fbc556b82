use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::video::types::{MediaSource, RasterSurface};

/// A source that loaded successfully and is ready to be laid out
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    /// Display name used in logs and preview file names
    pub name: String,
    pub path: PathBuf,
    pub media: MediaSource,
}

/// Turns source references into decoded media
///
/// Implementations must not panic on bad input: unreadable sources are
/// reported as `SourceError` so the caller can skip them.
pub trait SourceResolver: Send + Sync {
    fn resolve(&self, reference: &Path) -> Result<ResolvedSource, SourceError>;

    /// Resolve every reference, logging and skipping the ones that fail
    fn resolve_all(&self, references: &[PathBuf]) -> Vec<ResolvedSource> {
        let mut resolved = Vec::with_capacity(references.len());
        for reference in references {
            match self.resolve(reference) {
                Ok(source) => {
                    let (w, h) = source.media.dimensions();
                    info!(
                        "Loaded source: {} ({}x{}, {} frame(s))",
                        source.name,
                        w,
                        h,
                        source.media.frame_count()
                    );
                    resolved.push(source);
                }
                Err(e) => warn!("Skipping source {:?}: {}", reference, e),
            }
        }
        resolved
    }
}

/// Resolves image files and directories of pre-extracted frames from disk
#[derive(Debug, Clone)]
pub struct FileSourceResolver {
    frame_sequence_fps: f64,
}

impl FileSourceResolver {
    pub fn new(frame_sequence_fps: f64) -> Self {
        Self { frame_sequence_fps }
    }

    pub fn is_image_file<P: AsRef<Path>>(path: P) -> bool {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) => matches!(
                ext.to_lowercase().as_str(),
                "jpg" | "jpeg" | "png"
            ),
            None => false,
        }
    }

    fn is_hidden_file(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
    }

    fn load_image(path: &Path) -> Result<RasterSurface, SourceError> {
        let image = image::open(path).map_err(|e| SourceError::Unavailable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(RasterSurface::new(image.to_rgba8()))
    }

    /// Load every image in `directory`, in file-name order, as one sequence
    fn load_frame_directory(&self, directory: &Path) -> Result<MediaSource, SourceError> {
        let entries = std::fs::read_dir(directory).map_err(|e| SourceError::Unavailable {
            path: directory.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && !Self::is_hidden_file(p) && Self::is_image_file(p))
            .collect();
        paths.sort();

        let mut frames: Vec<RasterSurface> = Vec::with_capacity(paths.len());
        for path in &paths {
            match Self::load_image(path) {
                Ok(frame) => frames.push(frame),
                Err(e) => warn!("Dropping unreadable frame {:?}: {}", path, e),
            }
        }

        let Some(first) = frames.first() else {
            return Err(SourceError::NoFrames {
                path: directory.display().to_string(),
            });
        };

        // every frame is drawn into the same rectangle
        let (w, h) = first.dimensions();
        for frame in frames.iter_mut().skip(1) {
            if frame.dimensions() != (w, h) {
                debug!("Resizing mismatched frame {:?} -> {}x{}", frame.dimensions(), w, h);
                *frame = frame.resized(w, h);
            }
        }

        Ok(MediaSource::sequence(frames, self.frame_sequence_fps))
    }
}

impl Default for FileSourceResolver {
    fn default() -> Self {
        Self::new(24.0)
    }
}

impl SourceResolver for FileSourceResolver {
    fn resolve(&self, reference: &Path) -> Result<ResolvedSource, SourceError> {
        let name = reference
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("source")
            .to_string();

        if !reference.exists() {
            return Err(SourceError::Unavailable {
                path: reference.display().to_string(),
                reason: "no such file or directory".to_string(),
            });
        }

        let media = if reference.is_dir() {
            self.load_frame_directory(reference)?
        } else if Self::is_image_file(reference) {
            MediaSource::Still(Self::load_image(reference)?)
        } else {
            return Err(SourceError::UnsupportedFormat {
                path: reference.display().to_string(),
            });
        };

        Ok(ResolvedSource {
            name,
            path: reference.to_path_buf(),
            media,
        })
    }
}
