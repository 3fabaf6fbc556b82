use thiserror::Error;

/// Main error type for the Reel-Compositor library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Font error: {0}")]
    Font(#[from] FontError),

    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors raised while resolving media sources (images, frame sequences)
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source unavailable: {path} ({reason})")]
    Unavailable { path: String, reason: String },

    #[error("Unsupported source format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Frame sequence has no readable frames: {path}")]
    NoFrames { path: String },
}

/// Font loading errors
///
/// These never abort a render: the font set falls back to the embedded face.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("Font file unavailable: {path}")]
    Unavailable { path: String },

    #[error("Failed to parse font {path}: {reason}")]
    ParseFailed { path: String, reason: String },
}

/// Timeline assembly errors
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("No usable segments out of {requested} requested sources")]
    EmptyBatch { requested: usize },

    #[error("Invalid timeline parameters: {details}")]
    InvalidParameters { details: String },
}

/// Errors from the external encoder glue
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("FFmpeg not found. Please install FFmpeg.")]
    FfmpegMissing,

    #[error("Failed to write frame {path}: {reason}")]
    FrameWriteFailed { path: String, reason: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },
}

/// Audio probing errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to load audio file: {path}")]
    LoadFailed { path: String },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Invalid audio parameters: {details}")]
    InvalidParameters { details: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if the pipeline can carry on after this error
    ///
    /// Unreadable sources only drop their own segment, and missing fonts fall
    /// back to the embedded face. Everything else ends the request.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Source(_) => true,
            Self::Font(_) => true,
            Self::Audio(AudioError::LoadFailed { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Source(SourceError::Unavailable { path, .. }) => {
                format!("Could not read source '{}'. It was skipped.", path)
            }
            Self::Timeline(TimelineError::EmptyBatch { requested }) => {
                format!(
                    "None of the {} selected images could be used. \
                     Please check the files exist and are PNG or JPEG.",
                    requested
                )
            }
            Self::Encode(EncodeError::FfmpegMissing) => {
                "FFmpeg was not found on PATH. Install it to produce video files.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
