//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

use subclip_media::MediaError;
use subclip_models::{FingerprintError, TimestampError};

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No caption source for video: {0}")]
    MissingCaptions(PathBuf),

    #[error("Invalid timecode in captions: {0}")]
    Timestamp(#[from] TimestampError),

    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(PathBuf),

    #[error("Artifact parse error in {path}: {source}")]
    ArtifactParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check whether this failure is an *input* error scoped to one video.
    ///
    /// Input errors (missing or unparsable captions, invalid source video)
    /// fail that single video; the batch moves on. Everything else aborts
    /// the remaining batch.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::MissingCaptions(_) | Self::Timestamp(_) => true,
            Self::Media(
                MediaError::NoSubtitleStream(_)
                | MediaError::SubtitleTrackNotFound { .. }
                | MediaError::InvalidVideo(_),
            ) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_classification() {
        assert!(PipelineError::MissingCaptions(PathBuf::from("a.mkv")).is_input_error());
        assert!(PipelineError::from(TimestampError::Empty).is_input_error());
        assert!(
            PipelineError::from(MediaError::NoSubtitleStream(PathBuf::from("a.mkv")))
                .is_input_error()
        );
        assert!(!PipelineError::internal("boom").is_input_error());
        assert!(!PipelineError::from(MediaError::ffmpeg_failed("exit 1", None, Some(1)))
            .is_input_error());
    }
}
