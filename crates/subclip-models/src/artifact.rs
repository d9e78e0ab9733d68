//! Persisted analysis artifacts and source fingerprints.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::segment::Segment;

/// Metadata about the analyzed source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    /// Absolute or relative path to the source video file
    pub file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl SourceMetadata {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            show: None,
            season: None,
            episode: None,
        }
    }
}

/// The durable record of one video's analysis.
///
/// Written once per source video before rendering starts; a standalone
/// render run can consume it without re-deriving segment timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisArtifact {
    pub metadata: SourceMetadata,
    pub segments: Vec<Segment>,
    /// Deterministic identifier derived from the source filename stem
    pub fingerprint: String,
}

impl AnalysisArtifact {
    pub fn new(metadata: SourceMetadata, segments: Vec<Segment>, fingerprint: String) -> Self {
        Self {
            metadata,
            segments,
            fingerprint,
        }
    }
}

/// Fingerprint derivation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    #[error("cannot derive a fingerprint from path without a filename stem: {0}")]
    NoStem(String),
}

/// Derive the content-addressing fingerprint for a source video.
///
/// The fingerprint is the lowercase hex SHA-256 of the filename stem. It
/// identifies the source by *name*, not by file bytes: two runs over the
/// same filename resolve to the same output paths, which is the
/// resumability contract.
pub fn filename_fingerprint(path: impl AsRef<Path>) -> Result<String, FingerprintError> {
    let path = path.as_ref();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| FingerprintError::NoStem(path.display().to_string()))?;
    Ok(format!("{:x}", Sha256::digest(stem.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;

    #[test]
    fn fingerprint_is_deterministic_and_extension_independent() {
        let a = filename_fingerprint("/videos/episode-01.mkv").unwrap();
        let b = filename_fingerprint("/other/dir/episode-01.mp4").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_differs_per_name() {
        let a = filename_fingerprint("a.mkv").unwrap();
        let b = filename_fingerprint("b.mkv").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_rejects_stemless_paths() {
        assert!(matches!(
            filename_fingerprint(""),
            Err(FingerprintError::NoStem(_))
        ));
    }

    #[test]
    fn artifact_round_trips_with_camel_case() {
        let artifact = AnalysisArtifact::new(
            SourceMetadata::new("/videos/episode-01.mkv"),
            vec![Segment::new(1, 0.0, 2.0, 24.0, "Hi.".into(), None)],
            filename_fingerprint("/videos/episode-01.mkv").unwrap(),
        );
        let json = serde_json::to_value(&artifact).unwrap();
        assert!(json["metadata"].get("filePath").is_some());
        let back: AnalysisArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(back, artifact);
    }
}
