//! Reading and writing per-video analysis artifacts.
//!
//! The artifact is a pretty-printed JSON file at `<output_dir>/<base>.json`,
//! written before any rendering starts so a crashed run can be resumed from
//! it later.

use std::path::{Path, PathBuf};

use tracing::info;

use subclip_models::AnalysisArtifact;

use crate::error::{PipelineError, PipelineResult};

/// Path of the artifact for a given video base name.
pub fn artifact_path(output_dir: &Path, video_base: &str) -> PathBuf {
    output_dir.join(format!("{video_base}.json"))
}

/// Persist an artifact as pretty JSON, creating the output dir if needed.
pub async fn write_artifact(path: &Path, artifact: &AnalysisArtifact) -> PipelineResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(artifact)
        .map_err(|e| PipelineError::internal(format!("artifact serialization failed: {e}")))?;
    tokio::fs::write(path, json).await?;
    info!(path = %path.display(), segments = artifact.segments.len(), "Wrote analysis artifact");
    Ok(())
}

/// Load an artifact back from disk.
pub async fn read_artifact(path: &Path) -> PipelineResult<AnalysisArtifact> {
    if !path.exists() {
        return Err(PipelineError::ArtifactNotFound(path.to_path_buf()));
    }
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw).map_err(|source| PipelineError::ArtifactParse {
        path: path.to_path_buf(),
        source,
    })
}
