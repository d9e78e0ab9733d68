//! Per-video completion markers.
//!
//! A `.complete` file inside the video's clip directory records a finished
//! run. Its content is the completion time; only its existence matters for
//! the skip decision.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::error::PipelineResult;

const MARKER_NAME: &str = ".complete";

/// Marker path for a video's clip directory.
pub fn marker_path(output_dir: &Path, video_base: &str) -> PathBuf {
    output_dir.join(video_base).join(MARKER_NAME)
}

/// True when the video has already been fully processed.
pub fn is_complete(output_dir: &Path, video_base: &str) -> bool {
    marker_path(output_dir, video_base).exists()
}

/// Write the marker, creating the clip directory if needed.
pub async fn mark_complete(output_dir: &Path, video_base: &str) -> PipelineResult<()> {
    let path = marker_path(output_dir, video_base);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, Utc::now().to_rfc3339()).await?;
    info!(video = video_base, "Marked video complete");
    Ok(())
}
