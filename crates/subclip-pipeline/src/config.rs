//! Typed pipeline configuration.
//!
//! One explicit struct built before the core runs; the core never inspects
//! partial or optional option bags beyond what is declared here.

use std::path::PathBuf;

use subclip_models::RenditionSpec;

/// Default number of segments rendered concurrently per video.
pub const DEFAULT_CONCURRENCY: usize = 4;
/// Default cue-gap merge threshold in milliseconds.
pub const DEFAULT_GAP_THRESHOLD_MS: u64 = 1000;
/// Default minimum segment duration in milliseconds.
pub const DEFAULT_MIN_SEGMENT_DURATION_MS: u64 = 3000;
/// Default maximum segment duration in milliseconds.
pub const DEFAULT_MAX_SEGMENT_DURATION_MS: u64 = 15000;

/// Where captions for a video come from.
#[derive(Debug, Clone)]
pub enum SubtitleSource {
    /// `<subtitle_dir>/<videoBaseName>.srt` next to each video
    External(PathBuf),
    /// Extracted from the video container itself
    Embedded {
        /// Explicit container stream index; auto-selected when absent
        track_index: Option<u32>,
    },
}

/// Configuration for a batch processing run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory scanned for `.mkv`/`.mp4` source videos
    pub video_dir: PathBuf,
    /// Directory for artifacts, markers, and per-video clip directories
    pub output_dir: PathBuf,
    /// Caption source for every video in the batch
    pub subtitle_source: SubtitleSource,
    /// Concurrency cap for per-segment rendering
    pub concurrency: usize,
    /// Analyze and write artifacts only; skip all rendering
    pub json_only: bool,
    /// Merge cues whose gap is at most this many milliseconds (0 disables)
    pub gap_threshold_ms: u64,
    /// Force-merge groups shorter than this many milliseconds (0 disables)
    pub min_segment_duration_ms: u64,
    /// Never merge past this many milliseconds (0 disables)
    pub max_segment_duration_ms: u64,
    /// Requested output renditions
    pub renditions: Vec<RenditionSpec>,
}

/// Configuration for a standalone render-from-artifact run.
#[derive(Debug, Clone)]
pub struct ArtifactRunConfig {
    /// Path to a previously written analysis artifact
    pub artifact_path: PathBuf,
    /// Directory for markers and the per-video clip directory
    pub output_dir: PathBuf,
    /// Concurrency cap for per-segment rendering
    pub concurrency: usize,
    /// Requested output renditions
    pub renditions: Vec<RenditionSpec>,
}
