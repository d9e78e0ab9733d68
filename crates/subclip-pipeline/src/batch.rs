//! Batch orchestration: scan, analyze, render, mark complete.
//!
//! Videos are processed one at a time; concurrency lives below the video
//! level, in the segment scheduler. A video that fails on its own inputs
//! (missing captions, bad timecodes, invalid container) is logged and
//! skipped; any other failure aborts the remaining batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use subclip_media::{extract_embedded_subtitles, get_fps, parse_srt, Transcoder};
use subclip_models::{filename_fingerprint, AnalysisArtifact, Cue, SourceMetadata};

use crate::analyzer::{analyze_cues, AnalyzerConfig};
use crate::artifact_store::{artifact_path, write_artifact};
use crate::completion::{is_complete, mark_complete};
use crate::config::{ArtifactRunConfig, BatchConfig, SubtitleSource};
use crate::error::{PipelineError, PipelineResult};
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::render_job::RenderContext;
use crate::scheduler::schedule_segments;

/// Outcome counts for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Process every video in the configured directory.
pub async fn run_batch(
    config: &BatchConfig,
    transcoder: Arc<dyn Transcoder>,
    progress: ProgressReporter,
) -> PipelineResult<BatchSummary> {
    let videos = scan_videos(&config.video_dir).await?;
    info!(count = videos.len(), dir = %config.video_dir.display(), "Batch starting");

    let mut summary = BatchSummary::default();
    for video in &videos {
        let base = video_base_name(video)?;

        if !config.json_only && is_complete(&config.output_dir, &base) {
            info!(video = %base, "Already complete; skipping");
            summary.skipped += 1;
            continue;
        }

        match process_video(config, Arc::clone(&transcoder), &progress, video, &base).await {
            Ok(()) => summary.processed += 1,
            Err(e) if e.is_input_error() => {
                error!(video = %base, error = %e, "Video failed on its inputs; continuing batch");
                progress.send(ProgressEvent::VideoFailed {
                    video: base.clone(),
                    message: e.to_string(),
                });
                summary.failed += 1;
            }
            Err(e) => {
                progress.send(ProgressEvent::VideoFailed {
                    video: base.clone(),
                    message: e.to_string(),
                });
                return Err(e);
            }
        }
    }

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Batch finished"
    );
    Ok(summary)
}

async fn process_video(
    config: &BatchConfig,
    transcoder: Arc<dyn Transcoder>,
    progress: &ProgressReporter,
    video: &Path,
    base: &str,
) -> PipelineResult<()> {
    let clip_dir = config.output_dir.join(base);
    let cues = load_cues(config, video, base).await?;
    let fingerprint = filename_fingerprint(video)?;

    let segments = if cues.is_empty() {
        warn!(video = %base, "Caption source has no cues");
        Vec::new()
    } else {
        let fps = get_fps(video).await?;
        let analyzer = AnalyzerConfig {
            fps,
            gap_threshold_ms: config.gap_threshold_ms,
            min_segment_duration_ms: config.min_segment_duration_ms,
            max_segment_duration_ms: config.max_segment_duration_ms,
        };
        analyze_cues(&cues, &analyzer)?
    };

    let artifact = AnalysisArtifact {
        metadata: source_metadata(video, base),
        segments,
        fingerprint: fingerprint.clone(),
    };
    // Written before rendering so a crashed run can resume from it.
    write_artifact(&artifact_path(&config.output_dir, base), &artifact).await?;

    if config.json_only {
        info!(video = %base, segments = artifact.segments.len(), "Analysis only; skipping render");
        return Ok(());
    }

    render_video(
        transcoder,
        progress,
        video,
        base,
        &clip_dir,
        &artifact,
        &config.renditions,
        config.concurrency,
    )
    .await?;
    mark_complete(&config.output_dir, base).await
}

/// Render a previously analyzed video straight from its artifact.
pub async fn run_from_artifact(
    config: &ArtifactRunConfig,
    transcoder: Arc<dyn Transcoder>,
    progress: ProgressReporter,
) -> PipelineResult<()> {
    let artifact = crate::artifact_store::read_artifact(&config.artifact_path).await?;
    let source = PathBuf::from(&artifact.metadata.file_path);
    let base = video_base_name(&source)?;

    if is_complete(&config.output_dir, &base) {
        info!(video = %base, "Already complete; skipping");
        return Ok(());
    }

    let clip_dir = config.output_dir.join(&base);
    render_video(
        transcoder,
        &progress,
        &source,
        &base,
        &clip_dir,
        &artifact,
        &config.renditions,
        config.concurrency,
    )
    .await?;
    mark_complete(&config.output_dir, &base).await
}

#[allow(clippy::too_many_arguments)]
async fn render_video(
    transcoder: Arc<dyn Transcoder>,
    progress: &ProgressReporter,
    video: &Path,
    base: &str,
    clip_dir: &Path,
    artifact: &AnalysisArtifact,
    renditions: &[subclip_models::RenditionSpec],
    concurrency: usize,
) -> PipelineResult<()> {
    let ctx = Arc::new(RenderContext {
        transcoder,
        source: video.to_path_buf(),
        clip_dir: clip_dir.to_path_buf(),
        fingerprint: artifact.fingerprint.clone(),
        renditions: renditions.to_vec(),
        progress: progress.clone(),
        video_name: base.to_string(),
    });

    let total: u64 = artifact
        .segments
        .iter()
        .map(|s| ctx.renditions_per_segment(s))
        .sum();
    progress.send(ProgressEvent::VideoStarted {
        video: base.to_string(),
        total_segments: artifact.segments.len() as u64,
        total_renditions: total,
    });

    schedule_segments(Arc::clone(&ctx), &artifact.segments, concurrency).await?;

    progress.send(ProgressEvent::VideoCompleted {
        video: base.to_string(),
    });
    info!(video = %base, segments = artifact.segments.len(), "Video rendered");
    Ok(())
}

async fn load_cues(config: &BatchConfig, video: &Path, base: &str) -> PipelineResult<Vec<Cue>> {
    let srt_path = match &config.subtitle_source {
        SubtitleSource::External(dir) => {
            let path = dir.join(format!("{base}.srt"));
            if !path.exists() {
                return Err(PipelineError::MissingCaptions(video.to_path_buf()));
            }
            path
        }
        SubtitleSource::Embedded { track_index } => {
            // Extracted captions land next to the artifact, not inside the
            // per-video clip directory.
            tokio::fs::create_dir_all(&config.output_dir).await?;
            extract_embedded_subtitles(video, *track_index, &config.output_dir).await?
        }
    };

    let content = tokio::fs::read_to_string(&srt_path).await?;
    Ok(parse_srt(&content))
}

/// List `.mkv`/`.mp4` files in `dir`, sorted by file name.
pub async fn scan_videos(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    let mut videos = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_video = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("mkv") || e.eq_ignore_ascii_case("mp4"));
        if is_video && path.is_file() {
            videos.push(path);
        }
    }
    videos.sort();
    Ok(videos)
}

fn video_base_name(video: &Path) -> PipelineResult<String> {
    video
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            PipelineError::internal(format!("video path has no base name: {}", video.display()))
        })
}

/// Derive show/season/episode metadata from a `SxxEyy`-tagged file name.
fn source_metadata(video: &Path, base: &str) -> SourceMetadata {
    let mut metadata = SourceMetadata {
        file_path: video.display().to_string(),
        show: None,
        season: None,
        episode: None,
    };

    if let Some((offset, season, episode)) = find_episode_tag(base) {
        metadata.season = Some(season);
        metadata.episode = Some(episode);
        let show = base[..offset]
            .trim_end_matches(['-', '_', '.', ' '])
            .replace(['.', '_'], " ");
        let show = show.trim();
        if !show.is_empty() {
            metadata.show = Some(show.to_string());
        }
    }

    metadata
}

/// Find `S<digits>E<digits>` (case-insensitive) in `name`, returning the
/// tag's byte offset plus the parsed numbers.
fn find_episode_tag(name: &str) -> Option<(usize, u32, u32)> {
    let bytes = name.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if !matches!(b, b's' | b'S') {
            continue;
        }
        let rest = &name[i + 1..];
        let season_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if season_len == 0 {
            continue;
        }
        let after_season = &rest[season_len..];
        if !after_season.starts_with(['e', 'E']) {
            continue;
        }
        let ep_rest = &after_season[1..];
        let episode_len = ep_rest.bytes().take_while(u8::is_ascii_digit).count();
        if episode_len == 0 {
            continue;
        }
        let season = rest[..season_len].parse().ok()?;
        let episode = ep_rest[..episode_len].parse().ok()?;
        return Some((i, season, episode));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        DEFAULT_GAP_THRESHOLD_MS, DEFAULT_MAX_SEGMENT_DURATION_MS, DEFAULT_MIN_SEGMENT_DURATION_MS,
    };
    use subclip_models::RenditionSpec;

    #[tokio::test]
    async fn scan_filters_and_sorts_videos() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mkv", "a.mp4", "notes.txt", "c.MKV"] {
            tokio::fs::write(dir.path().join(name), b"").await.unwrap();
        }
        tokio::fs::create_dir(dir.path().join("sub.mkv")).await.unwrap();

        let videos = scan_videos(dir.path()).await.unwrap();
        let names: Vec<_> = videos
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.mkv", "c.MKV"]);
    }

    #[test]
    fn episode_tag_parsing() {
        assert_eq!(find_episode_tag("Show.Name.S01E02.1080p"), Some((10, 1, 2)));
        assert_eq!(find_episode_tag("show s3e12"), Some((5, 3, 12)));
        assert_eq!(find_episode_tag("no tag here"), None);
        assert_eq!(find_episode_tag("sXe1"), None);
    }

    #[test]
    fn metadata_from_tagged_name() {
        let meta = source_metadata(
            Path::new("/videos/Show.Name.S01E02.mkv"),
            "Show.Name.S01E02",
        );
        assert_eq!(meta.show.as_deref(), Some("Show Name"));
        assert_eq!(meta.season, Some(1));
        assert_eq!(meta.episode, Some(2));
    }

    #[test]
    fn metadata_without_tag_keeps_only_path() {
        let meta = source_metadata(Path::new("/videos/clip.mkv"), "clip");
        assert!(meta.show.is_none());
        assert!(meta.season.is_none());
        assert!(meta.episode.is_none());
        assert_eq!(meta.file_path, "/videos/clip.mkv");
    }

    fn batch_config(video_dir: &Path, output_dir: &Path, subs: &Path) -> BatchConfig {
        BatchConfig {
            video_dir: video_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            subtitle_source: SubtitleSource::External(subs.to_path_buf()),
            concurrency: 2,
            json_only: false,
            gap_threshold_ms: DEFAULT_GAP_THRESHOLD_MS,
            min_segment_duration_ms: DEFAULT_MIN_SEGMENT_DURATION_MS,
            max_segment_duration_ms: DEFAULT_MAX_SEGMENT_DURATION_MS,
            renditions: RenditionSpec::default_set(),
        }
    }

    #[tokio::test]
    async fn missing_captions_fail_only_that_video() {
        let videos = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let subs = tempfile::tempdir().unwrap();
        tokio::fs::write(videos.path().join("ep1.mkv"), b"").await.unwrap();
        tokio::fs::write(videos.path().join("ep2.mkv"), b"").await.unwrap();

        let config = batch_config(videos.path(), output.path(), subs.path());
        let transcoder = Arc::new(subclip_media::FfmpegTranscoder::new(Default::default()));
        let summary = run_batch(&config, transcoder, ProgressReporter::sink())
            .await
            .unwrap();

        // Both videos lack captions: each is an input failure, the batch
        // itself still completes.
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.processed, 0);
    }

    #[tokio::test]
    async fn empty_caption_file_yields_empty_artifact_and_marker() {
        let videos = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let subs = tempfile::tempdir().unwrap();
        tokio::fs::write(videos.path().join("ep1.mkv"), b"").await.unwrap();
        tokio::fs::write(subs.path().join("ep1.srt"), b"").await.unwrap();

        let config = batch_config(videos.path(), output.path(), subs.path());
        let transcoder = Arc::new(subclip_media::FfmpegTranscoder::new(Default::default()));
        let summary = run_batch(&config, transcoder, ProgressReporter::sink())
            .await
            .unwrap();

        assert_eq!(summary.processed, 1);
        let artifact = crate::artifact_store::read_artifact(&artifact_path(output.path(), "ep1"))
            .await
            .unwrap();
        assert!(artifact.segments.is_empty());
        assert!(is_complete(output.path(), "ep1"));
    }

    #[tokio::test]
    async fn completed_videos_are_skipped_on_rerun() {
        let videos = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let subs = tempfile::tempdir().unwrap();
        tokio::fs::write(videos.path().join("ep1.mkv"), b"").await.unwrap();
        mark_complete(output.path(), "ep1").await.unwrap();

        let config = batch_config(videos.path(), output.path(), subs.path());
        let transcoder = Arc::new(subclip_media::FfmpegTranscoder::new(Default::default()));
        let summary = run_batch(&config, transcoder, ProgressReporter::sink())
            .await
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
    }
}
