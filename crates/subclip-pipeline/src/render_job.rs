//! Rendering one segment into its clip files.
//!
//! Each segment renders its sub-clips (one per merged child cue) and then
//! the full merged span. Sub-clip failures are logged and swallowed so one
//! bad child never loses the whole segment; a failure on the full span
//! aborts the video. Every rendition checks for an existing output file
//! first, which is what makes interrupted runs resumable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use subclip_media::{cleanup_overlay_files, MediaResult, TranscodeRequest, Transcoder};
use subclip_models::{format_timestamp, FormatKind, RenditionSpec, ResolutionPreset, Segment};

use crate::error::PipelineResult;
use crate::progress::{ProgressEvent, ProgressReporter};

/// Everything a segment render needs; shared across the batch via `Arc`.
pub struct RenderContext {
    pub transcoder: Arc<dyn Transcoder>,
    pub source: PathBuf,
    pub clip_dir: PathBuf,
    pub fingerprint: String,
    pub renditions: Vec<RenditionSpec>,
    pub progress: ProgressReporter,
    pub video_name: String,
}

impl RenderContext {
    /// Output file name for one rendition of a (sub-)clip.
    fn clip_file_name(
        &self,
        segment_index: u32,
        child: Option<u32>,
        format: FormatKind,
        resolution: ResolutionPreset,
    ) -> String {
        match child {
            Some(child) => format!(
                "{}-{}-{}-{}.{}",
                self.fingerprint,
                segment_index,
                child,
                resolution.as_str(),
                format.extension()
            ),
            None => format!(
                "{}-{}-{}.{}",
                self.fingerprint,
                segment_index,
                resolution.as_str(),
                format.extension()
            ),
        }
    }

    fn renditions_per_clip(&self) -> usize {
        self.renditions.iter().map(|s| s.resolutions.len()).sum()
    }

    /// Renditions produced per segment, counting each sub-clip.
    pub fn renditions_per_segment(&self, segment: &Segment) -> u64 {
        (self.renditions_per_clip() * (segment.child_count() + 1)) as u64
    }
}

/// Render one segment: every child sub-clip, then the merged span.
pub async fn render_segment(ctx: &RenderContext, segment: &Segment) -> PipelineResult<()> {
    tokio::fs::create_dir_all(&ctx.clip_dir).await?;
    let overlay = ctx.transcoder.prepare_overlay(segment, &ctx.clip_dir).await?;

    let result = render_segment_inner(ctx, segment, &overlay.ass_path).await;
    cleanup_overlay_files(&overlay).await;
    result
}

async fn render_segment_inner(
    ctx: &RenderContext,
    segment: &Segment,
    overlay: &Path,
) -> PipelineResult<()> {
    if let Some(children) = &segment.child_segments {
        for (ordinal, child) in children.iter().enumerate() {
            let child_index = ordinal as u32 + 1;
            let start = format_timestamp(child.start_time);
            let end = format_timestamp(child.end_time);
            if let Err(error) =
                render_clip(ctx, segment.index, Some(child_index), &start, &end, overlay).await
            {
                warn!(
                    video = %ctx.video_name,
                    segment = segment.index,
                    child = child_index,
                    %error,
                    "Sub-clip rendition failed; continuing with remaining clips"
                );
            }
        }
    }

    render_clip(
        ctx,
        segment.index,
        None,
        &segment.start_stamp,
        &segment.end_stamp,
        overlay,
    )
    .await?;

    info!(
        video = %ctx.video_name,
        segment = segment.index,
        children = segment.child_count(),
        "Segment rendered"
    );
    Ok(())
}

/// Render every configured rendition of one clip span.
///
/// Formats fan out concurrently, and resolutions within each format fan out
/// concurrently below them. All renditions run to completion; the first
/// error is reported after.
async fn render_clip(
    ctx: &RenderContext,
    segment_index: u32,
    child: Option<u32>,
    start_stamp: &str,
    end_stamp: &str,
    overlay: &Path,
) -> MediaResult<()> {
    let format_futures = ctx.renditions.iter().map(|spec| async move {
        let rendition_futures = spec.resolutions.iter().map(|&resolution| {
            render_one(
                ctx,
                segment_index,
                child,
                start_stamp,
                end_stamp,
                overlay,
                spec.format,
                resolution,
            )
        });
        join_all(rendition_futures)
            .await
            .into_iter()
            .collect::<MediaResult<Vec<_>>>()
    });

    join_all(format_futures)
        .await
        .into_iter()
        .collect::<MediaResult<Vec<_>>>()?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn render_one(
    ctx: &RenderContext,
    segment_index: u32,
    child: Option<u32>,
    start_stamp: &str,
    end_stamp: &str,
    overlay: &Path,
    format: FormatKind,
    resolution: ResolutionPreset,
) -> MediaResult<PathBuf> {
    let output = ctx
        .clip_dir
        .join(ctx.clip_file_name(segment_index, child, format, resolution));

    if output.exists() {
        debug!(path = %output.display(), "Output exists; skipping rendition");
        ctx.progress.send(ProgressEvent::RenditionDone {
            video: ctx.video_name.clone(),
            skipped: true,
        });
        return Ok(output);
    }

    let request = TranscodeRequest {
        source: ctx.source.clone(),
        start_stamp: start_stamp.to_string(),
        end_stamp: end_stamp.to_string(),
        overlay: overlay.to_path_buf(),
        format,
        resolution,
        output: output.clone(),
    };
    let produced = ctx.transcoder.transcode(&request).await?;
    ctx.progress.send(ProgressEvent::RenditionDone {
        video: ctx.video_name.clone(),
        skipped: false,
    });
    Ok(produced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use subclip_media::{FfmpegTranscoder, HardwareCaps};
    use subclip_models::ChildSegment;

    fn context() -> RenderContext {
        RenderContext {
            transcoder: Arc::new(FfmpegTranscoder::new(HardwareCaps::default())),
            source: PathBuf::from("/videos/ep1.mkv"),
            clip_dir: PathBuf::from("/out/ep1"),
            fingerprint: "deadbeef".into(),
            renditions: vec![
                RenditionSpec::new(FormatKind::Mp4, vec![ResolutionPreset::P720]),
                RenditionSpec::new(
                    FormatKind::Gif,
                    vec![ResolutionPreset::P480, ResolutionPreset::P240],
                ),
            ],
            progress: ProgressReporter::sink(),
            video_name: "ep1".into(),
        }
    }

    #[test]
    fn whole_segment_file_name_has_no_child_index() {
        let ctx = context();
        let name = ctx.clip_file_name(3, None, FormatKind::Mp4, ResolutionPreset::P720);
        assert_eq!(name, "deadbeef-3-720p.mp4");
    }

    #[test]
    fn sub_clip_file_name_carries_child_index() {
        let ctx = context();
        let name = ctx.clip_file_name(3, Some(2), FormatKind::Gif, ResolutionPreset::P480);
        assert_eq!(name, "deadbeef-3-2-480p.gif");
    }

    #[test]
    fn rendition_count_includes_sub_clips() {
        let ctx = context();
        let plain = Segment::new(1, 0.0, 2.0, 24.0, "a".into(), None);
        assert_eq!(ctx.renditions_per_segment(&plain), 3);

        let merged = Segment::new(
            2,
            0.0,
            4.0,
            24.0,
            "a\nb".into(),
            Some(vec![
                ChildSegment {
                    start_time: 0.0,
                    end_time: 2.0,
                    text: "a".into(),
                },
                ChildSegment {
                    start_time: 2.3,
                    end_time: 4.0,
                    text: "b".into(),
                },
            ]),
        );
        assert_eq!(ctx.renditions_per_segment(&merged), 9);
    }
}
