//! Bounded-concurrency segment scheduling.
//!
//! All segments are submitted up-front in index order and gated by a
//! semaphore, so at most `concurrency` segments render at once while
//! earlier segments get first claim on permits. When a segment fails, the
//! remaining in-flight segments still run to completion before the first
//! error propagates, keeping partial output on disk consistent.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::debug;

use subclip_models::Segment;

use crate::error::{PipelineError, PipelineResult};
use crate::progress::ProgressEvent;
use crate::render_job::{render_segment, RenderContext};

/// Render all segments of one video with at most `concurrency` in flight.
pub async fn schedule_segments(
    ctx: Arc<RenderContext>,
    segments: &[Segment],
    concurrency: usize,
) -> PipelineResult<()> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

    let tasks = segments.iter().map(|segment| {
        let ctx = Arc::clone(&ctx);
        let semaphore = Arc::clone(&semaphore);
        async move {
            let _permit = semaphore
                .acquire()
                .await
                .map_err(|_| PipelineError::internal("render semaphore closed"))?;
            debug!(video = %ctx.video_name, segment = segment.index, "Segment render started");
            render_segment(&ctx, segment).await?;
            ctx.progress.send(ProgressEvent::SegmentDone {
                video: ctx.video_name.clone(),
                segment_index: segment.index,
            });
            Ok(())
        }
    });

    let results = join_all(tasks).await;
    results.into_iter().collect::<PipelineResult<Vec<_>>>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use subclip_media::{MediaError, MediaResult, OverlayFiles, TranscodeRequest, Transcoder};
    use subclip_models::{FormatKind, RenditionSpec, ResolutionPreset};

    use crate::progress::ProgressReporter;

    /// Transcoder stub that tracks peak concurrent calls and writes outputs.
    struct CountingTranscoder {
        active: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
        fail_on_segment: Option<u32>,
    }

    impl CountingTranscoder {
        fn new(fail_on_segment: Option<u32>) -> Self {
            Self {
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
                fail_on_segment,
            }
        }

        fn segment_of(req: &TranscodeRequest) -> u32 {
            // Outputs are named <fingerprint>-<segment>[-<child>]-<res>.<ext>
            let name = req.output.file_name().unwrap().to_string_lossy();
            name.split('-').nth(1).unwrap().parse().unwrap()
        }
    }

    #[async_trait]
    impl Transcoder for CountingTranscoder {
        async fn prepare_overlay(
            &self,
            segment: &Segment,
            dir: &std::path::Path,
        ) -> MediaResult<OverlayFiles> {
            let srt_path = dir.join(format!("temp_subtitle_{}.srt", segment.index));
            let ass_path = dir.join(format!("temp_subtitle_{}.ass", segment.index));
            tokio::fs::write(&srt_path, b"stub").await?;
            tokio::fs::write(&ass_path, b"stub").await?;
            Ok(OverlayFiles { srt_path, ass_path })
        }

        async fn transcode(&self, req: &TranscodeRequest) -> MediaResult<PathBuf> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on_segment == Some(Self::segment_of(req)) {
                return Err(MediaError::ffmpeg_failed("stub failure", None, Some(1)));
            }
            tokio::fs::write(&req.output, b"clip").await?;
            Ok(req.output.clone())
        }
    }

    fn segments(n: u32) -> Vec<Segment> {
        (1..=n)
            .map(|i| {
                let start = f64::from(i) * 10.0;
                Segment::new(i, start, start + 2.0, 24.0, format!("seg {i}"), None)
            })
            .collect()
    }

    fn context(dir: &std::path::Path, transcoder: Arc<CountingTranscoder>) -> Arc<RenderContext> {
        Arc::new(RenderContext {
            transcoder,
            source: PathBuf::from("/videos/ep1.mkv"),
            clip_dir: dir.to_path_buf(),
            fingerprint: "cafe".into(),
            renditions: vec![RenditionSpec::new(
                FormatKind::Mp4,
                vec![ResolutionPreset::P480],
            )],
            progress: ProgressReporter::sink(),
            video_name: "ep1".into(),
        })
    }

    #[tokio::test]
    async fn concurrency_cap_holds_across_segments() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(CountingTranscoder::new(None));
        let ctx = context(dir.path(), Arc::clone(&transcoder));

        schedule_segments(ctx, &segments(6), 2).await.unwrap();

        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 6);
        assert!(transcoder.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn failure_propagates_after_all_segments_settle() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(CountingTranscoder::new(Some(2)));
        let ctx = context(dir.path(), Arc::clone(&transcoder));

        let err = schedule_segments(ctx, &segments(4), 2).await.unwrap_err();
        assert!(matches!(err, PipelineError::Media(_)));

        // Every segment was still attempted.
        assert_eq!(transcoder.calls.load(Ordering::SeqCst), 4);
        assert!(dir.path().join("cafe-4-480p.mp4").exists());
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let transcoder = Arc::new(CountingTranscoder::new(None));
        let ctx = context(dir.path(), Arc::clone(&transcoder));

        schedule_segments(ctx, &segments(3), 0).await.unwrap();
        assert_eq!(transcoder.peak.load(Ordering::SeqCst), 1);
    }
}
