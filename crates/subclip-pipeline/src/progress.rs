//! Progress reporting over a channel.
//!
//! Render tasks publish events through a cheap-clone [`ProgressReporter`];
//! a single consumer task owns the terminal state and draws one indicatif
//! bar per video. Dropping every reporter ends the consumer.

use std::collections::HashMap;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Events emitted while a batch renders.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Rendering started for a video with the given totals.
    VideoStarted {
        video: String,
        total_segments: u64,
        total_renditions: u64,
    },
    /// One rendition finished (or was skipped as already present).
    RenditionDone { video: String, skipped: bool },
    /// One segment finished all of its renditions.
    SegmentDone { video: String, segment_index: u32 },
    /// Every segment of the video rendered.
    VideoCompleted { video: String },
    /// The video was abandoned with an error.
    VideoFailed { video: String, message: String },
}

/// Handle for publishing progress events.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ProgressReporter {
    /// Build a reporter plus the consumer task that renders its events.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(consume(rx));
        (Self { tx }, handle)
    }

    /// Build a reporter whose events are discarded. Used by artifact-only
    /// paths and tests.
    pub fn sink() -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        Self { tx }
    }

    pub fn send(&self, event: ProgressEvent) {
        // A closed consumer only means we stop drawing bars.
        let _ = self.tx.send(event);
    }
}

struct VideoBar {
    bar: ProgressBar,
    total_segments: u64,
    segments_done: u64,
}

async fn consume(mut rx: mpsc::UnboundedReceiver<ProgressEvent>) {
    let multi = MultiProgress::new();
    let style = ProgressStyle::with_template("{prefix:.bold} [{bar:30}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    let mut bars: HashMap<String, VideoBar> = HashMap::new();

    while let Some(event) = rx.recv().await {
        match event {
            ProgressEvent::VideoStarted {
                video,
                total_segments,
                total_renditions,
            } => {
                let bar = multi.add(ProgressBar::new(total_renditions));
                bar.set_style(style.clone());
                bar.set_prefix(video.clone());
                bars.insert(
                    video,
                    VideoBar {
                        bar,
                        total_segments,
                        segments_done: 0,
                    },
                );
            }
            ProgressEvent::RenditionDone { video, skipped } => {
                if let Some(entry) = bars.get(&video) {
                    entry.bar.inc(1);
                    if skipped {
                        entry.bar.set_message("skipped existing");
                    }
                }
            }
            ProgressEvent::SegmentDone { video, segment_index } => {
                if let Some(entry) = bars.get_mut(&video) {
                    entry.segments_done += 1;
                    entry.bar.set_message(format!(
                        "segment {} done ({}/{})",
                        segment_index, entry.segments_done, entry.total_segments
                    ));
                }
            }
            ProgressEvent::VideoCompleted { video } => {
                if let Some(entry) = bars.remove(&video) {
                    entry.bar.finish_with_message("done");
                }
            }
            ProgressEvent::VideoFailed { video, message } => {
                if let Some(entry) = bars.remove(&video) {
                    entry.bar.abandon_with_message(format!("failed: {message}"));
                } else {
                    warn!(%video, %message, "Video failed before rendering began");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sink_reporter_accepts_events() {
        let reporter = ProgressReporter::sink();
        reporter.send(ProgressEvent::VideoStarted {
            video: "ep1".into(),
            total_segments: 3,
            total_renditions: 9,
        });
        reporter.send(ProgressEvent::VideoCompleted { video: "ep1".into() });
    }

    #[tokio::test]
    async fn consumer_drains_and_exits_when_reporters_drop() {
        let (reporter, handle) = ProgressReporter::spawn();
        reporter.send(ProgressEvent::VideoStarted {
            video: "ep1".into(),
            total_segments: 1,
            total_renditions: 2,
        });
        reporter.send(ProgressEvent::RenditionDone {
            video: "ep1".into(),
            skipped: false,
        });
        reporter.send(ProgressEvent::SegmentDone {
            video: "ep1".into(),
            segment_index: 1,
        });
        reporter.send(ProgressEvent::VideoFailed {
            video: "ep1".into(),
            message: "boom".into(),
        });
        drop(reporter);
        handle.await.unwrap();
    }
}
