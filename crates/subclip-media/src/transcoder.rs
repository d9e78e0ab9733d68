//! The external transcoder boundary.
//!
//! The pipeline talks to transcoding only through [`Transcoder`]; the
//! FFmpeg-backed implementation lives here, and tests substitute stubs.
//! Identical requests are safe to re-issue; the caller performs its own
//! output-existence check before invoking.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use subclip_models::{FormatKind, ResolutionPreset, Segment};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::formats::FormatRegistry;
use crate::hwaccel::HardwareCaps;
use crate::subtitle::{create_overlay_files, OverlayFiles};

/// One rendition request: a time range of the source, a caption overlay,
/// and a target format/resolution.
#[derive(Debug, Clone)]
pub struct TranscodeRequest {
    /// Source video file
    pub source: PathBuf,
    /// Absolute start timecode (`HH:MM:SS.mmm`)
    pub start_stamp: String,
    /// Absolute end timecode (`HH:MM:SS.mmm`)
    pub end_stamp: String,
    /// ASS overlay to burn in
    pub overlay: PathBuf,
    /// Target container/codec family
    pub format: FormatKind,
    /// Target resolution
    pub resolution: ResolutionPreset,
    /// Output file to produce
    pub output: PathBuf,
}

/// Capability to turn one rendition request into a media file.
///
/// Overlay preparation lives on the same boundary so callers never touch
/// the external toolchain directly.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Build the caption overlay files for one segment in `dir`.
    async fn prepare_overlay(&self, segment: &Segment, dir: &Path) -> MediaResult<OverlayFiles>;

    /// Produce `req.output`, or fail.
    async fn transcode(&self, req: &TranscodeRequest) -> MediaResult<PathBuf>;
}

/// FFmpeg-backed transcoder.
pub struct FfmpegTranscoder {
    registry: FormatRegistry,
    runner: FfmpegRunner,
}

impl FfmpegTranscoder {
    /// Create a transcoder with the hardware capabilities detected at
    /// process start.
    pub fn new(caps: HardwareCaps) -> Self {
        Self {
            registry: FormatRegistry::new(caps),
            runner: FfmpegRunner::new(),
        }
    }

    fn build_command(&self, req: &TranscodeRequest) -> MediaResult<FfmpegCommand> {
        let format = self.registry.get(req.format)?;
        let args = format.encoding_args(&req.overlay, req.resolution);
        Ok(FfmpegCommand::new(&req.source, &req.output)
            .seek_to(req.start_stamp.clone())
            .stop_at(req.end_stamp.clone())
            .output_args(args))
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn prepare_overlay(&self, segment: &Segment, dir: &Path) -> MediaResult<OverlayFiles> {
        create_overlay_files(segment, dir).await
    }

    async fn transcode(&self, req: &TranscodeRequest) -> MediaResult<PathBuf> {
        debug!(
            format = %req.format,
            resolution = %req.resolution,
            "Transcoding {} [{} - {}] -> {}",
            req.source.display(),
            req.start_stamp,
            req.end_stamp,
            req.output.display()
        );

        let cmd = self.build_command(req)?;
        self.runner.run(&cmd).await?;
        Ok(req.output.clone())
    }
}
