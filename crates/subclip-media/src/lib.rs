//! FFmpeg CLI wrapper for the subclip pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and execution
//! - FFprobe video/stream probing
//! - SRT caption parsing and per-segment overlay generation
//! - Embedded subtitle extraction from container files
//! - One-shot hardware encoder detection
//! - The [`Transcoder`] capability boundary and its FFmpeg implementation
//! - The output format registry (mp4/webm/gif)

pub mod command;
pub mod error;
pub mod extract;
pub mod formats;
pub mod hwaccel;
pub mod probe;
pub mod subtitle;
pub mod transcoder;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use extract::extract_embedded_subtitles;
pub use formats::{FormatRegistry, OutputFormat};
pub use hwaccel::{detect_hardware, HardwareCaps};
pub use probe::{get_fps, probe_video, SubtitleStreamInfo, VideoInfo};
pub use subtitle::{
    cleanup_overlay_files, create_overlay_files, overlay_content, parse_srt, OverlayFiles,
};
pub use transcoder::{FfmpegTranscoder, TranscodeRequest, Transcoder};
