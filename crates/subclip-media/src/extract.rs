//! Embedded subtitle extraction from container files.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::{probe_video, SubtitleStreamInfo};

/// Extract a subtitle track from a container (typically MKV) to
/// `<output_dir>/<videoBaseName>.srt`.
///
/// With an explicit `track_index`, that container stream index must exist as
/// a subtitle stream. Without one, the first English-tagged subtitle stream
/// is selected, falling back to the first subtitle stream.
pub async fn extract_embedded_subtitles(
    video_path: impl AsRef<Path>,
    track_index: Option<u32>,
    output_dir: impl AsRef<Path>,
) -> MediaResult<PathBuf> {
    let video_path = video_path.as_ref();
    let output_dir = output_dir.as_ref();

    let info = probe_video(video_path).await?;
    if info.subtitle_streams.is_empty() {
        return Err(MediaError::NoSubtitleStream(video_path.to_path_buf()));
    }

    let selected = select_track(&info.subtitle_streams, track_index).ok_or(
        MediaError::SubtitleTrackNotFound {
            track: track_index.unwrap_or(0),
            path: video_path.to_path_buf(),
        },
    )?;

    let output_path = extraction_target(video_path, output_dir)?;

    info!(
        "Extracting subtitle stream #{} ({}) from {} to {}",
        selected.index,
        selected.language.as_deref().unwrap_or("unknown"),
        video_path.display(),
        output_path.display()
    );

    let cmd = FfmpegCommand::new(video_path, &output_path)
        .map_stream(format!("0:{}", selected.index));
    FfmpegRunner::new().run(&cmd).await?;

    if !output_path.exists() {
        return Err(MediaError::ffmpeg_failed(
            "Subtitle extraction produced no output file",
            None,
            None,
        ));
    }

    Ok(output_path)
}

/// Destination for an extracted track: `<output_dir>/<videoBaseName>.srt`,
/// a sibling of the analysis artifact rather than a clip-directory file.
fn extraction_target(video_path: &Path, output_dir: &Path) -> MediaResult<PathBuf> {
    let base_name = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| MediaError::InvalidVideo(video_path.display().to_string()))?;
    Ok(output_dir.join(format!("{}.srt", base_name)))
}

/// Pick the subtitle stream to extract.
fn select_track(
    streams: &[SubtitleStreamInfo],
    track_index: Option<u32>,
) -> Option<&SubtitleStreamInfo> {
    match track_index {
        Some(idx) => streams.iter().find(|s| s.index == idx),
        None => streams
            .iter()
            .find(|s| {
                matches!(
                    s.language.as_deref().map(str::to_ascii_lowercase).as_deref(),
                    Some("eng") | Some("en")
                )
            })
            .or_else(|| streams.first()),
    }
}
