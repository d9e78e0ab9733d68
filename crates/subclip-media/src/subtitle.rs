//! SRT caption parsing and per-segment overlay generation.
//!
//! Parsing is tolerant: malformed blocks are dropped rather than failing
//! the file, and the SRT comma-millisecond timecodes are normalized to the
//! canonical dot form.

use std::path::{Path, PathBuf};

use tracing::debug;

use subclip_models::{format_timestamp, Cue, Segment};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Parse SRT content into ordered cues.
///
/// A timing line (`HH:MM:SS,mmm --> HH:MM:SS,mmm`) opens an entry; the
/// following non-blank lines accumulate as its text, joined with `\n`; a
/// blank line closes it. Entries missing either stamp are discarded.
pub fn parse_srt(content: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut current = Cue::new("", "", "");
    let mut reading_text = false;

    for raw_line in content.lines() {
        let line = raw_line.trim();

        if line.is_empty() {
            if !current.start.is_empty() && !current.end.is_empty() {
                cues.push(current.clone());
            }
            current = Cue::new("", "", "");
            reading_text = false;
            continue;
        }

        if let Some((start, end)) = parse_timing_line(line) {
            current.start = start;
            current.end = end;
            current.text.clear();
            reading_text = true;
        } else if reading_text {
            if !current.text.is_empty() {
                current.text.push('\n');
            }
            current.text.push_str(line);
        }
    }

    if !current.start.is_empty() && !current.end.is_empty() {
        cues.push(current);
    }

    cues
}

/// Parse `HH:MM:SS,mmm --> HH:MM:SS,mmm` (dot variant also accepted),
/// returning normalized dot-form stamps.
fn parse_timing_line(line: &str) -> Option<(String, String)> {
    let (start, end) = line.split_once("-->")?;
    let start = normalize_stamp(start.trim())?;
    let end = normalize_stamp(end.trim())?;
    Some((start, end))
}

fn normalize_stamp(stamp: &str) -> Option<String> {
    let normalized = stamp.replace(',', ".");
    let bytes = normalized.as_bytes();
    // HH:MM:SS.mmm is exactly 12 bytes with separators in fixed positions.
    if bytes.len() != 12 || bytes[2] != b':' || bytes[5] != b':' || bytes[8] != b'.' {
        return None;
    }
    let digits_ok = normalized
        .char_indices()
        .all(|(i, c)| matches!(i, 2 | 5 | 8) || c.is_ascii_digit());
    digits_ok.then_some(normalized)
}

/// Paths of the temporary overlay files created for one segment.
#[derive(Debug, Clone)]
pub struct OverlayFiles {
    pub srt_path: PathBuf,
    pub ass_path: PathBuf,
}

/// Build the SRT overlay content for a segment.
///
/// Merged segments emit one entry per child with the child's original
/// absolute timing; singleton segments emit a single whole-span entry.
/// Embedded line breaks become ASS `\N` escapes.
pub fn overlay_content(segment: &Segment) -> String {
    let mut content = String::new();
    let mut srt_index = 1u32;

    match &segment.child_segments {
        Some(children) => {
            for child in children {
                push_entry(
                    &mut content,
                    srt_index,
                    child.start_time,
                    child.end_time,
                    &child.text,
                );
                srt_index += 1;
            }
        }
        None => {
            push_entry(
                &mut content,
                srt_index,
                segment.start_time,
                segment.end_time,
                &segment.caption,
            );
        }
    }

    content
}

fn push_entry(content: &mut String, index: u32, start: f64, end: f64, text: &str) {
    let escaped = text.replace('\n', "\\N");
    content.push_str(&format!(
        "{}\n{} --> {}\n{}\n\n",
        index,
        format_timestamp(start),
        format_timestamp(end),
        escaped
    ));
}

/// Write the segment's SRT overlay and convert it to ASS with FFmpeg.
///
/// Returns both temp paths; the caller removes them once rendering is done.
pub async fn create_overlay_files(
    segment: &Segment,
    output_dir: impl AsRef<Path>,
) -> MediaResult<OverlayFiles> {
    let output_dir = output_dir.as_ref();
    let srt_path = output_dir.join(format!("temp_subtitle_{}.srt", segment.index));
    let ass_path = output_dir.join(format!("temp_subtitle_{}.ass", segment.index));

    tokio::fs::write(&srt_path, overlay_content(segment)).await?;

    debug!(
        segment = segment.index,
        "Converting overlay {} -> {}",
        srt_path.display(),
        ass_path.display()
    );
    let cmd = FfmpegCommand::new(&srt_path, &ass_path);
    FfmpegRunner::new().run(&cmd).await?;

    Ok(OverlayFiles { srt_path, ass_path })
}

/// Remove the temporary overlay files, best effort.
pub async fn cleanup_overlay_files(files: &OverlayFiles) {
    for path in [&files.srt_path, &files.ass_path] {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::debug!("Failed to remove overlay file {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subclip_models::{ChildSegment, Segment};

    #[test]
    fn parses_entries_and_normalizes_commas() {
        let content = "1\n00:00:01,000 --> 00:00:04,000\nFirst subtitle\n\n2\n00:00:05,500 --> 00:00:08,500\nSecond subtitle\n";
        let cues = parse_srt(content);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].start, "00:00:01.000");
        assert_eq!(cues[0].end, "00:00:04.000");
        assert_eq!(cues[0].text, "First subtitle");
        assert_eq!(cues[1].start, "00:00:05.500");
    }

    #[test]
    fn preserves_embedded_line_breaks() {
        let content = "1\n00:00:01,000 --> 00:00:04,000\nline one\nline two\n";
        let cues = parse_srt(content);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "line one\nline two");
    }

    #[test]
    fn empty_and_malformed_content_yield_no_cues() {
        assert!(parse_srt("").is_empty());
        assert!(parse_srt("Invalid content").is_empty());
        assert!(parse_srt("1\n00:00:01,000 --> garbage\ntext\n").is_empty());
    }

    #[test]
    fn overlay_uses_child_absolute_timing() {
        let children = vec![
            ChildSegment { start_time: 0.0, end_time: 2.0, text: "Hi.".into() },
            ChildSegment { start_time: 2.3, end_time: 4.0, text: "there\nfriend".into() },
        ];
        let seg = Segment::new(1, 0.0, 4.0, 24.0, "Hi.\nthere\nfriend".into(), Some(children));
        let content = overlay_content(&seg);
        assert!(content.contains("1\n00:00:00.000 --> 00:00:02.000\nHi.\n"));
        assert!(content.contains("2\n00:00:02.300 --> 00:00:04.000\nthere\\Nfriend\n"));
    }

    #[test]
    fn overlay_falls_back_to_whole_segment() {
        let seg = Segment::new(3, 9.0, 11.0, 24.0, "End.".into(), None);
        let content = overlay_content(&seg);
        assert_eq!(content, "1\n00:00:09.000 --> 00:00:11.000\nEnd.\n\n");
    }
}
