//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use subclip_models::{FormatKind, RenditionSpec, ResolutionPreset};

use crate::config::{
    ArtifactRunConfig, BatchConfig, SubtitleSource, DEFAULT_CONCURRENCY, DEFAULT_GAP_THRESHOLD_MS,
    DEFAULT_MAX_SEGMENT_DURATION_MS, DEFAULT_MIN_SEGMENT_DURATION_MS,
};

/// Batch converter that cuts videos into caption-aligned clips.
#[derive(Debug, Parser)]
#[command(name = "subclip", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze and render every video in a directory
    Process(ProcessArgs),
    /// Render clips from a previously written analysis artifact
    FromArtifact(FromArtifactArgs),
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Directory scanned for .mkv/.mp4 videos
    pub video_dir: PathBuf,

    /// Directory for artifacts, markers, and clips
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Directory holding <video>.srt files; embedded tracks are used when
    /// absent
    #[arg(long)]
    pub subtitle_dir: Option<PathBuf>,

    /// Embedded subtitle stream index (auto-selected when omitted)
    #[arg(long, conflicts_with = "subtitle_dir")]
    pub subtitle_track: Option<u32>,

    /// Segments rendered concurrently per video
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Write analysis artifacts only; skip rendering
    #[arg(long)]
    pub json_only: bool,

    /// Merge cues separated by at most this many milliseconds (0 disables)
    #[arg(long, default_value_t = DEFAULT_GAP_THRESHOLD_MS)]
    pub gap_threshold_ms: u64,

    /// Force-merge segments shorter than this many milliseconds (0 disables)
    #[arg(long, default_value_t = DEFAULT_MIN_SEGMENT_DURATION_MS)]
    pub min_duration_ms: u64,

    /// Never merge past this many milliseconds (0 disables)
    #[arg(long, default_value_t = DEFAULT_MAX_SEGMENT_DURATION_MS)]
    pub max_duration_ms: u64,

    /// Rendition request as `format:res[,res...]`, e.g. `mp4:1080p,720p`.
    /// Repeatable; the built-in set is used when omitted.
    #[arg(long = "rendition", value_parser = parse_rendition)]
    pub renditions: Vec<RenditionSpec>,
}

#[derive(Debug, Args)]
pub struct FromArtifactArgs {
    /// Path to the analysis artifact JSON
    pub artifact: PathBuf,

    /// Directory for markers and clips
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Segments rendered concurrently
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Rendition request as `format:res[,res...]`; repeatable
    #[arg(long = "rendition", value_parser = parse_rendition)]
    pub renditions: Vec<RenditionSpec>,
}

impl ProcessArgs {
    pub fn into_config(self) -> BatchConfig {
        let subtitle_source = match self.subtitle_dir {
            Some(dir) => SubtitleSource::External(dir),
            None => SubtitleSource::Embedded {
                track_index: self.subtitle_track,
            },
        };
        BatchConfig {
            video_dir: self.video_dir,
            output_dir: self.output_dir,
            subtitle_source,
            concurrency: self.concurrency,
            json_only: self.json_only,
            gap_threshold_ms: self.gap_threshold_ms,
            min_segment_duration_ms: self.min_duration_ms,
            max_segment_duration_ms: self.max_duration_ms,
            renditions: renditions_or_default(self.renditions),
        }
    }
}

impl FromArtifactArgs {
    pub fn into_config(self) -> ArtifactRunConfig {
        ArtifactRunConfig {
            artifact_path: self.artifact,
            output_dir: self.output_dir,
            concurrency: self.concurrency,
            renditions: renditions_or_default(self.renditions),
        }
    }
}

fn renditions_or_default(requested: Vec<RenditionSpec>) -> Vec<RenditionSpec> {
    if requested.is_empty() {
        RenditionSpec::default_set()
    } else {
        requested
    }
}

/// Parse `format:res[,res...]` into a rendition spec.
fn parse_rendition(raw: &str) -> Result<RenditionSpec, String> {
    let (format, resolutions) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `format:res[,res...]`, got `{raw}`"))?;

    let format = match format.trim().to_ascii_lowercase().as_str() {
        "mp4" => FormatKind::Mp4,
        "webm" => FormatKind::Webm,
        "gif" => FormatKind::Gif,
        other => return Err(format!("unknown format `{other}` (mp4, webm, gif)")),
    };

    let resolutions = resolutions
        .split(',')
        .map(|r| match r.trim() {
            "1080p" => Ok(ResolutionPreset::P1080),
            "720p" => Ok(ResolutionPreset::P720),
            "480p" => Ok(ResolutionPreset::P480),
            "360p" => Ok(ResolutionPreset::P360),
            "240p" => Ok(ResolutionPreset::P240),
            "144p" => Ok(ResolutionPreset::P144),
            other => Err(format!("unknown resolution `{other}`")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if resolutions.is_empty() {
        return Err(format!("no resolutions in `{raw}`"));
    }
    Ok(RenditionSpec::new(format, resolutions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendition_parser_accepts_valid_specs() {
        let spec = parse_rendition("mp4:1080p,720p").unwrap();
        assert_eq!(spec.format, FormatKind::Mp4);
        assert_eq!(
            spec.resolutions,
            vec![ResolutionPreset::P1080, ResolutionPreset::P720]
        );

        let spec = parse_rendition("GIF: 480p").unwrap();
        assert_eq!(spec.format, FormatKind::Gif);
    }

    #[test]
    fn rendition_parser_rejects_bad_input() {
        assert!(parse_rendition("mp4").is_err());
        assert!(parse_rendition("avi:480p").is_err());
        assert!(parse_rendition("mp4:999p").is_err());
    }

    #[test]
    fn process_args_build_external_subtitle_config() {
        let cli = Cli::parse_from([
            "subclip",
            "process",
            "/videos",
            "-o",
            "/out",
            "--subtitle-dir",
            "/subs",
            "--json-only",
        ]);
        let Command::Process(args) = cli.command else {
            panic!("expected process subcommand");
        };
        let config = args.into_config();
        assert!(matches!(config.subtitle_source, SubtitleSource::External(_)));
        assert!(config.json_only);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.renditions, RenditionSpec::default_set());
    }

    #[test]
    fn process_args_default_to_embedded_subtitles() {
        let cli = Cli::parse_from([
            "subclip",
            "process",
            "/videos",
            "-o",
            "/out",
            "--subtitle-track",
            "2",
            "--rendition",
            "mp4:480p",
        ]);
        let Command::Process(args) = cli.command else {
            panic!("expected process subcommand");
        };
        let config = args.into_config();
        assert!(matches!(
            config.subtitle_source,
            SubtitleSource::Embedded {
                track_index: Some(2)
            }
        ));
        assert_eq!(config.renditions.len(), 1);
    }

    #[test]
    fn from_artifact_args_build_config() {
        let cli = Cli::parse_from(["subclip", "from-artifact", "/out/ep1.json", "-o", "/out"]);
        let Command::FromArtifact(args) = cli.command else {
            panic!("expected from-artifact subcommand");
        };
        let config = args.into_config();
        assert_eq!(config.artifact_path, PathBuf::from("/out/ep1.json"));
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }
}
