//! MP4 (H.264) output format.

use std::path::Path;

use subclip_models::ResolutionPreset;

use super::{overlay_scale_filter, OutputFormat};

/// H.264 MP4 renditions with the source audio copied through.
#[derive(Debug, Clone, Default)]
pub struct Mp4Format;

impl Mp4Format {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormat for Mp4Format {
    fn extension(&self) -> &'static str {
        "mp4"
    }

    fn encoding_args(&self, overlay: &Path, preset: ResolutionPreset) -> Vec<String> {
        vec![
            "-c:v".into(),
            "libx264".into(),
            "-c:a".into(),
            "copy".into(),
            "-map".into(),
            "0:v:0".into(),
            "-map".into(),
            "0:a:0".into(),
            "-copyts".into(),
            "-start_at_zero".into(),
            "-q:v".into(),
            "60".into(),
            "-vf".into(),
            overlay_scale_filter(overlay, preset),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn args_contain_codec_and_overlay() {
        let args = Mp4Format::new().encoding_args(&PathBuf::from("/tmp/s.ass"), ResolutionPreset::P1080);
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"-copyts".to_string()));
        assert!(args.iter().any(|a| a.contains("ass='/tmp/s.ass'")));
        assert!(args.iter().any(|a| a.contains("scale=1920:1080")));
    }
}
