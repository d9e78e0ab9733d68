//! Animated GIF output format.

use std::path::Path;

use subclip_models::ResolutionPreset;

use super::{overlay_scale_filter, OutputFormat};

/// Looping GIF renditions at a reduced frame rate, no audio.
#[derive(Debug, Clone, Default)]
pub struct GifFormat;

impl GifFormat {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormat for GifFormat {
    fn extension(&self) -> &'static str {
        "gif"
    }

    fn encoding_args(&self, overlay: &Path, preset: ResolutionPreset) -> Vec<String> {
        vec![
            "-filter_complex".into(),
            overlay_scale_filter(overlay, preset),
            "-r".into(),
            "24".into(),
            "-loop".into(),
            "0".into(),
            "-an".into(),
        ]
    }
}
