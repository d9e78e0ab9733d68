//! WebM (VP9/Opus) output format.

use std::path::Path;

use subclip_models::ResolutionPreset;

use super::{overlay_scale_filter, OutputFormat};

/// VP9 WebM renditions. Uses NVENC when the hardware supports it.
#[derive(Debug, Clone)]
pub struct WebmFormat {
    nvenc: bool,
}

impl WebmFormat {
    pub fn new(nvenc: bool) -> Self {
        Self { nvenc }
    }
}

impl OutputFormat for WebmFormat {
    fn extension(&self) -> &'static str {
        "webm"
    }

    fn encoding_args(&self, overlay: &Path, preset: ResolutionPreset) -> Vec<String> {
        let mut args: Vec<String> = vec!["-c:v".into()];
        if self.nvenc {
            args.extend(["vp9_nvenc".into(), "-preset".into(), "p4".into(), "-tune".into(), "hq".into()]);
        } else {
            args.push("libvpx-vp9".into());
        }

        // Downmix to stereo: complex source layouts (5.1) trip libopus.
        args.extend([
            "-c:a".into(),
            "libopus".into(),
            "-b:a".into(),
            "192k".into(),
            "-ac".into(),
            "2".into(),
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
        ]);
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn software_encoder_without_nvenc() {
        let args = WebmFormat::new(false).encoding_args(&PathBuf::from("s.ass"), ResolutionPreset::P720);
        assert!(args.contains(&"libvpx-vp9".to_string()));
        assert!(!args.contains(&"vp9_nvenc".to_string()));
        assert!(args.contains(&"libopus".to_string()));
    }

    #[test]
    fn nvenc_encoder_when_available() {
        let args = WebmFormat::new(true).encoding_args(&PathBuf::from("s.ass"), ResolutionPreset::P720);
        assert!(args.contains(&"vp9_nvenc".to_string()));
        assert!(args.contains(&"p4".to_string()));
    }
}
