//! Output rendition descriptors: resolution presets and container formats.

use serde::{Deserialize, Serialize};

/// Named resolution preset used to tag rendition outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionPreset {
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "240p")]
    P240,
    #[serde(rename = "144p")]
    P144,
}

impl ResolutionPreset {
    /// Stable tag used in output filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P1080 => "1080p",
            Self::P720 => "720p",
            Self::P480 => "480p",
            Self::P360 => "360p",
            Self::P240 => "240p",
            Self::P144 => "144p",
        }
    }

    /// Target dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::P1080 => (1920, 1080),
            Self::P720 => (1280, 720),
            Self::P480 => (640, 480),
            Self::P360 => (480, 360),
            Self::P240 => (320, 240),
            Self::P144 => (256, 144),
        }
    }
}

impl std::fmt::Display for ResolutionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output container/codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Mp4,
    Webm,
    Gif,
}

impl FormatKind {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Gif => "gif",
        }
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// One requested output format and the resolutions to render it at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenditionSpec {
    pub format: FormatKind,
    pub resolutions: Vec<ResolutionPreset>,
}

impl RenditionSpec {
    pub fn new(format: FormatKind, resolutions: Vec<ResolutionPreset>) -> Self {
        Self { format, resolutions }
    }

    /// The default request set: mp4 and webm at 1080p/720p/480p, gif at
    /// 480p/360p/240p.
    pub fn default_set() -> Vec<RenditionSpec> {
        use ResolutionPreset::*;
        vec![
            RenditionSpec::new(FormatKind::Mp4, vec![P1080, P720, P480]),
            RenditionSpec::new(FormatKind::Webm, vec![P1080, P720, P480]),
            RenditionSpec::new(FormatKind::Gif, vec![P480, P360, P240]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_tags_and_dimensions() {
        assert_eq!(ResolutionPreset::P1080.as_str(), "1080p");
        assert_eq!(ResolutionPreset::P1080.dimensions(), (1920, 1080));
        assert_eq!(ResolutionPreset::P144.dimensions(), (256, 144));
    }

    #[test]
    fn format_extensions() {
        assert_eq!(FormatKind::Mp4.extension(), "mp4");
        assert_eq!(FormatKind::Webm.extension(), "webm");
        assert_eq!(FormatKind::Gif.extension(), "gif");
    }

    #[test]
    fn default_set_spans_both_axes() {
        let set = RenditionSpec::default_set();
        assert_eq!(set.len(), 3);
        let total: usize = set.iter().map(|s| s.resolutions.len()).sum();
        assert_eq!(total, 9);
    }

    #[test]
    fn preset_serde_tags() {
        let json = serde_json::to_string(&ResolutionPreset::P720).unwrap();
        assert_eq!(json, "\"720p\"");
        let back: ResolutionPreset = serde_json::from_str("\"480p\"").unwrap();
        assert_eq!(back, ResolutionPreset::P480);
    }
}
