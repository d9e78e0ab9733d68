//! Output format capabilities.
//!
//! Each output format exposes its file extension and the FFmpeg output
//! arguments it needs for a given overlay and resolution. Formats are
//! selected from configuration through [`FormatRegistry`] rather than
//! through an inheritance hierarchy.

use std::path::Path;

use subclip_models::{FormatKind, ResolutionPreset};

use crate::error::{MediaError, MediaResult};
use crate::hwaccel::HardwareCaps;

pub mod gif;
pub mod mp4;
pub mod webm;

pub use gif::GifFormat;
pub use mp4::Mp4Format;
pub use webm::WebmFormat;

/// One concrete output format's encoding capability.
pub trait OutputFormat: Send + Sync {
    /// File extension for outputs of this format.
    fn extension(&self) -> &'static str;

    /// FFmpeg output arguments for one rendition: overlay burn-in, scaling,
    /// codecs, and any format-specific flags.
    fn encoding_args(&self, overlay: &Path, preset: ResolutionPreset) -> Vec<String>;
}

/// Registry resolving configured format kinds to their implementations.
pub struct FormatRegistry {
    caps: HardwareCaps,
}

impl FormatRegistry {
    /// Build a registry with the hardware capabilities detected at startup.
    pub fn new(caps: HardwareCaps) -> Self {
        Self { caps }
    }

    /// Resolve a format kind to its capability implementation.
    pub fn get(&self, kind: FormatKind) -> MediaResult<Box<dyn OutputFormat>> {
        match kind {
            FormatKind::Mp4 => Ok(Box::new(Mp4Format::new())),
            FormatKind::Webm => Ok(Box::new(WebmFormat::new(self.caps.nvenc))),
            FormatKind::Gif => Ok(Box::new(GifFormat::new())),
        }
    }
}

/// Build the combined subtitle-burn-in + scale filter chain.
pub(crate) fn overlay_scale_filter(overlay: &Path, preset: ResolutionPreset) -> String {
    let (width, height) = preset.dimensions();
    // FFmpeg's ass filter wants forward slashes even on Windows paths.
    let overlay = overlay.to_string_lossy().replace('\\', "/");
    format!("ass='{}',scale={}:{}", overlay, width, height)
}
