//! Hardware encoder capability detection.
//!
//! Probed once at process start and injected into the transcoder
//! configuration; never re-queried per job.

use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

/// Hardware capabilities relevant to encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareCaps {
    /// NVIDIA NVENC encoders are available in this FFmpeg build.
    pub nvenc: bool,
}

/// Detect hardware encoder support by listing FFmpeg's encoders.
///
/// Any failure (FFmpeg missing, command error) reports no hardware support
/// rather than failing the run.
pub async fn detect_hardware() -> HardwareCaps {
    let nvenc = match Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
    {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).contains("h264_nvenc")
        }
        _ => false,
    };

    info!(nvenc, "Hardware encoder detection complete");
    HardwareCaps { nvenc }
}
