//! Batch subtitle-clip converter binary.

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use subclip_media::{check_ffmpeg, check_ffprobe, detect_hardware, FfmpegTranscoder};
use subclip_pipeline::cli::{Cli, Command};
use subclip_pipeline::{run_batch, run_from_artifact, ProgressReporter};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("subclip=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let cli = Cli::parse();

    if let Err(e) = check_ffmpeg() {
        error!("FFmpeg unavailable: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = check_ffprobe() {
        error!("FFprobe unavailable: {}", e);
        std::process::exit(1);
    }

    // Hardware is probed once; every rendition reuses the answer.
    let caps = detect_hardware().await;
    info!(nvenc = caps.nvenc, "Hardware encoder scan complete");
    let transcoder = Arc::new(FfmpegTranscoder::new(caps));

    let (progress, progress_task) = ProgressReporter::spawn();

    let result = match cli.command {
        Command::Process(args) => {
            let config = args.into_config();
            info!(video_dir = %config.video_dir.display(), "Starting batch run");
            run_batch(&config, transcoder, progress.clone()).await.map(|summary| {
                info!(
                    processed = summary.processed,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    "Run complete"
                );
                summary.failed
            })
        }
        Command::FromArtifact(args) => {
            let config = args.into_config();
            info!(artifact = %config.artifact_path.display(), "Rendering from artifact");
            run_from_artifact(&config, transcoder, progress.clone()).await.map(|()| 0)
        }
    };

    drop(progress);
    progress_task.await.ok();

    match result {
        Err(e) => {
            error!("Pipeline error: {}", e);
            std::process::exit(1);
        }
        Ok(failed) if failed > 0 => {
            error!(failed, "Some videos failed");
            std::process::exit(1);
        }
        Ok(_) => {}
    }
}
