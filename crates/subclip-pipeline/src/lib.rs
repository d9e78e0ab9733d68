//! Batch pipeline: caption analysis, clip rendering, resumable runs.

pub mod analyzer;
pub mod artifact_store;
pub mod batch;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod progress;
pub mod render_job;
pub mod scheduler;

pub use analyzer::{analyze_cues, AnalyzerConfig};
pub use batch::{run_batch, run_from_artifact, scan_videos, BatchSummary};
pub use config::{ArtifactRunConfig, BatchConfig, SubtitleSource};
pub use error::{PipelineError, PipelineResult};
pub use progress::{ProgressEvent, ProgressReporter};
pub use render_job::RenderContext;
pub use scheduler::schedule_segments;
