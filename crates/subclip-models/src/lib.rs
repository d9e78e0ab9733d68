//! Shared data models for the subclip pipeline.
//!
//! Pure types only: timecodes, caption cues, clip segments, rendition
//! descriptors, and the persisted analysis artifact. No IO happens here.

pub mod artifact;
pub mod cue;
pub mod rendition;
pub mod segment;
pub mod timestamp;

pub use artifact::{filename_fingerprint, AnalysisArtifact, FingerprintError, SourceMetadata};
pub use cue::Cue;
pub use rendition::{FormatKind, RenditionSpec, ResolutionPreset};
pub use segment::{ChildSegment, Segment};
pub use timestamp::{format_timestamp, parse_timestamp, TimestampError};
