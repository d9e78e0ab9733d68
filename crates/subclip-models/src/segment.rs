//! Clip segments produced by the analyzer.
//!
//! Field names serialize in camelCase for compatibility with existing
//! analysis artifacts.

use serde::{Deserialize, Serialize};

use crate::timestamp::format_timestamp;

/// One original cue's timing preserved inside a merged segment.
///
/// Children keep the cue's original *absolute* start/end, not a
/// renormalized offset, so sub-clips stay aligned to caption boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildSegment {
    /// Absolute start time in seconds
    pub start_time: f64,
    /// Absolute end time in seconds
    pub end_time: f64,
    /// The cue's text
    pub text: String,
}

/// A merged, schedulable clip boundary derived from one or more cues.
///
/// The interval is half-open `[start_time, end_time)` and `end_time >
/// start_time` always holds. Segments are emitted in non-decreasing start
/// order and never overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// 1-based index, contiguous after merging
    pub index: u32,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Start timecode, consistent with `start_time`
    pub start_stamp: String,
    /// End timecode, consistent with `end_time`
    pub end_stamp: String,
    /// Duration in seconds
    pub duration: f64,
    /// `ceil(duration * fps)` at the source frame rate
    pub frame_count: u64,
    /// Newline-joined text of all merged cues, in original order
    pub caption: String,
    /// Original cue intervals; present only when 2+ cues were merged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_segments: Option<Vec<ChildSegment>>,
}

impl Segment {
    /// Build a segment from its span, caption, and optional children.
    ///
    /// Stamps are derived from the numeric times so the two representations
    /// can never disagree.
    pub fn new(
        index: u32,
        start_time: f64,
        end_time: f64,
        fps: f64,
        caption: String,
        child_segments: Option<Vec<ChildSegment>>,
    ) -> Self {
        let duration = end_time - start_time;
        Self {
            index,
            start_time,
            end_time,
            start_stamp: format_timestamp(start_time),
            end_stamp: format_timestamp(end_time),
            duration,
            frame_count: (duration * fps).ceil() as u64,
            caption,
            child_segments,
        }
    }

    /// Number of child sub-clips (zero for singleton segments).
    pub fn child_count(&self) -> usize {
        self.child_segments.as_ref().map_or(0, Vec::len)
    }
}
